//! Score Aggregator Module
//! Handles per-card and per-set satisfaction scores.

use std::collections::BTreeMap;

use rayon::prelude::*;
use thiserror::Error;

use crate::data::{CardsTable, MetadataColumn, MetadataTable};

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Score column {0:?} is not in the metadata table")]
    UnknownScoreColumn(String),
    #[error("No score columns configured")]
    NoScoreColumns,
}

/// Resolve configured score column names against the metadata table.
pub(crate) fn resolve_score_columns<'a>(
    metadata: &'a MetadataTable,
    names: &[String],
) -> Result<Vec<&'a MetadataColumn>, ScoreError> {
    if names.is_empty() {
        return Err(ScoreError::NoScoreColumns);
    }
    names
        .iter()
        .map(|name| {
            metadata
                .column(name)
                .ok_or_else(|| ScoreError::UnknownScoreColumn(name.clone()))
        })
        .collect()
}

/// Computes satisfaction scores for cards and expansion sets.
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Average score for one card name, across every column carrying it.
    pub fn card_score(
        cards: &CardsTable,
        metadata: &MetadataTable,
        card_name: &str,
        score_columns: &[String],
    ) -> Result<Option<f64>, ScoreError> {
        Self::selection_score(cards, metadata, cards.columns_named(card_name), score_columns)
    }

    /// Average score for every card in an expansion set.
    pub fn set_score(
        cards: &CardsTable,
        metadata: &MetadataTable,
        set_name: &str,
        score_columns: &[String],
    ) -> Result<Option<f64>, ScoreError> {
        Self::selection_score(cards, metadata, cards.columns_in_set(set_name), score_columns)
    }

    /// Scores for all action card names, keyed by name.
    pub fn card_scores(
        cards: &CardsTable,
        metadata: &MetadataTable,
        score_columns: &[String],
    ) -> Result<BTreeMap<String, Option<f64>>, ScoreError> {
        cards
            .action_card_names()
            .par_iter()
            .map(|name| {
                Self::card_score(cards, metadata, name, score_columns)
                    .map(|score| (name.clone(), score))
            })
            .collect()
    }

    /// Scores for all expansion sets that hold action cards, keyed by set.
    pub fn set_scores(
        cards: &CardsTable,
        metadata: &MetadataTable,
        score_columns: &[String],
    ) -> Result<BTreeMap<String, Option<f64>>, ScoreError> {
        cards
            .action_set_names()
            .par_iter()
            .map(|set| {
                Self::set_score(cards, metadata, set, score_columns)
                    .map(|score| (set.clone(), score))
            })
            .collect()
    }

    /// Usage-weighted mean rating over a column selection.
    ///
    /// Usage is summed per session across the selection; the denominator
    /// counts sessions with at least one non-missing usage cell and is
    /// shared by all score columns. A missing or non-finite rating adds
    /// nothing to that rater's numerator. A selection with no observed
    /// sessions, or with zero total usage, has no score.
    fn selection_score(
        cards: &CardsTable,
        metadata: &MetadataTable,
        positions: &[usize],
        score_columns: &[String],
    ) -> Result<Option<f64>, ScoreError> {
        let raters = resolve_score_columns(metadata, score_columns)?;

        // Per-session usage totals; None marks a session with no observed
        // cell in the selection.
        let mut usage: Vec<Option<f64>> = vec![None; cards.height()];
        for &pos in positions {
            for (row, value) in cards.columns()[pos].values.iter().enumerate() {
                if let Some(v) = value {
                    *usage[row].get_or_insert(0.0) += v;
                }
            }
        }

        let count = usage.iter().filter(|u| u.is_some()).count();
        let total: f64 = usage.iter().flatten().sum();
        if count < 1 || total == 0.0 {
            return Ok(None);
        }

        let mean = raters
            .iter()
            .map(|rater| {
                let weighted: f64 = usage
                    .iter()
                    .enumerate()
                    .filter_map(|(row, used)| {
                        let u = (*used)?;
                        let rating = rater.numeric(row).filter(|r| r.is_finite())?;
                        Some(u * rating)
                    })
                    .sum();
                weighted / count as f64
            })
            .sum::<f64>()
            / raters.len() as f64;

        Ok(Some(mean))
    }
}
