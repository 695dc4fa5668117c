//! Regression Analyzer Module
//! Handles satisfaction regressions over set usage and fixed-position cards.

use thiserror::Error;

use crate::data::{CardType, CardsTable, MetadataTable};
use crate::stats::ols::{DesignMatrix, FitSummary, LinearModel, OlsError};
use crate::stats::scores::{resolve_score_columns, ScoreError};

#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Bad score configuration: {0}")]
    Score(#[from] ScoreError),
    #[error("No sessions with a usable score")]
    NoUsableSessions,
    #[error("Regression failed: {0}")]
    Fit(#[from] OlsError),
}

/// Per-session mean of the configured score columns, skipping blanks.
/// Sessions where no score column holds a number have no response value.
fn session_scores(
    metadata: &MetadataTable,
    score_columns: &[String],
) -> Result<Vec<Option<f64>>, ScoreError> {
    let raters = resolve_score_columns(metadata, score_columns)?;
    Ok((0..metadata.height())
        .map(|row| {
            let values: Vec<f64> = raters.iter().filter_map(|r| r.numeric(row)).collect();
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        })
        .collect())
}

/// Builds regression designs from the card matrix and fits them.
pub struct RegressionAnalyzer;

impl RegressionAnalyzer {
    /// Regress session scores on per-set card usage.
    ///
    /// One regressor per expansion set holding action cards, each the
    /// per-session sum of usage over that set's action cards with a
    /// missing cell counting as zero. No intercept column.
    pub fn set_score_regression(
        cards: &CardsTable,
        metadata: &MetadataTable,
        score_columns: &[String],
        model: &dyn LinearModel,
    ) -> Result<FitSummary, RegressionError> {
        let (response, kept) = Self::refined_scores(metadata, score_columns)?;

        let mut design = DesignMatrix::new(response.len());
        for set in cards.action_set_names() {
            let members: Vec<usize> = cards
                .columns_in_set(&set)
                .iter()
                .copied()
                .filter(|&pos| cards.columns()[pos].label.card_type == CardType::Action)
                .collect();
            let column: Vec<f64> = kept
                .iter()
                .map(|&row| {
                    members
                        .iter()
                        .filter_map(|&pos| cards.columns()[pos].values[row])
                        .sum()
                })
                .collect();
            design.push(set, column)?;
        }

        Ok(model.fit(&response, &design)?)
    }

    /// Regress session scores on the fixed-position currency cards, with a
    /// trailing constant column carrying the baseline score.
    ///
    /// Each currency card column is its own regressor; a card of another
    /// type sharing the name stays out of the design.
    pub fn prosperity_score_regression(
        cards: &CardsTable,
        metadata: &MetadataTable,
        score_columns: &[String],
        model: &dyn LinearModel,
    ) -> Result<FitSummary, RegressionError> {
        let (response, kept) = Self::refined_scores(metadata, score_columns)?;

        let mut design = DesignMatrix::new(response.len());
        for col in cards
            .columns()
            .iter()
            .filter(|c| c.label.card_type == CardType::Currency)
        {
            let column: Vec<f64> = kept
                .iter()
                .map(|&row| col.values[row].unwrap_or(0.0))
                .collect();
            design.push(col.label.name.clone(), column)?;
        }
        design.push("Average game score", vec![1.0; response.len()])?;

        Ok(model.fit(&response, &design)?)
    }

    /// Sessions whose mean score is a finite number, plus their row
    /// positions. A rating cell parsed from literal "NaN" or "inf" text
    /// poisons its session's mean, so finiteness is checked, not just
    /// presence.
    fn refined_scores(
        metadata: &MetadataTable,
        score_columns: &[String],
    ) -> Result<(Vec<f64>, Vec<usize>), RegressionError> {
        let scores = session_scores(metadata, score_columns)?;

        let mut response = Vec::new();
        let mut kept = Vec::new();
        for (row, score) in scores.into_iter().enumerate() {
            if let Some(s) = score.filter(|s| s.is_finite()) {
                response.push(s);
                kept.push(row);
            }
        }
        if response.is_empty() {
            return Err(RegressionError::NoUsableSessions);
        }
        Ok((response, kept))
    }
}
