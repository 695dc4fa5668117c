//! Survey Loader Module
//! Handles reading the raw survey CSV and splitting it into typed tables.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::grid::RawGrid;
use crate::data::layout::{LayoutError, SurveyLayout};
use crate::data::model::{
    CardColumn, CardLabel, CardType, CardsTable, Datum, MetadataColumn, MetadataTable,
};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Bad survey layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("Sheet has {found} rows but the header block alone needs {need}")]
    TooFewRows { found: usize, need: usize },
    #[error("Sheet has {found} columns, need at least {need}")]
    TooFewColumns { found: usize, need: usize },
    #[error("Column {column} has no header label")]
    MissingHeaderLabel { column: usize },
    #[error("Column {column} ({name:?}) is marked for both {first:?} and {second:?}")]
    AmbiguousSetMembership {
        column: usize,
        name: String,
        first: String,
        second: String,
    },
    #[error("Duplicate card column: {0}")]
    DuplicateColumn(CardLabel),
}

/// Splits the semi-structured survey sheet into a card matrix and a
/// metadata table according to a [`SurveyLayout`].
pub struct SurveyLoader;

impl SurveyLoader {
    /// Read a survey CSV from disk and split it into tables.
    pub fn load_csv(
        path: &Path,
        layout: &SurveyLayout,
    ) -> Result<(CardsTable, MetadataTable), LoaderError> {
        info!(path = %path.display(), "loading survey sheet");

        // Every cell stays a string here; typing happens per cell during
        // the split, not per column.
        let df = LazyCsvReader::new(path)
            .with_has_header(false)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let grid = RawGrid::from_dataframe(&df)?;
        Self::from_grid(&grid, layout)
    }

    /// Split an untyped grid into the card matrix and session metadata.
    pub fn from_grid(
        grid: &RawGrid,
        layout: &SurveyLayout,
    ) -> Result<(CardsTable, MetadataTable), LoaderError> {
        layout.validate()?;

        if grid.height() < layout.set_row_cutoff {
            return Err(LoaderError::TooFewRows {
                found: grid.height(),
                need: layout.set_row_cutoff,
            });
        }
        if grid.width() < layout.victory_cutoff {
            return Err(LoaderError::TooFewColumns {
                found: grid.width(),
                need: layout.victory_cutoff,
            });
        }

        let data_top = layout.set_row_cutoff;
        let sessions = grid.height() - data_top;

        // Leading columns are per-session metadata, labeled on the first row.
        let mut meta_columns = Vec::with_capacity(layout.metadata_cutoff);
        for col in layout.metadata_range() {
            let name = Self::header_label(grid, col)?;
            let values = (0..sessions)
                .map(|row| Datum::parse(grid.cell(data_top + row, col)))
                .collect();
            meta_columns.push(MetadataColumn { name, values });
        }

        // The rows below the labels mark expansion-set membership with a
        // lone "1" per column.
        let mut set_by_column: HashMap<usize, &str> = HashMap::new();
        for (row, set_name) in layout.membership_rows() {
            for col in 0..grid.width() {
                if grid.cell(row, col).map(str::trim) != Some("1") {
                    continue;
                }
                if let Some(first) = set_by_column.insert(col, set_name) {
                    return Err(LoaderError::AmbiguousSetMembership {
                        column: col,
                        name: grid.cell(0, col).unwrap_or_default().to_string(),
                        first: first.to_string(),
                        second: set_name.to_string(),
                    });
                }
            }
        }

        // Currency and victory cards sit at fixed positions and belong to
        // the layout's fixed set; everything past them is an action card
        // placed by its membership marker.
        let mut cards: Vec<CardColumn> = Vec::new();
        let mut seen: HashSet<CardLabel> = HashSet::new();

        for col in layout.currency_range() {
            let label = CardLabel::new(
                CardType::Currency,
                layout.fixed_set.as_str(),
                Self::header_label(grid, col)?,
            );
            Self::push_card(
                &mut cards,
                &mut seen,
                label,
                Self::card_values(grid, col, data_top, sessions),
            )?;
        }

        for col in layout.victory_range() {
            let label = CardLabel::new(
                CardType::Victory,
                layout.fixed_set.as_str(),
                Self::header_label(grid, col)?,
            );
            Self::push_card(
                &mut cards,
                &mut seen,
                label,
                Self::card_values(grid, col, data_top, sessions),
            )?;
        }

        for col in layout.victory_cutoff..grid.width() {
            let Some(&set) = set_by_column.get(&col) else {
                warn!(column = col, "column has no set marker, skipping");
                continue;
            };
            let label = CardLabel::new(CardType::Action, set, Self::header_label(grid, col)?);
            Self::push_card(
                &mut cards,
                &mut seen,
                label,
                Self::card_values(grid, col, data_top, sessions),
            )?;
        }

        let mut per_set: BTreeMap<&str, usize> = BTreeMap::new();
        for card in &cards {
            *per_set.entry(card.label.set.as_str()).or_default() += 1;
        }
        debug!(?per_set, "card columns per set");
        info!(
            sessions,
            cards = cards.len(),
            metadata = meta_columns.len(),
            "survey sheet split"
        );

        Ok((
            CardsTable::new(cards, sessions),
            MetadataTable::new(meta_columns, sessions),
        ))
    }

    /// First-row label for a column; blank labels are a sheet defect.
    fn header_label(grid: &RawGrid, col: usize) -> Result<String, LoaderError> {
        match grid.cell(0, col) {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(LoaderError::MissingHeaderLabel { column: col }),
        }
    }

    /// Usage values for one card column; non-numeric and non-finite cells
    /// count as missing, so downstream sums never see a NaN.
    fn card_values(grid: &RawGrid, col: usize, top: usize, sessions: usize) -> Vec<Option<f64>> {
        (0..sessions)
            .map(|row| {
                Datum::parse(grid.cell(top + row, col))
                    .as_number()
                    .filter(|v| v.is_finite())
            })
            .collect()
    }

    fn push_card(
        cards: &mut Vec<CardColumn>,
        seen: &mut HashSet<CardLabel>,
        label: CardLabel,
        values: Vec<Option<f64>>,
    ) -> Result<(), LoaderError> {
        if !seen.insert(label.clone()) {
            return Err(LoaderError::DuplicateColumn(label));
        }
        cards.push(CardColumn { label, values });
        Ok(())
    }
}
