//! Survey Layout Module
//! Isolates the fixed positional assumptions of the survey export.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inconsistent layout: {0}")]
    Inconsistent(&'static str),
}

/// Positional contract of the survey spreadsheet export.
///
/// Row 0 carries column labels, the next `set_names.len()` rows carry
/// set-membership markers, and data rows start at `set_row_cutoff`.
/// Columns are partitioned left-to-right into metadata, currency, victory,
/// and action ranges by the three cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyLayout {
    /// First data row; everything above is header metadata.
    pub set_row_cutoff: usize,
    /// Exclusive end of the metadata column range (which starts at 0).
    pub metadata_cutoff: usize,
    /// Exclusive end of the currency-card column range.
    pub currency_cutoff: usize,
    /// Exclusive end of the victory-card column range; action columns follow.
    pub victory_cutoff: usize,
    /// Expansion-set names, one per membership row, in row order (rows 1..).
    pub set_names: Vec<String>,
    /// Set unconditionally assigned to the fixed-position currency and
    /// victory columns.
    pub fixed_set: String,
    /// Metadata columns holding one rater's enjoyment score each.
    pub score_columns: Vec<String>,
}

impl Default for SurveyLayout {
    fn default() -> Self {
        Self {
            set_row_cutoff: 5,
            metadata_cutoff: 6,
            currency_cutoff: 7,
            victory_cutoff: 8,
            set_names: vec![
                "Original Set".to_string(),
                "Prosperity".to_string(),
                "Seaside".to_string(),
            ],
            fixed_set: "Prosperity".to_string(),
            score_columns: vec!["Matt rating".to_string(), "Vera Rating".to_string()],
        }
    }
}

impl SurveyLayout {
    /// Load a layout from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path)?;
        let layout: SurveyLayout = serde_json::from_str(&text)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check the internal consistency of the cutoffs and set list.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.metadata_cutoff > self.currency_cutoff {
            return Err(LayoutError::Inconsistent(
                "metadata_cutoff exceeds currency_cutoff",
            ));
        }
        if self.currency_cutoff > self.victory_cutoff {
            return Err(LayoutError::Inconsistent(
                "currency_cutoff exceeds victory_cutoff",
            ));
        }
        if self.set_names.is_empty() {
            return Err(LayoutError::Inconsistent("no expansion-set names"));
        }
        if 1 + self.set_names.len() > self.set_row_cutoff {
            return Err(LayoutError::Inconsistent(
                "membership rows overlap the data rows",
            ));
        }
        Ok(())
    }

    /// Column range of the metadata fields.
    pub fn metadata_range(&self) -> Range<usize> {
        0..self.metadata_cutoff
    }

    /// Column range of the currency cards.
    pub fn currency_range(&self) -> Range<usize> {
        self.metadata_cutoff..self.currency_cutoff
    }

    /// Column range of the victory cards.
    pub fn victory_range(&self) -> Range<usize> {
        self.currency_cutoff..self.victory_cutoff
    }

    /// Membership rows as (row index, set name) pairs, in row order.
    pub fn membership_rows(&self) -> impl Iterator<Item = (usize, &str)> {
        self.set_names
            .iter()
            .enumerate()
            .map(|(i, name)| (i + 1, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_layout_matches_survey_contract() {
        let layout = SurveyLayout::default();
        assert_eq!(layout.set_row_cutoff, 5);
        assert_eq!(layout.metadata_range(), 0..6);
        assert_eq!(layout.currency_range(), 6..7);
        assert_eq!(layout.victory_range(), 7..8);
        assert_eq!(
            layout.membership_rows().collect::<Vec<_>>(),
            vec![(1, "Original Set"), (2, "Prosperity"), (3, "Seaside")]
        );
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_keep_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"score_columns": ["Avg rating"]}}"#).unwrap();

        let layout = SurveyLayout::from_json_file(file.path()).unwrap();
        assert_eq!(layout.score_columns, vec!["Avg rating"]);
        assert_eq!(layout.victory_cutoff, 8);
        assert_eq!(layout.fixed_set, "Prosperity");
    }

    #[test]
    fn json_round_trip() {
        let layout = SurveyLayout::default();
        let json = serde_json::to_string(&layout).unwrap();
        let back: SurveyLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn inconsistent_cutoffs_are_rejected() {
        let layout = SurveyLayout {
            currency_cutoff: 3,
            ..SurveyLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::Inconsistent(_))
        ));

        let layout = SurveyLayout {
            set_row_cutoff: 2,
            ..SurveyLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::Inconsistent(_))
        ));
    }
}
