//! Data Model Module
//! Normalized survey tables: the card-usage matrix and session metadata.

use std::collections::HashMap;
use std::fmt;

/// Card category, the first level of the card-column hierarchy.
///
/// Variant order matches the lexicographic order of the category names, so
/// deriving `Ord` keeps labels sorted the same way the source data sorted
/// its string-keyed column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardType {
    Action,
    Currency,
    Victory,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Action => "action",
            CardType::Currency => "currency",
            CardType::Victory => "victory",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-level column label: (card type, expansion set, card name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardLabel {
    pub card_type: CardType,
    pub set: String,
    pub name: String,
}

impl CardLabel {
    pub fn new(card_type: CardType, set: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            card_type,
            set: set.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for CardLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.card_type, self.set, self.name)
    }
}

/// One card column: its label plus per-session usage counts.
///
/// A missing value means the cell was empty or not numeric; zero means the
/// card was recorded as absent.
#[derive(Debug, Clone)]
pub struct CardColumn {
    pub label: CardLabel,
    pub values: Vec<Option<f64>>,
}

/// The card-usage matrix.
///
/// Columns are sorted by label after construction, and two secondary
/// indices (card name → column positions, set name → column positions)
/// give group lookups without scanning the hierarchy.
#[derive(Debug, Clone)]
pub struct CardsTable {
    columns: Vec<CardColumn>,
    by_name: HashMap<String, Vec<usize>>,
    by_set: HashMap<String, Vec<usize>>,
    height: usize,
}

impl CardsTable {
    pub fn new(mut columns: Vec<CardColumn>, height: usize) -> Self {
        columns.sort_by(|a, b| a.label.cmp(&b.label));

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_set: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, col) in columns.iter().enumerate() {
            debug_assert_eq!(col.values.len(), height);
            by_name.entry(col.label.name.clone()).or_default().push(idx);
            by_set.entry(col.label.set.clone()).or_default().push(idx);
        }

        Self {
            columns,
            by_name,
            by_set,
            height,
        }
    }

    /// Number of recorded sessions.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All columns, in sorted label order.
    pub fn columns(&self) -> &[CardColumn] {
        &self.columns
    }

    /// Positions of every column (any type, any set) with this card name.
    pub fn columns_named(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions of every column (any card type) in this expansion set.
    pub fn columns_in_set(&self, set: &str) -> &[usize] {
        self.by_set.get(set).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct card names among action columns, sorted.
    pub fn action_card_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.label.card_type == CardType::Action)
            .map(|c| c.label.name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Distinct set names among action columns, sorted.
    pub fn action_set_names(&self) -> Vec<String> {
        let mut sets: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.label.card_type == CardType::Action)
            .map(|c| c.label.set.clone())
            .collect();
        sets.sort();
        sets.dedup();
        sets
    }
}

/// One metadata cell: numeric where parseable, text otherwise, or missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Number(f64),
    Text(String),
    Missing,
}

impl Datum {
    /// Coerce a raw cell value, keeping unparseable content as text.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(s) = raw else {
            return Datum::Missing;
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Datum::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Datum::Number(n),
            Err(_) => Datum::Text(s.to_string()),
        }
    }

    /// Numeric view; text and missing cells yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One named metadata column over all sessions.
#[derive(Debug, Clone)]
pub struct MetadataColumn {
    pub name: String,
    pub values: Vec<Datum>,
}

impl MetadataColumn {
    /// Numeric value at a row, if the cell held a number.
    pub fn numeric(&self, row: usize) -> Option<f64> {
        self.values.get(row).and_then(Datum::as_number)
    }
}

/// Per-session metadata: one row per game, columns in source order.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    columns: Vec<MetadataColumn>,
    by_name: HashMap<String, usize>,
    height: usize,
}

impl MetadataTable {
    pub fn new(columns: Vec<MetadataColumn>, height: usize) -> Self {
        let mut by_name = HashMap::new();
        for (idx, col) in columns.iter().enumerate() {
            debug_assert_eq!(col.values.len(), height);
            by_name.insert(col.name.clone(), idx);
        }
        Self {
            columns,
            by_name,
            height,
        }
    }

    /// Number of recorded sessions.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All columns, in source order.
    pub fn columns(&self) -> &[MetadataColumn] {
        &self.columns
    }

    /// Look up a column by field name.
    pub fn column(&self, name: &str) -> Option<&MetadataColumn> {
        self.by_name.get(name).map(|&idx| &self.columns[idx])
    }
}
