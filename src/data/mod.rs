//! Data module - survey sheet loading and table types

mod grid;
mod layout;
mod loader;
mod model;

pub use grid::RawGrid;
pub use layout::{LayoutError, SurveyLayout};
pub use loader::{LoaderError, SurveyLoader};
pub use model::{
    CardColumn, CardLabel, CardType, CardsTable, Datum, MetadataColumn, MetadataTable,
};
