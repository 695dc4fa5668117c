//! Stats module - scoring and regression analyses

mod ols;
mod regression;
mod scores;

pub use ols::{Coefficient, DesignMatrix, FitSummary, LinearModel, OlsError, OlsSolver};
pub use regression::{RegressionAnalyzer, RegressionError};
pub use scores::{ScoreCalculator, ScoreError};
