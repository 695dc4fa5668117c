//! OLS Module
//! Handles ordinary least squares fitting through the normal equations.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OlsError {
    #[error("Design matrix has no columns")]
    EmptyDesign,
    #[error("Column length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("Need more observations ({observations}) than parameters ({parameters})")]
    TooFewObservations {
        observations: usize,
        parameters: usize,
    },
    #[error("Design matrix is singular or nearly singular")]
    SingularDesign,
    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Column-major design matrix with named regressors.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    rows: usize,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl DesignMatrix {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Append a named regressor column.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), OlsError> {
        if values.len() != self.rows {
            return Err(OlsError::LengthMismatch {
                expected: self.rows,
                found: values.len(),
            });
        }
        self.names.push(name.into());
        self.columns.push(values);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// One fitted regressor: estimate, spread, and significance.
#[derive(Debug, Clone)]
pub struct Coefficient {
    pub name: String,
    pub value: f64,
    pub std_err: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub conf_low: f64,
    pub conf_high: f64,
}

/// Full fit diagnostics for one regression.
#[derive(Debug, Clone)]
pub struct FitSummary {
    pub coefficients: Vec<Coefficient>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: Option<f64>,
    pub f_p_value: Option<f64>,
    pub observations: usize,
    pub df_resid: f64,
    pub df_model: f64,
    pub has_intercept: bool,
}

impl FitSummary {
    /// Look up a coefficient by regressor name.
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// A least-squares backend. Kept behind a trait so analyses can swap the
/// solver without touching how designs are built.
pub trait LinearModel {
    fn fit(&self, response: &[f64], design: &DesignMatrix) -> Result<FitSummary, OlsError>;
}

/// Direct normal-equations solver.
pub struct OlsSolver;

impl OlsSolver {
    /// Invert a symmetric positive matrix by Gauss-Jordan elimination
    /// with partial pivoting. Returns `None` when a pivot collapses.
    fn invert(mut m: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
        let p = m.len();
        let scale = m
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let tol = f64::EPSILON * p as f64 * scale;

        let mut inv: Vec<Vec<f64>> = (0..p)
            .map(|i| (0..p).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();

        for col in 0..p {
            let pivot_row = (col..p).max_by(|&a, &b| {
                m[a][col]
                    .abs()
                    .partial_cmp(&m[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
            if m[pivot_row][col].abs() <= tol {
                return None;
            }
            m.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            let pivot = m[col][col];
            for j in 0..p {
                m[col][j] /= pivot;
                inv[col][j] /= pivot;
            }
            for row in 0..p {
                if row == col {
                    continue;
                }
                let factor = m[row][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..p {
                    m[row][j] -= factor * m[col][j];
                    inv[row][j] -= factor * inv[col][j];
                }
            }
        }
        Some(inv)
    }
}

impl LinearModel for OlsSolver {
    fn fit(&self, response: &[f64], design: &DesignMatrix) -> Result<FitSummary, OlsError> {
        let n = response.len();
        let p = design.width();

        if p == 0 {
            return Err(OlsError::EmptyDesign);
        }
        if design.rows() != n {
            return Err(OlsError::LengthMismatch {
                expected: design.rows(),
                found: n,
            });
        }
        if n <= p {
            return Err(OlsError::TooFewObservations {
                observations: n,
                parameters: p,
            });
        }

        // Normal equations: solve (X'X) beta = X'y.
        let cols = &design.columns;
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for i in 0..p {
            for j in i..p {
                let s: f64 = (0..n).map(|r| cols[i][r] * cols[j][r]).sum();
                xtx[i][j] = s;
                xtx[j][i] = s;
            }
            xty[i] = (0..n).map(|r| cols[i][r] * response[r]).sum();
        }

        let inv = Self::invert(xtx).ok_or(OlsError::SingularDesign)?;

        let beta: Vec<f64> = (0..p)
            .map(|i| (0..p).map(|j| inv[i][j] * xty[j]).sum())
            .collect();

        let residuals: Vec<f64> = (0..n)
            .map(|r| response[r] - (0..p).map(|i| beta[i] * cols[i][r]).sum::<f64>())
            .collect();
        let ssr: f64 = residuals.iter().map(|e| e * e).sum();

        // A constant regressor switches R-squared to its centered form.
        let has_intercept = cols
            .iter()
            .any(|c| c[0] != 0.0 && c.iter().all(|&v| v == c[0]));
        let tss: f64 = if has_intercept {
            let mean = response.iter().sum::<f64>() / n as f64;
            response.iter().map(|y| (y - mean).powi(2)).sum()
        } else {
            response.iter().map(|y| y * y).sum()
        };

        let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };
        let k_constant = usize::from(has_intercept);
        let df_resid = (n - p) as f64;
        let df_model = (p - k_constant) as f64;
        let adj_r_squared = 1.0 - (n - k_constant) as f64 / df_resid * (1.0 - r_squared);

        let sigma2 = ssr / df_resid;
        let t_dist = StudentsT::new(0.0, 1.0, df_resid)
            .map_err(|e| OlsError::Distribution(e.to_string()))?;
        let t_crit = t_dist.inverse_cdf(0.975);

        let coefficients = (0..p)
            .map(|i| {
                let value = beta[i];
                let std_err = (sigma2 * inv[i][i]).sqrt();
                let t_value = value / std_err;
                let p_value = 2.0 * (1.0 - t_dist.cdf(t_value.abs()));
                Coefficient {
                    name: design.names[i].clone(),
                    value,
                    std_err,
                    t_value,
                    p_value,
                    conf_low: value - t_crit * std_err,
                    conf_high: value + t_crit * std_err,
                }
            })
            .collect();

        // Joint F test whenever the fit leaves model degrees of freedom;
        // interceptless fits use the uncentered R-squared. A perfect fit
        // has no residual variance and no finite statistic.
        let (f_statistic, f_p_value) = if df_model > 0.0 && r_squared.is_finite() {
            let f = (r_squared / df_model) / ((1.0 - r_squared) / df_resid);
            if f.is_finite() {
                let f_dist = FisherSnedecor::new(df_model, df_resid)
                    .map_err(|e| OlsError::Distribution(e.to_string()))?;
                (Some(f), Some(1.0 - f_dist.cdf(f)))
            } else {
                (None, None)
            }
        } else {
            (None, None)
        };

        Ok(FitSummary {
            coefficients,
            r_squared,
            adj_r_squared,
            f_statistic,
            f_p_value,
            observations: n,
            df_resid,
            df_model,
            has_intercept,
        })
    }
}
