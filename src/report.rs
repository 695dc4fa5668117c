//! Report Module
//! Handles plain-text rendering of ranked scores and regression fits.

use std::collections::BTreeMap;
use std::fmt;

use crate::stats::FitSummary;

/// Ranked score listing, highest first, with unscored names set aside.
pub struct RankedScores {
    label: String,
    ranked: Vec<(String, f64)>,
    omitted: Vec<String>,
}

impl RankedScores {
    /// Rank a score map in descending order. Entries without a finite
    /// score are pulled out into the omitted list; score ties keep the
    /// map's name order.
    pub fn new(label: impl Into<String>, scores: &BTreeMap<String, Option<f64>>) -> Self {
        let mut ranked = Vec::new();
        let mut omitted = Vec::new();
        for (name, score) in scores {
            match score {
                Some(s) if s.is_finite() => ranked.push((name.clone(), *s)),
                _ => omitted.push(name.clone()),
            }
        }
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            label: label.into(),
            ranked,
            omitted,
        }
    }

    pub fn ranked(&self) -> &[(String, f64)] {
        &self.ranked
    }

    pub fn omitted(&self) -> &[String] {
        &self.omitted
    }
}

impl fmt::Display for RankedScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = format!("    Scores by {}", self.label);
        let name_width = self
            .ranked
            .iter()
            .map(|(name, _)| name.len())
            .chain(self.omitted.iter().map(String::len))
            .max()
            .unwrap_or(0);
        let ruler = heading.len().max(name_width);

        writeln!(f, "{}", "=".repeat(ruler))?;
        writeln!(f, "{heading}")?;
        for (name, score) in &self.ranked {
            writeln!(f, "{name:<name_width$}   {score:.4}")?;
        }
        if !self.omitted.is_empty() {
            writeln!(f, "Omitted due to lack of data:")?;
            writeln!(f, "    {:?}", self.omitted)?;
        }
        Ok(())
    }
}

/// Plain-text summary table for one fitted regression.
pub struct RegressionReport<'a> {
    title: String,
    summary: &'a FitSummary,
}

impl<'a> RegressionReport<'a> {
    pub fn new(title: impl Into<String>, summary: &'a FitSummary) -> Self {
        Self {
            title: title.into(),
            summary,
        }
    }
}

impl fmt::Display for RegressionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        let name_width = s
            .coefficients
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("regressor".len());
        // The six numeric columns take 62 characters after the name.
        let width = name_width + 62;

        writeln!(f, "{}", "=".repeat(width))?;
        writeln!(f, "    OLS regression: {}", self.title)?;
        writeln!(
            f,
            "Observations: {}    Df residuals: {}    Df model: {}",
            s.observations, s.df_resid, s.df_model
        )?;
        writeln!(
            f,
            "R-squared: {:.4}    Adj. R-squared: {:.4}",
            s.r_squared, s.adj_r_squared
        )?;
        if let (Some(fv), Some(fp)) = (s.f_statistic, s.f_p_value) {
            writeln!(f, "F-statistic: {fv:.4} (p = {fp:.4})")?;
        }
        writeln!(f, "{}", "-".repeat(width))?;
        writeln!(
            f,
            "{:<name_width$}  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}  {:>8}",
            "regressor", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
        )?;
        for c in &s.coefficients {
            writeln!(
                f,
                "{:<name_width$}  {:>9.4}  {:>9.4}  {:>8.3}  {:>8.4}  {:>8.4}  {:>8.4}",
                c.name, c.value, c.std_err, c.t_value, c.p_value, c.conf_low, c.conf_high
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Coefficient;

    #[test]
    fn scores_list_highest_first_and_set_aside_unscored_names() {
        let mut scores = BTreeMap::new();
        scores.insert("Adventurer".to_string(), Some(1.0));
        scores.insert("Bureaucrat".to_string(), None);
        scores.insert("Chapel".to_string(), Some(5.0));

        let report = RankedScores::new("card type", &scores);
        let rendered = report.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "    Scores by card type");
        assert_eq!(lines[0], "=".repeat(lines[1].len()));
        assert!(lines[2].starts_with("Chapel"));
        assert!(lines[2].ends_with("5.0000"));
        assert!(lines[3].starts_with("Adventurer"));
        assert_eq!(lines[4], "Omitted due to lack of data:");
        assert_eq!(lines[5], "    [\"Bureaucrat\"]");
    }

    #[test]
    fn names_are_padded_to_the_longest_entry() {
        let mut scores = BTreeMap::new();
        scores.insert("Witch".to_string(), Some(7.0));
        scores.insert("Council Room".to_string(), Some(3.5));

        let rendered = RankedScores::new("card type", &scores).to_string();
        assert!(rendered.contains("Witch          7.0000"));
        assert!(rendered.contains("Council Room   3.5000"));
    }

    #[test]
    fn non_finite_scores_are_omitted_like_missing_ones() {
        let mut scores = BTreeMap::new();
        scores.insert("Moat".to_string(), Some(f64::NAN));
        scores.insert("Witch".to_string(), Some(7.0));

        let report = RankedScores::new("card type", &scores);
        assert_eq!(report.ranked().len(), 1);
        assert_eq!(report.omitted(), ["Moat".to_string()]);
    }

    #[test]
    fn fully_scored_listing_has_no_omitted_section() {
        let mut scores = BTreeMap::new();
        scores.insert("Witch".to_string(), Some(7.0));

        let rendered = RankedScores::new("Dominion set", &scores).to_string();
        assert!(!rendered.contains("Omitted"));
    }

    #[test]
    fn regression_report_shows_diagnostics_and_coefficients() {
        let summary = FitSummary {
            coefficients: vec![Coefficient {
                name: "Original Set".to_string(),
                value: 1.25,
                std_err: 0.5,
                t_value: 2.5,
                p_value: 0.04,
                conf_low: 0.2,
                conf_high: 2.3,
            }],
            r_squared: 0.64,
            adj_r_squared: 0.46,
            f_statistic: None,
            f_p_value: None,
            observations: 12,
            df_resid: 11.0,
            df_model: 1.0,
            has_intercept: false,
        };

        let rendered = RegressionReport::new("set usage", &summary).to_string();
        assert!(rendered.contains("    OLS regression: set usage"));
        assert!(rendered.contains("Observations: 12    Df residuals: 11    Df model: 1"));
        assert!(rendered.contains("R-squared: 0.6400"));
        assert!(rendered.contains("P>|t|"));
        assert!(rendered.contains("Original Set"));
        assert!(rendered.contains("1.2500"));
        // No F line when the fit carries no statistic.
        assert!(!rendered.contains("F-statistic"));
    }
}
