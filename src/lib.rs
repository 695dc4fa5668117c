//! Dominion Survey - play-survey scoring & regression analysis
//!
//! Loads a semi-structured sheet of recorded Dominion sessions and reports
//! satisfaction scores and usage regressions for cards and expansion sets.

pub mod data;
pub mod report;
pub mod stats;

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::data::{SurveyLayout, SurveyLoader};
    use crate::report::RankedScores;
    use crate::stats::ScoreCalculator;

    #[test]
    fn scores_flow_from_sheet_to_report() {
        let rows = vec![
            vec![
                "Date",
                "Players",
                "Winner",
                "Winning score",
                "Matt rating",
                "Vera Rating",
                "Copper",
                "Estate",
                "Witch",
                "Lighthouse",
            ],
            vec!["", "", "", "", "", "", "", "", "1", ""],
            vec!["", "", "", "", "", "", "", "", "", ""],
            vec!["", "", "", "", "", "", "", "", "", "1"],
            vec!["", "", "", "", "", "", "", "", "", ""],
            vec!["2026-01-03", "2", "Matt", "42", "8", "6", "1", "1", "1", "0"],
            vec!["2026-01-10", "2", "Vera", "38", "5", "9", "1", "1", "", "0"],
        ];

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for row in &rows {
            writeln!(file, "{}", row.join(",")).unwrap();
        }
        file.flush().unwrap();

        let layout = SurveyLayout::default();
        let (cards, metadata) = SurveyLoader::load_csv(file.path(), &layout).unwrap();

        let scores =
            ScoreCalculator::card_scores(&cards, &metadata, &layout.score_columns).unwrap();
        assert_eq!(scores["Witch"], Some(7.0));
        assert_eq!(scores["Lighthouse"], None); // never used

        let rendered = RankedScores::new("card type", &scores).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "    Scores by card type");
        assert!(lines[2].starts_with("Witch"));
        assert!(rendered.contains("[\"Lighthouse\"]"));
    }
}
