//! Dominion Survey - command-line survey analysis
//!
//! Usage: dominion_survey [SHEET.csv] [LAYOUT.json]

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use dominion_survey::data::{SurveyLayout, SurveyLoader};
use dominion_survey::report::{RankedScores, RegressionReport};
use dominion_survey::stats::{OlsSolver, RegressionAnalyzer, ScoreCalculator};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut args = env::args().skip(1);
    let sheet = PathBuf::from(args.next().unwrap_or_else(|| "dominion.csv".to_string()));
    let layout = match args.next() {
        Some(path) => SurveyLayout::from_json_file(Path::new(&path))
            .with_context(|| format!("reading layout {path}"))?,
        None => SurveyLayout::default(),
    };

    let (cards, metadata) = SurveyLoader::load_csv(&sheet, &layout)
        .with_context(|| format!("loading {}", sheet.display()))?;
    info!(
        cards = cards.columns().len(),
        sessions = cards.height(),
        "sheet loaded"
    );

    let score_columns = &layout.score_columns;
    let solver = OlsSolver;

    let by_card = ScoreCalculator::card_scores(&cards, &metadata, score_columns)?;
    print!("{}", RankedScores::new("card type", &by_card));

    let by_set = ScoreCalculator::set_scores(&cards, &metadata, score_columns)?;
    print!("{}", RankedScores::new("Dominion set", &by_set));

    let set_fit =
        RegressionAnalyzer::set_score_regression(&cards, &metadata, score_columns, &solver)?;
    print!("{}", RegressionReport::new("score on per-set usage", &set_fit));

    let prosperity_fit =
        RegressionAnalyzer::prosperity_score_regression(&cards, &metadata, score_columns, &solver)?;
    print!(
        "{}",
        RegressionReport::new(
            format!("score on {} fixed cards", layout.fixed_set),
            &prosperity_fit
        )
    );

    Ok(())
}
