use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nutrition_coach::config::{AppConfig, LogFormat};
use nutrition_coach::journal_summary::summarize_entries;
use nutrition_coach::nutrition_analyzer::NutritionAnalyzer;
use nutrition_coach::pipeline::{local_now, JournalPipeline};

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();
    init_logging(config.log_format);

    info!(
        model = %config.ai.model,
        ai_enabled = config.ai.is_enabled(),
        overlap_policy = ?config.extraction.overlap_policy,
        "Starting nutrition coach"
    );

    let analyzer = NutritionAnalyzer::from_config(&config.ai)
        .with_pipeline(JournalPipeline::with_config(config.extraction.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut journal = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let analysis = analyzer.analyze_message(message, local_now(), None).await;
        info!(source = ?analysis.source, entries = analysis.value.len(), "Processed message");
        println!("{}", serde_json::to_string(&analysis.value)?);
        journal.extend(analysis.value);
    }

    if let Some(summary) = summarize_entries(&journal) {
        info!(
            entries = summary.total_entries,
            calories = summary.total_calories,
            protein_pct = summary.distribution.protein,
            carbs_pct = summary.distribution.carbs,
            fat_pct = summary.distribution.fat,
            "Session summary"
        );
    }

    Ok(())
}
