//! Command-line driver for one-off fact checks.
//!
//! Reads the statement from argv and the Gemini API key from the
//! `GEMINI_API_KEY` environment variable, runs the pipeline, and prints the
//! verdict record as JSON on stdout. All tracing/diagnostic output goes to
//! stderr so that stdout stays machine-readable.
//!
//! ```text
//! GEMINI_API_KEY=... verist "The Great Wall of China is visible from space"
//! ```

use std::sync::Arc;

use verist::provider::{GeminiConfig, GeminiProvider};
use verist::FactChecker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let statement: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if statement.trim().is_empty() {
        anyhow::bail!("usage: verist <statement to check>");
    }

    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY is not set"))?;

    let provider = GeminiProvider::new(GeminiConfig::new(api_key))
        .map_err(|e| anyhow::anyhow!("provider setup failed: {e}"))?;
    let checker = FactChecker::with_defaults(Arc::new(provider))
        .map_err(|e| anyhow::anyhow!("checker setup failed: {e}"))?;

    let record = checker
        .check_fact(&statement)
        .await
        .map_err(|e| anyhow::anyhow!("fact check failed: {e}"))?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
