//! The `tabscan analyze` command: one-shot extraction for a local file.
//!
//! Runs the same pipeline as the HTTP endpoint without the server, which is
//! handy for checking credentials and prompt output.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tabscan_core::{mime_for_filename, Analyzer, Config, GeminiProvider};

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the tablet image
    pub image: PathBuf,

    /// MIME type override (otherwise guessed from the file extension)
    #[arg(long)]
    pub mime: Option<String>,
}

/// Execute the analyze command.
pub async fn execute(config: Config, args: AnalyzeArgs) -> anyhow::Result<()> {
    if !args.image.exists() {
        anyhow::bail!("Input file does not exist: {}", args.image.display());
    }

    let provider = Arc::new(GeminiProvider::from_config(&config.gemini)?);
    let analyzer = Analyzer::new(provider, config.retry.policy());

    let bytes = tokio::fs::read(&args.image).await?;
    let filename = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = args
        .mime
        .unwrap_or_else(|| mime_for_filename(&filename).to_string());

    let result = analyzer.analyze_bytes(&bytes, &mime_type).await?;
    println!("{}", result.text);
    Ok(())
}
