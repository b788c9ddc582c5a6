//! The `tabscan serve` command: run the HTTP relay.

use crate::server::{self, AppState};
use clap::Args;
use std::net::SocketAddr;
use std::sync::Arc;
use tabscan_core::{Analyzer, Config, GeminiProvider, UploadStore};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen port (overrides config and the PORT env var)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(config: Config, args: ServeArgs) -> anyhow::Result<()> {
    // The provider is built once here and injected; handlers never touch
    // process-global state.
    let provider = Arc::new(GeminiProvider::from_config(&config.gemini)?);
    let analyzer = Arc::new(Analyzer::new(provider, config.retry.policy()));
    let store = Arc::new(UploadStore::new(config.upload_dir())?);

    let port = args.port.unwrap_or_else(|| config.port());
    let addr: SocketAddr = format!("{}:{}", config.server.bind, port).parse()?;
    let max_upload_bytes = (config.upload.max_size_mb as usize) * 1024 * 1024;

    server::serve(addr, AppState { analyzer, store }, max_upload_bytes).await
}
