mod api_client;
mod config;
mod coordinator;
mod errors;
mod export;
mod extract;
mod models;
mod notify;
mod shell;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::{ApiClient, FileExporter, GenerationService};
use crate::config::Config;
use crate::coordinator::{RequestCoordinator, UiPort};
use crate::export::ExportService;
use crate::notify::NotificationCenter;
use crate::shell::{TerminalSink, TerminalUi};
use crate::state::AppState;
use crate::store::ContentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; everything below is wiring.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job application client v{}", env!("CARGO_PKG_VERSION"));

    let api = Arc::new(ApiClient::new(&config.api_base_url, config.request_timeout));
    info!("API client initialized (service: {})", config.api_base_url);

    let store = Arc::new(ContentStore::new());
    let notices = Arc::new(NotificationCenter::new(Arc::new(TerminalSink)));
    let ui = Arc::new(TerminalUi::new(Arc::clone(&notices)));

    let coordinator = RequestCoordinator::new(
        Arc::clone(&api) as Arc<dyn GenerationService>,
        Arc::clone(&store),
        ui as Arc<dyn UiPort>,
    );
    let exports = Arc::new(ExportService::new(
        Arc::clone(&store),
        api as Arc<dyn FileExporter>,
        export::system_clipboard(),
        config.download_dir.clone(),
    ));
    info!("Export service initialized (downloads: {})", config.download_dir.display());

    shell::run(AppState {
        coordinator,
        exports,
        notices,
        store,
        config,
    })
    .await
}
