use std::sync::Arc;

use crate::config::Config;
use crate::coordinator::RequestCoordinator;
use crate::export::ExportService;
use crate::notify::NotificationCenter;
use crate::store::ContentStore;

/// Shared application state handed to the shell. Built once at startup;
/// everything mutable inside is reached only through the components' own
/// defined operations.
pub struct AppState {
    pub coordinator: RequestCoordinator,
    pub exports: Arc<ExportService>,
    pub notices: Arc<NotificationCenter>,
    pub store: Arc<ContentStore>,
    pub config: Config,
}
