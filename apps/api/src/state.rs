use std::sync::Arc;

use crate::advising::advisor::Advisor;
use crate::advising::session::SessionStore;
use crate::config::Config;
use crate::errors::AppError;
use crate::recommendation::catalog::FieldCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable after start-up; shared by every request.
    pub catalog: Arc<FieldCatalog>,
    /// Pluggable advisor. `None` when ANTHROPIC_API_KEY is not set.
    pub advisor: Option<Arc<dyn Advisor>>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, catalog: FieldCatalog, advisor: Option<Arc<dyn Advisor>>) -> Self {
        let sessions = SessionStore::with_capacity(config.max_sessions);
        Self {
            config,
            catalog: Arc::new(catalog),
            advisor,
            sessions,
        }
    }

    pub fn advisor(&self) -> Result<&Arc<dyn Advisor>, AppError> {
        self.advisor.as_ref().ok_or(AppError::AdvisorUnavailable)
    }
}
