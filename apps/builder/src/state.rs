use std::sync::Arc;

use tokio::sync::Mutex;

use crate::export::ExportPipeline;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single editing session: form values, entry groups and the preview document.
    pub session: Arc<Mutex<Session>>,
    /// Export pipeline. Holds its own busy flag so a second export is rejected
    /// without waiting on the session lock.
    pub exporter: Arc<ExportPipeline>,
}
