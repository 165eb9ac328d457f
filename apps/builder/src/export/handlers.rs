use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::export::ExportState;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExportStatus {
    pub state: ExportState,
}

/// POST /api/v1/export
///
/// Renders the visible template to PDF and returns it as a download. The file is
/// also kept in the configured output directory.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let saved = state.exporter.export(state.session.clone()).await?;

    let disposition = format!("attachment; filename=\"{}\"", saved.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        saved.bytes,
    )
        .into_response())
}

/// GET /api/v1/export/status
pub async fn handle_export_status(State(state): State<AppState>) -> Json<ExportStatus> {
    Json(ExportStatus {
        state: state.exporter.state(),
    })
}
