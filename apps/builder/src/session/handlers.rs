//! Axum route handlers for form input, entry groups and template selection.
//!
//! Each handler is one UI event: it takes the session lock, applies the event and
//! returns the refreshed view.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::records::EntryRef;
use crate::form::schema::{EntryField, EntryKind, FormField};
use crate::form::validation::FormValidation;
use crate::form::FormError;
use crate::session::SessionView;
use crate::state::AppState;
use crate::templates::TemplateId;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FieldInput {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct BlurResponse {
    pub field: FormField,
    pub valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCreated {
    pub id: EntryRef,
    pub kind: EntryKind,
}

fn field(name: &str) -> Result<FormField, FormError> {
    FormField::from_name(name).ok_or_else(|| FormError::UnknownField(name.to_string()))
}

fn kind(name: &str) -> Result<EntryKind, FormError> {
    EntryKind::from_name(name).ok_or_else(|| FormError::UnknownKind(name.to_string()))
}

/// A malformed id names no entry, so it is reported like a missing one.
fn entry_ref(raw: &str) -> Result<EntryRef, AppError> {
    Uuid::parse_str(raw)
        .map(EntryRef::from)
        .map_err(|_| AppError::NotFound(format!("Unknown entry '{raw}'")))
}

fn entry_field(name: &str) -> Result<EntryField, FormError> {
    EntryField::from_name(name).ok_or_else(|| FormError::UnknownField(name.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.lock().await.view())
}

/// PUT /api/v1/fields/:name
///
/// One keystroke's worth of input: stores the raw value, re-collects and re-projects.
pub async fn handle_field_input(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<FieldInput>,
) -> Result<Json<SessionView>, AppError> {
    let field = field(&name)?;
    let mut session = state.session.lock().await;
    session.input(field, input.value)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/fields/:name/blur
pub async fn handle_field_blur(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BlurResponse>, AppError> {
    let field = field(&name)?;
    let valid = state.session.lock().await.blur(field);
    Ok(Json(BlurResponse { field, valid }))
}

/// POST /api/v1/validate
pub async fn handle_validate(State(state): State<AppState>) -> Json<FormValidation> {
    Json(state.session.lock().await.validate())
}

/// POST /api/v1/entries/:kind
///
/// Appends a blank group. The preview is not re-projected until the next input.
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(kind_name): Path<String>,
) -> Result<Json<EntryCreated>, AppError> {
    let kind = kind(&kind_name)?;
    let id = state.session.lock().await.add_entry(kind);
    Ok(Json(EntryCreated { id, kind }))
}

/// PUT /api/v1/entries/:kind/:id/:field
pub async fn handle_entry_input(
    State(state): State<AppState>,
    Path((kind_name, id, field_name)): Path<(String, String, String)>,
    Json(input): Json<FieldInput>,
) -> Result<Json<SessionView>, AppError> {
    let kind = kind(&kind_name)?;
    let id = entry_ref(&id)?;
    let field = entry_field(&field_name)?;
    let mut session = state.session.lock().await;
    session.entry_input(kind, id, field, input.value)?;
    Ok(Json(session.view()))
}

/// DELETE /api/v1/entries/:kind/:id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((kind_name, id)): Path<(String, String)>,
) -> Result<Json<SessionView>, AppError> {
    let kind = kind(&kind_name)?;
    let id = entry_ref(&id)?;
    let mut session = state.session.lock().await;
    session.remove_entry(kind, id)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/templates/:id/activate
pub async fn handle_activate_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let template = TemplateId::from_name(&id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown template '{id}'")))?;
    let mut session = state.session.lock().await;
    session.activate(template)?;
    Ok(Json(session.view()))
}

/// GET /api/v1/preview
///
/// The preview container with every template root, as currently projected.
pub async fn handle_preview(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = state.session.lock().await.preview_html()?;
    Ok(Html(html))
}

/// GET /api/v1/page
pub async fn handle_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = state.session.lock().await.page_html()?;
    Ok(Html(html))
}

/// DELETE /api/v1/notice
pub async fn handle_dismiss_notice(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.dismiss_notice();
    Json(session.view())
}
