pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/page", get(handlers::handle_page))
        .route("/api/v1/preview", get(handlers::handle_preview))
        .route("/api/v1/notice", delete(handlers::handle_dismiss_notice))
        // Form fields
        .route("/api/v1/fields/:name", put(handlers::handle_field_input))
        .route("/api/v1/fields/:name/blur", post(handlers::handle_field_blur))
        .route("/api/v1/validate", post(handlers::handle_validate))
        // Experience / education groups
        .route("/api/v1/entries/:kind", post(handlers::handle_add_entry))
        .route(
            "/api/v1/entries/:kind/:id",
            delete(handlers::handle_remove_entry),
        )
        .route(
            "/api/v1/entries/:kind/:id/:field",
            put(handlers::handle_entry_input),
        )
        // Templates
        .route(
            "/api/v1/templates/:id/activate",
            post(handlers::handle_activate_template),
        )
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .route("/api/v1/export/status", get(export::handle_export_status))
        .with_state(state)
}
