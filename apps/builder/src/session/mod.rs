//! Session controller — owns the form, the preview document and the current snapshot.
//!
//! Every input event goes through one method here, so collection and projection always
//! run against a consistent pair of form state and document.

pub mod handlers;
pub mod sample;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::dom::{Document, DocumentError, NodeId};
use crate::form::records::EntryRef;
use crate::form::schema::{EntryField, EntryKind, FormField};
use crate::form::validation::{validate_field, validate_form, FormValidation};
use crate::form::{collect, FormError, FormState};
use crate::models::resume::ResumeSnapshot;
use crate::preview::project;
use crate::templates::layouts::{preview_page, PREVIEW_ID};
use crate::templates::registry::export_root;
use crate::templates::{BindingTable, TemplateId, TemplateRegistry};

pub const EXPORT_FAILED_NOTICE: &str = "Failed to generate PDF. Please try again.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub filename: String,
    pub path: PathBuf,
    pub completed_at: DateTime<Utc>,
}

/// One input of a repeatable group: what was typed, and the hint shown while it is empty.
#[derive(Debug, Clone, Serialize)]
pub struct EntryFieldView {
    pub field: EntryField,
    pub value: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub id: EntryRef,
    pub fields: Vec<EntryFieldView>,
}

/// Read-only view of the session handed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub snapshot: ResumeSnapshot,
    pub active_template: TemplateId,
    pub field_errors: Vec<FormField>,
    pub experience: Vec<EntryView>,
    pub education: Vec<EntryView>,
    pub busy: bool,
    pub notice: Option<String>,
    pub last_export: Option<ExportRecord>,
}

/// Rendered root of the template chosen for export, captured under the session lock.
#[derive(Debug, Clone)]
pub struct ExportCapture {
    pub root_id: String,
    pub root_html: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct Session {
    form: FormState,
    document: Document,
    bindings: BindingTable,
    registry: TemplateRegistry,
    snapshot: ResumeSnapshot,
    notice: Option<String>,
    last_export: Option<ExportRecord>,
}

impl Session {
    pub fn new() -> Result<Self, SessionError> {
        let registry = TemplateRegistry::default();
        let mut document = Document::new();
        for node in preview_page(registry.active()) {
            document.append(document.body(), node)?;
        }
        let bindings = BindingTable::build(&document)?;
        let form = FormState::default();
        let snapshot = collect(&form);

        let mut session = Self {
            form,
            document,
            bindings,
            registry,
            snapshot,
            notice: None,
            last_export: None,
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn snapshot(&self) -> &ResumeSnapshot {
        &self.snapshot
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    #[cfg(test)]
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn active_template(&self) -> TemplateId {
        self.registry.active()
    }

    /// Re-collects the snapshot and projects it. The new snapshot replaces the old one.
    pub fn refresh(&mut self) -> Result<&ResumeSnapshot, SessionError> {
        self.snapshot = collect(&self.form);
        project(
            &mut self.document,
            &self.bindings,
            self.registry.active(),
            &self.snapshot,
        )?;
        Ok(&self.snapshot)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Input events
    // ────────────────────────────────────────────────────────────────────────

    pub fn input(&mut self, field: FormField, value: String) -> Result<&ResumeSnapshot, SessionError> {
        self.form.set_value(field, value);
        self.refresh()
    }

    /// Blur on a field. Only required fields are validated; the rest are always valid.
    pub fn blur(&mut self, field: FormField) -> bool {
        if !field.is_required() {
            return true;
        }
        validate_field(&mut self.form, field)
    }

    pub fn validate(&mut self) -> FormValidation {
        validate_form(&mut self.form)
    }

    /// Appends a blank group. The preview catches up on the next input event.
    pub fn add_entry(&mut self, kind: EntryKind) -> EntryRef {
        let id = self.form.records_mut().add(kind);
        debug!("Added {} entry {id}", kind.as_str());
        id
    }

    pub fn entry_input(
        &mut self,
        kind: EntryKind,
        id: EntryRef,
        field: EntryField,
        value: String,
    ) -> Result<&ResumeSnapshot, SessionError> {
        self.form.records_mut().set_value(kind, id, field, value)?;
        self.refresh()
    }

    pub fn remove_entry(
        &mut self,
        kind: EntryKind,
        id: EntryRef,
    ) -> Result<&ResumeSnapshot, SessionError> {
        self.form.records_mut().remove(kind, id)?;
        debug!("Removed {} entry {id}", kind.as_str());
        self.refresh()
    }

    pub fn activate(&mut self, id: TemplateId) -> Result<&ResumeSnapshot, SessionError> {
        self.registry
            .activate(&mut self.document, &self.bindings, id)?;
        self.refresh()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Export support
    // ────────────────────────────────────────────────────────────────────────

    pub fn set_busy(&mut self, busy: bool) -> Result<(), SessionError> {
        let loading = self.bindings.loading();
        if busy {
            self.document.add_class(loading, "active")?;
        } else {
            self.document.remove_class(loading, "active")?;
        }
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.document()
            .has_class(self.bindings().loading(), "active")
            .unwrap_or(false)
    }

    /// Serializes the template that should be exported right now.
    pub fn capture_export(&self) -> Result<ExportCapture, SessionError> {
        let root = export_root(&self.document, &self.bindings)?;
        let root_id = self
            .bindings
            .roots()
            .find(|(_, node)| *node == root)
            .map(|(id, _)| id.root_id())
            .unwrap_or_else(|| "resume-template".to_string());

        Ok(ExportCapture {
            root_id,
            root_html: self.document.outer_html(root)?,
            first_name: self.snapshot.personal.first_name.clone(),
            last_name: self.snapshot.personal.last_name.clone(),
        })
    }

    pub fn record_export(&mut self, filename: String, path: PathBuf) {
        info!("Exported {filename} to {}", path.display());
        self.last_export = Some(ExportRecord {
            filename,
            path,
            completed_at: Utc::now(),
        });
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: &str) {
        self.notice = Some(notice.to_string());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ────────────────────────────────────────────────────────────────────────
    // Views
    // ────────────────────────────────────────────────────────────────────────

    /// Serialized preview container, including every template root.
    pub fn preview_html(&self) -> Result<String, SessionError> {
        let preview: NodeId = self.document.require(PREVIEW_ID)?;
        Ok(self.document.outer_html(preview)?)
    }

    /// The whole page: selector, preview and busy overlay.
    pub fn page_html(&self) -> Result<String, SessionError> {
        Ok(self.document.outer_html(self.document.body())?)
    }

    pub fn view(&self) -> SessionView {
        let entries = |kind: EntryKind| -> Vec<EntryView> {
            self.form()
                .records()
                .entries(kind)
                .iter()
                .map(|draft| EntryView {
                    id: draft.id(),
                    fields: kind
                        .fields()
                        .iter()
                        .map(|f| EntryFieldView {
                            field: *f,
                            value: draft.value(*f).to_string(),
                            placeholder: f.placeholder(),
                        })
                        .collect(),
                })
                .collect()
        };

        SessionView {
            snapshot: self.snapshot().clone(),
            active_template: self.active_template(),
            field_errors: FormField::ALL
                .into_iter()
                .filter(|f| self.form().has_error(*f))
                .collect(),
            experience: entries(EntryKind::Experience),
            education: entries(EntryKind::Education),
            busy: self.is_busy(),
            notice: self.notice().map(str::to_string),
            last_export: self.last_export.clone(),
        }
    }
}
