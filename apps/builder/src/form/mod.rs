// Input layer: field schema, repeatable record groups, validation and collection.
// Nothing here touches the preview document.

pub mod collector;
pub mod records;
pub mod schema;
pub mod validation;

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::form::records::{EntryRef, RecordStore};
use crate::form::schema::FormField;

pub use collector::collect;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown entry kind '{0}'")]
    UnknownKind(String),

    #[error("Entry {0} not found")]
    UnknownEntry(EntryRef),

    #[error("Field '{field}' does not belong to a {kind} entry")]
    FieldKindMismatch {
        field: &'static str,
        kind: &'static str,
    },
}

/// Live state of every input: top-level values, repeatable groups, and which
/// form groups currently carry the error state.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: HashMap<FormField, String>,
    records: RecordStore,
    errors: BTreeSet<FormField>,
}

impl FormState {
    pub fn value(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, field: FormField, value: String) {
        self.values.insert(field, value);
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut RecordStore {
        &mut self.records
    }

    pub fn has_error(&self, field: FormField) -> bool {
        self.errors.contains(&field)
    }

    pub fn set_error(&mut self, field: FormField, error: bool) {
        if error {
            self.errors.insert(field);
        } else {
            self.errors.remove(&field);
        }
    }
}
