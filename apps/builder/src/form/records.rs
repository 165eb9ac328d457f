//! Record Store — ordered experience and education input groups.
//!
//! Groups are addressed by an opaque [`EntryRef`] handed out at creation, never by
//! position, so removing one group cannot hit its neighbour.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::schema::{EntryField, EntryKind};
use crate::form::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryRef(Uuid);

impl EntryRef {
    fn new() -> Self {
        EntryRef(Uuid::new_v4())
    }
}

impl From<Uuid> for EntryRef {
    fn from(id: Uuid) -> Self {
        EntryRef(id)
    }
}

impl std::fmt::Display for EntryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw input values of one repeatable group, exactly as typed.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    id: EntryRef,
    values: HashMap<EntryField, String>,
}

impl EntryDraft {
    fn blank() -> Self {
        Self {
            id: EntryRef::new(),
            values: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntryRef {
        self.id
    }

    /// Current input value; empty string when never typed into.
    pub fn value(&self, field: EntryField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    experience: Vec<EntryDraft>,
    education: Vec<EntryDraft>,
}

impl RecordStore {
    pub fn entries(&self, kind: EntryKind) -> &[EntryDraft] {
        match kind {
            EntryKind::Experience => &self.experience,
            EntryKind::Education => &self.education,
        }
    }

    fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<EntryDraft> {
        match kind {
            EntryKind::Experience => &mut self.experience,
            EntryKind::Education => &mut self.education,
        }
    }

    /// Appends a blank group at the end of `kind`'s container.
    pub fn add(&mut self, kind: EntryKind) -> EntryRef {
        let draft = EntryDraft::blank();
        let id = draft.id;
        self.entries_mut(kind).push(draft);
        id
    }

    /// Removes exactly the referenced group; the others keep their relative order.
    pub fn remove(&mut self, kind: EntryKind, id: EntryRef) -> Result<(), FormError> {
        let entries = self.entries_mut(kind);
        let pos = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(FormError::UnknownEntry(id))?;
        entries.remove(pos);
        Ok(())
    }

    pub fn set_value(
        &mut self,
        kind: EntryKind,
        id: EntryRef,
        field: EntryField,
        value: String,
    ) -> Result<(), FormError> {
        if field.kind() != kind {
            return Err(FormError::FieldKindMismatch {
                field: field.name(),
                kind: kind.as_str(),
            });
        }
        let draft = self
            .entries_mut(kind)
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(FormError::UnknownEntry(id))?;
        draft.values.insert(field, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_blank_entry() {
        let mut store = RecordStore::default();
        let id = store.add(EntryKind::Experience);
        let entries = store.entries(EntryKind::Experience);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), id);
        assert_eq!(entries[0].value(EntryField::ExpTitle), "");
        assert!(store.entries(EntryKind::Education).is_empty());
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut store = RecordStore::default();
        let a = store.add(EntryKind::Education);
        let b = store.add(EntryKind::Education);
        let c = store.add(EntryKind::Education);

        store.remove(EntryKind::Education, b).unwrap();

        let ids: Vec<_> = store
            .entries(EntryKind::Education)
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_remove_unknown_entry_fails() {
        let mut store = RecordStore::default();
        let id = store.add(EntryKind::Experience);
        let err = store.remove(EntryKind::Education, id).unwrap_err();
        assert!(matches!(err, FormError::UnknownEntry(_)));
        assert_eq!(store.entries(EntryKind::Experience).len(), 1);
    }

    #[test]
    fn test_set_value_rejects_foreign_field() {
        let mut store = RecordStore::default();
        let id = store.add(EntryKind::Experience);
        let err = store
            .set_value(EntryKind::Experience, id, EntryField::EduYear, "2018".into())
            .unwrap_err();
        assert!(matches!(err, FormError::FieldKindMismatch { .. }));
    }

    #[test]
    fn test_set_value_targets_one_entry() {
        let mut store = RecordStore::default();
        let first = store.add(EntryKind::Experience);
        let second = store.add(EntryKind::Experience);
        store
            .set_value(EntryKind::Experience, second, EntryField::ExpCompany, "Acme".into())
            .unwrap();

        let entries = store.entries(EntryKind::Experience);
        assert_eq!(entries[0].id(), first);
        assert_eq!(entries[0].value(EntryField::ExpCompany), "");
        assert_eq!(entries[1].value(EntryField::ExpCompany), "Acme");
    }
}
