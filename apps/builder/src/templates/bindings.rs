//! Binding table — resolves every `<prefix><logicalName>` id once, at startup.
//!
//! Template roots and the busy overlay are required; every other binding point is
//! optional, and a layout that omits one simply has no handle for it.

use std::collections::HashMap;

use tracing::debug;

use crate::dom::{Document, DocumentError, NodeId};
use crate::models::resume::PersonalInfo;
use crate::templates::layouts::{LOADING_ID, TEMPLATE_BUTTON_CLASS};
use crate::templates::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Email,
    Phone,
    Location,
    Linkedin,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Email,
        ContactField::Phone,
        ContactField::Location,
        ContactField::Linkedin,
    ];

    /// Logical id; also the literal text that never counts as a real value.
    pub fn id(self) -> &'static str {
        match self {
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Location => "location",
            ContactField::Linkedin => "linkedin",
        }
    }

    pub fn icon(self) -> (&'static str, &'static str) {
        match self {
            ContactField::Email => ("fas", "fa-envelope"),
            ContactField::Phone => ("fas", "fa-phone"),
            ContactField::Location => ("fas", "fa-map-marker-alt"),
            ContactField::Linkedin => ("fab", "fa-linkedin"),
        }
    }

    pub fn value(self, personal: &PersonalInfo) -> &str {
        match self {
            ContactField::Email => &personal.email,
            ContactField::Phone => &personal.phone,
            ContactField::Location => &personal.location,
            ContactField::Linkedin => &personal.linkedin,
        }
    }
}

/// A contact value node together with the row that wraps it. Both must exist.
#[derive(Debug, Clone, Copy)]
pub struct ContactBinding {
    pub field: ContactField,
    pub value: NodeId,
    pub row: NodeId,
}

#[derive(Debug, Clone)]
pub struct TemplateBindings {
    pub root: NodeId,
    pub button: Option<NodeId>,
    /// Name and title are written under both spellings (`preview-name` and `name`).
    pub name: Vec<NodeId>,
    pub title: Vec<NodeId>,
    pub summary: Vec<NodeId>,
    pub contacts: Vec<ContactBinding>,
    pub experience: Option<NodeId>,
    pub education: Option<NodeId>,
    pub skills: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct BindingTable {
    templates: HashMap<TemplateId, TemplateBindings>,
    loading: NodeId,
}

impl BindingTable {
    pub fn build(doc: &Document) -> Result<Self, DocumentError> {
        let loading = doc.require(LOADING_ID)?;

        let mut buttons = HashMap::new();
        for button in doc.elements_by_class(TEMPLATE_BUTTON_CLASS) {
            if let Some(id) = doc.attr(button, "data-template")?.and_then(TemplateId::from_name) {
                buttons.insert(id, button);
            }
        }

        let mut templates = HashMap::new();
        for id in TemplateId::ALL {
            let bindings = resolve_template(doc, id, buttons.get(&id).copied())?;
            templates.insert(id, bindings);
        }

        Ok(Self { templates, loading })
    }

    pub fn template(&self, id: TemplateId) -> &TemplateBindings {
        // Every TemplateId is inserted by `build`.
        &self.templates[&id]
    }

    pub fn root(&self, id: TemplateId) -> NodeId {
        self.template(id).root
    }

    /// Roots in document order.
    pub fn roots(&self) -> impl Iterator<Item = (TemplateId, NodeId)> + '_ {
        TemplateId::ALL.into_iter().map(|id| (id, self.root(id)))
    }

    pub fn loading(&self) -> NodeId {
        self.loading
    }
}

fn resolve_template(
    doc: &Document,
    id: TemplateId,
    button: Option<NodeId>,
) -> Result<TemplateBindings, DocumentError> {
    let prefix = id.prefix();
    let root = doc.require(&id.root_id())?;

    let all = |logical: &str| -> Vec<NodeId> {
        [format!("{prefix}preview-{logical}"), format!("{prefix}{logical}")]
            .iter()
            .filter_map(|candidate| doc.element_by_id(candidate))
            .collect()
    };
    let first = |logical: &str| all(logical).into_iter().next();

    let contacts = ContactField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = first(field.id())?;
            let row = first(&format!("{}-contact", field.id()))?;
            Some(ContactBinding { field, value, row })
        })
        .collect::<Vec<_>>();

    let bindings = TemplateBindings {
        root,
        button,
        name: all("name"),
        title: all("title"),
        summary: all("summary"),
        contacts,
        experience: first("experience"),
        education: first("education"),
        skills: first("skills"),
    };

    if bindings.button.is_none() {
        debug!("Template '{id}' has no selector button");
    }
    for (logical, missing) in [
        ("summary", bindings.summary.is_empty()),
        ("experience", bindings.experience.is_none()),
        ("education", bindings.education.is_none()),
        ("skills", bindings.skills.is_none()),
    ] {
        if missing {
            debug!("Template '{id}' omits binding '{logical}'");
        }
    }
    if bindings.contacts.len() < ContactField::ALL.len() {
        debug!(
            "Template '{id}' exposes {} of {} contact rows",
            bindings.contacts.len(),
            ContactField::ALL.len()
        );
    }

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::templates::layouts::preview_page;

    fn preview_document() -> Document {
        let mut doc = Document::new();
        for node in preview_page(TemplateId::Modern) {
            doc.append(doc.body(), node).unwrap();
        }
        doc
    }

    #[test]
    fn test_modern_resolves_preview_spelling() {
        let doc = preview_document();
        let table = BindingTable::build(&doc).unwrap();
        let modern = table.template(TemplateId::Modern);
        assert_eq!(modern.name, vec![doc.require("preview-name").unwrap()]);
        assert_eq!(modern.contacts.len(), 4);
        assert_eq!(modern.experience, doc.element_by_id("preview-experience"));
        assert!(modern.button.is_some());
    }

    #[test]
    fn test_creative_binds_both_name_spellings() {
        let doc = preview_document();
        let table = BindingTable::build(&doc).unwrap();
        assert_eq!(table.template(TemplateId::Creative).name.len(), 2);
    }

    #[test]
    fn test_minimal_omissions_are_not_errors() {
        let doc = preview_document();
        let table = BindingTable::build(&doc).unwrap();
        let minimal = table.template(TemplateId::Minimal);
        assert!(minimal.summary.is_empty());
        assert!(minimal.education.is_none());
        let fields: Vec<_> = minimal.contacts.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![ContactField::Email, ContactField::Phone]);
    }

    #[test]
    fn test_contact_without_row_is_unbound() {
        let mut doc = preview_document();
        let classic_root = doc.require("template-classic").unwrap();
        // An orphan value node with no matching "-contact" row.
        doc.replace_children(
            classic_root,
            vec![Element::new("span").id("classic-email").into()],
        )
        .unwrap();
        let table = BindingTable::build(&doc).unwrap();
        assert!(table.template(TemplateId::Classic).contacts.is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let mut doc = Document::new();
        doc.append(doc.body(), Element::new("div").id(LOADING_ID).into())
            .unwrap();
        let err = BindingTable::build(&doc).unwrap_err();
        assert!(matches!(err, DocumentError::MissingElement(id) if id == "template-modern"));
    }
}
