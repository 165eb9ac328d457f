//! View Synchronizer — writes a snapshot into the bound nodes of the preview document.
//!
//! Personal fields (name, title, summary, contact rows) go to every template that
//! binds them, so all layouts agree on shared values. Repeatable sections are rebuilt
//! in the active template only.

use crate::dom::{Display, Document, DocumentError};
use crate::models::resume::ResumeSnapshot;
use crate::preview::sections::{education_fragment, experience_fragment, skills_fragment};
use crate::templates::{BindingTable, ContactField, TemplateId};

pub fn project(
    doc: &mut Document,
    bindings: &BindingTable,
    active: TemplateId,
    snapshot: &ResumeSnapshot,
) -> Result<(), DocumentError> {
    let personal = &snapshot.personal;
    let full_name = personal.full_name();

    for id in TemplateId::ALL {
        let b = bindings.template(id);
        for node in &b.name {
            doc.set_text(*node, &full_name)?;
        }
        for node in &b.title {
            doc.set_text(*node, &personal.job_title)?;
        }
        for node in &b.summary {
            doc.set_text(*node, &personal.summary)?;
        }
        for contact in &b.contacts {
            let value = contact.field.value(personal);
            doc.set_text(contact.value, value)?;
            let display = if contact_visible(contact.field, value) {
                Display::Flex
            } else {
                Display::None
            };
            doc.set_display(contact.row, display)?;
        }
    }

    let b = bindings.template(active);
    if let Some(node) = b.experience {
        doc.replace_children(node, experience_fragment(&snapshot.experience))?;
    }
    if let Some(node) = b.education {
        doc.replace_children(node, education_fragment(&snapshot.education))?;
    }
    if let Some(node) = b.skills {
        doc.replace_children(node, skills_fragment(&snapshot.skills))?;
    }

    Ok(())
}

/// A contact row shows only a present value that isn't the field's own id
/// (so a literal "email" never shows up as an address).
pub fn contact_visible(field: ContactField, value: &str) -> bool {
    !value.is_empty() && value != field.id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{collect, schema::EntryKind, schema::FormField, FormState};
    use crate::templates::layouts::preview_page;
    use crate::templates::TemplateRegistry;

    fn setup() -> (Document, BindingTable) {
        let mut doc = Document::new();
        for node in preview_page(TemplateId::Modern) {
            doc.append(doc.body(), node).unwrap();
        }
        let bindings = BindingTable::build(&doc).unwrap();
        (doc, bindings)
    }

    fn text(doc: &Document, id: &str) -> String {
        doc.text_content(doc.require(id).unwrap()).unwrap()
    }

    #[test]
    fn test_contact_visibility_rule() {
        assert!(contact_visible(ContactField::Email, "a@b.co"));
        assert!(!contact_visible(ContactField::Email, "email"));
        assert!(!contact_visible(ContactField::Phone, ""));
        assert!(contact_visible(ContactField::Phone, "email"));
    }

    #[test]
    fn test_project_writes_personal_info() {
        let (mut doc, bindings) = setup();
        let mut form = FormState::default();
        form.set_value(FormField::FirstName, "Ada".into());
        form.set_value(FormField::LastName, "Lovelace".into());
        project(&mut doc, &bindings, TemplateId::Modern, &collect(&form)).unwrap();

        assert_eq!(text(&doc, "preview-name"), "Ada Lovelace");
        assert_eq!(text(&doc, "preview-title"), "Professional Title");
        assert_eq!(text(&doc, "preview-email"), "john.doe@example.com");
    }

    #[test]
    fn test_shared_bindings_agree_across_templates() {
        let (mut doc, bindings) = setup();
        let mut registry = TemplateRegistry::default();
        let mut form = FormState::default();
        form.set_value(FormField::FirstName, "Grace".into());
        form.set_value(FormField::Email, "grace@navy.mil".into());

        registry
            .activate(&mut doc, &bindings, TemplateId::Creative)
            .unwrap();
        project(&mut doc, &bindings, registry.active(), &collect(&form)).unwrap();

        for id in ["preview-name", "classic-name", "creative-name", "creative-preview-name", "minimal-name"] {
            assert_eq!(text(&doc, id), "Grace Doe", "binding {id}");
        }
        for id in ["preview-email", "classic-email", "creative-preview-email", "minimal-email"] {
            assert_eq!(text(&doc, id), "grace@navy.mil", "binding {id}");
        }
    }

    #[test]
    fn test_placeholder_contact_row_is_hidden() {
        let (mut doc, bindings) = setup();
        let mut form = FormState::default();
        form.set_value(FormField::Linkedin, "linkedin".into());
        project(&mut doc, &bindings, TemplateId::Modern, &collect(&form)).unwrap();

        let row = doc.require("preview-linkedin-contact").unwrap();
        assert_eq!(doc.display(row).unwrap(), Display::None);
        let email_row = doc.require("preview-email-contact").unwrap();
        assert_eq!(doc.display(email_row).unwrap(), Display::Flex);
    }

    #[test]
    fn test_zero_experience_renders_placeholder() {
        let (mut doc, bindings) = setup();
        project(&mut doc, &bindings, TemplateId::Modern, &collect(&FormState::default())).unwrap();
        let section = text(&doc, "preview-experience");
        assert!(section.contains("Job Title"));
        assert!(section.contains("Date Range"));
    }

    #[test]
    fn test_sections_rebuilt_wholesale() {
        let (mut doc, bindings) = setup();
        let mut form = FormState::default();
        form.records_mut().add(EntryKind::Experience);
        form.records_mut().add(EntryKind::Experience);
        project(&mut doc, &bindings, TemplateId::Modern, &collect(&form)).unwrap();
        project(&mut doc, &bindings, TemplateId::Modern, &collect(&form)).unwrap();

        let container = doc.require("preview-experience").unwrap();
        let html = doc.outer_html(container).unwrap();
        assert_eq!(html.matches("experience-item").count(), 2);
    }

    #[test]
    fn test_sections_only_touch_active_template() {
        let (mut doc, bindings) = setup();
        project(&mut doc, &bindings, TemplateId::Classic, &collect(&FormState::default())).unwrap();
        assert!(text(&doc, "classic-skills").contains("Skill 1"));
        assert_eq!(text(&doc, "preview-skills"), "");
    }

    #[test]
    fn test_missing_bindings_are_skipped() {
        let (mut doc, bindings) = setup();
        project(&mut doc, &bindings, TemplateId::Minimal, &collect(&FormState::default())).unwrap();
        assert!(doc.element_by_id("minimal-education").is_none());
        assert!(text(&doc, "minimal-experience").contains("Company Name"));
    }
}
