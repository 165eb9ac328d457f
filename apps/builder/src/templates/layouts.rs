//! Markup of the preview page: the template selector, one root per layout, and the
//! busy overlay. Layouts differ in structure and in which binding points they expose;
//! `minimal` omits summary, education, location and LinkedIn on purpose.

use crate::dom::{Display, Element, Markup};
use crate::templates::{ContactField, TemplateId};

pub const PREVIEW_ID: &str = "resumePreview";
pub const LOADING_ID: &str = "loading";
pub const TEMPLATE_CLASS: &str = "resume-template";
pub const TEMPLATE_BUTTON_CLASS: &str = "template-btn";

/// The whole preview page. `active` is visible and its selector button is marked active.
pub fn preview_page(active: TemplateId) -> Vec<Markup> {
    let selector = Element::new("div")
        .class("template-selector")
        .children(TemplateId::ALL.into_iter().map(|id| {
            let button = Element::new("button")
                .class(TEMPLATE_BUTTON_CLASS)
                .attr("type", "button")
                .attr("data-template", id.as_str())
                .text(id.label());
            if id == active {
                button.class("active")
            } else {
                button
            }
        }));

    let preview = Element::new("div")
        .id(PREVIEW_ID)
        .class("preview-container")
        .children(TemplateId::ALL.into_iter().map(|id| {
            let display = if id == active {
                Display::Block
            } else {
                Display::None
            };
            template_root(id).display(display)
        }));

    let loading = Element::new("div")
        .id(LOADING_ID)
        .class("loading-overlay")
        .child(Element::new("div").class("spinner"))
        .child(Element::new("p").text("Generating PDF..."));

    vec![selector.into(), preview.into(), loading.into()]
}

pub fn template_root(id: TemplateId) -> Element {
    let root = Element::new("div")
        .id(id.root_id())
        .class(TEMPLATE_CLASS)
        .class(&format!("template-{}", id.as_str()));

    match id {
        TemplateId::Modern => root.children(modern()),
        TemplateId::Classic => root.children(classic()),
        TemplateId::Creative => root.children(creative()),
        TemplateId::Minimal => root.children(minimal()),
    }
}

fn modern() -> Vec<Element> {
    vec![
        Element::new("header")
            .class("resume-header")
            .child(Element::new("h1").id("preview-name").class("resume-name"))
            .child(Element::new("p").id("preview-title").class("resume-title"))
            .child(
                Element::new("div")
                    .class("contact-info")
                    .children(ContactField::ALL.map(|f| contact_row("preview-", f))),
            ),
        section("Professional Summary", Element::new("p").id("preview-summary")),
        section("Experience", Element::new("div").id("preview-experience")),
        section("Education", Element::new("div").id("preview-education")),
        section(
            "Skills",
            Element::new("div").id("preview-skills").class("skills-list"),
        ),
    ]
}

fn classic() -> Vec<Element> {
    vec![
        Element::new("div")
            .class("classic-header")
            .child(Element::new("h1").id("classic-name").class("resume-name"))
            .child(Element::new("p").id("classic-title").class("resume-title"))
            .child(
                Element::new("div")
                    .class("contact-info")
                    .class("classic-contact")
                    .children(ContactField::ALL.map(|f| contact_row("classic-", f))),
            ),
        section("Profile", Element::new("p").id("classic-summary")),
        section("Work History", Element::new("div").id("classic-experience")),
        section("Education", Element::new("div").id("classic-education")),
        section(
            "Core Skills",
            Element::new("div").id("classic-skills").class("skills-list"),
        ),
    ]
}

/// Two-column layout. The name appears twice (sidebar and main header) under both
/// spellings of the binding id.
fn creative() -> Vec<Element> {
    let sidebar = Element::new("aside")
        .class("creative-sidebar")
        .child(Element::new("div").id("creative-name").class("creative-monogram"))
        .child(
            Element::new("div")
                .class("contact-info")
                .children(ContactField::ALL.map(|f| contact_row("creative-preview-", f))),
        )
        .child(section(
            "Skills",
            Element::new("div")
                .id("creative-preview-skills")
                .class("skills-list"),
        ));

    let main = Element::new("main")
        .class("creative-main")
        .child(
            Element::new("header")
                .class("resume-header")
                .child(
                    Element::new("h1")
                        .id("creative-preview-name")
                        .class("resume-name"),
                )
                .child(
                    Element::new("p")
                        .id("creative-preview-title")
                        .class("resume-title"),
                ),
        )
        .child(section("About Me", Element::new("p").id("creative-preview-summary")))
        .child(section(
            "Experience",
            Element::new("div").id("creative-preview-experience"),
        ))
        .child(section(
            "Education",
            Element::new("div").id("creative-preview-education"),
        ));

    vec![sidebar, main]
}

fn minimal() -> Vec<Element> {
    vec![
        Element::new("div")
            .class("minimal-header")
            .child(Element::new("h1").id("minimal-name").class("resume-name"))
            .child(Element::new("p").id("minimal-title").class("resume-title"))
            .child(
                Element::new("div")
                    .class("contact-info")
                    .child(contact_row("minimal-", ContactField::Email))
                    .child(contact_row("minimal-", ContactField::Phone)),
            ),
        section("Experience", Element::new("div").id("minimal-experience")),
        section(
            "Skills",
            Element::new("div").id("minimal-skills").class("skills-list"),
        ),
    ]
}

fn section(heading: &str, body: Element) -> Element {
    Element::new("section")
        .class("resume-section")
        .child(Element::new("h2").class("section-title").text(heading))
        .child(body)
}

/// `<row id="{base}{field}-contact"><i/><span id="{base}{field}"/></row>`
fn contact_row(base: &str, field: ContactField) -> Element {
    let (icon_family, icon) = field.icon();
    Element::new("div")
        .id(format!("{base}{}-contact", field.id()))
        .class("contact-item")
        .child(Element::new("i").class(icon_family).class(icon))
        .child(Element::new("span").id(format!("{base}{}", field.id())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_preview_page_mounts_without_duplicate_ids() {
        let mut doc = Document::new();
        for node in preview_page(TemplateId::Modern) {
            doc.append(doc.body(), node).unwrap();
        }
        assert_eq!(doc.elements_by_class(TEMPLATE_CLASS).len(), TemplateId::ALL.len());
        assert!(doc.element_by_id(LOADING_ID).is_some());
    }

    #[test]
    fn test_only_active_template_is_displayed() {
        let mut doc = Document::new();
        for node in preview_page(TemplateId::Classic) {
            doc.append(doc.body(), node).unwrap();
        }
        for id in TemplateId::ALL {
            let root = doc.require(&id.root_id()).unwrap();
            let expected = if id == TemplateId::Classic {
                Display::Block
            } else {
                Display::None
            };
            assert_eq!(doc.display(root).unwrap(), expected);
        }
    }

    #[test]
    fn test_minimal_omits_optional_sections() {
        let html = Markup::from(template_root(TemplateId::Minimal)).to_html();
        assert!(html.contains("minimal-experience"));
        assert!(!html.contains("minimal-summary"));
        assert!(!html.contains("minimal-education"));
        assert!(!html.contains("minimal-linkedin"));
    }
}
