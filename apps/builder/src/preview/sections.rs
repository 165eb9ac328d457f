//! Fragments for the repeatable sections. A section is always rebuilt wholesale from
//! the snapshot; an empty sequence renders a fixed placeholder block instead.

use crate::dom::{Element, Markup};
use crate::form::schema::SKILL_PLACEHOLDERS;
use crate::models::resume::{EducationEntry, ExperienceEntry};

pub fn experience_fragment(entries: &[ExperienceEntry]) -> Vec<Markup> {
    if entries.is_empty() {
        return vec![experience_item(
            "Job Title",
            "Company Name",
            "Date Range",
            "Job description and key achievements will appear here.",
        )];
    }

    entries
        .iter()
        .map(|exp| {
            experience_item(
                &exp.title,
                &exp.company,
                &format!("{} - {}", exp.start_date, exp.end_date),
                &exp.description,
            )
        })
        .collect()
}

pub fn education_fragment(entries: &[EducationEntry]) -> Vec<Markup> {
    if entries.is_empty() {
        return vec![education_item("Degree in Field", "School Name", "Year")];
    }

    entries
        .iter()
        .map(|edu| {
            let heading = if edu.field.is_empty() {
                edu.degree.clone()
            } else {
                format!("{} in {}", edu.degree, edu.field)
            };
            education_item(&heading, &edu.school, &edu.year)
        })
        .collect()
}

pub fn skills_fragment(skills: &[String]) -> Vec<Markup> {
    let tag = |skill: &str| -> Markup { Element::new("span").class("skill-tag").text(skill).into() };

    if skills.is_empty() {
        SKILL_PLACEHOLDERS.iter().map(|s| tag(s)).collect()
    } else {
        skills.iter().map(|s| tag(s)).collect()
    }
}

fn experience_item(title: &str, company: &str, dates: &str, description: &str) -> Markup {
    Element::new("div")
        .class("experience-item")
        .child(item_header(title, company, dates))
        .child(
            Element::new("div")
                .class("item-description")
                .text(description),
        )
        .into()
}

fn education_item(heading: &str, school: &str, year: &str) -> Markup {
    Element::new("div")
        .class("education-item")
        .child(item_header(heading, school, year))
        .into()
}

fn item_header(title: &str, subtitle: &str, date: &str) -> Element {
    Element::new("div")
        .class("item-header")
        .child(
            Element::new("div")
                .child(Element::new("div").class("item-title").text(title))
                .child(Element::new("div").class("item-company").text(subtitle)),
        )
        .child(Element::new("div").class("item-date").text(date))
}
