//! Model Collector — reads the whole input surface into one `ResumeSnapshot`.
//!
//! Pure with respect to the form: nothing is written back, and two calls over the
//! same input produce equal snapshots.

use crate::form::records::EntryDraft;
use crate::form::schema::{EntryField, EntryKind, FormField, SKILL_PLACEHOLDERS};
use crate::form::FormState;
use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo, ResumeSnapshot};

pub fn collect(form: &FormState) -> ResumeSnapshot {
    let personal = PersonalInfo {
        first_name: field_or_fallback(form, FormField::FirstName),
        last_name: field_or_fallback(form, FormField::LastName),
        job_title: field_or_fallback(form, FormField::JobTitle),
        email: field_or_fallback(form, FormField::Email),
        phone: field_or_fallback(form, FormField::Phone),
        location: field_or_fallback(form, FormField::Location),
        linkedin: field_or_fallback(form, FormField::Linkedin),
        summary: field_or_fallback(form, FormField::Summary),
    };

    let experience = form
        .records()
        .entries(EntryKind::Experience)
        .iter()
        .map(collect_experience)
        .collect();

    let education = form
        .records()
        .entries(EntryKind::Education)
        .iter()
        .map(collect_education)
        .collect();

    ResumeSnapshot {
        personal,
        experience,
        education,
        skills: split_skills(form.value(FormField::Skills)),
    }
}

/// Splits the free-text skills input on commas. Order and duplicates are kept;
/// an input with no usable piece yields the placeholder list.
pub fn split_skills(text: &str) -> Vec<String> {
    let skills: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if skills.is_empty() {
        SKILL_PLACEHOLDERS.iter().map(|s| s.to_string()).collect()
    } else {
        skills
    }
}

fn collect_experience(draft: &EntryDraft) -> ExperienceEntry {
    ExperienceEntry {
        title: entry_or_fallback(draft, EntryField::ExpTitle),
        company: entry_or_fallback(draft, EntryField::ExpCompany),
        start_date: entry_or_fallback(draft, EntryField::ExpStartDate),
        end_date: entry_or_fallback(draft, EntryField::ExpEndDate),
        description: entry_or_fallback(draft, EntryField::ExpDescription),
    }
}

fn collect_education(draft: &EntryDraft) -> EducationEntry {
    EducationEntry {
        degree: entry_or_fallback(draft, EntryField::EduDegree),
        field: entry_or_fallback(draft, EntryField::EduField),
        school: entry_or_fallback(draft, EntryField::EduSchool),
        year: entry_or_fallback(draft, EntryField::EduYear),
    }
}

fn field_or_fallback(form: &FormState, field: FormField) -> String {
    or_fallback(form.value(field), field.fallback())
}

fn entry_or_fallback(draft: &EntryDraft, field: EntryField) -> String {
    or_fallback(draft.value(field), field.fallback())
}

fn or_fallback(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_uses_every_fallback() {
        let snapshot = collect(&FormState::default());
        let p = &snapshot.personal;
        assert_eq!(p.first_name, "John");
        assert_eq!(p.last_name, "Doe");
        assert_eq!(p.job_title, "Professional Title");
        assert_eq!(p.email, "john.doe@example.com");
        assert_eq!(p.phone, "(555) 123-4567");
        assert_eq!(p.location, "City, State");
        assert_eq!(p.linkedin, "LinkedIn Profile");
        assert!(p.summary.starts_with("Experienced professional"));
        assert!(snapshot.experience.is_empty());
        assert!(snapshot.education.is_empty());
        assert_eq!(snapshot.skills, vec!["Skill 1", "Skill 2", "Skill 3"]);
    }

    #[test]
    fn test_blank_values_fall_back_and_live_values_are_trimmed() {
        let mut form = FormState::default();
        form.set_value(FormField::FirstName, "   ".into());
        form.set_value(FormField::LastName, "  Lee ".into());
        let snapshot = collect(&form);
        assert_eq!(snapshot.personal.first_name, "John");
        assert_eq!(snapshot.personal.last_name, "Lee");
    }

    #[test]
    fn test_every_personal_field_non_empty_for_arbitrary_input() {
        let inputs = ["", " ", "\n\t", "x", " y "];
        for input in inputs {
            let mut form = FormState::default();
            for field in FormField::ALL {
                form.set_value(field, input.to_string());
            }
            let p = collect(&form).personal;
            for value in [
                &p.first_name,
                &p.last_name,
                &p.job_title,
                &p.email,
                &p.phone,
                &p.location,
                &p.linkedin,
                &p.summary,
            ] {
                assert!(!value.trim().is_empty(), "empty field for input {input:?}");
            }
        }
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut form = FormState::default();
        form.set_value(FormField::JobTitle, "Engineer".into());
        form.set_value(FormField::Skills, "Rust, Go".into());
        let id = form.records_mut().add(EntryKind::Experience);
        form.records_mut()
            .set_value(EntryKind::Experience, id, EntryField::ExpTitle, "Lead".into())
            .unwrap();

        assert_eq!(collect(&form), collect(&form));
    }

    #[test]
    fn test_added_entry_is_fully_defaulted() {
        let mut form = FormState::default();
        let before = collect(&form).education.len();
        form.records_mut().add(EntryKind::Education);

        let snapshot = collect(&form);
        assert_eq!(snapshot.education.len(), before + 1);
        assert_eq!(
            snapshot.education[0],
            EducationEntry {
                degree: "Degree".into(),
                field: "Field".into(),
                school: "School Name".into(),
                year: "Year".into(),
            }
        );
    }

    #[test]
    fn test_partially_filled_entry_defaults_the_rest() {
        let mut form = FormState::default();
        let id = form.records_mut().add(EntryKind::Experience);
        form.records_mut()
            .set_value(EntryKind::Experience, id, EntryField::ExpTitle, "CTO".into())
            .unwrap();

        let exp = &collect(&form).experience[0];
        assert_eq!(exp.title, "CTO");
        assert_eq!(exp.company, "Company Name");
        assert_eq!(exp.start_date, "Start Date");
        assert_eq!(exp.end_date, "End Date");
        assert_eq!(
            exp.description,
            "Job description and key achievements will appear here."
        );
    }

    #[test]
    fn test_remove_then_collect_preserves_order() {
        let mut form = FormState::default();
        let mut ids = Vec::new();
        for title in ["A", "B", "C"] {
            let id = form.records_mut().add(EntryKind::Experience);
            form.records_mut()
                .set_value(EntryKind::Experience, id, EntryField::ExpTitle, title.into())
                .unwrap();
            ids.push(id);
        }

        form.records_mut().remove(EntryKind::Experience, ids[0]).unwrap();

        let titles: Vec<_> = collect(&form)
            .experience
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(split_skills("A, B ,,C"), vec!["A", "B", "C"]);
        assert_eq!(split_skills("Rust, Rust"), vec!["Rust", "Rust"]);
        assert_eq!(split_skills(""), vec!["Skill 1", "Skill 2", "Skill 3"]);
        assert_eq!(split_skills(" , ,  "), vec!["Skill 1", "Skill 2", "Skill 3"]);
    }
}
