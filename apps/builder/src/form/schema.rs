//! Field Schema — the fixed set of recognized inputs and their fallback values.
//!
//! Top-level inputs are `FormField`s; the inputs inside a repeatable experience or
//! education group are `EntryField`s. Wire names match the form's `name` attributes
//! (`firstName`, `expTitle`, ...).

use serde::{Deserialize, Serialize};

use crate::form::validation::FieldConstraint;

/// Shown when the skills input is blank or holds only separators.
pub const SKILL_PLACEHOLDERS: [&str; 3] = ["Skill 1", "Skill 2", "Skill 3"];

// ────────────────────────────────────────────────────────────────────────────
// Top-level fields
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FirstName,
    LastName,
    JobTitle,
    Email,
    Phone,
    Location,
    Linkedin,
    Summary,
    Skills,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::JobTitle,
        FormField::Email,
        FormField::Phone,
        FormField::Location,
        FormField::Linkedin,
        FormField::Summary,
        FormField::Skills,
    ];

    /// Fields checked on blur and before export.
    pub const REQUIRED: [FormField; 4] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::JobTitle,
        FormField::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::JobTitle => "jobTitle",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Location => "location",
            FormField::Linkedin => "linkedin",
            FormField::Summary => "summary",
            FormField::Skills => "skills",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Value used when the input is blank. Skills have no single fallback string;
    /// see [`SKILL_PLACEHOLDERS`].
    pub fn fallback(self) -> &'static str {
        match self {
            FormField::FirstName => "John",
            FormField::LastName => "Doe",
            FormField::JobTitle => "Professional Title",
            FormField::Email => "john.doe@example.com",
            FormField::Phone => "(555) 123-4567",
            FormField::Location => "City, State",
            FormField::Linkedin => "LinkedIn Profile",
            FormField::Summary => {
                "Experienced professional with a strong background in delivering high-quality results and driving organizational success."
            }
            FormField::Skills => "",
        }
    }

    pub fn constraint(self) -> FieldConstraint {
        match self {
            FormField::Email => FieldConstraint::Email,
            _ => FieldConstraint::Text,
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Repeatable entry fields
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Experience,
    Education,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Experience => "experience",
            EntryKind::Education => "education",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "experience" => Some(EntryKind::Experience),
            "education" => Some(EntryKind::Education),
            _ => None,
        }
    }

    pub fn fields(self) -> &'static [EntryField] {
        match self {
            EntryKind::Experience => &[
                EntryField::ExpTitle,
                EntryField::ExpCompany,
                EntryField::ExpStartDate,
                EntryField::ExpEndDate,
                EntryField::ExpDescription,
            ],
            EntryKind::Education => &[
                EntryField::EduDegree,
                EntryField::EduField,
                EntryField::EduSchool,
                EntryField::EduYear,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    ExpTitle,
    ExpCompany,
    ExpStartDate,
    ExpEndDate,
    ExpDescription,
    EduDegree,
    EduField,
    EduSchool,
    EduYear,
}

impl EntryField {
    pub fn kind(self) -> EntryKind {
        match self {
            EntryField::ExpTitle
            | EntryField::ExpCompany
            | EntryField::ExpStartDate
            | EntryField::ExpEndDate
            | EntryField::ExpDescription => EntryKind::Experience,
            _ => EntryKind::Education,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EntryField::ExpTitle => "expTitle",
            EntryField::ExpCompany => "expCompany",
            EntryField::ExpStartDate => "expStartDate",
            EntryField::ExpEndDate => "expEndDate",
            EntryField::ExpDescription => "expDescription",
            EntryField::EduDegree => "eduDegree",
            EntryField::EduField => "eduField",
            EntryField::EduSchool => "eduSchool",
            EntryField::EduYear => "eduYear",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        EntryKind::Experience
            .fields()
            .iter()
            .chain(EntryKind::Education.fields())
            .copied()
            .find(|f| f.name() == name)
    }

    pub fn fallback(self) -> &'static str {
        match self {
            EntryField::ExpTitle => "Job Title",
            EntryField::ExpCompany => "Company Name",
            EntryField::ExpStartDate => "Start Date",
            EntryField::ExpEndDate => "End Date",
            EntryField::ExpDescription => "Job description and key achievements will appear here.",
            EntryField::EduDegree => "Degree",
            EntryField::EduField => "Field",
            EntryField::EduSchool => "School Name",
            EntryField::EduYear => "Year",
        }
    }

    /// Hint text shown in an empty input of a freshly added group.
    pub fn placeholder(self) -> &'static str {
        match self {
            EntryField::ExpTitle => "e.g., Senior Developer",
            EntryField::ExpCompany => "e.g., Tech Corp",
            EntryField::ExpStartDate => "e.g., Jan 2020",
            EntryField::ExpEndDate => "e.g., Present",
            EntryField::ExpDescription => {
                "Describe your key responsibilities and achievements..."
            }
            EntryField::EduDegree => "e.g., Bachelor of Science",
            EntryField::EduField => "e.g., Computer Science",
            EntryField::EduSchool => "e.g., University of Technology",
            EntryField::EduYear => "e.g., 2018",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(FormField::from_name(field.name()), Some(field));
        }
        assert_eq!(FormField::from_name("middleName"), None);
    }

    #[test]
    fn test_personal_fallbacks_are_non_empty() {
        for field in FormField::ALL.into_iter().filter(|f| *f != FormField::Skills) {
            assert!(!field.fallback().is_empty(), "{} has no fallback", field.name());
        }
    }

    #[test]
    fn test_required_set() {
        assert!(FormField::Email.is_required());
        assert!(FormField::JobTitle.is_required());
        assert!(!FormField::Phone.is_required());
        assert!(!FormField::Skills.is_required());
    }

    #[test]
    fn test_entry_fields_belong_to_their_kind() {
        for kind in [EntryKind::Experience, EntryKind::Education] {
            for field in kind.fields() {
                assert_eq!(field.kind(), kind);
                assert_eq!(EntryField::from_name(field.name()), Some(*field));
            }
        }
    }

    #[test]
    fn test_entry_kind_from_name() {
        assert_eq!(EntryKind::from_name("experience"), Some(EntryKind::Experience));
        assert_eq!(EntryKind::from_name("education"), Some(EntryKind::Education));
        assert_eq!(EntryKind::from_name("skills"), None);
    }
}
