use tracing::info;

use crate::form::schema::{EntryField, EntryKind, FormField};
use crate::session::{Session, SessionError};

const PERSONAL: &[(FormField, &str)] = &[
    (FormField::FirstName, "Sarah"),
    (FormField::LastName, "Johnson"),
    (FormField::JobTitle, "Senior Software Engineer"),
    (FormField::Email, "sarah.johnson@email.com"),
    (FormField::Phone, "(555) 123-4567"),
    (FormField::Location, "San Francisco, CA"),
    (FormField::Linkedin, "linkedin.com/in/sarahjohnson"),
    (
        FormField::Summary,
        "Experienced software engineer with 8+ years of expertise in full-stack development, team leadership, and scalable system architecture. Proven track record of delivering high-quality solutions and mentoring junior developers.",
    ),
    (
        FormField::Skills,
        "JavaScript, React, Node.js, Python, AWS, Docker, MongoDB, PostgreSQL, Git, Agile",
    ),
];

const EXPERIENCE: &[&[(EntryField, &str)]] = &[
    &[
        (EntryField::ExpTitle, "Senior Software Engineer"),
        (EntryField::ExpCompany, "TechCorp Inc."),
        (EntryField::ExpStartDate, "Jan 2020"),
        (EntryField::ExpEndDate, "Present"),
        (
            EntryField::ExpDescription,
            "• Led development of microservices architecture serving 1M+ users\n• Mentored 5 junior developers and improved team productivity by 30%\n• Implemented CI/CD pipelines reducing deployment time by 50%",
        ),
    ],
    &[
        (EntryField::ExpTitle, "Software Engineer"),
        (EntryField::ExpCompany, "Innovatech Solutions"),
        (EntryField::ExpStartDate, "Jul 2015"),
        (EntryField::ExpEndDate, "Dec 2019"),
        (
            EntryField::ExpDescription,
            "• Developed scalable REST APIs and improved system reliability\n• Collaborated with cross-functional teams to deliver 10+ projects\n• Automated testing and deployment processes",
        ),
    ],
];

const EDUCATION: &[&[(EntryField, &str)]] = &[
    &[
        (EntryField::EduDegree, "Bachelor of Science"),
        (EntryField::EduField, "Computer Science"),
        (EntryField::EduSchool, "Stanford University"),
        (EntryField::EduYear, "2015"),
    ],
    &[
        (EntryField::EduDegree, "Master of Science"),
        (EntryField::EduField, "Software Engineering"),
        (EntryField::EduSchool, "UC Berkeley"),
        (EntryField::EduYear, "2017"),
    ],
];

/// Fills the form with a demonstration resume and projects it once.
pub fn seed(session: &mut Session) -> Result<(), SessionError> {
    for (field, value) in PERSONAL {
        session.input(*field, value.to_string())?;
    }

    for (kind, groups) in [
        (EntryKind::Experience, EXPERIENCE),
        (EntryKind::Education, EDUCATION),
    ] {
        for group in groups {
            let id = session.add_entry(kind);
            for (field, value) in group.iter() {
                session.entry_input(kind, id, *field, value.to_string())?;
            }
        }
    }

    session.refresh()?;
    info!("Seeded sample resume data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fills_every_section() {
        let mut session = Session::new().unwrap();
        seed(&mut session).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.personal.first_name, "Sarah");
        assert_eq!(snapshot.experience.len(), 2);
        assert_eq!(snapshot.education.len(), 2);
        assert_eq!(snapshot.skills.len(), 10);
        assert_eq!(snapshot.education[1].school, "UC Berkeley");
    }
}
