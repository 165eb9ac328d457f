use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::form::schema::FormField;
use crate::form::FormState;

/// Format rule attached to an input, mirroring its HTML input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldConstraint {
    Text,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormValidation {
    pub passed: bool,
    pub invalid: Vec<FormField>,
}

/// A value is valid iff it satisfies its format constraint and is non-empty after trimming.
pub fn validate(value: &str, constraint: FieldConstraint) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    match constraint {
        FieldConstraint::Text => true,
        FieldConstraint::Email => is_well_formed_email(trimmed),
    }
}

/// Shape check for `type=email` inputs: `local@label(.label)*`.
pub fn is_well_formed_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c));

    let domain_ok = !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

    local_ok && domain_ok
}

/// Validates one field and toggles the error state on its form group.
pub fn validate_field(form: &mut FormState, field: FormField) -> bool {
    let valid = validate(form.value(field), field.constraint());
    form.set_error(field, !valid);
    debug!("Validated {}: {}", field.name(), valid);
    valid
}

/// Validates every required field. Every field is checked even after the first failure
/// so each group gets its error state.
pub fn validate_form(form: &mut FormState) -> FormValidation {
    let invalid: Vec<FormField> = FormField::REQUIRED
        .into_iter()
        .filter(|field| !validate_field(form, *field))
        .collect();

    FormValidation {
        passed: invalid.is_empty(),
        invalid,
    }
}
