//! Input validation module

use crate::lexicon;
use crate::models::{Category, LoginRequest, NewComplaint, Role, Urgency};
use thiserror::Error;
use validator::Validate;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 5000;
pub const MAX_ADDRESS_LEN: usize = 500;
pub const MAX_ENTRY_LEN: usize = 2000;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' is too long (max {max} characters)")]
    TooLong { field: String, max: usize },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    /// Name of the offending field, if the error is about one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field } | ValidationError::TooLong { field, .. } => {
                Some(field)
            }
            ValidationError::InvalidEmail => Some("email"),
            ValidationError::UnknownDepartment(_) => Some("dept"),
            ValidationError::InvalidInput(_) => None,
        }
    }
}

/// Trim `value` and require it to be non-empty
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validate a complaint before it is filed.
///
/// Required fields are checked in a fixed order (title, description,
/// category, urgency, address) and the first missing one is reported.
/// Returns the selected category and urgency on success.
pub fn validate_new_complaint(
    input: &NewComplaint,
) -> Result<(Category, Urgency), ValidationError> {
    let title = require_text("title", &input.title)?;
    let description = require_text("description", &input.description)?;
    let category = input.category.ok_or_else(|| ValidationError::Required {
        field: "category".to_string(),
    })?;
    let urgency = input.urgency.ok_or_else(|| ValidationError::Required {
        field: "urgency".to_string(),
    })?;
    let address = require_text("address", &input.address)?;

    check_length("title", title, MAX_TITLE_LEN)?;
    check_length("description", description, MAX_DESCRIPTION_LEN)?;
    check_length("address", address, MAX_ADDRESS_LEN)?;

    Ok((category, urgency))
}

/// Validate the text of a progress update or internal note
pub fn validate_entry<'a>(field: &str, text: &'a str) -> Result<&'a str, ValidationError> {
    let text = require_text(field, text)?;
    check_length(field, text, MAX_ENTRY_LEN)?;
    Ok(text)
}

/// Validate a login request. Expects an already trimmed request.
pub fn validate_login(input: &LoginRequest) -> Result<(), ValidationError> {
    require_text("name", &input.name)?;
    require_text("email", &input.email)?;

    if let Err(errors) = input.validate() {
        let fields = errors.field_errors();
        if fields.contains_key("email") {
            return Err(ValidationError::InvalidEmail);
        }
        if fields.contains_key("name") {
            return Err(ValidationError::TooLong {
                field: "name".to_string(),
                max: 255,
            });
        }
        return Err(ValidationError::InvalidInput(errors.to_string()));
    }

    if input.role == Role::Staff {
        let dept = input
            .dept
            .as_deref()
            .ok_or_else(|| ValidationError::Required {
                field: "dept".to_string(),
            })?;
        if !lexicon::is_department(dept) {
            return Err(ValidationError::UnknownDepartment(dept.to_string()));
        }
    }

    Ok(())
}
