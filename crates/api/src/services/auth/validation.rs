//! Registration input rules.
//!
//! Every rule is checked and all failures are reported together, so a
//! client can show them next to the right fields in one round trip.
//! Uniqueness is checked separately against the database.

use serde::Serialize;

use restore_core::{BuyerId, Email};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Characters allowed in a user name.
const USER_NAME_EXTRA_CHARS: &str = "-._@+";

/// One rejected registration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Request field the issue is about.
    pub field: &'static str,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub description: String,
}

impl ValidationIssue {
    fn new(field: &'static str, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            field,
            code,
            description: description.into(),
        }
    }

    pub(crate) fn duplicate_user_name(user_name: &str) -> Self {
        Self::new(
            "username",
            "DuplicateUserName",
            format!("Username '{user_name}' is already taken."),
        )
    }

    pub(crate) fn duplicate_email(email: &Email) -> Self {
        Self::new(
            "email",
            "DuplicateEmail",
            format!("Email '{email}' is already taken."),
        )
    }
}

/// Check user name, email and password shape.
///
/// Returns the parsed email when it is valid, plus every issue found.
#[must_use]
pub fn validate_registration(
    user_name: &str,
    email: &str,
    password: &str,
) -> (Option<Email>, Vec<ValidationIssue>) {
    let mut issues = validate_user_name(user_name);

    let email = match Email::parse(email) {
        Ok(email) => Some(email),
        Err(_) => {
            issues.push(ValidationIssue::new(
                "email",
                "InvalidEmail",
                format!("Email '{email}' is invalid."),
            ));
            None
        }
    };

    issues.extend(validate_password(password));
    (email, issues)
}

fn validate_user_name(user_name: &str) -> Vec<ValidationIssue> {
    let valid = !user_name.is_empty()
        && user_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || USER_NAME_EXTRA_CHARS.contains(c));

    if !valid {
        return vec![ValidationIssue::new(
            "username",
            "InvalidUserName",
            format!("Username '{user_name}' is invalid, can only contain letters or digits."),
        )];
    }

    // Anonymous basket ids share the buyer id space
    if BuyerId::looks_anonymous(user_name) {
        return vec![ValidationIssue::new(
            "username",
            "InvalidUserName",
            format!("Username '{user_name}' is reserved."),
        )];
    }

    Vec::new()
}

/// Check password strength. All failing rules are reported.
#[must_use]
pub fn validate_password(password: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        issues.push(ValidationIssue::new(
            "password",
            "PasswordTooShort",
            format!("Passwords must be at least {MIN_PASSWORD_LENGTH} characters."),
        ));
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        issues.push(ValidationIssue::new(
            "password",
            "PasswordRequiresNonAlphanumeric",
            "Passwords must have at least one non alphanumeric character.",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push(ValidationIssue::new(
            "password",
            "PasswordRequiresDigit",
            "Passwords must have at least one digit ('0'-'9').",
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        issues.push(ValidationIssue::new(
            "password",
            "PasswordRequiresLower",
            "Passwords must have at least one lowercase ('a'-'z').",
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        issues.push(ValidationIssue::new(
            "password",
            "PasswordRequiresUpper",
            "Passwords must have at least one uppercase ('A'-'Z').",
        ));
    }

    issues
}
