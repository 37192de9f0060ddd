use crate::models::RequesterDetails;

/// Checks the requester form before a booking is finalized.
pub trait RequesterValidator: Send + Sync {
    /// Returns one message per failing field.
    fn validate(&self, details: &RequesterDetails) -> Result<(), Vec<String>>;
}

/// Non-empty name and role, syntactically plausible email.
pub struct BasicValidator;

impl RequesterValidator for BasicValidator {
    fn validate(&self, details: &RequesterDetails) -> Result<(), Vec<String>> {
        let mut errors = vec![];

        if details.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if !is_valid_email(details.email.trim()) {
            errors.push("email is not valid".to_string());
        }
        if details.role.trim().is_empty() {
            errors.push("role is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
