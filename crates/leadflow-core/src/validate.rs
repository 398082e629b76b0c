// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact-field format checks, applied before any persistence.

use crate::error::LeadflowError;

/// Validate a contact phone number: `+` followed by 10-15 digits.
pub fn validate_phone(phone: &str) -> Result<(), LeadflowError> {
    let Some(digits) = phone.strip_prefix('+') else {
        return Err(LeadflowError::Validation(format!(
            "phone `{phone}` must start with `+`"
        )));
    };
    if !(10..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(LeadflowError::Validation(format!(
            "phone `{phone}` must be `+` followed by 10-15 digits"
        )));
    }
    Ok(())
}

/// Validate a contact email address: a single `@`, non-empty local part,
/// and a non-empty domain containing a dot.
pub fn validate_email(email: &str) -> Result<(), LeadflowError> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => {
            return Err(LeadflowError::Validation(format!(
                "email `{email}` must contain exactly one `@`"
            )));
        }
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(LeadflowError::Validation(format!(
            "email `{email}` must have a non-empty local part and a dotted domain"
        )));
    }
    Ok(())
}
