//! Builders for the few SOQL statements the scanner issues.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::CrmError;

/// Accepts API names made of ASCII letters, digits and underscores, starting
/// with a letter. Anything else never reaches a query string.
pub fn validate_object_name(name: &str) -> Result<&str, CrmError> {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());

    if starts_with_letter && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(CrmError::InvalidObjectName {
            message: "expected [A-Za-z][A-Za-z0-9_]*".into(),
            context: Some(name.to_owned().into()),
        })
    }
}

/// SOQL datetime literal (`2024-01-31T12:00:00Z`), unquoted.
#[must_use]
pub fn datetime_literal(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `SELECT Id FROM <object> WHERE LastModifiedDate >= <since> LIMIT 1`
pub fn existence_query(object: &str, since: DateTime<Utc>) -> Result<String, CrmError> {
    let object = validate_object_name(object)?;
    Ok(format!(
        "SELECT Id FROM {object} WHERE LastModifiedDate >= {} LIMIT 1",
        datetime_literal(since)
    ))
}
