//! Boundary checks for user-supplied input.
//!
//! The store trusts whatever it is handed; every `Create*` input type runs
//! these checks in its `validate()` before a consumer passes it on.

use crate::error::ValidationError;

/// Minimum broker password length.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    non_empty(field, value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::new(field, format!("'{}' is not an email address", value))),
    }
}

pub fn web_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ValidationError::new(field, format!("'{}' is not a URL: {}", value, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

pub fn optional_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) => web_url(field, v),
        None => Ok(()),
    }
}

pub fn amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(field, "must be a non-negative amount"));
    }
    Ok(())
}

pub fn clock_time(field: &'static str, value: &str) -> Result<(), ValidationError> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::new(field, format!("'{}' is not HH:MM", value)))
}

pub fn password(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            field,
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}
