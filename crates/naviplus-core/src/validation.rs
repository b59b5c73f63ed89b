//! Field-level payload validation.
//!
//! Every rule records its failures into a [`FieldErrors`] map keyed by the
//! wire name of the field, so a single response can list all invalid fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::AppError;

/// Length limit for names, labels, and locations.
pub const MAX_TEXT_LEN: usize = 255;

/// Length limit for `disability_type`.
pub const MAX_DISABILITY_TYPE_LEN: usize = 100;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";

/// Validation messages grouped by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Turn the outcome of a validation pass into a result.
    ///
    /// Recorded errors win over `value`. With no errors recorded, a missing
    /// value means a rule dropped a field without saying why.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, AppError> {
        if !self.is_empty() {
            return Err(AppError::Validation(self));
        }
        value.ok_or_else(|| AppError::Generic("validation produced no value".into()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

pub fn too_long(max_len: usize) -> String {
    format!("Ensure this field has no more than {max_len} characters.")
}

/// Message for a reference field whose primary key matches no row.
pub fn invalid_pk(id: i64) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// Validate a required, non-blank string. Returns the value only when it passed.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) if v.trim().is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(v) => check_len(errors, field, v, max_len),
    }
}

/// Validate an optional string; only the length rule applies.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    value.and_then(|v| check_len(errors, field, v, max_len))
}

/// Validate a required reference id. Existence is checked against the store by the caller.
pub fn required_ref(errors: &mut FieldErrors, field: &str, value: Option<i64>) -> Option<i64> {
    if value.is_none() {
        errors.add(field, REQUIRED);
    }
    value
}

fn check_len(errors: &mut FieldErrors, field: &str, value: String, max_len: usize) -> Option<String> {
    if value.chars().count() > max_len {
        errors.add(field, too_long(max_len));
        None
    } else {
        Some(value)
    }
}
