//! The accumulated outcome of casting and validating a set of parameters.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationError;

use querycast_core::types::{RawParams, TypedValue};

/// Error code attached by the caster when a value cannot be coerced.
pub const CAST_CODE: &str = "cast";

/// A validation error scoped to one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// The parameter the error belongs to.
    pub field: String,
    /// Code, message and structured context.
    pub error: ValidationError,
}

/// Typed changes plus every error raised while producing them.
///
/// Validation passes only ever append errors; a result is valid exactly
/// when no pass appended anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    params: RawParams,
    changes: BTreeMap<String, TypedValue>,
    errors: Vec<FieldError>,
}

impl Validation {
    /// Start a validation over the given raw params.
    pub fn new(params: RawParams) -> Self {
        Self {
            params,
            changes: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// The raw params this result was produced from.
    pub fn params(&self) -> &RawParams {
        &self.params
    }

    /// Successfully cast values, keyed by field.
    pub fn changes(&self) -> &BTreeMap<String, TypedValue> {
        &self.changes
    }

    /// The cast value of `field`, if any.
    pub fn get_change(&self, field: &str) -> Option<&TypedValue> {
        self.changes.get(field)
    }

    /// Record a typed value for `field`.
    pub fn put_change(&mut self, field: impl Into<String>, value: TypedValue) {
        self.changes.insert(field.into(), value);
    }

    /// Drop any typed value recorded for `field`.
    pub fn delete_change(&mut self, field: &str) {
        self.changes.remove(field);
    }

    /// Every error, in the order it was added.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether no error has been recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether at least one error is attached to `field`.
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// The first error attached to `field`.
    pub fn get_error(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.error)
    }

    /// Whether `field` failed to cast to its declared type.
    pub fn is_cast_error(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.error.code == CAST_CODE)
    }

    /// Append an error for `field`.
    pub fn push_error(&mut self, field: impl Into<String>, error: ValidationError) {
        self.errors.push(FieldError {
            field: field.into(),
            error,
        });
    }

    /// Remove every error attached to `field`.
    pub fn clear_errors(&mut self, field: &str) {
        self.errors.retain(|e| e.field != field);
    }

    /// Builder-style [`push_error`](Self::push_error), handy in custom
    /// validators.
    pub fn with_error(mut self, field: impl Into<String>, error: ValidationError) -> Self {
        self.push_error(field, error);
        self
    }
}

/// Build a field error with a message and a `validation` context entry
/// naming the code.
pub fn field_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error.add_param(Cow::Borrowed("validation"), &code);
    error
}

/// Attach a context entry to an error.
pub fn with_param<T: Serialize>(
    mut error: ValidationError,
    name: &'static str,
    value: &T,
) -> ValidationError {
    error.add_param(Cow::Borrowed(name), value);
    error
}
