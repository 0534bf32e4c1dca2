//! Stock custom validators for [`BuildOptions::with_validator`].
//!
//! [`BuildOptions::with_validator`]: crate::builder::BuildOptions::with_validator

use querycast_core::types::TypedValue;

use crate::PAGE_SIZE_PARAM;
use crate::validation::{Validation, field_error, with_param};

/// Reject a `page_size` above `max`.
pub fn max_page_size(max: u64) -> impl Fn(Validation) -> Validation + Send + Sync + 'static {
    move |validation: Validation| {
        let too_large = validation
            .get_change(PAGE_SIZE_PARAM)
            .and_then(TypedValue::as_i64)
            .is_some_and(|size| u64::try_from(size).is_ok_and(|size| size > max));
        if !too_large {
            return validation;
        }
        let error = with_param(
            field_error(
                "less_than_or_equal_to",
                format!("must be less than or equal to {max}"),
            ),
            "number",
            &max,
        );
        validation.with_error(PAGE_SIZE_PARAM, error)
    }
}

/// Reject a string value on `field` longer than `max` characters.
pub fn max_length(
    field: &'static str,
    max: usize,
) -> impl Fn(Validation) -> Validation + Send + Sync + 'static {
    move |validation: Validation| {
        let length = validation
            .get_change(field)
            .and_then(TypedValue::as_str)
            .map(|s| s.chars().count());
        match length {
            Some(length) if length > max => {
                let error = with_param(
                    field_error("length", format!("should be at most {max} character(s)")),
                    "count",
                    &max,
                );
                validation.with_error(field, error)
            }
            _ => validation,
        }
    }
}

/// Run validators one after another.
pub fn all_of(
    validators: Vec<Box<dyn Fn(Validation) -> Validation + Send + Sync>>,
) -> impl Fn(Validation) -> Validation + Send + Sync + 'static {
    move |validation: Validation| validators.iter().fold(validation, |acc, validator| validator(acc))
}
