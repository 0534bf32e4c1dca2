//! Coercion of raw parameters into typed values.
//!
//! The builder only relies on the [`TypedValueCaster`] contract; the
//! bundled [`SchemaCaster`] covers the JSON shapes produced by form and
//! query-string decoders.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;
use uuid::Uuid;

use querycast_core::types::{FieldType, ParamTypes, RawParams, TypedValue};

use crate::validation::{CAST_CODE, Validation, field_error, with_param};
use crate::{PAGE_PARAM, PAGE_SIZE_PARAM, SORT_PARAM};

/// Casts raw params against declared types.
///
/// Implementations must:
/// - cast only keys declared in `types`, ignoring the rest;
/// - record a field error with code [`CAST_CODE`] for a present key that
///   cannot be coerced;
/// - expose every successful cast through [`Validation::changes`].
pub trait TypedValueCaster: Send + Sync {
    /// Cast `params` against `types`.
    fn cast(&self, params: &RawParams, types: &ParamTypes) -> Validation;
}

/// The reserved parameter types. They are merged over caller types, so a
/// caller cannot redeclare them.
pub fn reserved_param_types() -> ParamTypes {
    ParamTypes::from([
        (SORT_PARAM.to_string(), FieldType::SortList),
        (PAGE_PARAM.to_string(), FieldType::PositiveInteger),
        (PAGE_SIZE_PARAM.to_string(), FieldType::PositiveInteger),
    ])
}

/// Merge the reserved parameter types into `types`.
pub fn merge_reserved(mut types: ParamTypes) -> ParamTypes {
    types.extend(reserved_param_types());
    types
}

/// Default caster.
///
/// `null` and `""` are treated as absent: no change and no error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCaster;

impl TypedValueCaster for SchemaCaster {
    fn cast(&self, params: &RawParams, types: &ParamTypes) -> Validation {
        let mut validation = Validation::new(params.clone());

        for (field, field_type) in types {
            let Some(raw) = params.get(field) else {
                continue;
            };
            match cast_value(raw, field_type) {
                Ok(Some(value)) => validation.put_change(field.clone(), value),
                Ok(None) => {}
                Err(failure) => {
                    trace!(field = %field, field_type = %field_type, "Cast failed");
                    let error = with_param(
                        field_error(CAST_CODE, failure.to_string()),
                        "type",
                        &field_type.name(),
                    );
                    validation.push_error(field.clone(), error);
                }
            }
        }

        validation
    }
}

/// A raw value that does not fit its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("is invalid")]
struct CastFailure;

/// Cast one raw value. `Ok(None)` means the value counts as absent.
fn cast_value(raw: &Value, field_type: &FieldType) -> Result<Option<TypedValue>, CastFailure> {
    if is_blank(raw) {
        return Ok(None);
    }

    let value = match field_type {
        FieldType::String => match raw {
            Value::String(s) => TypedValue::String(s.clone()),
            Value::Number(n) => TypedValue::String(n.to_string()),
            Value::Bool(b) => TypedValue::String(b.to_string()),
            _ => return Err(CastFailure),
        },
        FieldType::Integer => TypedValue::Integer(cast_integer(raw)?),
        FieldType::PositiveInteger => {
            let value = cast_integer(raw)?;
            if value < 1 {
                return Err(CastFailure);
            }
            TypedValue::Integer(value)
        }
        FieldType::Float => match raw {
            Value::Number(n) => TypedValue::Float(n.as_f64().ok_or(CastFailure)?),
            Value::String(s) => TypedValue::Float(s.trim().parse().map_err(|_| CastFailure)?),
            _ => return Err(CastFailure),
        },
        FieldType::Boolean => match raw {
            Value::Bool(b) => TypedValue::Boolean(*b),
            Value::String(s) => match s.as_str() {
                "true" | "1" => TypedValue::Boolean(true),
                "false" | "0" => TypedValue::Boolean(false),
                _ => return Err(CastFailure),
            },
            _ => return Err(CastFailure),
        },
        FieldType::Date => {
            let s = raw.as_str().ok_or(CastFailure)?;
            TypedValue::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CastFailure)?)
        }
        FieldType::DateTime => {
            let s = raw.as_str().ok_or(CastFailure)?;
            let parsed = DateTime::parse_from_rfc3339(s).map_err(|_| CastFailure)?;
            TypedValue::DateTime(parsed.with_timezone(&Utc))
        }
        FieldType::Uuid => {
            let s = raw.as_str().ok_or(CastFailure)?;
            TypedValue::Uuid(Uuid::parse_str(s).map_err(|_| CastFailure)?)
        }
        FieldType::Array(inner) => {
            let items = raw.as_array().ok_or(CastFailure)?;
            let cast = items
                .iter()
                .map(|item| cast_value(item, inner)?.ok_or(CastFailure))
                .collect::<Result<Vec<_>, CastFailure>>()?;
            TypedValue::List(cast)
        }
        FieldType::SortList | FieldType::Any => TypedValue::Json(raw.clone()),
    };

    Ok(Some(value))
}

fn cast_integer(raw: &Value) -> Result<i64, CastFailure> {
    match raw {
        Value::Number(n) => n.as_i64().ok_or(CastFailure),
        Value::String(s) => s.trim().parse().map_err(|_| CastFailure),
        _ => Err(CastFailure),
    }
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
