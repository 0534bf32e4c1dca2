//! Sort grammar.
//!
//! Two entry points share one error type:
//! - [`parse_sort`] reads the wire form `[{"field": "direction"}, ...]`;
//! - [`validate_sort`] checks programmatic `(direction, field)` pairs.
//!
//! Both run their checks category by category and report only the first
//! offending index of the first failing category. Fields are checked last,
//! with the same identifier rule on both paths, so any sort one path
//! accepts is accepted by the other.

use serde_json::Value;
use thiserror::Error;
use validator::ValidationError;

use querycast_core::types::{Sort, SortClause, SortDirection, is_identifier};

use crate::validation::{field_error, with_param};

/// Why a sort value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SortError {
    /// The sort parameter is present but not a list.
    #[error("must be a list")]
    NotAList,
    /// An element is not a map.
    #[error("clause at index {index} must be a map")]
    NotAMap {
        /// Offending position.
        index: usize,
    },
    /// An element does not have exactly one key.
    #[error("clause at index {index} must be a map with exactly one key")]
    NotAOneKeyMap {
        /// Offending position.
        index: usize,
    },
    /// An element's direction is not a known token.
    #[error(
        "clause at index {index} has an invalid direction, expected one of: {}",
        SortDirection::valid_tokens()
    )]
    InvalidDirection {
        /// Offending position.
        index: usize,
    },
    /// A clause names a field that is not an identifier.
    #[error("clause at index {index} has an invalid field")]
    InvalidField {
        /// Offending position.
        index: usize,
    },
}

impl SortError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAList => "not_a_list",
            Self::NotAMap { .. } => "not_a_map",
            Self::NotAOneKeyMap { .. } => "not_a_one_key_map",
            Self::InvalidDirection { .. } => "invalid_direction",
            Self::InvalidField { .. } => "invalid_field",
        }
    }

    /// The offending clause position, when the error concerns one clause.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::NotAList => None,
            Self::NotAMap { index }
            | Self::NotAOneKeyMap { index }
            | Self::InvalidDirection { index }
            | Self::InvalidField { index } => Some(*index),
        }
    }

    /// Convert into a field error for the `sort` parameter.
    pub fn to_validation_error(&self) -> ValidationError {
        let error = field_error(self.code(), self.to_string());
        match self.index() {
            Some(index) => with_param(error, "index", &index),
            None => error,
        }
    }
}

/// Parse the wire form. An absent or `null` value is an empty sort.
pub fn parse_sort(raw: Option<&Value>) -> Result<Sort, SortError> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(Sort::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(SortError::NotAList),
    };

    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(SortError::NotAMap { index });
    }

    let entries: Vec<(&String, &Value)> = items
        .iter()
        .enumerate()
        .map(|(index, item)| match item.as_object() {
            Some(map) if map.len() == 1 => map.iter().next().ok_or(SortError::NotAOneKeyMap { index }),
            _ => Err(SortError::NotAOneKeyMap { index }),
        })
        .collect::<Result<_, _>>()?;

    let directions = entries
        .iter()
        .enumerate()
        .map(|(index, (_, direction))| {
            direction
                .as_str()
                .and_then(|token| token.parse::<SortDirection>().ok())
                .ok_or(SortError::InvalidDirection { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(index) = entries.iter().position(|(field, _)| !is_identifier(field)) {
        return Err(SortError::InvalidField { index });
    }

    Ok(directions
        .into_iter()
        .zip(entries)
        .map(|(direction, (field, _))| SortClause::new(direction, field.clone()))
        .collect())
}

/// Validate programmatic `(direction, field)` pairs.
///
/// Directions are checked for every clause before any field is.
pub fn validate_sort<I, D, F>(pairs: I) -> Result<Sort, SortError>
where
    I: IntoIterator<Item = (D, F)>,
    D: AsRef<str>,
    F: AsRef<str>,
{
    let pairs: Vec<(D, F)> = pairs.into_iter().collect();

    let directions = pairs
        .iter()
        .enumerate()
        .map(|(index, (direction, _))| {
            direction
                .as_ref()
                .parse::<SortDirection>()
                .map_err(|_| SortError::InvalidDirection { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(index) = pairs.iter().position(|(_, field)| !is_identifier(field.as_ref())) {
        return Err(SortError::InvalidField { index });
    }

    Ok(directions
        .into_iter()
        .zip(pairs)
        .map(|(direction, (_, field))| SortClause::new(direction, field.as_ref()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_swaps_field_and_direction() {
        let sort = parse_sort(Some(&json!([{"birthdate": "desc"}, {"inserted_at": "asc"}])))
            .expect("valid sort");
        assert_eq!(
            sort.clauses(),
            &[SortClause::desc("birthdate"), SortClause::asc("inserted_at")]
        );
    }

    #[test]
    fn test_absent_sort_is_empty() {
        assert!(parse_sort(None).expect("empty").is_empty());
        assert!(parse_sort(Some(&Value::Null)).expect("empty").is_empty());
        assert!(parse_sort(Some(&json!([]))).expect("empty").is_empty());
    }

    #[test]
    fn test_not_a_list() {
        let err = parse_sort(Some(&json!(false))).unwrap_err();
        assert_eq!(err, SortError::NotAList);
        assert_eq!(err.index(), None);
        assert!(err.to_validation_error().params.get("index").is_none());
    }

    #[test]
    fn test_not_a_map_reports_first_index() {
        let err = parse_sort(Some(&json!([false, {"a": "x"}]))).unwrap_err();
        assert_eq!(err, SortError::NotAMap { index: 0 });
    }

    #[test]
    fn test_not_a_one_key_map() {
        let err = parse_sort(Some(&json!([{"a": "x", "b": "y"}]))).unwrap_err();
        assert_eq!(err, SortError::NotAOneKeyMap { index: 0 });

        let err = parse_sort(Some(&json!([{"a": "asc"}, {}]))).unwrap_err();
        assert_eq!(err, SortError::NotAOneKeyMap { index: 1 });
    }

    #[test]
    fn test_categories_checked_in_order() {
        // The two-key map comes first, but the map check runs over every
        // element before the key-count check does.
        let err = parse_sort(Some(&json!([{"a": "x", "b": "y"}, 3]))).unwrap_err();
        assert_eq!(err, SortError::NotAMap { index: 1 });

        let err = parse_sort(Some(&json!([{"a": "up"}, {"b": "c", "d": "e"}]))).unwrap_err();
        assert_eq!(err, SortError::NotAOneKeyMap { index: 1 });
    }

    #[test]
    fn test_invalid_direction_lists_valid_tokens() {
        let err = parse_sort(Some(&json!([{"a": "up"}]))).unwrap_err();
        assert_eq!(err, SortError::InvalidDirection { index: 0 });

        let message = err.to_string();
        for direction in SortDirection::ALL {
            assert!(message.contains(direction.as_str()), "missing {direction}");
        }

        let error = err.to_validation_error();
        assert_eq!(error.code, "invalid_direction");
        assert_eq!(error.params.get("index"), Some(&json!(0)));
        assert_eq!(error.params.get("validation"), Some(&json!("invalid_direction")));
    }

    #[test]
    fn test_non_string_direction_is_invalid() {
        let err = parse_sort(Some(&json!([{"a": "asc"}, {"b": 1}]))).unwrap_err();
        assert_eq!(err, SortError::InvalidDirection { index: 1 });
    }

    #[test]
    fn test_wire_field_must_be_identifier() {
        let err = parse_sort(Some(&json!([{"name": "asc"}, {"inserted-at": "asc"}]))).unwrap_err();
        assert_eq!(err, SortError::InvalidField { index: 1 });
        assert_eq!(err.to_validation_error().code, "invalid_field");

        // Directions are checked over every clause before any field.
        let err = parse_sort(Some(&json!([{"bad field": "asc"}, {"ok": "up"}]))).unwrap_err();
        assert_eq!(err, SortError::InvalidDirection { index: 1 });
    }

    #[test]
    fn test_parsed_sort_revalidates() {
        let sort = parse_sort(Some(&json!([{"user.name": "desc_nulls_last"}, {"id": "asc"}])))
            .expect("valid sort");
        assert_eq!(validate_sort(sort.pairs()), Ok(sort.clone()));
    }

    #[test]
    fn test_validate_pairs() {
        let sort = validate_sort([("desc_nulls_last", "score"), ("asc", "user.name")])
            .expect("valid pairs");
        assert_eq!(
            sort.clauses(),
            &[
                SortClause::new(SortDirection::DescNullsLast, "score"),
                SortClause::asc("user.name")
            ]
        );
    }

    #[test]
    fn test_validate_direction_before_field() {
        let err = validate_sort([("asc", "bad field"), ("sideways", "ok")]).unwrap_err();
        assert_eq!(err, SortError::InvalidDirection { index: 1 });

        let err = validate_sort([("asc", "ok"), ("desc", "9lives")]).unwrap_err();
        assert_eq!(err, SortError::InvalidField { index: 1 });
    }
}
