//! Sorting types.
//!
//! On the wire a sort is a list of one-key maps, `[{"field": "direction"}]`.
//! Internally each entry is held as a [`SortClause`] whose direction comes
//! first, matching the `order_by(direction, field)` convention of the
//! composed query. The swap is deliberate and preserved both ways.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction, including explicit null placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Ascending order, nulls before values.
    AscNullsFirst,
    /// Ascending order, nulls after values.
    AscNullsLast,
    /// Descending order.
    Desc,
    /// Descending order, nulls before values.
    DescNullsFirst,
    /// Descending order, nulls after values.
    DescNullsLast,
}

impl SortDirection {
    /// Every direction, in wire-token order.
    pub const ALL: [Self; 6] = [
        Self::Asc,
        Self::AscNullsFirst,
        Self::AscNullsLast,
        Self::Desc,
        Self::DescNullsFirst,
        Self::DescNullsLast,
    ];

    /// Return the wire token for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::AscNullsFirst => "asc_nulls_first",
            Self::AscNullsLast => "asc_nulls_last",
            Self::Desc => "desc",
            Self::DescNullsFirst => "desc_nulls_first",
            Self::DescNullsLast => "desc_nulls_last",
        }
    }

    /// Return the SQL fragment for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::AscNullsFirst => "ASC NULLS FIRST",
            Self::AscNullsLast => "ASC NULLS LAST",
            Self::Desc => "DESC",
            Self::DescNullsFirst => "DESC NULLS FIRST",
            Self::DescNullsLast => "DESC NULLS LAST",
        }
    }

    /// Whether values are ordered descending.
    pub fn is_descending(&self) -> bool {
        matches!(self, Self::Desc | Self::DescNullsFirst | Self::DescNullsLast)
    }

    /// Whether nulls sort before values.
    ///
    /// Plain `asc`/`desc` follow PostgreSQL: nulls compare as larger than
    /// any value, so they come last ascending and first descending.
    pub fn nulls_first(&self) -> bool {
        match self {
            Self::AscNullsFirst | Self::DescNullsFirst => true,
            Self::AscNullsLast | Self::DescNullsLast => false,
            Self::Asc => false,
            Self::Desc => true,
        }
    }

    /// Comma-separated list of every valid wire token.
    pub fn valid_tokens() -> String {
        Self::ALL
            .iter()
            .map(SortDirection::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the six direction tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for SortDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

/// A single `(direction, field)` ordering clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortClause {
    /// Sort direction.
    pub direction: SortDirection,
    /// Field name to sort by.
    pub field: String,
}

impl SortClause {
    /// Create a new sort clause.
    pub fn new(direction: SortDirection, field: impl Into<String>) -> Self {
        Self {
            direction,
            field: field.into(),
        }
    }

    /// Create an ascending clause on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(SortDirection::Asc, field)
    }

    /// Create a descending clause on the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(SortDirection::Desc, field)
    }
}

/// An ordered list of sort clauses. Position is priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort(Vec<SortClause>);

impl Sort {
    /// Create an empty sort.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Whether no clause is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrow the clauses in priority order.
    pub fn clauses(&self) -> &[SortClause] {
        &self.0
    }

    /// Iterate over the clauses in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, SortClause> {
        self.0.iter()
    }

    /// Whether any clause orders by `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|clause| clause.field == field)
    }

    /// Iterate as `(direction token, field)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0
            .iter()
            .map(|clause| (clause.direction.as_str(), clause.field.as_str()))
    }

    /// Render the wire form `[{"field": "direction"}, ...]`.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.0
                .iter()
                .map(|clause| {
                    let mut entry = serde_json::Map::new();
                    entry.insert(
                        clause.field.clone(),
                        serde_json::Value::String(clause.direction.as_str().to_string()),
                    );
                    serde_json::Value::Object(entry)
                })
                .collect(),
        )
    }

    /// Append a clause.
    pub fn push(&mut self, clause: SortClause) {
        self.0.push(clause);
    }

    /// Consume into the inner clause list.
    pub fn into_inner(self) -> Vec<SortClause> {
        self.0
    }
}

impl From<Vec<SortClause>> for Sort {
    fn from(clauses: Vec<SortClause>) -> Self {
        Self(clauses)
    }
}

impl FromIterator<SortClause> for Sort {
    fn from_iter<I: IntoIterator<Item = SortClause>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sort {
    type Item = &'a SortClause;
    type IntoIter = std::slice::Iter<'a, SortClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Sort {
    type Item = SortClause;
    type IntoIter = std::vec::IntoIter<SortClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
