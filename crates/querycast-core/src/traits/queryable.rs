//! The capability a backend query value must expose to be composed.

use crate::types::sorting::SortDirection;

/// A composable, immutable query value.
///
/// Both operations consume the value and return an extended one; a
/// queryable is never mutated behind a caller's back. Backends decide what
/// a predicate looks like.
pub trait Queryable: Clone + Send + Sync + 'static {
    /// Backend-specific predicate type.
    type Predicate;

    /// Extend the query with a filter predicate.
    fn filter(self, predicate: Self::Predicate) -> Self;

    /// Extend the query with an ordering clause. Clauses added earlier take
    /// precedence over clauses added later.
    fn order_by(self, field: &str, direction: SortDirection) -> Self;
}
