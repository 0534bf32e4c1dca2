//! In-memory queryable.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use querycast_core::traits::Queryable;
use querycast_core::types::{FilterField, FilterOp, SortDirection, TypedValue};

use crate::record::Record;

/// Predicate evaluated against each record.
pub type MemoryPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Accumulated predicates and ordering clauses.
pub struct MemoryQuery<T> {
    predicates: Vec<MemoryPredicate<T>>,
    order: Vec<(String, SortDirection)>,
}

impl<T> MemoryQuery<T> {
    /// A query matching every record, unordered.
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Number of predicates applied.
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Ordering clauses, highest priority first.
    pub fn ordering(&self) -> &[(String, SortDirection)] {
        &self.order
    }

    /// Whether a record satisfies every predicate.
    pub fn matches(&self, record: &T) -> bool {
        self.predicates.iter().all(|predicate| predicate(record))
    }
}

impl<T: Record + 'static> MemoryQuery<T> {
    /// Add a backend-neutral filter condition.
    pub fn where_field(self, condition: FilterField) -> Self {
        self.filter(Arc::new(move |record: &T| field_matches(record, &condition)))
    }

    /// Compare two records by the ordering clauses.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.order
            .iter()
            .map(|(field, direction)| compare_values(a.field(field), b.field(field), *direction))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Filter then order `records`. The sort is stable, so records that
    /// compare equal keep their input order.
    pub fn run(&self, records: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        let mut matched: Vec<T> = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        if !self.order.is_empty() {
            matched.sort_by(|a, b| self.compare(a, b));
        }
        matched
    }
}

impl<T> Default for MemoryQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryQuery<T> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            order: self.order.clone(),
        }
    }
}

impl<T> fmt::Debug for MemoryQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("predicates", &self.predicates.len())
            .field("order", &self.order)
            .finish()
    }
}

impl<T: Record + 'static> Queryable for MemoryQuery<T> {
    type Predicate = MemoryPredicate<T>;

    fn filter(mut self, predicate: Self::Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order.push((field.to_string(), direction));
        self
    }
}

/// Order two possibly-null values. Null placement follows the direction;
/// values of incomparable types are treated as equal.
fn compare_values(a: Option<TypedValue>, b: Option<TypedValue>, direction: SortDirection) -> Ordering {
    let null_order = if direction.nulls_first() {
        Ordering::Less
    } else {
        Ordering::Greater
    };
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => null_order,
        (Some(_), None) => null_order.reverse(),
        (Some(a), Some(b)) => {
            let ordering = a.compare(&b).unwrap_or(Ordering::Equal);
            if direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

fn field_matches<T: Record>(record: &T, condition: &FilterField) -> bool {
    let actual = record.field(&condition.field);
    match condition.op {
        FilterOp::IsNull => actual.is_none(),
        FilterOp::IsNotNull => actual.is_some(),
        FilterOp::In => match (&actual, &condition.value) {
            (Some(actual), TypedValue::List(options)) => options
                .iter()
                .any(|option| actual.compare(option) == Some(Ordering::Equal)),
            _ => false,
        },
        FilterOp::Contains => match (&actual, &condition.value) {
            (Some(TypedValue::String(haystack)), TypedValue::String(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        },
        op => {
            let Some(ordering) = actual.and_then(|actual| actual.compare(&condition.value)) else {
                return false;
            };
            match op {
                FilterOp::Eq => ordering == Ordering::Equal,
                FilterOp::Ne => ordering != Ordering::Equal,
                FilterOp::Gt => ordering == Ordering::Greater,
                FilterOp::Gte => ordering != Ordering::Less,
                FilterOp::Lt => ordering == Ordering::Less,
                FilterOp::Lte => ordering != Ordering::Greater,
                _ => false,
            }
        }
    }
}
