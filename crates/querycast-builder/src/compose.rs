//! Reduction of a builder into a single query.

use querycast_core::traits::{QueryRepository, Queryable};
use tracing::trace;

use crate::builder::QueryBuilder;

impl<R: QueryRepository> QueryBuilder<R> {
    /// Compose the query.
    ///
    /// Starting from the base query, every filter is passed through its
    /// field's function chain (fields without functions are skipped), in
    /// field-name order. Sort clauses follow in sort order, each through
    /// its field's sort function or, without one, `order_by`.
    ///
    /// Runs whether or not the builder is valid.
    pub fn query(&self) -> R::Query {
        let mut query = self.base_query.clone();

        for (field, value) in &self.filters {
            let Some(chain) = self.filter_functions.get(field) else {
                trace!(field = %field, "No filter function registered; skipping");
                continue;
            };
            for function in chain {
                query = function(query, value);
            }
        }

        for clause in &self.sort {
            query = match self.sort_functions.get(&clause.field) {
                Some(function) => function(query, clause.direction),
                None => query.order_by(&clause.field, clause.direction),
            };
        }

        query
    }
}
