//! The query builder state and its mutation API.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};
use validator::ValidationError;

use querycast_core::traits::QueryRepository;
use querycast_core::types::{
    Filters, PageRequest, PaginationParams, ParamTypes, RawParams, Sort, SortClause,
    SortDirection, TypedValue,
};

use crate::cast::{SchemaCaster, TypedValueCaster, merge_reserved};
use crate::sort::{parse_sort, validate_sort};
use crate::validation::{FieldError, Validation, field_error, with_param};
use crate::{PAGE_PARAM, PAGE_SIZE_PARAM, SORT_PARAM, is_reserved};

/// Applies one field's typed value to a query.
pub type FilterFn<Q> = Arc<dyn Fn(Q, &TypedValue) -> Q + Send + Sync>;

/// Applies one field's sort direction to a query.
pub type SortFn<Q> = Arc<dyn Fn(Q, SortDirection) -> Q + Send + Sync>;

/// Post-cast hook that may append field errors.
pub type CustomValidator = Arc<dyn Fn(Validation) -> Validation + Send + Sync>;

/// Construction options.
#[derive(Clone)]
pub struct BuildOptions {
    /// Caster used on every (re)validation.
    pub caster: Arc<dyn TypedValueCaster>,
    /// Applied to every cast result, after the built-in passes.
    pub validator: Option<CustomValidator>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            caster: Arc::new(SchemaCaster),
            validator: None,
        }
    }
}

impl BuildOptions {
    /// Use a different caster.
    pub fn with_caster(mut self, caster: impl TypedValueCaster + 'static) -> Self {
        self.caster = Arc::new(caster);
        self
    }

    /// Install a custom validator.
    pub fn with_validator(
        mut self,
        validator: impl Fn(Validation) -> Validation + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

/// Typed filters, sort and pagination derived from request params, plus the
/// functions that turn them into a query.
///
/// The builder is a value: every mutation borrows `self` and returns a new
/// builder, so one state can be branched freely. Mutations that fail their
/// own validation keep the previous `filters`, `sort` and `pagination` and
/// only record the errors.
pub struct QueryBuilder<R: QueryRepository> {
    pub(crate) repo: Arc<R>,
    pub(crate) base_query: R::Query,
    pub(crate) params: RawParams,
    pub(crate) param_types: ParamTypes,
    pub(crate) filters: Filters,
    pub(crate) filter_functions: BTreeMap<String, Vec<FilterFn<R::Query>>>,
    pub(crate) pagination: Option<PageRequest>,
    pub(crate) sort: Sort,
    pub(crate) sort_functions: BTreeMap<String, SortFn<R::Query>>,
    pub(crate) validation: Validation,
    caster: Arc<dyn TypedValueCaster>,
    validator: Option<CustomValidator>,
}

impl<R: QueryRepository> Clone for QueryBuilder<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            base_query: self.base_query.clone(),
            params: self.params.clone(),
            param_types: self.param_types.clone(),
            filters: self.filters.clone(),
            filter_functions: self.filter_functions.clone(),
            pagination: self.pagination,
            sort: self.sort.clone(),
            sort_functions: self.sort_functions.clone(),
            validation: self.validation.clone(),
            caster: Arc::clone(&self.caster),
            validator: self.validator.clone(),
        }
    }
}

impl<R: QueryRepository> fmt::Debug for QueryBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("params", &self.params)
            .field("param_types", &self.param_types)
            .field("filters", &self.filters)
            .field("filter_functions", &self.filter_functions.keys().collect::<Vec<_>>())
            .field("pagination", &self.pagination)
            .field("sort", &self.sort)
            .field("sort_functions", &self.sort_functions.keys().collect::<Vec<_>>())
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl<R: QueryRepository> QueryBuilder<R> {
    /// Build from request params with the default caster and no custom
    /// validator.
    pub fn new(
        repo: Arc<R>,
        base_query: R::Query,
        params: RawParams,
        param_types: ParamTypes,
    ) -> Self {
        Self::with_options(repo, base_query, params, param_types, BuildOptions::default())
    }

    /// Build from request params.
    pub fn with_options(
        repo: Arc<R>,
        base_query: R::Query,
        params: RawParams,
        param_types: ParamTypes,
        options: BuildOptions,
    ) -> Self {
        let empty = Self {
            repo,
            base_query,
            params: RawParams::new(),
            param_types: merge_reserved(param_types),
            filters: Filters::new(),
            filter_functions: BTreeMap::new(),
            pagination: None,
            sort: Sort::new(),
            sort_functions: BTreeMap::new(),
            validation: Validation::default(),
            caster: options.caster,
            validator: options.validator,
        };
        empty.rebuild(params)
    }

    /// Re-run the whole cast and validation pipeline over `params`.
    ///
    /// On success the derived filters, sort and pagination are replaced; on
    /// failure they are kept and only the validation result changes.
    pub fn rebuild(&self, params: RawParams) -> Self {
        let mut validation = self.caster.cast(&params, &self.param_types);

        let parsed_sort = parse_sort(params.get(SORT_PARAM));
        if let Err(err) = &parsed_sort {
            validation.push_error(SORT_PARAM, err.to_validation_error());
        }
        check_pagination_pair(&mut validation);

        if let Some(validator) = &self.validator {
            validation = validator(validation);
        }

        let mut next = self.clone();
        next.params = params;

        if validation.is_valid() {
            next.filters = validation
                .changes()
                .iter()
                .filter(|(field, _)| !is_reserved(field))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            next.pagination = pagination_from_changes(&validation);
            next.sort = parsed_sort.unwrap_or_default();
            trace!(
                filters = next.filters.len(),
                sort = next.sort.len(),
                paginated = next.pagination.is_some(),
                "Params validated"
            );
        } else {
            debug!(
                errors = validation.errors().len(),
                fields = ?validation.errors().iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "Params rejected; keeping previous filters, sort and pagination"
            );
        }

        next.validation = validation;
        next
    }

    /// Merge `partial` into the current filters, `partial` winning, and
    /// re-validate.
    pub fn put_filters<I, K, V>(&self, partial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<TypedValue>,
    {
        let mut merged = self.filters.clone();
        merged.extend(partial.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.rebuild(self.params_with_filters(&merged))
    }

    /// Merge `partial` into the current filters, existing filters winning,
    /// and re-validate.
    pub fn put_default_filters<I, K, V>(&self, partial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<TypedValue>,
    {
        let mut merged = self.filters.clone();
        for (field, value) in partial {
            merged.entry(field.into()).or_insert_with(|| value.into());
        }
        self.rebuild(self.params_with_filters(&merged))
    }

    /// Drop the filter on `field` and re-validate.
    pub fn remove_filter(&self, field: &str) -> Self {
        let mut remaining = self.filters.clone();
        remaining.remove(field);
        self.rebuild(self.params_with_filters(&remaining))
    }

    /// Replace the sort with programmatic `(direction, field)` pairs.
    ///
    /// Previous sort errors are cleared first. On failure the current sort
    /// is kept, the pending sort change is dropped and the error recorded.
    pub fn put_sort<I, D, F>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, F)>,
        D: AsRef<str>,
        F: AsRef<str>,
    {
        let mut next = self.clone();
        next.validation.clear_errors(SORT_PARAM);

        match validate_sort(pairs) {
            Ok(sort) => {
                next.validation
                    .put_change(SORT_PARAM, TypedValue::Json(sort.to_wire()));
                next.sort = sort;
            }
            Err(err) => {
                debug!(code = err.code(), index = ?err.index(), "Sort rejected");
                next.validation.delete_change(SORT_PARAM);
                next.validation
                    .push_error(SORT_PARAM, err.to_validation_error());
            }
        }
        next
    }

    /// [`put_sort`](Self::put_sort) for typed clauses.
    pub fn put_sort_clauses(&self, clauses: &[SortClause]) -> Self {
        self.put_sort(
            clauses
                .iter()
                .map(|clause| (clause.direction.as_str(), clause.field.as_str())),
        )
    }

    /// Empty the sort and drop any pending sort change.
    pub fn clear_sort(&self) -> Self {
        let mut next = self.clone();
        next.sort = Sort::new();
        next.validation.delete_change(SORT_PARAM);
        next
    }

    /// Append a clause and re-validate the sort.
    pub fn add_sort(&self, field: &str, direction: SortDirection) -> Self {
        let mut clauses = self.sort.clauses().to_vec();
        clauses.push(SortClause::new(direction, field));
        self.put_sort_clauses(&clauses)
    }

    /// Drop every clause on `field` and re-validate the sort.
    pub fn remove_sort(&self, field: &str) -> Self {
        let clauses: Vec<SortClause> = self
            .sort
            .iter()
            .filter(|clause| clause.field != field)
            .cloned()
            .collect();
        self.put_sort_clauses(&clauses)
    }

    /// Use `default` only when no sort is set.
    pub fn put_default_sort(&self, default: &[SortClause]) -> Self {
        if self.sort.is_empty() {
            self.put_sort_clauses(default)
        } else {
            self.clone()
        }
    }

    /// Append the clauses of `default` whose field is not sorted on yet,
    /// keeping the current clauses first and untouched.
    pub fn merge_default_sort(&self, default: &[SortClause]) -> Self {
        let mut clauses = self.sort.clauses().to_vec();
        for clause in default {
            if !clauses.iter().any(|existing| existing.field == clause.field) {
                clauses.push(clause.clone());
            }
        }
        self.put_sort_clauses(&clauses)
    }

    /// Set or clear pagination.
    ///
    /// Empty input clears it. Complete input is checked like params are:
    /// each value must be at least 1 and fit an `i64`, and the custom
    /// validator sees the new values. A half-filled or rejected input is
    /// recorded as an error and changes nothing.
    pub fn put_pagination(&self, pagination: PaginationParams) -> Self {
        let mut next = self.clone();
        next.validation.clear_errors(PAGE_PARAM);
        next.validation.clear_errors(PAGE_SIZE_PARAM);

        match (pagination.page, pagination.page_size) {
            (None, None) => {
                next.pagination = None;
                next.validation.delete_change(PAGE_PARAM);
                next.validation.delete_change(PAGE_SIZE_PARAM);
            }
            (Some(page), Some(page_size)) => {
                let checked = [(PAGE_PARAM, page), (PAGE_SIZE_PARAM, page_size)]
                    .map(|(field, value)| (field, check_page_value(value)));
                let accepted = match checked {
                    [(_, Ok(page_value)), (_, Ok(size_value))] => {
                        let errors = self.custom_pagination_errors(page_value, size_value);
                        if errors.is_empty() {
                            Ok((page_value, size_value))
                        } else {
                            Err(errors)
                        }
                    }
                    _ => Err(checked
                        .into_iter()
                        .filter_map(|(field, result)| {
                            result.err().map(|error| FieldError {
                                field: field.to_string(),
                                error,
                            })
                        })
                        .collect()),
                };

                match accepted {
                    Ok((page_value, size_value)) => {
                        next.pagination = Some(PageRequest::new(page, page_size));
                        next.validation
                            .put_change(PAGE_PARAM, TypedValue::Integer(page_value));
                        next.validation
                            .put_change(PAGE_SIZE_PARAM, TypedValue::Integer(size_value));
                    }
                    Err(errors) => {
                        debug!(page, page_size, errors = errors.len(), "Pagination rejected");
                        for FieldError { field, error } in errors {
                            next.validation.push_error(field, error);
                        }
                    }
                }
            }
            (Some(_), None) => {
                debug!("Pagination rejected: page_size missing");
                next.validation
                    .push_error(PAGE_SIZE_PARAM, partial_pagination_error(PAGE_PARAM));
            }
            (None, Some(_)) => {
                debug!("Pagination rejected: page missing");
                next.validation
                    .push_error(PAGE_PARAM, partial_pagination_error(PAGE_SIZE_PARAM));
            }
        }
        next
    }

    /// Fill pagination fields that are not set from `defaults`. Fields
    /// already set always win.
    pub fn put_default_pagination(&self, defaults: PaginationParams) -> Self {
        self.put_pagination(PaginationParams::from(self.pagination).or(defaults))
    }

    /// Remove pagination.
    pub fn clear_pagination(&self) -> Self {
        self.put_pagination(PaginationParams::none())
    }

    /// Register `function` as the only filter function for `field`.
    pub fn put_filter_function(
        &self,
        field: impl Into<String>,
        function: impl Fn(R::Query, &TypedValue) -> R::Query + Send + Sync + 'static,
    ) -> Self {
        let mut next = self.clone();
        next.filter_functions
            .insert(field.into(), vec![Arc::new(function)]);
        next
    }

    /// Append `function` to the chain for `field`. Chained functions run in
    /// registration order.
    pub fn add_filter_function(
        &self,
        field: impl Into<String>,
        function: impl Fn(R::Query, &TypedValue) -> R::Query + Send + Sync + 'static,
    ) -> Self {
        let mut next = self.clone();
        next.filter_functions
            .entry(field.into())
            .or_default()
            .push(Arc::new(function));
        next
    }

    /// Unregister every filter function for `field`.
    pub fn remove_filter_function(&self, field: &str) -> Self {
        let mut next = self.clone();
        next.filter_functions.remove(field);
        next
    }

    /// Register the sort function for `field`, replacing any previous one.
    pub fn put_sort_function(
        &self,
        field: impl Into<String>,
        function: impl Fn(R::Query, SortDirection) -> R::Query + Send + Sync + 'static,
    ) -> Self {
        let mut next = self.clone();
        next.sort_functions.insert(field.into(), Arc::new(function));
        next
    }

    /// Unregister the sort function for `field`; the default ordering is
    /// used again.
    pub fn remove_sort_function(&self, field: &str) -> Self {
        let mut next = self.clone();
        next.sort_functions.remove(field);
        next
    }

    /// The repository fetches run against.
    pub fn repo(&self) -> &Arc<R> {
        &self.repo
    }

    /// The query every composition starts from.
    pub fn base_query(&self) -> &R::Query {
        &self.base_query
    }

    /// The raw params of the last full validation.
    pub fn params(&self) -> &RawParams {
        &self.params
    }

    /// Declared types, reserved fields included.
    pub fn param_types(&self) -> &ParamTypes {
        &self.param_types
    }

    /// Typed filters.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Current sort.
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Current pagination.
    pub fn pagination(&self) -> Option<PageRequest> {
        self.pagination
    }

    /// The full validation result.
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Every recorded error.
    pub fn errors(&self) -> &[FieldError] {
        self.validation.errors()
    }

    /// Whether no error is recorded.
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// Whether any error is recorded.
    pub fn has_errors(&self) -> bool {
        !self.validation.is_valid()
    }

    /// Whether an error is attached to `field`.
    pub fn has_error(&self, field: &str) -> bool {
        self.validation.has_error(field)
    }

    /// The first error attached to `field`.
    pub fn get_error(&self, field: &str) -> Option<&ValidationError> {
        self.validation.get_error(field)
    }

    /// Whether `field` failed to cast to its declared type.
    pub fn is_invalid(&self, field: &str) -> bool {
        self.validation.is_cast_error(field)
    }

    /// Number of filter functions chained on `field`.
    pub fn filter_function_count(&self, field: &str) -> usize {
        self.filter_functions.get(field).map_or(0, Vec::len)
    }

    /// Whether a custom sort function is registered for `field`.
    pub fn has_sort_function(&self, field: &str) -> bool {
        self.sort_functions.contains_key(field)
    }

    /// Errors the custom validator raises on `page`/`page_size` when the
    /// current changes carry the given pagination.
    fn custom_pagination_errors(&self, page: i64, page_size: i64) -> Vec<FieldError> {
        let Some(validator) = &self.validator else {
            return Vec::new();
        };
        let mut candidate = Validation::new(self.params.clone());
        for (field, value) in self.validation.changes() {
            candidate.put_change(field.clone(), value.clone());
        }
        candidate.put_change(PAGE_PARAM, TypedValue::Integer(page));
        candidate.put_change(PAGE_SIZE_PARAM, TypedValue::Integer(page_size));

        validator(candidate)
            .errors()
            .iter()
            .filter(|e| e.field == PAGE_PARAM || e.field == PAGE_SIZE_PARAM)
            .cloned()
            .collect()
    }

    /// Params that re-create the current sort and pagination around the
    /// given filters.
    fn params_with_filters(&self, filters: &Filters) -> RawParams {
        let mut params: RawParams = filters
            .iter()
            .map(|(field, value)| (field.clone(), value.to_raw()))
            .collect();
        if !self.sort.is_empty() {
            params.insert(SORT_PARAM.to_string(), self.sort.to_wire());
        }
        if let Some(page) = self.pagination {
            params.insert(PAGE_PARAM.to_string(), Value::from(page.page));
            params.insert(PAGE_SIZE_PARAM.to_string(), Value::from(page.page_size));
        }
        params
    }
}

/// Flag a page/page_size pair where only one side was supplied. Fields that
/// already failed to cast are left alone.
fn check_pagination_pair(validation: &mut Validation) {
    if validation.has_error(PAGE_PARAM) || validation.has_error(PAGE_SIZE_PARAM) {
        return;
    }
    let page = validation.get_change(PAGE_PARAM).is_some();
    let page_size = validation.get_change(PAGE_SIZE_PARAM).is_some();
    match (page, page_size) {
        (true, false) => {
            validation.push_error(PAGE_SIZE_PARAM, partial_pagination_error(PAGE_PARAM));
        }
        (false, true) => {
            validation.push_error(PAGE_PARAM, partial_pagination_error(PAGE_SIZE_PARAM));
        }
        _ => {}
    }
}

fn pagination_from_changes(validation: &Validation) -> Option<PageRequest> {
    let page = validation.get_change(PAGE_PARAM)?.as_i64()?;
    let page_size = validation.get_change(PAGE_SIZE_PARAM)?.as_i64()?;
    Some(PageRequest::new(
        u64::try_from(page).ok()?,
        u64::try_from(page_size).ok()?,
    ))
}

fn partial_pagination_error(present: &'static str) -> ValidationError {
    with_param(
        field_error(
            "partial_pagination",
            format!("is required when {present} is given"),
        ),
        "given",
        &present,
    )
}

fn greater_than_error(bound: u64) -> ValidationError {
    with_param(
        field_error("greater_than", format!("must be greater than {bound}")),
        "number",
        &bound,
    )
}

/// A page number or size must be at least 1 and representable as a cast
/// integer, so that re-submitting it as a param round-trips.
fn check_page_value(value: u64) -> Result<i64, ValidationError> {
    match i64::try_from(value) {
        Ok(0) => Err(greater_than_error(0)),
        Ok(value) => Ok(value),
        Err(_) => Err(with_param(
            field_error(
                "less_than_or_equal_to",
                format!("must be less than or equal to {}", i64::MAX),
            ),
            "number",
            &i64::MAX,
        )),
    }
}
