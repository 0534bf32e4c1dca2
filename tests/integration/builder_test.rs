//! Builder state properties, exercised through the public facade.

mod helpers;

use serde_json::json;

use querycast::memory::MemoryQuery;
use querycast::traits::Queryable;
use querycast::types::FilterField;
use querycast::{PageRequest, PaginationParams, SortClause, SortDirection, TypedValue};

use helpers::{Person, names, people, people_builder};

#[test]
fn test_filters_are_exactly_the_typed_non_reserved_params() {
    let builder = people_builder(json!({
        "search": "club",
        "age": "42",
        "unknown": "ignored",
        "page": "2",
        "page_size": "10"
    }));

    assert!(builder.is_valid());
    let fields: Vec<&str> = builder.filters().keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["age", "search"]);
    assert_eq!(builder.filters()["age"], TypedValue::Integer(42));
    assert_eq!(builder.filters()["search"], TypedValue::from("club"));
    assert_eq!(builder.pagination(), Some(PageRequest::new(2, 10)));
}

#[test]
fn test_wire_sort_is_swapped_and_stable_under_resubmission() {
    let builder = people_builder(json!({"sort": [{"a": "asc"}, {"b": "desc"}]}));
    let expected = [SortClause::asc("a"), SortClause::desc("b")];
    assert_eq!(builder.sort().clauses(), &expected);

    let once = builder.put_sort(builder.sort().pairs());
    let twice = once.put_sort(once.sort().pairs());
    assert_eq!(once.sort().clauses(), &expected);
    assert_eq!(twice.sort(), once.sort());
    assert_eq!(
        twice.validation().get_change("sort"),
        Some(&TypedValue::Json(json!([{"a": "asc"}, {"b": "desc"}])))
    );
}

#[test]
fn test_put_default_sort_only_fills_an_empty_sort() {
    let default = [SortClause::desc("age"), SortClause::asc("name")];

    let empty = people_builder(json!({}));
    assert_eq!(empty.put_default_sort(&default).sort().clauses(), &default);

    let sorted = people_builder(json!({"sort": [{"name": "desc"}]}));
    let kept = sorted.put_default_sort(&default);
    assert_eq!(kept.sort(), sorted.sort());
}

#[test]
fn test_merge_default_sort_appends_missing_fields_only() {
    let builder = people_builder(json!({})).put_sort([("desc", "x")]);
    let merged = builder.merge_default_sort(&[SortClause::asc("x"), SortClause::desc("y")]);
    assert_eq!(
        merged.sort().clauses(),
        &[SortClause::desc("x"), SortClause::desc("y")]
    );
}

#[test]
fn test_put_pagination_sets_and_clears() {
    let builder = people_builder(json!({"page": "5", "page_size": "5"}));

    let set = builder.put_pagination(PaginationParams::new(3, 20));
    assert_eq!(set.pagination(), Some(PageRequest::new(3, 20)));

    let cleared = set.put_pagination(PaginationParams::none());
    assert_eq!(cleared.pagination(), None);
    assert_eq!(builder.put_pagination(PaginationParams::default()).pagination(), None);
}

#[test]
fn test_put_default_pagination_never_overrides() {
    let builder = people_builder(json!({})).put_pagination(PaginationParams::new(3, 20));
    let defaulted = builder.put_default_pagination(PaginationParams::new(1, 50));
    assert_eq!(defaulted.pagination(), Some(PageRequest::new(3, 20)));

    let filled = people_builder(json!({})).put_default_pagination(PaginationParams::new(1, 50));
    assert_eq!(filled.pagination(), Some(PageRequest::new(1, 50)));
}

#[test]
fn test_partial_pagination_is_an_error() {
    let builder = people_builder(json!({"page": "2"}));
    assert!(builder.has_errors());
    assert_eq!(
        builder.get_error("page_size").map(|e| &*e.code),
        Some("partial_pagination")
    );
    assert_eq!(builder.pagination(), None);
}

#[test]
fn test_invalid_wire_sorts() {
    let cases = [
        (json!([false, {"a": "x"}]), "not_a_map", Some(0)),
        (json!([{"a": "x", "b": "y"}]), "not_a_one_key_map", Some(0)),
        (json!([{"a": "up"}]), "invalid_direction", Some(0)),
        (json!(true), "not_a_list", None),
    ];

    for (sort, code, index) in cases {
        let builder = people_builder(json!({ "sort": sort }));
        let error = builder.get_error("sort").expect("sort error recorded");
        assert_eq!(error.code, code, "for {sort}");
        assert_eq!(
            error.params.get("index").and_then(|v| v.as_u64()),
            index,
            "for {sort}"
        );
        assert!(builder.sort().is_empty());
    }
}

#[test]
fn test_rejected_sort_keeps_the_previous_one() {
    let builder = people_builder(json!({"sort": [{"name": "asc"}]}));
    let rejected = builder.put_sort([("sideways", "name")]);

    assert_eq!(rejected.sort(), builder.sort());
    assert!(rejected.has_error("sort"));
    assert_eq!(rejected.validation().get_change("sort"), None);

    let recovered = rejected.add_sort("age", SortDirection::Desc);
    assert!(!recovered.has_error("sort"));
    assert_eq!(
        recovered.sort().clauses(),
        &[SortClause::asc("name"), SortClause::desc("age")]
    );
}

#[test]
fn test_put_filters_carries_sort_and_pagination_through_rebuild() {
    let builder = people_builder(json!({
        "search": "club",
        "sort": [{"age": "desc"}],
        "page": "1",
        "page_size": "2"
    }));

    let updated = builder.put_filters([("adult", true)]);
    assert!(updated.is_valid());
    assert_eq!(updated.filters().len(), 2);
    assert_eq!(updated.sort(), builder.sort());
    assert_eq!(updated.pagination(), builder.pagination());

    let defaulted = updated.put_default_filters([("search", "other"), ("age", "30")]);
    assert_eq!(defaulted.filters()["search"], TypedValue::from("club"));
    assert_eq!(defaulted.filters()["age"], TypedValue::Integer(30));

    let removed = defaulted.remove_filter("search");
    assert!(!removed.filters().contains_key("search"));
}

#[test]
fn test_query_is_deterministic() {
    let builder = people_builder(json!({
        "search": "club",
        "adult": "true",
        "sort": [{"birthdate": "desc"}, {"inserted_at": "asc"}]
    }));

    let first = builder.query();
    let second = builder.query();
    assert_eq!(first.predicate_count(), second.predicate_count());
    assert_eq!(first.ordering(), second.ordering());
    assert_eq!(names(&first.run(&people())), names(&second.run(&people())));
}

#[test]
fn test_chained_filter_functions_apply_in_order() {
    let builder = people_builder(json!({"search": "club"})).add_filter_function(
        "search",
        |query: MemoryQuery<Person>, _: &TypedValue| {
            query.where_field(FilterField::contains("name", "erin"))
        },
    );
    assert_eq!(builder.filter_function_count("search"), 2);

    let matched = builder.query().run(&people());
    assert_eq!(names(&matched), vec!["clubcollect Erin"]);

    let single = builder.remove_filter_function("search");
    assert_eq!(single.query().run(&people()).len(), people().len());
}

#[test]
fn test_sort_function_overrides_default_ordering() {
    let builder = people_builder(json!({"sort": [{"seniority": "desc"}]})).put_sort_function(
        "seniority",
        |query: MemoryQuery<Person>, direction: SortDirection| {
            query.order_by("birthdate", if direction.is_descending() {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            })
        },
    );
    assert!(builder.has_sort_function("seniority"));

    let ordered = builder.query().run(&people());
    assert_eq!(ordered.first().map(|p| p.name), Some("clubcollect Erin"));
}
