//! Request params to fetched page, through the in-memory backend.

mod helpers;

use serde_json::json;

use querycast::builder::validators;
use querycast::config::pagination::PaginationConfig;
use querycast::memory::MemoryQuery;
use querycast::{
    BuildOptions, Fetched, PageRequest, PaginationParams, QueryBuilder, SortClause, TypedValue,
};

use helpers::{Person, names, params, people_builder, people_types};

fn scenario_params() -> serde_json::Value {
    json!({
        "search": "clubcollect",
        "adult": "true",
        "sort": [{"birthdate": "desc"}, {"inserted_at": "asc"}],
        "page": "1",
        "page_size": "1"
    })
}

#[tokio::test]
async fn test_search_adult_sorted_first_page() {
    let builder = people_builder(scenario_params());

    assert!(builder.is_valid(), "errors: {:?}", builder.errors());
    assert_eq!(builder.filters().len(), 2);
    assert_eq!(builder.filters()["search"], TypedValue::from("clubcollect"));
    assert_eq!(builder.filters()["adult"], TypedValue::Boolean(true));
    assert_eq!(
        builder.sort().clauses(),
        &[SortClause::desc("birthdate"), SortClause::asc("inserted_at")]
    );
    assert_eq!(builder.pagination(), Some(PageRequest::new(1, 1)));

    let fetched = builder.fetch().await.expect("fetch succeeds");
    let page = fetched.page().expect("paginated result");
    assert_eq!(names(&page.entries), vec!["clubcollect Bob"]);
    assert_eq!(page.total_entries, 3);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(!page.has_previous);
}

#[tokio::test]
async fn test_same_state_without_pagination_returns_every_match_in_order() {
    let builder = people_builder(scenario_params()).clear_pagination();
    assert_eq!(builder.pagination(), None);

    let fetched = builder.fetch().await.expect("fetch succeeds");
    assert!(matches!(fetched, Fetched::All(_)));
    assert_eq!(
        names(fetched.entries()),
        vec!["clubcollect Bob", "ClubCollect Alice", "clubcollect Erin"]
    );
}

#[tokio::test]
async fn test_later_pages() {
    let builder = people_builder(scenario_params());

    let second = builder
        .put_pagination(PaginationParams::new(2, 1))
        .fetch()
        .await
        .expect("fetch succeeds")
        .into_entries();
    assert_eq!(names(&second), vec!["ClubCollect Alice"]);

    let past_end = builder
        .put_pagination(PaginationParams::new(4, 1))
        .fetch()
        .await
        .expect("fetch succeeds");
    let page = past_end.page().expect("paginated result");
    assert!(page.entries.is_empty());
    assert_eq!(page.total_entries, 3);
}

#[tokio::test]
async fn test_minors_only() {
    let builder = people_builder(json!({"adult": "false", "sort": [{"age": "asc"}]}));

    let minors: Vec<Person> = builder.fetch().await.expect("fetch succeeds").into_entries();
    assert_eq!(names(&minors), vec!["Frank", "Clubcollect Carol"]);
}

#[tokio::test]
async fn test_invalid_params_still_fetch_with_prior_state() {
    let valid = people_builder(scenario_params());
    let invalid = valid.rebuild(params(json!({
        "search": "dave",
        "adult": "maybe",
        "page": "1",
        "page_size": "1"
    })));

    assert!(invalid.has_errors());
    assert!(invalid.is_invalid("adult"));
    assert_eq!(invalid.filters(), valid.filters());

    let page = invalid.fetch().await.expect("fetch succeeds");
    assert_eq!(names(page.entries()), vec!["clubcollect Bob"]);
}

#[tokio::test]
async fn test_configured_page_size_limit() {
    let config = PaginationConfig {
        max_page_size: 50,
        ..PaginationConfig::default()
    };
    let repo = people_builder(json!({})).repo().clone();
    let options = BuildOptions::default().with_validator(validators::max_page_size(config.max_page_size));

    let builder = QueryBuilder::with_options(
        repo,
        MemoryQuery::new(),
        params(json!({"page": "1", "page_size": "60"})),
        people_types(),
        options,
    );
    assert!(builder.has_error("page_size"));
    assert_eq!(builder.pagination(), None);

    let defaulted = builder.put_default_pagination(config.default_params());
    assert!(!defaulted.has_error("page_size"));
    assert_eq!(
        defaulted.pagination(),
        Some(PageRequest::new(1, config.default_page_size))
    );
}

#[tokio::test]
async fn test_oversized_pagination_does_not_block_filter_updates() {
    let options = BuildOptions::default().with_validator(validators::max_page_size(50));
    let builder = QueryBuilder::with_options(
        people_builder(json!({})).repo().clone(),
        MemoryQuery::new(),
        params(json!({"search": "dave", "page": "1", "page_size": "10"})),
        people_types(),
        options,
    );

    let oversized = builder.put_pagination(PaginationParams::new(1, 1000));
    assert!(oversized.has_error("page_size"));
    assert_eq!(oversized.pagination(), Some(PageRequest::new(1, 10)));

    let updated = oversized.put_filters([("search", "frank")]);
    assert!(updated.is_valid(), "errors: {:?}", updated.errors());
    assert_eq!(updated.filters()["search"], TypedValue::from("frank"));
}
