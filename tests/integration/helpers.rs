//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use querycast::memory::{MemoryQuery, MemoryRepository, Record};
use querycast::traits::Queryable;
use querycast::types::FilterField;
use querycast::{FieldType, ParamTypes, QueryBuilder, RawParams, TypedValue};

/// A person row.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: &'static str,
    pub age: i64,
    pub birthdate: NaiveDate,
    pub inserted_at: DateTime<Utc>,
}

impl Record for Person {
    fn field(&self, name: &str) -> Option<TypedValue> {
        match name {
            "name" => Some(TypedValue::from(self.name)),
            "age" => Some(TypedValue::Integer(self.age)),
            "birthdate" => Some(TypedValue::Date(self.birthdate)),
            "inserted_at" => Some(TypedValue::DateTime(self.inserted_at)),
            _ => None,
        }
    }
}

pub type PeopleRepo = MemoryRepository<Person>;
pub type PeopleBuilder = QueryBuilder<PeopleRepo>;

fn person(name: &'static str, age: i64, birthdate: (i32, u32, u32), inserted_day: u32) -> Person {
    let (year, month, day) = birthdate;
    Person {
        name,
        age,
        birthdate: NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
        inserted_at: Utc
            .with_ymd_and_hms(2024, 1, inserted_day, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Six people. Three are adults whose name contains "clubcollect"; two of
/// those share a birthdate and differ only by insertion time.
pub fn people() -> Vec<Person> {
    vec![
        person("ClubCollect Alice", 30, (1994, 5, 1), 3),
        person("Dave", 40, (1984, 7, 7), 4),
        person("clubcollect Bob", 30, (1994, 5, 1), 1),
        person("Clubcollect Carol", 16, (2008, 2, 2), 5),
        person("clubcollect Erin", 45, (1979, 3, 3), 2),
        person("Frank", 12, (2012, 9, 9), 6),
    ]
}

pub fn names(people: &[Person]) -> Vec<&'static str> {
    people.iter().map(|p| p.name).collect()
}

/// Build params from a JSON object literal.
pub fn params(value: Value) -> RawParams {
    match value {
        Value::Object(map) => map,
        other => panic!("params must be an object, got {other}"),
    }
}

pub fn people_types() -> ParamTypes {
    ParamTypes::from([
        ("search".to_string(), FieldType::String),
        ("adult".to_string(), FieldType::Boolean),
        ("age".to_string(), FieldType::Integer),
    ])
}

/// A builder over [`people`] with the `search` and `adult` filter
/// functions registered.
pub fn people_builder(raw: Value) -> PeopleBuilder {
    QueryBuilder::new(
        Arc::new(MemoryRepository::new(people())),
        MemoryQuery::new(),
        params(raw),
        people_types(),
    )
    .put_filter_function("search", |query: MemoryQuery<Person>, value: &TypedValue| {
        query.where_field(FilterField::contains("name", value.as_str().unwrap_or_default()))
    })
    .put_filter_function("adult", |query: MemoryQuery<Person>, value: &TypedValue| {
        let adult = value.as_bool().unwrap_or(false);
        query.filter(Arc::new(move |p: &Person| (p.age >= 18) == adult))
    })
}
