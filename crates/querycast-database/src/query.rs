//! SQL queryable for PostgreSQL.
//!
//! A [`SqlQuery`] is plain data: a table, a list of conditions joined with
//! `AND`, and ordering clauses. It becomes SQL only when rendered, at which
//! point identifiers are checked and quoted and every value is bound as a
//! parameter.

use sqlx::{Postgres, QueryBuilder};

use querycast_core::error::AppError;
use querycast_core::result::AppResult;
use querycast_core::traits::Queryable;
use querycast_core::types::{FilterField, FilterOp, SortDirection, TypedValue, is_identifier};

/// A `SELECT *` over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    table: String,
    conditions: Vec<FilterField>,
    order: Vec<(String, SortDirection)>,
}

impl SqlQuery {
    /// Select every row of `table`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            order: Vec::new(),
        }
    }

    /// The table being selected from.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Conditions, in the order they were added.
    pub fn conditions(&self) -> &[FilterField] {
        &self.conditions
    }

    /// Render `SELECT * ... [ORDER BY ...]`.
    pub fn select(&self) -> AppResult<QueryBuilder<'static, Postgres>> {
        let mut builder = QueryBuilder::new("SELECT * FROM ");
        builder.push(quote_identifier(&self.table)?);
        self.push_where(&mut builder)?;
        self.push_order_by(&mut builder)?;
        Ok(builder)
    }

    /// Render `SELECT * ... [ORDER BY ...] LIMIT $n OFFSET $m`.
    pub fn select_page(&self, limit: u64, offset: u64) -> AppResult<QueryBuilder<'static, Postgres>> {
        let mut builder = self.select()?;
        builder.push(" LIMIT ");
        builder.push_bind(to_i64(limit));
        builder.push(" OFFSET ");
        builder.push_bind(to_i64(offset));
        Ok(builder)
    }

    /// Render `SELECT COUNT(*) ...` over the same conditions.
    pub fn count(&self) -> AppResult<QueryBuilder<'static, Postgres>> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(quote_identifier(&self.table)?);
        self.push_where(&mut builder)?;
        Ok(builder)
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Postgres>) -> AppResult<()> {
        for (i, condition) in self.conditions.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            push_condition(builder, condition)?;
        }
        Ok(())
    }

    fn push_order_by(&self, builder: &mut QueryBuilder<'static, Postgres>) -> AppResult<()> {
        for (i, (field, direction)) in self.order.iter().enumerate() {
            builder.push(if i == 0 { " ORDER BY " } else { ", " });
            builder.push(quote_identifier(field)?);
            builder.push(" ");
            builder.push(direction.as_sql());
        }
        Ok(())
    }
}

impl Queryable for SqlQuery {
    type Predicate = FilterField;

    fn filter(mut self, predicate: FilterField) -> Self {
        self.conditions.push(predicate);
        self
    }

    fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order.push((field.to_string(), direction));
        self
    }
}

fn push_condition(
    builder: &mut QueryBuilder<'static, Postgres>,
    condition: &FilterField,
) -> AppResult<()> {
    builder.push(quote_identifier(&condition.field)?);

    let operator = match condition.op {
        FilterOp::IsNull => {
            builder.push(" IS NULL");
            return Ok(());
        }
        FilterOp::IsNotNull => {
            builder.push(" IS NOT NULL");
            return Ok(());
        }
        FilterOp::Contains => {
            let Some(needle) = condition.value.as_str() else {
                return Err(AppError::validation(format!(
                    "Substring filter on '{}' needs a string value",
                    condition.field
                )));
            };
            builder.push(" ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(needle)));
            return Ok(());
        }
        FilterOp::In => {
            builder.push(" = ANY(");
            push_bind_list(builder, &condition.field, &condition.value)?;
            builder.push(")");
            return Ok(());
        }
        FilterOp::Eq => " = ",
        FilterOp::Ne => " <> ",
        FilterOp::Gt => " > ",
        FilterOp::Gte => " >= ",
        FilterOp::Lt => " < ",
        FilterOp::Lte => " <= ",
    };
    builder.push(operator);
    push_bind_value(builder, &condition.field, &condition.value)
}

fn push_bind_value(
    builder: &mut QueryBuilder<'static, Postgres>,
    field: &str,
    value: &TypedValue,
) -> AppResult<()> {
    match value {
        TypedValue::String(s) => builder.push_bind(s.clone()),
        TypedValue::Integer(i) => builder.push_bind(*i),
        TypedValue::Float(f) => builder.push_bind(*f),
        TypedValue::Boolean(b) => builder.push_bind(*b),
        TypedValue::Date(d) => builder.push_bind(*d),
        TypedValue::DateTime(dt) => builder.push_bind(*dt),
        TypedValue::Uuid(u) => builder.push_bind(*u),
        TypedValue::Json(v) => builder.push_bind(sqlx::types::Json(v.clone())),
        TypedValue::List(_) => {
            return Err(AppError::validation(format!(
                "Comparison on '{field}' cannot take a list; use an IN filter"
            )));
        }
    };
    Ok(())
}

/// Bind a homogeneous list as a PostgreSQL array.
fn push_bind_list(
    builder: &mut QueryBuilder<'static, Postgres>,
    field: &str,
    value: &TypedValue,
) -> AppResult<()> {
    let TypedValue::List(items) = value else {
        return Err(AppError::validation(format!(
            "IN filter on '{field}' needs a list value"
        )));
    };
    let mixed = || AppError::validation(format!("IN filter on '{field}' needs a homogeneous list"));

    match items.first() {
        None | Some(TypedValue::String(_)) => {
            let values = items
                .iter()
                .map(|v| v.as_str().map(str::to_string).ok_or_else(mixed))
                .collect::<AppResult<Vec<String>>>()?;
            builder.push_bind(values);
        }
        Some(TypedValue::Integer(_)) => {
            let values = items
                .iter()
                .map(|v| v.as_i64().ok_or_else(mixed))
                .collect::<AppResult<Vec<i64>>>()?;
            builder.push_bind(values);
        }
        Some(TypedValue::Uuid(_)) => {
            let values = items
                .iter()
                .map(|v| match v {
                    TypedValue::Uuid(u) => Ok(*u),
                    _ => Err(mixed()),
                })
                .collect::<AppResult<Vec<_>>>()?;
            builder.push_bind(values);
        }
        Some(_) => {
            return Err(AppError::validation(format!(
                "IN filter on '{field}' supports string, integer and uuid lists"
            )));
        }
    }
    Ok(())
}

/// Double-quote an identifier, quoting each part of a qualified name.
fn quote_identifier(name: &str) -> AppResult<String> {
    if !is_identifier(name) {
        return Err(AppError::validation(format!("Invalid identifier '{name}'")));
    }
    Ok(name
        .split('.')
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join("."))
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
