//! Typed expressions rendered through the public crate surface.

use crampon_core::expr::{
    Expr, SQLExpr, and, between, count_all, count_distinct, eq, gt, in_array, is_null, lt, not,
    or, sum,
};
use crampon_core::types::{BigInt, Int, Text};
use crampon_core::{FieldMeta, SQL, SQLParam, TableMeta, ToSQL};

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i32),
    Text(String),
}

impl SQLParam for Value {}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Self {
        Value::Text(value.to_owned())
    }
}

static FIELDS: [FieldMeta; 3] = [
    FieldMeta::new("orders", "id", "INTEGER").primary_key(),
    FieldMeta::new("orders", "status", "TEXT"),
    FieldMeta::new("orders", "total", "INTEGER").storage_key("amount"),
];
static ORDERS: TableMeta = TableMeta::new("orders", "Order", &FIELDS);

fn id() -> SQLExpr<'static, Value, Int> {
    SQLExpr::new(SQL::column(&FIELDS[0]))
}

fn status() -> SQLExpr<'static, Value, Text> {
    SQLExpr::new(SQL::column(&FIELDS[1]))
}

fn total() -> SQLExpr<'static, Value, Int> {
    SQLExpr::new(SQL::column(&FIELDS[2]))
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn metadata_lookup() {
    assert_eq!(ORDERS.primary_key().map(|field| field.name), Some("id"));
    assert_eq!(ORDERS.field("total").map(|field| field.storage_key), Some("amount"));
    assert_eq!(ORDERS.stored_fields().count(), 3);
}

#[test]
fn columns_use_storage_keys() {
    let sql: SQL<'_, Value> = SQL::column(&FIELDS[2]);
    assert_eq!(sql.sql(), r#""orders"."amount""#);
    let sql: SQL<'_, Value> = SQL::table(&ORDERS);
    assert_eq!(sql.sql(), r#""orders""#);
}

// ============================================================================
// Conditions
// ============================================================================

#[test]
fn comparisons_number_params_left_to_right() {
    let condition = and([gt(id(), 10), lt(total(), 500), eq(status(), "open")]);
    let (sql, params) = condition.into_sql().build_owned();
    assert_eq!(
        sql,
        r#"("orders"."id" > $1 AND "orders"."amount" < $2 AND "orders"."status" = $3)"#
    );
    assert_eq!(
        params,
        [Value::Int(10), Value::Int(500), Value::Text("open".into())]
    );
}

#[test]
fn nested_logic_keeps_grouping() {
    let condition = or([not(is_null(status())), between(total(), 1, 9)]);
    assert_eq!(
        condition.into_sql().sql(),
        r#"(NOT ("orders"."status" IS NULL) OR ("orders"."amount" BETWEEN $1 AND $2))"#
    );
}

#[test]
fn in_array_lists_params() {
    let (sql, params) = in_array(id(), [1, 2, 3]).into_sql().build_owned();
    assert_eq!(sql, r#""orders"."id" IN ($1, $2, $3)"#);
    assert_eq!(params.len(), 3);
}

#[test]
fn single_condition_is_not_wrapped() {
    let condition = and([gt(id(), 1)]);
    assert_eq!(condition.into_sql().sql(), r#""orders"."id" > $1"#);
}

// ============================================================================
// Arithmetic and aggregates
// ============================================================================

#[test]
fn arithmetic_between_columns() {
    let expr = total() * 2 + id();
    assert_eq!(
        expr.into_sql().sql(),
        r#"(("orders"."amount" * $1) + "orders"."id")"#
    );

    let grouped = (total() + id()) * 2;
    assert_eq!(
        grouped.into_sql().sql(),
        r#"(("orders"."amount" + "orders"."id") * $1)"#
    );
}

#[test]
fn aggregates_render_as_calls() {
    let total_sum: SQLExpr<'_, Value, Int, _, _> = sum(total());
    assert_eq!(total_sum.into_sql().sql(), r#"SUM("orders"."amount")"#);

    let distinct: SQLExpr<'_, Value, BigInt, _, _> = count_distinct(status());
    assert_eq!(
        distinct.into_sql().sql(),
        r#"COUNT(DISTINCT "orders"."status")"#
    );

    assert_eq!(count_all::<Value>().into_sql().sql(), "COUNT(*)");
}

#[test]
fn aggregates_compare_like_any_expression() {
    fn assert_expr<'a, E: Expr<'a, Value>>(_: &E) {}

    let having = gt(sum(total()), 100);
    assert_expr(&having);
    assert_eq!(having.into_sql().sql(), r#"SUM("orders"."amount") > $1"#);
}
