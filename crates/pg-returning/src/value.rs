//! Dynamic cell decoding for `values()` / `values_list()` projections.
//!
//! Returned rows are kept in their wire form; projections that need untyped
//! access decode individual cells to `serde_json::Value` based on the
//! column's PostgreSQL type. Only the common scalar types are supported —
//! a typed accessor (`Record::get`, `ReturningSet::flat_values`) works for
//! any `FromSql` type and should be preferred when the Rust type is known.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;
use tokio_postgres::types::Type;
use uuid::Uuid;

/// Decode the cell at `idx` of `row` into a JSON value.
pub(crate) fn cell_to_json(row: &Row, idx: usize) -> Result<Value> {
    let column = &row.columns()[idx];
    let name = column.name();

    macro_rules! decode {
        ($ty:ty, $conv:expr) => {{
            let v: Option<$ty> = row
                .try_get(idx)
                .map_err(|e| Error::decode(name, e.to_string()))?;
            Ok(v.map($conv).unwrap_or(Value::Null))
        }};
    }

    // Type holds an Arc internally, so the constants cannot be used as
    // match patterns; compare by equality instead.
    let ty = column.type_();
    if *ty == Type::BOOL {
        decode!(bool, Value::Bool)
    } else if *ty == Type::INT2 {
        decode!(i16, Value::from)
    } else if *ty == Type::INT4 {
        decode!(i32, Value::from)
    } else if *ty == Type::INT8 {
        decode!(i64, Value::from)
    } else if *ty == Type::FLOAT4 {
        decode!(f32, |v| Value::from(v as f64))
    } else if *ty == Type::FLOAT8 {
        decode!(f64, Value::from)
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        decode!(String, Value::String)
    } else if *ty == Type::UUID {
        decode!(Uuid, |v: Uuid| Value::String(v.to_string()))
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        decode!(Value, |v| v)
    } else if *ty == Type::TIMESTAMPTZ {
        decode!(DateTime<Utc>, |v: DateTime<Utc>| Value::String(
            v.to_rfc3339()
        ))
    } else if *ty == Type::TIMESTAMP {
        decode!(NaiveDateTime, |v: NaiveDateTime| Value::String(
            v.to_string()
        ))
    } else if *ty == Type::DATE {
        decode!(NaiveDate, |v: NaiveDate| Value::String(v.to_string()))
    } else if *ty == Type::TIME {
        decode!(NaiveTime, |v: NaiveTime| Value::String(v.to_string()))
    } else {
        Err(Error::decode(
            name,
            format!(
                "column type {} is not supported in values projections; \
                 use a typed accessor instead",
                ty
            ),
        ))
    }
}
