//! Row model returned by queries
//!
//! A [`Row`] is an ordered list of `(column, Value)` pairs and serializes to a
//! JSON object whose keys keep column order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::PgRow;
use sqlx::types::{Decimal, JsonValue};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use super::DbError;

/// A single column value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Value of the first column named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(column, value)| (column.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Decode a PostgreSQL row without knowing its schema up front.
    pub(crate) fn from_pg_row(row: &PgRow) -> Result<Self, DbError> {
        let mut columns = Vec::with_capacity(row.len());

        for column in row.columns() {
            let idx = column.ordinal();
            let name = column.name().to_owned();

            if row.try_get_raw(idx)?.is_null() {
                columns.push((name, Value::Null));
                continue;
            }

            let value = match column.type_info().name() {
                "BOOL" => Value::Bool(row.try_get(idx)?),
                "INT2" => Value::Int(row.try_get::<i16, _>(idx)?.into()),
                "INT4" => Value::Int(row.try_get::<i32, _>(idx)?.into()),
                "INT8" => Value::Int(row.try_get(idx)?),
                "FLOAT4" => Value::Float(row.try_get::<f32, _>(idx)?.into()),
                "FLOAT8" => Value::Float(row.try_get(idx)?),
                "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Value::Text(row.try_get(idx)?),
                "NUMERIC" => Value::Text(row.try_get::<Decimal, _>(idx)?.to_string()),
                "JSON" | "JSONB" => Value::Text(row.try_get::<JsonValue, _>(idx)?.to_string()),
                "\"CHAR\"" | "CHAR" => Value::Text(char_text(row.try_get(idx)?)),
                "INTERVAL" => Value::Text(interval_text(&row.try_get(idx)?)),
                "BYTEA" => Value::Text(bytea_text(&row.try_get::<Vec<u8>, _>(idx)?)),
                "UUID" => Value::Text(row.try_get::<uuid::Uuid, _>(idx)?.to_string()),
                "DATE" => Value::Text(row.try_get::<chrono::NaiveDate, _>(idx)?.to_string()),
                "TIME" => Value::Text(row.try_get::<chrono::NaiveTime, _>(idx)?.to_string()),
                "TIMESTAMP" => Value::Text(
                    row.try_get::<chrono::NaiveDateTime, _>(idx)?
                        .format("%Y-%m-%dT%H:%M:%S%.f")
                        .to_string(),
                ),
                "TIMESTAMPTZ" => Value::Text(
                    row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)?
                        .to_rfc3339(),
                ),
                other => {
                    return Err(DbError::UnsupportedType {
                        column: name,
                        type_name: other.to_owned(),
                    })
                }
            };
            columns.push((name, value));
        }

        Ok(Self { columns })
    }
}

/// Postgres `"char"` is a single byte.
fn char_text(byte: i8) -> String {
    char::from(byte as u8).to_string()
}

/// ISO 8601 duration, months and days kept separate from the clock part.
fn interval_text(interval: &PgInterval) -> String {
    let sign = if interval.microseconds < 0 { "-" } else { "" };
    let micros = interval.microseconds.unsigned_abs();
    let (secs, frac) = (micros / 1_000_000, micros % 1_000_000);

    let clock = if frac == 0 {
        format!("{}{}", sign, secs)
    } else {
        let frac = format!("{:06}", frac);
        format!("{}{}.{}", sign, secs, frac.trim_end_matches('0'))
    };
    format!("P{}M{}DT{}S", interval.months, interval.days, clock)
}

/// Same hex form Postgres prints for `bytea`.
fn bytea_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> Row {
        Row::new(vec![
            ("id".into(), Value::Int(id)),
            ("name".into(), Value::from(name)),
        ])
    }

    #[test]
    fn row_serializes_as_object() {
        let json = serde_json::to_string(&vec![user(1, "A"), user(2, "B")]).unwrap();
        assert_eq!(json, r#"[{"id":1,"name":"A"},{"id":2,"name":"B"}]"#);
    }

    #[test]
    fn keys_keep_column_order() {
        let row: Row = vec![
            ("zeta".to_string(), Value::Int(1)),
            ("alpha".to_string(), Value::Int(2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"zeta":1,"alpha":2}"#);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["zeta", "alpha"]);
    }

    #[test]
    fn value_union_maps_to_json_scalars() {
        let row = Row::new(vec![
            ("n".into(), Value::Null),
            ("b".into(), Value::Bool(true)),
            ("f".into(), Value::Float(1.5)),
            ("o".into(), Value::from(None::<i64>)),
        ]);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"n":null,"b":true,"f":1.5,"o":null}"#
        );
    }

    #[test]
    fn interval_renders_as_iso_duration() {
        let interval = PgInterval {
            months: 14,
            days: 1,
            microseconds: 7_384_500_000,
        };
        assert_eq!(interval_text(&interval), "P14M1DT7384.5S");

        let negative = PgInterval {
            months: 0,
            days: 0,
            microseconds: -3_000_000,
        };
        assert_eq!(interval_text(&negative), "P0M0DT-3S");
    }

    #[test]
    fn numeric_keeps_exact_digits() {
        let exact: Decimal = "12345678901234567890.50".parse().unwrap();
        assert_eq!(exact.to_string(), "12345678901234567890.50");
    }

    #[test]
    fn char_and_bytea_render_as_text() {
        assert_eq!(char_text(b'x' as i8), "x");
        assert_eq!(bytea_text(&[0x0a, 0xff]), "\\x0aff");
        assert_eq!(bytea_text(&[]), "\\x");
    }

    #[test]
    fn get_finds_by_name() {
        let row = user(7, "G");
        assert_eq!(row.get("id"), Some(&Value::Int(7)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
        assert!(!Row::default().iter().any(|_| true));
    }
}
