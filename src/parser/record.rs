use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqliteValue};
use serde_json::Value;

use crate::schema::{ColumnType, TableSchema};

/// A parsed row ready for insertion, values in schema column order
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub values: Vec<SqlValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => SqliteValue::Null,
            SqlValue::Integer(i) => SqliteValue::Integer(*i),
            SqlValue::Real(f) => SqliteValue::Real(*f),
            SqlValue::Text(s) => SqliteValue::Text(s.clone()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Map one fixture record onto the columns of a table.
///
/// Unknown fields are ignored. Missing fields, explicit nulls and values that
/// do not fit the column type all become `NULL`; the store rejects them later
/// if the column is required.
pub fn parse_record(json: &Value, schema: &TableSchema) -> Result<ParsedRow> {
    if !json.is_object() {
        bail!("Expected a JSON object for {}, found: {}", schema.name, json);
    }

    let values = schema
        .columns
        .iter()
        .map(|col| extract_value(json, &col.json_key(), &col.col_type))
        .collect();

    Ok(ParsedRow { values })
}

fn extract_value(json: &Value, key: &str, col_type: &ColumnType) -> SqlValue {
    let val = json.get(key);

    match val {
        None | Some(Value::Null) => SqlValue::Null,
        Some(v) => match col_type {
            ColumnType::Integer => as_integer(v).map(SqlValue::Integer).unwrap_or(SqlValue::Null),
            ColumnType::Real => as_real(v).map(SqlValue::Real).unwrap_or(SqlValue::Null),
            ColumnType::Text => as_text(v).map(SqlValue::Text).unwrap_or(SqlValue::Null),
            ColumnType::Date => v
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
                .map(|d| SqlValue::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(SqlValue::Null),
            ColumnType::Time => v
                .as_str()
                .and_then(|s| parse_time(s.trim()))
                .map(|t| SqlValue::Text(t.format("%H:%M:%S").to_string()))
                .unwrap_or(SqlValue::Null),
        },
    }
}

fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_real(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%SZ"))
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{CIRCUITS, DRIVER_STANDINGS, RACES};
    use serde_json::json;

    #[test]
    fn test_parse_record_translates_field_names() {
        let record = json!({
            "circuitId": 6,
            "circuitRef": "monaco",
            "name": "Circuit de Monaco",
            "location": "Monte-Carlo",
            "country": "Monaco",
            "lat": 43.7347,
            "lng": 7.42056,
            "alt": 7,
            "url": "http://en.wikipedia.org/wiki/Circuit_de_Monaco",
            "unexpected": "ignored"
        });

        let row = parse_record(&record, &CIRCUITS).unwrap();
        assert_eq!(row.values.len(), CIRCUITS.columns.len());
        assert_eq!(row.values[0], SqlValue::Integer(6));
        assert_eq!(row.values[1], SqlValue::Text("monaco".into()));
        assert_eq!(row.values[5], SqlValue::Real(43.7347));
        assert_eq!(row.values[7], SqlValue::Integer(7));
    }

    #[test]
    fn test_null_and_mismatched_values_become_null() {
        let record = json!({
            "circuitId": 1,
            "circuitRef": "albert_park",
            "name": "Albert Park",
            "alt": null,
            "lat": [1, 2]
        });

        let row = parse_record(&record, &CIRCUITS).unwrap();
        assert_eq!(row.values[5], SqlValue::Null);
        assert_eq!(row.values[7], SqlValue::Null);
        // Missing url
        assert_eq!(row.values[8], SqlValue::Null);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let record = json!({
            "driverStandingsId": "10",
            "raceId": "18",
            "driverId": 1,
            "points": "10.5",
            "position": 1,
            "positionText": 1,
            "wins": "1"
        });

        let row = parse_record(&record, &DRIVER_STANDINGS).unwrap();
        assert_eq!(row.values[0], SqlValue::Integer(10));
        assert_eq!(row.values[3], SqlValue::Real(10.5));
        assert_eq!(row.values[5], SqlValue::Text("1".into()));
    }

    #[test]
    fn test_dates_and_times() {
        let record = json!({
            "raceId": 1,
            "year": 2009,
            "round": 1,
            "circuitId": 1,
            "name": "Australian Grand Prix",
            "date": "2009-03-29",
            "time": "06:00:00",
            "fp1_date": "not a date",
            "quali_time": "05:00"
        });

        let row = parse_record(&record, &RACES).unwrap();
        assert_eq!(row.values[5], SqlValue::Text("2009-03-29".into()));
        assert_eq!(row.values[6], SqlValue::Text("06:00:00".into()));
        assert_eq!(row.values[8], SqlValue::Null);
        assert_eq!(row.values[15], SqlValue::Text("05:00:00".into()));
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert!(parse_record(&json!([1, 2, 3]), &CIRCUITS).is_err());
    }
}
