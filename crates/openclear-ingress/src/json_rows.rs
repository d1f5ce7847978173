//! JSON row sets from the data store.
//!
//! Accepts a bare array of row objects or the store's `{ "data": [...] }`
//! envelope. Column names follow either the store (`pais`, `tipo_oferta`,
//! `preco`, `periodo`, `data`) or plain English (`market_code`, `side`,
//! `price`, `period`, `day`).

use chrono::NaiveDate;
use openclear_types::{OpenclearError, Result, TradingSession};
use serde_json::{Map, Value};

use crate::batch::IngestReport;
use crate::lenient::Field;
use crate::validator::{RawRow, RowValidator};

const MARKET_KEYS: &[&str] = &["market_code", "pais"];
const SIDE_KEYS: &[&str] = &["side", "tipo_oferta"];
const VOLUME_KEYS: &[&str] = &["volume"];
const PRICE_KEYS: &[&str] = &["price", "preco"];
const PERIOD_KEYS: &[&str] = &["period", "periodo"];
const DAY_KEYS: &[&str] = &["day", "data"];

/// Parse and validate a JSON row set.
pub fn parse_json_rows(text: &str) -> Result<IngestReport> {
    let document: Value = serde_json::from_str(text)?;
    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(OpenclearError::Serialization(
                    "expected a \"data\" array in the row envelope".to_string(),
                ));
            }
        },
        _ => {
            return Err(OpenclearError::Serialization(
                "expected an array of rows or a { \"data\": [...] } object".to_string(),
            ));
        }
    };

    let mut validator = RowValidator::new();
    for (index, value) in rows.iter().enumerate() {
        let row = index + 1;
        let Value::Object(fields) = value else {
            return Err(OpenclearError::InvalidRow {
                row,
                reason: "row is not an object".to_string(),
            });
        };
        validator.push(row, raw_row(row, fields)?)?;
    }
    Ok(validator.finish())
}

fn raw_row(row: usize, fields: &Map<String, Value>) -> Result<RawRow> {
    let market_code = match lookup(fields, MARKET_KEYS) {
        Some(Value::String(code)) => code.clone(),
        _ => {
            return Err(OpenclearError::InvalidRow {
                row,
                reason: "missing market code".to_string(),
            });
        }
    };
    let side_code = match lookup(fields, SIDE_KEYS) {
        Some(Value::String(code)) => code.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    Ok(RawRow {
        market_code,
        side_code,
        volume: Field::from_json(lookup(fields, VOLUME_KEYS)),
        price: Field::from_json(lookup(fields, PRICE_KEYS)),
        session: TradingSession {
            day: lookup(fields, DAY_KEYS).and_then(parse_day),
            period: lookup(fields, PERIOD_KEYS).and_then(parse_period),
        },
    })
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| fields.get(*key))
}

fn parse_period(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|p| u32::try_from(p).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_day(value: &Value) -> Option<NaiveDate> {
    let Value::String(s) = value else {
        return None;
    };
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}
