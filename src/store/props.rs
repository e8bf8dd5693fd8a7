//! Builders and readers for the store's property bags.

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde_json::{Value, json};

pub fn title(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": text } }] })
}

pub fn rich_text(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": text } }] })
}

pub fn number(value: Decimal) -> Value {
    json!({ "number": value.round_dp(4).to_f64().unwrap_or_default() })
}

pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

pub fn date(start: &str) -> Value {
    json!({ "date": { "start": start } })
}

pub fn title_text(properties: &Value, name: &str) -> Option<String> {
    properties
        .get(name)?
        .get("title")?
        .get(0)?
        .get("text")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

/// Reads a number property; absent or null numbers read as zero.
pub fn number_value(properties: &Value, name: &str) -> Decimal {
    properties
        .get(name)
        .and_then(|property| property.get("number"))
        .and_then(Value::as_f64)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}
