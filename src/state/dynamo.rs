//! DynamoDB attribute-value decoding.
//!
//! `GET /state/{id}` returns the raw table item, where every value is
//! wrapped in a type descriptor (`{"S": "..."}`, `{"N": "1.5"}`,
//! `{"M": {...}}`). [`unmarshall`] strips the descriptors.

use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// Convert an attribute map (`{field: {TYPE: value}}`) into plain JSON.
pub fn unmarshall(item: &Value) -> Result<Value> {
    let fields = item
        .as_object()
        .ok_or_else(|| Error::decode("dynamodb item", "expected an object"))?;
    unmarshall_map(fields)
}

fn unmarshall_map(fields: &Map<String, Value>) -> Result<Value> {
    let mut out = Map::with_capacity(fields.len());
    for (name, attribute) in fields {
        out.insert(name.clone(), unmarshall_attribute(attribute)?);
    }
    Ok(Value::Object(out))
}

fn unmarshall_attribute(attribute: &Value) -> Result<Value> {
    let Some((kind, value)) = attribute
        .as_object()
        .filter(|obj| obj.len() == 1)
        .and_then(|obj| obj.iter().next())
    else {
        return Err(Error::decode(
            "dynamodb attribute",
            format!("expected a single type descriptor, got {attribute}"),
        ));
    };

    match kind.as_str() {
        "S" | "B" => Ok(Value::String(expect_str(kind, value)?.to_string())),
        "N" => parse_number(expect_str(kind, value)?),
        "BOOL" => value
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| Error::decode("dynamodb BOOL", value)),
        "NULL" => Ok(Value::Null),
        "M" => {
            let fields = value
                .as_object()
                .ok_or_else(|| Error::decode("dynamodb M", value))?;
            unmarshall_map(fields)
        }
        "L" => expect_array(kind, value)?
            .iter()
            .map(unmarshall_attribute)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        "SS" | "BS" => expect_array(kind, value)?
            .iter()
            .map(|v| expect_str(kind, v).map(|s| Value::String(s.to_string())))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        "NS" => expect_array(kind, value)?
            .iter()
            .map(|v| expect_str(kind, v).and_then(parse_number))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(Error::decode(
            "dynamodb attribute",
            format!("unknown type descriptor '{other}'"),
        )),
    }
}

fn expect_str<'a>(kind: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::decode("dynamodb attribute", format!("{kind} expects a string")))
}

fn expect_array<'a>(kind: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::decode("dynamodb attribute", format!("{kind} expects a list")))
}

fn parse_number(raw: &str) -> Result<Value> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::Number(n.into()));
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(Value::Number(n.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| Error::decode("dynamodb N", raw))
}
