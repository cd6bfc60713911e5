//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! `{"a": 1}` is stored as `{"a": {"integerValue": "1"}}`; maps and arrays
//! nest as `mapValue.fields` and `arrayValue.values`.

use serde_json::{json, Map, Number, Value};

use crate::client::FirebaseError;

pub fn to_firestore(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // integers travel as strings (int64 does not fit a JSON double)
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            if items.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                json!({ "arrayValue": { "values": items.iter().map(to_firestore).collect::<Vec<_>>() } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": to_firestore_fields(map) } }),
    }
}

pub fn to_firestore_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_firestore(v)))
        .collect()
}

pub fn from_firestore(value: &Value) -> Result<Value, FirebaseError> {
    let typed = value
        .as_object()
        .and_then(|o| o.iter().next())
        .map(|(kind, v)| (kind.as_str(), v))
        .ok_or_else(|| FirebaseError::DecodeError(format!("not a typed value: {}", value)))?;

    Ok(match typed {
        ("nullValue", _) => Value::Null,
        ("booleanValue", v) => Value::Bool(v.as_bool().unwrap_or_default()),
        ("integerValue", v) => {
            let parsed = match v {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| FirebaseError::DecodeError(format!("bad integerValue {}", v)))?
        }
        ("doubleValue", v) => match v {
            Value::Number(_) => v.clone(),
            // NaN and Infinity arrive as strings and have no JSON form
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        ("stringValue" | "timestampValue" | "referenceValue" | "bytesValue", v) => v.clone(),
        ("geoPointValue", v) => v.clone(),
        ("arrayValue", v) => Value::Array(
            v.get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(from_firestore).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default(),
        ),
        ("mapValue", v) => Value::Object(match v.get("fields").and_then(Value::as_object) {
            Some(fields) => from_firestore_fields(fields)?,
            None => Map::new(),
        }),
        (kind, _) => {
            return Err(FirebaseError::DecodeError(format!(
                "unsupported value type {}",
                kind
            )))
        }
    })
}

pub fn from_firestore_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, FirebaseError> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), from_firestore(v)?)))
        .collect()
}
