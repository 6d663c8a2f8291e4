use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::errors::StoreError;

/// Denormalized profile written once per account, keyed by uid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub uid: String,
    pub display_name: String,
    pub email: String,
}

/// Encode a JSON object as a Firestore document body (`{"fields": {...}}`).
pub(super) fn to_firestore_document(record: &Value) -> Result<Value, StoreError> {
    match record {
        Value::Object(map) => Ok(json!({ "fields": encode_fields(map) })),
        other => Err(StoreError::Serde(format!(
            "Document root must be an object, got {other}"
        ))),
    }
}

fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore expects 64-bit integers as decimal strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}
