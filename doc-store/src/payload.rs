//! Conversions between `serde_json::Value` and Qdrant payload values.

use std::collections::HashMap;

use qdrant_client::qdrant::{ListValue, Struct, Value as QValue, value::Kind as K};

/// Converts JSON into a Qdrant `Value`, preserving arrays and objects.
pub fn json_to_qvalue(v: serde_json::Value) -> QValue {
    let kind = match v {
        serde_json::Value::String(s) => Some(K::StringValue(s)),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(K::IntegerValue(i)),
            (None, Some(f)) => Some(K::DoubleValue(f)),
            _ => Some(K::StringValue(n.to_string())),
        },
        serde_json::Value::Bool(b) => Some(K::BoolValue(b)),
        serde_json::Value::Array(arr) => Some(K::ListValue(ListValue {
            values: arr.into_iter().map(json_to_qvalue).collect(),
        })),
        serde_json::Value::Object(map) => Some(K::StructValue(Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_qvalue(v)))
                .collect(),
        })),
        serde_json::Value::Null => None,
    };
    QValue { kind }
}

/// Converts a Qdrant `Value` back into JSON, recursing into lists and structs.
pub fn qvalue_to_json(v: QValue) -> serde_json::Value {
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(s)) => serde_json::Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, qvalue_to_json(v)))
                .collect(),
        ),
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}

/// Converts a whole payload map into a JSON object.
pub fn payload_to_json(p: HashMap<String, QValue>) -> serde_json::Value {
    serde_json::Value::Object(p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect())
}

/// Converts a JSON object into a payload map; non-objects yield an empty map.
pub fn json_to_payload(v: serde_json::Value) -> HashMap<String, QValue> {
    match v {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, json_to_qvalue(v)))
            .collect(),
        _ => HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn string_list_survives_round_trip() {
        let payload = json!({ "namespace": "api_docs", "data": ["a", "b"] });
        let back = payload_to_json(json_to_payload(payload.clone()));
        assert_eq!(back, payload);
    }

    #[test]
    fn nested_structs_are_not_dropped() {
        let v = json!({ "meta": { "tags": ["x"], "n": 2, "ok": true } });
        assert_eq!(payload_to_json(json_to_payload(v.clone())), v);
    }

    #[test]
    fn non_object_payload_is_empty() {
        assert!(json_to_payload(json!("x")).is_empty());
    }
}
