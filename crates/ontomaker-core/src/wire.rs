//! Helpers for the wire format's discriminated unions.
//!
//! Every union on the wire is an object holding a `type` tag plus one field named after the
//! tag: `{"type": "active", "active": {}}`.

use serde_json::{Map, Value};

#[must_use]
pub fn tagged(tag: &str, body: Value) -> Value {
    let mut map = Map::new();
    map.insert(tag.to_string(), body);
    map.insert("type".to_string(), Value::String(tag.to_string()));
    Value::Object(map)
}

#[must_use]
pub fn empty_tagged(tag: &str) -> Value {
    tagged(tag, Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_unions_serialize_with_sorted_keys() {
        let early = serde_json::to_string(&empty_tagged("checkbox")).expect("serialize");
        assert_eq!(early, r#"{"checkbox":{},"type":"checkbox"}"#);
        let late = serde_json::to_string(&tagged("userDropdown", Value::Bool(true)))
            .expect("serialize");
        assert_eq!(late, r#"{"type":"userDropdown","userDropdown":true}"#);
    }
}
