//! Live resource snapshot.

use serde_json::Value;

/// A point-in-time copy of a pool document as the API returned it.
///
/// No schema is assumed beyond best-effort `id` and `name` fields; the
/// backend has shipped several shapes over time and the status heuristics
/// deal with that. The control plane also wraps single-resource responses in
/// a `{"pool": {...}}` envelope inconsistently, so the wrapper is stripped
/// exactly once, at construction, and every downstream consumer sees the
/// bare document.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    doc: Value,
}

impl PoolSnapshot {
    /// Normalizes a raw response body, unwrapping the `pool` envelope when
    /// the wrapped value is an object.
    pub fn from_value(raw: Value) -> Self {
        let doc = match raw {
            Value::Object(mut map) => match map.remove("pool") {
                Some(inner @ Value::Object(_)) => inner,
                Some(other) => {
                    map.insert("pool".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            },
            other => other,
        };
        Self { doc }
    }

    /// Pool id, when the document carries one.
    pub fn id(&self) -> Option<&str> {
        self.doc.get("id").and_then(Value::as_str)
    }

    /// Pool name, when the document carries one.
    pub fn name(&self) -> Option<&str> {
        self.doc.get("name").and_then(Value::as_str)
    }

    /// Top-level field lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Nested field lookup; `None` as soon as any segment is missing or the
    /// intermediate value is not an object.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let mut cur = &self.doc;
        for key in path {
            cur = cur.get(key)?;
        }
        Some(cur)
    }

    /// The normalized document.
    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    /// Consumes the snapshot, yielding the normalized document.
    pub fn into_value(self) -> Value {
        self.doc
    }

    /// A diagnostic sample of the document: its first `limit` fields, in key
    /// order. `None` when the document is not an object.
    pub fn observation_sample(&self, limit: usize) -> Option<Value> {
        let map = self.doc.as_object()?;
        let sample = map
            .iter()
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Value::Object(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_unwrapped_once() {
        let snap = PoolSnapshot::from_value(json!({"pool": {"id": "p1", "name": "workers"}}));
        assert_eq!(snap.id(), Some("p1"));
        assert_eq!(snap.name(), Some("workers"));
    }

    #[test]
    fn test_bare_document_passes_through() {
        let snap = PoolSnapshot::from_value(json!({"id": "p1", "status": "ready"}));
        assert_eq!(snap.id(), Some("p1"));
        assert_eq!(snap.get("status"), Some(&json!("ready")));
    }

    #[test]
    fn test_non_object_pool_field_is_not_an_envelope() {
        let snap = PoolSnapshot::from_value(json!({"id": "p1", "pool": "workers"}));
        assert_eq!(snap.id(), Some("p1"));
        assert_eq!(snap.get("pool"), Some(&json!("workers")));
    }

    #[test]
    fn test_nested_lookup() {
        let snap = PoolSnapshot::from_value(json!({"root_volume": {"type": "l_ssd"}}));
        assert_eq!(
            snap.get_path(&["root_volume", "type"]),
            Some(&json!("l_ssd"))
        );
        assert_eq!(snap.get_path(&["root_volume", "size"]), None);
        assert_eq!(snap.get_path(&["missing", "type"]), None);
    }

    #[test]
    fn test_observation_sample_truncates_in_key_order() {
        let snap = PoolSnapshot::from_value(json!({
            "a": 1, "b": 2, "c": 3, "d": 4
        }));
        let sample = snap.observation_sample(2).unwrap();
        let keys: Vec<&String> = sample.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_observation_sample_on_non_object() {
        let snap = PoolSnapshot::from_value(json!([1, 2, 3]));
        assert!(snap.observation_sample(10).is_none());
    }
}
