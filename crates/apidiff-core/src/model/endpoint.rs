use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dynamically shaped schema/body value.
///
/// A tagged union over `Null | Bool | Number | String | Array | Object`.
/// Equality is structural: arrays compare element-wise in order, objects
/// compare by key set and per-key value (key order is irrelevant).
pub type SchemaValue = serde_json::Value;

/// A single mock response attached to an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: SchemaValue,

    /// Whether this response is served when no other response matches
    #[serde(default)]
    pub is_default: bool,

    /// Request predicate selecting this response (`query`, `headers`, `bodyEquals`)
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_rule: Option<SchemaValue>,
}

impl ResponseDefinition {
    pub fn new(status: u16, body: SchemaValue) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
            is_default: false,
            match_rule: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_match(mut self, rule: SchemaValue) -> Self {
        self.match_rule = Some(rule);
        self
    }
}

/// The comparable unit of a version snapshot
///
/// Two endpoints are the same endpoint across versions iff their
/// [`identity_of`](crate::identity::identity_of) keys are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefinition {
    /// HTTP verb, case-sensitive
    pub method: String,

    /// Route path, may contain `:param` placeholders
    pub path: String,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Request body schema; may declare a `required` list of field names
    #[serde(default)]
    pub request_schema: Option<SchemaValue>,

    #[serde(default)]
    pub responses: Vec<ResponseDefinition>,

    /// Simulated latency; carried along but never compared
    #[serde(default)]
    pub delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

impl EndpointDefinition {
    /// Create an enabled endpoint with no summary, schema, or responses
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            summary: None,
            enabled: true,
            request_schema: None,
            responses: Vec::new(),
            delay_ms: 0,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_request_schema(mut self, schema: SchemaValue) -> Self {
        self.request_schema = Some(schema);
        self
    }

    pub fn with_response(mut self, response: ResponseDefinition) -> Self {
        self.responses.push(response);
        self
    }

    /// The declared request schema, treating an explicit JSON `null` as absent
    pub fn declared_request_schema(&self) -> Option<&SchemaValue> {
        self.request_schema.as_ref().filter(|s| !s.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_applies_defaults() {
        let ep: EndpointDefinition =
            serde_json::from_value(json!({"method": "GET", "path": "/posts"})).unwrap();
        assert!(ep.enabled);
        assert!(ep.summary.is_none());
        assert!(ep.request_schema.is_none());
        assert!(ep.responses.is_empty());
    }

    #[test]
    fn test_response_uses_camel_case_keys() {
        let r = ResponseDefinition::new(200, json!({"ok": true})).as_default();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["isDefault"], json!(true));
        assert_eq!(v["status"], json!(200));
    }

    #[test]
    fn test_match_rule_uses_match_key() {
        let r: ResponseDefinition = serde_json::from_value(json!({
            "status": 200,
            "match": {"query": {"x": "1"}, "bodyEquals": {"id": 1}}
        }))
        .unwrap();
        assert_eq!(r.match_rule, Some(json!({"query": {"x": "1"}, "bodyEquals": {"id": 1}})));

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["match"]["query"]["x"], json!("1"));

        let plain = serde_json::to_value(ResponseDefinition::new(200, json!({}))).unwrap();
        assert!(plain.get("match").is_none());
    }

    #[test]
    fn test_null_request_schema_is_not_declared() {
        let ep = EndpointDefinition::new("POST", "/posts").with_request_schema(json!(null));
        assert!(ep.declared_request_schema().is_none());
    }

    #[test]
    fn test_object_equality_ignores_key_order() {
        let a: SchemaValue = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: SchemaValue = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(json!([1, 2]), json!([2, 1]));
    }
}
