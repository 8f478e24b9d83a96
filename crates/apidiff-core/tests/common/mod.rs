use apidiff_core::model::{
    ApiIdentity, EndpointDefinition, ResponseDefinition, VersionSnapshot,
};
use apidiff_core::InMemoryRegistry;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

/// Fixed base timestamp so listings are deterministic
#[allow(dead_code)]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(dead_code)]
pub fn snapshot(version: &str, endpoints: Vec<EndpointDefinition>) -> VersionSnapshot {
    VersionSnapshot::new(version, t0(), endpoints)
}

/// An enabled endpoint with a single default 200 response
#[allow(dead_code)]
pub fn endpoint(method: &str, path: &str) -> EndpointDefinition {
    EndpointDefinition::new(method, path)
        .with_response(ResponseDefinition::new(200, json!({"ok": true})).as_default())
}

/// Registry holding `versions` for `ws/blog`, created one minute apart in
/// the given order; the last one is flagged latest.
#[allow(dead_code)]
pub fn blog_registry(versions: Vec<VersionSnapshot>) -> (InMemoryRegistry, ApiIdentity) {
    let api = ApiIdentity::new("ws", "blog");
    let mut reg = InMemoryRegistry::new();
    let last = versions.len().saturating_sub(1);
    for (i, mut snap) in versions.into_iter().enumerate() {
        snap.created_at = t0() + Duration::minutes(i as i64);
        reg.insert(&api, snap, i == last).unwrap();
    }
    (reg, api)
}
