//! Integration tests for the read-only query surface.
//!
//! All tests use a real SQLite DB via TempDir.

use apidiff_core::errors::ExErrorKind;
use apidiff_core::model::{ApiIdentity, EndpointDefinition, ResponseDefinition, VersionSnapshot};
use apidiff_core::core_types::schema::{EVENT_END_ERROR, EVENT_START};
use apidiff_core::core_types::TraceId;
use apidiff_core::logging_facility::test_capture::init_test_capture;
use apidiff_engine::commands::engine_query::{
    apply_engine_query, apply_engine_query_in, ComparisonResult, EngineQuery, EngineQueryResult,
};
use apidiff_engine::commands::RequestContext;
use apidiff_store::repo::{SqliteRepo, VersionMeta};
use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn setup() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let conn = apidiff_store::db::open_store(temp_dir.path().join("test.db")).unwrap();
    (temp_dir, conn)
}

fn blog() -> ApiIdentity {
    ApiIdentity::new("default", "blog")
}

/// v1: GET /posts, GET /users. v2: GET /posts (disabled), POST /posts.
fn seed_two_versions(conn: &mut Connection) {
    let t0 = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single().unwrap();
    let posts = EndpointDefinition::new("GET", "/posts")
        .with_response(ResponseDefinition::new(200, json!([])).as_default());

    let v1 = VersionSnapshot::new(
        "1.0.0",
        t0,
        vec![posts.clone(), EndpointDefinition::new("GET", "/users")],
    );
    let v2 = VersionSnapshot::new(
        "2.0.0",
        t0 + Duration::hours(1),
        vec![
            posts.with_enabled(false),
            EndpointDefinition::new("POST", "/posts"),
        ],
    );

    let meta = VersionMeta::new("Blog");
    SqliteRepo::insert_version(conn, &blog(), &meta, &v1, true).unwrap();
    SqliteRepo::insert_version(conn, &blog(), &meta, &v2, true).unwrap();
}

fn expect_comparison(result: EngineQueryResult) -> ComparisonResult {
    match result {
        EngineQueryResult::Comparison(c) => *c,
        other => panic!("expected a comparison, got {:?}", other),
    }
}

fn version_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM api_versions", [], |r| r.get(0))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_versions() {
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);

    let result = apply_engine_query(EngineQuery::ListVersions { api: blog() }, &conn).unwrap();
    let EngineQueryResult::VersionList(list) = result else {
        panic!("expected a version list");
    };
    assert_eq!(list.total, 2);
    assert_eq!(list.versions[0].version, "2.0.0");
    assert!(list.versions[0].is_latest);

    let value = serde_json::to_value(&list).unwrap();
    assert_eq!(value["api"]["slug"], "blog");
    assert_eq!(value["versions"][1]["endpointCount"], 2);
}

#[test]
fn test_compare_versions_reports_breaking_changes() {
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);

    let query = EngineQuery::CompareVersions {
        api: blog(),
        from: "1.0.0".to_string(),
        to: "2.0.0".to_string(),
    };
    let cmp = expect_comparison(apply_engine_query(query, &conn).unwrap());

    assert!(cmp.has_breaking_changes);
    // GET /users removed (critical) + GET /posts disabled (major)
    assert_eq!(cmp.diff.breaking_changes_count, 2);
    assert_eq!(cmp.message, "Found 2 breaking change(s)");
    assert!(cmp.latest_version.is_none());
    assert!(cmp.human_summary.starts_with("## API Diff: 1.0.0 → 2.0.0"));
    assert!(cmp.human_summary.contains("`GET /users`"));
}

#[test]
fn test_compare_forward_without_breaking_changes() {
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);
    SqliteRepo::create_version(&mut conn, &blog(), "2.1.0", None).unwrap();

    let query = EngineQuery::CompareVersions {
        api: blog(),
        from: "2.0.0".to_string(),
        to: "2.1.0".to_string(),
    };
    let cmp = expect_comparison(apply_engine_query(query, &conn).unwrap());
    assert!(!cmp.has_breaking_changes);
    assert_eq!(cmp.message, "No breaking changes detected");
}

#[test]
fn test_compare_with_latest_names_the_latest() {
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);

    let query = EngineQuery::CompareWithLatest {
        api: blog(),
        version: "1.0.0".to_string(),
    };
    let cmp = expect_comparison(apply_engine_query(query, &conn).unwrap());

    assert_eq!(cmp.latest_version.as_deref(), Some("2.0.0"));
    let value = serde_json::to_value(&cmp).unwrap();
    assert_eq!(value["latestVersion"], "2.0.0");
    assert_eq!(value["hasBreakingChanges"], true);
    assert_eq!(value["diff"]["summary"]["additions"], 1);
    assert!(value.get("humanSummary").is_none());
}

#[test]
fn test_queries_are_read_only() {
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);
    let before = version_rows(&conn);

    apply_engine_query(
        EngineQuery::CompareVersions {
            api: blog(),
            from: "1.0.0".to_string(),
            to: "2.0.0".to_string(),
        },
        &conn,
    )
    .unwrap();
    apply_engine_query(EngineQuery::ListVersions { api: blog() }, &conn).unwrap();

    assert_eq!(before, version_rows(&conn));
}

#[test]
fn test_missing_version_is_not_found() {
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);

    let err = apply_engine_query(
        EngineQuery::CompareVersions {
            api: blog(),
            from: "1.0.0".to_string(),
            to: "9.0.0".to_string(),
        },
        &conn,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_unknown_api_is_not_found() {
    let (_tmp, conn) = setup();
    let err = apply_engine_query(
        EngineQuery::ListVersions {
            api: ApiIdentity::new("default", "ghost"),
        },
        &conn,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_errors_carry_request_id() {
    let (_tmp, conn) = setup();
    let err = apply_engine_query(
        EngineQuery::ListVersions {
            api: ApiIdentity::new("default", "ghost"),
        },
        &conn,
    )
    .unwrap_err();
    assert!(err.request_id().is_some());
    assert!(err.to_string().contains("(request_id: "));
}

#[test]
fn test_request_context_reaches_errors_and_logs() {
    let capture = init_test_capture();
    let (_tmp, mut conn) = setup();
    seed_two_versions(&mut conn);

    let ctx = RequestContext::new().with_trace_id(TraceId::from_string("trace-42".to_string()));
    let err = apply_engine_query_in(
        EngineQuery::CompareWithLatest {
            api: blog(),
            version: "0.9.0".to_string(),
        },
        &conn,
        &ctx,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.request_id(), Some(&ctx.request_id));
    assert_eq!(err.trace_id().map(|t| t.as_str()), Some("trace-42"));

    let events: Vec<_> = capture
        .events_for_op("compare_latest")
        .into_iter()
        .filter(|e| e.field("request_id") == Some(ctx.request_id.as_str()))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("trace_id"), Some("trace-42"));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END_ERROR));
}
