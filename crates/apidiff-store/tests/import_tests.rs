//! Importing definition files from disk.

use apidiff_core::errors::ExErrorKind;
use apidiff_core::model::ApiIdentity;
use apidiff_core::VersionRegistry;
use apidiff_store::import::import_api_file;
use apidiff_store::repo::hydration::{fetch_latest_row, load_snapshot};
use apidiff_store::repo::SqliteRegistry;
use std::fs;

const BLOG_V1: &str = r#"{
    "type": "mock-api-definition",
    "schemaVersion": "1.0",
    "api": {"name": "Blog", "slug": "blog", "version": "1.0.0", "description": "Posts"},
    "endpoints": [
        {"method": "GET", "path": "/posts", "summary": "List posts",
         "responses": [{"status": 200, "body": [], "isDefault": true}]},
        {"method": "GET", "path": "/posts/:id",
         "responses": [{"status": 200, "body": {"id": 1}}, {"status": 404, "body": null}]}
    ]
}"#;

const BLOG_V2_YAML: &str = r#"
type: mock-api-definition
schemaVersion: "1.0"
api:
  name: Blog
  slug: blog
  version: 2.0.0
endpoints:
  - method: GET
    path: /posts
    summary: List posts
    responses:
      - status: 200
        body: []
        isDefault: true
"#;

#[test]
fn test_import_json_then_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();

    let v1_path = dir.path().join("blog-v1.json");
    fs::write(&v1_path, BLOG_V1).unwrap();
    let v2_path = dir.path().join("blog-v2.yaml");
    fs::write(&v2_path, BLOG_V2_YAML).unwrap();

    let first = import_api_file(&v1_path, "acme", &mut conn).unwrap();
    assert_eq!(first.api, ApiIdentity::new("acme", "blog"));
    assert_eq!(first.version, "1.0.0");
    assert_eq!(first.endpoint_count, 2);
    assert_eq!(first.definition_digest.len(), 64);

    let second = import_api_file(&v2_path, "acme", &mut conn).unwrap();
    assert_eq!(second.version, "2.0.0");

    let registry = SqliteRegistry::new(&conn);
    let versions = registry
        .list_versions(&ApiIdentity::new("acme", "blog"))
        .unwrap();
    assert_eq!(versions.len(), 2);
    assert!(versions.iter().any(|v| v.version == "2.0.0" && v.is_latest));
    assert!(versions.iter().any(|v| v.version == "1.0.0" && !v.is_latest));

    let logged: i64 = conn
        .query_row("SELECT COUNT(*) FROM import_log", [], |row| row.get(0))
        .unwrap();
    assert_eq!(logged, 2);
}

#[test]
fn test_import_preserves_endpoint_details() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let path = dir.path().join("blog.json");
    fs::write(&path, BLOG_V1).unwrap();
    import_api_file(&path, "acme", &mut conn).unwrap();

    let snapshot = load_snapshot(&conn, &ApiIdentity::new("acme", "blog"), "1.0.0")
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.endpoints.len(), 2);
    assert_eq!(snapshot.endpoints[0].summary.as_deref(), Some("List posts"));
    assert!(snapshot.endpoints[0].responses[0].is_default);
    assert_eq!(snapshot.endpoints[1].responses.len(), 2);
}

#[test]
fn test_import_keeps_api_metadata_and_match_rules() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let path = dir.path().join("search.json");
    fs::write(
        &path,
        r#"{
            "type": "mock-api-definition",
            "schemaVersion": "1.0",
            "api": {"name": "Search", "slug": "search", "version": "1.0.0",
                    "basePath": "/v1", "tags": ["public", "beta"], "isActive": false},
            "endpoints": [
                {"method": "GET", "path": "/search",
                 "responses": [{"status": 200, "body": [], "match": {"query": {"q": "rust"}}}]}
            ]
        }"#,
    )
    .unwrap();
    import_api_file(&path, "acme", &mut conn).unwrap();

    let api = ApiIdentity::new("acme", "search");
    let row = fetch_latest_row(&conn, &api).unwrap().unwrap();
    assert_eq!(row.base_path.as_deref(), Some("/v1"));
    assert_eq!(row.tags, vec!["public".to_string(), "beta".to_string()]);
    assert!(!row.is_active);

    let snapshot = load_snapshot(&conn, &api, "1.0.0").unwrap().unwrap();
    assert_eq!(
        snapshot.endpoints[0].responses[0].match_rule,
        Some(serde_json::json!({"query": {"q": "rust"}}))
    );
}

#[test]
fn test_metadata_defaults_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let path = dir.path().join("blog.json");
    fs::write(&path, BLOG_V1).unwrap();
    import_api_file(&path, "acme", &mut conn).unwrap();

    let row = fetch_latest_row(&conn, &ApiIdentity::new("acme", "blog"))
        .unwrap()
        .unwrap();
    assert!(row.base_path.is_none());
    assert!(row.tags.is_empty());
    assert!(row.is_active);
}

#[test]
fn test_reimporting_same_version_is_already_exists() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let path = dir.path().join("blog.json");
    fs::write(&path, BLOG_V1).unwrap();

    import_api_file(&path, "acme", &mut conn).unwrap();
    let err = import_api_file(&path, "acme", &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);

    // Same file into another workspace is a different API
    import_api_file(&path, "other", &mut conn).unwrap();
}

#[test]
fn test_missing_version_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let path = dir.path().join("blog.json");
    fs::write(&path, BLOG_V1.replace(r#""version": "1.0.0", "#, "")).unwrap();

    let outcome = import_api_file(&path, "acme", &mut conn).unwrap();
    assert_eq!(outcome.version, "1.0.0");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let err = import_api_file(&dir.path().join("absent.json"), "acme", &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
}

#[test]
fn test_invalid_file_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = apidiff_store::db::open_store(dir.path().join("store.db")).unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, BLOG_V1.replace("\"/posts\"", "\"posts\"")).unwrap();

    let err = import_api_file(&path, "acme", &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM api_versions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
