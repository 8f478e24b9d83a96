//! SQLite repository: version writes
//!
//! Versions are immutable once written. The only mutation of an existing row
//! is clearing `is_latest` when a newer version takes the flag.

#![allow(clippy::result_large_err)]

use crate::errors::{column_codec, from_rusqlite, Result};
use crate::repo::hydration::{fetch_latest_row, fetch_version_row, load_endpoints, ApiVersionRow};
use apidiff_core::errors::{ApiDiffError, ExError};
use apidiff_core::model::{ApiIdentity, EndpointDefinition, VersionSnapshot, VersionSummary};
use chrono::Utc;
use rusqlite::{Connection, Transaction};

/// Descriptive metadata stored alongside a version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionMeta {
    pub name: String,
    pub description: Option<String>,
    pub base_path: Option<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
}

impl VersionMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            base_path: None,
            tags: Vec::new(),
            is_active: true,
        }
    }
}

impl Default for VersionMeta {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// SQLite repository for versioned API definitions
pub struct SqliteRepo;

impl SqliteRepo {
    /// Persist a snapshot as a new version of `api`, returning its row id
    ///
    /// When `is_latest` is set, every other version of `api` loses the flag.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if `(workspace, slug, version)` is taken
    /// - `Persistence` on SQLite failure
    pub fn insert_version(
        conn: &mut Connection,
        api: &ApiIdentity,
        meta: &VersionMeta,
        snapshot: &VersionSnapshot,
        is_latest: bool,
    ) -> Result<i64> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let id = Self::insert_version_tx(&tx, api, meta, snapshot, is_latest, None)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(id)
    }

    /// Persist a snapshot within a transaction
    ///
    /// # Errors
    ///
    /// See [`SqliteRepo::insert_version`].
    pub fn insert_version_tx(
        tx: &Transaction,
        api: &ApiIdentity,
        meta: &VersionMeta,
        snapshot: &VersionSnapshot,
        is_latest: bool,
        parent_id: Option<i64>,
    ) -> Result<i64> {
        if fetch_version_row(tx, api, &snapshot.version)?.is_some() {
            return Err(ExError::from(ApiDiffError::VersionAlreadyExists {
                workspace: api.workspace.clone(),
                slug: api.slug.clone(),
                version: snapshot.version.clone(),
            })
            .with_op("insert_version"));
        }

        if is_latest {
            tx.execute(
                "UPDATE api_versions SET is_latest = 0 WHERE workspace = ?1 AND slug = ?2",
                [&api.workspace, &api.slug],
            )
            .map_err(from_rusqlite)?;
        }

        let tags = serde_json::to_string(&meta.tags).map_err(|e| column_codec("tags", e))?;
        tx.execute(
            "INSERT INTO api_versions
                (workspace, slug, name, description, base_path, tags, is_active,
                 version, is_latest, parent_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                api.workspace,
                api.slug,
                meta.name,
                meta.description,
                meta.base_path,
                tags,
                meta.is_active,
                snapshot.version,
                is_latest,
                parent_id,
                snapshot.created_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;
        let version_id = tx.last_insert_rowid();

        for (ordinal, endpoint) in snapshot.endpoints.iter().enumerate() {
            Self::persist_endpoint_tx(tx, version_id, ordinal, endpoint)?;
        }

        tracing::debug!(
            workspace = %api.workspace,
            api_slug = %api.slug,
            version = %snapshot.version,
            endpoints = snapshot.endpoints.len(),
            is_latest,
            "version persisted"
        );

        Ok(version_id)
    }

    fn persist_endpoint_tx(
        tx: &Transaction,
        version_id: i64,
        ordinal: usize,
        endpoint: &EndpointDefinition,
    ) -> Result<()> {
        let request_schema = endpoint
            .declared_request_schema()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| column_codec("request_schema", e))?;
        let responses = serde_json::to_string(&endpoint.responses)
            .map_err(|e| column_codec("responses", e))?;

        tx.execute(
            "INSERT INTO endpoints
                (api_version_id, ordinal, method, path, summary, enabled,
                 request_schema, responses, delay_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                version_id,
                i64::try_from(ordinal).unwrap_or(i64::MAX),
                endpoint.method,
                endpoint.path,
                endpoint.summary,
                endpoint.enabled,
                request_schema,
                responses,
                i64::try_from(endpoint.delay_ms).unwrap_or(i64::MAX),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Clone an existing version under a new label and make the clone latest
    ///
    /// The source is `source_version` when given, otherwise the current
    /// latest version. The clone records the source as its parent.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the API, the source version, or a latest version is missing
    /// - `AlreadyExists` if `new_version` is taken
    /// - `Persistence` on SQLite failure
    pub fn create_version(
        conn: &mut Connection,
        api: &ApiIdentity,
        new_version: &str,
        source_version: Option<&str>,
    ) -> Result<VersionSummary> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let source = Self::resolve_source(&tx, api, source_version)
            .map_err(|e| e.with_op("create_version"))?;
        let endpoints = load_endpoints(&tx, source.id)?;
        let snapshot = VersionSnapshot::new(new_version, Utc::now(), endpoints);
        let meta = source.meta();

        Self::insert_version_tx(&tx, api, &meta, &snapshot, true, Some(source.id))
            .map_err(|e| e.with_op("create_version"))?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(VersionSummary {
            version: snapshot.version.clone(),
            is_latest: true,
            created_at: snapshot.created_at,
            endpoint_count: snapshot.endpoint_count(),
        })
    }

    fn resolve_source(
        conn: &Connection,
        api: &ApiIdentity,
        source_version: Option<&str>,
    ) -> Result<ApiVersionRow> {
        let found = match source_version {
            Some(version) => fetch_version_row(conn, api, version)?,
            None => fetch_latest_row(conn, api)?,
        };
        if let Some(row) = found {
            return Ok(row);
        }

        let err = match source_version {
            Some(version) => ApiDiffError::VersionNotFound {
                workspace: api.workspace.clone(),
                slug: api.slug.clone(),
                version: version.to_string(),
            },
            None if Self::api_exists(conn, api)? => ApiDiffError::NoLatestVersion {
                workspace: api.workspace.clone(),
                slug: api.slug.clone(),
            },
            None => ApiDiffError::ApiNotFound {
                workspace: api.workspace.clone(),
                slug: api.slug.clone(),
            },
        };
        Err(err.into())
    }

    /// Whether any version of `api` exists
    pub fn api_exists(conn: &Connection, api: &ApiIdentity) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM api_versions WHERE workspace = ?1 AND slug = ?2)",
            [&api.workspace, &api.slug],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use crate::repo::hydration::{list_version_rows, load_snapshot};
    use apidiff_core::errors::ExErrorKind;
    use apidiff_core::model::ResponseDefinition;
    use serde_json::json;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    fn api() -> ApiIdentity {
        ApiIdentity::new("ws", "blog")
    }

    #[test]
    fn test_insert_and_load_round_trip() {
        let mut conn = setup();
        let endpoints = vec![
            EndpointDefinition::new("GET", "/posts")
                .with_summary("List posts")
                .with_response(
                    ResponseDefinition::new(200, json!([{"id": 1}]))
                        .with_header("X-Total", "1")
                        .as_default(),
                ),
            EndpointDefinition::new("POST", "/posts")
                .with_enabled(false)
                .with_request_schema(json!({"required": ["title"]})),
        ];
        let snapshot = VersionSnapshot::new("1.0.0", Utc::now(), endpoints.clone());
        SqliteRepo::insert_version(&mut conn, &api(), &VersionMeta::new("Blog"), &snapshot, true)
            .unwrap();

        let loaded = load_snapshot(&conn, &api(), "1.0.0").unwrap().unwrap();
        assert_eq!(loaded.endpoints, endpoints);
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            snapshot.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_duplicate_endpoints_keep_declaration_order() {
        let mut conn = setup();
        let endpoints = vec![
            EndpointDefinition::new("GET", "/a").with_summary("first"),
            EndpointDefinition::new("GET", "/a").with_summary("second"),
        ];
        let snapshot = VersionSnapshot::new("1", Utc::now(), endpoints.clone());
        SqliteRepo::insert_version(&mut conn, &api(), &VersionMeta::new("Blog"), &snapshot, true)
            .unwrap();
        let loaded = load_snapshot(&conn, &api(), "1").unwrap().unwrap();
        assert_eq!(loaded.endpoints, endpoints);
    }

    #[test]
    fn test_duplicate_version_is_already_exists() {
        let mut conn = setup();
        let snapshot = VersionSnapshot::new("1.0.0", Utc::now(), vec![]);
        let meta = VersionMeta::new("Blog");
        SqliteRepo::insert_version(&mut conn, &api(), &meta, &snapshot, true).unwrap();
        let err =
            SqliteRepo::insert_version(&mut conn, &api(), &meta, &snapshot, true).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_latest_flag_moves() {
        let mut conn = setup();
        let meta = VersionMeta::new("Blog");
        let v1 = VersionSnapshot::new("1", Utc::now(), vec![]);
        let v2 = VersionSnapshot::new("2", Utc::now(), vec![]);
        SqliteRepo::insert_version(&mut conn, &api(), &meta, &v1, true).unwrap();
        SqliteRepo::insert_version(&mut conn, &api(), &meta, &v2, true).unwrap();

        let rows = list_version_rows(&conn, &api()).unwrap();
        let latest: Vec<&str> = rows
            .iter()
            .filter(|r| r.is_latest)
            .map(|r| r.version.as_str())
            .collect();
        assert_eq!(latest, vec!["2"]);
    }

    #[test]
    fn test_create_version_clones_latest() {
        let mut conn = setup();
        let snapshot = VersionSnapshot::new(
            "1.0.0",
            Utc::now(),
            vec![EndpointDefinition::new("GET", "/posts")],
        );
        let meta = VersionMeta {
            description: Some("Posts API".to_string()),
            base_path: Some("/blog".to_string()),
            tags: vec!["content".to_string()],
            is_active: false,
            ..VersionMeta::new("Blog")
        };
        SqliteRepo::insert_version(&mut conn, &api(), &meta, &snapshot, true).unwrap();

        let summary = SqliteRepo::create_version(&mut conn, &api(), "1.1.0", None).unwrap();
        assert!(summary.is_latest);
        assert_eq!(summary.endpoint_count, 1);

        let rows = list_version_rows(&conn, &api()).unwrap();
        assert_eq!(rows[0].version, "1.1.0");
        assert_eq!(rows[0].parent_id, Some(rows[1].id));
        assert_eq!(rows[0].meta(), meta);
        assert!(!rows[1].is_latest);

        let cloned = load_snapshot(&conn, &api(), "1.1.0").unwrap().unwrap();
        assert_eq!(cloned.endpoints, snapshot.endpoints);
    }

    #[test]
    fn test_create_version_for_unknown_api() {
        let mut conn = setup();
        let err = SqliteRepo::create_version(&mut conn, &api(), "1.0.0", None).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.op(), Some("create_version"));
    }

    #[test]
    fn test_create_version_from_missing_source() {
        let mut conn = setup();
        let snapshot = VersionSnapshot::new("1.0.0", Utc::now(), vec![]);
        SqliteRepo::insert_version(&mut conn, &api(), &VersionMeta::new("Blog"), &snapshot, true)
            .unwrap();
        let err =
            SqliteRepo::create_version(&mut conn, &api(), "2.0.0", Some("0.1.0")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("ws/blog@0.1.0"));
    }
}
