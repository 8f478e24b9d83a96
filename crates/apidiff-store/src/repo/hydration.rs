//! Loading version rows and endpoint sets from SQLite

#![allow(clippy::result_large_err)]

use crate::errors::{column_codec, from_rusqlite, Result};
use apidiff_core::model::{
    ApiIdentity, EndpointDefinition, ResponseDefinition, SchemaValue, VersionSnapshot,
    VersionSummary,
};
use chrono::{DateTime, Utc};
use crate::repo::VersionMeta;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

/// One row of `api_versions`, with its endpoint count
#[derive(Debug, Clone, PartialEq)]
pub struct ApiVersionRow {
    pub id: i64,
    pub workspace: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub base_path: Option<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub version: String,
    pub is_latest: bool,
    /// The version this one was cloned from, if any
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub endpoint_count: usize,
}

impl ApiVersionRow {
    pub fn api(&self) -> ApiIdentity {
        ApiIdentity::new(self.workspace.clone(), self.slug.clone())
    }

    pub fn meta(&self) -> VersionMeta {
        VersionMeta {
            name: self.name.clone(),
            description: self.description.clone(),
            base_path: self.base_path.clone(),
            tags: self.tags.clone(),
            is_active: self.is_active,
        }
    }

    pub fn to_summary(&self) -> VersionSummary {
        VersionSummary {
            version: self.version.clone(),
            is_latest: self.is_latest,
            created_at: self.created_at,
            endpoint_count: self.endpoint_count,
        }
    }
}

const VERSION_COLUMNS: &str = "v.id, v.workspace, v.slug, v.name, v.description, v.version,
     v.is_latest, v.parent_id, v.created_at,
     (SELECT COUNT(*) FROM endpoints e WHERE e.api_version_id = v.id),
     v.base_path, v.tags, v.is_active";

fn version_from_row(row: &Row<'_>) -> rusqlite::Result<ApiVersionRow> {
    let created_ms: i64 = row.get(8)?;
    let count: i64 = row.get(9)?;
    let tags_json: String = row.get(11)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;
    Ok(ApiVersionRow {
        id: row.get(0)?,
        workspace: row.get(1)?,
        slug: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        base_path: row.get(10)?,
        tags,
        is_active: row.get(12)?,
        version: row.get(5)?,
        is_latest: row.get(6)?,
        parent_id: row.get(7)?,
        created_at: millis_to_datetime(created_ms),
        endpoint_count: usize::try_from(count).unwrap_or(0),
    })
}

pub(crate) fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// All versions of `api`, most recent first (`created_at DESC, id DESC`)
pub fn list_version_rows(conn: &Connection, api: &ApiIdentity) -> Result<Vec<ApiVersionRow>> {
    let sql = format!(
        "SELECT {} FROM api_versions v
         WHERE v.workspace = ?1 AND v.slug = ?2
         ORDER BY v.created_at DESC, v.id DESC",
        VERSION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([&api.workspace, &api.slug], version_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

/// The row for one version label, if present
pub fn fetch_version_row(
    conn: &Connection,
    api: &ApiIdentity,
    version: &str,
) -> Result<Option<ApiVersionRow>> {
    let sql = format!(
        "SELECT {} FROM api_versions v
         WHERE v.workspace = ?1 AND v.slug = ?2 AND v.version = ?3",
        VERSION_COLUMNS
    );
    conn.query_row(
        &sql,
        rusqlite::params![api.workspace, api.slug, version],
        version_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// The most recent row flagged latest, if any
pub fn fetch_latest_row(conn: &Connection, api: &ApiIdentity) -> Result<Option<ApiVersionRow>> {
    let sql = format!(
        "SELECT {} FROM api_versions v
         WHERE v.workspace = ?1 AND v.slug = ?2 AND v.is_latest = 1
         ORDER BY v.created_at DESC, v.id DESC
         LIMIT 1",
        VERSION_COLUMNS
    );
    conn.query_row(&sql, [&api.workspace, &api.slug], version_from_row)
        .optional()
        .map_err(from_rusqlite)
}

struct EndpointRow {
    method: String,
    path: String,
    summary: Option<String>,
    enabled: bool,
    request_schema: Option<String>,
    responses: String,
    delay_ms: i64,
}

impl EndpointRow {
    fn decode(self) -> Result<EndpointDefinition> {
        let request_schema = self
            .request_schema
            .as_deref()
            .map(serde_json::from_str::<SchemaValue>)
            .transpose()
            .map_err(|e| column_codec("request_schema", e))?;
        let responses: Vec<ResponseDefinition> = serde_json::from_str(&self.responses)
            .map_err(|e| column_codec("responses", e))?;

        Ok(EndpointDefinition {
            method: self.method,
            path: self.path,
            summary: self.summary,
            enabled: self.enabled,
            request_schema,
            responses,
            delay_ms: u64::try_from(self.delay_ms).unwrap_or(0),
        })
    }
}

/// Endpoints of one stored version, in ordinal order
pub fn load_endpoints(conn: &Connection, api_version_id: i64) -> Result<Vec<EndpointDefinition>> {
    let mut stmt = conn
        .prepare(
            "SELECT method, path, summary, enabled, request_schema, responses, delay_ms
             FROM endpoints
             WHERE api_version_id = ?1
             ORDER BY ordinal",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([api_version_id], |row| {
            Ok(EndpointRow {
                method: row.get(0)?,
                path: row.get(1)?,
                summary: row.get(2)?,
                enabled: row.get(3)?,
                request_schema: row.get(4)?,
                responses: row.get(5)?,
                delay_ms: row.get(6)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter().map(EndpointRow::decode).collect()
}

/// Load one version as a snapshot
pub fn load_snapshot(
    conn: &Connection,
    api: &ApiIdentity,
    version: &str,
) -> Result<Option<VersionSnapshot>> {
    let Some(row) = fetch_version_row(conn, api, version)? else {
        return Ok(None);
    };
    let endpoints = load_endpoints(conn, row.id)?;
    Ok(Some(VersionSnapshot::new(row.version, row.created_at, endpoints)))
}
