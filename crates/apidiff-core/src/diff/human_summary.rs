//! Human-readable summary renderer for API diffs.

use crate::diff::model::{ApiDiffResult, BreakingChange, FieldChange};

/// Render a Markdown summary of an [`ApiDiffResult`].
///
/// Informational only; the structured diff remains the source of truth.
pub fn render_human_summary(diff: &ApiDiffResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## API Diff: {} → {}\n\n",
        diff.from_version, diff.to_version
    ));

    let s = &diff.summary;
    out.push_str(&format!(
        "| Added | Removed | Modified | Unchanged | Breaking |\n\
         |---|---|---|---|---|\n\
         | {} | {} | {} | {} | {} |\n\n",
        s.additions, s.deletions, s.modifications, diff.unchanged_count, s.breaking_changes,
    ));

    if s.total_changes == 0 {
        out.push_str("_No changes detected._\n");
        return out;
    }

    if let Some(severity) = diff.max_severity() {
        out.push_str(&format!(
            "**Breaking changes**: {} (highest severity: {})\n\n",
            diff.breaking_changes_count,
            severity.as_str()
        ));
    }

    if !diff.added_endpoints.is_empty() {
        out.push_str("### Added Endpoints\n\n");
        for ep in &diff.added_endpoints {
            out.push_str(&endpoint_line(&ep.method, &ep.path, ep.summary.as_deref()));
        }
        out.push('\n');
    }

    if !diff.removed_endpoints.is_empty() {
        out.push_str("### Removed Endpoints\n\n");
        for ep in &diff.removed_endpoints {
            out.push_str(&endpoint_line(&ep.method, &ep.path, ep.summary.as_deref()));
            push_breaking(&mut out, &ep.breaking_changes);
        }
        out.push('\n');
    }

    if !diff.modified_endpoints.is_empty() {
        out.push_str("### Modified Endpoints\n\n");
        for ep in &diff.modified_endpoints {
            out.push_str(&endpoint_line(&ep.method, &ep.path, None));
            for change in &ep.changes {
                out.push_str(&field_line(change));
            }
            push_breaking(&mut out, &ep.breaking_changes);
        }
        out.push('\n');
    }

    out
}

fn endpoint_line(method: &str, path: &str, summary: Option<&str>) -> String {
    match summary {
        Some(summary) => format!("- `{} {}`: {}\n", method, path, summary),
        None => format!("- `{} {}`\n", method, path),
    }
}

fn field_line(change: &FieldChange) -> String {
    format!(
        "  - `{}`: `{}` → `{}`\n",
        change.field.as_str(),
        change.old_value,
        change.new_value
    )
}

fn push_breaking(out: &mut String, breaking: &[BreakingChange]) {
    for bc in breaking {
        out.push_str(&format!(
            "  - ⚠ **{}** `{}`: {}\n",
            bc.severity.as_str().to_uppercase(),
            bc.kind.as_str(),
            bc.description
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::compute_diff;
    use crate::model::{EndpointDefinition, VersionSnapshot};
    use chrono::Utc;

    fn snapshot(version: &str, endpoints: Vec<EndpointDefinition>) -> VersionSnapshot {
        VersionSnapshot::new(version, Utc::now(), endpoints)
    }

    #[test]
    fn test_no_changes_short_circuits() {
        let v = snapshot("1.0.0", vec![EndpointDefinition::new("GET", "/a")]);
        let text = render_human_summary(&compute_diff(&v, &v));
        assert!(text.starts_with("## API Diff: 1.0.0 → 1.0.0"));
        assert!(text.contains("_No changes detected._"));
        assert!(!text.contains("### "));
    }

    #[test]
    fn test_sections_and_severity_labels() {
        let from = snapshot(
            "1.0.0",
            vec![
                EndpointDefinition::new("GET", "/users").with_summary("List users"),
                EndpointDefinition::new("GET", "/posts").with_summary("List posts"),
            ],
        );
        let to = snapshot(
            "2.0.0",
            vec![
                EndpointDefinition::new("GET", "/posts")
                    .with_summary("List posts")
                    .with_enabled(false),
                EndpointDefinition::new("POST", "/posts"),
            ],
        );
        let text = render_human_summary(&compute_diff(&from, &to));

        assert!(text.contains("### Added Endpoints"));
        assert!(text.contains("- `POST /posts`\n"));
        assert!(text.contains("### Removed Endpoints"));
        assert!(text.contains("- `GET /users`: List users"));
        assert!(text.contains("**CRITICAL** `endpoint_removed`"));
        assert!(text.contains("### Modified Endpoints"));
        assert!(text.contains("`enabled`: `true` → `false`"));
        assert!(text.contains("**MAJOR** `endpoint_disabled`"));
        assert!(text.contains("**Breaking changes**: 2 (highest severity: critical)"));
    }

    #[test]
    fn test_additions_only_has_no_breaking_line() {
        let from = snapshot("1", vec![]);
        let to = snapshot("2", vec![EndpointDefinition::new("GET", "/a")]);
        let text = render_human_summary(&compute_diff(&from, &to));
        assert!(text.contains("### Added Endpoints"));
        assert!(!text.contains("**Breaking changes**"));
    }
}
