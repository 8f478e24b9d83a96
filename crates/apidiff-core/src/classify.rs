//! Breaking-change classification.
//!
//! Classification is a flat table of independent rules. Each rule inspects a
//! [`ComparisonContext`] and reports zero or more findings; every finding
//! becomes one [`BreakingChange`] carrying the rule's kind and severity.
//! Rules never see each other's output, so several may fire for the same
//! endpoint and new rules can be appended without touching existing ones.

use crate::diff::model::{BreakingChange, BreakingChangeKind, Severity};
use crate::model::{EndpointDefinition, SchemaValue};

/// The two sides of one identity key.
///
/// `from` only: removed endpoint. `to` only: added endpoint. Both: common.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonContext<'a> {
    pub from: Option<&'a EndpointDefinition>,
    pub to: Option<&'a EndpointDefinition>,
}

impl<'a> ComparisonContext<'a> {
    pub fn removed(from: &'a EndpointDefinition) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    pub fn added(to: &'a EndpointDefinition) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    pub fn common(from: &'a EndpointDefinition, to: &'a EndpointDefinition) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    fn both(&self) -> Option<(&'a EndpointDefinition, &'a EndpointDefinition)> {
        self.from.zip(self.to)
    }
}

/// Detector returning one description per finding
pub type Detector = fn(&ComparisonContext<'_>) -> Vec<String>;

/// A predicate → (kind, severity) entry of the rule table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: BreakingChangeKind,
    pub severity: Severity,
    detect: Detector,
}

impl Rule {
    pub const fn new(kind: BreakingChangeKind, severity: Severity, detect: Detector) -> Self {
        Self {
            kind,
            severity,
            detect,
        }
    }

    pub fn evaluate(&self, ctx: &ComparisonContext<'_>) -> Vec<BreakingChange> {
        (self.detect)(ctx)
            .into_iter()
            .map(|description| BreakingChange {
                kind: self.kind,
                description,
                severity: self.severity,
            })
            .collect()
    }
}

/// The built-in rule table, in evaluation order
pub const RULES: &[Rule] = &[
    Rule::new(
        BreakingChangeKind::EndpointRemoved,
        Severity::Critical,
        detect_endpoint_removed,
    ),
    Rule::new(
        BreakingChangeKind::EndpointDisabled,
        Severity::Major,
        detect_endpoint_disabled,
    ),
    Rule::new(
        BreakingChangeKind::ResponseStatusRemoved,
        Severity::Major,
        detect_response_status_removed,
    ),
    Rule::new(
        BreakingChangeKind::RequiredParamAdded,
        Severity::Critical,
        detect_required_param_added,
    ),
];

/// Classify one identity key against the built-in rule table
pub fn classify(ctx: &ComparisonContext<'_>) -> Vec<BreakingChange> {
    classify_with(RULES, ctx)
}

/// Classify one identity key against an arbitrary rule table
pub fn classify_with(rules: &[Rule], ctx: &ComparisonContext<'_>) -> Vec<BreakingChange> {
    rules.iter().flat_map(|rule| rule.evaluate(ctx)).collect()
}

fn detect_endpoint_removed(ctx: &ComparisonContext<'_>) -> Vec<String> {
    match (ctx.from, ctx.to) {
        (Some(from), None) => vec![format!(
            "Endpoint {} {} was removed",
            from.method, from.path
        )],
        _ => Vec::new(),
    }
}

fn detect_endpoint_disabled(ctx: &ComparisonContext<'_>) -> Vec<String> {
    match ctx.both() {
        Some((from, to)) if from.enabled && !to.enabled => {
            vec!["Endpoint was disabled".to_string()]
        }
        _ => Vec::new(),
    }
}

fn detect_response_status_removed(ctx: &ComparisonContext<'_>) -> Vec<String> {
    let Some((from, to)) = ctx.both() else {
        return Vec::new();
    };

    let mut seen: Vec<u16> = Vec::new();
    for response in &from.responses {
        if !seen.contains(&response.status) {
            seen.push(response.status);
        }
    }

    seen.into_iter()
        .filter(|status| !to.responses.iter().any(|r| r.status == *status))
        .map(|status| format!("Response status {} was removed", status))
        .collect()
}

fn detect_required_param_added(ctx: &ComparisonContext<'_>) -> Vec<String> {
    let Some((from, to)) = ctx.both() else {
        return Vec::new();
    };
    let (Some(from_schema), Some(to_schema)) =
        (from.declared_request_schema(), to.declared_request_schema())
    else {
        return Vec::new();
    };

    let from_required = required_fields(from_schema);
    required_fields(to_schema)
        .into_iter()
        .filter(|field| !from_required.contains(field))
        .map(|field| format!("Required parameter '{}' was added", field_label(field)))
        .collect()
}

/// The schema's `required` list; anything other than an array counts as empty
fn required_fields(schema: &SchemaValue) -> Vec<&SchemaValue> {
    schema
        .get("required")
        .and_then(SchemaValue::as_array)
        .map(|fields| fields.iter().collect())
        .unwrap_or_default()
}

fn field_label(field: &SchemaValue) -> String {
    match field.as_str() {
        Some(name) => name.to_string(),
        None => field.to_string(),
    }
}
