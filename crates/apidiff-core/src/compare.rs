//! Field-level comparison of an endpoint present in both snapshots.

use serde::Serialize;

use crate::diff::model::{ChangeType, EndpointField, FieldChange};
use crate::model::{EndpointDefinition, SchemaValue};

/// Compare `summary`, `enabled`, `responses` and `requestSchema`, in that order.
///
/// Equality is structural. The response list is compared as a whole, so any
/// difference inside it (a status, a header, a body, a match rule, or the order
/// of entries)
/// yields exactly one `responses` change.
pub fn compare_endpoints(from: &EndpointDefinition, to: &EndpointDefinition) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if from.summary != to.summary {
        changes.push(field_change(EndpointField::Summary, &from.summary, &to.summary));
    }

    if from.enabled != to.enabled {
        changes.push(field_change(EndpointField::Enabled, &from.enabled, &to.enabled));
    }

    if from.responses != to.responses {
        changes.push(field_change(
            EndpointField::Responses,
            &from.responses,
            &to.responses,
        ));
    }

    let (from_schema, to_schema) = (from.declared_request_schema(), to.declared_request_schema());
    if from_schema != to_schema {
        changes.push(field_change(
            EndpointField::RequestSchema,
            &from_schema,
            &to_schema,
        ));
    }

    changes
}

fn field_change<T: Serialize>(field: EndpointField, old: &T, new: &T) -> FieldChange {
    FieldChange {
        field,
        old_value: to_schema_value(old),
        new_value: to_schema_value(new),
        change_type: ChangeType::Modified,
    }
}

// Model types serialize infallibly: string keys only, no non-finite floats.
fn to_schema_value<T: Serialize>(value: &T) -> SchemaValue {
    serde_json::to_value(value).unwrap_or(SchemaValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponseDefinition;
    use serde_json::json;

    fn base() -> EndpointDefinition {
        EndpointDefinition::new("GET", "/posts/:id")
            .with_summary("Get post")
            .with_response(ResponseDefinition::new(200, json!({"id": 1})).as_default())
            .with_response(ResponseDefinition::new(404, json!({"error": "not found"})))
    }

    #[test]
    fn test_identical_endpoints_have_no_changes() {
        assert!(compare_endpoints(&base(), &base()).is_empty());
    }

    #[test]
    fn test_fields_are_reported_in_fixed_order() {
        let mut to = base()
            .with_summary("Fetch post")
            .with_enabled(false)
            .with_request_schema(json!({"type": "object"}));
        to.responses.pop();

        let fields: Vec<EndpointField> = compare_endpoints(&base(), &to)
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                EndpointField::Summary,
                EndpointField::Enabled,
                EndpointField::Responses,
                EndpointField::RequestSchema,
            ]
        );
    }

    #[test]
    fn test_response_differences_collapse_into_one_change() {
        let mut to = base();
        to.responses[0] = to.responses[0].clone().with_header("X-Trace", "1");
        to.responses[1].body = json!({"error": "gone"});
        to.responses
            .push(ResponseDefinition::new(500, json!({"error": "boom"})));

        let changes = compare_endpoints(&base(), &to);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, EndpointField::Responses);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
    }

    #[test]
    fn test_match_rule_change_is_a_responses_change() {
        let mut from = base();
        from.responses[0] = from.responses[0].clone().with_match(json!({"query": {"x": "1"}}));
        let mut to = base();
        to.responses[0] = to.responses[0].clone().with_match(json!({"query": {"x": "2"}}));

        let changes = compare_endpoints(&from, &to);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, EndpointField::Responses);
        assert_eq!(changes[0].new_value[0]["match"]["query"]["x"], json!("2"));
    }

    #[test]
    fn test_reordered_responses_register_as_change() {
        let mut to = base();
        to.responses.reverse();
        let changes = compare_endpoints(&base(), &to);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, EndpointField::Responses);
    }

    #[test]
    fn test_summary_change_carries_old_and_new_values() {
        let to = base().with_summary("Fetch post");
        let changes = compare_endpoints(&base(), &to);
        assert_eq!(changes[0].old_value, json!("Get post"));
        assert_eq!(changes[0].new_value, json!("Fetch post"));
    }

    #[test]
    fn test_schema_added_from_nothing_is_a_change() {
        let to = base().with_request_schema(json!({"required": ["title"]}));
        let changes = compare_endpoints(&base(), &to);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, EndpointField::RequestSchema);
        assert_eq!(changes[0].old_value, json!(null));
    }

    #[test]
    fn test_explicit_null_schema_equals_absent_schema() {
        let from = base();
        let to = base().with_request_schema(json!(null));
        assert!(compare_endpoints(&from, &to).is_empty());
    }

    #[test]
    fn test_delay_is_not_compared() {
        let mut to = base();
        to.delay_ms = 250;
        assert!(compare_endpoints(&base(), &to).is_empty());
    }
}
