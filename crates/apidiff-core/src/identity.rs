//! Endpoint identity resolution.
//!
//! The identity key is `method + ":" + path` with no normalization: `GET` and
//! `get` are different endpoints, and so are `/users/:id` and `/users/:userId`.

use crate::model::EndpointDefinition;

/// Derive the identity key of an endpoint. Total and deterministic.
pub fn identity_of(endpoint: &EndpointDefinition) -> String {
    format!("{}:{}", endpoint.method, endpoint.path)
}
