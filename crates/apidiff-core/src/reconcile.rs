//! Set reconciliation of two endpoint collections by identity key.

use std::collections::HashMap;

use crate::identity::identity_of;
use crate::model::EndpointDefinition;

/// Endpoints of one snapshot keyed by identity.
///
/// When a key occurs more than once the later endpoint shadows the earlier
/// one, while the key keeps the position of its first occurrence. The
/// shadowed endpoint takes no further part in the diff.
#[derive(Debug, Clone, Default)]
pub struct KeyedEndpoints<'a> {
    order: Vec<String>,
    by_key: HashMap<String, &'a EndpointDefinition>,
}

impl<'a> KeyedEndpoints<'a> {
    pub fn from_endpoints(endpoints: &'a [EndpointDefinition]) -> Self {
        let mut keyed = Self::default();
        for endpoint in endpoints {
            let key = identity_of(endpoint);
            if keyed.by_key.insert(key.clone(), endpoint).is_none() {
                keyed.order.push(key);
            }
        }
        keyed
    }

    pub fn get(&self, key: &str) -> Option<&'a EndpointDefinition> {
        self.by_key.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Distinct keys in first-occurrence order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Partition of the identity keys of two snapshots.
///
/// `added_keys` follow the `to` collection's order; `removed_keys` and
/// `common_keys` follow the `from` collection's order.
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
    pub from: KeyedEndpoints<'a>,
    pub to: KeyedEndpoints<'a>,
    pub added_keys: Vec<String>,
    pub removed_keys: Vec<String>,
    pub common_keys: Vec<String>,
}

/// Split two endpoint collections into added / removed / common keys.
pub fn reconcile<'a>(
    from: &'a [EndpointDefinition],
    to: &'a [EndpointDefinition],
) -> Reconciliation<'a> {
    let from = KeyedEndpoints::from_endpoints(from);
    let to = KeyedEndpoints::from_endpoints(to);

    let added_keys = to
        .keys()
        .filter(|k| !from.contains(k))
        .map(str::to_string)
        .collect();

    let (common_keys, removed_keys): (Vec<String>, Vec<String>) = from
        .keys()
        .map(str::to_string)
        .partition(|k| to.contains(k));

    Reconciliation {
        from,
        to,
        added_keys,
        removed_keys,
        common_keys,
    }
}
