//! Attribute projection for SCIM responses (RFC 7644 §3.4.2.5).
//!
//! Handles the `attributes` and `excludedAttributes` query parameters.
//! When `attributes` is given it takes precedence and `excludedAttributes`
//! is ignored entirely. The always-returned attributes (`schemas`, `id`,
//! `meta`) are kept in every projection and can never be excluded.
//!
//! Attribute names match the resource's keys case-insensitively at every
//! level, and the output preserves the resource's original key casing. A
//! dotted name such as `name.givenName` selects (or removes) just that
//! sub-attribute inside its parent; a bare top-level name takes precedence
//! over any dotted entry for the same parent.
//!
//! The input resource is never mutated; projection returns a new value.

use crate::filter::path::attr_names_match;
use serde_json::{Map, Value};

/// Attributes returned in every response regardless of projection.
const ALWAYS_RETURNED: [&str; 3] = ["schemas", "id", "meta"];

/// Project a single resource according to `attributes` /
/// `excludedAttributes`.
///
/// With neither parameter present the resource is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use scim_query::projection::apply_attribute_projection;
/// use serde_json::json;
///
/// let user = json!({
///     "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
///     "id": "1", "meta": {}, "userName": "a", "active": true
/// });
/// let projected = apply_attribute_projection(
///     &user,
///     Some(&["userName".to_string()]),
///     None,
/// );
/// assert!(projected.get("userName").is_some());
/// assert!(projected.get("active").is_none());
/// assert!(projected.get("id").is_some());
/// ```
pub fn apply_attribute_projection(
    resource: &Value,
    attributes: Option<&[String]>,
    excluded_attributes: Option<&[String]>,
) -> Value {
    let Some(object) = resource.as_object() else {
        return resource.clone();
    };

    // attributes wins over excludedAttributes per RFC 7644 §3.4.2.5
    if let Some(attributes) = attributes.filter(|a| !a.is_empty()) {
        return project_included(object, attributes);
    }
    if let Some(excluded) = excluded_attributes.filter(|e| !e.is_empty()) {
        return project_excluded(object, excluded);
    }
    resource.clone()
}

/// Project every resource in a list.
pub fn apply_attribute_projection_to_list(
    resources: &[Value],
    attributes: Option<&[String]>,
    excluded_attributes: Option<&[String]>,
) -> Vec<Value> {
    resources
        .iter()
        .map(|resource| apply_attribute_projection(resource, attributes, excluded_attributes))
        .collect()
}

fn project_included(object: &Map<String, Value>, attributes: &[String]) -> Value {
    let mut output = Map::new();

    for name in ALWAYS_RETURNED {
        if let Some((key, value)) = find_entry(object, name) {
            output.insert(key.clone(), value.clone());
        }
    }

    // Bare names first so they take precedence over dotted entries for the
    // same top-level attribute.
    for name in attributes {
        if !name.contains('.') {
            if let Some((key, value)) = find_entry(object, name) {
                output.insert(key.clone(), value.clone());
            }
        }
    }

    for name in attributes {
        let Some((parent_name, sub_name)) = name.split_once('.') else {
            continue;
        };
        let Some((parent_key, parent_value)) = find_entry(object, parent_name) else {
            continue;
        };
        if output.contains_key(parent_key) && !output[parent_key].is_object() {
            continue;
        }
        let whole_parent_requested = attributes
            .iter()
            .any(|a| !a.contains('.') && attr_names_match(a, parent_name));
        if whole_parent_requested {
            continue;
        }
        let Some(parent_object) = parent_value.as_object() else {
            continue;
        };
        if let Some((sub_key, sub_value)) = find_entry(parent_object, sub_name) {
            let slot = output
                .entry(parent_key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(slot_object) = slot.as_object_mut() {
                slot_object.insert(sub_key.clone(), sub_value.clone());
            }
        }
    }

    Value::Object(output)
}

fn project_excluded(object: &Map<String, Value>, excluded: &[String]) -> Value {
    let mut output = object.clone();

    for name in excluded {
        match name.split_once('.') {
            None => {
                // always-returned attributes are silently kept
                if ALWAYS_RETURNED
                    .iter()
                    .any(|always| attr_names_match(always, name))
                {
                    continue;
                }
                if let Some((key, _)) = find_entry(&output, name) {
                    let key = key.clone();
                    output.remove(&key);
                }
            }
            Some((parent_name, sub_name)) => {
                let Some((parent_key, _)) = find_entry(&output, parent_name) else {
                    continue;
                };
                let parent_key = parent_key.clone();
                if let Some(parent_object) =
                    output.get_mut(&parent_key).and_then(Value::as_object_mut)
                {
                    if let Some((sub_key, _)) = find_entry(parent_object, sub_name) {
                        let sub_key = sub_key.clone();
                        parent_object.remove(&sub_key);
                    }
                }
            }
        }
    }

    Value::Object(output)
}

/// Case-insensitive entry lookup preserving the map's original key, using
/// the same folding rule as attribute path resolution.
fn find_entry<'a>(
    object: &'a Map<String, Value>,
    name: &str,
) -> Option<(&'a String, &'a Value)> {
    object.iter().find(|(key, _)| attr_names_match(key, name))
}
