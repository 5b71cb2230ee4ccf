//! Attribute path resolution over SCIM resource values.
//!
//! SCIM attribute names are case-insensitive (RFC 7643 §2.1), so every
//! segment lookup compares keys case-insensitively while the resource keeps
//! its original casing. Three path forms are supported:
//!
//! * simple: `userName`
//! * dotted: `name.givenName`
//! * URN-qualified: `urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department`,
//!   which looks up the literal URN prefix as a key and resolves the
//!   remaining suffix inside that nested object.
//!
//! Dotted paths never traverse arrays; multi-valued attributes are only
//! iterated by value-path (`attr[subfilter]`) evaluation.

use serde_json::Value;

/// Resolve an attribute path against a resource, case-insensitively.
///
/// Returns `None` (never an error) when any segment is missing or a
/// non-terminal segment resolves to a non-object value.
///
/// # Examples
///
/// ```rust
/// use scim_query::filter::resolve_attr_path;
/// use serde_json::json;
///
/// let user = json!({"name": {"givenName": "John"}});
/// assert_eq!(
///     resolve_attr_path(&user, "Name.GivenName"),
///     Some(&json!("John"))
/// );
/// assert_eq!(resolve_attr_path(&user, "name.missing"), None);
/// ```
pub fn resolve_attr_path<'a>(resource: &'a Value, path: &str) -> Option<&'a Value> {
    if path
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("urn:"))
    {
        // The attribute suffix follows the last colon; the URN prefix is a
        // literal key holding the extension's nested object.
        if let Some(split) = path.rfind(':') {
            let (urn, suffix) = (&path[..split], &path[split + 1..]);
            let nested = lookup_key(resource, urn)?;
            if suffix.is_empty() {
                return Some(nested);
            }
            return resolve_dotted(nested, suffix);
        }
    }
    resolve_dotted(resource, path)
}

fn resolve_dotted<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = lookup_key(current, segment)?;
    }
    Some(current)
}

/// The one case-folding rule for SCIM attribute names, shared by path
/// resolution and attribute projection.
pub(crate) fn attr_names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive single-key lookup. First matching key wins; resources
/// are assumed not to contain two keys differing only by case.
fn lookup_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let object = value.as_object()?;
    object
        .iter()
        .find(|(k, _)| attr_names_match(k, key))
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> Value {
        json!({
            "userName": "john.doe",
            "name": {"givenName": "John", "familyName": "Doe"},
            "emails": [{"value": "john@example.com", "primary": true}],
            "active": true,
            "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User": {
                "department": "Sales",
                "manager": {"displayName": "Jane"}
            }
        })
    }

    #[test]
    fn test_simple_path() {
        assert_eq!(resolve_attr_path(&user(), "userName"), Some(&json!("john.doe")));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(resolve_attr_path(&user(), "USERNAME"), Some(&json!("john.doe")));
        assert_eq!(resolve_attr_path(&user(), "username"), Some(&json!("john.doe")));
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(
            resolve_attr_path(&user(), "name.givenName"),
            Some(&json!("John"))
        );
        assert_eq!(
            resolve_attr_path(&user(), "NAME.FAMILYNAME"),
            Some(&json!("Doe"))
        );
    }

    #[test]
    fn test_missing_segments_resolve_to_none() {
        assert_eq!(resolve_attr_path(&user(), "missing"), None);
        assert_eq!(resolve_attr_path(&user(), "name.missing"), None);
        assert_eq!(resolve_attr_path(&user(), "userName.sub"), None);
    }

    #[test]
    fn test_arrays_are_not_traversed_implicitly() {
        assert_eq!(resolve_attr_path(&user(), "emails.value"), None);
        // the array itself still resolves
        assert!(resolve_attr_path(&user(), "emails").is_some_and(Value::is_array));
    }

    #[test]
    fn test_urn_qualified_path() {
        assert_eq!(
            resolve_attr_path(
                &user(),
                "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department"
            ),
            Some(&json!("Sales"))
        );
    }

    #[test]
    fn test_urn_path_with_dotted_suffix() {
        assert_eq!(
            resolve_attr_path(
                &user(),
                "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.displayName"
            ),
            Some(&json!("Jane"))
        );
    }

    #[test]
    fn test_non_ascii_paths_resolve_without_panic() {
        let resource = json!({"ab€x": 1, "über": "u"});
        assert_eq!(resolve_attr_path(&resource, "ab€x"), Some(&json!(1)));
        assert_eq!(resolve_attr_path(&resource, "ÜBER"), Some(&json!("u")));
        assert_eq!(resolve_attr_path(&resource, "ab€missing"), None);
    }

    #[test]
    fn test_unknown_urn_resolves_to_none() {
        assert_eq!(
            resolve_attr_path(&user(), "urn:example:params:Other:department"),
            None
        );
    }
}
