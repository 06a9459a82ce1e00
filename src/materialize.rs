//! Fragment materialization - turns a fragment tree and a context into a
//! final schema document.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::MaterializeError;
use crate::fragment::{AdditionalProperties, Fragment, ObjectFragment};

/// Materialize a fragment with an empty context.
///
/// Anything convertible to a [`Fragment`] is accepted; a raw
/// `serde_json::Value` materializes as `{"const": value}`.
///
/// # Errors
///
/// Returns [`MaterializeError::MissingContextKey`] if the tree contains a
/// keyed deferred fragment, since the empty context has no entries.
pub fn materialize(fragment: impl Into<Fragment>) -> Result<Value, MaterializeError> {
    materialize_with(fragment, &Context::default())
}

/// Materialize a fragment against a caller-supplied context.
///
/// Walks the tree depth-first, resolving deferred fragments against
/// `context` and recursively materializing composite children. The context
/// is threaded unchanged through the whole pass. Materialization is a pure
/// function of its inputs; the same tree and context always produce
/// structurally equal output.
///
/// # Errors
///
/// Any resolver failure aborts the whole call with no partial output.
pub fn materialize_with(
    fragment: impl Into<Fragment>,
    context: &Context,
) -> Result<Value, MaterializeError> {
    let fragment = fragment.into();
    materialize_fragment(&fragment, context).map(Value::Object)
}

// --- Internal implementation ---

// Every fragment kind materializes to a JSON object, so the recursion
// passes the object map itself; the Extend overlay is a plain insert.
fn materialize_fragment(
    fragment: &Fragment,
    context: &Context,
) -> Result<Map<String, Value>, MaterializeError> {
    match fragment {
        Fragment::Raw(value) => {
            let mut out = Map::new();
            out.insert("const".to_string(), value.clone());
            Ok(out)
        }
        Fragment::Leaf { schema, .. } => Ok(schema.clone()),
        Fragment::Object(object) => materialize_object(object, context),
        Fragment::Array(items) => {
            let mut out = Map::new();
            out.insert("type".to_string(), Value::String("array".to_string()));
            out.insert(
                "items".to_string(),
                Value::Object(materialize_fragment(items, context)?),
            );
            Ok(out)
        }
        Fragment::Tuple(items) => {
            let mut out = Map::new();
            out.insert("type".to_string(), Value::String("array".to_string()));
            out.insert(
                "items".to_string(),
                Value::Array(materialize_sequence(items, context)?),
            );
            Ok(out)
        }
        Fragment::Combinator { op, branches } => {
            let mut out = Map::new();
            out.insert(
                op.key().to_string(),
                Value::Array(materialize_sequence(branches, context)?),
            );
            Ok(out)
        }
        Fragment::Not(child) => {
            let mut out = Map::new();
            out.insert(
                "not".to_string(),
                Value::Object(materialize_fragment(child, context)?),
            );
            Ok(out)
        }
        Fragment::Needs(resolver) => {
            // A resolver may return another deferred fragment; the chain
            // resolves against the same context until a concrete fragment
            // is reached. Termination is the caller's obligation.
            let next = resolver.resolve(context)?;
            materialize_fragment(&next, context)
        }
        Fragment::Extend { base, key, value } => {
            let mut out = materialize_fragment(base, context)?;
            out.insert(key.clone(), value.clone());
            Ok(out)
        }
    }
}

fn materialize_sequence(
    fragments: &[Fragment],
    context: &Context,
) -> Result<Vec<Value>, MaterializeError> {
    fragments
        .iter()
        .map(|fragment| materialize_fragment(fragment, context).map(Value::Object))
        .collect()
}

fn materialize_object(
    object: &ObjectFragment,
    context: &Context,
) -> Result<Map<String, Value>, MaterializeError> {
    let mut out = Map::new();
    out.insert("type".to_string(), Value::String("object".to_string()));

    if let Some(required) = &object.required {
        out.insert(
            "required".to_string(),
            Value::Array(required.iter().map(|n| Value::String(n.clone())).collect()),
        );
    }
    if let Some(properties) = &object.properties {
        out.insert(
            "properties".to_string(),
            materialize_property_map(properties, context)?,
        );
    }
    if let Some(patterns) = &object.pattern_properties {
        out.insert(
            "patternProperties".to_string(),
            materialize_property_map(patterns, context)?,
        );
    }
    if let Some(additional) = &object.additional_properties {
        let value = match additional {
            AdditionalProperties::Bool(allowed) => Value::Bool(*allowed),
            AdditionalProperties::Schema(fragment) => {
                Value::Object(materialize_fragment(fragment, context)?)
            }
        };
        out.insert("additionalProperties".to_string(), value);
    }

    Ok(out)
}

fn materialize_property_map(
    entries: &IndexMap<String, Fragment>,
    context: &Context,
) -> Result<Value, MaterializeError> {
    let mut out = Map::new();
    for (name, fragment) in entries {
        out.insert(
            name.clone(),
            Value::Object(materialize_fragment(fragment, context)?),
        );
    }
    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{
        array, boolean, dictionary, integer, needs, needs_with, not, null, number, object, string,
    };
    use serde_json::json;

    #[test]
    fn raw_value_materializes_as_const() {
        assert_eq!(materialize(json!(5)).unwrap(), json!({ "const": 5 }));
        assert_eq!(
            materialize(json!({ "foo": [1, 2] })).unwrap(),
            json!({ "const": { "foo": [1, 2] } })
        );
        assert_eq!(materialize(json!(null)).unwrap(), json!({ "const": null }));
    }

    #[test]
    fn leaves_ignore_context() {
        let ctx = Context::new().with("anything", string());
        assert_eq!(
            materialize_with(integer(), &ctx).unwrap(),
            materialize(integer()).unwrap()
        );
        assert_eq!(materialize_with(null(), &ctx).unwrap(), json!({ "type": "null" }));
    }

    #[test]
    fn empty_object_emits_only_type() {
        assert_eq!(materialize(object()).unwrap(), json!({ "type": "object" }));
    }

    #[test]
    fn object_fields_are_sparse() {
        let doc = materialize(object().property("a", string())).unwrap();
        assert_eq!(
            doc,
            json!({
                "type": "object",
                "properties": { "a": { "type": "string" } }
            })
        );
        let map = doc.as_object().unwrap();
        assert!(!map.contains_key("required"));
        assert!(!map.contains_key("patternProperties"));
        assert!(!map.contains_key("additionalProperties"));
    }

    #[test]
    fn additional_properties_bool_passes_through() {
        assert_eq!(
            materialize(object().additional(false)).unwrap(),
            json!({ "type": "object", "additionalProperties": false })
        );
    }

    #[test]
    fn dictionary_scenario() {
        assert_eq!(
            materialize(dictionary(number())).unwrap(),
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );
    }

    #[test]
    fn array_scenario() {
        assert_eq!(
            materialize(array(string())).unwrap(),
            json!({ "type": "array", "items": { "type": "string" } })
        );
    }

    #[test]
    fn not_scenario() {
        assert_eq!(
            materialize(not(string())).unwrap(),
            json!({ "not": { "type": "string" } })
        );
    }

    #[test]
    fn keyed_needs_resolves_from_context() {
        let ctx = Context::new().with("x", json!(55));
        assert_eq!(
            materialize_with(needs("x"), &ctx).unwrap(),
            json!({ "const": 55 })
        );
    }

    #[test]
    fn keyed_needs_missing_key_fails() {
        let result = materialize_with(needs("x"), &Context::new());
        assert_eq!(
            result,
            Err(MaterializeError::MissingContextKey { key: "x".into() })
        );
    }

    #[test]
    fn needs_failure_aborts_whole_materialization() {
        let fragment = object()
            .property("ok", string())
            .property("broken", needs("absent"));
        assert!(matches!(
            materialize(fragment),
            Err(MaterializeError::MissingContextKey { .. })
        ));
    }

    #[test]
    fn needs_chain_resolves_to_final_target() {
        let fragment = needs_with(|_: &Context| Ok(needs_with(|_: &Context| Ok(boolean()))));
        assert_eq!(
            materialize(fragment).unwrap(),
            json!({ "type": "boolean" })
        );
    }

    #[test]
    fn materialization_is_repeatable() {
        let ctx = Context::new().with("item", integer());
        let fragment = array(needs("item"));
        let first = materialize_with(&fragment, &ctx).unwrap();
        let second = materialize_with(&fragment, &ctx).unwrap();
        assert_eq!(first, second);
    }
}
