//! Core fragment model: the tagged representation of a not-yet-materialized
//! schema node.
//!
//! A [`Fragment`] is either an already-final leaf, a composite whose children
//! are themselves fragments, a deferred lookup against a [`Context`], or an
//! extension wrapper. Trees are immutable once built; sharing a sub-tree
//! across parents is an explicit `clone()`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::MaterializeError;

/// Leaf fragment kinds.
///
/// The kind is informational; a leaf's output is its stored schema map,
/// fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeafKind {
    Null,
    Const,
    Boolean,
    String,
    Regex,
    Integer,
    Number,
    StringEnum,
    NumberEnum,
    IntegerEnum,
}

/// Boolean-combinator operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombinatorOp {
    AllOf,
    AnyOf,
    OneOf,
}

impl CombinatorOp {
    /// Returns the output field name for this operator.
    pub fn key(&self) -> &'static str {
        match self {
            CombinatorOp::AllOf => "allOf",
            CombinatorOp::AnyOf => "anyOf",
            CombinatorOp::OneOf => "oneOf",
        }
    }
}

/// The `additionalProperties` slot of an object fragment: either a literal
/// boolean passed through unchanged, or a child fragment materialized
/// recursively.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Fragment>),
}

impl From<bool> for AdditionalProperties {
    fn from(allowed: bool) -> Self {
        AdditionalProperties::Bool(allowed)
    }
}

impl From<Fragment> for AdditionalProperties {
    fn from(fragment: Fragment) -> Self {
        AdditionalProperties::Schema(Box::new(fragment))
    }
}

impl From<ObjectFragment> for AdditionalProperties {
    fn from(object: ObjectFragment) -> Self {
        AdditionalProperties::Schema(Box::new(object.into()))
    }
}

/// Parts of an object fragment.
///
/// Every field is independently optional: a field absent at construction is
/// absent from the output, not defaulted to an empty value. Entry order of
/// `properties` and `pattern_properties` is preserved through
/// materialization.
///
/// Doubles as the builder returned by [`object`](crate::object()):
///
/// ```
/// use schema_forge::{materialize, object, string};
/// use serde_json::json;
///
/// let doc = materialize(object().property("name", string()).required(["name"]))?;
/// assert_eq!(doc, json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": { "name": { "type": "string" } }
/// }));
/// # Ok::<(), schema_forge::MaterializeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectFragment {
    pub properties: Option<IndexMap<String, Fragment>>,
    pub pattern_properties: Option<IndexMap<String, Fragment>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub required: Option<Vec<String>>,
}

impl ObjectFragment {
    /// Add one named property.
    pub fn property(mut self, name: impl Into<String>, fragment: impl Into<Fragment>) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), fragment.into());
        self
    }

    /// Add one pattern property.
    pub fn pattern_property(
        mut self,
        pattern: impl Into<String>,
        fragment: impl Into<Fragment>,
    ) -> Self {
        self.pattern_properties
            .get_or_insert_with(IndexMap::new)
            .insert(pattern.into(), fragment.into());
        self
    }

    /// Set the `additionalProperties` slot: a literal `bool` or a fragment.
    pub fn additional(mut self, value: impl Into<AdditionalProperties>) -> Self {
        self.additional_properties = Some(value.into());
        self
    }

    /// Set the `required` name list, replacing any previous list.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// A deferred-resolution function: maps a context to the next fragment.
///
/// Resolvers must be pure and must not mutate the context; a chain of
/// resolvers must reach a non-deferred fragment in finitely many steps.
/// Neither obligation is enforced.
#[derive(Clone)]
pub struct Resolver(Arc<dyn Fn(&Context) -> Result<Fragment, MaterializeError> + Send + Sync>);

impl Resolver {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&Context) -> Result<Fragment, MaterializeError> + Send + Sync + 'static,
    {
        Resolver(Arc::new(resolver))
    }

    /// Invoke the resolver against a context.
    pub fn resolve(&self, context: &Context) -> Result<Fragment, MaterializeError> {
        (self.0)(context)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// A not-yet-materialized schema node.
///
/// One variant per fragment kind; the materializer dispatches with a single
/// exhaustive match. Values of this type are built with the crate's free
/// constructors ([`object`](crate::object()), [`string`](crate::string()),
/// [`needs`](crate::needs()), ...) rather than directly.
#[derive(Debug, Clone)]
pub enum Fragment {
    /// A raw JSON value, materialized as a `const` schema.
    Raw(Value),
    /// An already-final schema shape; materializes to `schema` unchanged.
    Leaf {
        kind: LeafKind,
        schema: Map<String, Value>,
    },
    Object(ObjectFragment),
    /// Uniform-item array: `items` holds a single schema.
    Array(Box<Fragment>),
    /// Positional array: `items` holds one schema per position.
    Tuple(Vec<Fragment>),
    Combinator {
        op: CombinatorOp,
        branches: Vec<Fragment>,
    },
    Not(Box<Fragment>),
    /// Deferred: resolved against the context at materialization time.
    Needs(Resolver),
    /// Overlay of one extra key on the base fragment's output.
    Extend {
        base: Box<Fragment>,
        key: String,
        value: Value,
    },
}

impl From<ObjectFragment> for Fragment {
    fn from(object: ObjectFragment) -> Self {
        Fragment::Object(object)
    }
}

impl From<Value> for Fragment {
    fn from(value: Value) -> Self {
        Fragment::Raw(value)
    }
}

impl From<&Fragment> for Fragment {
    fn from(fragment: &Fragment) -> Self {
        fragment.clone()
    }
}

macro_rules! impl_from_raw {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Fragment {
                fn from(value: $ty) -> Self {
                    Fragment::Raw(Value::from(value))
                }
            }
        )*
    };
}

impl_from_raw!(bool, i32, i64, u64, f64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn combinator_op_keys() {
        assert_eq!(CombinatorOp::AllOf.key(), "allOf");
        assert_eq!(CombinatorOp::AnyOf.key(), "anyOf");
        assert_eq!(CombinatorOp::OneOf.key(), "oneOf");
    }

    #[test]
    fn leaf_kind_serializes_kebab_case() {
        assert_eq!(json!(LeafKind::StringEnum), json!("string-enum"));
        assert_eq!(json!(LeafKind::Null), json!("null"));
    }

    #[test]
    fn raw_conversions() {
        assert!(matches!(Fragment::from(json!({"a": 1})), Fragment::Raw(_)));
        assert!(matches!(Fragment::from(55), Fragment::Raw(Value::Number(_))));
        assert!(matches!(Fragment::from("x"), Fragment::Raw(Value::String(_))));
        assert!(matches!(Fragment::from(true), Fragment::Raw(Value::Bool(_))));
    }

    #[test]
    fn additional_properties_conversions() {
        assert!(matches!(
            AdditionalProperties::from(false),
            AdditionalProperties::Bool(false)
        ));
        assert!(matches!(
            AdditionalProperties::from(Fragment::Raw(json!(1))),
            AdditionalProperties::Schema(_)
        ));
    }

    #[test]
    fn object_builder_preserves_insertion_order() {
        let object = ObjectFragment::default()
            .property("b", Fragment::Raw(json!(1)))
            .property("a", Fragment::Raw(json!(2)))
            .property("c", Fragment::Raw(json!(3)));
        let names: Vec<&str> = object
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert!(object.required.is_none());
        assert!(object.additional_properties.is_none());
    }
}
