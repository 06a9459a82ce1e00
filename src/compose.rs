//! Fragment constructors - the compositional surface for assembling
//! schema fragment trees.
//!
//! Constructors only build trees; nothing is resolved until the tree is
//! handed to [`materialize`](crate::materialize()) or
//! [`materialize_with`](crate::materialize_with). Leaf constructors bake
//! their final output at construction time. Composite constructors hold
//! child fragments and defer to the materializer. Numeric bounds are passed
//! through as given; an inverted `minimum`/`maximum` pair is not an error
//! here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::MaterializeError;
use crate::fragment::{CombinatorOp, Fragment, LeafKind, ObjectFragment, Resolver};

/// Bounds for [`integer_with`]. All fields optional; absent bounds are
/// absent from the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegerBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
}

impl IntegerBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, value: i64) -> Self {
        self.minimum = Some(value);
        self
    }

    pub fn maximum(mut self, value: i64) -> Self {
        self.maximum = Some(value);
        self
    }

    pub fn exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = Some(exclusive);
        self
    }

    pub fn exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = Some(exclusive);
        self
    }
}

/// Bounds for [`number_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl NumberBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, value: f64) -> Self {
        self.minimum = Some(value);
        self
    }

    pub fn maximum(mut self, value: f64) -> Self {
        self.maximum = Some(value);
        self
    }
}

fn leaf(kind: LeafKind, schema: Map<String, Value>) -> Fragment {
    Fragment::Leaf { kind, schema }
}

fn typed(type_name: &str) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String(type_name.to_string()));
    schema
}

/// The `{"type": "null"}` leaf.
pub fn null() -> Fragment {
    leaf(LeafKind::Null, typed("null"))
}

/// A `{"const": v}` leaf wrapping the value verbatim.
pub fn constant(value: impl Into<Value>) -> Fragment {
    let mut schema = Map::new();
    schema.insert("const".to_string(), value.into());
    leaf(LeafKind::Const, schema)
}

/// The `{"type": "boolean"}` leaf.
pub fn boolean() -> Fragment {
    leaf(LeafKind::Boolean, typed("boolean"))
}

/// The `{"type": "string"}` leaf.
pub fn string() -> Fragment {
    leaf(LeafKind::String, typed("string"))
}

/// A pattern-constrained string leaf. The pattern is carried as given, not
/// compiled or checked.
pub fn regex(pattern: impl Into<String>) -> Fragment {
    let mut schema = typed("string");
    schema.insert("pattern".to_string(), Value::String(pattern.into()));
    leaf(LeafKind::Regex, schema)
}

/// The unbounded `{"type": "integer"}` leaf.
pub fn integer() -> Fragment {
    integer_with(IntegerBounds::new())
}

/// An integer leaf with bounds. Only bounds that were set appear in the
/// output.
pub fn integer_with(bounds: IntegerBounds) -> Fragment {
    let mut schema = typed("integer");
    if let Some(minimum) = bounds.minimum {
        schema.insert("minimum".to_string(), minimum.into());
    }
    if let Some(maximum) = bounds.maximum {
        schema.insert("maximum".to_string(), maximum.into());
    }
    if let Some(exclusive) = bounds.exclusive_minimum {
        schema.insert("exclusiveMinimum".to_string(), exclusive.into());
    }
    if let Some(exclusive) = bounds.exclusive_maximum {
        schema.insert("exclusiveMaximum".to_string(), exclusive.into());
    }
    leaf(LeafKind::Integer, schema)
}

/// The unbounded `{"type": "number"}` leaf.
pub fn number() -> Fragment {
    number_with(NumberBounds::new())
}

/// A number leaf with bounds.
pub fn number_with(bounds: NumberBounds) -> Fragment {
    let mut schema = typed("number");
    if let Some(minimum) = bounds.minimum {
        schema.insert("minimum".to_string(), minimum.into());
    }
    if let Some(maximum) = bounds.maximum {
        schema.insert("maximum".to_string(), maximum.into());
    }
    leaf(LeafKind::Number, schema)
}

/// A string leaf restricted to an enumerated set.
pub fn string_enum<I, S>(values: I) -> Fragment
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values = values.into_iter().map(|v| Value::String(v.into())).collect();
    enum_leaf(LeafKind::StringEnum, "string", values)
}

/// An integer leaf restricted to an enumerated set.
pub fn integer_enum<I>(values: I) -> Fragment
where
    I: IntoIterator<Item = i64>,
{
    let values = values.into_iter().map(Value::from).collect();
    enum_leaf(LeafKind::IntegerEnum, "integer", values)
}

/// A number leaf restricted to an enumerated set.
pub fn number_enum<I>(values: I) -> Fragment
where
    I: IntoIterator<Item = f64>,
{
    let values = values.into_iter().map(Value::from).collect();
    enum_leaf(LeafKind::NumberEnum, "number", values)
}

fn enum_leaf(kind: LeafKind, type_name: &str, values: Vec<Value>) -> Fragment {
    let mut schema = typed(type_name);
    schema.insert("enum".to_string(), Value::Array(values));
    leaf(kind, schema)
}

/// An empty object fragment builder. Fields never set stay absent from the
/// output.
pub fn object() -> ObjectFragment {
    ObjectFragment::default()
}

/// An object fragment with only `additionalProperties`, describing a map
/// from arbitrary names to `values`-shaped entries.
pub fn dictionary(values: impl Into<Fragment>) -> ObjectFragment {
    object().additional(values.into())
}

/// An object fragment from a required and an optional property map.
///
/// Required entries come first and their names, in order, become the
/// `required` list. An optional entry reusing a required name replaces that
/// entry's fragment in place; the name stays required.
pub fn record<R, RK, RF, O, OK, OF>(required: R, optional: O) -> ObjectFragment
where
    R: IntoIterator<Item = (RK, RF)>,
    RK: Into<String>,
    RF: Into<Fragment>,
    O: IntoIterator<Item = (OK, OF)>,
    OK: Into<String>,
    OF: Into<Fragment>,
{
    let mut properties: IndexMap<String, Fragment> = IndexMap::new();
    let mut names = Vec::new();
    for (name, fragment) in required {
        let name = name.into();
        names.push(name.clone());
        properties.insert(name, fragment.into());
    }
    for (name, fragment) in optional {
        // IndexMap keeps the original position when a key is reinserted,
        // so a colliding optional entry overrides the value only.
        properties.insert(name.into(), fragment.into());
    }
    ObjectFragment {
        properties: Some(properties),
        required: Some(names),
        ..ObjectFragment::default()
    }
}

/// A uniform-item array fragment.
pub fn array(items: impl Into<Fragment>) -> Fragment {
    Fragment::Array(Box::new(items.into()))
}

/// A positional array fragment: one schema per position.
pub fn tuple<I, F>(items: I) -> Fragment
where
    I: IntoIterator<Item = F>,
    F: Into<Fragment>,
{
    Fragment::Tuple(items.into_iter().map(Into::into).collect())
}

fn combinator<I, F>(op: CombinatorOp, branches: I) -> Fragment
where
    I: IntoIterator<Item = F>,
    F: Into<Fragment>,
{
    Fragment::Combinator {
        op,
        branches: branches.into_iter().map(Into::into).collect(),
    }
}

/// An `allOf` combinator. Branch order is preserved in the output.
pub fn all_of<I, F>(branches: I) -> Fragment
where
    I: IntoIterator<Item = F>,
    F: Into<Fragment>,
{
    combinator(CombinatorOp::AllOf, branches)
}

/// An `anyOf` combinator.
pub fn any_of<I, F>(branches: I) -> Fragment
where
    I: IntoIterator<Item = F>,
    F: Into<Fragment>,
{
    combinator(CombinatorOp::AnyOf, branches)
}

/// A `oneOf` combinator.
pub fn one_of<I, F>(branches: I) -> Fragment
where
    I: IntoIterator<Item = F>,
    F: Into<Fragment>,
{
    combinator(CombinatorOp::OneOf, branches)
}

/// A `not` wrapper around a single fragment.
pub fn not(fragment: impl Into<Fragment>) -> Fragment {
    Fragment::Not(Box::new(fragment.into()))
}

/// A deferred fragment resolved by looking `key` up in the context.
///
/// Materialization fails with
/// [`MaterializeError::MissingContextKey`] if the context has no such
/// entry.
pub fn needs(key: impl Into<String>) -> Fragment {
    let key = key.into();
    needs_with(move |context: &Context| {
        context
            .get(&key)
            .cloned()
            .ok_or_else(|| MaterializeError::MissingContextKey { key: key.clone() })
    })
}

/// A deferred fragment resolved by an arbitrary function of the context.
///
/// The resolver may itself return a deferred fragment; chains resolve
/// against the same context until a concrete fragment is reached.
pub fn needs_with<F>(resolver: F) -> Fragment
where
    F: Fn(&Context) -> Result<Fragment, MaterializeError> + Send + Sync + 'static,
{
    Fragment::Needs(Resolver::new(resolver))
}
