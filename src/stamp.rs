//! Post-hoc fragment extension.
//!
//! [`extend`] overlays one extra key on a single fragment's output. A
//! [`Stamp`] does the same for a whole constructor set: it carries a fixed
//! group of extra fields and mirrors the crate's full constructor surface,
//! with every produced fragment stamped with those fields.

use serde_json::{Map, Value};

use crate::compose;
use crate::fragment::{Fragment, ObjectFragment};

/// Overlay one key/value pair on `base`'s materialized output.
///
/// The extension always wins: a key the base fragment already emits is
/// overwritten.
///
/// ```
/// use schema_forge::{extend, materialize, number};
/// use serde_json::json;
///
/// let doc = materialize(extend(number(), "x-unit", json!("ms")))?;
/// assert_eq!(doc, json!({ "type": "number", "x-unit": "ms" }));
/// # Ok::<(), schema_forge::MaterializeError>(())
/// ```
pub fn extend(
    base: impl Into<Fragment>,
    key: impl Into<String>,
    value: impl Into<Value>,
) -> Fragment {
    Fragment::Extend {
        base: Box::new(base.into()),
        key: key.into(),
        value: value.into(),
    }
}

/// A constructor bundle that stamps fixed extra fields onto every fragment
/// it produces.
///
/// Build one with [`Stamp::new`] and [`field`](Stamp::field), then use it
/// in place of the free constructors:
///
/// ```
/// use schema_forge::{materialize, Stamp};
/// use serde_json::json;
///
/// let vendor = Stamp::new().field("x-vendor", json!("acme"));
/// let doc = materialize(vendor.string())?;
/// assert_eq!(doc, json!({ "type": "string", "x-vendor": "acme" }));
/// # Ok::<(), schema_forge::MaterializeError>(())
/// ```
///
/// Stamped fields are merged shallowly into each fragment's own output and
/// win on collision with its intrinsic fields.
#[derive(Debug, Clone, Default)]
pub struct Stamp {
    extra: Map<String, Value>,
}

impl Stamp {
    /// A stamp with no extra fields. Until [`field`](Stamp::field) is
    /// called, the bundle behaves exactly like the free constructors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one stamped field, consuming and returning the stamp for
    /// chaining. A repeated key keeps its position and takes the new value.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Stamp an arbitrary fragment with this bundle's extra fields.
    ///
    /// Folds [`extend`] over the fields in insertion order, so every
    /// stamped key overrides the fragment's own field of the same name.
    pub fn apply(&self, fragment: impl Into<Fragment>) -> Fragment {
        self.extra
            .iter()
            .fold(fragment.into(), |base, (key, value)| {
                extend(base, key.clone(), value.clone())
            })
    }

    pub fn null(&self) -> Fragment {
        self.apply(compose::null())
    }

    pub fn constant(&self, value: impl Into<Value>) -> Fragment {
        self.apply(compose::constant(value))
    }

    pub fn boolean(&self) -> Fragment {
        self.apply(compose::boolean())
    }

    pub fn string(&self) -> Fragment {
        self.apply(compose::string())
    }

    pub fn regex(&self, pattern: impl Into<String>) -> Fragment {
        self.apply(compose::regex(pattern))
    }

    pub fn integer(&self) -> Fragment {
        self.apply(compose::integer())
    }

    pub fn integer_with(&self, bounds: compose::IntegerBounds) -> Fragment {
        self.apply(compose::integer_with(bounds))
    }

    pub fn number(&self) -> Fragment {
        self.apply(compose::number())
    }

    pub fn number_with(&self, bounds: compose::NumberBounds) -> Fragment {
        self.apply(compose::number_with(bounds))
    }

    pub fn string_enum<I, S>(&self, values: I) -> Fragment
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(compose::string_enum(values))
    }

    pub fn integer_enum<I>(&self, values: I) -> Fragment
    where
        I: IntoIterator<Item = i64>,
    {
        self.apply(compose::integer_enum(values))
    }

    pub fn number_enum<I>(&self, values: I) -> Fragment
    where
        I: IntoIterator<Item = f64>,
    {
        self.apply(compose::number_enum(values))
    }

    /// Stamp a built object fragment.
    pub fn object(&self, object: ObjectFragment) -> Fragment {
        self.apply(object)
    }

    pub fn dictionary(&self, values: impl Into<Fragment>) -> Fragment {
        self.apply(compose::dictionary(values))
    }

    pub fn record<R, RK, RF, O, OK, OF>(&self, required: R, optional: O) -> Fragment
    where
        R: IntoIterator<Item = (RK, RF)>,
        RK: Into<String>,
        RF: Into<Fragment>,
        O: IntoIterator<Item = (OK, OF)>,
        OK: Into<String>,
        OF: Into<Fragment>,
    {
        self.apply(compose::record(required, optional))
    }

    pub fn array(&self, items: impl Into<Fragment>) -> Fragment {
        self.apply(compose::array(items))
    }

    pub fn tuple<I, F>(&self, items: I) -> Fragment
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        self.apply(compose::tuple(items))
    }

    pub fn all_of<I, F>(&self, branches: I) -> Fragment
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        self.apply(compose::all_of(branches))
    }

    pub fn any_of<I, F>(&self, branches: I) -> Fragment
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        self.apply(compose::any_of(branches))
    }

    pub fn one_of<I, F>(&self, branches: I) -> Fragment
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        self.apply(compose::one_of(branches))
    }

    pub fn not(&self, fragment: impl Into<Fragment>) -> Fragment {
        self.apply(compose::not(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{number, object, string};
    use crate::materialize::materialize;
    use serde_json::json;

    #[test]
    fn extend_adds_key() {
        let doc = materialize(extend(number(), "x-do-thing", 55)).unwrap();
        assert_eq!(doc, json!({ "type": "number", "x-do-thing": 55 }));
    }

    #[test]
    fn extend_overrides_intrinsic_key() {
        let doc = materialize(extend(string(), "type", json!("custom"))).unwrap();
        assert_eq!(doc, json!({ "type": "custom" }));
    }

    #[test]
    fn empty_stamp_is_transparent() {
        let stamp = Stamp::new();
        assert_eq!(
            materialize(stamp.string()).unwrap(),
            materialize(string()).unwrap()
        );
    }

    #[test]
    fn stamp_applies_to_every_constructor() {
        let stamp = Stamp::new().field("x-origin", json!("billing"));
        assert_eq!(
            materialize(stamp.boolean()).unwrap(),
            json!({ "type": "boolean", "x-origin": "billing" })
        );
        assert_eq!(
            materialize(stamp.array(string())).unwrap(),
            json!({
                "type": "array",
                "items": { "type": "string" },
                "x-origin": "billing"
            })
        );
        assert_eq!(
            materialize(stamp.object(object().property("a", string()))).unwrap(),
            json!({
                "type": "object",
                "properties": { "a": { "type": "string" } },
                "x-origin": "billing"
            })
        );
    }

    #[test]
    fn stamp_bundle_matches_apply() {
        let stamp = Stamp::new().field("x-a", json!(1)).field("x-b", json!(2));
        assert_eq!(
            materialize(stamp.number()).unwrap(),
            materialize(stamp.apply(number())).unwrap()
        );
    }

    #[test]
    fn stamp_wins_over_intrinsic_fields() {
        let stamp = Stamp::new().field("type", json!("anything"));
        assert_eq!(
            materialize(stamp.string()).unwrap(),
            json!({ "type": "anything" })
        );
    }

    #[test]
    fn repeated_stamp_field_takes_last_value() {
        let stamp = Stamp::new().field("x-v", json!(1)).field("x-v", json!(2));
        assert_eq!(
            materialize(stamp.null()).unwrap(),
            json!({ "type": "null", "x-v": 2 })
        );
    }
}
