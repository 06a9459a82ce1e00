//! Compositional JSON Schema fragments.
//!
//! Callers assemble a tree of typed fragments with small constructors
//! (leaves, object/array composites, boolean combinators, deferred
//! lookups), then turn the tree into one concrete schema document with a
//! single recursive materialization pass that threads an optional external
//! context through the tree.
//!
//! # Example
//!
//! ```
//! use schema_forge::{materialize_with, needs, record, string, string_enum, Context};
//! use serde_json::json;
//!
//! let order = record(
//!     [("id", string()), ("flavor", needs("flavor"))],
//!     [("note", string())],
//! );
//!
//! let ctx = Context::new().with("flavor", string_enum(["vanilla", "chocolate"]));
//! let doc = materialize_with(order, &ctx)?;
//!
//! assert_eq!(doc, json!({
//!     "type": "object",
//!     "required": ["id", "flavor"],
//!     "properties": {
//!         "id": { "type": "string" },
//!         "flavor": { "type": "string", "enum": ["vanilla", "chocolate"] },
//!         "note": { "type": "string" }
//!     }
//! }));
//! # Ok::<(), schema_forge::MaterializeError>(())
//! ```
//!
//! Construction never resolves anything: a fragment tree is inert,
//! immutable data, and a sub-tree can be cloned into several parents.
//! Deferred fragments ([`needs`], [`needs_with`]) are functions of the
//! context, invoked only when the tree is materialized; a raw
//! `serde_json::Value` anywhere a fragment is expected becomes a `const`
//! schema. [`extend`] and [`Stamp`] overlay extra fields on materialized
//! output, with the extension winning on key collisions.
//!
//! The crate assembles documents; it does not judge them. Whether a
//! produced schema is semantically sensible (`required` naming real
//! properties, coherent bounds) is between the caller and whatever
//! validates the final document.

mod compose;
mod context;
mod error;
mod fragment;
mod materialize;
mod stamp;

pub use compose::{
    all_of, any_of, array, boolean, constant, dictionary, integer, integer_enum, integer_with,
    needs, needs_with, not, null, number, number_enum, number_with, object, one_of, record, regex,
    string, string_enum, tuple, IntegerBounds, NumberBounds,
};
pub use context::Context;
pub use error::MaterializeError;
pub use fragment::{
    AdditionalProperties, CombinatorOp, Fragment, LeafKind, ObjectFragment, Resolver,
};
pub use materialize::{materialize, materialize_with};
pub use stamp::{extend, Stamp};
