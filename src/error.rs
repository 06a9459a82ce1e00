//! Error types for fragment materialization.

use thiserror::Error;

/// Errors during materialization.
///
/// Only deferred-fragment resolution can fail; every other fragment kind
/// materializes unconditionally. Semantic oddities in the assembled
/// document (a `required` name with no matching property, inverted
/// numeric bounds) pass through undetected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    #[error("context has no entry for key \"{key}\"")]
    MissingContextKey { key: String },
}
