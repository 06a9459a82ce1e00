//! The keyed fragment store threaded through a materialization pass.

use std::collections::HashMap;

use crate::fragment::Fragment;

/// External context supplied to [`materialize_with`](crate::materialize_with).
///
/// A context maps names to fragments; deferred fragments built with
/// [`needs`](crate::needs()) look their key up here at
/// materialization time. The materializer only ever reads it, and the same
/// context is passed unchanged through the whole pass.
///
/// The default context is empty.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: HashMap<String, Fragment>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, consuming and returning the context for chaining.
    pub fn with(mut self, key: impl Into<String>, fragment: impl Into<Fragment>) -> Self {
        self.insert(key, fragment);
        self
    }

    /// Add an entry in place. A later insert for the same key replaces the
    /// earlier fragment.
    pub fn insert(&mut self, key: impl Into<String>, fragment: impl Into<Fragment>) {
        self.entries.insert(key.into(), fragment.into());
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&Fragment> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, F> FromIterator<(K, F)> for Context
where
    K: Into<String>,
    F: Into<Fragment>,
{
    fn from_iter<I: IntoIterator<Item = (K, F)>>(iter: I) -> Self {
        Context {
            entries: iter
                .into_iter()
                .map(|(k, f)| (k.into(), f.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_chains_entries() {
        let ctx = Context::new().with("a", json!(1)).with("b", json!(2));
        assert_eq!(ctx.len(), 2);
        assert!(ctx.get("a").is_some());
        assert!(ctx.get("missing").is_none());
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut ctx = Context::new();
        ctx.insert("x", json!(1));
        ctx.insert("x", json!(2));
        assert_eq!(ctx.len(), 1);
        assert!(matches!(
            ctx.get("x"),
            Some(Fragment::Raw(v)) if *v == json!(2)
        ));
    }

    #[test]
    fn default_is_empty() {
        assert!(Context::default().is_empty());
    }

    #[test]
    fn collects_from_pairs() {
        let ctx: Context = [("a", json!(1)), ("b", json!(2))].into_iter().collect();
        assert_eq!(ctx.len(), 2);
    }
}
