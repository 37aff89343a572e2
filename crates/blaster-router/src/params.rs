//! Path values bound while walking the trie.
//!
//! A lookup binds at most one parameter (the walk stops at the first
//! parameter edge), so the storage keeps a single pair inline and only
//! spills to the heap when callers push more by hand.

use smallvec::SmallVec;

/// Name/value pairs bound by a route lookup.
///
/// Names carry no `:` marker; values are the request segment with the
/// marker stripped.
///
/// # Example
///
/// ```rust
/// use blaster_router::Params;
///
/// let params = Params::single("order_id", "42");
///
/// assert_eq!(params.get("order_id"), Some("42"));
/// assert_eq!(params.get("user_id"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    pairs: SmallVec<[(String, String); 1]>,
}

impl Params {
    /// No bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly one binding, the shape every successful param lookup has.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = Self::new();
        params.push(name, value);
        params
    }

    /// Appends a binding. A repeated name keeps its first value for
    /// [`Params::get`].
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value.as_str()))
    }

    /// True when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_bindings() {
        let none = Params::new();
        assert!(none.is_empty());
        assert_eq!(none.get("id"), None);
        assert_eq!(none.iter().count(), 0);
    }

    #[test]
    fn test_single() {
        let one = Params::single("order_id", "abc");
        assert_eq!(one.len(), 1);
        assert_eq!(one.get("order_id"), Some("abc"));
    }

    #[test]
    fn test_repeated_name_keeps_first_value() {
        let mut bound = Params::single("id", "first");
        bound.push("id", "second");
        bound.push("page", "3");

        assert_eq!(bound.get("id"), Some("first"));
        assert_eq!(
            bound.iter().collect::<Vec<_>>(),
            [("id", "first"), ("id", "second"), ("page", "3")]
        );
    }
}
