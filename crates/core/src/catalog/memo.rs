//! Cached computation nodes.

/// A value computed from a key and reused until the key changes.
///
/// Each recomputation bumps [`Memo::revision`], which downstream nodes use
/// as part of their own key.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    revision: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            revision: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, running `compute` only if the key
    /// differs from the one the value was computed for.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let stale = !matches!(&self.entry, Some((cached, _)) if *cached == key);
        if stale {
            self.revision += 1;
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }

    /// The cached value, if one has been computed and not invalidated.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    /// How many times the value has been computed.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop the cached value so the next read recomputes.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
