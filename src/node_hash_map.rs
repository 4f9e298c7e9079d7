//! NodeHashMap: ownership policy and diagnostics atop BucketHashMap.
//!
//! The engine stores `NodeSlot<N>` values; the slot records, per entry, how
//! the node is disposed of when the slot is dropped (overwrite or table
//! teardown). `Owned` nodes belong to the table; `Shared` nodes are
//! reference counted and the table only ever releases its own reference.
//! Removal hands the slot itself back, so the caller visibly takes over
//! whatever disposal obligation the slot carries.

use crate::bucket_hash_map::{BucketHashMap, CreateError};
use crate::hash::Djb2State;
use core::hash::BuildHasher;
use core::ops::Deref;
use std::fmt::Write as _;
use std::rc::Rc;

/// Render-for-diagnostics capability of stored node kinds. Must not mutate;
/// the release-resources capability is `Drop`.
pub trait Render {
    fn render(&self, out: &mut String);
}

/// A stored node together with its disposal policy.
#[derive(Debug)]
pub enum NodeSlot<N> {
    /// The table disposes of the node when the slot is dropped.
    Owned(N),
    /// The table holds one reference; dropping the slot releases only that
    /// reference and the node lives on with its other holders.
    Shared(Rc<N>),
}

impl<N> NodeSlot<N> {
    pub fn is_shared(&self) -> bool {
        matches!(self, NodeSlot::Shared(_))
    }

    /// Take the node out of an `Owned` slot; `None` for `Shared`.
    pub fn into_owned(self) -> Option<N> {
        match self {
            NodeSlot::Owned(n) => Some(n),
            NodeSlot::Shared(_) => None,
        }
    }
}

impl<N> Deref for NodeSlot<N> {
    type Target = N;

    fn deref(&self) -> &N {
        match self {
            NodeSlot::Owned(n) => n,
            NodeSlot::Shared(rc) => rc,
        }
    }
}

#[derive(Debug)]
pub struct NodeHashMap<N, S = Djb2State> {
    inner: BucketHashMap<NodeSlot<N>, S>,
}

impl<N> NodeHashMap<N> {
    pub fn new() -> Self {
        Self {
            inner: BucketHashMap::new(),
        }
    }

    pub fn with_buckets(bucket_count: usize) -> Result<Self, CreateError> {
        Ok(Self {
            inner: BucketHashMap::with_buckets(bucket_count)?,
        })
    }
}

impl<N> Default for NodeHashMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, S> NodeHashMap<N, S>
where
    S: BuildHasher,
{
    /// Insert or update under the owned policy. A displaced slot for the
    /// same key is dropped here, which applies the policy recorded when the
    /// old node was inserted: an owned predecessor is released exactly
    /// once, a shared predecessor only loses the table's reference.
    pub fn insert(&mut self, key: &str, node: N) {
        self.inner.insert(key, NodeSlot::Owned(node));
    }

    /// Insert or update under the never-release policy: the table keeps one
    /// reference and will not dispose of the node itself.
    pub fn insert_shared(&mut self, key: &str, node: Rc<N>) {
        self.inner.insert(key, NodeSlot::Shared(node));
    }

    pub fn lookup(&self, key: &str) -> Option<&N> {
        self.inner.get(key).map(|slot| &**slot)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Unlink the entry and hand its slot to the caller. The map disposes
    /// of nothing; the returned slot now carries the disposal obligation.
    pub fn remove(&mut self, key: &str) -> Option<NodeSlot<N>> {
        self.inner.remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.inner.bucket_count()
    }

    /// Nodes in enumeration order (ascending bucket, then chain
    /// head-to-tail).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &N)> + '_ {
        self.inner.iter().map(|(_, k, slot)| (k, &**slot))
    }

    /// Aggregate predicate: does any stored node satisfy `pred`? Scans in
    /// enumeration order and stops at the first satisfying node; false for
    /// an empty map.
    pub fn any<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&N) -> bool,
    {
        self.inner.iter().any(|(_, _, slot)| pred(&**slot))
    }

    /// Diagnostic listing using each node's own `Render`.
    pub fn render(&self) -> String
    where
        N: Render,
    {
        self.render_with(|node, out| node.render(out))
    }

    /// Diagnostic listing with a caller-supplied per-node renderer: a
    /// header with the entry count, then one `[bucket] key: node` line per
    /// entry in enumeration order.
    pub fn render_with<F>(&self, mut render_node: F) -> String
    where
        F: FnMut(&N, &mut String),
    {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} entries across {} buckets",
            self.len(),
            self.bucket_count()
        );
        if self.is_empty() {
            out.push_str("(empty)\n");
            return out;
        }
        for (bucket, key, slot) in self.inner.iter() {
            let _ = write!(out, "[{}] {}: ", bucket, key);
            render_node(&**slot, &mut out);
            out.push('\n');
        }
        out
    }

    /// Consume the map and yield every key and slot, letting the caller
    /// dispose of nodes under a policy other than the recorded one.
    pub fn into_slots(self) -> impl Iterator<Item = (Box<str>, NodeSlot<N>)> {
        self.inner.into_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    /// Invariant: a slot dereferences to its node under either policy.
    #[test]
    fn slot_deref_and_queries() {
        let owned: NodeSlot<i32> = NodeSlot::Owned(7);
        let shared: NodeSlot<i32> = NodeSlot::Shared(Rc::new(9));
        assert_eq!(*owned, 7);
        assert_eq!(*shared, 9);
        assert!(!owned.is_shared());
        assert!(shared.is_shared());
        assert_eq!(owned.into_owned(), Some(7));
        assert_eq!(shared.into_owned(), None);
    }

    /// Invariant: lookup sees through both policies transparently.
    #[test]
    fn lookup_spans_policies() {
        let mut m: NodeHashMap<String> = NodeHashMap::with_buckets(8).unwrap();
        m.insert("own", "o".to_string());
        m.insert_shared("share", Rc::new("s".to_string()));
        assert_eq!(m.lookup("own").map(String::as_str), Some("o"));
        assert_eq!(m.lookup("share").map(String::as_str), Some("s"));
        assert_eq!(m.len(), 2);
    }

    /// Invariant: the aggregate predicate is false on an empty map and
    /// short-circuits on the first satisfying node.
    #[test]
    fn any_short_circuits() {
        let mut m: NodeHashMap<i32> = NodeHashMap::with_buckets(8).unwrap();
        assert!(!m.any(|_| true));

        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        let mut seen = 0;
        assert!(m.any(|v| {
            seen += 1;
            *v >= 1
        }));
        assert_eq!(seen, 1);
        assert!(!m.any(|v| *v > 99));
    }

    /// Invariant: rendering an empty map reports emptiness instead of
    /// walking entries.
    #[test]
    fn render_empty_map() {
        let m: NodeHashMap<i32> = NodeHashMap::with_buckets(4).unwrap();
        let text = m.render_with(|_, _| panic!("no entries to render"));
        assert!(text.starts_with("0 entries across 4 buckets"));
        assert!(text.contains("(empty)"));
    }

    /// Invariant: `render_with` drives the supplied renderer once per entry
    /// with the bucket-ordered listing shape.
    #[test]
    fn render_with_lists_entries() {
        let mut m: NodeHashMap<i32> = NodeHashMap::with_buckets(8).unwrap();
        m.insert("a", 10);
        m.insert("b", 20);
        let text = m.render_with(|v, out| {
            let _ = write!(out, "<{}>", v);
        });
        assert!(text.starts_with("2 entries across 8 buckets"));
        assert!(text.contains("[6] a: <10>"));
        assert!(text.contains("[7] b: <20>"));
    }
}
