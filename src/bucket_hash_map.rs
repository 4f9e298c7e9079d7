//! BucketHashMap: string-keyed chained hash table with an explicit bucket
//! array and slot-arena entry storage.
//!
//! The bucket array holds collision-chain heads; entries live in a
//! `SlotMap` arena and link intra-bucket through arena keys, so growth
//! relinks entries in place without reallocating keys or values. Chains are
//! head-inserted: within a bucket, the most recently inserted key
//! enumerates first.

use crate::hash::Djb2State;
use crate::reentrancy::DebugNonReentrant;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use core::mem;
use log::debug;
use slotmap::{DefaultKey, SlotMap};

/// Bucket count used by `new`.
pub const DEFAULT_BUCKETS: usize = 16;

/// Numerator/denominator of the growth threshold: the table doubles its
/// bucket array when `len / bucket_count` reaches 3/4.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

/// Construction-time configuration error.
#[derive(Debug, Eq, PartialEq)]
pub enum CreateError {
    /// A bucket count of zero would make every index computation divide by
    /// zero; it is rejected up front.
    ZeroBuckets,
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateError::ZeroBuckets => f.write_str("bucket count must be greater than zero"),
        }
    }
}

impl std::error::Error for CreateError {}

#[derive(Debug)]
struct Entry<V> {
    /// Owned duplicate of the caller's key; never aliases caller storage.
    key: Box<str>,
    /// Digest of `key`, computed once at insertion. Indexing always uses
    /// this stored digest, so growth never re-reads key bytes.
    hash: u64,
    value: V,
    /// Next entry in this bucket's collision chain.
    next: Option<DefaultKey>,
}

#[derive(Debug)]
pub struct BucketHashMap<V, S = Djb2State> {
    hasher: S,
    /// Collision-chain heads; `buckets.len()` is always > 0 and never
    /// decreases.
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry<V>>,
    guard: DebugNonReentrant,
}

impl<V> BucketHashMap<V> {
    pub fn new() -> Self {
        Self::make(DEFAULT_BUCKETS, Djb2State)
    }

    /// Create a table with `bucket_count` empty buckets. A zero count is a
    /// configuration error, not undefined arithmetic.
    pub fn with_buckets(bucket_count: usize) -> Result<Self, CreateError> {
        Self::with_buckets_and_hasher(bucket_count, Djb2State)
    }
}

impl<V> Default for BucketHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> BucketHashMap<V, S>
where
    S: BuildHasher,
{
    pub fn with_buckets_and_hasher(bucket_count: usize, hasher: S) -> Result<Self, CreateError> {
        if bucket_count == 0 {
            return Err(CreateError::ZeroBuckets);
        }
        Ok(Self::make(bucket_count, hasher))
    }

    fn make(bucket_count: usize, hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; bucket_count],
            slots: SlotMap::with_key(),
            guard: DebugNonReentrant::new(),
        }
    }

    /// Digest of the raw key bytes. Not routed through `str`'s `Hash` impl,
    /// which appends framing bytes and would change the digest.
    fn hash_key(&self, key: &str) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        h.finish()
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn find_in_chain(&self, bucket: usize, key: &str) -> Option<DefaultKey> {
        let mut cursor = self.buckets[bucket];
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            if &*entry.key == key {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Insert or update. An existing key has its value replaced in place
    /// (same entry, same owned key, length unchanged) and the displaced
    /// value is returned so the caller can dispose of it under whatever
    /// policy it was stored with. A fresh key is duplicated into a new
    /// entry pushed as its bucket's chain head; `None` is returned.
    ///
    /// Crossing the load threshold after a fresh insert doubles the bucket
    /// array in one synchronous pass over all entries.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let _op = self.guard.enter();
        let hash = self.hash_key(key);
        let bucket = self.bucket_of(hash);

        if let Some(k) = self.find_in_chain(bucket, key) {
            return Some(mem::replace(&mut self.slots[k].value, value));
        }

        let entry = Entry {
            key: key.into(),
            hash,
            value,
            next: self.buckets[bucket],
        };
        let k = self.slots.insert(entry);
        self.buckets[bucket] = Some(k);

        if self.slots.len() * LOAD_DEN >= self.buckets.len() * LOAD_NUM {
            Self::grow(&mut self.buckets, &mut self.slots);
        }
        None
    }

    /// Double the bucket array and re-home every entry by its stored
    /// digest. Entries are relinked in place; no key or value moves.
    /// Takes the fields directly so the caller's operation guard stays
    /// held across the pass.
    fn grow(buckets: &mut Vec<Option<DefaultKey>>, slots: &mut SlotMap<DefaultKey, Entry<V>>) {
        let old_count = buckets.len();
        let new_count = old_count * 2;
        let mut new_buckets: Vec<Option<DefaultKey>> = vec![None; new_count];

        for head in mem::take(buckets) {
            let mut cursor = head;
            while let Some(k) = cursor {
                let entry = &mut slots[k];
                cursor = entry.next;
                let bucket = (entry.hash % new_count as u64) as usize;
                entry.next = new_buckets[bucket];
                new_buckets[bucket] = Some(k);
            }
        }

        *buckets = new_buckets;
        debug!(
            "bucket array grown {} -> {} ({} entries)",
            old_count,
            new_count,
            slots.len()
        );
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let _op = self.guard.enter();
        let bucket = self.bucket_of(self.hash_key(key));
        let k = self.find_in_chain(bucket, key)?;
        Some(&self.slots[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let _op = self.guard.enter();
        let bucket = self.bucket_of(self.hash_key(key));
        let k = self.find_in_chain(bucket, key)?;
        Some(&mut self.slots[k].value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let _op = self.guard.enter();
        let bucket = self.bucket_of(self.hash_key(key));
        self.find_in_chain(bucket, key).is_some()
    }

    /// Unlink and free the entry for `key`, returning its value. Ownership
    /// of the value moves to the caller; the map does not dispose of it.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let _op = self.guard.enter();
        let bucket = self.bucket_of(self.hash_key(key));

        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[bucket];
        while let Some(k) = cursor {
            if &*self.slots[k].key == key {
                let next = self.slots[k].next;
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.slots[p].next = next,
                }
                let entry = self.slots.remove(k).unwrap();
                return Some(entry.value);
            }
            prev = cursor;
            cursor = self.slots[k].next;
        }
        None
    }

    /// Diagnostic traversal: buckets in ascending index order, chains
    /// head-to-tail (most recent insert first). The `&self` borrow makes
    /// mutation during enumeration unrepresentable.
    pub fn iter(&self) -> Iter<'_, V, S> {
        Iter {
            map: self,
            bucket: 0,
            cursor: None,
        }
    }

    /// Consume the map, yielding every owned key and value so the caller
    /// can apply a disposal policy other than plain drop.
    pub fn into_entries(self) -> impl Iterator<Item = (Box<str>, V)> {
        self.slots.into_iter().map(|(_, e)| (e.key, e.value))
    }
}

/// Iterator over `(bucket_index, key, value)` in enumeration order.
pub struct Iter<'a, V, S = Djb2State> {
    map: &'a BucketHashMap<V, S>,
    bucket: usize,
    cursor: Option<DefaultKey>,
}

impl<'a, V, S> Iterator for Iter<'a, V, S> {
    type Item = (usize, &'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cursor {
                let entry = &self.map.slots[k];
                self.cursor = entry.next;
                return Some((self.bucket - 1, &*entry.key, &entry.value));
            }
            if self.bucket == self.map.buckets.len() {
                return None;
            }
            self.cursor = self.map.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}
