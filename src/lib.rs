//! attr-hashmap: single-threaded, deterministically hashed chain-bucket
//! maps used as the attribute-storage substrate of a layout-language
//! compiler front end.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one table engine carries every AST node kind the front end
//!   stores per element, in safe, verifiable layers so each piece can be
//!   reasoned about independently.
//! - Layers:
//!   - BucketHashMap<V, S>: structural map with an explicit bucket array of
//!     collision-chain heads and a slot-arena for entries; includes a
//!     debug-only non-reentrancy check to keep internals consistent while
//!     mutating.
//!   - NodeHashMap<N, S>: wraps BucketHashMap and adds the per-entry
//!     disposal policy (owned vs shared) plus the render-for-diagnostics
//!     surface and the aggregate predicate.
//!   - Typed facades (layout module): NodeHashMap monomorphized per AST
//!     node kind, each with its kind-specific aggregate queries.
//!
//! Constraints
//! - Single-threaded: no atomics, no locking; the shared policy uses `Rc`,
//!   which keeps those maps `!Send`/`!Sync`.
//! - Deterministic hashing: DJB2, unseeded, so bucket placement reproduces
//!   across runs and in diagnostics.
//! - Chains are head-inserted and buckets enumerate in ascending index
//!   order; no other iteration-order guarantee exists.
//! - Growth is a synchronous stop-the-world pass that doubles the bucket
//!   array when the load factor reaches 3/4.
//! - A zero bucket count is rejected at construction; every index
//!   computation divides by the bucket count.
//!
//! Why this split?
//! - Localize invariants: the engine owns chain/bucket consistency, the
//!   node layer owns disposal policy, the facades own kind semantics.
//! - The engine never runs user code while its structure is transiently
//!   inconsistent: keys are plain strings and displaced values are handed
//!   out before being dropped.
//!
//! Ownership semantics
//! - Keys are always duplicated into entry-owned storage at insertion.
//! - Overwriting a key disposes of the displaced node under the policy
//!   recorded when that node was inserted.
//! - `remove` disposes of nothing: the returned slot moves the disposal
//!   obligation to the caller.
//! - Dropping a map releases every entry's key, its node (per policy), and
//!   the bucket array.
//!
//! Hashing invariants
//! - Each entry stores its key's digest; indexing and growth always use
//!   the stored digest, so key bytes are read exactly once per insert.
//! - The digest of a key equals `hash::djb2(key.as_bytes())`; `str`'s own
//!   `Hash` framing is never involved.
//!
//! Notes and non-goals
//! - No thread safety, no persistence, no adversary-resistant hashing, no
//!   incremental resizing; bucket counts never shrink.
//! - Allocation failure is not modeled; the global allocator aborts.
//! - Enumeration during mutation is ruled out by borrow rules rather than
//!   runtime checks.

mod bucket_hash_map;
mod bucket_hash_map_proptest;
pub mod hash;
pub mod layout;
mod node_hash_map;
mod reentrancy;

// Public surface
pub use bucket_hash_map::{BucketHashMap, CreateError, Iter, DEFAULT_BUCKETS};
pub use hash::{djb2, Djb2Hasher, Djb2State, DJB2_SEED};
pub use layout::{AttributeValue, LayoutAttribute, LayoutAttributeMap, StyleState, StyleStateMap};
pub use node_hash_map::{NodeHashMap, NodeSlot, Render};
