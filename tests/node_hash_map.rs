// NodeHashMap disposal-policy test suite.
//
// Each test documents the behavior being verified. The core contracts:
// - Upsert: replacing a key's node disposes of the displaced node exactly
//   once under the policy it was inserted with (owned: released; shared:
//   only the table's reference is given up).
// - Remove: the map disposes of nothing; the returned slot carries the
//   disposal obligation to the caller.
// - Drop: tearing the map down releases every owned node once and only
//   the table's reference to shared nodes.
// - into_slots: the override path; the caller decides all disposal.
use attr_hashmap::{NodeHashMap, NodeSlot, Render};
use std::cell::Cell;
use std::rc::Rc;

// Node whose drops are observable from the outside.
struct Probe {
    id: u32,
    drops: Rc<Cell<usize>>,
}

impl Probe {
    fn new(id: u32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            id,
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl Render for Probe {
    fn render(&self, out: &mut String) {
        out.push_str(&format!("probe#{}", self.id));
    }
}

// Test: last-write-wins plus disposal accounting for owned predecessors.
// Verifies: exactly one release of the displaced node, length unchanged.
#[test]
fn upsert_disposes_owned_predecessor_once() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();

    m.insert("k", Probe::new(1, &drops));
    assert_eq!(drops.get(), 0);

    m.insert("k", Probe::new(2, &drops));
    assert_eq!(drops.get(), 1, "old node released exactly once");
    assert_eq!(m.len(), 1);
    assert_eq!(m.lookup("k").map(|p| p.id), Some(2));
}

// Test: overwriting a shared predecessor must not release the node.
// Verifies: the table gives up only its reference; the external holder
// still owns a live node.
#[test]
fn upsert_never_releases_shared_predecessor() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();

    let external = Rc::new(Probe::new(1, &drops));
    m.insert_shared("k", Rc::clone(&external));
    assert_eq!(Rc::strong_count(&external), 2);

    m.insert("k", Probe::new(2, &drops));
    assert_eq!(Rc::strong_count(&external), 1, "table reference given up");
    assert_eq!(drops.get(), 0, "shared node must outlive the overwrite");
    assert_eq!(external.id, 1);
}

// Test: remove transfers ownership instead of releasing.
// Verifies: nothing is dropped by the map; the caller's drop of the slot
// is what finally releases the node.
#[test]
fn remove_hands_over_disposal() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
    m.insert("k", Probe::new(7, &drops));

    let slot = m.remove("k").expect("key present");
    assert_eq!(drops.get(), 0, "remove must not release the node");
    assert!(!m.contains("k"));
    assert_eq!(m.len(), 0);
    assert_eq!(slot.id, 7);

    let node = slot.into_owned().expect("owned policy");
    assert_eq!(drops.get(), 0);
    drop(node);
    assert_eq!(drops.get(), 1);
}

// Test: removing a shared entry returns a shared slot.
#[test]
fn remove_preserves_shared_policy() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
    let external = Rc::new(Probe::new(3, &drops));
    m.insert_shared("k", Rc::clone(&external));

    let slot = m.remove("k").expect("key present");
    assert!(slot.is_shared());
    drop(slot);
    assert_eq!(drops.get(), 0, "external holder keeps the node alive");
    assert_eq!(Rc::strong_count(&external), 1);
}

// Test: dropping the map releases every owned node exactly once and only
// the table's reference to shared nodes.
#[test]
fn map_drop_releases_per_policy() {
    let drops = Rc::new(Cell::new(0));
    let external = Rc::new(Probe::new(9, &drops));
    {
        let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
        m.insert("a", Probe::new(1, &drops));
        m.insert("b", Probe::new(2, &drops));
        m.insert("c", Probe::new(3, &drops));
        m.insert_shared("s", Rc::clone(&external));
        assert_eq!(drops.get(), 0);
    }
    assert_eq!(drops.get(), 3, "one release per owned node");
    assert_eq!(Rc::strong_count(&external), 1);
}

// Test: destroying a freshly created map performs no per-entry work.
#[test]
fn empty_map_drop_is_a_noop() {
    let m: NodeHashMap<Probe> = NodeHashMap::with_buckets(4).unwrap();
    assert!(m.is_empty());
    drop(m);
}

// Test: the override path. into_slots consumes the map without disposing;
// the caller then applies whatever policy it wants.
#[test]
fn into_slots_defers_all_disposal() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
    m.insert("a", Probe::new(1, &drops));
    m.insert("b", Probe::new(2, &drops));

    let slots: Vec<(Box<str>, NodeSlot<Probe>)> = m.into_slots().collect();
    assert_eq!(slots.len(), 2);
    assert_eq!(drops.get(), 0, "consuming the map released nothing");

    drop(slots);
    assert_eq!(drops.get(), 2);
}

// Test: render output carries the header and one line per entry using the
// node's own renderer; render_with swaps in a custom one.
#[test]
fn render_paths() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
    m.insert("k1", Probe::new(1, &drops));
    m.insert("k2", Probe::new(2, &drops));

    let text = m.render();
    assert!(text.starts_with("2 entries across 8 buckets"));
    assert!(text.contains("k1: probe#1"));
    assert!(text.contains("k2: probe#2"));

    let custom = m.render_with(|p, out| out.push_str(if p.id == 1 { "one" } else { "other" }));
    assert!(custom.contains("k1: one"));
    assert!(custom.contains("k2: other"));
}

// Test: lookup/contains sentinel behavior for absent keys.
#[test]
fn absent_keys_are_not_errors() {
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
    assert!(m.lookup("ghost").is_none());
    assert!(!m.contains("ghost"));
    assert!(m.remove("ghost").is_none());
}

// Test: iteration yields each live node exactly once with its key.
#[test]
fn iter_yields_live_nodes() {
    let drops = Rc::new(Cell::new(0));
    let mut m: NodeHashMap<Probe> = NodeHashMap::with_buckets(8).unwrap();
    m.insert("a", Probe::new(1, &drops));
    m.insert("b", Probe::new(2, &drops));
    m.insert("c", Probe::new(3, &drops));
    m.remove("b");

    let mut seen: Vec<(String, u32)> = m.iter().map(|(k, p)| (k.to_string(), p.id)).collect();
    seen.sort();
    assert_eq!(seen, [("a".to_string(), 1), ("c".to_string(), 3)]);
}
