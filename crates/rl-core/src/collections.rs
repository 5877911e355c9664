//! Component H: "frozen sorted mapping"/"frozen sorted set" — a hash lookup
//! plus a stable ordered enumeration, built on [`indexmap`] with a fixed
//! hasher so iteration order never depends on the process's random seed.
//!
//! Every container in this workspace that needs ordering sorts under
//! [`rl_parser::collate::compare`]; nothing here is ever constructed with
//! the natural `Ord`/`Hash` derived from `String`.

use indexmap::{IndexMap, IndexSet};

/// `M<K, V>` from §3.
pub type FrozenMap<K, V> = IndexMap<K, V, ahash::RandomState>;

/// `S<T>` from §3.
pub type FrozenSet<T> = IndexSet<T, ahash::RandomState>;

/// Sorts `map`'s entries in place under the canonical comparator (§3
/// "Identifiers"), giving the ordered-enumeration half of `M<K, V>`.
pub fn sort_map_by_key<V>(map: &mut FrozenMap<String, V>) {
    map.sort_by(|a, _, b, _| rl_parser::collate::compare(a, b));
}

/// Sorts `set` in place under the canonical comparator.
pub fn sort_set(set: &mut FrozenSet<String>) {
    set.sort_by(|a, b| rl_parser::collate::compare(a, b));
}
