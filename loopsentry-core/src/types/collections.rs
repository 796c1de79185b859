//! Fast, non-cryptographic hash collections used throughout the call-graph
//! and escape-propagation passes, where the key space is attacker-inert
//! (source identifiers) and lookup speed matters far more than DoS
//! resistance.

use rustc_hash::FxHashMap as InnerMap;
use rustc_hash::FxHashSet as InnerSet;

pub type FxHashMap<K, V> = InnerMap<K, V>;
pub type FxHashSet<T> = InnerSet<T>;
