//! chain-hashmap: a separate-chaining hash map over prime-sized bucket
//! arrays, with a small stdin/stdout key-value driver.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep each algorithmic decision (mixing, collision chains,
//!   prime-sized growth) in a small layer that can be reasoned about and
//!   tested independently.
//! - Layers:
//!   - mix: `MixHash` and the 32/64-bit finalizers. Bucket selection is
//!     `mix(key) % capacity`; equality is always the key's `Eq`.
//!   - prime: the capacity sizer (trial division; double, then advance
//!     to the next prime).
//!   - chain_map: `ChainHashMap<K, V>`, the table itself. Bucket heads in
//!     a `Vec`, chain nodes in a `SlotMap` arena linked by slot key.
//!   - protocol: the count-prefixed `put`/`get`/`delete` text protocol
//!     and its error type, generic over reader/writer for testing.
//!
//! Constraints
//! - Single-threaded: all mutation through `&mut self`; no interior
//!   mutability anywhere, so the borrow checker rules out reentrancy.
//! - Load factor is integer percent: growth fires on the insert that
//!   observes `len * 100 / capacity >= 90`, before that insert lands.
//! - Capacities after the first growth are always prime; the table never
//!   shrinks and exposes no entry iteration.
//! - Growth relinks nodes in the arena rather than reallocating them; the
//!   old bucket array is dropped in the same call.
//!
//! Why this split?
//! - The sizer and the mixer are pure functions with their own failure
//!   modes (none) and their own tests; the table composes them.
//! - The protocol layer owns every error in the crate. The table has no
//!   error type: misses are `Option::None` and allocation follows the
//!   standard collection model.

mod chain_map;
mod chain_map_proptest;
pub mod mix;
pub mod prime;
pub mod protocol;

// Public surface
pub use chain_map::ChainHashMap;
pub use mix::MixHash;
pub use protocol::{serve, ProtocolError, Request};
