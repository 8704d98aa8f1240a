//! invertible_bloom — Bloom-style set and dictionary with peelable
//! enumeration.
//!
//! - Insert/remove/contains behave like a classical Bloom filter: no
//!   false negatives, possible false positives on membership.
//! - Additionally, when load is low enough relative to the directory
//!   size, the full set of inserted entries can be recovered by
//!   [`IbSet::list_all`]/[`IbDict::list_all`] via peeling decode.
//! - [`IbDict`] also recovers the value for a queried key.
//!
//! Capacity is fixed at construction; there is no resizing, no disk/wire
//! serialization (though [`IbSet::list_seeds`]/[`IbDict::list_seeds`]
//! expose what an external layer needs to reconstruct an equivalent
//! peer), and no internal synchronization — confine an instance to one
//! thread, or guard it externally.

mod dict;
mod engine;
mod error;
mod hash;
mod set;
mod traits;

pub use dict::IbDict;
pub use engine::Presence;
pub use error::BloomError;
pub use hash::{KeyHasher, Murmur3Mix};
pub use set::IbSet;
pub use traits::{BloomCounter, BloomKey, BloomValue, NoValue};
