//! Buff and debuff containers.
//!
//! - `EffectContainer`: ordered, snapshot-friendly effect list
//! - `CapacityPolicy`: per-category caps and eviction choice for new buffs

mod capacity;
mod list;

pub use capacity::{CapacityPolicy, Rejection};
pub use list::{EffectContainer, Picked};
