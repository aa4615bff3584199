//! Flag aggregation for O(1) "is affected by X" queries.
//!
//! - `EffectFlags`: the capability bitmask each effect carries
//! - `FlagAggregator`: OR-fold of all in-use masks, published atomically
//! - `PredicateFlags`: "has a buff removed on action/damage/debuff block"

mod mask;
mod aggregator;

pub use mask::EffectFlags;
pub use aggregator::{FlagAggregator, PredicateFlags};
