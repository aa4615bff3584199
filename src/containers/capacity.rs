//! Capacity policy for the buff container.

use std::fmt;

use crate::core::MAX_ACTIVATIONS;
use crate::effects::{Effect, SkillCategory};

use super::{EffectContainer, Picked};

/// Why a buff was refused admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Herb effects never push out another buff.
    HerbAtCapacity,
    /// The category has no slots at all.
    NoSlots,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HerbAtCapacity => write!(f, "herb effect at buff capacity"),
            Self::NoSlots => write!(f, "no slots for category"),
        }
    }
}

/// Per-category caps, evaluated for each new buff.
///
/// - activation: `activations_max` in-use effects
/// - dance/song: `dances_max` in-use effects
/// - plain buffs: `buffs_max` slot-occupying effects (the owner's dynamic count)
/// - toggles: uncapped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityPolicy {
    pub dances_max: usize,
    pub activations_max: usize,
    pub buffs_max: usize,
}

impl CapacityPolicy {
    #[must_use]
    pub fn new(dances_max: usize, buffs_max: usize) -> Self {
        Self {
            dances_max,
            activations_max: MAX_ACTIVATIONS,
            buffs_max,
        }
    }

    /// Buffs that must leave before `newcomer` fits, earliest first.
    ///
    /// A full category gives up its earliest members until one slot is
    /// free. Herbs are rejected instead whenever the plain buff slots are
    /// already full.
    pub fn evictions_for(&self, buffs: &EffectContainer, newcomer: &Effect) -> Result<Picked, Rejection> {
        if newcomer.is_herb() && buffs.plain_buff_count() >= self.buffs_max {
            return Err(Rejection::HerbAtCapacity);
        }

        let counted: fn(&Effect) -> bool = match newcomer.category() {
            SkillCategory::Activation => |e| e.in_use() && e.skill().is_activation(),
            SkillCategory::Dance => |e| e.in_use() && e.skill().is_dance(),
            SkillCategory::Plain if newcomer.occupies_buff_slot() => Effect::occupies_buff_slot,
            _ => return Ok(Picked::new()),
        };
        let cap = match newcomer.category() {
            SkillCategory::Activation => self.activations_max,
            SkillCategory::Dance => self.dances_max,
            _ => self.buffs_max,
        };

        let count = buffs.iter().filter(|e| counted(e)).count();
        if count < cap {
            return Ok(Picked::new());
        }
        if cap == 0 {
            return Err(Rejection::NoSlots);
        }
        Ok(buffs.earliest(count - cap + 1, counted))
    }

    /// Slot-occupying buffs held beyond the plain buff cap, earliest first.
    /// Only non-empty after the cap shrank below what is already held.
    #[must_use]
    pub fn overflow(&self, buffs: &EffectContainer) -> Picked {
        let count = buffs.plain_buff_count();
        if count <= self.buffs_max {
            return Picked::new();
        }
        buffs.earliest(count - self.buffs_max, Effect::occupies_buff_slot)
    }
}
