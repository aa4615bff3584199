//! Aggregate of the capability masks of all in-use effects.
//!
//! Written only by the batch processor at a batch boundary; read by any
//! thread at any time. A reader sees either the previous or the new
//! aggregate, never a mix, because each value is a single atomic word.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::effects::EffectRef;

use super::EffectFlags;

/// Owner-visible shortcuts used by damage/action handlers to skip scanning
/// the effect lists on every hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateFlags {
    /// Some buff is removed when the owner acts.
    pub buffs_removed_on_action: bool,
    /// Some buff is removed when the owner takes damage.
    pub buffs_removed_on_damage: bool,
    /// Some debuff is removed when the owner takes damage.
    pub debuffs_removed_on_damage: bool,
    /// Some buff is removed when it blocks a debuff.
    pub buffs_removed_on_debuff_block: bool,
}

impl PredicateFlags {
    const ACTION: u8 = 1 << 0;
    const BUFF_DAMAGE: u8 = 1 << 1;
    const DEBUFF_DAMAGE: u8 = 1 << 2;
    const DEBUFF_BLOCK: u8 = 1 << 3;

    /// Compute the predicates over the current buffs and debuffs.
    ///
    /// Dormant effects count: they can be removed by the same triggers.
    pub fn scan<'a>(
        buffs: impl IntoIterator<Item = &'a EffectRef>,
        debuffs: impl IntoIterator<Item = &'a EffectRef>,
    ) -> Self {
        let mut flags = Self::default();
        for effect in buffs {
            let skill = effect.skill();
            flags.buffs_removed_on_action |= skill.removed_on_action;
            flags.buffs_removed_on_damage |= skill.removed_on_damage.is_some();
            flags.buffs_removed_on_debuff_block |= skill.removed_on_debuff_block;
        }
        for effect in debuffs {
            flags.debuffs_removed_on_damage |= effect.skill().removed_on_damage.is_some();
        }
        flags
    }

    fn to_bits(self) -> u8 {
        let mut bits = 0;
        if self.buffs_removed_on_action {
            bits |= Self::ACTION;
        }
        if self.buffs_removed_on_damage {
            bits |= Self::BUFF_DAMAGE;
        }
        if self.debuffs_removed_on_damage {
            bits |= Self::DEBUFF_DAMAGE;
        }
        if self.buffs_removed_on_debuff_block {
            bits |= Self::DEBUFF_BLOCK;
        }
        bits
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            buffs_removed_on_action: bits & Self::ACTION != 0,
            buffs_removed_on_damage: bits & Self::BUFF_DAMAGE != 0,
            debuffs_removed_on_damage: bits & Self::DEBUFF_DAMAGE != 0,
            buffs_removed_on_debuff_block: bits & Self::DEBUFF_BLOCK != 0,
        }
    }
}

/// Lock-free store for the aggregate mask and the predicate flags.
#[derive(Debug, Default)]
pub struct FlagAggregator {
    mask: AtomicU64,
    predicates: AtomicU8,
}

impl FlagAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// OR-fold the masks of every in-use effect and publish the result.
    ///
    /// Must only be called by the batch processor.
    pub fn recompute<'a>(&self, effects: impl IntoIterator<Item = &'a EffectRef>) -> EffectFlags {
        let folded = effects
            .into_iter()
            .filter(|e| e.in_use())
            .fold(EffectFlags::NONE, |acc, e| acc | e.mask());
        self.mask.store(folded.bits(), Ordering::Release);
        folded
    }

    /// Current aggregate mask.
    #[must_use]
    pub fn current(&self) -> EffectFlags {
        EffectFlags(self.mask.load(Ordering::Acquire))
    }

    /// Whether any bit of `flag` is set in the aggregate.
    #[must_use]
    pub fn is_affected(&self, flag: EffectFlags) -> bool {
        self.current().intersects(flag)
    }

    /// Publish new predicate flags.
    pub fn store_predicates(&self, predicates: PredicateFlags) {
        self.predicates.store(predicates.to_bits(), Ordering::Release);
    }

    /// Current predicate flags.
    #[must_use]
    pub fn predicates(&self) -> PredicateFlags {
        PredicateFlags::from_bits(self.predicates.load(Ordering::Acquire))
    }

    /// Reset both values to empty.
    pub fn reset(&self) {
        self.mask.store(0, Ordering::Release);
        self.predicates.store(0, Ordering::Release);
    }
}
