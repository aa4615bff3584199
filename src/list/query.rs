//! Read-only queries. All of them read the published snapshot.

use std::sync::Arc;

use im::Vector;

use crate::core::{SkillId, StackGroupKey};
use crate::effects::{AbnormalType, EffectRef};

use super::{EffectList, Snapshot};

impl EffectList {
    /// Point-in-time view of both containers. O(1).
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.snapshot.read())
    }

    /// Every admitted effect, buffs first.
    #[must_use]
    pub fn all_effects(&self) -> Vec<EffectRef> {
        self.snapshot().iter().cloned().collect()
    }

    #[must_use]
    pub fn all_buffs(&self) -> Vector<EffectRef> {
        self.snapshot().buffs().clone()
    }

    #[must_use]
    pub fn all_debuffs(&self) -> Vector<EffectRef> {
        self.snapshot().debuffs().clone()
    }

    #[must_use]
    pub fn first_effect_by_type(&self, abnormal_type: AbnormalType) -> Option<EffectRef> {
        self.snapshot().first_by_type(abnormal_type)
    }

    #[must_use]
    pub fn first_effect_by_skill(&self, skill: SkillId) -> Option<EffectRef> {
        self.snapshot().first_by_skill(skill)
    }

    #[must_use]
    pub fn first_effect_by_stack_group(&self, key: &StackGroupKey) -> Option<EffectRef> {
        self.snapshot().first_by_stack_group(key)
    }

    #[must_use]
    pub fn first_effect_by_kind_name(&self, name: &str) -> Option<EffectRef> {
        self.snapshot().first_by_kind_name(name)
    }

    /// Regular buff slots in use, not counting dances, toggles, activations
    /// and seven-signs blessings.
    #[must_use]
    pub fn buff_count(&self) -> usize {
        self.snapshot().buffs().iter().filter(|e| e.occupies_buff_slot()).count()
    }

    #[must_use]
    pub fn dance_count(&self) -> usize {
        self.snapshot()
            .buffs()
            .iter()
            .filter(|e| e.in_use() && e.skill().is_dance())
            .count()
    }

    #[must_use]
    pub fn activation_count(&self) -> usize {
        self.snapshot()
            .buffs()
            .iter()
            .filter(|e| e.in_use() && e.skill().is_activation())
            .count()
    }
}
