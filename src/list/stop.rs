//! Bulk removal. Each operation picks its victims from the published
//! snapshot, queues them all, then drains once, so observers see a single
//! update.

use std::sync::Arc;

use tracing::trace;

use crate::core::SkillId;
use crate::effects::{AbnormalType, Effect, EffectRef, SkillInfo};
use crate::flags::EffectFlags;
use crate::queue::Mutation;

use super::EffectList;

impl EffectList {
    /// Queue every matching effect for removal and drain. Returns how many
    /// were queued.
    fn stop_matching<'a>(&self, effects: impl IntoIterator<Item = &'a EffectRef>) -> usize {
        let inner = &self.inner;
        let mut queued = 0;
        for effect in effects {
            effect.stop_timer(inner.scheduler.as_ref());
            inner.queue.push(Arc::clone(effect), Mutation::Remove);
            queued += 1;
        }
        if queued > 0 {
            trace!(queued, "bulk removal");
            inner.run();
        }
        queued
    }

    fn stop_where(&self, pred: impl Fn(&Effect) -> bool) -> usize {
        let snapshot = self.snapshot();
        self.stop_matching(snapshot.iter().filter(|e| pred(e)))
    }

    pub fn stop_all_effects(&self) -> usize {
        self.stop_where(|_| true)
    }

    /// Death: everything goes except effects flagged to stay.
    pub fn stop_all_effects_except_those_that_last_through_death(&self) -> usize {
        self.stop_where(|e| !e.skill().stays_after_death)
    }

    pub fn stop_all_toggles(&self) -> usize {
        let snapshot = self.snapshot();
        self.stop_matching(snapshot.buffs().iter().filter(|e| e.skill().is_toggle()))
    }

    pub fn stop_effects_by_type(&self, abnormal_type: AbnormalType) -> usize {
        self.stop_where(|e| e.abnormal_type() == abnormal_type)
    }

    /// Effects sharing any bit with `mask`.
    pub fn stop_effects_by_mask(&self, mask: EffectFlags) -> usize {
        self.stop_where(|e| e.mask().intersects(mask))
    }

    pub fn stop_skill_effects(&self, skill: SkillId) -> usize {
        self.stop_where(|e| e.skill().id == skill)
    }

    /// The owner attacked or cast `skill`. Self and party targeted casts
    /// are friendly and remove nothing.
    pub fn stop_effects_on_action(&self, skill: Option<&SkillInfo>) -> usize {
        if !self.predicates().buffs_removed_on_action || skill.is_some_and(SkillInfo::is_friendly) {
            return 0;
        }
        let snapshot = self.snapshot();
        self.stop_matching(snapshot.buffs().iter().filter(|e| e.skill().removed_on_action))
    }

    /// The owner took `damage`.
    ///
    /// Buffs of fear and sleep types survive. Debuffs with a removal chance
    /// only leave when the roll succeeds.
    pub fn stop_effects_on_damage(&self, awake: bool, damage: u32) -> usize {
        if !awake {
            return 0;
        }
        let predicates = self.predicates();
        let snapshot = self.snapshot();
        let mut victims: Vec<&EffectRef> = Vec::new();

        if predicates.buffs_removed_on_damage {
            victims.extend(snapshot.buffs().iter().filter(|e| {
                !e.abnormal_type().ignores_wake_damage() && e.is_removed_on_damage(damage)
            }));
        }

        if predicates.debuffs_removed_on_damage {
            let mut rng = self.inner.rng.lock();
            for effect in snapshot.debuffs().iter().filter(|e| e.is_removed_on_damage(damage)) {
                let chance = effect.skill().removed_on_damage.map_or(0, |r| r.chance);
                if chance == 0 || rng.roll_percent(chance) {
                    victims.push(effect);
                }
            }
        }

        self.stop_matching(victims)
    }

    /// A buff just blocked an incoming debuff.
    pub fn stop_effects_on_debuff_block(&self) -> usize {
        if !self.predicates().buffs_removed_on_debuff_block {
            return 0;
        }
        let snapshot = self.snapshot();
        self.stop_matching(
            snapshot
                .buffs()
                .iter()
                .filter(|e| e.skill().removed_on_debuff_block),
        )
    }
}
