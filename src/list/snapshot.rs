//! Published, immutable view of the containers.

use im::Vector;

use crate::core::{SkillId, StackGroupKey};
use crate::effects::{AbnormalType, Effect, EffectRef};

/// The buffs and debuffs as of the last settled batch.
///
/// Shares structure with the live containers; holding one never blocks
/// the processor and is never disturbed by it.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    buffs: Vector<EffectRef>,
    debuffs: Vector<EffectRef>,
}

impl Snapshot {
    pub(super) fn new(buffs: Vector<EffectRef>, debuffs: Vector<EffectRef>) -> Self {
        Self { buffs, debuffs }
    }

    #[must_use]
    pub fn buffs(&self) -> &Vector<EffectRef> {
        &self.buffs
    }

    #[must_use]
    pub fn debuffs(&self) -> &Vector<EffectRef> {
        &self.debuffs
    }

    /// Buffs then debuffs.
    pub fn iter(&self) -> impl Iterator<Item = &EffectRef> {
        self.buffs.iter().chain(self.debuffs.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffs.len() + self.debuffs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty() && self.debuffs.is_empty()
    }

    /// First in-use effect matching `pred`; failing that, the last dormant one.
    pub fn find(&self, pred: impl Fn(&Effect) -> bool) -> Option<EffectRef> {
        let mut dormant = None;
        for effect in self.iter().filter(|e| pred(e)) {
            if effect.in_use() {
                return Some(EffectRef::clone(effect));
            }
            dormant = Some(effect);
        }
        dormant.cloned()
    }

    #[must_use]
    pub fn first_by_type(&self, abnormal_type: AbnormalType) -> Option<EffectRef> {
        self.find(|e| e.abnormal_type() == abnormal_type)
    }

    #[must_use]
    pub fn first_by_skill(&self, skill: SkillId) -> Option<EffectRef> {
        self.find(|e| e.skill().id == skill)
    }

    /// Matches effects whose first stack group is `key`.
    #[must_use]
    pub fn first_by_stack_group(&self, key: &StackGroupKey) -> Option<EffectRef> {
        self.find(|e| e.stack_groups().first() == Some(key))
    }

    #[must_use]
    pub fn first_by_kind_name(&self, name: &str) -> Option<EffectRef> {
        self.find(|e| e.kind().name() == name)
    }
}
