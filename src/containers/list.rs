//! Ordered effect container.
//!
//! Backed by a persistent `im::Vector`: taking a snapshot is an O(1) clone
//! that shares structure with the live container, so a reader iterating a
//! snapshot is never disturbed by the batch processor editing the original.

use im::Vector;
use smallvec::SmallVec;

use crate::core::EffectId;
use crate::effects::{Effect, EffectRef};

/// Effects picked out of a container for removal.
pub type Picked = SmallVec<[EffectRef; 4]>;

/// One of the owner's two effect lists (buffs or debuffs).
///
/// Buffs keep the display convention: plain, seven-signs, toggle, dance,
/// activation. Debuffs are kept in arrival order.
#[derive(Clone, Debug, Default)]
pub struct EffectContainer {
    entries: Vector<EffectRef>,
}

impl EffectContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectRef> {
        self.entries.iter()
    }

    #[must_use]
    pub fn contains(&self, effect: &Effect) -> bool {
        self.position(effect.id()).is_some()
    }

    #[must_use]
    pub fn position(&self, id: EffectId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Point-in-time copy sharing structure with the container.
    #[must_use]
    pub fn snapshot(&self) -> Vector<EffectRef> {
        self.entries.clone()
    }

    /// Append in arrival order.
    pub fn push_back(&mut self, effect: EffectRef) {
        self.entries.push_back(effect);
    }

    /// Insert before the first entry of a later display category.
    ///
    /// Returns the index the effect landed at.
    pub fn insert_ordered(&mut self, effect: EffectRef) -> usize {
        let rank = effect.category().rank();
        let index = self
            .entries
            .iter()
            .position(|e| e.category().rank() > rank)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, effect);
        index
    }

    /// Remove an effect by identity. Returns it if it was present.
    pub fn remove(&mut self, effect: &Effect) -> Option<EffectRef> {
        let index = self.position(effect.id())?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries of the same template as `effect` (see [`Effect::same_signature`]).
    #[must_use]
    pub fn same_signature(&self, effect: &Effect) -> Picked {
        self.entries
            .iter()
            .filter(|e| e.id() != effect.id() && e.same_signature(effect))
            .cloned()
            .collect()
    }

    /// Icon-visible plain buffs that occupy a regular buff slot.
    #[must_use]
    pub fn plain_buff_count(&self) -> usize {
        self.entries.iter().filter(|e| e.occupies_buff_slot()).count()
    }

    /// In-use dances and songs.
    #[must_use]
    pub fn dance_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.in_use() && e.skill().is_dance())
            .count()
    }

    /// In-use activation-type effects.
    #[must_use]
    pub fn activation_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.in_use() && e.skill().is_activation())
            .count()
    }

    /// The `n` earliest entries matching `pred`.
    pub fn earliest(&self, n: usize, pred: impl Fn(&Effect) -> bool) -> Picked {
        self.entries
            .iter()
            .filter(|e| pred(e))
            .take(n)
            .cloned()
            .collect()
    }

    /// Categories appear in non-decreasing display rank.
    #[must_use]
    pub fn is_display_ordered(&self) -> bool {
        self.entries
            .iter()
            .zip(self.entries.iter().skip(1))
            .all(|(a, b)| a.category().rank() <= b.category().rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SkillId;
    use crate::effects::SkillInfo;
    use std::sync::Arc;

    fn make(id: u64, skill: SkillInfo) -> EffectRef {
        Effect::builder(EffectId(id), Arc::new(skill)).build()
    }

    fn ids(container: &EffectContainer) -> Vec<u64> {
        container.iter().map(|e| e.id().raw()).collect()
    }

    #[test]
    fn test_display_order() {
        let mut buffs = EffectContainer::new();
        buffs.insert_ordered(make(1, SkillInfo::activation(SkillId::new(1), 1)));
        buffs.insert_ordered(make(2, SkillInfo::dance(SkillId::new(2), 1)));
        buffs.insert_ordered(make(3, SkillInfo::toggle(SkillId::new(3), 1)));
        buffs.insert_ordered(make(4, SkillInfo::buff(SkillId::new(4), 1)));
        buffs.insert_ordered(make(5, SkillInfo::seven_signs(SkillId::new(5), 1)));
        buffs.insert_ordered(make(6, SkillInfo::buff(SkillId::new(6), 1)));
        buffs.insert_ordered(make(7, SkillInfo::dance(SkillId::new(7), 1)));

        assert_eq!(ids(&buffs), vec![4, 6, 5, 3, 2, 7, 1]);
        assert!(buffs.is_display_ordered());
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let mut buffs = EffectContainer::new();
        buffs.push_back(make(1, SkillInfo::buff(SkillId::new(1), 1)));
        let snapshot = buffs.snapshot();

        buffs.push_back(make(2, SkillInfo::buff(SkillId::new(2), 1)));
        let first = snapshot[0].clone();
        buffs.remove(&first);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), EffectId(1));
        assert_eq!(ids(&buffs), vec![2]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut buffs = EffectContainer::new();
        let effect = make(1, SkillInfo::buff(SkillId::new(1), 1));
        assert!(buffs.remove(&effect).is_none());
        buffs.push_back(Arc::clone(&effect));
        assert!(buffs.remove(&effect).is_some());
        assert!(buffs.remove(&effect).is_none());
        assert!(buffs.is_empty());
    }

    #[test]
    fn test_counts() {
        let mut buffs = EffectContainer::new();
        let dance = make(1, SkillInfo::dance(SkillId::new(1), 1));
        let parked_dance = make(2, SkillInfo::dance(SkillId::new(2), 1));
        let activation = make(3, SkillInfo::activation(SkillId::new(3), 1));
        dance.set_in_use(true);
        activation.set_in_use(true);

        buffs.insert_ordered(make(4, SkillInfo::buff(SkillId::new(4), 1)));
        buffs.insert_ordered(Effect::builder(EffectId(5), Arc::new(SkillInfo::buff(SkillId::new(5), 1))).hidden_icon().build());
        buffs.insert_ordered(dance);
        buffs.insert_ordered(parked_dance);
        buffs.insert_ordered(activation);

        assert_eq!(buffs.plain_buff_count(), 1);
        assert_eq!(buffs.dance_count(), 1);
        assert_eq!(buffs.activation_count(), 1);
    }

    #[test]
    fn test_earliest_and_signature() {
        let mut buffs = EffectContainer::new();
        let skill = SkillInfo::buff(SkillId::new(10), 1);
        buffs.push_back(make(1, skill.clone()));
        buffs.push_back(make(2, SkillInfo::buff(SkillId::new(11), 1)));
        buffs.push_back(make(3, SkillInfo::buff(SkillId::new(12), 1)));

        let picked = buffs.earliest(2, Effect::occupies_buff_slot);
        assert_eq!(picked.iter().map(|e| e.id().raw()).collect::<Vec<_>>(), vec![1, 2]);

        let newcomer = make(9, skill);
        let same = buffs.same_signature(&newcomer);
        assert_eq!(same.len(), 1);
        assert_eq!(same[0].id(), EffectId(1));
    }
}
