//! Stack-group bookkeeping.
//!
//! `StackGroups` keeps, for every group key, its members ordered by stack
//! level descending; equal levels keep arrival order. It only orders
//! effects. Flipping in-use flags and installing stat functions belongs
//! to the batch processor, which asks the resolver who leads and who is
//! in the way.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::StackGroupKey;
use crate::effects::{Effect, EffectRef};

/// Effects returned from a stack operation.
pub type StackList = SmallVec<[EffectRef; 2]>;

fn push_unique(list: &mut StackList, effect: &EffectRef) {
    if !list.iter().any(|e| e.id() == effect.id()) {
        list.push(Arc::clone(effect));
    }
}

/// Ordered members of every stack group on one owner.
#[derive(Clone, Debug, Default)]
pub struct StackGroups {
    groups: FxHashMap<StackGroupKey, Vec<EffectRef>>,
}

impl StackGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `effect` into each of its groups at its rank.
    ///
    /// With `canceling` (and a non-herb effect), a group holding more than
    /// one member after insertion drops its second-ranked member: the
    /// outranked leader when `effect` took first place, or `effect` itself
    /// when it did not. The dropped effects are returned so the caller can
    /// remove them from the owner entirely.
    pub fn insert(&mut self, effect: &EffectRef, canceling: bool) -> StackList {
        let mut cancelled = StackList::new();

        for key in effect.stack_groups() {
            let members = self.groups.entry(key.clone()).or_default();
            if members.iter().any(|m| m.id() == effect.id()) {
                continue;
            }

            let rank = members
                .iter()
                .take_while(|m| m.stack_level() >= effect.stack_level())
                .count();
            members.insert(rank, Arc::clone(effect));

            if canceling && !effect.is_herb() && members.len() > 1 {
                let dropped = members.remove(1);
                push_unique(&mut cancelled, &dropped);
            }
        }

        cancelled
    }

    /// Remove `effect` from every group it belongs to.
    ///
    /// Returns the new first member of each group `effect` was leading:
    /// candidates for promotion.
    pub fn withdraw(&mut self, effect: &Effect) -> StackList {
        let mut candidates = StackList::new();

        for key in effect.stack_groups() {
            let Some(members) = self.groups.get_mut(key) else {
                continue;
            };
            let Some(index) = members.iter().position(|m| m.id() == effect.id()) else {
                continue;
            };

            members.remove(index);
            if index == 0 {
                if let Some(next) = members.first() {
                    push_unique(&mut candidates, next);
                }
            }
            if members.is_empty() {
                self.groups.remove(key);
            }
        }

        candidates.retain(|c| c.id() != effect.id());
        candidates
    }

    /// `effect` ranks first in every one of its groups.
    #[must_use]
    pub fn is_first_in_all(&self, effect: &Effect) -> bool {
        effect.stack_groups().iter().all(|key| {
            self.leader(key).is_some_and(|leader| leader.id() == effect.id())
        })
    }

    /// In-use members sharing a group with `effect`, other than `effect`.
    #[must_use]
    pub fn rivals_in_use(&self, effect: &Effect) -> StackList {
        let mut rivals = StackList::new();
        for key in effect.stack_groups() {
            for member in self.members(key) {
                if member.id() != effect.id() && member.in_use() {
                    push_unique(&mut rivals, member);
                }
            }
        }
        rivals
    }

    /// First-ranked member of a group.
    #[must_use]
    pub fn leader(&self, key: &StackGroupKey) -> Option<&EffectRef> {
        self.groups.get(key).and_then(|members| members.first())
    }

    /// Members of a group, best first.
    #[must_use]
    pub fn members(&self, key: &StackGroupKey) -> &[EffectRef] {
        self.groups.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether `effect` is tracked in any group.
    #[must_use]
    pub fn contains(&self, effect: &Effect) -> bool {
        effect
            .stack_groups()
            .iter()
            .any(|key| self.members(key).iter().any(|m| m.id() == effect.id()))
    }

    /// Iterate over every group and its members.
    pub fn iter(&self) -> impl Iterator<Item = (&StackGroupKey, &[EffectRef])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of non-empty groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
