//! One drained batch: admission, removal and stack promotion.
//!
//! Everything here runs on the single processor with the list state
//! locked. Owner hooks may enqueue more requests; they land in the
//! mutation queue and are drained before the batch ends.

use std::fmt;
use std::sync::Arc;

use smallvec::smallvec;
use tracing::{debug, error, trace};

use crate::containers::{CapacityPolicy, EffectContainer};
use crate::effects::{EffectPhase, EffectRef};
use crate::notify::OwnerMessage;
use crate::owner::{EffectOwner, OwnerKind, Scheduler};
use crate::stack::{StackGroups, StackList};

/// Processor-owned state of one list.
#[derive(Debug, Default)]
pub(super) struct ListState {
    pub buffs: EffectContainer,
    pub debuffs: EffectContainer,
    pub groups: StackGroups,
    /// Owner messages produced during the batch, sent after it.
    pub outbox: Vec<OwnerMessage>,
}

impl ListState {
    pub fn holds(&self, effect: &EffectRef) -> bool {
        if effect.is_debuff() {
            self.debuffs.contains(effect)
        } else {
            self.buffs.contains(effect)
        }
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
        self.debuffs.clear();
        self.groups.clear();
        self.outbox.clear();
    }
}

/// Why an effect left (or never entered) its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Departure {
    /// Explicit removal request.
    Removed,
    /// Replaced by an effect of the same template.
    Replaced,
    /// Pushed out by a category cap.
    Evicted,
    /// Outranked in its stack group with effect canceling on.
    Cancelled,
    /// `on_start` refused the effect.
    StartFailed,
    /// Never admitted.
    Rejected,
}

impl Departure {
    fn notifies(self) -> bool {
        !matches!(self, Self::StartFailed | Self::Rejected)
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Removed => "removed",
            Self::Replaced => "replaced",
            Self::Evicted => "evicted",
            Self::Cancelled => "cancelled",
            Self::StartFailed => "start failed",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A batch in progress.
pub(super) struct Batch<'a> {
    pub state: &'a mut ListState,
    pub owner: &'a dyn EffectOwner,
    pub scheduler: &'a dyn Scheduler,
    pub canceling: bool,
    pub dances_max: usize,
}

impl Batch<'_> {
    /// Apply one removal request.
    pub fn remove(&mut self, effect: &EffectRef) {
        match effect.phase() {
            EffectPhase::Pending => {
                // Removed before its addition was drained: it will be skipped.
                if effect.begin_exit() {
                    effect.stop_timer(self.scheduler);
                    trace!(effect = %effect.id(), "removed before admission");
                }
            }
            EffectPhase::Active => self.detach(effect, Departure::Removed),
            EffectPhase::Exited => {}
        }
    }

    /// Apply one addition request.
    pub fn add(&mut self, effect: EffectRef) {
        if !effect.mark_active() {
            trace!(effect = %effect.id(), "skipping addition of an exited or admitted effect");
            return;
        }

        if effect.is_debuff() {
            if !self.replace_debuff(&effect) {
                return;
            }
            self.state.debuffs.push_back(Arc::clone(&effect));
        } else {
            if !self.make_room(&effect) {
                return;
            }
            self.state.buffs.insert_ordered(Arc::clone(&effect));
        }
        trace!(effect = %effect.id(), skill = %effect.skill().id, "admitted");

        if effect.stack_groups().is_empty() {
            if !self.activate(&effect) {
                self.detach(&effect, Departure::StartFailed);
            }
            return;
        }

        let mut newcomer_cancelled = false;
        for dropped in self.state.groups.insert(&effect, self.canceling) {
            if dropped.id() == effect.id() {
                newcomer_cancelled = true;
            } else {
                self.detach(&dropped, Departure::Cancelled);
            }
        }
        if newcomer_cancelled {
            self.detach(&effect, Departure::Rejected);
            return;
        }

        self.promote(smallvec![effect]);
    }

    /// Same-template debuffs: the one with more time left survives; ties
    /// keep the newcomer. Returns whether the newcomer goes in.
    fn replace_debuff(&mut self, effect: &EffectRef) -> bool {
        for existing in self.state.debuffs.same_signature(effect) {
            if effect.remaining() < existing.remaining() {
                self.reject(effect, "weaker than an identical debuff");
                return false;
            }
            self.detach(&existing, Departure::Replaced);
        }
        true
    }

    /// Same-template buffs are replaced, then category caps are enforced.
    /// Returns whether the newcomer goes in.
    fn make_room(&mut self, effect: &EffectRef) -> bool {
        for existing in self.state.buffs.same_signature(effect) {
            self.detach(&existing, Departure::Replaced);
        }

        let policy = CapacityPolicy::new(self.dances_max, self.owner.max_buff_count());
        match policy.evictions_for(&self.state.buffs, effect) {
            Ok(evictions) => {
                for evicted in evictions {
                    self.detach(&evicted, Departure::Evicted);
                }
                true
            }
            Err(rejection) => {
                self.reject(effect, &rejection.to_string());
                false
            }
        }
    }

    /// Evict the earliest slot-occupying buffs while more are held than the
    /// owner's current slot count. Each eviction may lower that count again.
    pub fn enforce_buff_cap(&mut self) {
        loop {
            let policy = CapacityPolicy::new(self.dances_max, self.owner.max_buff_count());
            let overflow = policy.overflow(&self.state.buffs);
            if overflow.is_empty() {
                return;
            }
            debug!(over = overflow.len(), cap = policy.buffs_max, "buff slots shrank");
            for evicted in overflow {
                self.detach(&evicted, Departure::Evicted);
            }
        }
    }

    fn reject(&self, effect: &EffectRef, reason: &str) {
        effect.begin_exit();
        effect.stop_timer(self.scheduler);
        debug!(effect = %effect.id(), skill = %effect.skill().id, reason, "effect rejected");
    }

    /// Take an admitted effect out of its container and stack groups.
    /// Idempotent: only the first call for an effect does anything.
    pub fn detach(&mut self, effect: &EffectRef, departure: Departure) {
        if !effect.begin_exit() {
            return;
        }
        effect.stop_timer(self.scheduler);

        let container = if effect.is_debuff() {
            &mut self.state.debuffs
        } else {
            &mut self.state.buffs
        };
        let was_listed = container.remove(effect).is_some();

        self.deactivate(effect);
        if !effect.stack_groups().is_empty() {
            let candidates = self.state.groups.withdraw(effect);
            self.promote(candidates);
        }

        if was_listed
            && departure.notifies()
            && effect.show_icon()
            && self.owner.kind() == OwnerKind::Player
        {
            self.state.outbox.push(OwnerMessage::removal_of(effect));
        }
        debug!(effect = %effect.id(), skill = %effect.skill().id, %departure, "effect detached");
    }

    /// Try to put each candidate in use. A candidate may lead only when it
    /// ranks first in every group it belongs to; in-use rivals in those
    /// groups are parked first.
    fn promote(&mut self, mut pending: StackList) {
        while let Some(candidate) = pending.pop() {
            if candidate.is_exited() || !self.state.holds(&candidate) {
                error!(
                    effect = %candidate.id(),
                    "stack group references an effect missing from both containers"
                );
                pending.extend(self.state.groups.withdraw(&candidate));
                continue;
            }
            if candidate.in_use() || !self.state.groups.is_first_in_all(&candidate) {
                continue;
            }

            for rival in self.state.groups.rivals_in_use(&candidate) {
                self.deactivate(&rival);
                debug!(effect = %rival.id(), leader = %candidate.id(), "stacked out");
            }
            if self.activate(&candidate) {
                debug!(effect = %candidate.id(), "leads its stack groups");
            } else {
                self.detach(&candidate, Departure::StartFailed);
            }
        }
    }

    /// Start the effect and install its stat functions.
    fn activate(&self, effect: &EffectRef) -> bool {
        if effect.in_use() {
            return true;
        }
        if !effect.kind().on_start(effect, self.owner) {
            return false;
        }
        effect.set_in_use(true);
        self.owner.add_stat_funcs(effect);
        true
    }

    /// Stop the effect and withdraw its stat functions.
    fn deactivate(&self, effect: &EffectRef) {
        if effect.set_in_use(false) {
            effect.kind().on_exit(effect, self.owner);
            self.owner.remove_stat_funcs(effect);
        }
    }
}
