//! The owner-bound effect list.
//!
//! `EffectList` ties the pieces together. Requests go into the
//! `MutationQueue`; the caller that wins the processor flag drains it
//! (removals first), updating the containers and stack groups under the
//! single-processor invariant. When the queue is empty the processor
//! recomputes the flag aggregate, publishes a new snapshot for readers and
//! sends one consolidated set of notifications.
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Weak};
//! use std::time::Duration;
//! use abnormal_engine::core::{CharId, EffectId, EffectListConfig, SkillId};
//! use abnormal_engine::effects::{Effect, SkillInfo};
//! use abnormal_engine::list::EffectList;
//! use abnormal_engine::notify::NullSink;
//! use abnormal_engine::owner::{EffectOwner, OwnerKind, TickScheduler};
//!
//! struct Dummy;
//! impl EffectOwner for Dummy {
//!     fn id(&self) -> CharId { CharId::new(1) }
//!     fn kind(&self) -> OwnerKind { OwnerKind::Npc }
//!     fn add_stat_funcs(&self, _: &Effect) {}
//!     fn remove_stat_funcs(&self, _: &Effect) {}
//!     fn max_buff_count(&self) -> usize { 20 }
//! }
//!
//! let owner = Arc::new(Dummy);
//! let weak: Weak<dyn EffectOwner> = Arc::downgrade(&owner) as Weak<dyn EffectOwner>;
//! let scheduler = Arc::new(TickScheduler::new());
//! let list = EffectList::new(weak, Arc::new(NullSink), scheduler.clone(), EffectListConfig::default())
//!     .unwrap();
//!
//! let skill = Arc::new(SkillInfo::buff(SkillId::new(1040), 3));
//! let shield = Effect::builder(EffectId(1), skill).duration(Duration::from_secs(10)).build();
//! list.apply(shield.clone());
//! assert!(shield.in_use());
//! assert_eq!(list.buff_count(), 1);
//!
//! scheduler.advance(Duration::from_secs(10));
//! assert!(shield.is_exited());
//! assert_eq!(list.buff_count(), 0);
//! ```

mod batch;
mod query;
mod snapshot;
mod stop;
mod timer;

pub use snapshot::Snapshot;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::core::{EffectListConfig, GameRng, Result};
use crate::effects::{EffectPhase, EffectRef};
use crate::flags::{EffectFlags, FlagAggregator, PredicateFlags};
use crate::notify::{Notifier, StatusSink};
use crate::owner::{EffectOwner, Scheduler};
use crate::queue::{Mutation, MutationQueue, ProcessorGuard};

use batch::{Batch, ListState};

struct Inner {
    owner: Weak<dyn EffectOwner>,
    sink: Arc<dyn StatusSink>,
    scheduler: Arc<dyn Scheduler>,
    config: EffectListConfig,
    queue: MutationQueue,
    state: Mutex<ListState>,
    snapshot: RwLock<Arc<Snapshot>>,
    flags: FlagAggregator,
    rng: Mutex<GameRng>,
    /// Skip the owner's own status update on the next notification.
    party_only: AtomicBool,
}

/// Buff/debuff list of one character.
///
/// Cheap to clone: all clones share the same list. Every mutating call is
/// non-blocking for the caller unless it ends up as the processor, in which
/// case it runs the batch inline before returning.
#[derive(Clone)]
pub struct EffectList {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for EffectList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (removals, additions) = self.inner.queue.pending();
        let snapshot = self.snapshot();
        f.debug_struct("EffectList")
            .field("buffs", &snapshot.buffs().len())
            .field("debuffs", &snapshot.debuffs().len())
            .field("mask", &self.inner.flags.current())
            .field("queued_removals", &removals)
            .field("queued_additions", &additions)
            .finish()
    }
}

impl EffectList {
    /// Create the list for `owner`.
    ///
    /// The list holds the owner weakly: the owner is expected to hold the
    /// list. Fails only on an invalid configuration.
    pub fn new(
        owner: Weak<dyn EffectOwner>,
        sink: Arc<dyn StatusSink>,
        scheduler: Arc<dyn Scheduler>,
        config: EffectListConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rng = GameRng::from_seed_or_entropy(config.rng_seed);
        Ok(Self {
            inner: Arc::new(Inner {
                owner,
                sink,
                scheduler,
                config,
                queue: MutationQueue::new(),
                state: Mutex::new(ListState::default()),
                snapshot: RwLock::new(Arc::new(Snapshot::default())),
                flags: FlagAggregator::new(),
                rng: Mutex::new(rng),
                party_only: AtomicBool::new(false),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EffectListConfig {
        &self.inner.config
    }

    /// Start `effect`'s timer and queue its admission. The timer starts
    /// once per effect however often it is applied.
    pub fn apply(&self, effect: EffectRef) {
        if effect.phase() == EffectPhase::Pending && effect.arm_timer() {
            self.inner.start_timer(&effect);
        }
        self.queue_effect(effect, Mutation::Add);
    }

    /// Queue an add or remove request and process the queue if nobody else
    /// is. Requests for effects that already exited are no-ops.
    pub fn queue_effect(&self, effect: EffectRef, mutation: Mutation) {
        trace!(effect = %effect.id(), ?mutation, "queued");
        self.inner.queue.push(effect, mutation);
        self.inner.run();
    }

    /// Stop `effect`'s timer and queue its removal.
    pub fn exit(&self, effect: &EffectRef) {
        self.inner.exit(effect);
    }

    /// Run a batch with no mutation so observers get fresh icons.
    ///
    /// With `party_only` the owner's own status update is skipped unless the
    /// batch ends up processing a request.
    pub fn update_effect_icons(&self, party_only: bool) {
        if party_only {
            self.inner.party_only.store(true, Ordering::Release);
        }
        self.inner.queue.request_refresh();
        self.inner.run();
    }

    /// Whether any bit of `flag` is set on an in-use effect. Lock-free.
    #[must_use]
    pub fn is_affected(&self, flag: EffectFlags) -> bool {
        self.inner.flags.is_affected(flag)
    }

    /// Aggregate mask as of the last batch.
    #[must_use]
    pub fn effect_flags(&self) -> EffectFlags {
        self.inner.flags.current()
    }

    /// Removal-trigger shortcuts as of the last batch.
    #[must_use]
    pub fn predicates(&self) -> PredicateFlags {
        self.inner.flags.predicates()
    }

    /// Someone is draining the queue right now.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.inner.queue.is_processing()
    }

    /// Drop everything: pending requests, admitted effects and their timers,
    /// stack groups, the aggregate and the predicates. For characters
    /// leaving the world.
    ///
    /// Must not be called from inside an effect hook.
    pub fn clear(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        for effect in inner.queue.drain() {
            effect.begin_exit();
            effect.stop_timer(inner.scheduler.as_ref());
        }
        for effect in state.buffs.iter().chain(state.debuffs.iter()) {
            effect.begin_exit();
            effect.stop_timer(inner.scheduler.as_ref());
        }
        state.clear();

        inner.flags.reset();
        *inner.snapshot.write() = Arc::new(Snapshot::default());
        debug!("effect list cleared");
    }
}

impl Inner {
    fn exit(&self, effect: &EffectRef) {
        effect.stop_timer(self.scheduler.as_ref());
        trace!(effect = %effect.id(), "exit requested");
        self.queue.push(Arc::clone(effect), Mutation::Remove);
        self.run();
    }

    /// Drain the queue if nobody else is. Re-checks after releasing the
    /// processor flag so a request pushed during the release is not left
    /// behind.
    fn run(&self) {
        loop {
            let Some(guard) = self.queue.try_acquire() else {
                return;
            };
            self.process(&guard);
            drop(guard);

            if self.queue.is_empty() {
                return;
            }
        }
    }

    fn process(&self, guard: &ProcessorGuard<'_>) {
        let refresh = guard.take_refresh();

        let Some(owner) = self.owner.upgrade() else {
            let dropped = guard.drain();
            for effect in &dropped {
                effect.begin_exit();
                effect.stop_timer(self.scheduler.as_ref());
            }
            warn!(dropped = dropped.len(), "effect list owner detached, discarding requests");
            return;
        };

        let mut state = self.state.lock();
        let (mut removals, mut additions) = (0usize, 0usize);
        {
            let mut batch = Batch {
                state: &mut state,
                owner: owner.as_ref(),
                scheduler: self.scheduler.as_ref(),
                canceling: self.config.effect_canceling,
                dances_max: self.config.dances_max_amount,
            };
            loop {
                while let Some(effect) = guard.pop_removal() {
                    batch.remove(&effect);
                    removals += 1;
                }
                if let Some(effect) = guard.pop_addition() {
                    batch.add(effect);
                    additions += 1;
                }
                if !guard.has_requests() {
                    batch.enforce_buff_cap();
                    if !guard.has_requests() {
                        break;
                    }
                }
            }
        }

        let party_only = if removals + additions > 0 {
            self.party_only.store(false, Ordering::Release);
            false
        } else {
            self.party_only.swap(false, Ordering::AcqRel)
        };

        let mask = self
            .flags
            .recompute(state.buffs.iter().chain(state.debuffs.iter()));
        *self.snapshot.write() = Arc::new(Snapshot::new(
            state.buffs.snapshot(),
            state.debuffs.snapshot(),
        ));
        let (dispatch, predicates) =
            Notifier::build(owner.as_ref(), &state.buffs, &state.debuffs, party_only);
        self.flags.store_predicates(predicates);
        let outbox = std::mem::take(&mut state.outbox);
        drop(state);

        debug!(owner = %owner.id(), removals, additions, refresh, mask = mask.bits(), "batch settled");

        for message in outbox {
            if let Err(err) = self.sink.send_to_owner(owner.id(), message) {
                warn!(owner = %owner.id(), error = %err, "owner message delivery failed");
            }
        }
        dispatch.deliver(self.sink.as_ref());
    }
}
