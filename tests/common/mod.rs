//! Shared fixtures: a recording owner, a recording sink and a harness that
//! wires them to an `EffectList` on a manual clock.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use abnormal_engine::core::{
    CharId, EffectId, EffectIdAllocator, EffectListConfig, EffectListError, MatchId, Result, SkillId,
};
use abnormal_engine::effects::{Effect, EffectBuilder, EffectRef, SkillInfo, Stat, StatRegistry};
use abnormal_engine::list::EffectList;
use abnormal_engine::notify::{
    OwnerMessage, PartyRoute, PartyStatus, SpectatorStatus, StatusSink, StatusUpdate,
};
use abnormal_engine::owner::{EffectOwner, MasterStatus, OwnerKind, TickScheduler};

// ============================================================================
// Owner
// ============================================================================

/// Stat function traffic the owner saw, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerEvent {
    Added(EffectId),
    Removed(EffectId),
}

type Hook = Box<dyn FnOnce(&Effect) + Send>;

/// Owner that records hook calls and keeps a real stat registry.
pub struct TestOwner {
    id: CharId,
    kind: OwnerKind,
    base_buff_slots: usize,
    pub in_party: AtomicBool,
    pub master: Mutex<Option<MasterStatus>>,
    pub game: Mutex<Option<MatchId>>,
    pub stats: Mutex<StatRegistry>,
    pub events: Mutex<Vec<OwnerEvent>>,
    pub immobilized: AtomicBool,
    pub hp: AtomicI64,
    pub mp: AtomicI64,
    /// Runs once, inside the next `add_stat_funcs` call.
    on_next_add: Mutex<Option<Hook>>,
}

impl TestOwner {
    pub fn new(kind: OwnerKind, base_buff_slots: usize) -> Self {
        Self {
            id: CharId::new(100),
            kind,
            base_buff_slots,
            in_party: AtomicBool::new(false),
            master: Mutex::new(None),
            game: Mutex::new(None),
            stats: Mutex::new(StatRegistry::new()),
            events: Mutex::new(Vec::new()),
            immobilized: AtomicBool::new(false),
            hp: AtomicI64::new(1000),
            mp: AtomicI64::new(1000),
            on_next_add: Mutex::new(None),
        }
    }

    pub fn player() -> Self {
        Self::new(OwnerKind::Player, 20)
    }

    /// Run `hook` while the next effect's stat functions are installed.
    pub fn on_next_add(&self, hook: impl FnOnce(&Effect) + Send + 'static) {
        *self.on_next_add.lock() = Some(Box::new(hook));
    }

    pub fn events(&self) -> Vec<OwnerEvent> {
        self.events.lock().clone()
    }

    pub fn has_stats_of(&self, effect: &Effect) -> bool {
        self.stats.lock().contains(effect.id())
    }
}

impl EffectOwner for TestOwner {
    fn id(&self) -> CharId {
        self.id
    }

    fn kind(&self) -> OwnerKind {
        self.kind
    }

    fn add_stat_funcs(&self, effect: &Effect) {
        self.events.lock().push(OwnerEvent::Added(effect.id()));
        self.stats.lock().install(effect);
        let hook = self.on_next_add.lock().take();
        if let Some(hook) = hook {
            hook(effect);
        }
    }

    fn remove_stat_funcs(&self, effect: &Effect) {
        self.events.lock().push(OwnerEvent::Removed(effect.id()));
        self.stats.lock().withdraw(effect.id());
    }

    fn max_buff_count(&self) -> usize {
        let slots = self.stats.lock().calc(Stat::MaxBuffSlots, self.base_buff_slots as f64);
        slots.max(0.0) as usize
    }

    fn is_in_party(&self) -> bool {
        self.in_party.load(Ordering::SeqCst)
    }

    fn master_status(&self) -> Option<MasterStatus> {
        *self.master.lock()
    }

    fn observed_match(&self) -> Option<MatchId> {
        *self.game.lock()
    }

    fn set_immobilized(&self, immobilized: bool) {
        self.immobilized.store(immobilized, Ordering::SeqCst);
    }

    fn apply_hp_delta(&self, delta: i64) -> bool {
        self.hp.fetch_add(delta, Ordering::SeqCst);
        true
    }

    fn consume_mp(&self, amount: i64) -> bool {
        let mp = self.mp.load(Ordering::SeqCst);
        if mp < amount {
            return false;
        }
        self.mp.store(mp - amount, Ordering::SeqCst);
        true
    }
}

// ============================================================================
// Sink
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Delivery {
    Visuals,
    Owner(OwnerMessage),
    Party(PartyRoute, PartyStatus),
    Spectators(MatchId, SpectatorStatus),
}

/// Sink that records every delivery. Optionally fails owner deliveries.
#[derive(Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<Delivery>>,
    pub fail_owner: AtomicBool,
}

impl RecordingSink {
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    pub fn take(&self) -> Vec<Delivery> {
        std::mem::take(&mut *self.deliveries.lock())
    }

    pub fn statuses(&self) -> Vec<StatusUpdate> {
        self.deliveries
            .lock()
            .iter()
            .filter_map(|d| match d {
                Delivery::Owner(OwnerMessage::Status(status)) => Some(status.clone()),
                _ => None,
            })
            .collect()
    }

    /// Owner messages other than status updates.
    pub fn messages(&self) -> Vec<OwnerMessage> {
        self.deliveries
            .lock()
            .iter()
            .filter_map(|d| match d {
                Delivery::Owner(OwnerMessage::Status(_)) => None,
                Delivery::Owner(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn visuals(&self) -> usize {
        self.deliveries
            .lock()
            .iter()
            .filter(|d| matches!(d, Delivery::Visuals))
            .count()
    }
}

impl StatusSink for RecordingSink {
    fn send_to_owner(&self, _owner: CharId, message: OwnerMessage) -> Result<()> {
        if self.fail_owner.load(Ordering::SeqCst) {
            return Err(EffectListError::delivery("owner", "client gone"));
        }
        self.deliveries.lock().push(Delivery::Owner(message));
        Ok(())
    }

    fn send_to_party(&self, _subject: CharId, route: PartyRoute, status: PartyStatus) -> Result<()> {
        self.deliveries.lock().push(Delivery::Party(route, status));
        Ok(())
    }

    fn send_to_spectators(&self, game: MatchId, status: SpectatorStatus) -> Result<()> {
        self.deliveries.lock().push(Delivery::Spectators(game, status));
        Ok(())
    }

    fn broadcast_abnormal_visuals(&self, _owner: CharId) -> Result<()> {
        self.deliveries.lock().push(Delivery::Visuals);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub owner: Arc<TestOwner>,
    pub sink: Arc<RecordingSink>,
    pub scheduler: Arc<TickScheduler>,
    pub list: EffectList,
    ids: EffectIdAllocator,
}

/// Routes engine logs to the test output. Filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl Harness {
    pub fn new(owner: TestOwner, config: EffectListConfig) -> Self {
        init_logging();
        let owner = Arc::new(owner);
        let sink = Arc::new(RecordingSink::default());
        let scheduler = Arc::new(TickScheduler::new());
        let weak: Weak<dyn EffectOwner> = Arc::downgrade(&owner) as Weak<dyn EffectOwner>;
        let list = EffectList::new(weak, sink.clone(), scheduler.clone(), config)
            .expect("valid config");
        Self {
            owner,
            sink,
            scheduler,
            list,
            ids: EffectIdAllocator::new(),
        }
    }

    /// Player owner with 20 buff slots and default config.
    pub fn player() -> Self {
        Self::new(TestOwner::player(), EffectListConfig::default())
    }

    /// Player owner with effect canceling switched off.
    pub fn parking() -> Self {
        Self::new(
            TestOwner::player(),
            EffectListConfig::default().with_effect_canceling(false),
        )
    }

    /// Start building an effect for `skill` with a fresh id.
    pub fn effect(&self, skill: SkillInfo) -> EffectBuilder {
        Effect::builder(self.ids.next(), Arc::new(skill))
    }

    /// A plain buff of skill `id`, lasting a minute.
    pub fn buff(&self, id: u32) -> EffectRef {
        self.effect(SkillInfo::buff(SkillId::new(id), 1))
            .duration(Duration::from_secs(60))
            .build()
    }

    /// A buff in stack group `group` at `level`.
    pub fn grouped(&self, id: u32, group: &str, level: i32) -> EffectRef {
        self.effect(SkillInfo::buff(SkillId::new(id), 1))
            .stack_group(group)
            .stack_level(level)
            .duration(Duration::from_secs(60))
            .build()
    }

    pub fn advance(&self, secs: u64) {
        self.scheduler.advance(Duration::from_secs(secs));
    }

    pub fn buff_ids(&self) -> Vec<EffectId> {
        self.list.all_buffs().iter().map(|e| e.id()).collect()
    }
}
