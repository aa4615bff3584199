//! The character that holds an effect list, and the services it is
//! wired to.
//!
//! The effect list never reaches into the world directly. Everything it
//! needs from its owner goes through `EffectOwner`; timers go through
//! `Scheduler`.

mod timer;

pub use timer::{Scheduler, TickScheduler, TimerHandle, TimerTask};

use serde::{Deserialize, Serialize};

use crate::core::{CharId, MatchId};
use crate::effects::Effect;

/// What kind of character owns the list. Controls which notifications are
/// built after a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    Player,
    /// A controlled companion; its party icons go to its master.
    Summon,
    Npc,
}

/// Where a summon's master stands with respect to a party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterStatus {
    InParty,
    Solo,
}

/// Contract between the effect list and the character holding it.
///
/// Called only from the batch processor and from timer callbacks, never
/// concurrently for the same owner from two batches. Implementations use
/// interior mutability.
pub trait EffectOwner: Send + Sync {
    fn id(&self) -> CharId;

    fn kind(&self) -> OwnerKind;

    /// Install the effect's stat functions into the owner's aggregate.
    fn add_stat_funcs(&self, effect: &Effect);

    /// Withdraw the effect's stat functions from the owner's aggregate.
    fn remove_stat_funcs(&self, effect: &Effect);

    /// Current buff slot count. May change as buffs come and go.
    fn max_buff_count(&self) -> usize;

    fn is_in_party(&self) -> bool {
        false
    }

    /// For summons: the master's party status, `None` without a master.
    fn master_status(&self) -> Option<MasterStatus> {
        None
    }

    /// The observed match the owner is fighting in, if its battle is live.
    fn observed_match(&self) -> Option<MatchId> {
        None
    }

    // === Creature hooks used by effect kinds ===

    fn set_immobilized(&self, _immobilized: bool) {}

    /// Point `effector`'s forced target at `target` (or clear it).
    fn set_faceoff_target(&self, _effector: CharId, _target: Option<CharId>) {}

    /// Apply an HP change. `false` stops the periodic effect.
    fn apply_hp_delta(&self, _delta: i64) -> bool {
        true
    }

    /// Pay a toggle's upkeep. `false` (not enough MP) switches it off.
    fn consume_mp(&self, _amount: i64) -> bool {
        true
    }
}
