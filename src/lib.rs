//! # abnormal-engine
//!
//! Concurrent buff/debuff ("abnormal status") list engine for a game world
//! server. One `EffectList` per character.
//!
//! ## Design Principles
//!
//! 1. **Single Processor Per Owner**: Any thread may queue add/remove
//!    requests without blocking. One caller at a time wins a test-and-set
//!    flag and drains the queue, removals before additions.
//!
//! 2. **One Update Per Batch**: Flags, snapshots and notifications are
//!    produced once, after the queue is empty. Observers never see a
//!    half-applied batch.
//!
//! 3. **Injected Collaborators**: Owner hooks, timers and message delivery
//!    come in through `EffectOwner`, `Scheduler` and `StatusSink`.
//!
//! ## Architecture
//!
//! - **Persistent Containers**: Buffs and debuffs live in `im-rs` vectors.
//!   Readers take an O(1) snapshot instead of locking.
//!
//! - **Stack Groups**: Effects sharing a group key compete; only a member
//!   ranking first in every group it belongs to contributes its stats.
//!
//! - **Atomic Aggregates**: The capability mask and the removal-trigger
//!   predicates are single atomic words, readable from the combat hot path.
//!
//! ## Modules
//!
//! - `core`: ids, configuration, errors, RNG
//! - `effects`: the effect entity, skill data, kinds, stat functions
//! - `flags`: capability bitmask and its aggregate
//! - `stack`: stack-group resolution
//! - `containers`: ordered buff/debuff lists and capacity policy
//! - `queue`: the mutation queue
//! - `notify`: post-batch notifications
//! - `owner`: owner and scheduler contracts
//! - `list`: `EffectList`, tying everything together

pub mod core;
pub mod effects;
pub mod flags;
pub mod stack;
pub mod containers;
pub mod queue;
pub mod notify;
pub mod owner;
pub mod list;

// Re-export commonly used types
pub use crate::core::{
    CharId, EffectId, EffectIdAllocator, MatchId, SkillId, StackGroupKey,
    EffectListConfig, EffectListError, Result, GameRng, MAX_ACTIVATIONS,
};

pub use crate::effects::{
    AbnormalType, Effect, EffectBuilder, EffectKind, EffectPhase, EffectRef,
    SkillCategory, SkillInfo, SkillType, TargetType,
    Stat, StatFunc, StatOp, StatRegistry,
};

pub use crate::flags::{EffectFlags, FlagAggregator, PredicateFlags};

pub use crate::stack::StackGroups;

pub use crate::containers::{CapacityPolicy, EffectContainer, Rejection};

pub use crate::queue::{Mutation, MutationQueue};

pub use crate::notify::{
    IconEntry, NullSink, OwnerMessage, PartyRoute, PartyStatus,
    SpectatorStatus, StatusSink, StatusUpdate,
};

pub use crate::owner::{EffectOwner, MasterStatus, OwnerKind, Scheduler, TickScheduler};

pub use crate::list::{EffectList, Snapshot};
