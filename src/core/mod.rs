//! Core engine types: ids, configuration, errors, RNG.
//!
//! This module holds the building blocks every other module depends on.
//! None of it knows about containers or queues.

pub mod ids;
pub mod config;
pub mod error;
pub mod rng;

pub use ids::{CharId, EffectId, EffectIdAllocator, MatchId, SkillId, StackGroupKey};
pub use config::{EffectListConfig, MAX_ACTIVATIONS};
pub use error::{EffectListError, Result};
pub use rng::GameRng;
