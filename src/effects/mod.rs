//! Effect entities and the template data they carry.
//!
//! - `Effect` / `EffectRef`: one active buff or debuff, shared by handle
//! - `SkillInfo`: the skill template fields the effect list consults
//! - `AbnormalType`: visual/semantic tag
//! - `EffectKind`: lifecycle hooks (`on_start`, `on_exit`, `on_action_time`)
//! - `StatFunc` / `StatRegistry`: numeric modifiers and their owner-side aggregate

mod abnormal;
mod effect;
mod kind;
mod skill;
mod stat;

pub use abnormal::AbnormalType;
pub use effect::{Effect, EffectBuilder, EffectPhase, EffectRef};
pub use kind::EffectKind;
pub use skill::{DamageRemoval, SkillCategory, SkillInfo, SkillType, TargetType};
pub use stat::{Stat, StatFunc, StatOp, StatRegistry};
