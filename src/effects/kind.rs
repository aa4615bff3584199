//! Effect behavior variants.
//!
//! Each effect kind answers three lifecycle hooks:
//! - `on_start`: the effect becomes in-use; `false` drops the effect
//! - `on_exit`: the effect stops being in-use (parked, evicted or removed)
//! - `on_action_time`: a timer tick while in use; `false` ends the effect

use serde::{Deserialize, Serialize};

use crate::owner::EffectOwner;

use super::Effect;

/// Behavior attached to an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Plain stat buff.
    Buff,
    /// Plain stat debuff.
    Debuff,
    /// Buff that roots the owner in place while it is active.
    ImmobileBuff,
    /// Forces the effector to fight the owner while active.
    Faceoff,
    /// Applies an HP delta every tick (regeneration or damage over time).
    Periodic { hp_per_tick: i64 },
    /// Toggle that drains MP every tick until switched off or exhausted.
    Toggle { mp_per_tick: i64 },
}

impl EffectKind {
    /// Name used by `first_effect_by_kind_name` lookups.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Buff => "Buff",
            Self::Debuff => "Debuff",
            Self::ImmobileBuff => "ImmobileBuff",
            Self::Faceoff => "Faceoff",
            Self::Periodic { .. } => "Periodic",
            Self::Toggle { .. } => "Toggle",
        }
    }

    pub fn on_start(self, effect: &Effect, owner: &dyn EffectOwner) -> bool {
        match self {
            Self::ImmobileBuff => {
                owner.set_immobilized(true);
                true
            }
            Self::Faceoff => match effect.effector() {
                Some(effector) => {
                    owner.set_faceoff_target(effector, Some(owner.id()));
                    true
                }
                None => false,
            },
            _ => true,
        }
    }

    pub fn on_exit(self, effect: &Effect, owner: &dyn EffectOwner) {
        match self {
            Self::ImmobileBuff => owner.set_immobilized(false),
            Self::Faceoff => {
                if let Some(effector) = effect.effector() {
                    owner.set_faceoff_target(effector, None);
                }
            }
            _ => {}
        }
    }

    pub fn on_action_time(self, _effect: &Effect, owner: &dyn EffectOwner) -> bool {
        match self {
            Self::Periodic { hp_per_tick } => owner.apply_hp_delta(hp_per_tick),
            Self::Toggle { mp_per_tick } => owner.consume_mp(mp_per_tick),
            Self::ImmobileBuff | Self::Faceoff => false,
            Self::Buff | Self::Debuff => true,
        }
    }
}
