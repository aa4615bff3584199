//! Stat-modifying functions and the owner-side registry that aggregates them.
//!
//! Effects carry a list of `StatFunc`s. While an effect is in use its
//! functions sit in the owner's `StatRegistry`; the batch processor is the
//! only writer, through `EffectOwner::add_stat_funcs` / `remove_stat_funcs`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::EffectId;

use super::Effect;

/// Character statistic touched by an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    MaxHp,
    MaxMp,
    PAtk,
    MAtk,
    PDef,
    MDef,
    AtkSpeed,
    CastSpeed,
    RunSpeed,
    Accuracy,
    Evasion,
    CritRate,
    /// Extra buff slots on top of the owner's base max-buff-count.
    MaxBuffSlots,
}

/// How a function combines with the base value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatOp {
    Set,
    Add,
    Mul,
}

/// A single numeric modifier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatFunc {
    pub stat: Stat,
    pub op: StatOp,
    pub value: f64,
}

impl StatFunc {
    pub fn add(stat: Stat, value: f64) -> Self {
        Self { stat, op: StatOp::Add, value }
    }

    pub fn mul(stat: Stat, value: f64) -> Self {
        Self { stat, op: StatOp::Mul, value }
    }

    pub fn set(stat: Stat, value: f64) -> Self {
        Self { stat, op: StatOp::Set, value }
    }
}

/// Stat functions installed on one owner, keyed by the effect that owns them.
///
/// ```
/// use std::sync::Arc;
/// use abnormal_engine::core::{EffectId, SkillId};
/// use abnormal_engine::effects::{Effect, SkillInfo, Stat, StatFunc, StatRegistry};
///
/// let skill = Arc::new(SkillInfo::buff(SkillId::new(1068), 3));
/// let might = Effect::builder(EffectId(1), skill)
///     .stat(StatFunc::mul(Stat::PAtk, 1.15))
///     .build();
///
/// let mut registry = StatRegistry::new();
/// registry.install(&might);
/// assert!((registry.calc(Stat::PAtk, 100.0) - 115.0).abs() < 1e-9);
///
/// registry.withdraw(might.id());
/// assert_eq!(registry.calc(Stat::PAtk, 100.0), 100.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatRegistry {
    funcs: FxHashMap<EffectId, SmallVec<[StatFunc; 4]>>,
}

impl StatRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an effect's functions, replacing any already installed for it.
    pub fn install(&mut self, effect: &Effect) {
        if effect.stat_funcs().is_empty() {
            return;
        }
        self.funcs
            .insert(effect.id(), effect.stat_funcs().iter().copied().collect());
    }

    /// Withdraw an effect's functions. Returns `false` if none were installed.
    pub fn withdraw(&mut self, effect: EffectId) -> bool {
        self.funcs.remove(&effect).is_some()
    }

    /// Whether the effect currently contributes functions.
    #[must_use]
    pub fn contains(&self, effect: EffectId) -> bool {
        self.funcs.contains_key(&effect)
    }

    /// Number of contributing effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Final value of `stat`: `(set.unwrap_or(base) + Σadd) × Πmul`.
    ///
    /// When several effects set the same stat, the one with the highest
    /// effect id (most recently created) wins.
    #[must_use]
    pub fn calc(&self, stat: Stat, base: f64) -> f64 {
        let mut set: Option<(EffectId, f64)> = None;
        let mut add = 0.0;
        let mut mul = 1.0;

        for (id, funcs) in &self.funcs {
            for func in funcs.iter().filter(|f| f.stat == stat) {
                match func.op {
                    StatOp::Set => {
                        if set.is_none_or(|(winner, _)| *id > winner) {
                            set = Some((*id, func.value));
                        }
                    }
                    StatOp::Add => add += func.value,
                    StatOp::Mul => mul *= func.value,
                }
            }
        }

        (set.map_or(base, |(_, v)| v) + add) * mul
    }
}
