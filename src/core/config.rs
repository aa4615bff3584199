//! Effect list configuration.
//!
//! Servers load this once at startup (usually from the `[effects]` table
//! of their TOML config) and hand a copy to every effect list they build.

use serde::{Deserialize, Serialize};

use super::error::{EffectListError, Result};

/// Fixed cap on simultaneously active activation-type effects.
pub const MAX_ACTIVATIONS: usize = 24;

/// Tunables for effect admission.
///
/// ```
/// use abnormal_engine::core::EffectListConfig;
///
/// let config = EffectListConfig::from_toml_str(
///     "dances_max_amount = 16\neffect_canceling = false\n",
/// ).unwrap();
/// assert_eq!(config.dances_max_amount, 16);
/// assert!(!config.effect_canceling);
/// assert_eq!(config.rng_seed, None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectListConfig {
    /// Maximum number of in-use dances/songs.
    pub dances_max_amount: usize,

    /// When set, a new stack-group leader evicts the effect it outranks
    /// instead of parking it dormant.
    pub effect_canceling: bool,

    /// Seed for the damage-removal chance roll. `None` draws from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EffectListConfig {
    fn default() -> Self {
        Self {
            dances_max_amount: 12,
            effect_canceling: true,
            rng_seed: None,
        }
    }
}

impl EffectListConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.dances_max_amount == 0 {
            return Err(EffectListError::InvalidConfig(
                "dances_max_amount must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the dance cap (builder pattern).
    #[must_use]
    pub fn with_dances_max(mut self, amount: usize) -> Self {
        self.dances_max_amount = amount;
        self
    }

    /// Set the effect canceling policy (builder pattern).
    #[must_use]
    pub fn with_effect_canceling(mut self, enabled: bool) -> Self {
        self.effect_canceling = enabled;
        self
    }

    /// Seed the chance roll (builder pattern).
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
