//! Error types.
//!
//! Errors never cross the mutation queue: enqueueing, bulk removal and
//! queries are infallible. Only configuration loading and delivery of
//! notifications can fail, and delivery failures are logged by the batch
//! processor instead of being propagated.

use thiserror::Error;

/// Errors produced by the effect list engine.
#[derive(Debug, Error)]
pub enum EffectListError {
    /// A sink could not deliver a message.
    #[error("delivery to {target} failed: {reason}")]
    Delivery {
        /// Recipient class (`owner`, `party`, `spectators`, `visuals`).
        target: &'static str,
        /// Transport-level reason.
        reason: String,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl EffectListError {
    /// Convenience constructor for delivery failures.
    pub fn delivery(target: &'static str, reason: impl Into<String>) -> Self {
        Self::Delivery {
            target,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EffectListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_message() {
        let err = EffectListError::delivery("party", "socket closed");
        assert_eq!(err.to_string(), "delivery to party failed: socket closed");
    }

    #[test]
    fn test_invalid_config_message() {
        let err = EffectListError::InvalidConfig("dances_max_amount must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: dances_max_amount must be at least 1"
        );
    }
}
