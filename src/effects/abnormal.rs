//! Abnormal-status tags.

use serde::{Deserialize, Serialize};

/// Visual/semantic tag of an effect, used for lookups and icon filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbnormalType {
    None,
    Buff,
    Debuff,
    Fear,
    Sleep,
    Stun,
    Root,
    Paralyze,
    Silence,
    Poison,
    Bleed,
    Hide,
    Invincible,
    /// Rendered by the separate charge counter, never as an icon.
    Charge,
    /// Ground signets draw their own area marker instead of an icon.
    SignetGround,
}

impl AbnormalType {
    /// Whether a buff of this type appears in icon lists.
    #[must_use]
    pub const fn buff_icon_visible(self) -> bool {
        !matches!(self, Self::Charge | Self::SignetGround)
    }

    /// Whether a debuff of this type appears in icon lists.
    #[must_use]
    pub const fn debuff_icon_visible(self) -> bool {
        !matches!(self, Self::SignetGround)
    }

    /// Types that survive the damage that woke the owner up.
    #[must_use]
    pub const fn ignores_wake_damage(self) -> bool {
        matches!(self, Self::Fear | Self::Sleep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_visibility() {
        assert!(!AbnormalType::Charge.buff_icon_visible());
        assert!(AbnormalType::Charge.debuff_icon_visible());
        assert!(!AbnormalType::SignetGround.debuff_icon_visible());
        assert!(AbnormalType::Stun.buff_icon_visible());
    }
}
