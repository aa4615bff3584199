//! Capability bitmask carried by effects.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitmask of special states an effect confers on its owner.
///
/// The combat path asks "is the owner rooted / muted / invulnerable?"
/// many times per tick; each answer is a single AND against the
/// aggregate of all in-use effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectFlags(pub u64);

impl EffectFlags {
    pub const NONE: Self = Self(0);
    pub const RESURRECTION_SPECIAL: Self = Self(1 << 0);
    pub const NOBLESS_BLESSING: Self = Self(1 << 1);
    pub const SILENT_MOVE: Self = Self(1 << 2);
    pub const PROTECTION_BLESSING: Self = Self(1 << 3);
    pub const RELAXING: Self = Self(1 << 4);
    pub const FEAR: Self = Self(1 << 5);
    pub const CONFUSED: Self = Self(1 << 6);
    pub const MUTED: Self = Self(1 << 7);
    pub const PHYSICAL_MUTED: Self = Self(1 << 8);
    pub const ROOTED: Self = Self(1 << 9);
    pub const SLEEP: Self = Self(1 << 10);
    pub const STUNNED: Self = Self(1 << 11);
    pub const BETRAYED: Self = Self(1 << 12);
    pub const INVUL: Self = Self(1 << 13);
    pub const PARALYZED: Self = Self(1 << 14);
    pub const BLOCK_RESURRECTION: Self = Self(1 << 15);
    pub const SERVITOR_SHARE: Self = Self(1 << 16);
    pub const DISARMED: Self = Self(1 << 17);

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// No bit set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EffectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EffectFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EffectFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
