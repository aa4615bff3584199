//! Identifier newtypes.
//!
//! Every effect instance carries a unique `EffectId`, allocated by an
//! `EffectIdAllocator` owned by whatever constructs effects (skill
//! execution, item use). Skills, characters and observed matches are
//! identified by ids handed in from the template and world layers.
//!
//! ```
//! use abnormal_engine::core::{EffectIdAllocator, EffectId};
//!
//! let ids = EffectIdAllocator::new();
//! let first = ids.next();
//! let second = ids.next();
//! assert_ne!(first, second);
//! assert_eq!(first, EffectId(1));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique identifier for an effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl EffectId {
    /// Create a new effect ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// Hands out effect IDs. Shared by every producer of effects in a process.
#[derive(Debug)]
pub struct EffectIdAllocator {
    next: AtomicU64,
}

impl EffectIdAllocator {
    /// Create an allocator whose first ID is 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    /// Allocate the next ID.
    pub fn next(&self) -> EffectId {
        EffectId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EffectIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Skill template identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u32);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill({})", self.0)
    }
}

/// Character (player, summon or NPC) identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharId(pub u32);

impl CharId {
    /// Create a new character ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CharId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Char({})", self.0)
    }
}

/// Identifier of an observed competition match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u32);

/// Name of a stack group: effects sharing a key compete for one slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackGroupKey(String);

impl StackGroupKey {
    /// Create a stack group key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StackGroupKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for StackGroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
