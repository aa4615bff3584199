//! Skill template data consumed by the effect list.
//!
//! Only the fields admission, removal triggers and display ordering look
//! at are modeled here. The template layer owns the full skill catalog.

use serde::{Deserialize, Serialize};

use crate::core::SkillId;

/// Skill type, as far as buff slot accounting is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillType {
    Buff,
    HealPercent,
    ManaHealPercent,
    Debuff,
    Continuous,
    Other,
}

impl SkillType {
    /// Types that occupy a regular buff slot.
    #[must_use]
    pub const fn occupies_buff_slot(self) -> bool {
        matches!(self, Self::Buff | Self::HealPercent | Self::ManaHealPercent)
    }
}

/// Display/capacity category of a buff.
///
/// Buffs are displayed in ascending rank order: plain buffs first,
/// activation-type effects last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    Plain,
    SevenSigns,
    Toggle,
    Dance,
    Activation,
}

impl SkillCategory {
    /// Position of the category in the display order.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::SevenSigns => 1,
            Self::Toggle => 2,
            Self::Dance => 3,
            Self::Activation => 4,
        }
    }
}

/// Who a skill targets. Self and party targeted casts are friendly actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    SelfOnly,
    Friends,
    One,
    Area,
}

/// Removal of an effect when its owner is hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRemoval {
    /// Minimum damage that removes the effect.
    pub threshold: u32,
    /// Percent chance for debuffs; 0 removes unconditionally.
    pub chance: u8,
}

/// Template data for the skill that produced an effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillInfo {
    pub id: SkillId,
    pub level: u16,
    pub name: String,
    pub skill_type: SkillType,
    pub category: SkillCategory,
    pub debuff: bool,
    pub target_type: TargetType,
    pub removed_on_action: bool,
    pub removed_on_damage: Option<DamageRemoval>,
    pub removed_on_debuff_block: bool,
    pub stays_after_death: bool,
}

impl SkillInfo {
    /// Create a skill with the given type and category.
    pub fn new(id: SkillId, level: u16, skill_type: SkillType, category: SkillCategory) -> Self {
        Self {
            id,
            level,
            name: String::new(),
            skill_type,
            category,
            debuff: matches!(skill_type, SkillType::Debuff),
            target_type: TargetType::One,
            removed_on_action: false,
            removed_on_damage: None,
            removed_on_debuff_block: false,
            stays_after_death: false,
        }
    }

    /// A plain buff.
    pub fn buff(id: SkillId, level: u16) -> Self {
        Self::new(id, level, SkillType::Buff, SkillCategory::Plain)
    }

    /// A debuff.
    pub fn debuff(id: SkillId, level: u16) -> Self {
        Self::new(id, level, SkillType::Debuff, SkillCategory::Plain)
    }

    /// A dance or song.
    pub fn dance(id: SkillId, level: u16) -> Self {
        Self::new(id, level, SkillType::Buff, SkillCategory::Dance)
    }

    /// A toggle (stays until switched off).
    pub fn toggle(id: SkillId, level: u16) -> Self {
        Self::new(id, level, SkillType::Continuous, SkillCategory::Toggle)
    }

    /// An activation-type effect (item or passive activation).
    pub fn activation(id: SkillId, level: u16) -> Self {
        Self::new(id, level, SkillType::Buff, SkillCategory::Activation)
    }

    /// A seven-signs blessing.
    pub fn seven_signs(id: SkillId, level: u16) -> Self {
        Self::new(id, level, SkillType::Buff, SkillCategory::SevenSigns)
    }

    /// Set the display name (builder pattern).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the skill type (builder pattern).
    #[must_use]
    pub fn with_skill_type(mut self, skill_type: SkillType) -> Self {
        self.skill_type = skill_type;
        self
    }

    /// Set the targeting (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    /// Remove the effect on any non-friendly action (builder pattern).
    #[must_use]
    pub fn removed_on_action(mut self) -> Self {
        self.removed_on_action = true;
        self
    }

    /// Remove the effect when hit for at least `threshold` (builder pattern).
    #[must_use]
    pub fn removed_on_damage(mut self, threshold: u32, chance: u8) -> Self {
        self.removed_on_damage = Some(DamageRemoval { threshold, chance });
        self
    }

    /// Remove the effect when it blocks a debuff (builder pattern).
    #[must_use]
    pub fn removed_on_debuff_block(mut self) -> Self {
        self.removed_on_debuff_block = true;
        self
    }

    /// Keep the effect through the owner's death (builder pattern).
    #[must_use]
    pub fn stays_after_death(mut self) -> Self {
        self.stays_after_death = true;
        self
    }

    #[must_use]
    pub fn is_toggle(&self) -> bool {
        self.category == SkillCategory::Toggle
    }

    #[must_use]
    pub fn is_dance(&self) -> bool {
        self.category == SkillCategory::Dance
    }

    #[must_use]
    pub fn is_activation(&self) -> bool {
        self.category == SkillCategory::Activation
    }

    /// Casting this skill is a friendly action that never strips buffs.
    #[must_use]
    pub fn is_friendly(&self) -> bool {
        matches!(self.target_type, TargetType::SelfOnly | TargetType::Friends)
    }
}
