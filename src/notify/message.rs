//! Notification payloads. Transport and framing belong to the packet layer.

use serde::{Deserialize, Serialize};

use crate::core::{CharId, SkillId};
use crate::effects::{AbnormalType, Effect};
use crate::owner::OwnerKind;

/// One icon in a status list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
    pub skill_id: SkillId,
    pub level: u16,
    pub abnormal_type: AbnormalType,
    /// Seconds left; `-1` for toggles and effects without a duration.
    pub remaining_secs: i32,
}

impl IconEntry {
    #[must_use]
    pub fn of(effect: &Effect) -> Self {
        Self {
            skill_id: effect.skill().id,
            level: effect.skill().level,
            abnormal_type: effect.abnormal_type(),
            remaining_secs: effect.icon_remaining_secs(),
        }
    }
}

/// The owner's own icon bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub icons: Vec<IconEntry>,
}

/// A party member's (or summon's) icons, shown in the party window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStatus {
    pub subject: CharId,
    pub subject_kind: OwnerKind,
    pub icons: Vec<IconEntry>,
}

/// A contestant's icons, shown to match spectators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectatorStatus {
    pub subject: CharId,
    pub icons: Vec<IconEntry>,
}

/// Messages addressed to the owner alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerMessage {
    Status(StatusUpdate),
    /// "The effect of {skill} has worn off."
    EffectDisappeared { skill_id: SkillId, level: u16 },
    /// "{skill} has been aborted." Toggles only.
    EffectAborted { skill_id: SkillId, level: u16 },
}

impl OwnerMessage {
    /// The system message for `effect` leaving the owner.
    #[must_use]
    pub fn removal_of(effect: &Effect) -> Self {
        let skill_id = effect.skill().id;
        let level = effect.skill().level;
        if effect.skill().is_toggle() {
            Self::EffectAborted { skill_id, level }
        } else {
            Self::EffectDisappeared { skill_id, level }
        }
    }
}

/// Who receives a party status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyRoute {
    /// The owner's party.
    Party,
    /// A summon's master's party.
    MasterParty,
    /// A summon's ungrouped master.
    Master,
}
