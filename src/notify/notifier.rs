//! Builds the per-batch notifications from the settled containers.

use tracing::warn;

use crate::containers::EffectContainer;
use crate::core::{CharId, MatchId};
use crate::effects::EffectRef;
use crate::flags::PredicateFlags;
use crate::owner::{EffectOwner, MasterStatus, OwnerKind};

use super::{
    IconEntry, OwnerMessage, PartyRoute, PartyStatus, SpectatorStatus, StatusSink, StatusUpdate,
};

/// Everything one batch sends out, built under the list lock and delivered
/// after it is released.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    owner: CharId,
    status: Option<StatusUpdate>,
    party: Option<(PartyRoute, PartyStatus)>,
    spectators: Option<(MatchId, SpectatorStatus)>,
}

impl Dispatch {
    #[must_use]
    pub fn status(&self) -> Option<&StatusUpdate> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn party(&self) -> Option<&(PartyRoute, PartyStatus)> {
        self.party.as_ref()
    }

    #[must_use]
    pub fn spectators(&self) -> Option<&(MatchId, SpectatorStatus)> {
        self.spectators.as_ref()
    }

    /// Send every payload. A failed delivery is logged and the rest still go
    /// out. Returns the number of failures.
    pub fn deliver(self, sink: &dyn StatusSink) -> usize {
        let owner = self.owner;
        let mut failures = 0;

        if let Err(err) = sink.broadcast_abnormal_visuals(owner) {
            warn!(%owner, error = %err, "abnormal visual broadcast failed");
            failures += 1;
        }
        if let Some(status) = self.status {
            if let Err(err) = sink.send_to_owner(owner, OwnerMessage::Status(status)) {
                warn!(%owner, error = %err, "status update delivery failed");
                failures += 1;
            }
        }
        if let Some((route, status)) = self.party {
            if let Err(err) = sink.send_to_party(owner, route, status) {
                warn!(%owner, ?route, error = %err, "party status delivery failed");
                failures += 1;
            }
        }
        if let Some((game, status)) = self.spectators {
            if let Err(err) = sink.send_to_spectators(game, status) {
                warn!(%owner, game = game.0, error = %err, "spectator status delivery failed");
                failures += 1;
            }
        }

        failures
    }
}

/// Which payloads a batch builds, decided from the owner's situation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Audience {
    owner: bool,
    party: Option<PartyRoute>,
    spectators: Option<MatchId>,
}

impl Audience {
    fn of(owner: &dyn EffectOwner, party_only: bool) -> Self {
        match owner.kind() {
            OwnerKind::Player => Self {
                owner: !party_only,
                party: owner.is_in_party().then_some(PartyRoute::Party),
                spectators: owner.observed_match(),
            },
            OwnerKind::Summon => Self {
                owner: false,
                party: owner.master_status().map(|status| match status {
                    MasterStatus::InParty => PartyRoute::MasterParty,
                    MasterStatus::Solo => PartyRoute::Master,
                }),
                spectators: None,
            },
            OwnerKind::Npc => Self {
                owner: false,
                party: None,
                spectators: None,
            },
        }
    }

    fn is_empty(self) -> bool {
        !self.owner && self.party.is_none() && self.spectators.is_none()
    }
}

/// Stateless builder for [`Dispatch`].
pub struct Notifier;

impl Notifier {
    /// Build the batch's notifications and recompute the predicate flags.
    ///
    /// Icons list in-use, icon-visible effects, buffs before debuffs.
    /// `party_only` suppresses the owner's own status update.
    pub fn build(
        owner: &dyn EffectOwner,
        buffs: &EffectContainer,
        debuffs: &EffectContainer,
        party_only: bool,
    ) -> (Dispatch, PredicateFlags) {
        let predicates = PredicateFlags::scan(buffs.iter(), debuffs.iter());
        let audience = Audience::of(owner, party_only);

        let mut dispatch = Dispatch {
            owner: owner.id(),
            status: None,
            party: None,
            spectators: None,
        };
        if audience.is_empty() {
            return (dispatch, predicates);
        }

        let icons = Self::icons(buffs, debuffs);
        if audience.owner {
            dispatch.status = Some(StatusUpdate { icons: icons.clone() });
        }
        if let Some(route) = audience.party {
            let status = PartyStatus {
                subject: owner.id(),
                subject_kind: owner.kind(),
                icons: icons.clone(),
            };
            dispatch.party = Some((route, status));
        }
        if let Some(game) = audience.spectators {
            let status = SpectatorStatus {
                subject: owner.id(),
                icons,
            };
            dispatch.spectators = Some((game, status));
        }

        (dispatch, predicates)
    }

    /// Icon list for the settled containers.
    #[must_use]
    pub fn icons(buffs: &EffectContainer, debuffs: &EffectContainer) -> Vec<IconEntry> {
        let shown = |e: &&EffectRef| e.in_use() && e.show_icon();
        buffs
            .iter()
            .filter(shown)
            .filter(|e| e.abnormal_type().buff_icon_visible())
            .chain(
                debuffs
                    .iter()
                    .filter(shown)
                    .filter(|e| e.abnormal_type().debuff_icon_visible()),
            )
            .map(|e| IconEntry::of(e))
            .collect()
    }
}
