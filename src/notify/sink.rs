//! Delivery seam for notifications.

use crate::core::{CharId, MatchId, Result};

use super::{OwnerMessage, PartyRoute, PartyStatus, SpectatorStatus};

/// Delivers notification payloads to their recipients.
///
/// Called by the batch processor after the batch has settled, outside the
/// effect list's locks. Errors are logged by the caller and never stop the
/// rest of a dispatch.
pub trait StatusSink: Send + Sync {
    fn send_to_owner(&self, owner: CharId, message: OwnerMessage) -> Result<()>;

    /// `subject` is the character whose icons are carried; `route` says whose
    /// party (or master) gets them.
    fn send_to_party(&self, subject: CharId, route: PartyRoute, status: PartyStatus) -> Result<()>;

    fn send_to_spectators(&self, game: MatchId, status: SpectatorStatus) -> Result<()>;

    /// Re-broadcast the owner's visible abnormal effects to nearby players.
    fn broadcast_abnormal_visuals(&self, _owner: CharId) -> Result<()> {
        Ok(())
    }
}

/// Sink that drops everything. For owners nobody observes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn send_to_owner(&self, _owner: CharId, _message: OwnerMessage) -> Result<()> {
        Ok(())
    }

    fn send_to_party(&self, _subject: CharId, _route: PartyRoute, _status: PartyStatus) -> Result<()> {
        Ok(())
    }

    fn send_to_spectators(&self, _game: MatchId, _status: SpectatorStatus) -> Result<()> {
        Ok(())
    }
}
