//! Post-batch notification fan-out.
//!
//! After every batch the list builds at most one owner status update, one
//! party status and one spectator status from the settled containers, and
//! hands them to a `StatusSink`. The sink owns transport; this module only
//! decides who gets what.

mod message;
mod notifier;
mod sink;

pub use message::{
    IconEntry, OwnerMessage, PartyRoute, PartyStatus, SpectatorStatus, StatusUpdate,
};
pub use notifier::{Dispatch, Notifier};
pub use sink::{NullSink, StatusSink};
