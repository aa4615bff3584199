//! Effect timers: periodic action ticks and expiry.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::effects::EffectRef;

use super::Inner;

impl Inner {
    /// Schedule the effect's next firing: one tick interval, or whatever is
    /// left of its duration if that is shorter. Effects without a duration
    /// or tick interval schedule nothing. An effect with no time left exits.
    pub(super) fn start_timer(self: &Arc<Self>, effect: &EffectRef) {
        if effect.is_expired() {
            trace!(effect = %effect.id(), "no time left");
            self.exit(effect);
            return;
        }
        let Some(period) = effect.tick_period() else {
            return;
        };
        let delay = period.min(effect.remaining());

        let list = Arc::downgrade(self);
        let target = Arc::clone(effect);
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = list.upgrade() {
                    inner.on_timer(&target, delay);
                }
            }),
        );
        if let Some(stale) = effect.set_timer(handle) {
            self.scheduler.cancel(stale);
        }

        // Exited while we were scheduling: the handle was never seen by detach.
        if effect.is_exited() {
            effect.stop_timer(self.scheduler.as_ref());
        }
    }

    fn on_timer(self: &Arc<Self>, effect: &EffectRef, elapsed: Duration) {
        effect.clear_timer();
        if effect.is_exited() {
            return;
        }
        effect.advance(elapsed);

        if effect.in_use() {
            let keep = match self.owner.upgrade() {
                Some(owner) => effect.kind().on_action_time(effect, owner.as_ref()),
                None => false,
            };
            if !keep {
                trace!(effect = %effect.id(), "action tick ended the effect");
                self.exit(effect);
                return;
            }
        }

        if effect.is_expired() {
            trace!(effect = %effect.id(), "effect expired");
            self.exit(effect);
        } else {
            self.start_timer(effect);
        }
    }
}
