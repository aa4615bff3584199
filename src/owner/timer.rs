//! Timer scheduling seam.
//!
//! Effects tick down through a `Scheduler`. The world server supplies one;
//! `TickScheduler` is the deterministic implementation driven by the
//! server's simulation clock (and by tests).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Handle to a scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// A callback run once when its timer fires.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules one-shot callbacks.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Cancel a pending callback. Unknown or already fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

#[derive(Default)]
struct TickQueue {
    now: Duration,
    due: BTreeMap<(Duration, TimerHandle), TimerTask>,
    deadlines: FxHashMap<TimerHandle, Duration>,
}

/// Scheduler advanced explicitly by a simulation clock.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
/// use abnormal_engine::owner::{Scheduler, TickScheduler};
///
/// let scheduler = TickScheduler::new();
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&fired);
/// scheduler.schedule(Duration::from_secs(5), Box::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// assert_eq!(scheduler.advance(Duration::from_secs(4)), 0);
/// assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
#[derive(Default)]
pub struct TickScheduler {
    queue: Mutex<TickQueue>,
    next_handle: AtomicU64,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.queue.lock().now
    }

    /// Number of callbacks waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().due.len()
    }

    /// Advance the clock by `by`, firing every callback that comes due in
    /// deadline order. Callbacks scheduled by a firing callback also fire if
    /// they fall inside the window. Returns the number fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.queue.lock().now.saturating_add(by);
        let mut fired = 0;

        loop {
            let task = {
                let mut queue = self.queue.lock();
                let next = queue.due.keys().next().copied();
                match next {
                    Some((deadline, handle)) if deadline <= target => {
                        queue.now = deadline;
                        queue.deadlines.remove(&handle);
                        queue.due.remove(&(deadline, handle))
                    }
                    _ => {
                        queue.now = target;
                        None
                    }
                }
            };

            // Callbacks run outside the lock so they can reschedule.
            match task {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let mut queue = self.queue.lock();
        let deadline = queue.now.saturating_add(delay);
        queue.deadlines.insert(handle, deadline);
        queue.due.insert((deadline, handle), task);
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut queue = self.queue.lock();
        if let Some(deadline) = queue.deadlines.remove(&handle) {
            queue.due.remove(&(deadline, handle));
        }
    }
}
