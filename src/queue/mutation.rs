//! Lock-free request queues with a single active processor.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::SegQueue;

use crate::effects::EffectRef;

/// What a queued request does to its effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Remove,
}

/// Pending add/remove requests for one owner.
///
/// Any thread may push. Whoever wins [`MutationQueue::try_acquire`] drains
/// the queues until they are empty; everyone else returns immediately and
/// leaves their request for the winner.
#[derive(Debug)]
pub struct MutationQueue {
    removals: SegQueue<EffectRef>,
    additions: SegQueue<EffectRef>,
    /// A batch with no mutation was requested (icon refresh).
    refresh: AtomicBool,
    /// `true` while nobody is processing.
    idle: AtomicBool,
}

impl Default for MutationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            removals: SegQueue::new(),
            additions: SegQueue::new(),
            refresh: AtomicBool::new(false),
            idle: AtomicBool::new(true),
        }
    }

    pub fn push(&self, effect: EffectRef, mutation: Mutation) {
        match mutation {
            Mutation::Add => self.additions.push(effect),
            Mutation::Remove => self.removals.push(effect),
        }
    }

    /// Ask for a batch even if nothing is queued.
    pub fn request_refresh(&self) {
        self.refresh.store(true, Ordering::SeqCst);
    }

    /// No request of any kind is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty() && !self.refresh.load(Ordering::SeqCst)
    }

    /// Queued `(removals, additions)`.
    #[must_use]
    pub fn pending(&self) -> (usize, usize) {
        (self.removals.len(), self.additions.len())
    }

    /// Someone holds the processor role right now.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        !self.idle.load(Ordering::SeqCst)
    }

    /// Become the processor, unless somebody already is.
    pub fn try_acquire(&self) -> Option<ProcessorGuard<'_>> {
        self.idle
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ProcessorGuard { queue: self })
    }

    /// Drop every queued request, returning the effects that were waiting.
    pub fn drain(&self) -> Vec<EffectRef> {
        self.refresh.store(false, Ordering::SeqCst);
        let mut drained = Vec::with_capacity(self.removals.len() + self.additions.len());
        while let Some(effect) = self.removals.pop() {
            drained.push(effect);
        }
        while let Some(effect) = self.additions.pop() {
            drained.push(effect);
        }
        drained
    }
}

/// Exclusive right to drain a [`MutationQueue`]. Released on drop, on
/// every exit path.
#[derive(Debug)]
pub struct ProcessorGuard<'a> {
    queue: &'a MutationQueue,
}

impl ProcessorGuard<'_> {
    pub fn pop_removal(&self) -> Option<EffectRef> {
        self.queue.removals.pop()
    }

    pub fn pop_addition(&self) -> Option<EffectRef> {
        self.queue.additions.pop()
    }

    /// Consume a pending refresh request.
    pub fn take_refresh(&self) -> bool {
        self.queue.refresh.swap(false, Ordering::SeqCst)
    }

    /// Add or remove requests are still waiting.
    #[must_use]
    pub fn has_requests(&self) -> bool {
        !self.queue.removals.is_empty() || !self.queue.additions.is_empty()
    }

    /// Drop everything still queued; see [`MutationQueue::drain`].
    pub fn drain(&self) -> Vec<EffectRef> {
        self.queue.drain()
    }
}

impl Drop for ProcessorGuard<'_> {
    fn drop(&mut self) {
        // SeqCst pairs with the producers' queue pushes: either the producer
        // sees the flag released or the releasing processor sees the push.
        self.queue.idle.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EffectId, SkillId};
    use crate::effects::{Effect, SkillInfo};
    use std::sync::Arc;
    use std::thread;

    fn effect(id: u64) -> EffectRef {
        let skill = Arc::new(SkillInfo::buff(SkillId::new(id as u32), 1));
        Effect::builder(EffectId(id), skill).build()
    }

    #[test]
    fn test_single_processor() {
        let queue = MutationQueue::new();
        let guard = queue.try_acquire();
        assert!(guard.is_some());
        assert!(queue.is_processing());
        assert!(queue.try_acquire().is_none());

        drop(guard);
        assert!(!queue.is_processing());
        assert!(queue.try_acquire().is_some());
    }

    #[test]
    fn test_fifo_per_kind() {
        let queue = MutationQueue::new();
        queue.push(effect(1), Mutation::Add);
        queue.push(effect(2), Mutation::Remove);
        queue.push(effect(3), Mutation::Add);
        assert_eq!(queue.pending(), (1, 2));

        let guard = queue.try_acquire().unwrap();
        assert_eq!(guard.pop_removal().map(|e| e.id()), Some(EffectId(2)));
        assert_eq!(guard.pop_removal(), None);
        assert_eq!(guard.pop_addition().map(|e| e.id()), Some(EffectId(1)));
        assert!(guard.has_requests());
        assert_eq!(guard.pop_addition().map(|e| e.id()), Some(EffectId(3)));
        assert!(!guard.has_requests());
    }

    #[test]
    fn test_refresh_counts_as_work() {
        let queue = MutationQueue::new();
        assert!(queue.is_empty());
        queue.request_refresh();
        assert!(!queue.is_empty());

        let guard = queue.try_acquire().unwrap();
        assert!(!guard.has_requests());
        assert!(guard.take_refresh());
        assert!(!guard.take_refresh());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let queue = Arc::new(MutationQueue::new());
        let inner = Arc::clone(&queue);
        let result = thread::spawn(move || {
            let _guard = inner.try_acquire().unwrap();
            panic!("processor failed");
        })
        .join();

        assert!(result.is_err());
        assert!(!queue.is_processing());
    }

    #[test]
    fn test_concurrent_pushes_are_not_lost() {
        let queue = Arc::new(MutationQueue::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..100 {
                        let mutation = if i % 2 == 0 { Mutation::Add } else { Mutation::Remove };
                        queue.push(effect(t * 1000 + i), mutation);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.pending(), (400, 400));
        assert_eq!(queue.drain().len(), 800);
        assert!(queue.is_empty());
    }
}
