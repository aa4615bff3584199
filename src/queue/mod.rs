//! Mutation queue: serializes concurrent add/remove requests onto one
//! processor per owner.
//!
//! Producers push and then try to become the processor with a
//! test-and-set flag. Nobody blocks: a producer that loses the race leaves
//! its request for the running processor, which keeps draining (removals
//! before additions) until both queues are empty.

mod mutation;

pub use mutation::{Mutation, MutationQueue, ProcessorGuard};
