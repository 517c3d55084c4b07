//! The reactor contract (spec.md §4.1, §6): pluggable behavior for an actor.
//!
//! Any long-running actor in this runtime uses an event-dispatch pattern:
//! events accumulate on the actor's [`Queue`](crate::queue::Queue), and are
//! drained one batch at a time into whichever [`Reactor`] is currently
//! installed in the actor's [`Stateful`](crate::stateful::Stateful)
//! container. A reactor owns the actor's application state exclusively for
//! as long as it is installed; installing a different one (or none) via
//! [`ActorHandle::reset`](crate::actor::ActorHandle::reset) transfers that
//! ownership immediately, even mid-batch.

use std::sync::Arc;

use crate::actor::ActorHandle;
use crate::error::ReactorError;
use crate::event::Event;

/// Behavior pluggable into an [`Actor`](crate::actor::Actor).
///
/// Implementations are supplied entirely by application code; the kernel
/// only ever calls [`react`](Reactor::react), in the order events were
/// dequeued, on the actor's own loop thread.
pub trait Reactor<E: Event>: Send {
    /// Handles one event, delivered at `timestamp_ms` (the deadline it was
    /// scheduled for, not necessarily the current wall clock).
    ///
    /// `actor` is a handle back to the hosting actor: `send` may be called
    /// from here freely, `reset` may be called to hot-swap or stop (and, if
    /// called, must be the last thing this implementation does with its own
    /// state — spec.md §6), and `spawn` may be used to create sibling actors
    /// on the same loop.
    ///
    /// Returning `Err` truncates the remainder of the current batch destined
    /// for this reactor (spec.md §4.3); the actor itself keeps running
    /// unless a later `reset(None)` is issued.
    fn react(
        &mut self,
        event: Arc<E>,
        timestamp_ms: u64,
        actor: &ActorHandle<E>,
    ) -> Result<(), ReactorError>;

    /// Diagnostic serialization, for operators inspecting a live actor.
    /// Most reactors leave this as a no-op.
    fn dump(&self, writer: &mut dyn std::fmt::Write) -> std::fmt::Result {
        let _ = writer;
        Ok(())
    }
}
