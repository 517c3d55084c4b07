//! Events: immutable, shared-ownership, tagged payloads (spec.md §3).
//!
//! The kernel never inspects an event beyond its [`type_tag`](Event::type_tag);
//! dispatch on that tag, and anything payload-shaped beyond it, is entirely
//! the application's concern (spec.md §9, "Dynamic event dispatch").

use std::sync::Arc;

/// A concrete event kind defined by the application.
///
/// Typically implemented once, for an enum covering every event kind a given
/// application's reactors care about (spec.md §9 suggests modeling this as a
/// tagged variant / sum type). The kernel is generic over `E: Event` and
/// never constructs one itself.
pub trait Event: std::fmt::Debug + Send + Sync + 'static {
    /// The 32-bit type tag chosen by the producer of this event. Opaque to
    /// the runtime; used only by reactors for dispatch.
    fn type_tag(&self) -> u32;
}

/// A timed event: an event paired with an absolute millisecond deadline
/// measured from the owning actor's birth (spec.md §3, "Timed event").
///
/// Cloning a `TimedEvent` clones the `Arc`, not the event itself — the
/// runtime hands out shared references and never mutates or duplicates the
/// underlying payload.
#[derive(Debug)]
pub struct TimedEvent<E: ?Sized> {
    /// The event payload, shared by reference.
    pub event: Arc<E>,
    /// Absolute millisecond deadline, relative to the actor's birth.
    pub deadline: u64,
}

impl<E: ?Sized> Clone for TimedEvent<E> {
    fn clone(&self) -> Self {
        TimedEvent {
            event: Arc::clone(&self.event),
            deadline: self.deadline,
        }
    }
}

impl<E: ?Sized> TimedEvent<E> {
    /// Pairs an event with an absolute deadline.
    pub fn new(event: Arc<E>, deadline: u64) -> Self {
        TimedEvent { event, deadline }
    }
}
