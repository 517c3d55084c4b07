//! Error types for the actor runtime kernel.
//!
//! Two distinct error surfaces exist, matching the two failure domains
//! described by the kernel: failures of the loop/handle primitives
//! themselves (fatal to the actor they happened on) and failures raised by
//! application-supplied [`Reactor`](crate::reactor::Reactor) implementations
//! (confined to the batch in progress).

use std::fmt;

/// Fatal failures of the runtime's own primitives.
///
/// These are never raised by application code; they indicate that the
/// underlying loop could not be initialized. An actor that encounters one of
/// these cannot continue and should be considered closed.
///
/// The wake-up and one-shot timer handles themselves (`tokio::sync::Notify`
/// and `tokio::time::sleep`) have no fallible arming step in this
/// implementation, unlike the `uv_async_t`/`uv_timer_t` handles of the
/// reference implementation this kernel's scheduling model is drawn from —
/// so there is no corresponding handle-init variant here.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The per-context event loop failed to start its worker thread.
    #[error("failed to start event loop worker thread: {0}")]
    LoopInit(#[source] std::io::Error),
}

/// The error surface a [`Reactor`](crate::reactor::Reactor) may raise from
/// `react`.
///
/// Boxed so that application code can return any `std::error::Error`
/// without the kernel needing to know its concrete type.
pub type ReactorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The result of delivering one batch of events to the currently installed
/// reactor (or sequence of reactors, if a hot-swap occurred mid-batch).
///
/// See [`Stateful::trigger`](crate::stateful::Stateful::trigger) for the
/// algorithm that produces this value.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of events actually handed to `react` across the whole batch,
    /// including events delivered before a hot-swap or error.
    pub delivered: usize,
    /// Number of events in the batch that were never delivered because a
    /// reactor error truncated delivery to its remaining events.
    pub discarded: usize,
    /// The error raised by the reactor that was delivering when the batch
    /// was truncated, if any.
    pub error: Option<ReactorError>,
}

impl BatchOutcome {
    /// True if every event in the batch was handed to some reactor.
    pub fn complete(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delivered {} event(s), discarded {}",
            self.delivered, self.discarded
        )?;
        if let Some(err) = &self.error {
            write!(f, " (truncated by reactor error: {err})")?;
        }
        Ok(())
    }
}
