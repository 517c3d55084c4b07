//! The demo reactor: echoes pings, then stops itself gracefully.

use std::sync::Arc;

use actor_rt::{ActorHandle, Reactor, ReactorError};

use crate::event::DemoEvent;

/// Sends itself `total` pings, ten milliseconds apart, logging each one,
/// then resets itself to nothing once it sees a [`DemoEvent::Stop`].
pub struct EchoReactor {
    pub label: String,
    pub total: u64,
}

impl Reactor<DemoEvent> for EchoReactor {
    fn react(
        &mut self,
        event: Arc<DemoEvent>,
        timestamp_ms: u64,
        actor: &ActorHandle<DemoEvent>,
    ) -> Result<(), ReactorError> {
        match &*event {
            DemoEvent::Ping(n) => {
                tracing::info!(label = %self.label, seq = n, timestamp_ms, "ping");
                if *n + 1 < self.total {
                    actor.send(Arc::new(DemoEvent::Ping(n + 1)), 10);
                } else {
                    actor.send(Arc::new(DemoEvent::Stop), 0);
                }
                Ok(())
            }
            DemoEvent::Stop => {
                tracing::info!(
                    label = %self.label,
                    reactive_time_ns = actor.reactive_time(),
                    "stopping"
                );
                actor.reset(None);
                Ok(())
            }
        }
    }

    fn dump(&self, writer: &mut dyn std::fmt::Write) -> std::fmt::Result {
        write!(writer, "EchoReactor({}, total={})", self.label, self.total)
    }
}
