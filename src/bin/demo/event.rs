//! Events understood by the demo reactor.
//!
//! A concrete stand-in for the "event-type registry used by applications"
//! spec.md §1 explicitly keeps out of scope for the kernel itself.

use actor_rt::Event;

/// Type tags for [`DemoEvent`], chosen arbitrarily by this demo application
/// and opaque to the kernel.
pub const TAG_PING: u32 = 1;
/// Type tag for the shutdown request.
pub const TAG_STOP: u32 = 2;

#[derive(Debug)]
pub enum DemoEvent {
    /// A ping carrying a sequence number, echoed by the demo reactor.
    Ping(u64),
    /// A request that the receiving actor stop (reset to no reactor).
    Stop,
}

impl Event for DemoEvent {
    fn type_tag(&self) -> u32 {
        match self {
            DemoEvent::Ping(_) => TAG_PING,
            DemoEvent::Stop => TAG_STOP,
        }
    }
}
