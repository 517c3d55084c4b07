//! # Actor runtime kernel
//!
//! This crate contains the core event-dispatch kernel used by actor-based
//! applications. Run `cargo run --bin actor-rt-demo` for a small harness that
//! wires up a handful of [`Context`](context::Context)s and [`Actor`](actor::Actor)s.
//!
//! ## Application structure
//!
//! An application built on top of this crate supplies its own event type and
//! [`Reactor`](reactor::Reactor) implementations; the kernel only knows how to
//! queue, schedule, and deliver them. A [`Context`](context::Context) owns one
//! event loop bound to one OS thread and is the factory for any number of
//! [`Actor`](actor::Actor)s that live on that loop. Each actor owns a
//! [`Queue`](queue::Queue) (its mailbox) and a [`Stateful`](stateful::Stateful)
//! container holding the currently installed reactor.

#![warn(missing_docs, unreachable_pub, unused_qualifications)]

pub mod actor;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod queue;
pub mod reactor;
pub mod stateful;
pub mod time;

pub use actor::{Actor, ActorHandle, WeakActorHandle};
pub use context::Context;
pub use error::{BatchOutcome, ReactorError, RuntimeError};
pub use event::{Event, TimedEvent};
pub use reactor::Reactor;
