//! The actor: a single-threaded consumer bound to one loop (spec.md §4.4).
//!
//! Exposes a thread-safe `send`, and a loop-thread-only `reset`/`spawn`/
//! `reactive_time`. Internally it is a cheaply-cloneable handle around one
//! `Arc<ActorShared<E>>`; [`Actor`] and [`ActorHandle`] are the same type —
//! the latter name is used where code reads more naturally as "the handle a
//! reactor was given back", the former where it reads as "the actor itself".

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::context::ContextHandle;
use crate::event::{Event, TimedEvent};
use crate::queue::Queue;
use crate::reactor::Reactor;
use crate::stateful::Stateful;
use crate::time::{Clock, ReactiveTimeAccumulator};

/// `Actor` and `ActorHandle` name the same underlying handle; see the module
/// doc comment for when to use which.
pub type ActorHandle<E> = Actor<E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum ActorState {
    Uninstalled = 0,
    Running = 1,
    Stopping = 2,
    Closed = 3,
}

impl ActorState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ActorState::Uninstalled,
            1 => ActorState::Running,
            2 => ActorState::Stopping,
            _ => ActorState::Closed,
        }
    }
}

struct ActorShared<E: Event> {
    queue: Queue<E>,
    stateful: Stateful<E>,
    notify: tokio::sync::Notify,
    clock: Clock,
    reactive_time: ReactiveTimeAccumulator,
    state: AtomicU8,
    scheduler_spawned: AtomicBool,
    ctx: ContextHandle,
}

// SAFETY: `stateful` is only ever touched (via `install`/`trigger`/
// `is_running`) from the actor's own loop thread. `reset` and `spawn` assert
// that thread affinity in debug builds (see `assert_loop_thread`); no other
// field requires thread confinement. This mirrors how thread-pinned reactor
// cores elsewhere justify the same kind of manual `Sync` impl over an
// interior `RefCell`.
unsafe impl<E: Event> Sync for ActorShared<E> {}
unsafe impl<E: Event> Send for ActorShared<E> {}

/// A single-threaded consumer of events, bound to one [`Context`](crate::context::Context)'s loop.
///
/// Cloning an `Actor` clones a handle to the same underlying actor; it does
/// not create a new one (use [`spawn`](Actor::spawn) for that).
pub struct Actor<E: Event> {
    shared: Arc<ActorShared<E>>,
}

impl<E: Event> Clone for Actor<E> {
    fn clone(&self) -> Self {
        Actor {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// A non-owning reference to an actor.
///
/// Reactors that capture a reference to their hosting actor should prefer
/// this over a strong [`Actor`] handle, to avoid the ownership cycle
/// described in spec.md §9: the actor's scheduler task already holds a
/// strong reference to keep itself alive, so a reactor holding another
/// strong reference back would leak for as long as it is installed.
pub struct WeakActorHandle<E: Event> {
    shared: Weak<ActorShared<E>>,
}

impl<E: Event> Clone for WeakActorHandle<E> {
    fn clone(&self) -> Self {
        WeakActorHandle {
            shared: self.shared.clone(),
        }
    }
}

impl<E: Event> WeakActorHandle<E> {
    /// Upgrades to a strong handle, if the actor is still alive.
    pub fn upgrade(&self) -> Option<Actor<E>> {
        self.shared.upgrade().map(|shared| Actor { shared })
    }
}

impl<E: Event> Actor<E> {
    pub(crate) fn new(ctx: ContextHandle) -> Self {
        Actor {
            shared: Arc::new(ActorShared {
                queue: Queue::new(),
                stateful: Stateful::new(),
                notify: tokio::sync::Notify::new(),
                clock: Clock::new(),
                reactive_time: ReactiveTimeAccumulator::new(),
                state: AtomicU8::new(ActorState::Uninstalled as u8),
                scheduler_spawned: AtomicBool::new(false),
                ctx,
            }),
        }
    }

    fn state(&self) -> ActorState {
        ActorState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ActorState) {
        self.shared.state.store(state as u8, Ordering::Release);
    }

    /// Panics (debug builds only) if called from a thread other than the
    /// owning context's loop thread, once that loop has started running.
    /// Before the loop starts, no thread contention is possible yet, so the
    /// check is skipped (spec.md §6 setup happens single-threaded, before
    /// any `exec`).
    fn assert_loop_thread(&self) {
        self.shared.ctx.assert_current_thread_is_loop_thread();
    }

    /// Downgrades to a non-owning [`WeakActorHandle`].
    pub fn downgrade(&self) -> WeakActorHandle<E> {
        WeakActorHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Sends an event to this actor, thread-safe, callable at any time after
    /// construction (spec.md §4.4, §6).
    ///
    /// `delay_ms == 0` enqueues immediately (spec.md §8 invariant 8: no
    /// timer involvement). A closed actor silently drops the event — this
    /// is intentional best-effort delivery, not an error.
    pub fn send(&self, event: impl Into<Arc<E>>, delay_ms: u64) {
        let deadline = self.shared.clock.deadline_ms(delay_ms);
        let timed = TimedEvent::new(event.into(), deadline);
        let became_head = if delay_ms == 0 {
            self.shared.queue.add_ready(timed)
        } else {
            self.shared.queue.add_waiting(timed)
        };
        if became_head {
            self.shared.notify.notify_one();
        }
    }

    /// Installs a new reactor (or none), per the state machine of spec.md
    /// §4.4:
    ///
    /// - `Uninstalled -> Running`: opens the mailbox and spawns this actor's
    ///   scheduler task onto the owning context's loop (the "start"
    ///   transition, arming the wake-up and timer handles).
    /// - `Running -> Stopping`: closes the mailbox (dropping whatever was
    ///   queued) and wakes the scheduler task so it can notice and finish
    ///   closing (the `Stopping -> Closed` transition happens on the
    ///   scheduler task itself, once it observes the empty, closed queue).
    /// - `Running -> Running` (hot-swap): no handle churn; the mailbox stays
    ///   open.
    ///
    /// Loop-thread only. May be called from inside `react` — see
    /// [`Reactor::react`] for the reentrancy contract this relies on.
    pub fn reset(&self, new_reactor: Option<Box<dyn Reactor<E>>>) {
        self.assert_loop_thread();
        let was_running = self.shared.stateful.install(new_reactor);
        let is_running = self.shared.stateful.is_running();

        match (was_running, is_running) {
            (false, true) => {
                self.shared.queue.set_open(true);
                self.set_state(ActorState::Running);
                self.shared.ctx.actor_started();
                if !self.shared.scheduler_spawned.swap(true, Ordering::AcqRel) {
                    let handle = self.clone();
                    self.shared.ctx.spawn_task(async move {
                        handle.run_scheduler().await;
                    });
                }
            }
            (true, false) => {
                self.shared.queue.set_open(false);
                self.set_state(ActorState::Stopping);
                self.shared.notify.notify_one();
            }
            (true, true) => {
                tracing::debug!("hot-swapped reactor without closing the mailbox");
            }
            (false, false) => {}
        }
    }

    /// Constructs a new actor bound to the same loop as this one. Loop-thread
    /// only.
    pub fn spawn<E2: Event>(&self) -> Actor<E2> {
        self.assert_loop_thread();
        self.shared.ctx.spawn::<E2>()
    }

    /// Cumulative nanoseconds spent inside [`Stateful::trigger`] for this
    /// actor across its lifetime (spec.md §3 names this counter in
    /// nanoseconds; this returns that counter directly rather than the
    /// coarser millisecond figure spec.md §4.4 mentions in prose, since
    /// nanosecond precision is what makes the accounting useful for
    /// short-lived batches).
    pub fn reactive_time(&self) -> u64 {
        self.shared.reactive_time.total_ns()
    }

    #[cfg(test)]
    pub(crate) fn stateful_for_test(&self) -> &Stateful<E> {
        &self.shared.stateful
    }

    async fn run_scheduler(self) {
        tracing::debug!("actor scheduler starting");
        loop {
            // Registering interest before inspecting the queue, rather than
            // after, means a `send`/`reset` that races with this turn is
            // never missed: `Notify::notified()` captures any `notify_one`
            // issued after this call even though we haven't awaited it yet.
            let notified = self.shared.notify.notified();

            let now = self.shared.clock.now_ms();
            let next = self.shared.queue.update(now);
            let batch = self.shared.queue.get_events();

            if !batch.is_empty() {
                let batch_len = batch.len();
                let start_ns = monotonic_ns();
                let outcome = self.shared.stateful.trigger(batch, &self);
                let end_ns = monotonic_ns();
                self.shared.reactive_time.record(start_ns, end_ns);
                tracing::trace!(batch_len, delivered = outcome.delivered, "batch processed");
                if let Some(err) = &outcome.error {
                    tracing::warn!(
                        discarded = outcome.discarded,
                        %err,
                        "reactor error truncated batch"
                    );
                }
            }

            if !self.shared.stateful.is_running() {
                break;
            }

            if next == 0 {
                notified.await;
            } else {
                let now = self.shared.clock.now_ms();
                let delay_ms = next.saturating_sub(now);
                tokio::select! {
                    _ = notified => {},
                    _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {},
                }
            }
        }

        self.set_state(ActorState::Closed);
        self.shared.ctx.actor_closed();
        tracing::debug!("actor scheduler closed");
    }
}

fn monotonic_ns() -> u64 {
    use std::sync::OnceLock;
    static EPOCH: OnceLock<std::time::Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(std::time::Instant::now);
    epoch.elapsed().as_nanos() as u64
}
