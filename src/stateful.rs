//! The stateful container (spec.md §4.3): holds zero or one reactor and
//! sequences a batch of events through it while tolerating reactor-initiated
//! hot-swap, stop, and error.
//!
//! All operations here are loop-thread-only by contract (enforced by
//! [`Actor`](crate::actor::Actor), not by this type itself) so a plain
//! `RefCell`/`Cell` pair is enough; no locking is needed on the hot path.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use crate::actor::ActorHandle;
use crate::error::BatchOutcome;
use crate::event::{Event, TimedEvent};
use crate::reactor::Reactor;

/// Holds the currently installed reactor for one actor.
pub struct Stateful<E: Event> {
    reactor: RefCell<Option<Box<dyn Reactor<E>>>>,
    /// Bumped on every `install`, including hot-swaps to an equivalent
    /// reactor. Used instead of comparing trait-object identity to detect,
    /// from inside `trigger`, that a reset happened mid-batch.
    generation: Cell<u64>,
}

impl<E: Event> Stateful<E> {
    /// Creates an empty (not running) container.
    pub fn new() -> Self {
        Stateful {
            reactor: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// `is_running()` ≡ a reactor is currently installed.
    pub fn is_running(&self) -> bool {
        self.reactor.borrow().is_some()
    }

    /// Installs `new` (replacing whatever was there, possibly nothing),
    /// returning whether a reactor was installed *before* this call.
    ///
    /// Safe to call reentrantly from inside [`trigger`](Stateful::trigger) —
    /// see that method's implementation for how it avoids a double
    /// `RefCell` borrow.
    pub fn install(&self, new: Option<Box<dyn Reactor<E>>>) -> bool {
        let was_running = self.is_running();
        *self.reactor.borrow_mut() = new;
        self.generation.set(self.generation.get().wrapping_add(1));
        was_running
    }

    /// Delivers `events` to the currently installed reactor(s), in order,
    /// per the batch algorithm of spec.md §4.3:
    ///
    /// 1. If no reactor is installed, stop — remaining events are not
    ///    delivered (and not counted as an error).
    /// 2. Capture the reactor identity before delivering.
    /// 3. Deliver sequentially until events are exhausted, the reactor
    ///    changed (hot-swap or stop, detected via the `reset` generation
    ///    counter), or `react` returns an error.
    /// 4. On error, discard the remainder of the events destined for the
    ///    faulting reactor and propagate the error upward via the returned
    ///    [`BatchOutcome`].
    /// 5. On a reactor change mid-batch, resume from step 2 with whatever is
    ///    now installed and the remaining events — previously-delivered
    ///    events are never replayed.
    pub fn trigger(&self, events: Vec<TimedEvent<E>>, actor: &ActorHandle<E>) -> BatchOutcome {
        let total = events.len();
        let mut events = events.into_iter();
        let mut delivered = 0usize;
        let mut error = None;

        'batch: loop {
            let generation_at_start = self.generation.get();

            // Take the reactor out of the `RefCell` for the duration of its
            // sub-run: `react` may call back into `reset`, which needs its
            // own mutable borrow of this same cell. Holding no borrow here
            // lets that reentrant call through; we decide afterwards,
            // looking at the generation counter, whether to put this exact
            // reactor back or leave whatever `reset` installed in its place.
            let mut reactor = match self.reactor.borrow_mut().take() {
                Some(reactor) => reactor,
                None => break 'batch,
            };

            loop {
                let timed = match events.next() {
                    Some(timed) => timed,
                    None => {
                        *self.reactor.borrow_mut() = Some(reactor);
                        break 'batch;
                    }
                };

                match reactor.react(Arc::clone(&timed.event), timed.deadline, actor) {
                    Ok(()) => delivered += 1,
                    Err(err) => {
                        delivered += 1;
                        error = Some(err);
                        *self.reactor.borrow_mut() = Some(reactor);
                        break 'batch;
                    }
                }

                if self.generation.get() != generation_at_start {
                    // `reset` ran during `react`, either to a different
                    // reactor or to none. It already installed the
                    // replacement directly; our local `reactor` is stale and
                    // must not be put back.
                    continue 'batch;
                }
            }
        }

        BatchOutcome {
            delivered,
            discarded: total - delivered,
            error,
        }
    }
}

impl<E: Event> Default for Stateful<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::context::Context;
    use std::cell::RefCell as StdRefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Probe(u32);
    impl Event for Probe {
        fn type_tag(&self) -> u32 {
            self.0
        }
    }

    fn dummy_actor_handle() -> ActorHandle<Probe> {
        let ctx = Context::new().expect("context");
        ctx.spawn::<Probe>()
    }

    fn timed(tag: u32) -> TimedEvent<Probe> {
        TimedEvent::new(Arc::new(Probe(tag)), 0)
    }

    struct RecordingReactor {
        seen: Rc<StdRefCell<Vec<u32>>>,
    }
    impl Reactor<Probe> for RecordingReactor {
        fn react(
            &mut self,
            event: Arc<Probe>,
            _timestamp_ms: u64,
            _actor: &ActorHandle<Probe>,
        ) -> Result<(), crate::error::ReactorError> {
            self.seen.borrow_mut().push(event.0);
            Ok(())
        }
    }

    #[test]
    fn stopped_container_delivers_nothing() {
        let stateful = Stateful::new();
        let actor = dummy_actor_handle();
        let outcome = stateful.trigger(vec![timed(1), timed(2)], &actor);
        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.discarded, 2);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn delivers_in_order_to_installed_reactor() {
        let stateful: Stateful<Probe> = Stateful::new();
        let seen = Rc::new(StdRefCell::new(Vec::new()));
        stateful.install(Some(Box::new(RecordingReactor { seen: seen.clone() })));
        let actor = dummy_actor_handle();
        let outcome = stateful.trigger(vec![timed(1), timed(2), timed(3)], &actor);
        assert_eq!(outcome.delivered, 3);
        assert_eq!(outcome.discarded, 0);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    struct ErroringReactor {
        seen: Rc<StdRefCell<Vec<u32>>>,
        fail_on: u32,
    }
    impl Reactor<Probe> for ErroringReactor {
        fn react(
            &mut self,
            event: Arc<Probe>,
            _timestamp_ms: u64,
            _actor: &ActorHandle<Probe>,
        ) -> Result<(), crate::error::ReactorError> {
            self.seen.borrow_mut().push(event.0);
            if event.0 == self.fail_on {
                return Err("boom".into());
            }
            Ok(())
        }
    }

    #[test]
    fn error_truncates_remainder_of_batch() {
        let stateful: Stateful<Probe> = Stateful::new();
        let seen = Rc::new(StdRefCell::new(Vec::new()));
        stateful.install(Some(Box::new(ErroringReactor {
            seen: seen.clone(),
            fail_on: 2,
        })));
        let actor = dummy_actor_handle();
        let outcome = stateful.trigger(vec![timed(1), timed(2), timed(3), timed(4)], &actor);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(outcome.delivered, 2);
        assert_eq!(outcome.discarded, 2);
        assert!(outcome.error.is_some());
        // The reactor stays installed after an error within the batch.
        assert!(stateful.is_running());
    }

    struct SwappingReactor {
        seen: Rc<StdRefCell<Vec<u32>>>,
        swap_on: u32,
        next_seen: Rc<StdRefCell<Vec<u32>>>,
    }
    impl Reactor<Probe> for SwappingReactor {
        fn react(
            &mut self,
            event: Arc<Probe>,
            _timestamp_ms: u64,
            actor: &ActorHandle<Probe>,
        ) -> Result<(), crate::error::ReactorError> {
            self.seen.borrow_mut().push(event.0);
            if event.0 == self.swap_on {
                actor.reset(Some(Box::new(RecordingReactor {
                    seen: self.next_seen.clone(),
                })));
            }
            Ok(())
        }
    }

    #[test]
    fn hot_swap_mid_batch_does_not_replay_triggering_event() {
        // `SwappingReactor` calls back into `actor.reset`, which mutates
        // `actor`'s own `Stateful` container — so the container under test
        // has to be the actor's, not a disconnected standalone one.
        let actor = dummy_actor_handle();
        let first_seen = Rc::new(StdRefCell::new(Vec::new()));
        let second_seen = Rc::new(StdRefCell::new(Vec::new()));
        actor.reset(Some(Box::new(SwappingReactor {
            seen: first_seen.clone(),
            swap_on: 2,
            next_seen: second_seen.clone(),
        })));

        let stateful = actor.stateful_for_test();
        let outcome = stateful.trigger(vec![timed(1), timed(2), timed(3)], &actor);
        assert_eq!(outcome.delivered, 3);
        assert_eq!(*first_seen.borrow(), vec![1, 2]);
        assert_eq!(*second_seen.borrow(), vec![3]);
    }
}
