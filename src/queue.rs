//! The per-actor mailbox (spec.md §4.2): a ready FIFO plus a waiting list
//! sorted by deadline, behind a single mutex, with an open/closed gate.
//!
//! A single mutex is sufficient here: the consumer is always one thread (the
//! owning actor's loop thread) and every critical section is either a
//! `VecDeque` push/pop, a sorted-vector insert, or a buffer swap — never a
//! reactor call (spec.md §4.2, "Design rationale").

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::event::TimedEvent;

struct QueueState<E: ?Sized> {
    open: bool,
    ready: VecDeque<TimedEvent<E>>,
    waiting: Vec<TimedEvent<E>>,
}

impl<E: ?Sized> QueueState<E> {
    fn new() -> Self {
        QueueState {
            open: false,
            ready: VecDeque::new(),
            waiting: Vec::new(),
        }
    }
}

/// Thread-safe mailbox for one actor.
///
/// Producers on any thread call [`add_ready`](Queue::add_ready) and
/// [`add_waiting`](Queue::add_waiting); only the owning actor's loop thread
/// calls [`get_events`](Queue::get_events) and [`update`](Queue::update).
pub struct Queue<E: ?Sized> {
    state: Mutex<QueueState<E>>,
}

impl<E: ?Sized> Queue<E> {
    /// Creates a new, closed, empty queue.
    pub fn new() -> Self {
        Queue {
            state: Mutex::new(QueueState::new()),
        }
    }

    /// Whether the mailbox is currently accepting events.
    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    /// Opens or closes the mailbox gate.
    ///
    /// The only legal way to clear the mailbox: if the requested state
    /// differs from the current one, both sequences are cleared and `open`
    /// is set to `v`. Toggling to the same state is a no-op and does not
    /// clear anything.
    pub fn set_open(&self, v: bool) {
        let mut state = self.state.lock().unwrap();
        if state.open != v {
            state.ready.clear();
            state.waiting.clear();
            state.open = v;
        }
    }

    /// Appends an immediately-ready event. Returns `false` (no-op) if the
    /// queue is closed.
    pub fn add_ready(&self, event: TimedEvent<E>) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return false;
        }
        state.ready.push_back(event);
        true
    }

    /// Inserts a future-deadline event, preserving the non-decreasing
    /// deadline invariant of `waiting`. Returns `false` (no-op) if the queue
    /// is closed; otherwise returns `true` iff the inserted event became the
    /// new head (the minimum deadline), which tells the caller whether the
    /// consumer's timer needs reprogramming.
    pub fn add_waiting(&self, event: TimedEvent<E>) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return false;
        }
        // First index whose deadline is strictly greater than the new
        // event's — i.e. insert after any existing equal-deadline entries,
        // preserving insertion-order ties (spec.md §5).
        let pos = state
            .waiting
            .partition_point(|existing| existing.deadline <= event.deadline);
        state.waiting.insert(pos, event);
        pos == 0
    }

    /// Atomically moves the entire ready sequence out, leaving `ready`
    /// empty. Named after spec.md's `get_events`.
    pub fn get_events(&self) -> Vec<TimedEvent<E>> {
        let mut state = self.state.lock().unwrap();
        std::mem::take(&mut state.ready).into_iter().collect()
    }

    /// Moves every head of `waiting` whose deadline is `<= now` to the tail
    /// of `ready`, preserving relative order. Returns the deadline of the new
    /// head of `waiting`, or `0` if `waiting` is now empty.
    pub fn update(&self, now: u64) -> u64 {
        let mut state = self.state.lock().unwrap();
        let split = state
            .waiting
            .partition_point(|timed| timed.deadline <= now);
        if split > 0 {
            let due: Vec<_> = state.waiting.drain(..split).collect();
            state.ready.extend(due);
        }
        state.waiting.first().map(|t| t.deadline).unwrap_or(0)
    }
}

impl<E: ?Sized> Default for Queue<E> {
    fn default() -> Self {
        Self::new()
    }
}
