//! The context: a loop plus its worker OS thread (spec.md §4.5).
//!
//! A `Context` owns one per-OS-thread event loop (here, a single-threaded
//! `tokio` runtime) and is the factory for any number of actors bound to it.
//! Actors spawned on the same context run cooperatively on that one thread —
//! true parallelism only happens *across* contexts, matching spec.md §5's
//! "per-actor single-threaded cooperative execution on top of multi-threaded
//! loop workers".

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{JoinHandle, ThreadId};

use crate::actor::Actor;
use crate::error::RuntimeError;
use crate::event::Event;

struct ContextInner {
    runtime: Mutex<Option<tokio::runtime::Runtime>>,
    handle: tokio::runtime::Handle,
    active_actors: AtomicUsize,
    activity: tokio::sync::Notify,
    loop_thread_id: OnceLock<ThreadId>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_name: String,
}

/// A cheap, cloneable reference to a context, held by every actor bound to
/// it. Kept separate from [`Context`] so actors don't need to know about
/// `exec`/`wait`.
#[derive(Clone)]
pub(crate) struct ContextHandle {
    inner: Arc<ContextInner>,
}

impl ContextHandle {
    pub(crate) fn spawn<E: Event>(&self) -> Actor<E> {
        Actor::new(self.clone())
    }

    pub(crate) fn spawn_task<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner.handle.spawn(future);
    }

    pub(crate) fn actor_started(&self) {
        self.inner.active_actors.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn actor_closed(&self) {
        self.inner.active_actors.fetch_sub(1, Ordering::AcqRel);
        self.inner.activity.notify_one();
    }

    /// No-op (and no panic) before the loop has started running, since
    /// there's no "the loop thread" to compare against yet and setup before
    /// `exec` is inherently single-threaded. See mayastor's reactor core,
    /// which verifies thread affinity the same way: "This context is
    /// verified during run time, such that we can ensure... it is closed
    /// within the same context as it was opened with."
    pub(crate) fn assert_current_thread_is_loop_thread(&self) {
        if let Some(loop_thread) = self.inner.loop_thread_id.get() {
            debug_assert_eq!(
                *loop_thread,
                std::thread::current().id(),
                "called a loop-thread-only operation from outside the owning context's loop"
            );
        }
    }
}

/// A loop plus its worker OS thread; factory for actors bound to that loop.
pub struct Context {
    handle: ContextHandle,
}

impl Context {
    /// Creates a fresh loop, not yet running on any worker thread.
    pub fn new() -> Result<Self, RuntimeError> {
        Self::with_thread_name("actor-rt")
    }

    /// Same as [`new`](Context::new), naming the eventual worker OS thread
    /// (and the `tracing` spans emitted on it) with the given prefix.
    pub fn with_thread_name(thread_name: impl Into<String>) -> Result<Self, RuntimeError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(RuntimeError::LoopInit)?;
        let handle = runtime.handle().clone();
        Ok(Context {
            handle: ContextHandle {
                inner: Arc::new(ContextInner {
                    runtime: Mutex::new(Some(runtime)),
                    handle,
                    active_actors: AtomicUsize::new(0),
                    activity: tokio::sync::Notify::new(),
                    loop_thread_id: OnceLock::new(),
                    worker: Mutex::new(None),
                    thread_name: thread_name.into(),
                }),
            },
        })
    }

    /// Constructs an actor bound to this context's loop.
    ///
    /// May be called before [`exec`](Context::exec) — the actor stays
    /// dormant (no reactor installed, no loop handles armed) until
    /// [`reset`](crate::actor::Actor::reset) installs one.
    pub fn spawn<E: Event>(&self) -> Actor<E> {
        self.handle.spawn::<E>()
    }

    /// Starts a worker thread that runs this context's loop to completion,
    /// then closes it. The loop exits once every actor that was ever started
    /// on it (`Uninstalled -> Running`) has reached `Closed`.
    pub fn exec(&self) -> Result<(), RuntimeError> {
        let runtime = self
            .handle
            .inner
            .runtime
            .lock()
            .unwrap()
            .take()
            .expect("Context::exec called more than once");

        let inner = Arc::clone(&self.handle.inner);
        let builder = std::thread::Builder::new().name(inner.thread_name.clone());
        let join_handle = builder
            .spawn(move || {
                inner
                    .loop_thread_id
                    .set(std::thread::current().id())
                    .expect("loop thread id set twice");
                tracing::info!(thread = %inner.thread_name, "context loop starting");
                runtime.block_on(run_until_all_actors_closed(Arc::clone(&inner)));
                tracing::info!(thread = %inner.thread_name, "context loop stopped");
            })
            .map_err(RuntimeError::LoopInit)?;

        *self.handle.inner.worker.lock().unwrap() = Some(join_handle);
        Ok(())
    }

    /// Joins the worker thread started by [`exec`](Context::exec). Blocks
    /// the calling thread until the loop has exited.
    pub fn wait(&self) {
        let handle = self.handle.inner.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

async fn run_until_all_actors_closed(inner: Arc<ContextInner>) {
    loop {
        let notified = inner.activity.notified();
        if inner.active_actors.load(Ordering::Acquire) == 0 {
            break;
        }
        notified.await;
    }
}
