//! Boundary types for push-based event streams.

use parking_lot::Mutex;
use tracing::trace;

/// A single stream notification.
///
/// A well-behaved producer emits zero or more `Next` events followed by at
/// most one terminal event (`Error` or `Completed`), and nothing after
/// that. Consumers must not rely on producers behaving; the bridge drops
/// anything it receives after a terminal event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<T, E> {
    /// An element of the stream.
    Next(T),
    /// The stream failed. Terminal.
    Error(E),
    /// The stream finished normally. Terminal.
    Completed,
}

impl<T, E> Event<T, E> {
    /// Whether this event permanently ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Error(_) | Event::Completed)
    }
}

/// Receiver side of a stream: three callbacks, invoked by the producer on
/// whatever thread it runs on.
///
/// The stream guarantees at most one of `on_error`/`on_completed` is ever
/// invoked, never after the other, and never followed by further
/// `on_next`. Emissions for one subscription are serialized upstream; a
/// callback may block (e.g. waiting for the consumer) and the producer
/// must tolerate that.
pub trait Observer<T, E>: Send {
    /// An element was produced.
    fn on_next(&self, value: T);
    /// The stream failed. No further callbacks follow.
    fn on_error(&self, error: E);
    /// The stream finished normally. No further callbacks follow.
    fn on_completed(&self);
}

/// A push-based event stream that can be observed.
///
/// `subscribe` installs the observer and returns immediately; it never
/// blocks the subscriber. Each call starts an independent emission (the
/// stream is re-subscribable).
pub trait Source {
    /// Element type of the stream.
    type Item;
    /// Error type of the stream.
    type Error;

    /// Attach an observer, returning the handle that releases whatever
    /// producer-side resources the subscription holds.
    fn subscribe(
        &self,
        observer: Box<dyn Observer<Self::Item, Self::Error>>,
    ) -> Subscription;
}

/// Handle to an active subscription.
///
/// Owns a one-shot release action (stop a producer thread, cancel a timer,
/// drop an upstream link). `dispose` runs it at most once; later calls are
/// no-ops.
pub struct Subscription {
    release: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    /// Wrap a release action.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Release the producer-side resources. Idempotent.
    pub fn dispose(&self) {
        let release = self.release.lock().take();
        if let Some(release) = release {
            trace!("disposing subscription");
            release();
        }
    }

    /// Whether the release action has already run (or never existed).
    pub fn is_disposed(&self) -> bool {
        self.release.lock().is_none()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
