//! Reference sources for driving the blocking operations.
//!
//! These cover the shapes the terminal policies care about: finite
//! replays, immediate termination, and timed producers running on their
//! own thread. Real applications plug in their own [`Source`]
//! implementations; these exist for tests, examples, and benches.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::trace;

use super::types::{Observer, Source, Subscription};

/// A source that replays a fixed script from a spawned producer thread:
/// the items in order, then one terminal event.
///
/// Each `subscribe` call starts an independent producer thread. The thread
/// checks its cancellation flag between emissions, so disposing the
/// subscription stops it promptly; a push already in flight when the flag
/// is raised simply completes as a discarded no-op.
pub struct Replay<T, E> {
    items: Vec<T>,
    fail_with: Option<E>,
    period: Option<Duration>,
}

/// Completes immediately with no elements.
pub fn empty<T, E>() -> Replay<T, E> {
    Replay {
        items: Vec::new(),
        fail_with: None,
        period: None,
    }
}

/// Emits one element, then completes.
pub fn just<T, E>(value: T) -> Replay<T, E> {
    from_vec(vec![value])
}

/// Emits the items in order, then completes.
pub fn from_vec<T, E>(items: Vec<T>) -> Replay<T, E> {
    Replay {
        items,
        fail_with: None,
        period: None,
    }
}

/// Terminates with the given error, emitting nothing.
pub fn fail<T, E>(error: E) -> Replay<T, E> {
    Replay {
        items: Vec::new(),
        fail_with: Some(error),
        period: None,
    }
}

/// Emits the items in order with `period` between emissions, then
/// completes. A finite timed producer.
pub fn timed<T, E>(items: Vec<T>, period: Duration) -> Replay<T, E> {
    Replay {
        items,
        fail_with: None,
        period: Some(period),
    }
}

impl<T, E> Source for Replay<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe(&self, observer: Box<dyn Observer<T, E>>) -> Subscription {
        let items = self.items.clone();
        let fail_with = self.fail_with.clone();
        let period = self.period;

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || {
            for value in items {
                if flag.load(Ordering::Acquire) {
                    return;
                }
                if let Some(period) = period {
                    thread::sleep(period);
                }
                observer.on_next(value);
            }
            if flag.load(Ordering::Acquire) {
                return;
            }
            match fail_with {
                Some(error) => observer.on_error(error),
                None => observer.on_completed(),
            }
        });

        Subscription::new(move || {
            cancelled.store(true, Ordering::Release);
        })
    }
}

/// An infinite counter: emits `0, 1, 2, ...` every `period` from a
/// producer thread, forever. Stops only when its subscription is
/// disposed, so it exercises early-cancelling policies against an
/// unbounded stream.
pub struct Interval<E> {
    period: Duration,
    _marker: PhantomData<fn() -> E>,
}

/// An infinite `u64` counter ticking every `period`.
pub fn interval<E>(period: Duration) -> Interval<E> {
    Interval {
        period,
        _marker: PhantomData,
    }
}

impl<E: 'static> Source for Interval<E> {
    type Item = u64;
    type Error = E;

    fn subscribe(&self, observer: Box<dyn Observer<u64, E>>) -> Subscription {
        let period = self.period;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || {
            let mut tick = 0u64;
            loop {
                thread::sleep(period);
                if flag.load(Ordering::Acquire) {
                    trace!(tick, "interval producer stopping");
                    return;
                }
                observer.on_next(tick);
                tick += 1;
            }
        });

        Subscription::new(move || {
            cancelled.store(true, Ordering::Release);
        })
    }
}
