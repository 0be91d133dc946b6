//! The subscription bridge: push-based emission in, blocking pulls out.
//!
//! A [`Bridge`] subscribes a channel-backed observer to a [`Source`] and
//! hands events to the calling thread one at a time, in emission order,
//! through a rendezvous slot holding at most one event in flight. The
//! producer blocks in its push while the previous event is unconsumed,
//! which is what makes the hand-off lossless without any queueing.
//!
//! The bridge owns the subscription lifecycle: the underlying
//! [`Subscription`] is disposed exactly once, either when a terminal event
//! reaches the consumer or on the first [`Bridge::cancel`], whichever
//! comes first.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, trace};

use crate::source::{Event, Observer, Source, Subscription};

/// At most one event in flight between producer and consumer.
const SLOT_CAPACITY: usize = 1;

/// Producer-side half: forwards callbacks into the slot, latching on the
/// first terminal event so anything a misbehaving producer emits after it
/// is silently dropped.
struct BridgeObserver<T, E> {
    slot: Sender<Event<T, E>>,
    terminated: AtomicBool,
}

impl<T, E> BridgeObserver<T, E> {
    fn push(&self, event: Event<T, E>) {
        // A send failure means the consumer cancelled; the event is
        // discarded, which is the cooperative-cancellation contract.
        let _ = self.slot.send(event);
    }
}

impl<T: Send, E: Send> Observer<T, E> for BridgeObserver<T, E> {
    fn on_next(&self, value: T) {
        if self.terminated.load(Ordering::Acquire) {
            trace!("dropping element emitted after a terminal event");
            return;
        }
        self.push(Event::Next(value));
    }

    fn on_error(&self, error: E) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            trace!("dropping duplicate terminal event");
            return;
        }
        self.push(Event::Error(error));
    }

    fn on_completed(&self) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            trace!("dropping duplicate terminal event");
            return;
        }
        self.push(Event::Completed);
    }
}

/// Blocking consumer end of one subscription.
///
/// Owned by a single calling thread; `next` is the only operation that
/// blocks.
pub struct Bridge<T, E> {
    slot: Option<Receiver<Event<T, E>>>,
    subscription: Subscription,
    ended: bool,
}

impl<T: Send + 'static, E: Send + 'static> Bridge<T, E> {
    /// Subscribe to `source` and return the consumer handle. Installs the
    /// observer and returns immediately; never blocks.
    pub fn open<S>(source: &S) -> Self
    where
        S: Source<Item = T, Error = E> + ?Sized,
    {
        let (tx, rx) = bounded(SLOT_CAPACITY);
        let subscription = source.subscribe(Box::new(BridgeObserver {
            slot: tx,
            terminated: AtomicBool::new(false),
        }));
        trace!("bridge opened");
        Self {
            slot: Some(rx),
            subscription,
            ended: false,
        }
    }

    /// Block until the next event is available and return it, in the exact
    /// order the producer emitted. A terminal event disposes the
    /// subscription before it is returned.
    ///
    /// A producer that drops its observer without ever emitting a terminal
    /// event is treated as a normal completion.
    ///
    /// # Panics
    ///
    /// Calling `next` again after a terminal event has been returned, or
    /// after [`cancel`](Bridge::cancel), is a caller logic error and
    /// panics.
    pub fn next(&mut self) -> Event<T, E> {
        assert!(
            !self.ended,
            "Bridge::next called after a terminal event was already consumed"
        );
        let slot = self
            .slot
            .as_ref()
            .expect("Bridge::next called after cancel");

        let event = match slot.recv() {
            Ok(event) => event,
            // All senders gone without a terminal event: the producer
            // abandoned the stream. Treat as completion.
            Err(_) => Event::Completed,
        };

        if event.is_terminal() {
            trace!("terminal event reached the consumer");
            self.ended = true;
            self.subscription.dispose();
        }
        event
    }

    /// Stop the subscription early. Idempotent; callable at any point,
    /// including before any event has arrived.
    ///
    /// Dropping the consumer half of the slot first releases a producer
    /// that is blocked mid-push (its event is discarded); disposing the
    /// subscription then stops the producer at its next cancellation
    /// check. Nothing here waits on the producer, so this cannot deadlock
    /// against an in-flight emission.
    pub fn cancel(&mut self) {
        if self.slot.take().is_some() {
            debug!("cancelling bridge");
        }
        self.subscription.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    use crate::source::constructors;

    /// Subscribes but never emits anything.
    struct Silent;

    impl Source for Silent {
        type Item = i32;
        type Error = String;

        fn subscribe(&self, observer: Box<dyn Observer<i32, String>>) -> Subscription {
            // Dropping the observer would read as completion, so park it
            // inside the release action instead.
            let observer = parking_lot::Mutex::new(Some(observer));
            Subscription::new(move || {
                drop(observer.lock().take());
            })
        }
    }

    /// Drops the observer immediately without any terminal event.
    struct Abandons;

    impl Source for Abandons {
        type Item = i32;
        type Error = String;

        fn subscribe(&self, observer: Box<dyn Observer<i32, String>>) -> Subscription {
            drop(observer);
            Subscription::empty()
        }
    }

    /// Emits a full script and then keeps emitting after the terminal
    /// event, violating the stream contract.
    struct Misbehaves;

    impl Source for Misbehaves {
        type Item = i32;
        type Error = String;

        fn subscribe(&self, observer: Box<dyn Observer<i32, String>>) -> Subscription {
            thread::spawn(move || {
                observer.on_next(1);
                observer.on_completed();
                observer.on_next(2);
                observer.on_completed();
                observer.on_error("late".to_string());
            });
            Subscription::empty()
        }
    }

    /// Counts how many times its release action runs.
    struct Counted {
        releases: Arc<AtomicUsize>,
    }

    impl Source for Counted {
        type Item = i32;
        type Error = String;

        fn subscribe(&self, observer: Box<dyn Observer<i32, String>>) -> Subscription {
            thread::spawn(move || {
                observer.on_next(7);
                observer.on_completed();
            });
            let releases = Arc::clone(&self.releases);
            Subscription::new(move || {
                releases.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    fn drain(bridge: &mut Bridge<i32, String>) -> Vec<Event<i32, String>> {
        let mut events = Vec::new();
        loop {
            let event = bridge.next();
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                return events;
            }
        }
    }

    #[test]
    fn test_events_arrive_in_emission_order() {
        let source = constructors::from_vec::<i32, String>((0..100).collect());
        let mut bridge = Bridge::open(&source);

        let events = drain(&mut bridge);
        assert_eq!(events.len(), 101);
        for (i, event) in events.iter().take(100).enumerate() {
            assert_eq!(*event, Event::Next(i as i32));
        }
        assert_eq!(events[100], Event::Completed);
    }

    #[test]
    fn test_error_passes_through() {
        let source = constructors::fail::<i32, String>("boom".to_string());
        let mut bridge = Bridge::open(&source);
        assert_eq!(bridge.next(), Event::Error("boom".to_string()));
    }

    #[test]
    fn test_open_does_not_block() {
        let mut bridge = Bridge::open(&Silent);
        bridge.cancel();
    }

    #[test]
    fn test_abandoned_stream_completes() {
        let mut bridge = Bridge::open(&Abandons);
        assert_eq!(bridge.next(), Event::Completed);
    }

    #[test]
    fn test_late_emissions_are_dropped() {
        let mut bridge = Bridge::open(&Misbehaves);
        assert_eq!(bridge.next(), Event::Next(1));
        assert_eq!(bridge.next(), Event::Completed);
        // The trailing on_next/on_completed/on_error must neither crash the
        // producer thread nor resurrect the stream.
    }

    #[test]
    fn test_terminal_disposes_subscription_once() {
        let releases = Arc::new(AtomicUsize::new(0));
        let source = Counted {
            releases: Arc::clone(&releases),
        };

        let mut bridge = Bridge::open(&source);
        assert_eq!(bridge.next(), Event::Next(7));
        assert_eq!(bridge.next(), Event::Completed);
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        // Cancelling after the terminal event must not release again.
        bridge.cancel();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let releases = Arc::new(AtomicUsize::new(0));
        let source = Counted {
            releases: Arc::clone(&releases),
        };

        let mut bridge = Bridge::open(&source);
        bridge.cancel();
        bridge.cancel();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_releases_blocked_producer() {
        // 1000 items against a depth-one slot: the producer is guaranteed
        // to be blocked mid-push when the cancel lands.
        let source = constructors::from_vec::<i32, String>((0..1000).collect());
        let mut bridge = Bridge::open(&source);
        assert_eq!(bridge.next(), Event::Next(0));
        bridge.cancel();
        // Nothing to assert beyond returning: a deadlock here would hang
        // the test.
    }

    #[test]
    #[should_panic(expected = "after a terminal event")]
    fn test_next_after_terminal_panics() {
        let source = constructors::empty::<i32, String>();
        let mut bridge = Bridge::open(&source);
        assert_eq!(bridge.next(), Event::Completed);
        bridge.next();
    }

    #[test]
    #[should_panic(expected = "after cancel")]
    fn test_next_after_cancel_panics() {
        let source = constructors::empty::<i32, String>();
        let mut bridge = Bridge::open(&source);
        bridge.cancel();
        bridge.next();
    }
}
