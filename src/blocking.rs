//! Blocking terminal operations over a push-based source.
//!
//! [`Blocking`] wraps a [`Source`] and offers five ways to reduce its
//! emission to a single synchronous result:
//!
//! - [`collect_all`](Blocking::collect_all): every element, in order
//! - [`first`](Blocking::first): the first element, cancelling the rest
//! - [`last`](Blocking::last): the final element before completion
//! - [`exactly_one`](Blocking::exactly_one): the sole element, or an error
//! - [`exactly_one_matching`](Blocking::exactly_one_matching): the sole
//!   element satisfying a predicate
//!
//! Every operation opens a fresh [`Bridge`] over the source, consumes one
//! event per loop iteration on the calling thread, and disposes the
//! subscription on every exit path. The early-exiting policies (`first`
//! and the exactly-one pair) cancel as soon as their outcome is decided,
//! so an unbounded producer stops promptly.

use crate::bridge::Bridge;
use crate::error::{BlockingError, BlockingResult};
use crate::source::{Event, Source};

/// Blocking view over a source. The source is borrowed per operation, so
/// one `Blocking` can run several operations (each on a fresh
/// subscription).
pub struct Blocking<S> {
    source: S,
}

impl<S> Blocking<S>
where
    S: Source,
    S::Item: Send + 'static,
    S::Error: Send + 'static,
{
    /// Wrap a source for blocking consumption.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Drain the stream to completion and return every element in
    /// emission order. An empty stream yields an empty vec.
    pub fn collect_all(&self) -> BlockingResult<Vec<S::Item>, S::Error> {
        let mut bridge = Bridge::open(&self.source);
        let mut items = Vec::new();
        loop {
            match bridge.next() {
                Event::Next(value) => items.push(value),
                Event::Completed => return Ok(items),
                Event::Error(error) => return Err(BlockingError::Source(error)),
            }
        }
    }

    /// Return the first element and cancel the subscription, or `None` if
    /// the stream completes without elements.
    pub fn first(&self) -> BlockingResult<Option<S::Item>, S::Error> {
        let mut bridge = Bridge::open(&self.source);
        match bridge.next() {
            Event::Next(value) => {
                bridge.cancel();
                Ok(Some(value))
            }
            Event::Completed => Ok(None),
            Event::Error(error) => Err(BlockingError::Source(error)),
        }
    }

    /// Drain the stream and return the final element before completion,
    /// or `None` if there was none.
    pub fn last(&self) -> BlockingResult<Option<S::Item>, S::Error> {
        let mut bridge = Bridge::open(&self.source);
        let mut seen = None;
        loop {
            match bridge.next() {
                Event::Next(value) => seen = Some(value),
                Event::Completed => return Ok(seen),
                Event::Error(error) => return Err(BlockingError::Source(error)),
            }
        }
    }

    /// Return the stream's sole element. Fails with
    /// [`BlockingError::NoElements`] on an empty stream and with
    /// [`BlockingError::MoreThanOneElement`] as soon as a second element
    /// arrives (cancelling the subscription without waiting for
    /// completion).
    pub fn exactly_one(&self) -> BlockingResult<S::Item, S::Error> {
        self.exactly_one_matching(|_| Ok(true))
    }

    /// Return the sole element for which `predicate` returns `Ok(true)`.
    ///
    /// The predicate runs on the calling thread, in emission order,
    /// exactly once per element up to and including the element that
    /// decides the outcome; elements past that point are never evaluated
    /// because the subscription is already cancelled. A predicate error
    /// cancels the subscription and surfaces as
    /// [`BlockingError::Predicate`].
    pub fn exactly_one_matching<P>(&self, mut predicate: P) -> BlockingResult<S::Item, S::Error>
    where
        P: FnMut(&S::Item) -> Result<bool, S::Error>,
    {
        let mut bridge = Bridge::open(&self.source);
        let mut matched = None;
        loop {
            match bridge.next() {
                Event::Next(value) => match predicate(&value) {
                    Ok(true) => {
                        if matched.is_some() {
                            bridge.cancel();
                            return Err(BlockingError::MoreThanOneElement);
                        }
                        matched = Some(value);
                    }
                    Ok(false) => {}
                    Err(error) => {
                        bridge.cancel();
                        return Err(BlockingError::Predicate(error));
                    }
                },
                Event::Completed => return matched.ok_or(BlockingError::NoElements),
                Event::Error(error) => return Err(BlockingError::Source(error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::constructors;

    #[test]
    fn test_collect_all_preserves_order() {
        let blocking = Blocking::new(constructors::from_vec::<i32, String>(vec![42, 43, 44]));
        assert_eq!(blocking.collect_all().unwrap(), vec![42, 43, 44]);
    }

    #[test]
    fn test_exactly_one_singleton() {
        let blocking = Blocking::new(constructors::just::<i32, String>(42));
        assert_eq!(blocking.exactly_one().unwrap(), 42);
    }

    #[test]
    fn test_exactly_one_rejects_pairs() {
        let blocking = Blocking::new(constructors::from_vec::<i32, String>(vec![42, 43]));
        assert_eq!(
            blocking.exactly_one(),
            Err(BlockingError::MoreThanOneElement)
        );
    }

    #[test]
    fn test_operations_resubscribe() {
        // Each operation gets its own subscription over the same source.
        let blocking = Blocking::new(constructors::from_vec::<i32, String>(vec![1, 2, 3]));
        assert_eq!(blocking.first().unwrap(), Some(1));
        assert_eq!(blocking.last().unwrap(), Some(3));
        assert_eq!(blocking.collect_all().unwrap(), vec![1, 2, 3]);
    }
}
