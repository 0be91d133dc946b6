//! The push-based stream boundary.
//!
//! This module defines the contract the blocking bridge consumes:
//! - [`Event`]: the three stream notifications (`Next`, `Error`,
//!   `Completed`)
//! - [`Observer`]: the three-callback receiver handed to a stream
//! - [`Source`]: anything that can be subscribed to
//! - [`Subscription`]: the one-shot dispose handle for an active link
//!
//! [`constructors`] provides reference sources (finite replays, timed and
//! infinite producers) used by the tests and benches.
//!
//! # Example
//!
//! ```ignore
//! let source = constructors::from_vec::<i32, String>(vec![1, 2, 3]);
//! let sub = source.subscribe(Box::new(my_observer));
//! // ... events arrive on my_observer, from the producer's thread ...
//! sub.dispose();
//! ```

pub mod constructors;
mod types;

pub use types::{Event, Observer, Source, Subscription};
