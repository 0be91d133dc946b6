//! # Stillwater
//!
//! A blocking bridge for push-based event streams: obtain a single result
//! (or error) on an ordinary synchronous call stack from a stream that
//! emits asynchronously, possibly from another thread, over an unbounded
//! time horizon.
//!
//! ## Core Concepts
//!
//! - **Source**: an external push-based stream of `Next`/`Error`/
//!   `Completed` notifications, observed via three callbacks
//! - **Bridge**: the synchronization adapter turning pushes into blocking
//!   pulls, one event in flight at a time, in emission order
//! - **Blocking operations**: five terminal policies (collect-all,
//!   first, last, exactly-one, exactly-one-matching), each returning one
//!   value or one error, with the subscription disposed on every exit
//!   path
//!
//! ## Example
//!
//! ```
//! use stillwater::{source::constructors, Blocking};
//!
//! let numbers = Blocking::new(constructors::from_vec::<i32, String>(vec![42, 43, 44]));
//!
//! assert_eq!(numbers.collect_all().unwrap(), vec![42, 43, 44]);
//! assert_eq!(numbers.first().unwrap(), Some(42));
//! assert_eq!(numbers.last().unwrap(), Some(44));
//!
//! let lone = numbers.exactly_one_matching(|v| Ok(*v == 43)).unwrap();
//! assert_eq!(lone, 43);
//! ```

pub mod blocking;
pub mod bridge;
pub mod error;
pub mod source;

// Re-exports
pub use blocking::Blocking;
pub use bridge::Bridge;
pub use error::{BlockingError, BlockingResult};
pub use source::{Event, Observer, Source, Subscription};
