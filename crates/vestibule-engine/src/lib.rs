//! Vestibule Engine - the queue admission engine.
//!
//! Three services over the store and channel interfaces:
//!
//! - [`EnqueueService`]: accepts a join, issues a ticket, writes the entry,
//!   publishes the notice
//! - [`AdmissionProcessor`]: drains bounded batches from the channel and
//!   promotes waiting entries, idempotently
//! - [`StatusService`]: reports a token's state and computed queue position
//!
//! Every state transition here is designed to be retried: promotion is a
//! conditional write, acknowledgment is idempotent, and redelivery is
//! expected rather than exceptional.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod admission;
mod enqueue;
mod error;
mod status;

pub use admission::*;
pub use enqueue::*;
pub use error::*;
pub use status::*;
