//! Vestibule Channel - at-least-once delivery of "newly queued" notifications.
//!
//! The enqueue service publishes one [`QueueNotice`] per join; the admission
//! processor drains them in bounded batches and acknowledges the ones it has
//! fully handled. Delivery is at-least-once: a received message that is not
//! acknowledged within its visibility timeout is redelivered. Ordering within
//! a sequence group is best-effort and must not be relied on for correctness;
//! the consumer is idempotent and order-insensitive.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod channel;
mod error;
mod memory;

pub use channel::*;
pub use error::*;
pub use memory::*;
