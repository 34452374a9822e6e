//! Vestibule Store - durable queue-entry and counter storage.
//!
//! This crate defines the [`TicketStore`] interface the rest of the system
//! writes through, an in-memory implementation with TTL expiry suitable for
//! tests and single-node deployments, and the [`Sequencer`] that issues
//! globally ordered ticket numbers.
//!
//! # Design Principles
//!
//! 1. **One atomic primitive**: the counter increment is the only operation
//!    requiring linearizability; everything else is an idempotent conditional
//!    write.
//!
//! 2. **Absence is not an error**: an entry that expired out of the store is
//!    reported as missing, never as a failure.
//!
//! 3. **Transient failure is its own channel**: [`PromoteOutcome`] carries
//!    the condition verdicts, `Err(StoreError)` carries everything retryable.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod memory;
mod sequencer;
mod ticket_store;

pub use error::*;
pub use memory::*;
pub use sequencer::*;
pub use ticket_store::*;
