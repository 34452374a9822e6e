//! Vestibule Flags - the remote "waiting room enabled" switch.
//!
//! The switch lives in a remote flag store and is consumed from two trust
//! domains with different policies:
//!
//! - the **enqueue service** reads it fresh on every join (no cache), and
//! - the **gatekeeper** reads it through a per-process [`FlagCache`] that
//!   fails open: on a fetch failure the waiting room is treated as disabled
//!   rather than locking traffic out.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod cache;
mod error;
mod store;

pub use cache::*;
pub use error::*;
pub use store::*;
