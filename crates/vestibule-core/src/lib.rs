//! Vestibule Core - domain types for the virtual waiting room.
//!
//! This crate provides the vocabulary shared by every other vestibule crate:
//!
//! - **Identity**: [`Token`] (opaque client-facing identifier) and
//!   [`TicketNumber`] (globally ordered queue position)
//! - **State**: [`QueueEntry`] and its [`EntryStatus`] machine
//! - **Ordering**: [`CounterRecord`] with the issue and now-serving watermarks
//! - **Time**: the injectable [`Clock`] abstraction
//! - **Configuration**: [`QueueConfig`] defaults shared by the services

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod clock;
mod config;
mod counter;
mod entry;
mod ticket;
mod token;

pub use clock::*;
pub use config::*;
pub use counter::*;
pub use entry::*;
pub use ticket::*;
pub use token::*;

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
