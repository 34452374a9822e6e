//! Vestibule Testkit - shared test tooling.
//!
//! Provides what the service crates' suites keep reaching for:
//!
//! - **Fixtures**: canned secrets, signers, and queue entries
//! - **Fault injection**: store/channel/flag wrappers that fail on command
//! - **Harness**: the full in-memory stack wired onto one manual clock
//! - **Tracing**: `Once`-guarded subscriber setup for test output

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod faults;
mod fixtures;
mod harness;
mod tracing_config;

pub use faults::*;
pub use fixtures::*;
pub use harness::*;
pub use tracing_config::*;
