//! Vestibule Gate - the gatekeeper in front of the protected resource.
//!
//! The gatekeeper sees every inbound request and answers one question: does
//! this request get through? The answer depends on the cached waiting-room
//! flag and on whether the requester already holds a valid pass, carried
//! either as a cookie or as a one-time URL parameter. Everything that can go
//! wrong here resolves toward traffic flowing: a flag outage fails open, a
//! bad pass is "no pass", and the worst outcome is a redirect to the queue.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod cookie;
mod gatekeeper;
mod request;

pub use cookie::*;
pub use gatekeeper::*;
pub use request::*;
