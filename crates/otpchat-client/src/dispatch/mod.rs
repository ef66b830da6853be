//! Dispatch module exports.
//!
//! Re-exports the router and handler trait so downstream consumers can
//! depend on this module directly.

pub mod router;

pub use router::{DispatchOutcome, EventHandler, EventRouter, RouterBuilder};
