//! otpchat core: transport-agnostic wire contracts and the shared error type.
//!
//! This crate defines the envelope codec, the payload shapes carried on the
//! persistent connection, and the login wire types. It carries no transport or
//! runtime dependencies so the same contracts can back the client, test servers,
//! and tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Anything arriving from the wire surfaces as `ChatError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod auth;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ChatError, ErrorCode, Result};
