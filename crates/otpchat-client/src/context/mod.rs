//! Session context types.
//!
//! The display identity lives here and is threaded explicitly into every
//! outbound message rather than kept in process-wide state.

pub mod session;

pub use session::SessionContext;
