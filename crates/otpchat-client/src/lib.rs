//! otpchat client library entry.
//!
//! This crate wires the login collaborator, the connection manager, the event
//! router and the built-in handlers into a session controller. It is consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod login;
pub mod services;
pub mod session;
pub mod transport;
pub mod ui;

pub use session::SessionController;
