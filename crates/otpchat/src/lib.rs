//! Top-level facade crate for otpchat.
//!
//! Re-exports the wire contracts and the client runtime so users can depend on a single crate.

pub mod core {
    pub use otpchat_core::*;
}

pub mod client {
    pub use otpchat_client::*;
}
