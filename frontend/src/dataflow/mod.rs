//! Actor+Relay primitives shared by every frontend domain.
//!
//! Relays are named after the event source (`{source}_{event}_relay`); actors
//! are read only through signals.

pub mod actor;
pub mod relay;

pub use actor::Actor;
pub use relay::{relay, Relay};
