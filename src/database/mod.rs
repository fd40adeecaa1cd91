//! Document database connectivity.
//!
//! # State Machine
//! ```text
//! Disconnected → Connecting → Connected   (startup continues)
//!                           ↘ Failed      (startup aborts, process exits 1)
//! ```
//!
//! # Design Decisions
//! - Exactly one connection attempt per process, no retry or backoff
//! - A `ping` proves the server is reachable before startup continues
//! - The resulting `Database` handle is shared through `AppContext`

pub mod connector;

pub use connector::{ConnectionState, DatabaseConnector, DatabaseError};
