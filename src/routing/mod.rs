//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route groups (groups.rs) + plugged-in routers
//!     → mount.rs (validate prefixes, keep registration order)
//!     → axum Router::nest per prefix
//!     → matcher.rs (prefix → mount name, for logs and metrics)
//! ```
//!
//! # Design Decisions
//! - Mounts are fixed at startup, immutable at runtime
//! - Duplicate prefixes are a build error, not a panic
//! - Unmatched paths fall through to a JSON 404

pub mod groups;
pub mod matcher;
pub mod mount;

pub use groups::RouteGroup;
pub use matcher::{MountIndex, PathPrefixMatcher};
pub use mount::{Mount, MountError, MountTable};
