//! Command handlers.

pub mod permissions;
pub mod status;
pub mod usage;
pub mod watch;
