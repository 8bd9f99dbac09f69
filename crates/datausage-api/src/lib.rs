//! Async client library for platform network data-usage accounting.
//!
//! A typed façade over an opaque platform-native module that owns the
//! actual byte counting, connectivity detection, and permission prompts:
//!
//! - **[`DataUsageClient`]** — query connectivity and network type, read
//!   cumulative tx/rx byte counters over a time range (device-wide Wi-Fi
//!   and mobile, or scoped to the current package), and request the
//!   usage-stats permission.
//! - **[`NativeBridge`]** — the boundary trait the platform layer
//!   implements; counter arguments and replies cross it as
//!   string-encoded integers (the native calling convention).
//! - **[`events`]** — fan-out registry for the two native-pushed event
//!   classes (`connectionChange`, `usageChange`), with per-listener
//!   disposal tokens and a pump task draining the native push channel.
//! - **[`units`]** — floor-truncating KB/MB/GB derivation for display.
//!
//! Every query is stateless and independently issued; this layer adds no
//! caching, retries, or timeouts on top of the native calls.

pub mod bridge;
pub mod client;
pub mod error;
pub mod events;
pub mod model;
pub mod units;

pub use bridge::{NativeBridge, READ_PHONE_STATE};
pub use client::DataUsageClient;
pub use error::Error;
pub use events::{DataUsageEvent, EventEmitter, EventKind, EventPump, Subscription};
pub use model::{NetworkType, PermissionStatus, UsageQuery};
pub use units::UsageBreakdown;
