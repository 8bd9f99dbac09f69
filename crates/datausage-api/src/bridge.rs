//! The native platform boundary.
//!
//! Everything this crate cannot do in-process -- byte accounting,
//! OS connectivity detection, permission prompts -- lives behind
//! [`NativeBridge`]. The trait mirrors the platform module's calling
//! convention faithfully: counter queries take and return *strings*
//! (string-encoded integers), because that is how the native side is
//! addressed. Typed values exist only on this side of the boundary;
//! [`crate::DataUsageClient`] serializes on the way in and coerces on
//! the way out.
//!
//! Calls carry no timeout at this layer. A native call that never
//! resolves suspends its caller indefinitely; imposing a deadline is a
//! product decision left to consumers.

use async_trait::async_trait;

use crate::error::Error;

/// The one capability this crate ever requests.
pub const READ_PHONE_STATE: &str = "android.permission.READ_PHONE_STATE";

/// Contract the platform-native module must satisfy.
///
/// All methods are single request/response round trips; the native side
/// may resolve them in any order and provides no cancellation. Counter
/// methods return the cumulative byte sum for `[start, end]` as a
/// decimal string.
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// Current network-type code: `0` mobile, `1` Wi-Fi.
    async fn network_type(&self) -> Result<i32, Error>;

    /// Whether the device currently has connectivity.
    async fn is_connected(&self) -> Result<bool, Error>;

    // ── Device-wide Wi-Fi counters ───────────────────────────────────

    /// Bytes transmitted over Wi-Fi in `[start, end]` (epoch millis,
    /// string-encoded).
    async fn all_tx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error>;

    /// Bytes received over Wi-Fi in `[start, end]`.
    async fn all_rx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error>;

    // ── Device-wide mobile counters ──────────────────────────────────

    /// Bytes transmitted over the mobile network in `[start, end]`.
    async fn all_tx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error>;

    /// Bytes received over the mobile network in `[start, end]`.
    async fn all_rx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error>;

    // ── Current-package counters ─────────────────────────────────────

    /// Bytes this package transmitted over Wi-Fi in `[start, end]`.
    async fn package_tx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error>;

    /// Bytes this package received over Wi-Fi in `[start, end]`.
    async fn package_rx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error>;

    /// Bytes this package transmitted over mobile in `[start, end]`.
    async fn package_tx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error>;

    /// Bytes this package received over mobile in `[start, end]`.
    async fn package_rx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error>;

    // ── Bucket summary ───────────────────────────────────────────────

    /// Total Wi-Fi bytes (tx + rx) in `[start, end]`, summed native-side
    /// across usage buckets.
    async fn wifi_usage_summary(&self, start: &str, end: &str) -> Result<String, Error>;

    // ── Permissions ──────────────────────────────────────────────────

    /// Request `capability` from the OS; resolves with the platform's
    /// status string (`"granted"`, `"denied"`, `"blocked"`, ...).
    async fn request_permission(&self, capability: &str) -> Result<String, Error>;
}
