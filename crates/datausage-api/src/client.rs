//! Client façade over the native data-usage module.
//!
//! One [`DataUsageClient`] per attached bridge. Every operation is a
//! single suspended round trip: validate locally, call the native layer,
//! normalize the reply. No caching, no retries, no in-flight
//! deduplication -- two concurrent identical queries each make their own
//! native calls.

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::bridge::{NativeBridge, READ_PHONE_STATE};
use crate::error::Error;
use crate::events::{DataUsageEvent, EventEmitter, EventKind, EventPump, Subscription};
use crate::model::{NetworkType, PermissionStatus, UsageQuery};

/// Async client for connectivity state, usage counters, permission
/// requests, and native change events.
///
/// Holds an explicit optional handle to the native bridge. A client
/// built with [`unlinked`](Self::unlinked) fails every operation fast
/// with [`Error::NotLinked`] instead of deferring the failure to some
/// later property access.
pub struct DataUsageClient {
    bridge: Option<Arc<dyn NativeBridge>>,
    events: EventEmitter,
}

impl DataUsageClient {
    /// Create a client over an attached native bridge.
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            bridge: Some(bridge),
            events: EventEmitter::new(),
        }
    }

    /// Create a client with no native module attached.
    ///
    /// Every query and permission request returns [`Error::NotLinked`].
    /// Event registration still works; nothing will ever be emitted
    /// unless an event stream is attached separately.
    pub fn unlinked() -> Self {
        Self {
            bridge: None,
            events: EventEmitter::new(),
        }
    }

    /// The linkage check performed at every entry point.
    fn bridge(&self) -> Result<&dyn NativeBridge, Error> {
        self.bridge.as_deref().ok_or(Error::NotLinked)
    }

    // ── Network queries ──────────────────────────────────────────────

    /// Whether the device currently has connectivity.
    ///
    /// Native failure propagates with the native message; no fallback
    /// value is substituted.
    pub async fn is_connected(&self) -> Result<bool, Error> {
        let bridge = self.bridge()?;
        debug!("querying connectivity");
        bridge.is_connected().await
    }

    /// The active network class.
    ///
    /// Maps the native integer code (`0` mobile, `1` Wi-Fi); any other
    /// code is [`Error::UnknownNetworkType`].
    pub async fn network_type(&self) -> Result<NetworkType, Error> {
        let bridge = self.bridge()?;
        debug!("querying network type");
        let code = bridge.network_type().await?;
        NetworkType::from_code(code)
    }

    // ── Usage queries ────────────────────────────────────────────────

    /// Total bytes (tx + rx) moved over Wi-Fi between `start_ms` and
    /// `end_ms` (Unix-epoch milliseconds).
    ///
    /// Issues two independent native queries and sums the coerced
    /// replies. Native failure on either call is logged and re-raised
    /// unchanged.
    pub async fn wifi_usage_stats(&self, start_ms: i64, end_ms: i64) -> Result<u64, Error> {
        let query = UsageQuery::new(start_ms, end_ms)?;
        let bridge = self.bridge()?;
        let (start, end) = query.native_args();
        debug!(start_ms, end_ms, "querying wifi usage");

        let tx = bridge
            .all_tx_bytes_wifi(&start, &end)
            .await
            .map_err(warn_native)?;
        let rx = bridge
            .all_rx_bytes_wifi(&start, &end)
            .await
            .map_err(warn_native)?;

        Ok(parse_counter(&tx)?.saturating_add(parse_counter(&rx)?))
    }

    /// Total bytes (tx + rx) moved over the mobile network between
    /// `start_ms` and `end_ms`.
    pub async fn mobile_usage_stats(&self, start_ms: i64, end_ms: i64) -> Result<u64, Error> {
        let query = UsageQuery::new(start_ms, end_ms)?;
        let bridge = self.bridge()?;
        let (start, end) = query.native_args();
        debug!(start_ms, end_ms, "querying mobile usage");

        let tx = bridge
            .all_tx_bytes_mobile(&start, &end)
            .await
            .map_err(warn_native)?;
        let rx = bridge
            .all_rx_bytes_mobile(&start, &end)
            .await
            .map_err(warn_native)?;

        Ok(parse_counter(&tx)?.saturating_add(parse_counter(&rx)?))
    }

    /// Total bytes (tx + rx) the current package moved over `network`
    /// between `start_ms` and `end_ms`.
    pub async fn package_usage_stats(
        &self,
        network: NetworkType,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<u64, Error> {
        let query = UsageQuery::new(start_ms, end_ms)?;
        let bridge = self.bridge()?;
        let (start, end) = query.native_args();
        debug!(%network, start_ms, end_ms, "querying package usage");

        let (tx, rx) = match network {
            NetworkType::Wifi => (
                bridge
                    .package_tx_bytes_wifi(&start, &end)
                    .await
                    .map_err(warn_native)?,
                bridge
                    .package_rx_bytes_wifi(&start, &end)
                    .await
                    .map_err(warn_native)?,
            ),
            NetworkType::Mobile => (
                bridge
                    .package_tx_bytes_mobile(&start, &end)
                    .await
                    .map_err(warn_native)?,
                bridge
                    .package_rx_bytes_mobile(&start, &end)
                    .await
                    .map_err(warn_native)?,
            ),
        };

        Ok(parse_counter(&tx)?.saturating_add(parse_counter(&rx)?))
    }

    /// Total Wi-Fi bytes in the range, summed native-side across usage
    /// buckets in a single call.
    pub async fn wifi_usage_summary(&self, start_ms: i64, end_ms: i64) -> Result<u64, Error> {
        let query = UsageQuery::new(start_ms, end_ms)?;
        let bridge = self.bridge()?;
        let (start, end) = query.native_args();
        debug!(start_ms, end_ms, "querying wifi usage summary");

        let total = bridge
            .wifi_usage_summary(&start, &end)
            .await
            .map_err(warn_native)?;
        parse_counter(&total)
    }

    // ── Permissions ──────────────────────────────────────────────────

    /// Request the usage-stats capability from the OS.
    ///
    /// Returns `true` iff the platform reports the exact `granted`
    /// sentinel for [`READ_PHONE_STATE`]. Denied, blocked, unavailable,
    /// limited, and unrecognized statuses all yield `false` without an
    /// error. Single round trip, no retry.
    pub async fn request_permissions(&self) -> Result<bool, Error> {
        let bridge = self.bridge()?;
        debug!(capability = READ_PHONE_STATE, "requesting permission");
        let status = bridge.request_permission(READ_PHONE_STATE).await?;
        Ok(PermissionStatus::from_str(status.trim())
            .map(PermissionStatus::is_granted)
            .unwrap_or(false))
    }

    // ── Events ───────────────────────────────────────────────────────

    /// The event registry shared by this client.
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Subscribe to connectivity-change events.
    pub fn on_connection_change(
        &self,
        listener: impl Fn(&DataUsageEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.events.add_listener(EventKind::ConnectionChange, listener)
    }

    /// Subscribe to usage-change events.
    pub fn on_usage_change(
        &self,
        listener: impl Fn(&DataUsageEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.events.add_listener(EventKind::UsageChange, listener)
    }

    /// Drop every subscriber of one event class.
    pub fn remove_all_listeners(&self, kind: EventKind) {
        self.events.remove_all_listeners(kind);
    }

    /// Attach the native push channel and start fanning events out to
    /// this client's subscribers.
    ///
    /// The returned pump keeps running until `cancel` fires,
    /// [`EventPump::shutdown`] is called, or the native side drops its
    /// sender.
    pub fn attach_event_stream(
        &self,
        rx: mpsc::Receiver<DataUsageEvent>,
        cancel: CancellationToken,
    ) -> EventPump {
        EventPump::spawn(rx, self.events.clone(), cancel)
    }
}

// ── Counter coercion ─────────────────────────────────────────────────

/// Coerce a native numeric-string counter reply to bytes.
fn parse_counter(raw: &str) -> Result<u64, Error> {
    raw.trim().parse::<u64>().map_err(|_| Error::Counter {
        raw: raw.to_string(),
    })
}

/// Log a native usage-query failure before re-raising it.
///
/// The log line is a diagnostic side channel only; the error reaches the
/// caller unchanged.
fn warn_native(err: Error) -> Error {
    warn!(error = %err, "usage query failed on the native side");
    err
}

// ── Tests ────────────────────────────────────────────────────────────
