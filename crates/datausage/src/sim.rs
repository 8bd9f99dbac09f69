//! Simulated platform bridge for the demo.
//!
//! Stands in for the OS network-stats service so the CLI runs anywhere.
//! Counters are a deterministic function of the queried range: a base
//! per-millisecond rate times the range length, shaped by a sine wobble
//! seeded from the range start so different windows report different
//! (but reproducible) traffic. The event feed alternates between the two
//! native event classes on a fixed cadence.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use datausage_api::{DataUsageEvent, Error, NativeBridge};

// Base traffic rates, bytes per millisecond of queried range.
const WIFI_TX_RATE: f64 = 310.0;
const WIFI_RX_RATE: f64 = 2170.0;
const MOBILE_TX_RATE: f64 = 45.0;
const MOBILE_RX_RATE: f64 = 390.0;

// The simulated "current package" accounts for a fixed share of traffic.
const PACKAGE_SHARE: f64 = 0.07;

pub struct SimulatedBridge;

impl SimulatedBridge {
    /// Deterministic byte count for a range at the given rate.
    fn counter(start: &str, end: &str, rate: f64, share: f64) -> Result<String, Error> {
        let start_ms = parse_bound(start)?;
        let end_ms = parse_bound(end)?;
        let span = (end_ms - start_ms).max(0);

        // +-30% wobble seeded from the window start.
        #[allow(clippy::cast_precision_loss)]
        let wobble = 1.0 + 0.3 * ((start_ms as f64) / 8_191.0).sin();
        #[allow(clippy::cast_precision_loss)]
        let bytes = (span as f64) * rate * wobble * share;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok((bytes.max(0.0) as u64).to_string())
    }
}

fn parse_bound(value: &str) -> Result<i64, Error> {
    value.parse::<i64>().map_err(|_| Error::Native {
        message: format!("malformed timestamp argument '{value}'"),
    })
}

#[async_trait]
impl NativeBridge for SimulatedBridge {
    async fn network_type(&self) -> Result<i32, Error> {
        Ok(1) // the simulated device sits on Wi-Fi
    }

    async fn is_connected(&self) -> Result<bool, Error> {
        Ok(true)
    }

    async fn all_tx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, WIFI_TX_RATE, 1.0)
    }

    async fn all_rx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, WIFI_RX_RATE, 1.0)
    }

    async fn all_tx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, MOBILE_TX_RATE, 1.0)
    }

    async fn all_rx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, MOBILE_RX_RATE, 1.0)
    }

    async fn package_tx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, WIFI_TX_RATE, PACKAGE_SHARE)
    }

    async fn package_rx_bytes_wifi(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, WIFI_RX_RATE, PACKAGE_SHARE)
    }

    async fn package_tx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, MOBILE_TX_RATE, PACKAGE_SHARE)
    }

    async fn package_rx_bytes_mobile(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, MOBILE_RX_RATE, PACKAGE_SHARE)
    }

    async fn wifi_usage_summary(&self, start: &str, end: &str) -> Result<String, Error> {
        Self::counter(start, end, WIFI_TX_RATE + WIFI_RX_RATE, 1.0)
    }

    async fn request_permission(&self, _capability: &str) -> Result<String, Error> {
        Ok("granted".to_string())
    }
}

// ── Event feed ───────────────────────────────────────────────────────

/// Spawn a task pushing synthetic native events every `cadence` until
/// `cancel` fires. Alternates connection flaps with usage-threshold
/// notifications, the same payload shapes the platform emits.
pub fn spawn_event_feed(
    cadence: Duration,
    cancel: CancellationToken,
) -> mpsc::Receiver<DataUsageEvent> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut tick: u32 = 0;
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(cadence) => {}
            }

            let event = if tick % 2 == 0 {
                DataUsageEvent::ConnectionChange {
                    is_connected: tick % 4 == 0,
                }
            } else {
                DataUsageEvent::UsageChange {
                    network_type: 1,
                    event_name: "usageThresholdReached".into(),
                }
            };

            if tx.send(event).await.is_err() {
                break; // pump gone
            }
            tick = tick.wrapping_add(1);
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_are_deterministic_and_grow_with_range() {
        let bridge = SimulatedBridge;

        let a = bridge.all_tx_bytes_wifi("1000", "2000").await.unwrap();
        let b = bridge.all_tx_bytes_wifi("1000", "2000").await.unwrap();
        assert_eq!(a, b);

        let wide = bridge.all_tx_bytes_wifi("1000", "900000").await.unwrap();
        assert!(wide.parse::<u64>().unwrap() > a.parse::<u64>().unwrap());
    }

    #[tokio::test]
    async fn package_share_is_a_fraction_of_device_traffic() {
        let bridge = SimulatedBridge;

        let device: u64 = bridge
            .all_rx_bytes_wifi("1000", "500000")
            .await
            .unwrap()
            .parse()
            .unwrap();
        let package: u64 = bridge
            .package_rx_bytes_wifi("1000", "500000")
            .await
            .unwrap()
            .parse()
            .unwrap();
        assert!(package < device);
        assert!(package > 0);
    }

    #[tokio::test]
    async fn event_feed_alternates_classes() {
        let cancel = CancellationToken::new();
        let mut rx = spawn_event_feed(Duration::from_millis(1), cancel.clone());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(matches!(first, DataUsageEvent::ConnectionChange { .. }));
        assert!(matches!(second, DataUsageEvent::UsageChange { .. }));

        cancel.cancel();
    }
}
