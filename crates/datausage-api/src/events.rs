//! Typed event fan-out: registry, subscription tokens, and the pump that
//! drains the native push channel.
//!
//! The native layer pushes two event classes, `connectionChange` and
//! `usageChange`. Each class has its own subscriber list; emission takes
//! a stable-ordered snapshot of the current subscribers and invokes every
//! callback with the payload unchanged -- no filtering, batching, or
//! transformation. Relative delivery order between subscribers is
//! unspecified.
//!
//! # Example
//!
//! ```rust,ignore
//! use datausage_api::events::{EventEmitter, EventKind};
//!
//! let emitter = EventEmitter::new();
//! let sub = emitter.add_listener(EventKind::ConnectionChange, |event| {
//!     println!("{event:?}");
//! });
//!
//! // ... later: stop receiving
//! sub.remove();
//! ```

use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// ── Event model ──────────────────────────────────────────────────────

/// Discriminator for the two native event classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum EventKind {
    #[strum(serialize = "connectionChange")]
    ConnectionChange,
    #[strum(serialize = "usageChange")]
    UsageChange,
}

/// A native-pushed event, tagged by class.
///
/// Wire shape matches what the platform emits: the tag under `event`,
/// payload fields in camelCase alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DataUsageEvent {
    /// Connectivity flipped; carries the new state.
    #[serde(rename = "connectionChange", rename_all = "camelCase")]
    ConnectionChange { is_connected: bool },

    /// A usage threshold fired on the native side.
    #[serde(rename = "usageChange", rename_all = "camelCase")]
    UsageChange { network_type: i32, event_name: String },
}

impl DataUsageEvent {
    /// Which subscriber list this event fans out to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ConnectionChange { .. } => EventKind::ConnectionChange,
            Self::UsageChange { .. } => EventKind::UsageChange,
        }
    }
}

// ── Registry ─────────────────────────────────────────────────────────

type Listener = Arc<dyn Fn(&DataUsageEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    connection: Vec<(u64, Listener)>,
    usage: Vec<(u64, Listener)>,
}

impl Registry {
    fn list(&self, kind: EventKind) -> &Vec<(u64, Listener)> {
        match kind {
            EventKind::ConnectionChange => &self.connection,
            EventKind::UsageChange => &self.usage,
        }
    }

    fn list_mut(&mut self, kind: EventKind) -> &mut Vec<(u64, Listener)> {
        match kind {
            EventKind::ConnectionChange => &mut self.connection,
            EventKind::UsageChange => &mut self.usage,
        }
    }
}

/// Fan-out registry for the two event classes.
///
/// Cheaply cloneable; all clones share one subscriber table. Emission and
/// (un)registration serialize on an internal lock, so a listener removed
/// before an emission starts is guaranteed not to see that emission.
/// Callbacks run outside the lock -- a subscriber may re-register or
/// remove itself from inside its own callback without deadlocking.
#[derive(Clone, Default)]
pub struct EventEmitter {
    registry: Arc<Mutex<Registry>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for one event class.
    ///
    /// Every current subscriber of a class receives each emitted event of
    /// that class. The returned [`Subscription`] is the only way to
    /// unregister this specific listener.
    pub fn add_listener(
        &self,
        kind: EventKind,
        listener: impl Fn(&DataUsageEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut registry = self.registry.lock().expect("listener registry poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.list_mut(kind).push((id, Arc::new(listener)));
        tracing::debug!(%kind, id, "listener registered");
        Subscription {
            id,
            kind,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Drop every subscriber of `kind`, regardless of who registered it.
    pub fn remove_all_listeners(&self, kind: EventKind) {
        let mut registry = self.registry.lock().expect("listener registry poisoned");
        let removed = registry.list_mut(kind).len();
        registry.list_mut(kind).clear();
        tracing::debug!(%kind, removed, "all listeners removed");
    }

    /// Number of currently registered subscribers for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry
            .lock()
            .expect("listener registry poisoned")
            .list(kind)
            .len()
    }

    /// Deliver `event` to every current subscriber of its class.
    ///
    /// Snapshots the subscriber list under the lock, then invokes the
    /// callbacks outside it, in registration order.
    pub fn emit(&self, event: &DataUsageEvent) {
        let snapshot: Vec<Listener> = {
            let registry = self.registry.lock().expect("listener registry poisoned");
            registry
                .list(event.kind())
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        tracing::trace!(kind = %event.kind(), subscribers = snapshot.len(), "emitting event");
        for listener in snapshot {
            listener(event);
        }
    }
}

// ── Subscription ─────────────────────────────────────────────────────

/// Disposal token for one registered listener.
///
/// [`remove`](Self::remove) unregisters exactly that listener; once it
/// returns, no event emitted afterwards reaches the callback. Events
/// already mid-delivery when `remove` is called may still arrive.
/// Dropping the token without calling `remove` leaves the listener
/// registered, matching the explicit-disposal contract of the native
/// emitter this replaces.
#[must_use = "dropping a Subscription does not unregister the listener; call remove()"]
pub struct Subscription {
    id: u64,
    kind: EventKind,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Unregister the listener this token was issued for.
    pub fn remove(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().expect("listener registry poisoned");
            registry.list_mut(self.kind).retain(|(id, _)| *id != self.id);
            tracing::debug!(kind = %self.kind, id = self.id, "listener removed");
        }
    }
}

// ── EventPump ────────────────────────────────────────────────────────

/// Background task draining the native push channel into an
/// [`EventEmitter`].
///
/// The native layer owns the sending half of the channel; this pump owns
/// the receiving half and fans each event out. Shut it down via
/// [`shutdown`](Self::shutdown) or by cancelling the token passed at
/// spawn time; the task also exits when the native side drops its sender.
pub struct EventPump {
    cancel: CancellationToken,
}

impl EventPump {
    /// Spawn the pump task on the current tokio runtime.
    pub fn spawn(
        mut rx: mpsc::Receiver<DataUsageEvent>,
        emitter: EventEmitter,
        cancel: CancellationToken,
    ) -> Self {
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = task_cancel.cancelled() => break,
                    maybe_event = rx.recv() => {
                        match maybe_event {
                            Some(event) => emitter.emit(&event),
                            None => {
                                tracing::debug!("native event channel closed");
                                break;
                            }
                        }
                    }
                }
            }
            tracing::debug!("event pump exiting");
        });

        Self { cancel }
    }

    /// Signal the pump task to stop.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn connection_event(is_connected: bool) -> DataUsageEvent {
        DataUsageEvent::ConnectionChange { is_connected }
    }

    fn usage_event() -> DataUsageEvent {
        DataUsageEvent::UsageChange {
            network_type: 1,
            event_name: "usageThresholdReached".into(),
        }
    }

    #[test]
    fn fan_out_reaches_every_subscriber() {
        let emitter = EventEmitter::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&first);
        let _sub1 = emitter.add_listener(EventKind::ConnectionChange, move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&second);
        let _sub2 = emitter.add_listener(EventKind::ConnectionChange, move |_| {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit(&connection_event(true));
        emitter.emit(&connection_event(false));

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn events_route_by_kind() {
        let emitter = EventEmitter::new();
        let connection_hits = Arc::new(AtomicUsize::new(0));
        let usage_hits = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&connection_hits);
        let _conn = emitter.add_listener(EventKind::ConnectionChange, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let u = Arc::clone(&usage_hits);
        let _usage = emitter.add_listener(EventKind::UsageChange, move |event| {
            assert!(matches!(event, DataUsageEvent::UsageChange { .. }));
            u.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit(&usage_event());

        assert_eq!(connection_hits.load(Ordering::SeqCst), 0);
        assert_eq!(usage_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_listener_gets_nothing_further() {
        let emitter = EventEmitter::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&hits);
        let sub = emitter.add_listener(EventKind::ConnectionChange, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit(&connection_event(true));
        sub.remove();
        emitter.emit(&connection_event(false));
        emitter.emit(&connection_event(true));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_targets_only_its_own_listener() {
        let emitter = EventEmitter::new();
        let kept = Arc::new(AtomicUsize::new(0));

        let sub_dropped =
            emitter.add_listener(EventKind::ConnectionChange, move |_| {
                panic!("removed listener must not run");
            });
        let k = Arc::clone(&kept);
        let _sub_kept = emitter.add_listener(EventKind::ConnectionChange, move |_| {
            k.fetch_add(1, Ordering::SeqCst);
        });

        sub_dropped.remove();
        emitter.emit(&connection_event(true));

        assert_eq!(kept.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.listener_count(EventKind::ConnectionChange), 1);
    }

    #[test]
    fn remove_all_clears_one_class_only() {
        let emitter = EventEmitter::new();
        let _c1 = emitter.add_listener(EventKind::ConnectionChange, |_| {});
        let _c2 = emitter.add_listener(EventKind::ConnectionChange, |_| {});
        let _u = emitter.add_listener(EventKind::UsageChange, |_| {});

        emitter.remove_all_listeners(EventKind::ConnectionChange);

        assert_eq!(emitter.listener_count(EventKind::ConnectionChange), 0);
        assert_eq!(emitter.listener_count(EventKind::UsageChange), 1);
    }

    #[test]
    fn remove_after_emitter_dropped_is_a_no_op() {
        let emitter = EventEmitter::new();
        let sub = emitter.add_listener(EventKind::UsageChange, |_| {});
        drop(emitter);
        sub.remove();
    }

    #[test]
    fn event_wire_shape_is_tagged_camel_case() {
        let json = serde_json::to_value(connection_event(true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "connectionChange", "isConnected": true })
        );

        let json = serde_json::to_value(usage_event()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "usageChange",
                "networkType": 1,
                "eventName": "usageThresholdReached",
            })
        );

        let parsed: DataUsageEvent = serde_json::from_value(
            serde_json::json!({ "event": "connectionChange", "isConnected": false }),
        )
        .unwrap();
        assert_eq!(parsed, connection_event(false));
    }

    #[tokio::test]
    async fn pump_dispatches_native_events() {
        let emitter = EventEmitter::new();
        let (delivered_tx, mut delivered_rx) = mpsc::unbounded_channel();

        let _sub = emitter.add_listener(EventKind::ConnectionChange, move |event| {
            let _ = delivered_tx.send(event.clone());
        });

        let (native_tx, native_rx) = mpsc::channel(16);
        let pump = EventPump::spawn(native_rx, emitter, CancellationToken::new());

        native_tx.send(connection_event(false)).await.unwrap();

        let event = delivered_rx.recv().await.unwrap();
        assert_eq!(event, connection_event(false));

        pump.shutdown();
    }

    #[tokio::test]
    async fn pump_exits_when_native_sender_drops() {
        let emitter = EventEmitter::new();
        let (delivered_tx, mut delivered_rx) = mpsc::unbounded_channel();
        let _sub = emitter.add_listener(EventKind::UsageChange, move |event| {
            let _ = delivered_tx.send(event.clone());
        });

        let (native_tx, native_rx) = mpsc::channel(16);
        let _pump = EventPump::spawn(native_rx, emitter, CancellationToken::new());

        native_tx.send(usage_event()).await.unwrap();
        drop(native_tx);

        // The queued event still arrives; the closed channel then ends
        // the pump without further deliveries.
        assert_eq!(delivered_rx.recv().await.unwrap(), usage_event());
        assert!(delivered_rx.recv().await.is_none());
    }
}
