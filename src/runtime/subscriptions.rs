//! Per-device subscription engine
//!
//! Each device tracks the remote addresses subscribed to its actions. A
//! subscriber row carries two absolute microsecond deadlines: `end_time`
//! (expiry, from the START packet's duration) and `next_fire` (the next
//! periodic callback, absent when the period is zero). The host drives the
//! engine from its main loop via [`SubscriptionManager::poll`]; expiry
//! always wins over a due fire in the same tick.

use tracing::{debug, trace};

use crate::protocol::{
    LogicalAddress, OverlayType, PacketType, SubscriptionCallback, SubscriptionStart, Writer,
};

use super::node::Node;

/// Sentinel deadline meaning "never".
pub const NEVER: u64 = u64::MAX;

/// One remote subscriber of a device action.
#[derive(Debug, Clone)]
pub struct Subscriber {
    /// Address the callbacks are sent to.
    pub addr: LogicalAddress,
    /// Subscriber-chosen id, unique per address.
    pub subscription_id: u32,
    /// Action subscribed to.
    pub action_id: u16,
    /// Periodic callback interval in milliseconds; 0 means event-only.
    pub period_ms: u32,
    /// Absolute expiry time, µs.
    pub end_time_us: u64,
    /// Absolute time of the next periodic fire, µs; [`NEVER`] when
    /// `period_ms` is 0.
    pub next_fire_us: u64,
}

/// A timer event due on the current tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The device's own self-update timer elapsed.
    SelfUpdate,
    /// A subscriber's periodic interval elapsed.
    Subscription {
        /// Subscriber address.
        addr: LogicalAddress,
        /// Subscription id.
        subscription_id: u32,
        /// Subscribed action.
        action_id: u16,
    },
}

/// Subscriber table plus the device's self-update timer.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    subscribers: Vec<Subscriber>,
    self_update_period_us: u64,
    self_update_next_us: u64,
}

impl SubscriptionManager {
    /// Create an empty manager with the self-update timer disarmed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            self_update_period_us: 0,
            self_update_next_us: NEVER,
        }
    }

    /// Record or refresh a subscriber from a received START packet.
    ///
    /// A duplicate START from the same `(id, addr)` pair only extends the
    /// existing row's expiry; period and fire schedule stay untouched.
    pub fn add_subscriber(&mut self, start: &SubscriptionStart, addr: LogicalAddress, now_us: u64) {
        let end_time_us = now_us + u64::from(start.duration_s) * 1_000_000;

        if let Some(existing) = self
            .subscribers
            .iter_mut()
            .find(|s| s.subscription_id == start.id && s.addr == addr)
        {
            trace!(id = start.id, %addr, end_time_us, "refreshing subscription");
            existing.end_time_us = end_time_us;
            return;
        }

        let next_fire_us = if start.period_ms > 0 {
            now_us + u64::from(start.period_ms) * 1_000 - 1
        } else {
            NEVER
        };
        debug!(
            id = start.id,
            %addr,
            action = start.action_id,
            period_ms = start.period_ms,
            "new subscriber"
        );
        self.subscribers.push(Subscriber {
            addr,
            subscription_id: start.id,
            action_id: start.action_id,
            period_ms: start.period_ms,
            end_time_us,
            next_fire_us,
        });
    }

    /// Remove every row matching `(id, addr)`.
    pub fn stop_subscription(&mut self, id: u32, addr: LogicalAddress) {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|s| !(s.subscription_id == id && s.addr == addr));
        if self.subscribers.len() != before {
            debug!(id, %addr, "subscription stopped");
        }
    }

    /// Arm the device's self-update timer.
    pub fn set_self_update_period(&mut self, period_us: u64, now_us: u64) {
        self.self_update_period_us = period_us;
        self.self_update_next_us = now_us + period_us;
    }

    /// Disarm the device's self-update timer.
    pub fn stop_self_update(&mut self) {
        self.self_update_next_us = NEVER;
    }

    /// Advance timers to `now_us` and return the events that came due.
    ///
    /// Expired subscribers are removed before their fire check, so a row
    /// whose expiry and fire are both due in the same tick never fires.
    /// Rows added while the returned events are being handled are not
    /// considered until the next tick.
    pub fn poll(&mut self, now_us: u64) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        if now_us > self.self_update_next_us {
            events.push(TimerEvent::SelfUpdate);
            self.self_update_next_us = self
                .self_update_next_us
                .saturating_add(self.self_update_period_us);
        }

        let mut i = 0;
        while i < self.subscribers.len() {
            if now_us >= self.subscribers[i].end_time_us {
                let expired = self.subscribers.remove(i);
                debug!(
                    id = expired.subscription_id,
                    addr = %expired.addr,
                    "subscription expired"
                );
                continue;
            }

            let subscriber = &mut self.subscribers[i];
            if now_us > subscriber.next_fire_us {
                subscriber.next_fire_us = subscriber
                    .next_fire_us
                    .saturating_add(u64::from(subscriber.period_ms) * 1_000);
                events.push(TimerEvent::Subscription {
                    addr: subscriber.addr,
                    subscription_id: subscriber.subscription_id,
                    action_id: subscriber.action_id,
                });
            }
            i += 1;
        }

        events
    }

    /// Emit a SUBSCRIPTION_CALLBACK to every subscriber of `action_id`.
    ///
    /// `src_port` is the owning device's port.
    pub fn send_callback_data(&self, node: &Node, src_port: u16, action_id: u16, payload: &[u8]) {
        for subscriber in &self.subscribers {
            if subscriber.action_id != action_id {
                continue;
            }
            let callback = SubscriptionCallback {
                id: subscriber.subscription_id,
                payload: bytes::Bytes::copy_from_slice(payload),
            };
            let mut builder = node.packet(
                subscriber.addr,
                src_port,
                PacketType::SubscriptionCallback,
                OverlayType::Unreliable,
                callback.encoded_len(),
            );
            let mut w = Writer::new(builder.body_mut());
            if callback.encode_into(&mut w).is_ok() {
                builder.finish();
            }
        }
    }

    /// Current number of subscriber rows.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Current subscriber rows.
    #[must_use]
    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }
}
