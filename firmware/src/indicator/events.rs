#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Event ingress from the pairing, battery and keymap subsystems.
//!
//! Subsystems record their new state in [`crate::status`] and publish an
//! [`IndicatorEvent`]; the event task hands each one to the router. Publishing
//! never blocks: a full queue drops the event.

use core::fmt;

use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use indicator_core::events::{
    BatteryStateChanged, ConnectivityChanged, IndicatorEvent, LayerStateChanged,
};

use super::IndicatorMutex;
use crate::status;

/// Depth of the event queue between subsystems and the event task.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Queue carrying events to the event task.
pub type EventChannel = Channel<IndicatorMutex, IndicatorEvent, EVENT_QUEUE_DEPTH>;

/// Convenience sender type alias for the event queue.
pub type EventSender<'a> = Sender<'a, IndicatorMutex, IndicatorEvent, EVENT_QUEUE_DEPTH>;

/// Convenience receiver type alias for the event queue.
pub type EventReceiver<'a> = Receiver<'a, IndicatorMutex, IndicatorEvent, EVENT_QUEUE_DEPTH>;

/// Error surfaced when an event cannot be published.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventPublishError {
    /// Event queue is full; the event was dropped.
    QueueFull,
}

impl fmt::Display for EventPublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventPublishError::QueueFull => f.write_str("indicator event queue full"),
        }
    }
}

/// Publishes `event` without blocking.
///
/// # Errors
///
/// [`EventPublishError::QueueFull`] when the event task is behind.
pub fn publish(sender: &EventSender<'_>, event: IndicatorEvent) -> Result<(), EventPublishError> {
    match sender.try_send(event) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => Err(EventPublishError::QueueFull),
    }
}

/// Records a new battery charge and publishes the change.
///
/// # Errors
///
/// See [`publish`].
pub fn notify_battery(sender: &EventSender<'_>, percent: u8) -> Result<(), EventPublishError> {
    status::record_state_of_charge(percent);
    publish(
        sender,
        BatteryStateChanged {
            state_of_charge: percent,
        }
        .into(),
    )
}

/// Records the active profile state (central role) and publishes the change.
///
/// # Errors
///
/// See [`publish`].
pub fn notify_profile(
    sender: &EventSender<'_>,
    index: u8,
    connected: bool,
    open: bool,
) -> Result<(), EventPublishError> {
    status::record_profile(index, connected, open);
    publish(sender, ConnectivityChanged.into())
}

/// Records the split link state (peripheral role) and publishes the change.
///
/// # Errors
///
/// See [`publish`].
pub fn notify_central_link(
    sender: &EventSender<'_>,
    linked: bool,
) -> Result<(), EventPublishError> {
    status::record_central_link(linked);
    publish(sender, ConnectivityChanged.into())
}

/// Records a layer transition and publishes it.
///
/// # Errors
///
/// See [`publish`].
pub fn notify_layer(
    sender: &EventSender<'_>,
    layer: u8,
    active: bool,
) -> Result<(), EventPublishError> {
    status::record_layer(layer, active);
    publish(sender, LayerStateChanged { layer, active }.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_drops_events_once_queue_is_full() {
        let channel = EventChannel::new();
        let sender = channel.sender();

        for _ in 0..EVENT_QUEUE_DEPTH {
            assert_eq!(publish(&sender, ConnectivityChanged.into()), Ok(()));
        }
        assert_eq!(
            publish(&sender, ConnectivityChanged.into()),
            Err(EventPublishError::QueueFull)
        );
    }

    #[test]
    fn published_events_arrive_in_order() {
        let channel = EventChannel::new();
        let sender = channel.sender();
        let receiver = channel.receiver();

        publish(&sender, BatteryStateChanged { state_of_charge: 42 }.into()).unwrap();
        publish(
            &sender,
            LayerStateChanged {
                layer: 1,
                active: true,
            }
            .into(),
        )
        .unwrap();

        assert_eq!(
            receiver.try_receive().unwrap(),
            IndicatorEvent::Battery(BatteryStateChanged { state_of_charge: 42 })
        );
        assert!(matches!(
            receiver.try_receive().unwrap(),
            IndicatorEvent::Layer(LayerStateChanged { layer: 1, active: true })
        ));
    }
}
