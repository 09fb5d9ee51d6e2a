//! Events delivered to the indicator and the listener capability mappers
//! implement.
//!
//! Registration and delivery belong to the event bus; the indicator only
//! provides listeners that decide and enqueue without blocking.

use crate::queue::{BlinkQueueProducer, EnqueueTally};
use crate::readiness::Readiness;

/// Active profile (central) or split link (peripheral) changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ConnectivityChanged;

/// Battery charge changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BatteryStateChanged {
    pub state_of_charge: u8,
}

/// A keymap layer was activated or deactivated.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LayerStateChanged {
    pub layer: u8,
    pub active: bool,
}

/// Any event the indicator subscribes to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IndicatorEvent {
    Connectivity(ConnectivityChanged),
    Battery(BatteryStateChanged),
    Layer(LayerStateChanged),
}

impl IndicatorEvent {
    /// Short label used in log lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            IndicatorEvent::Connectivity(_) => "connectivity",
            IndicatorEvent::Battery(_) => "battery",
            IndicatorEvent::Layer(_) => "layer",
        }
    }
}

impl From<ConnectivityChanged> for IndicatorEvent {
    fn from(event: ConnectivityChanged) -> Self {
        IndicatorEvent::Connectivity(event)
    }
}

impl From<BatteryStateChanged> for IndicatorEvent {
    fn from(event: BatteryStateChanged) -> Self {
        IndicatorEvent::Battery(event)
    }
}

impl From<LayerStateChanged> for IndicatorEvent {
    fn from(event: LayerStateChanged) -> Self {
        IndicatorEvent::Layer(event)
    }
}

/// Outcome of handing one event to a listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Dispatch {
    /// Boot has not finished; the event was dropped.
    NotReady,
    /// The event does not call for an indication.
    Ignored,
    /// Requests were offered to the queue.
    Queued(EnqueueTally),
}

impl Dispatch {
    /// Number of requests the queue accepted.
    #[must_use]
    pub const fn accepted(&self) -> u8 {
        match self {
            Dispatch::Queued(tally) => tally.accepted,
            Dispatch::NotReady | Dispatch::Ignored => 0,
        }
    }

    /// Number of requests dropped because the queue was full.
    #[must_use]
    pub const fn dropped(&self) -> u8 {
        match self {
            Dispatch::Queued(tally) => tally.dropped,
            Dispatch::NotReady | Dispatch::Ignored => 0,
        }
    }
}

/// Single-method subscription capability.
pub trait EventListener<E> {
    /// Decides what to show for `event` and enqueues it without blocking.
    fn on_event<Q: BlinkQueueProducer>(
        &self,
        event: &E,
        readiness: Readiness,
        queue: &mut Q,
    ) -> Dispatch;
}
