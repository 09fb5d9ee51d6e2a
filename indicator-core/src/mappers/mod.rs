//! Event-to-indication decision logic.
//!
//! Each mapper listens to one event type and enqueues zero or more
//! [`BlinkRequest`](crate::blink::BlinkRequest)s. [`EventRouter`] fans an
//! [`IndicatorEvent`] out to the mappers enabled by the configuration.

pub mod battery;
pub mod connectivity;
pub mod layer;

pub use battery::{BatteryBand, BatteryMapper, is_critical, startup_request};
pub use connectivity::{ConnectivityIndication, ConnectivityMapper, ConnectivityState};
pub use layer::{LayerMapper, LayerPattern};

use crate::config::IndicatorConfig;
use crate::events::{Dispatch, EventListener, IndicatorEvent};
use crate::queue::BlinkQueueProducer;
use crate::readiness::Readiness;
use crate::sources::{ActiveLayers, ConnectivitySource};

/// Routes events to the mappers the configuration enables.
#[derive(Clone, Debug)]
pub struct EventRouter<S, K> {
    config: IndicatorConfig,
    connectivity: ConnectivityMapper<S>,
    battery: BatteryMapper,
    layer: LayerMapper<K>,
}

impl<S: ConnectivitySource, K: ActiveLayers> EventRouter<S, K> {
    #[must_use]
    pub const fn new(config: IndicatorConfig, connectivity: S, keymap: K) -> Self {
        Self {
            config,
            connectivity: ConnectivityMapper::new(config, connectivity),
            battery: BatteryMapper::new(config),
            layer: LayerMapper::new(config, keymap),
        }
    }

    #[must_use]
    pub const fn connectivity(&self) -> &ConnectivityMapper<S> {
        &self.connectivity
    }
}

impl<S: ConnectivitySource, K: ActiveLayers> EventListener<IndicatorEvent> for EventRouter<S, K> {
    fn on_event<Q: BlinkQueueProducer>(
        &self,
        event: &IndicatorEvent,
        readiness: Readiness,
        queue: &mut Q,
    ) -> Dispatch {
        match event {
            IndicatorEvent::Connectivity(event) if self.config.reporting.connectivity => {
                self.connectivity.on_event(event, readiness, queue)
            }
            IndicatorEvent::Battery(event) if self.config.reporting.battery => {
                self.battery.on_event(event, readiness, queue)
            }
            IndicatorEvent::Layer(event) if self.config.reports_layers() => {
                self.layer.on_event(event, readiness, queue)
            }
            _ => Dispatch::Ignored,
        }
    }
}
