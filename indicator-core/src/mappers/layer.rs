//! Layer indications: one quick blink per active layer above base, then a
//! slower confirming blink.

use crate::blink::{BlinkRate, BlinkRequest};
use crate::config::IndicatorConfig;
use crate::events::{Dispatch, EventListener, LayerStateChanged};
use crate::queue::{BlinkQueueProducer, enqueue_all};
use crate::readiness::Readiness;
use crate::sources::ActiveLayers;

/// Iterator over the requests that count out `layer`.
#[derive(Clone, Debug)]
pub struct LayerPattern {
    emitted: u8,
    layer: u8,
    blink_ms: u16,
}

impl LayerPattern {
    #[must_use]
    pub const fn new(layer: u8, blink_ms: u16) -> Self {
        Self {
            emitted: 0,
            layer,
            blink_ms,
        }
    }
}

impl Iterator for LayerPattern {
    type Item = BlinkRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.layer {
            return None;
        }
        self.emitted += 1;
        let request = if self.emitted < self.layer {
            BlinkRequest::new(BlinkRate::Frantic, self.blink_ms).with_gap(self.blink_ms)
        } else {
            BlinkRequest::new(BlinkRate::Medium, self.blink_ms)
        };
        Some(request)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.layer - self.emitted);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LayerPattern {}

/// Counts out the highest active layer whenever a layer is activated.
#[derive(Clone, Debug)]
pub struct LayerMapper<K> {
    config: IndicatorConfig,
    keymap: K,
}

impl<K: ActiveLayers> LayerMapper<K> {
    #[must_use]
    pub const fn new(config: IndicatorConfig, keymap: K) -> Self {
        Self { config, keymap }
    }

    /// Pattern for the layers currently active.
    #[must_use]
    pub fn pattern(&self) -> LayerPattern {
        LayerPattern::new(
            self.keymap.highest_active_layer(),
            self.config.timing.layer_blink_ms,
        )
    }
}

impl<K: ActiveLayers> EventListener<LayerStateChanged> for LayerMapper<K> {
    fn on_event<Q: BlinkQueueProducer>(
        &self,
        event: &LayerStateChanged,
        readiness: Readiness,
        queue: &mut Q,
    ) -> Dispatch {
        if !readiness.is_ready() {
            return Dispatch::NotReady;
        }
        if !event.active {
            return Dispatch::Ignored;
        }
        let pattern = self.pattern();
        if pattern.layer == 0 {
            return Dispatch::Ignored;
        }
        Dispatch::Queued(enqueue_all(queue, pattern))
    }
}
