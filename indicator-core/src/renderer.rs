//! The single writer of the indicator light.
//!
//! [`Renderer`] drains the blink queue one request at a time. A request always
//! plays to completion before the next one is dequeued; there is no
//! preemption, merging or cancellation.

use embedded_hal_async::delay::DelayNs;

use crate::blink::{BlinkRate, BlinkRequest};
use crate::config::IndicatorConfig;
use crate::light::IndicatorLight;
use crate::queue::{BlinkDequeueError, BlinkQueueConsumer};

/// Drives the light through timed pulses.
pub struct Renderer<L, D> {
    light: L,
    delay: D,
    led_index: u8,
    default_gap_ms: u16,
}

impl<L: IndicatorLight, D: DelayNs> Renderer<L, D> {
    #[must_use]
    pub const fn new(light: L, delay: D, led_index: u8, default_gap_ms: u16) -> Self {
        Self {
            light,
            delay,
            led_index,
            default_gap_ms,
        }
    }

    /// Builds a renderer for the light and default gap named in `config`.
    #[must_use]
    pub const fn from_config(light: L, delay: D, config: &IndicatorConfig) -> Self {
        Self::new(light, delay, config.led_index, config.timing.interval_ms)
    }

    /// Renders one cycle of `rate`.
    ///
    /// `Off` turns the light off and returns without sleeping. Every other
    /// rate is a single on-pulse and off-pulse of its half-period. The
    /// request's `duration_ms` does not stretch this into a repeat loop.
    pub async fn render(&mut self, rate: BlinkRate) {
        let Some(half_period_ms) = rate.half_period_ms() else {
            self.light.turn_off(self.led_index);
            return;
        };

        self.light.turn_on(self.led_index);
        self.delay.delay_ms(half_period_ms).await;
        self.light.turn_off(self.led_index);
        self.delay.delay_ms(half_period_ms).await;
    }

    /// Renders `request` and then idles for its gap.
    pub async fn play(&mut self, request: BlinkRequest) {
        self.render(request.rate).await;
        let gap_ms = request.gap_ms(self.default_gap_ms);
        self.delay.delay_ms(u32::from(gap_ms)).await;
    }

    /// Waits for the next request and plays it.
    ///
    /// # Errors
    ///
    /// Propagates [`BlinkDequeueError`] when the queue is disconnected.
    pub async fn play_next<C: BlinkQueueConsumer>(
        &mut self,
        queue: &mut C,
    ) -> Result<BlinkRequest, BlinkDequeueError> {
        let request = queue.dequeue().await?;
        self.play(request).await;
        Ok(request)
    }

    /// Plays requests until the queue reports disconnection.
    pub async fn run<C: BlinkQueueConsumer>(&mut self, queue: &mut C) -> BlinkDequeueError {
        loop {
            if let Err(error) = self.play_next(queue).await {
                return error;
            }
        }
    }
}
