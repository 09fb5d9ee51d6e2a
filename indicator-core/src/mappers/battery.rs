//! Battery indications: the startup readout and the critical warning.

use crate::blink::{BlinkRate, BlinkRequest};
use crate::config::{BatteryThresholds, IndicatorConfig};
use crate::events::{BatteryStateChanged, Dispatch, EventListener};
use crate::queue::{BlinkQueueProducer, EnqueueTally};
use crate::readiness::Readiness;

/// Band a startup battery reading falls into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BatteryBand {
    /// The gauge still reads `0`.
    Undetermined,
    /// At or above the high threshold.
    High,
    /// At or above the low threshold.
    Medium,
    /// Above zero but below the low threshold.
    Low,
}

impl BatteryBand {
    #[must_use]
    pub const fn classify(level: u8, thresholds: BatteryThresholds) -> Self {
        if level == 0 {
            BatteryBand::Undetermined
        } else if level >= thresholds.high {
            BatteryBand::High
        } else if level >= thresholds.low {
            BatteryBand::Medium
        } else {
            BatteryBand::Low
        }
    }

    /// Rate shown for this band at startup.
    ///
    /// [`BatteryBand::Low`] has no distinct pattern on a single-colour light
    /// and leaves the light off.
    #[must_use]
    pub const fn rate(self) -> BlinkRate {
        match self {
            BatteryBand::Undetermined | BatteryBand::Low => BlinkRate::Off,
            BatteryBand::High => BlinkRate::Slow,
            BatteryBand::Medium => BlinkRate::Fast,
        }
    }
}

/// Startup indication for a battery reading, marked as the first request.
#[must_use]
pub fn startup_request(level: u8, config: &IndicatorConfig) -> BlinkRequest {
    let band = BatteryBand::classify(level, config.battery);
    BlinkRequest::new(band.rate(), config.timing.battery_blink_ms).first()
}

/// Whether `level` is a known level at or below the critical threshold.
#[must_use]
pub const fn is_critical(level: u8, thresholds: BatteryThresholds) -> bool {
    level > 0 && level <= thresholds.critical
}

/// Warns about critical battery levels. Healthy levels show nothing.
#[derive(Copy, Clone, Debug)]
pub struct BatteryMapper {
    config: IndicatorConfig,
}

impl BatteryMapper {
    #[must_use]
    pub const fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// Warning for `level`, if it is critical.
    #[must_use]
    pub fn warning(&self, level: u8) -> Option<BlinkRequest> {
        is_critical(level, self.config.battery)
            .then(|| BlinkRequest::new(BlinkRate::Fast, self.config.timing.battery_blink_ms))
    }
}

impl EventListener<BatteryStateChanged> for BatteryMapper {
    fn on_event<Q: BlinkQueueProducer>(
        &self,
        event: &BatteryStateChanged,
        readiness: Readiness,
        queue: &mut Q,
    ) -> Dispatch {
        if !readiness.is_ready() {
            return Dispatch::NotReady;
        }
        let Some(request) = self.warning(event.state_of_charge) else {
            return Dispatch::Ignored;
        };
        let mut tally = EnqueueTally::default();
        tally.record(queue.try_enqueue(request));
        Dispatch::Queued(tally)
    }
}
