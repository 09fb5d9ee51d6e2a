//! One-shot startup sequence.
//!
//! After the startup delay the sequencer shows the battery level, waits for
//! that indication to finish rendering, shows the connectivity state, and only
//! then marks the indicator ready. The renderer has no preemption, so the two
//! startup indications are serialized with an explicit sleep.

use embedded_hal_async::delay::DelayNs;

use crate::config::IndicatorConfig;
use crate::events::Dispatch;
use crate::mappers::{BatteryBand, ConnectivityIndication, ConnectivityMapper, startup_request};
use crate::queue::{BlinkQueueProducer, EnqueueTally};
use crate::readiness::ReadinessFlag;
use crate::sources::{BatteryGauge, ConnectivitySource};

/// Additional reads attempted while the gauge still reports `0`.
pub const BATTERY_READ_RETRIES: u8 = 10;
/// Delay between two battery reads.
pub const BATTERY_RETRY_DELAY_MS: u32 = 100;

/// Startup battery reading and what was shown for it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BatteryReadout {
    pub level: u8,
    pub retries: u8,
    pub band: BatteryBand,
    pub dispatch: Dispatch,
}

/// Summary of a completed boot sequence, for logging.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BootReport {
    /// `None` when battery reporting is disabled.
    pub battery: Option<BatteryReadout>,
    /// `None` when connectivity reporting is disabled.
    pub connectivity: Option<ConnectivityIndication>,
}

/// Runs the startup indications and flips readiness.
pub struct BootSequencer<'a, B, S> {
    config: IndicatorConfig,
    battery: B,
    connectivity: &'a ConnectivityMapper<S>,
}

impl<'a, B: BatteryGauge, S: ConnectivitySource> BootSequencer<'a, B, S> {
    pub const fn new(
        config: IndicatorConfig,
        battery: B,
        connectivity: &'a ConnectivityMapper<S>,
    ) -> Self {
        Self {
            config,
            battery,
            connectivity,
        }
    }

    /// Reads the battery, retrying while it reports `0`.
    ///
    /// Returns the last reading and the number of retries used. A reading
    /// still at `0` after the retries is a valid undetermined level.
    pub async fn read_battery<D: DelayNs>(&self, delay: &mut D) -> (u8, u8) {
        let mut level = self.battery.state_of_charge();
        let mut retries = 0;
        while level == 0 && retries < BATTERY_READ_RETRIES {
            delay.delay_ms(BATTERY_RETRY_DELAY_MS).await;
            level = self.battery.state_of_charge();
            retries += 1;
        }
        (level, retries)
    }

    /// Runs the whole sequence and marks `readiness` ready.
    pub async fn run<Q, D>(
        &self,
        queue: &mut Q,
        delay: &mut D,
        readiness: &ReadinessFlag,
    ) -> BootReport
    where
        Q: BlinkQueueProducer,
        D: DelayNs,
    {
        let timing = self.config.timing;
        delay.delay_ms(u32::from(timing.boot_delay_ms)).await;

        let mut report = BootReport::default();

        if self.config.reporting.battery {
            let (level, retries) = self.read_battery(delay).await;
            let mut tally = EnqueueTally::default();
            tally.record(queue.try_enqueue(startup_request(level, &self.config)));
            report.battery = Some(BatteryReadout {
                level,
                retries,
                band: BatteryBand::classify(level, self.config.battery),
                dispatch: Dispatch::Queued(tally),
            });

            // let the battery indication finish before queueing the next one
            let settle_ms = u32::from(timing.battery_blink_ms) + u32::from(timing.interval_ms);
            delay.delay_ms(settle_ms).await;
        }

        if self.config.reporting.connectivity {
            report.connectivity = Some(self.connectivity.indicate(queue));
        }

        readiness.mark_ready();
        report
    }
}
