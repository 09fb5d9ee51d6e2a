use embassy_time::Delay;
use indicator_core::boot::BootSequencer;
use indicator_core::readiness::ReadinessFlag;

use crate::config::INDICATOR_CONFIG;
use crate::indicator::{self, BlinkProducer, IndicatorRouter};
use crate::status::SharedStatus;

#[embassy_executor::task]
pub async fn run(
    router: &'static IndicatorRouter,
    mut queue: BlinkProducer<'static>,
    readiness: &'static ReadinessFlag,
) {
    let sequencer = BootSequencer::new(INDICATOR_CONFIG, SharedStatus, router.connectivity());
    let report = sequencer.run(&mut queue, &mut Delay, readiness).await;
    indicator::report_boot(&report);
}
