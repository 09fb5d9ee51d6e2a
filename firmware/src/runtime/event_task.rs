use indicator_core::readiness::ReadinessFlag;

use crate::indicator::events::EventReceiver;
use crate::indicator::{self, BlinkProducer, IndicatorRouter};

#[embassy_executor::task]
pub async fn run(
    router: &'static IndicatorRouter,
    events: EventReceiver<'static>,
    mut queue: BlinkProducer<'static>,
    readiness: &'static ReadinessFlag,
) -> ! {
    loop {
        let event = events.receive().await;
        indicator::dispatch(router, &event, readiness, &mut queue);
    }
}
