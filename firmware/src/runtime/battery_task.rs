use embassy_time::{Duration, Timer};
use indicator_core::gauge::soc_from_millivolts;

use crate::hw::battery::BatterySense;
use crate::indicator::events::{self, EventSender};

/// Interval between two battery samples.
const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);
/// Settling time before the first sample.
const FIRST_SAMPLE_DELAY: Duration = Duration::from_millis(50);

#[embassy_executor::task]
pub async fn run(mut sense: BatterySense<'static>, events: EventSender<'static>) -> ! {
    let mut last_percent = 0u8;
    Timer::after(FIRST_SAMPLE_DELAY).await;

    loop {
        let millivolts = sense.sample_millivolts();
        let percent = soc_from_millivolts(millivolts);

        if percent != last_percent {
            match millivolts {
                Some(mv) => defmt::info!("battery: {}mV -> {}%", mv, percent),
                None => defmt::warn!("battery: reference not settled, level unknown"),
            }
            if events::notify_battery(&events, percent).is_err() {
                defmt::warn!("battery: event queue full, change dropped");
            }
            last_percent = percent;
        }

        Timer::after(SAMPLE_INTERVAL).await;
    }
}
