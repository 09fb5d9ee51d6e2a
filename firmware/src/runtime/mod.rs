use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_sync::channel::Channel;
use embassy_time::Delay;
use indicator_core::readiness::ReadinessFlag;
use indicator_core::renderer::Renderer;
use static_cell::StaticCell;

use crate::config::INDICATOR_CONFIG;
use crate::hw::GpioLeds;
use crate::hw::battery::BatterySense;
use crate::indicator::events::EventChannel;
use crate::indicator::{BlinkChannel, BlinkConsumer, BlinkProducer, IndicatorRouter};
use crate::status::SharedStatus;

mod battery_task;
mod boot_task;
mod event_task;
mod render_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

pub(super) static BLINK_QUEUE: BlinkChannel = Channel::new();
pub(super) static EVENT_QUEUE: EventChannel = Channel::new();
pub(super) static READINESS: ReadinessFlag = ReadinessFlag::new();
static ROUTER: StaticCell<IndicatorRouter> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0, PB3, ADC1, ..
    } = hal::init(config);

    let leds = GpioLeds::new([Output::new(PB3, Level::Low, Speed::Low)]);
    let renderer = Renderer::from_config(leds, Delay, &INDICATOR_CONFIG);
    let router: &'static IndicatorRouter =
        ROUTER.init(IndicatorRouter::new(INDICATOR_CONFIG, SharedStatus, SharedStatus));

    spawner
        .spawn(render_task::run(
            renderer,
            BlinkConsumer::new(BLINK_QUEUE.receiver()),
        ))
        .expect("failed to spawn indicator render task");

    spawner
        .spawn(boot_task::run(
            router,
            BlinkProducer::new(BLINK_QUEUE.sender()),
            &READINESS,
        ))
        .expect("failed to spawn indicator boot task");

    spawner
        .spawn(event_task::run(
            router,
            EVENT_QUEUE.receiver(),
            BlinkProducer::new(BLINK_QUEUE.sender()),
            &READINESS,
        ))
        .expect("failed to spawn indicator event task");

    if INDICATOR_CONFIG.reporting.battery {
        let sense = BatterySense::new(Adc::new(ADC1), PA0.degrade_adc());
        spawner
            .spawn(battery_task::run(sense, EVENT_QUEUE.sender()))
            .expect("failed to spawn battery task");
    }

    core::future::pending::<()>().await;
}
