use embassy_time::Delay;
use indicator_core::renderer::Renderer;

use crate::config::LED_COUNT;
use crate::hw::GpioLeds;
use crate::indicator::{self, BlinkConsumer};

#[embassy_executor::task]
pub async fn run(
    mut renderer: Renderer<GpioLeds<'static, LED_COUNT>, Delay>,
    mut queue: BlinkConsumer<'static>,
) -> ! {
    loop {
        // embassy channels never disconnect
        if let Ok(request) = renderer.play_next(&mut queue).await {
            indicator::report_rendered(&request);
        }
    }
}
