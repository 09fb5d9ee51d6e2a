//! Board drivers for the indicator.

#![cfg(target_os = "none")]

pub mod battery;

use embassy_stm32::gpio::Output;
use indicator_core::light::IndicatorLight;

/// Bank of active-high GPIO LEDs addressed by index.
///
/// Indices outside the bank are ignored.
pub struct GpioLeds<'d, const N: usize> {
    outputs: [Output<'d>; N],
}

impl<'d, const N: usize> GpioLeds<'d, N> {
    pub fn new(outputs: [Output<'d>; N]) -> Self {
        Self { outputs }
    }

    fn output_mut(&mut self, index: u8) -> Option<&mut Output<'d>> {
        self.outputs.get_mut(usize::from(index))
    }
}

impl<const N: usize> IndicatorLight for GpioLeds<'_, N> {
    fn turn_on(&mut self, index: u8) {
        if let Some(output) = self.output_mut(index) {
            output.set_high();
        }
    }

    fn turn_off(&mut self, index: u8) {
        if let Some(output) = self.output_mut(index) {
            output.set_low();
        }
    }
}
