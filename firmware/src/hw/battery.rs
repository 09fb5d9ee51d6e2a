//! Battery voltage sampling for the STM32G0.
//!
//! The cell is read through a resistor divider on an ADC pin. Each reading is
//! scaled against VREFINT and its factory calibration so the result does not
//! depend on the exact supply voltage.

use core::ptr;

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime, VrefInt};
use embassy_stm32::peripherals::ADC1;
use indicator_core::gauge::divided_millivolts;

/// Factory-programmed calibration constant sampled at 3.0 V.
const VREFINT_CAL_ADDR: *const u16 = 0x1FFF_75AA as *const u16;

/// Reads the factory-trimmed VREFINT calibration constant.
pub fn read_vrefint_calibration() -> u16 {
    unsafe { ptr::read_volatile(VREFINT_CAL_ADDR) }
}

/// Embassy ADC wrapper that samples the battery divider.
pub struct BatterySense<'d> {
    adc: Adc<'d, ADC1>,
    vrefint: VrefInt,
    sense: AnyAdcChannel<ADC1>,
    calibration: u16,
    discard_next: bool,
}

impl<'d> BatterySense<'d> {
    /// Constructs a new sampler and enables the internal voltage reference.
    pub fn new(mut adc: Adc<'d, ADC1>, sense: AnyAdcChannel<ADC1>) -> Self {
        adc.set_sample_time(SampleTime::CYCLES160_5);
        let vrefint = adc.enable_vrefint();
        Self {
            adc,
            vrefint,
            sense,
            calibration: read_vrefint_calibration(),
            discard_next: true,
        }
    }

    /// Samples the battery voltage in millivolts.
    ///
    /// Returns `None` while the reference still reads zero or when the
    /// scaled value is out of range.
    pub fn sample_millivolts(&mut self) -> Option<u16> {
        if self.discard_next {
            let _ = self.adc.blocking_read(&mut self.vrefint);
            self.discard_next = false;
        }

        let reference = self.adc.blocking_read(&mut self.vrefint);
        let raw = self.adc.blocking_read(&mut self.sense);
        divided_millivolts(raw, reference, self.calibration)
    }
}
