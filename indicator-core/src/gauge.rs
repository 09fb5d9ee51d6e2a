//! Conversion from a sampled cell voltage to a charge percentage.

/// Cell voltage treated as empty.
pub const EMPTY_MV: u16 = 3_450;
/// Cell voltage treated as full.
pub const FULL_MV: u16 = 4_200;

/// Supply voltage at which the VREFINT calibration word was taken.
pub const VREFINT_CAL_MV: u64 = 3_000;
/// Full-scale count of a 12-bit converter.
pub const ADC_FULL_SCALE: u64 = 4_095;
/// Battery divider ratio (two equal resistors).
pub const DIVIDER_RATIO: u64 = 2;

/// Cell voltage behind the divider from one raw sample.
///
/// `reference` is the VREFINT reading taken alongside `raw` and
/// `calibration` its factory value. Returns `None` while the reference reads
/// zero or when the result does not fit a `u16`.
#[must_use]
pub fn divided_millivolts(raw: u16, reference: u16, calibration: u16) -> Option<u16> {
    if reference == 0 {
        return None;
    }
    let vdda_mv = VREFINT_CAL_MV * u64::from(calibration) / u64::from(reference);
    let battery_mv = u64::from(raw) * vdda_mv / ADC_FULL_SCALE * DIVIDER_RATIO;
    u16::try_from(battery_mv).ok()
}

/// Linear Li-ion approximation between [`EMPTY_MV`] and [`FULL_MV`].
///
/// Clamps to `1..=100` for any reading so a measured battery is never
/// confused with the "unknown" level `0`; `None` maps to `0`.
#[must_use]
pub fn soc_from_millivolts(millivolts: Option<u16>) -> u8 {
    let Some(mv) = millivolts else {
        return 0;
    };
    if mv >= FULL_MV {
        return 100;
    }
    if mv <= EMPTY_MV {
        return 1;
    }
    let span = u32::from(FULL_MV - EMPTY_MV);
    let above_empty = u32::from(mv - EMPTY_MV);
    let percent = u8::try_from(above_empty * 100 / span).unwrap_or(100);
    percent.max(1)
}
