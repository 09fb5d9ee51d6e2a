//! Abstraction over the indicator light driver.

/// Synchronous on/off control of one light inside a driver.
///
/// Implementations report no errors; a driver that cannot reach the light
/// fails silently.
pub trait IndicatorLight {
    /// Turns the light at `index` on.
    fn turn_on(&mut self, index: u8);

    /// Turns the light at `index` off.
    fn turn_off(&mut self, index: u8);
}
