//! Indicator configuration selected by cargo features.

use indicator_core::config::{IndicatorConfig, Reporting, SplitRole};

/// Index of the indicator inside [`crate::hw::GpioLeds`].
pub const INDICATOR_LED_INDEX: u8 = 0;

/// Number of lights wired to the LED bank.
pub const LED_COUNT: usize = 1;

const REPORTING: Reporting = Reporting {
    connectivity: cfg!(feature = "connectivity-reporting"),
    battery: cfg!(feature = "battery-reporting"),
    layer: cfg!(feature = "layer-reporting"),
};

const ROLE: SplitRole = if cfg!(feature = "split-peripheral") {
    SplitRole::Peripheral
} else {
    SplitRole::Central
};

/// Configuration shared by every indicator task.
pub const INDICATOR_CONFIG: IndicatorConfig = IndicatorConfig::DEFAULT
    .with_led_index(INDICATOR_LED_INDEX)
    .with_reporting(REPORTING)
    .with_role(ROLE);

const _: () = assert!(
    INDICATOR_CONFIG.is_valid(),
    "indicator battery thresholds must satisfy critical <= low <= high <= 100"
);
const _: () = assert!(
    (INDICATOR_LED_INDEX as usize) < LED_COUNT,
    "indicator LED index is outside the LED bank"
);
