//! Build-time configuration for the indicator.
//!
//! Firmware assembles an [`IndicatorConfig`] in a `const` from its cargo
//! features; nothing here changes once the device is running.

use core::fmt;

/// Role of this half in a split keyboard, or [`SplitRole::Central`] for a
/// standalone board.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SplitRole {
    Central,
    Peripheral,
}

/// Durations used when building blink requests.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlinkTiming {
    /// Duration attached to connectivity indications.
    pub output_blink_ms: u16,
    /// Duration attached to battery indications.
    pub battery_blink_ms: u16,
    /// Duration and gap used by the layer count pattern.
    pub layer_blink_ms: u16,
    /// Default idle time between two rendered requests.
    pub interval_ms: u16,
    /// Delay before the boot sequencer starts.
    pub boot_delay_ms: u16,
}

impl BlinkTiming {
    pub const DEFAULT: Self = Self {
        output_blink_ms: 3_000,
        battery_blink_ms: 2_000,
        layer_blink_ms: 100,
        interval_ms: 500,
        boot_delay_ms: 200,
    };
}

/// Battery charge thresholds, in percent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BatteryThresholds {
    pub critical: u8,
    pub low: u8,
    pub high: u8,
}

impl BatteryThresholds {
    pub const DEFAULT: Self = Self {
        critical: 5,
        low: 20,
        high: 80,
    };

    #[must_use]
    pub const fn new(critical: u8, low: u8, high: u8) -> Self {
        Self {
            critical,
            low,
            high,
        }
    }
}

/// Which event sources drive the indicator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Reporting {
    pub connectivity: bool,
    pub battery: bool,
    pub layer: bool,
}

impl Reporting {
    pub const ALL: Self = Self {
        connectivity: true,
        battery: true,
        layer: true,
    };
}

/// Reason a configuration was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A battery threshold lies above 100 %.
    ThresholdOutOfRange(u8),
    /// Thresholds must satisfy `critical <= low <= high`.
    ThresholdOrder,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ThresholdOutOfRange(value) => {
                write!(f, "battery threshold {value}% is above 100%")
            }
            ConfigError::ThresholdOrder => {
                f.write_str("battery thresholds must satisfy critical <= low <= high")
            }
        }
    }
}

/// Complete indicator configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndicatorConfig {
    /// Index of the indicator inside the light driver.
    pub led_index: u8,
    pub timing: BlinkTiming,
    pub battery: BatteryThresholds,
    pub reporting: Reporting,
    pub role: SplitRole,
}

impl IndicatorConfig {
    pub const DEFAULT: Self = Self {
        led_index: 0,
        timing: BlinkTiming::DEFAULT,
        battery: BatteryThresholds::DEFAULT,
        reporting: Reporting::ALL,
        role: SplitRole::Central,
    };

    #[must_use]
    pub const fn with_role(mut self, role: SplitRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub const fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    #[must_use]
    pub const fn with_thresholds(mut self, battery: BatteryThresholds) -> Self {
        self.battery = battery;
        self
    }

    #[must_use]
    pub const fn with_timing(mut self, timing: BlinkTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub const fn with_led_index(mut self, led_index: u8) -> Self {
        self.led_index = led_index;
        self
    }

    /// Layer reporting only applies where the keymap lives.
    #[must_use]
    pub const fn reports_layers(&self) -> bool {
        self.reporting.layer && matches!(self.role, SplitRole::Central)
    }

    /// Checks the battery thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a threshold exceeds 100 % or the
    /// thresholds are out of order.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let BatteryThresholds {
            critical,
            low,
            high,
        } = self.battery;
        if critical > 100 {
            return Err(ConfigError::ThresholdOutOfRange(critical));
        }
        if low > 100 {
            return Err(ConfigError::ThresholdOutOfRange(low));
        }
        if high > 100 {
            return Err(ConfigError::ThresholdOutOfRange(high));
        }
        if critical > low || low > high {
            return Err(ConfigError::ThresholdOrder);
        }
        Ok(())
    }

    /// `const` form of [`IndicatorConfig::validate`] for compile-time asserts.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
