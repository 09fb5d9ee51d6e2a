//! Blink rates and the request values that travel through the blink queue.

/// Qualitative blink speed. Each rate other than [`BlinkRate::Off`] renders a
/// single on/off cycle with a fixed half-period.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlinkRate {
    Off,
    Slow,
    Medium,
    Fast,
    Frantic,
}

impl BlinkRate {
    /// Time the light stays on, and then off, for one cycle of this rate.
    ///
    /// Returns `None` for [`BlinkRate::Off`], which never sleeps.
    #[must_use]
    pub const fn half_period_ms(self) -> Option<u32> {
        match self {
            BlinkRate::Off => None,
            BlinkRate::Slow => Some(300),
            BlinkRate::Medium => Some(150),
            BlinkRate::Fast => Some(80),
            BlinkRate::Frantic => Some(20),
        }
    }

    /// Short label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BlinkRate::Off => "off",
            BlinkRate::Slow => "slow",
            BlinkRate::Medium => "medium",
            BlinkRate::Fast => "fast",
            BlinkRate::Frantic => "frantic",
        }
    }
}

/// One indicator pattern waiting to be rendered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlinkRequest {
    pub rate: BlinkRate,
    /// Nominal time spent in this pattern. The renderer plays exactly one
    /// cycle per request, so this does not bound a repeat loop.
    pub duration_ms: u16,
    /// Marks the startup battery indication.
    pub is_first: bool,
    /// Idle time after rendering; `0` selects the configured default gap.
    pub gap_after_ms: u16,
}

impl BlinkRequest {
    /// Creates a request that uses the default inter-request gap.
    #[must_use]
    pub const fn new(rate: BlinkRate, duration_ms: u16) -> Self {
        Self {
            rate,
            duration_ms,
            is_first: false,
            gap_after_ms: 0,
        }
    }

    /// Returns a copy with an explicit gap after rendering.
    #[must_use]
    pub const fn with_gap(mut self, gap_after_ms: u16) -> Self {
        self.gap_after_ms = gap_after_ms;
        self
    }

    /// Returns a copy marked as the startup indication.
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.is_first = true;
        self
    }

    /// Resolves the gap to sleep after this request.
    #[must_use]
    pub const fn gap_ms(&self, default_gap_ms: u16) -> u16 {
        if self.gap_after_ms > 0 {
            self.gap_after_ms
        } else {
            default_gap_ms
        }
    }
}
