//! Configuration primitives for the MSSP I2C driver.

use fugit::HertzU32;

use crate::params::{BusSpeed, ConflictPolicy};

// SSPADD reload values below this are not supported in master mode.
const MIN_DIVISOR: u32 = 3;

/// User-facing configuration for the I2C master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Instruction clock source feeding the baud rate generator (FOSC).
    pub cpu_clock: HertzU32,
    /// Target SCL frequency.
    pub bus_rate: HertzU32,
    /// Handling of bus collisions.
    pub conflict_policy: ConflictPolicy,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether the clock pair yields a usable divisor.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        self.divisor().map(|_| ())
    }

    /// Baud rate generator reload value, `cpu_clock / (4 * bus_rate) - 1`.
    pub fn divisor(&self) -> core::result::Result<u8, ConfigError> {
        clock_divisor(self.cpu_clock, self.bus_rate)
    }
}

/// Computes the `SSPADD` reload value for the requested bus rate.
///
/// The division truncates, so the resulting bus clock is never faster than
/// requested.
pub fn clock_divisor(cpu_clock: HertzU32, bus_rate: HertzU32) -> core::result::Result<u8, ConfigError> {
    let rate = bus_rate.raw();
    if rate == 0 {
        return Err(ConfigError::ZeroBusRate);
    }

    let ticks = (cpu_clock.raw() as u64 / (4 * rate as u64)) as u32;
    let divisor = ticks.checked_sub(1).ok_or(ConfigError::BusRateTooHigh)?;
    if divisor < MIN_DIVISOR {
        return Err(ConfigError::BusRateTooHigh);
    }

    u8::try_from(divisor).map_err(|_| ConfigError::BusRateTooLow)
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the CPU clock frequency.
    pub fn cpu_clock(mut self, cpu_clock: HertzU32) -> Self {
        self.config.cpu_clock = cpu_clock;
        self
    }

    /// Overrides the bus rate with an arbitrary frequency.
    pub fn bus_rate(mut self, bus_rate: HertzU32) -> Self {
        self.config.bus_rate = bus_rate;
        self
    }

    /// Selects one of the standard bus rates.
    pub fn bus_speed(mut self, speed: BusSpeed) -> Self {
        self.config.bus_rate = speed.rate();
        self
    }

    /// Sets how bus collisions are handled.
    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.config.conflict_policy = policy;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_clock: HertzU32::MHz(48),
            bus_rate: BusSpeed::Standard.rate(),
            conflict_policy: ConflictPolicy::Report,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A bus rate of zero was requested.
    ZeroBusRate,
    /// The CPU clock is too slow to generate the requested bus rate.
    BusRateTooHigh,
    /// The divisor does not fit the 8-bit reload register.
    BusRateTooLow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_for_standard_rates_at_48mhz() {
        let clock = HertzU32::MHz(48);
        assert_eq!(clock_divisor(clock, HertzU32::kHz(100)), Ok(0x77));
        assert_eq!(clock_divisor(clock, HertzU32::kHz(400)), Ok(0x1D));
        assert_eq!(clock_divisor(clock, HertzU32::MHz(1)), Ok(0x0B));
    }

    #[test]
    fn default_config_targets_standard_mode() {
        let config = Config::default();
        assert_eq!(config.divisor(), Ok(0x77));
        assert_eq!(config.conflict_policy, ConflictPolicy::Report);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new()
            .cpu_clock(HertzU32::MHz(16))
            .bus_speed(BusSpeed::Fast)
            .conflict_policy(ConflictPolicy::Ignore)
            .build();

        assert_eq!(config.bus_rate.raw(), 400_000);
        assert_eq!(config.divisor(), Ok(9));
        assert_eq!(config.conflict_policy, ConflictPolicy::Ignore);
    }

    #[test]
    fn rejects_unreachable_rates() {
        let clock = HertzU32::MHz(48);
        assert_eq!(clock_divisor(clock, HertzU32::Hz(0)), Err(ConfigError::ZeroBusRate));
        assert_eq!(clock_divisor(clock, HertzU32::MHz(20)), Err(ConfigError::BusRateTooHigh));
        assert_eq!(clock_divisor(clock, HertzU32::MHz(4)), Err(ConfigError::BusRateTooHigh));
        assert_eq!(clock_divisor(clock, HertzU32::kHz(10)), Err(ConfigError::BusRateTooLow));
        assert!(Config::new().bus_rate(HertzU32::Hz(0)).build().validate().is_err());
    }
}
