//! Controller configuration and its validating builder.

use crate::effect::Effect;

/// Task periods in milliseconds, one per effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPeriods {
    pub rainbow_wave: u64,
    pub color_wipe: u64,
    pub fade: u64,
    pub sparkle: u64,
    pub meteor: u64,
    pub breathing: u64,
    pub reverse: u64,
    pub turn_signal: u64,
    pub direction: u64,
    pub stop: u64,
}

impl EffectPeriods {
    pub const DEFAULT: Self = Self {
        rainbow_wave: 50,
        color_wipe: 100,
        fade: 30,
        sparkle: 50,
        meteor: 30,
        breathing: 20,
        reverse: 100,
        turn_signal: 400,
        direction: 60,
        stop: 100,
    };

    /// Period of the task that runs `effect`.
    pub fn period_of(&self, effect: Effect) -> u64 {
        match effect {
            Effect::RainbowWave => self.rainbow_wave,
            Effect::ColorWipe => self.color_wipe,
            Effect::Fade => self.fade,
            Effect::Sparkle => self.sparkle,
            Effect::Meteor => self.meteor,
            Effect::Breathing => self.breathing,
            Effect::Reverse => self.reverse,
            Effect::TurnSignal => self.turn_signal,
            Effect::DirectionLeft | Effect::DirectionRight => self.direction,
            Effect::Stop => self.stop,
        }
    }

    fn all(&self) -> [u64; 10] {
        [
            self.rainbow_wave,
            self.color_wipe,
            self.fade,
            self.sparkle,
            self.meteor,
            self.breathing,
            self.reverse,
            self.turn_signal,
            self.direction,
            self.stop,
        ]
    }
}

impl Default for EffectPeriods {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the controller needs besides its hardware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Global brightness when not derated.
    pub brightness: u8,
    /// Lowest brightness of the breathing pulse.
    pub breathing_floor: u8,
    /// Period of the auto-cycle job itself.
    pub auto_cycle_period_ms: u64,
    /// Time each ambient pattern stays on before rotating.
    pub cycle_interval_ms: u64,
    /// Time between temperature checks.
    pub temperature_interval_ms: u64,
    /// Readings above this derate brightness.
    pub temperature_threshold: f32,
    /// Cells lit at each end by the signal effects.
    pub signal_segment: usize,
    /// Seed for the sparkle generator.
    pub sparkle_seed: u64,
    pub periods: EffectPeriods,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        brightness: 50,
        breathing_floor: 10,
        auto_cycle_period_ms: 50,
        cycle_interval_ms: 10_000,
        temperature_interval_ms: 10_000,
        temperature_threshold: 45.0,
        signal_segment: 15,
        sparkle_seed: 0x5EED_1ED5,
        periods: EffectPeriods::DEFAULT,
    };

    /// Checks the configuration for values the controller cannot run with.
    ///
    /// # Errors
    /// * `ZeroBrightness` - Nominal brightness is zero
    /// * `ZeroPeriod` - An effect or auto-cycle period is zero
    /// * `ZeroInterval` - Cycle or temperature interval is zero
    /// * `BreathingFloorAboveBrightness` - Floor exceeds nominal brightness
    /// * `InvalidThreshold` - Threshold is NaN or infinite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brightness == 0 {
            return Err(ConfigError::ZeroBrightness);
        }

        if self.auto_cycle_period_ms == 0 || self.periods.all().contains(&0) {
            return Err(ConfigError::ZeroPeriod);
        }

        if self.cycle_interval_ms == 0 || self.temperature_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.breathing_floor > self.brightness {
            return Err(ConfigError::BreathingFloorAboveBrightness);
        }

        if !self.temperature_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold);
        }

        Ok(())
    }

    /// Starts a builder from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Nominal brightness is zero.
    ZeroBrightness,

    /// A task period is zero.
    ZeroPeriod,

    /// The auto-cycle or temperature interval is zero.
    ZeroInterval,

    /// Breathing floor is above nominal brightness.
    BreathingFloorAboveBrightness,

    /// Temperature threshold is not a finite number.
    InvalidThreshold,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroBrightness => write!(f, "brightness must be non-zero"),
            ConfigError::ZeroPeriod => write!(f, "task periods must be non-zero"),
            ConfigError::ZeroInterval => {
                write!(f, "cycle and temperature intervals must be non-zero")
            }
            ConfigError::BreathingFloorAboveBrightness => {
                write!(f, "breathing floor must not exceed brightness")
            }
            ConfigError::InvalidThreshold => {
                write!(f, "temperature threshold must be a finite number")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Builder for validated [`ControllerConfig`]s.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: ControllerConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::DEFAULT,
        }
    }

    pub fn brightness(mut self, level: u8) -> Self {
        self.config.brightness = level;
        self
    }

    pub fn breathing_floor(mut self, level: u8) -> Self {
        self.config.breathing_floor = level;
        self
    }

    pub fn cycle_interval_ms(mut self, millis: u64) -> Self {
        self.config.cycle_interval_ms = millis;
        self
    }

    pub fn auto_cycle_period_ms(mut self, millis: u64) -> Self {
        self.config.auto_cycle_period_ms = millis;
        self
    }

    pub fn temperature_interval_ms(mut self, millis: u64) -> Self {
        self.config.temperature_interval_ms = millis;
        self
    }

    pub fn temperature_threshold(mut self, celsius: f32) -> Self {
        self.config.temperature_threshold = celsius;
        self
    }

    pub fn signal_segment(mut self, cells: usize) -> Self {
        self.config.signal_segment = cells;
        self
    }

    pub fn sparkle_seed(mut self, seed: u64) -> Self {
        self.config.sparkle_seed = seed;
        self
    }

    pub fn periods(mut self, periods: EffectPeriods) -> Self {
        self.config.periods = periods;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// See [`ControllerConfig::validate`].
    pub fn build(self) -> Result<ControllerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
