//! Temperature-based brightness derating.
//!
//! The guard samples a [`TemperatureSensor`] every interval and halves the
//! nominal brightness while the reading is above the threshold. There is no
//! dead-band: a reading hovering around the threshold makes the brightness
//! flip on every check.

use crate::time::{self, TimeInstant};

/// Source of an approximate temperature in degrees Celsius.
pub trait TemperatureSensor {
    /// Takes one reading.
    fn sample(&mut self) -> f32;
}

const ADC_FULL_SCALE: f32 = 1024.0;
const ADC_REFERENCE_VOLTS: f32 = 3.3;

/// Approximate temperature from a raw 10-bit ADC reading of the analog pin.
///
/// Treats the pin as a 10 mV/°C sensor with a 500 mV offset, then applies the
/// board's empirical correction toward die temperature.
pub fn thermistor_celsius(raw: u16) -> f32 {
    let volts = f32::from(raw) * ADC_REFERENCE_VOLTS / ADC_FULL_SCALE;
    let sensor = (volts - 0.5) * 100.0;
    (sensor - 20.0) * 0.98
}

/// A brightness decision made by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Throttle {
    /// At or below the threshold.
    Nominal,
    /// Above the threshold.
    Derated,
}

/// Periodic over-temperature brightness limiter.
pub struct TemperatureGuard<I: TimeInstant> {
    nominal: u8,
    threshold: f32,
    interval: I::Duration,
    last_check: Option<I>,
    throttle: Throttle,
}

impl<I: TimeInstant> TemperatureGuard<I> {
    pub fn new(nominal: u8, threshold: f32, interval: I::Duration) -> Self {
        Self {
            nominal,
            threshold,
            interval,
            last_check: None,
            throttle: Throttle::Nominal,
        }
    }

    /// Starts the check interval at `now` without sampling.
    pub fn restart(&mut self, now: I) {
        self.last_check = Some(now);
    }

    /// Samples the sensor when the interval has elapsed.
    ///
    /// Returns the brightness to apply, or `None` when no check was due.
    pub fn poll<T: TemperatureSensor>(&mut self, now: I, sensor: &mut T) -> Option<u8> {
        if !time::period_elapsed(self.last_check, now, self.interval) {
            return None;
        }
        self.last_check = Some(now);

        let celsius = sensor.sample();
        let throttle = if celsius > self.threshold {
            Throttle::Derated
        } else {
            Throttle::Nominal
        };

        if throttle != self.throttle {
            match throttle {
                Throttle::Derated => warn!("temperature {} above {}, derating", celsius, self.threshold),
                Throttle::Nominal => info!("temperature {} back to nominal", celsius),
            }
        }
        self.throttle = throttle;

        Some(self.level())
    }

    /// Brightness for the current throttle state.
    pub fn level(&self) -> u8 {
        match self.throttle {
            Throttle::Nominal => self.nominal,
            Throttle::Derated => self.nominal / 2,
        }
    }

    pub fn throttle(&self) -> Throttle {
        self.throttle
    }
}
