//! Shared test infrastructure for signal-strip integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::Cell;
use std::collections::VecDeque;

use signal_strip::{
    BLACK, CommandSource, ControllerConfig, PixelSurface, Rgb8, StripController,
    TemperatureSensor, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Surface
// ============================================================================

/// Pixel surface that counts clears and presents
pub struct MockSurface {
    pixels: Vec<Rgb8>,
    brightness: u8,
    pub clears: usize,
    pub presents: usize,
}

impl MockSurface {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![BLACK; len],
            brightness: 0,
            clears: 0,
            presents: 0,
        }
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }
}

impl PixelSurface for MockSurface {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn pixel(&self, index: usize) -> Rgb8 {
        self.pixels.get(index).copied().unwrap_or(BLACK)
    }

    fn set_pixel(&mut self, index: usize, color: Rgb8) {
        if let Some(cell) = self.pixels.get_mut(index) {
            *cell = color;
        }
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.pixels.iter_mut().for_each(|p| *p = BLACK);
    }
}

// ============================================================================
// Mock Sensor and Command Source
// ============================================================================

/// Sensor returning a settable reading and counting samples
pub struct MockSensor {
    pub celsius: f32,
    pub samples: usize,
}

impl MockSensor {
    pub fn new(celsius: f32) -> Self {
        Self {
            celsius,
            samples: 0,
        }
    }
}

impl TemperatureSensor for MockSensor {
    fn sample(&mut self) -> f32 {
        self.samples += 1;
        self.celsius
    }
}

/// Command source replaying a fixed byte script
pub struct ScriptedCommands {
    bytes: VecDeque<u8>,
}

impl ScriptedCommands {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn push(&mut self, byte: u8) {
        self.bytes.push_back(byte);
    }
}

impl CommandSource for ScriptedCommands {
    fn read_byte(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

// ============================================================================
// Controller Helpers
// ============================================================================

pub const STRIP_LEN: usize = 60;

pub type TestController<'t> =
    StripController<'t, TestInstant, MockSurface, MockSensor, MockTimeSource>;

/// Controller over a 60-cell mock strip with default configuration
pub fn controller(timer: &MockTimeSource) -> TestController<'_> {
    controller_with(timer, ControllerConfig::DEFAULT)
}

pub fn controller_with(timer: &MockTimeSource, config: ControllerConfig) -> TestController<'_> {
    StripController::new(
        config,
        MockSurface::new(STRIP_LEN),
        MockSensor::new(25.0),
        timer,
    )
    .unwrap()
}

/// Advances time in `step` increments up to `total`, ticking after each step
pub fn run_for(controller: &mut TestController<'_>, timer: &MockTimeSource, total: u64, step: u64) {
    let mut elapsed = 0;
    while elapsed < total {
        timer.advance(step);
        elapsed += step;
        controller.tick();
    }
}
