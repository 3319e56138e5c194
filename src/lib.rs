#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`StripController`**: Owns all state and runs one main-loop iteration per `service` call
//! - **`Scheduler`**: Cooperative table of periodic tasks, enabled and disabled but never removed
//! - **`Effect`**: The closed set of ambient and signal effects, drawn by `EffectLibrary`
//! - **`ModeController`**: Toggle-aware state machine over `Mode`, driven by command bytes
//! - **`AutoCycle`**: Rotates the ambient effect while in Normal mode
//! - **`TemperatureGuard`**: Halves brightness while the sensor reads above a threshold
//! - **`PixelSurface`**: Trait to implement for your LED strip (or use `FrameBuffer` + `StripWriter`)
//! - **`TemperatureSensor`**: Trait to implement for your temperature reading
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Pixels are `Srgb<u8>`; hues use the 0..=255 color wheel common to LED strip code.

#[macro_use]
mod fmt;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod auto_cycle;
pub mod color;
pub mod config;
pub mod controller;
pub mod effect;
pub mod mode;
pub mod scheduler;
pub mod surface;
pub mod temperature;
pub mod time;

pub use auto_cycle::{AutoCycle, PATTERN_COUNT, PatternChange};
pub use color::{AMBER, BLACK, BLUE, GREEN, RED, Rgb8, WHITE};
pub use config::{ConfigBuilder, ConfigError, ControllerConfig, EffectPeriods};
pub use controller::{
    CommandSource, ControllerError, ControllerState, Job, StripController, TASK_CAPACITY,
};
pub use effect::{Effect, EffectLibrary, FrameContext};
pub use mode::{Command, Mode, ModeController, Transition};
pub use scheduler::{Iterations, Scheduler, SchedulerError, Task, TaskId};
pub use surface::{FrameBuffer, PixelSurface, StripWriter};
pub use temperature::{TemperatureGuard, TemperatureSensor, Throttle, thermistor_celsius};
pub use time::{TimeDuration, TimeInstant, TimeSource};
