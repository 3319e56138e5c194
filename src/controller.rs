//! The top-level driver that owns all controller state.
//!
//! Provides [`StripController`], which wires the [`Scheduler`], the
//! [`ModeController`], the [`AutoCycle`] driver, the [`EffectLibrary`] and the
//! [`TemperatureGuard`] to one pixel surface, one temperature sensor and one
//! time source. Call [`StripController::service`] from the main loop.

use crate::auto_cycle::{AutoCycle, PatternChange};
use crate::config::{ConfigError, ControllerConfig};
use crate::effect::{Effect, EffectLibrary, FrameContext};
use crate::mode::{Command, Mode, ModeController, Transition};
use crate::scheduler::{Iterations, Scheduler, SchedulerError};
use crate::surface::PixelSurface;
use crate::temperature::{TemperatureGuard, TemperatureSensor};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use heapless::Vec;

/// One task per effect plus the auto-cycle job.
pub const TASK_CAPACITY: usize = 12;

/// Work item carried by each scheduler task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Job {
    /// Ambient rotation check.
    AutoCycle,
    /// One frame of an effect.
    Effect(Effect),
}

/// Non-blocking source of inbound command bytes (usually a UART).
pub trait CommandSource {
    /// Returns the next pending byte, or `None` if nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Errors that can occur while constructing a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// The configuration was rejected.
    Config(ConfigError),

    /// Task registration failed.
    Scheduler(SchedulerError),
}

impl core::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControllerError::Config(err) => write!(f, "configuration error: {}", err),
            ControllerError::Scheduler(err) => write!(f, "scheduler error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::Config(err)
    }
}

impl From<SchedulerError> for ControllerError {
    fn from(err: SchedulerError) -> Self {
        ControllerError::Scheduler(err)
    }
}

/// All mutable controller state, owned by one [`StripController`].
pub struct ControllerState<I: TimeInstant> {
    scheduler: Scheduler<Job, I, TASK_CAPACITY>,
    modes: ModeController,
    auto_cycle: AutoCycle<I>,
    effects: EffectLibrary,
    guard: TemperatureGuard<I>,
    ambient: Effect,
    epoch: I,
}

impl<I: TimeInstant> ControllerState<I> {
    pub fn scheduler(&self) -> &Scheduler<Job, I, TASK_CAPACITY> {
        &self.scheduler
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn auto_cycle(&self) -> &AutoCycle<I> {
        &self.auto_cycle
    }

    pub fn effects(&self) -> &EffectLibrary {
        &self.effects
    }

    pub fn guard(&self) -> &TemperatureGuard<I> {
        &self.guard
    }
}

/// Drives an LED strip through ambient patterns and signal modes.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `P` - Pixel surface implementation
/// * `H` - Temperature sensor implementation
/// * `T` - Time source implementation
pub struct StripController<'t, I, P, H, T>
where
    I: TimeInstant,
    P: PixelSurface,
    H: TemperatureSensor,
    T: TimeSource<I>,
{
    surface: P,
    sensor: H,
    time_source: &'t T,
    state: ControllerState<I>,
}

impl<'t, I, P, H, T> StripController<'t, I, P, H, T>
where
    I: TimeInstant,
    P: PixelSurface,
    H: TemperatureSensor,
    T: TimeSource<I>,
{
    /// Registers every task and starts in Normal mode on the rainbow wave.
    ///
    /// # Errors
    /// * `Config` - The configuration failed validation
    /// * `Scheduler` - The task table could not hold every task
    pub fn new(
        config: ControllerConfig,
        mut surface: P,
        sensor: H,
        time_source: &'t T,
    ) -> Result<Self, ControllerError> {
        config.validate()?;

        let mut scheduler = Scheduler::new();
        scheduler.add(
            Job::AutoCycle,
            I::Duration::from_millis(config.auto_cycle_period_ms),
            Iterations::Infinite,
        )?;
        for effect in ALL_EFFECTS {
            scheduler.add(
                Job::Effect(effect),
                I::Duration::from_millis(config.periods.period_of(effect)),
                Iterations::Infinite,
            )?;
        }

        let now = time_source.now();
        let mut auto_cycle = AutoCycle::new(I::Duration::from_millis(config.cycle_interval_ms));
        auto_cycle.restart(now);
        let mut guard = TemperatureGuard::new(
            config.brightness,
            config.temperature_threshold,
            I::Duration::from_millis(config.temperature_interval_ms),
        );
        guard.restart(now);

        surface.set_brightness(config.brightness);
        surface.clear();

        let mut controller = Self {
            surface,
            sensor,
            time_source,
            state: ControllerState {
                scheduler,
                modes: ModeController::new(),
                auto_cycle,
                effects: EffectLibrary::new(
                    config.signal_segment,
                    config.breathing_floor,
                    config.sparkle_seed,
                ),
                guard,
                ambient: Effect::RainbowWave,
                epoch: now,
            },
        };
        controller.enable_normal();
        info!("effect: {}", controller.state.ambient.name());

        Ok(controller)
    }

    /// One main-loop iteration: scheduler tick, command polling, temperature
    /// check, in that order.
    ///
    /// # Returns
    /// Time until the next task is due, see [`Scheduler::time_until_next`].
    pub fn service<C: CommandSource>(&mut self, commands: &mut C) -> Option<I::Duration> {
        self.tick();
        self.poll_commands(commands);
        self.check_temperature();
        self.state.scheduler.time_until_next(self.time_source.now())
    }

    /// Runs every due task once, in registration order.
    pub fn tick(&mut self) {
        let now = self.time_source.now();
        for job in self.state.scheduler.tick(now) {
            match job {
                Job::AutoCycle => self.rotate_ambient(now),
                Job::Effect(effect) => {
                    let ctx = FrameContext {
                        now_ms: now.duration_since(self.state.epoch).as_millis(),
                        brightness_ceiling: self.state.guard.level(),
                    };
                    self.state.effects.advance(effect, &mut self.surface, ctx);
                }
            }
        }
    }

    /// Drains every pending command byte. Returns the last transition made.
    pub fn poll_commands<C: CommandSource>(&mut self, commands: &mut C) -> Option<Transition> {
        let mut last = None;
        while let Some(byte) = commands.read_byte() {
            if let Some(transition) = self.handle_byte(byte) {
                last = Some(transition);
            }
        }
        last
    }

    /// Routes one command byte; unknown bytes are dropped.
    ///
    /// A transition disables every task, clears the surface once and enables
    /// exactly the destination mode's tasks before returning.
    pub fn handle_byte(&mut self, byte: u8) -> Option<Transition> {
        let transition = self.state.modes.handle_byte(byte)?;

        self.state.scheduler.disable_all();
        self.surface.clear();
        self.surface.set_brightness(self.state.guard.level());

        match transition.to.signal_effect() {
            Some(effect) => {
                self.state.effects.reset(effect);
                self.state.scheduler.enable_job(Job::Effect(effect));
            }
            None => {
                self.state.auto_cycle.restart(self.time_source.now());
                self.state.ambient = Effect::RainbowWave;
                self.enable_normal();
            }
        }

        info!("mode: {} -> {}", transition.from.name(), transition.to.name());
        Some(transition)
    }

    /// Samples the temperature when due and applies the resulting brightness.
    pub fn check_temperature(&mut self) {
        let now = self.time_source.now();
        if let Some(level) = self.state.guard.poll(now, &mut self.sensor) {
            self.surface.set_brightness(level);
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.modes.mode()
    }

    pub fn last_command(&self) -> Option<Command> {
        self.state.modes.last_command()
    }

    /// Current ambient pattern index.
    pub fn pattern_index(&self) -> usize {
        self.state.auto_cycle.index()
    }

    /// Ambient effect shown while in Normal mode.
    pub fn ambient_effect(&self) -> Effect {
        self.state.ambient
    }

    /// Jobs of all enabled tasks, in registration order.
    pub fn enabled_jobs(&self) -> Vec<Job, TASK_CAPACITY> {
        self.state.scheduler.enabled_jobs()
    }

    pub fn state(&self) -> &ControllerState<I> {
        &self.state
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn sensor_mut(&mut self) -> &mut H {
        &mut self.sensor
    }

    /// Releases the surface and sensor.
    pub fn into_parts(self) -> (P, H) {
        (self.surface, self.sensor)
    }

    fn enable_normal(&mut self) {
        self.state.scheduler.enable_job(Job::AutoCycle);
        self.state.scheduler.enable_job(Job::Effect(self.state.ambient));
    }

    fn rotate_ambient(&mut self, now: I) {
        let mode = self.state.modes.mode();
        let Some(PatternChange { index, effect }) = self.state.auto_cycle.poll(now, mode) else {
            return;
        };

        self.state.scheduler.disable_job(Job::Effect(self.state.ambient));
        self.state.scheduler.enable_job(Job::Effect(effect));
        self.state.ambient = effect;
        // Breathing leaves the global brightness wherever its pulse was.
        self.surface.set_brightness(self.state.guard.level());

        info!("effect {}: {}", index, effect.name());
    }
}

const ALL_EFFECTS: [Effect; 11] = [
    Effect::RainbowWave,
    Effect::ColorWipe,
    Effect::Fade,
    Effect::Sparkle,
    Effect::Meteor,
    Effect::Breathing,
    Effect::Reverse,
    Effect::TurnSignal,
    Effect::DirectionLeft,
    Effect::DirectionRight,
    Effect::Stop,
];
