//! Ambient pattern rotation for Normal mode.

use crate::effect::Effect;
use crate::mode::Mode;
use crate::time::{self, TimeInstant};

/// Number of ambient patterns in the rotation.
pub const PATTERN_COUNT: usize = Effect::AMBIENT.len();

/// A switch from one ambient pattern to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternChange {
    pub index: usize,
    pub effect: Effect,
}

/// Rotates the ambient pattern every `interval` while in Normal mode.
///
/// The index survives signal modes, so rotation resumes where it left off.
pub struct AutoCycle<I: TimeInstant> {
    index: usize,
    interval: I::Duration,
    last_switch: Option<I>,
}

impl<I: TimeInstant> AutoCycle<I> {
    /// Creates the driver at index 0 (rainbow wave).
    pub fn new(interval: I::Duration) -> Self {
        Self {
            index: 0,
            interval,
            last_switch: None,
        }
    }

    /// Starts (or restarts) the interval at `now`.
    pub fn restart(&mut self, now: I) {
        self.last_switch = Some(now);
    }

    /// Advances the pattern when the interval has elapsed and the mode is
    /// still Normal.
    ///
    /// Outside Normal this is a no-op: it never advances and never restarts
    /// the interval.
    pub fn poll(&mut self, now: I, mode: Mode) -> Option<PatternChange> {
        if mode != Mode::Normal {
            return None;
        }

        match self.last_switch {
            None => {
                self.last_switch = Some(now);
                None
            }
            Some(_) if !time::period_elapsed(self.last_switch, now, self.interval) => None,
            Some(_) => {
                self.last_switch = Some(now);
                self.index = (self.index + 1) % PATTERN_COUNT;
                Some(PatternChange {
                    index: self.index,
                    effect: self.effect(),
                })
            }
        }
    }

    /// Current pattern index in `[0, PATTERN_COUNT)`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Effect selected by the current index.
    pub fn effect(&self) -> Effect {
        Effect::AMBIENT[self.index]
    }
}
