//! Operating modes and the single-byte command protocol.
//!
//! [`ModeController`] is the pure state machine: it turns inbound bytes into
//! [`Transition`]s and tracks the last accepted command for toggle-off. The
//! task and surface side effects of a transition are applied by
//! [`StripController`](crate::controller::StripController).

use crate::effect::Effect;

/// The active operating mode. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Ambient patterns rotating on the auto-cycle.
    Normal,
    Reverse,
    TurnSignal,
    DirectionLeft,
    DirectionRight,
    Stop,
}

impl Mode {
    /// The signal effect owned by this mode, `None` for Normal.
    pub fn signal_effect(&self) -> Option<Effect> {
        match self {
            Mode::Normal => None,
            Mode::Reverse => Some(Effect::Reverse),
            Mode::TurnSignal => Some(Effect::TurnSignal),
            Mode::DirectionLeft => Some(Effect::DirectionLeft),
            Mode::DirectionRight => Some(Effect::DirectionRight),
            Mode::Stop => Some(Effect::Stop),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Reverse => "reverse",
            Mode::TurnSignal => "turn signal",
            Mode::DirectionLeft => "left",
            Mode::DirectionRight => "right",
            Mode::Stop => "stop",
        }
    }
}

/// A recognized command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `B`
    Reverse,
    /// `I`
    TurnSignal,
    /// `L`
    Left,
    /// `R`
    Right,
    /// `S`
    Stop,
}

impl Command {
    /// Parses a command byte, ignoring ASCII case.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b'B' => Some(Command::Reverse),
            b'I' => Some(Command::TurnSignal),
            b'L' => Some(Command::Left),
            b'R' => Some(Command::Right),
            b'S' => Some(Command::Stop),
            _ => None,
        }
    }

    /// Canonical (uppercase) trigger byte.
    pub fn trigger(&self) -> u8 {
        match self {
            Command::Reverse => b'B',
            Command::TurnSignal => b'I',
            Command::Left => b'L',
            Command::Right => b'R',
            Command::Stop => b'S',
        }
    }

    /// Mode this command selects.
    pub fn mode(&self) -> Mode {
        match self {
            Command::Reverse => Mode::Reverse,
            Command::TurnSignal => Mode::TurnSignal,
            Command::Left => Mode::DirectionLeft,
            Command::Right => Mode::DirectionRight,
            Command::Stop => Mode::Stop,
        }
    }
}

/// A mode change produced by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

/// Toggle-aware mode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
    last_command: Option<Command>,
}

impl ModeController {
    /// Starts in Normal with no remembered command.
    pub const fn new() -> Self {
        Self {
            mode: Mode::Normal,
            last_command: None,
        }
    }

    /// Routes one inbound byte.
    ///
    /// Repeating the last accepted command returns to Normal and forgets it.
    /// Any other recognized command switches straight to its mode. Unknown
    /// bytes are dropped and yield `None`.
    pub fn handle_byte(&mut self, byte: u8) -> Option<Transition> {
        let command = Command::from_byte(byte)?;
        let from = self.mode;

        if self.last_command == Some(command) {
            self.last_command = None;
            self.mode = Mode::Normal;
        } else {
            self.last_command = Some(command);
            self.mode = command.mode();
        }

        Some(Transition {
            from,
            to: self.mode,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
