//! The closed set of visual effects and their per-effect frame state.
//!
//! Each call to [`EffectLibrary::advance`] draws exactly one frame of one
//! effect onto a [`PixelSurface`], presents it, and steps that effect's own
//! counters. No effect reads another effect's state.

use crate::color::{self, AMBER, BLACK, BLUE, GREEN, RED, Rgb8, WHITE};
use crate::surface::PixelSurface;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Every effect the controller can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Scrolling rainbow across the strip.
    RainbowWave,
    /// Red, green, blue wipes one cell at a time.
    ColorWipe,
    /// Whole strip in one slowly rotating hue.
    Fade,
    /// Random twinkles over a fading strip.
    Sparkle,
    /// A single colored head bouncing sinusoidally along the strip.
    Meteor,
    /// Whole strip in one hue with pulsing global brightness.
    Breathing,
    /// White lamps on both ends.
    Reverse,
    /// Amber lamps on both ends, blinking.
    TurnSignal,
    /// Amber sweep on the head segment toward index 0.
    DirectionLeft,
    /// Amber sweep on the tail segment toward the last index.
    DirectionRight,
    /// Red lamps on both ends.
    Stop,
}

impl Effect {
    /// Ambient rotation order used in Normal mode.
    pub const AMBIENT: [Effect; 6] = [
        Effect::RainbowWave,
        Effect::ColorWipe,
        Effect::Fade,
        Effect::Sparkle,
        Effect::Meteor,
        Effect::Breathing,
    ];

    /// Human-readable name for status lines.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::RainbowWave => "rainbow wave",
            Effect::ColorWipe => "color wipe",
            Effect::Fade => "fade",
            Effect::Sparkle => "sparkle",
            Effect::Meteor => "meteor",
            Effect::Breathing => "breathing",
            Effect::Reverse => "reverse",
            Effect::TurnSignal => "turn signal",
            Effect::DirectionLeft => "left",
            Effect::DirectionRight => "right",
            Effect::Stop => "stop",
        }
    }

    /// Returns true for effects in the Normal-mode rotation.
    pub fn is_ambient(&self) -> bool {
        Self::AMBIENT.contains(self)
    }
}

/// Per-frame inputs shared by all effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Monotonic time in milliseconds, drives the sinusoidal effects.
    pub now_ms: u64,
    /// Highest global brightness an effect may set.
    pub brightness_ceiling: u8,
}

const RAINBOW_DELTA_HUE: u8 = 7;
const WIPE_COLORS: [Rgb8; 3] = [RED, GREEN, BLUE];
const WIPE_FADE: u8 = 64;
const FADE_AMOUNT: u8 = 20;
const SPARKLE_FADE: u8 = 128;
const SPARKLE_SATURATION: u8 = 200;
const METEOR_FADE: u8 = 64;
const METEOR_VALUE: u8 = 192;
const METEOR_BPM: u32 = 13;
const BREATHING_BPM: u32 = 30;

// The stop lamp's blink gate has always evaluated true, so the lamp never
// goes dark. Kept as is until blinking brake lights are asked for.
const STOP_ALWAYS_LIT: bool = true;

#[derive(Debug, Clone, Copy, Default)]
struct WipeState {
    position: usize,
    color_index: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct SweepState {
    position: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct BlinkState {
    lit: bool,
}

/// Rolling state of every effect.
#[derive(Debug, Clone)]
pub struct EffectLibrary {
    segment: usize,
    breathing_floor: u8,
    rainbow_hue: u8,
    fade_hue: u8,
    meteor_hue: u8,
    breathing_hue: u8,
    wipe: WipeState,
    sparkle_rng: SmallRng,
    left: SweepState,
    right: SweepState,
    turn: BlinkState,
    stop: BlinkState,
}

impl EffectLibrary {
    /// Creates the library.
    ///
    /// # Arguments
    /// * `segment` - Cells lit at each end by the signal effects
    /// * `breathing_floor` - Lowest brightness of the breathing pulse
    /// * `seed` - Seed for the sparkle generator
    pub fn new(segment: usize, breathing_floor: u8, seed: u64) -> Self {
        Self {
            segment,
            breathing_floor,
            rainbow_hue: 0,
            fade_hue: 0,
            meteor_hue: 0,
            breathing_hue: 0,
            wipe: WipeState::default(),
            sparkle_rng: SmallRng::seed_from_u64(seed),
            left: SweepState::default(),
            right: SweepState::default(),
            turn: BlinkState::default(),
            stop: BlinkState::default(),
        }
    }

    /// Draws and presents one frame of `effect`, then advances its state.
    pub fn advance<S: PixelSurface>(&mut self, effect: Effect, surface: &mut S, ctx: FrameContext) {
        match effect {
            Effect::RainbowWave => self.rainbow_wave(surface),
            Effect::ColorWipe => self.color_wipe(surface),
            Effect::Fade => self.fade(surface),
            Effect::Sparkle => self.sparkle(surface),
            Effect::Meteor => self.meteor(surface, ctx),
            Effect::Breathing => self.breathing(surface, ctx),
            Effect::Reverse => self.reverse(surface),
            Effect::TurnSignal => self.turn_signal(surface),
            Effect::DirectionLeft => self.direction_left(surface),
            Effect::DirectionRight => self.direction_right(surface),
            Effect::Stop => self.stop(surface),
        }
        surface.present();
    }

    /// Restarts a signal effect from its first frame.
    ///
    /// Ambient effects keep rolling across mode changes and are left alone.
    pub fn reset(&mut self, effect: Effect) {
        match effect {
            Effect::TurnSignal => self.turn = BlinkState::default(),
            Effect::DirectionLeft => self.left = SweepState::default(),
            Effect::DirectionRight => self.right = SweepState::default(),
            Effect::Stop => self.stop = BlinkState::default(),
            _ => {}
        }
    }

    pub fn rainbow_hue(&self) -> u8 {
        self.rainbow_hue
    }

    /// Next cell the color wipe will paint.
    pub fn wipe_position(&self) -> usize {
        self.wipe.position
    }

    /// Index into red, green, blue of the current wipe color.
    pub fn wipe_color_index(&self) -> usize {
        self.wipe.color_index
    }

    /// Cells lit so far by the left and right sweeps.
    pub fn sweep_positions(&self) -> (usize, usize) {
        (self.left.position, self.right.position)
    }

    fn rainbow_wave<S: PixelSurface>(&mut self, surface: &mut S) {
        for index in 0..surface.len() {
            let hue = self
                .rainbow_hue
                .wrapping_add((index as u8).wrapping_mul(RAINBOW_DELTA_HUE));
            surface.set_pixel(index, color::hue8(hue));
        }
        self.rainbow_hue = self.rainbow_hue.wrapping_add(1);
    }

    fn color_wipe<S: PixelSurface>(&mut self, surface: &mut S) {
        let len = surface.len();
        if len == 0 {
            return;
        }

        surface.set_pixel(self.wipe.position, WIPE_COLORS[self.wipe.color_index]);
        self.wipe.position += 1;

        if self.wipe.position >= len {
            self.wipe.position = 0;
            self.wipe.color_index = (self.wipe.color_index + 1) % WIPE_COLORS.len();
            surface.fade_to_black_by(WIPE_FADE);
        }
    }

    fn fade<S: PixelSurface>(&mut self, surface: &mut S) {
        surface.fade_to_black_by(FADE_AMOUNT);
        surface.fill_solid(color::hue8(self.fade_hue));
        self.fade_hue = self.fade_hue.wrapping_add(2);
    }

    fn sparkle<S: PixelSurface>(&mut self, surface: &mut S) {
        surface.fade_to_black_by(SPARKLE_FADE);
        let len = surface.len();
        if len == 0 {
            return;
        }

        let index = self.sparkle_rng.gen_range(0..len);
        let hue: u8 = self.sparkle_rng.r#gen();
        surface.add_to_pixel(index, color::hsv8(hue, SPARKLE_SATURATION, 255));
    }

    fn meteor<S: PixelSurface>(&mut self, surface: &mut S, ctx: FrameContext) {
        surface.fade_to_black_by(METEOR_FADE);
        let len = surface.len();
        if len == 0 {
            return;
        }

        let last = (len - 1).min(u16::MAX as usize) as u16;
        let index = beatsin(ctx.now_ms, METEOR_BPM, 0, last);
        surface.add_to_pixel(usize::from(index), color::hsv8(self.meteor_hue, 255, METEOR_VALUE));
        self.meteor_hue = self.meteor_hue.wrapping_add(3);
    }

    fn breathing<S: PixelSurface>(&mut self, surface: &mut S, ctx: FrameContext) {
        let floor = self.breathing_floor.min(ctx.brightness_ceiling);
        let level = beatsin(
            ctx.now_ms,
            BREATHING_BPM,
            u16::from(floor),
            u16::from(ctx.brightness_ceiling),
        );
        surface.set_brightness(level as u8);
        surface.fill_solid(color::hue8(self.breathing_hue));
        self.breathing_hue = self.breathing_hue.wrapping_add(1);
    }

    fn reverse<S: PixelSurface>(&mut self, surface: &mut S) {
        self.fill_ends(surface, WHITE);
    }

    fn turn_signal<S: PixelSurface>(&mut self, surface: &mut S) {
        self.turn.lit = !self.turn.lit;
        let lamp = if self.turn.lit { AMBER } else { BLACK };
        self.fill_ends(surface, lamp);
    }

    fn direction_left<S: PixelSurface>(&mut self, surface: &mut S) {
        let segment = self.segment.min(surface.len());
        if segment == 0 {
            return;
        }

        if self.left.position == 0 {
            surface.fill_range(0, segment, BLACK);
        }
        surface.set_pixel(segment - 1 - self.left.position, AMBER);
        self.left.position += 1;
        if self.left.position >= segment {
            self.left.position = 0;
        }
    }

    fn direction_right<S: PixelSurface>(&mut self, surface: &mut S) {
        let len = surface.len();
        let segment = self.segment.min(len);
        if segment == 0 {
            return;
        }

        let start = len - segment;
        if self.right.position == 0 {
            surface.fill_range(start, segment, BLACK);
        }
        surface.set_pixel(start + self.right.position, AMBER);
        self.right.position += 1;
        if self.right.position >= segment {
            self.right.position = 0;
        }
    }

    fn stop<S: PixelSurface>(&mut self, surface: &mut S) {
        self.stop.lit = !self.stop.lit;
        #[allow(clippy::overly_complex_bool_expr)]
        let lamp = if STOP_ALWAYS_LIT || self.stop.lit { RED } else { BLACK };
        self.fill_ends(surface, lamp);
    }

    fn fill_ends<S: PixelSurface>(&self, surface: &mut S, lamp: Rgb8) {
        let len = surface.len();
        let segment = self.segment.min(len);
        surface.fill_range(0, segment, lamp);
        surface.fill_range(len - segment, segment, lamp);
    }
}

/// Sine wave over `[low, high]` at `bpm` beats per minute of `now_ms`.
pub fn beatsin(now_ms: u64, bpm: u32, low: u16, high: u16) -> u16 {
    if high <= low || bpm == 0 {
        return low;
    }

    let period_ms = (60_000 / u64::from(bpm)).max(1);
    let phase = (now_ms % period_ms) as f32 / period_ms as f32;
    let wave = (libm::sinf(phase * core::f32::consts::TAU) + 1.0) * 0.5;
    let offset = libm::roundf(wave * f32::from(high - low)) as u16;
    low.saturating_add(offset).min(high)
}
