//! Integration tests for the effect library

mod common;
use common::*;

use palette::Srgb;
use signal_strip::{
    AMBER, BLACK, Effect, EffectLibrary, FrameContext, GREEN, PixelSurface, RED, WHITE,
};

const SEGMENT: usize = 15;

fn library() -> EffectLibrary {
    EffectLibrary::new(SEGMENT, 10, 42)
}

fn ctx(now_ms: u64) -> FrameContext {
    FrameContext {
        now_ms,
        brightness_ceiling: 50,
    }
}

fn lit(surface: &MockSurface) -> Vec<usize> {
    surface
        .pixels()
        .iter()
        .enumerate()
        .filter(|(_, p)| **p != BLACK)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn every_frame_presents_once() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    for (i, effect) in Effect::AMBIENT.iter().enumerate() {
        effects.advance(*effect, &mut surface, ctx(0));
        assert_eq!(surface.presents, i + 1);
    }
}

#[test]
fn rainbow_hue_rolls_forward() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    effects.advance(Effect::RainbowWave, &mut surface, ctx(0));
    assert_eq!(surface.pixel(0), RED);
    let second = surface.pixel(1);

    effects.advance(Effect::RainbowWave, &mut surface, ctx(50));
    assert_eq!(effects.rainbow_hue(), 2);
    assert_ne!(surface.pixel(1), second);
}

#[test]
fn color_wipe_wraps_and_changes_color() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    for frame in 0..STRIP_LEN {
        effects.advance(Effect::ColorWipe, &mut surface, ctx(frame as u64 * 100));
    }

    assert_eq!(effects.wipe_position(), 0);
    assert_eq!(effects.wipe_color_index(), 1);
    // The finished red pass is dimmed by a quarter on wrap.
    assert!(surface.pixels().iter().all(|p| *p == Srgb::new(191, 0, 0)));

    effects.advance(Effect::ColorWipe, &mut surface, ctx(6_000));
    assert_eq!(surface.pixel(0), GREEN);
    assert_eq!(effects.wipe_position(), 1);
}

#[test]
fn sparkle_never_dims_below_the_faded_base() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    for frame in 0..100 {
        surface.fill_solid(Srgb::new(250, 250, 250));
        effects.advance(Effect::Sparkle, &mut surface, ctx(frame * 50));

        // Base after a 50% fade is 125 in every channel.
        for p in surface.pixels() {
            assert!(p.red >= 125 && p.green >= 125 && p.blue >= 125);
        }
        let brighter = surface
            .pixels()
            .iter()
            .filter(|p| **p != Srgb::new(125, 125, 125))
            .count();
        assert!(brighter <= 1);
    }
}

#[test]
fn sparkle_is_reproducible_from_its_seed() {
    let mut a = library();
    let mut b = library();
    let mut sa = MockSurface::new(STRIP_LEN);
    let mut sb = MockSurface::new(STRIP_LEN);

    for frame in 0..20 {
        a.advance(Effect::Sparkle, &mut sa, ctx(frame));
        b.advance(Effect::Sparkle, &mut sb, ctx(frame));
    }

    assert_eq!(sa.pixels(), sb.pixels());
}

#[test]
fn meteor_head_starts_mid_strip() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    effects.advance(Effect::Meteor, &mut surface, ctx(0));

    assert_eq!(lit(&surface), vec![30]);
    assert_eq!(surface.pixel(30), Srgb::new(192, 0, 0));
}

#[test]
fn meteor_stays_on_the_strip() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    for t in (0..20_000).step_by(30) {
        effects.advance(Effect::Meteor, &mut surface, ctx(t));
        assert_eq!(surface.pixels().len(), STRIP_LEN);
    }
    assert!(!lit(&surface).is_empty());
}

#[test]
fn breathing_pulses_between_floor_and_ceiling() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    let mut lowest = u8::MAX;
    let mut highest = 0;
    for t in (0..2_000).step_by(20) {
        effects.advance(Effect::Breathing, &mut surface, ctx(t));
        let level = surface.brightness();
        assert!((10..=50).contains(&level));
        lowest = lowest.min(level);
        highest = highest.max(level);
    }

    assert!(lowest <= 11);
    assert!(highest >= 49);
}

#[test]
fn reverse_lights_both_ends_white() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    effects.advance(Effect::Reverse, &mut surface, ctx(0));

    let expected: Vec<usize> = (0..SEGMENT).chain(STRIP_LEN - SEGMENT..STRIP_LEN).collect();
    assert_eq!(lit(&surface), expected);
    assert_eq!(surface.pixel(0), WHITE);
}

#[test]
fn left_sweep_fills_then_restarts() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    for _ in 0..SEGMENT {
        effects.advance(Effect::DirectionLeft, &mut surface, ctx(0));
    }
    assert_eq!(lit(&surface), (0..SEGMENT).collect::<Vec<_>>());
    assert_eq!(effects.sweep_positions(), (0, 0));

    effects.advance(Effect::DirectionLeft, &mut surface, ctx(0));
    assert_eq!(lit(&surface), vec![SEGMENT - 1]);
    assert_eq!(surface.pixel(SEGMENT - 1), AMBER);
}

#[test]
fn right_sweep_mirrors_left() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    effects.advance(Effect::DirectionRight, &mut surface, ctx(0));
    assert_eq!(lit(&surface), vec![STRIP_LEN - SEGMENT]);

    for _ in 1..SEGMENT {
        effects.advance(Effect::DirectionRight, &mut surface, ctx(0));
    }
    assert_eq!(
        lit(&surface),
        (STRIP_LEN - SEGMENT..STRIP_LEN).collect::<Vec<_>>()
    );

    effects.advance(Effect::DirectionRight, &mut surface, ctx(0));
    assert_eq!(lit(&surface), vec![STRIP_LEN - SEGMENT]);
}

#[test]
fn signals_clamp_to_short_strips() {
    let mut effects = library();
    let mut surface = MockSurface::new(10);

    effects.advance(Effect::Stop, &mut surface, ctx(0));
    assert!(surface.pixels().iter().all(|p| *p == RED));

    surface.clear();
    for _ in 0..10 {
        effects.advance(Effect::DirectionLeft, &mut surface, ctx(0));
    }
    assert_eq!(lit(&surface).len(), 10);
}

#[test]
fn empty_strip_is_harmless() {
    let mut effects = library();
    let mut surface = MockSurface::new(0);

    for effect in Effect::AMBIENT {
        effects.advance(effect, &mut surface, ctx(100));
    }
    for effect in [
        Effect::Reverse,
        Effect::TurnSignal,
        Effect::DirectionLeft,
        Effect::DirectionRight,
        Effect::Stop,
    ] {
        effects.advance(effect, &mut surface, ctx(100));
    }

    assert_eq!(surface.presents, 11);
}

#[test]
fn reset_restarts_signal_effects() {
    let mut effects = library();
    let mut surface = MockSurface::new(STRIP_LEN);

    for _ in 0..5 {
        effects.advance(Effect::DirectionLeft, &mut surface, ctx(0));
    }
    effects.advance(Effect::TurnSignal, &mut surface, ctx(0));
    effects.advance(Effect::RainbowWave, &mut surface, ctx(0));

    for effect in [Effect::DirectionLeft, Effect::TurnSignal, Effect::RainbowWave] {
        effects.reset(effect);
    }
    assert_eq!(effects.sweep_positions(), (0, 0));
    // Ambient effects keep rolling.
    assert_eq!(effects.rainbow_hue(), 1);

    surface.clear();
    effects.advance(Effect::DirectionLeft, &mut surface, ctx(0));
    assert_eq!(lit(&surface), vec![SEGMENT - 1]);

    surface.clear();
    effects.advance(Effect::TurnSignal, &mut surface, ctx(0));
    assert_eq!(surface.pixel(0), AMBER);
}
