//! Property-based invariant tests for the effect controllers.
//!
//! These hold for any input:
//!
//! 1. A full type/delete cycle leaves the text empty and advances the phrase by one.
//! 2. Tilt targets never exceed the sensitivity bound.
//! 3. One smoothing step is exactly `C + (T - C) * factor`.
//! 4. The theme reveal radius reaches the farthest viewport corner.
//! 5. Timers fire in due order and cancelled timers never fire.
//! 6. Every spawned particle is removed exactly once.
//! 7. Counters stay within `[0, target]`.

use std::collections::HashMap;
use std::time::Duration;

use folio_core::EffectsConfig;
use folio_core::animation::{CubicBezier, ease_out_quart};
use folio_core::input::Key;
use folio_core::ops::DomOp;
use folio_core::page::{PageSnapshot, Viewport, hooks};
use folio_core::particles::ParticleEmitter;
use folio_core::reveal::counter_value;
use folio_core::schedule::{CancellationToken, TimerQueue};
use folio_core::theme::covering_radius;
use folio_core::tilt::{TiltController, pointer_rotation, smooth_step};
use folio_core::typing::{PhraseCycle, TypingTiming};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn phrase() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{1,24}"
}

fn viewport() -> impl Strategy<Value = Viewport> {
    (1.0f64..4000.0, 1.0f64..4000.0).prop_map(|(w, h)| Viewport::new(w, h))
}

fn key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Left),
        Just(Key::Right),
        Just(Key::Escape),
        Just(Key::Other),
    ]
}

fn tilt_page(viewport: Viewport) -> PageSnapshot {
    PageSnapshot::new()
        .with_hook(hooks::HERO_TILT, 1)
        .with_viewport(viewport)
}

// ── Phrase cycle ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn full_cycle_advances_one_phrase(a in phrase(), b in phrase()) {
        let len = a.chars().count();
        let mut cycle = PhraseCycle::new([a, b], TypingTiming::default()).unwrap();
        for _ in 0..(2 * len) {
            cycle.tick();
        }
        prop_assert_eq!(cycle.current_text(), "");
        prop_assert_eq!(cycle.phrase_index(), 1);
        prop_assert!(!cycle.is_deleting());
    }

    #[test]
    fn displayed_text_is_always_a_prefix(
        phrases in prop::collection::vec(phrase(), 1..5),
        ticks in 0usize..200,
    ) {
        let mut cycle = PhraseCycle::new(phrases.clone(), TypingTiming::default()).unwrap();
        for _ in 0..ticks {
            let index = cycle.phrase_index();
            let frame = cycle.tick();
            prop_assert!(phrases[index].starts_with(&frame.text));
        }
    }
}

// ── Tilt ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pointer_outside_viewport_stays_bounded(
        vp in viewport(),
        x in -1.0e5f64..1.0e5,
        y in -1.0e5f64..1.0e5,
    ) {
        let r = pointer_rotation(x, y, vp, 20.0);
        prop_assert!(r.x.abs() <= 20.0);
        prop_assert!(r.y.abs() <= 20.0);
    }

    #[test]
    fn combined_target_stays_bounded(
        vp in viewport(),
        x in -1.0e4f64..1.0e4,
        y in -1.0e4f64..1.0e4,
        keys in prop::collection::vec(key(), 0..40),
    ) {
        let mut tilt = TiltController::attach(&tilt_page(vp), &EffectsConfig::default()).unwrap();
        tilt.pointer_move(x, y);
        for k in keys {
            tilt.key(k);
        }
        let t = tilt.target();
        prop_assert!(t.x.abs() <= 20.0);
        prop_assert!(t.y.abs() <= 20.0);
        let s = tilt.state();
        prop_assert!(s.key.x.abs() <= 20.0 && s.key.y.abs() <= 20.0);
    }

    #[test]
    fn smoothing_step_is_exact(c in -20.0f64..20.0, t in -20.0f64..20.0) {
        prop_assert_eq!(smooth_step(c, t, 0.1), c + (t - c) * 0.1);
    }
}

// ── Theme reveal ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn covering_radius_reaches_farthest_corner(
        vp in viewport(),
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let (x, y) = (fx * vp.width, fy * vp.height);
        let r = covering_radius(x, y, vp);
        let corners = [(0.0, 0.0), (vp.width, 0.0), (0.0, vp.height), (vp.width, vp.height)];
        let farthest = corners
            .iter()
            .map(|(cx, cy)| (cx - x).hypot(cy - y))
            .fold(0.0f64, f64::max);
        prop_assert!((r - farthest).abs() < 1e-9);
    }

    #[test]
    fn reveal_curve_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let curve = CubicBezier::THEME_REVEAL;
        prop_assert!(curve.ease(lo) <= curve.ease(hi) + 1e-5);
    }
}

// ── Timers ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn timers_fire_in_due_order(
        entries in prop::collection::vec((0u64..1000, any::<bool>()), 0..50),
    ) {
        let live = CancellationToken::new();
        let dead = CancellationToken::new();
        let mut queue = TimerQueue::new();
        for (i, (due, cancel)) in entries.iter().enumerate() {
            let token = if *cancel { &dead } else { &live };
            queue.schedule_at(Duration::from_millis(*due), i, token);
        }
        dead.cancel();

        let mut fired = Vec::new();
        while let Some((due, i)) = queue.pop_due(Duration::from_secs(1)) {
            fired.push((due, i));
        }
        let expected = entries.iter().filter(|(_, c)| !c).count();
        prop_assert_eq!(fired.len(), expected);
        for pair in fired.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        for (_, i) in &fired {
            prop_assert!(!entries[*i].1);
        }
    }
}

// ── Particles ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn each_particle_removed_once_at_lifetime(seed in any::<u64>(), width in 320.0f64..1920.0) {
        let page = PageSnapshot::new()
            .with_hook(hooks::PARTICLES, 1)
            .with_viewport(Viewport::new(width, 800.0));
        let mut emitter =
            ParticleEmitter::attach(&page, &EffectsConfig::default(), Duration::ZERO, seed).unwrap();

        let mut spawned: HashMap<u64, Duration> = HashMap::new();
        let mut removed: HashMap<u64, Duration> = HashMap::new();
        let step = Duration::from_millis(100);
        let mut now = Duration::ZERO;
        while now <= Duration::from_secs(60) {
            let mut ops = Vec::new();
            emitter.poll(now, &mut ops);
            for op in ops {
                match op {
                    DomOp::SpawnParticle { id, style } => {
                        prop_assert!(spawned.insert(id, now + style.lifetime()).is_none());
                    }
                    DomOp::RemoveParticle { id } => {
                        prop_assert!(removed.insert(id, now).is_none());
                    }
                    _ => {}
                }
            }
            now += step;
        }

        for (id, at) in &removed {
            let due = spawned[id];
            prop_assert!(*at >= due && *at < due + step + step);
        }
    }
}

// ── Counters ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn counter_never_exceeds_target(target in any::<u32>(), t in -1.0f32..2.0) {
        let v = counter_value(target, ease_out_quart(t));
        prop_assert!(v <= target);
        prop_assert_eq!(counter_value(target, 1.0), target);
    }
}
