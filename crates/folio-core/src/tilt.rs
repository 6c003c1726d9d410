#![forbid(unsafe_code)]

//! Pointer/keyboard-driven 3D tilt of the hero visual, plus the package-card
//! hover tilt and link ripple geometry.
//!
//! Two independent inputs feed the hero tilt:
//!
//! - the pointer offset from the viewport center, normalized and clamped to
//!   [-1, 1] per axis, scaled by the sensitivity;
//! - a key accumulator stepped by the arrow keys, clamped to ±sensitivity and
//!   reset by Escape. Keys only count while the hero is in the initial
//!   viewport.
//!
//! Every frame the target is `clamp(pointer + key, ±sensitivity)` per axis and
//! the current rotation moves `smoothing` of the way toward it.

use serde::Serialize;

use crate::config::EffectsConfig;
use crate::error::EffectsError;
use crate::input::Key;
use crate::ops::{DomOp, Target};
use crate::page::{PageSnapshot, Viewport, hooks};
use crate::schedule::CancellationToken;

/// Frames that move less than this on both axes are not re-emitted.
const EMIT_EPSILON_DEG: f64 = 0.01;

/// Rotation in degrees about the X and Y axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
}

impl Rotation {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn clamped(self, bound: f64) -> Self {
        Self {
            x: self.x.clamp(-bound, bound),
            y: self.y.clamp(-bound, bound),
        }
    }
}

/// Pointer contribution for a pointer at `(x, y)` in viewport coordinates.
///
/// Pointer right of center turns the element right (positive Y); pointer
/// above center tilts its top toward the viewer (positive X).
#[must_use]
pub fn pointer_rotation(x: f64, y: f64, viewport: Viewport, sensitivity: f64) -> Rotation {
    let nx = normalized_offset(x, viewport.width);
    let ny = normalized_offset(y, viewport.height);
    Rotation::new(-ny * sensitivity, nx * sensitivity)
}

fn normalized_offset(pos: f64, extent: f64) -> f64 {
    let half = extent / 2.0;
    if !(half > 0.0) || !pos.is_finite() {
        return 0.0;
    }
    ((pos - half) / half).clamp(-1.0, 1.0)
}

/// One exponential-smoothing step: `current + (target - current) * factor`.
#[inline]
#[must_use]
pub fn smooth_step(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Brightness filter for a Y rotation: 1.0 at rest, 0.9..=1.1 at the bounds.
#[must_use]
pub fn brightness(rotation_y: f64, sensitivity: f64) -> f64 {
    1.0 + 0.1 * (rotation_y / sensitivity).clamp(-1.0, 1.0)
}

/// Internal tilt state. Only the controller mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltState {
    pub pointer: Rotation,
    pub key: Rotation,
    pub current: Rotation,
}

/// Drives the hero tilt.
#[derive(Debug)]
pub struct TiltController {
    state: TiltState,
    sensitivity: f64,
    key_step: f64,
    smoothing: f64,
    viewport: Viewport,
    hero_in_view: bool,
    last_emitted: Option<Rotation>,
    token: CancellationToken,
}

impl TiltController {
    /// Attach to `#hero-tilt`.
    pub fn attach(page: &PageSnapshot, cfg: &EffectsConfig) -> Result<Self, EffectsError> {
        if !page.has(hooks::HERO_TILT) {
            return Err(EffectsError::MissingTarget {
                hook: hooks::HERO_TILT,
            });
        }
        Ok(Self {
            state: TiltState::default(),
            sensitivity: cfg.tilt_sensitivity_deg,
            key_step: cfg.tilt_key_step_deg,
            smoothing: cfg.tilt_smoothing,
            viewport: page.viewport,
            hero_in_view: page.scroll_y < page.viewport.height,
            last_emitted: None,
            token: CancellationToken::new(),
        })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.state.pointer = pointer_rotation(x, y, self.viewport, self.sensitivity);
    }

    /// Apply a key press. Returns whether the key changed the accumulator.
    pub fn key(&mut self, key: Key) -> bool {
        if !self.hero_in_view {
            return false;
        }
        let step = self.key_step;
        let k = &mut self.state.key;
        match key {
            Key::Up => k.x += step,
            Key::Down => k.x -= step,
            Key::Right => k.y += step,
            Key::Left => k.y -= step,
            Key::Escape => *k = Rotation::ZERO,
            Key::Other => return false,
        }
        *k = k.clamped(self.sensitivity);
        true
    }

    /// Track whether the hero is still inside the initial viewport.
    pub fn scroll(&mut self, scroll_y: f64) {
        self.hero_in_view = scroll_y < self.viewport.height;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Combined, clamped target rotation.
    #[must_use]
    pub fn target(&self) -> Rotation {
        let p = self.state.pointer;
        let k = self.state.key;
        Rotation::new(p.x + k.x, p.y + k.y).clamped(self.sensitivity)
    }

    /// Advance one display frame.
    pub fn frame(&mut self, ops: &mut Vec<DomOp>) {
        if self.token.is_cancelled() {
            return;
        }
        let target = self.target();
        let c = &mut self.state.current;
        c.x = smooth_step(c.x, target.x, self.smoothing);
        c.y = smooth_step(c.y, target.y, self.smoothing);
        let current = *c;

        let moved = self.last_emitted.is_none_or(|last| {
            (last.x - current.x).abs() >= EMIT_EPSILON_DEG
                || (last.y - current.y).abs() >= EMIT_EPSILON_DEG
        });
        if !moved {
            return;
        }
        self.last_emitted = Some(current);

        let target = Target::id(hooks::HERO_TILT);
        ops.push(DomOp::SetStyle {
            target,
            property: "transform",
            value: format!(
                "perspective(1000px) rotateX({:.3}deg) rotateY({:.3}deg)",
                current.x, current.y
            ),
        });
        ops.push(DomOp::SetStyle {
            target,
            property: "filter",
            value: format!("brightness({:.3})", brightness(current.y, self.sensitivity)),
        });
    }

    #[must_use]
    pub fn state(&self) -> TiltState {
        self.state
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn stop(&self) {
        self.token.cancel();
    }
}

// ---------------------------------------------------------------------------
// Package cards
// ---------------------------------------------------------------------------

/// Neutral transform restored when the pointer leaves a card.
pub const CARD_REST_TRANSFORM: &str =
    "perspective(1000px) rotateX(0) rotateY(0) translateY(0) scale(1)";

/// Client rect of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Hover transform for a pointer at client `(x, y)` over `rect`.
#[must_use]
pub fn card_hover_transform(rect: Rect, x: f64, y: f64) -> String {
    let local_x = x - rect.left;
    let local_y = y - rect.top;
    let rotate_x = (local_y - rect.height / 2.0) / 30.0;
    let rotate_y = (rect.width / 2.0 - local_x) / 30.0;
    format!(
        "perspective(1000px) rotateX({rotate_x:.3}deg) rotateY({rotate_y:.3}deg) translateY(-10px) scale(1.02)"
    )
}

/// Click ripple placement, relative to the clicked element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

/// Ripple covering `rect`, centered at client `(x, y)`.
#[must_use]
pub fn ripple_geometry(rect: Rect, x: f64, y: f64) -> Ripple {
    let size = rect.width.max(rect.height);
    Ripple {
        size,
        left: x - rect.left - size / 2.0,
        top: y - rect.top - size / 2.0,
    }
}
