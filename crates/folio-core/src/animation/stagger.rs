#![forbid(unsafe_code)]

//! Stagger utilities: delay offsets for cascading list animations.
//!
//! Used for the particle opening batch, the skill-bar fill, and the reveal
//! `transition-delay` of skill categories and project cards.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. First offset is always `Duration::ZERO`.
//! 3. offset[i] = i * delay, exactly.

use std::time::Duration;

/// Evenly spaced delay offsets for `count` items: offset[i] = i * delay.
///
/// Integer arithmetic, so offsets never drift.
#[must_use]
pub fn stagger_offsets(count: usize, delay: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| delay.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

/// Format an offset as a CSS time value in seconds (`0.15s`).
#[must_use]
pub fn css_seconds(offset: Duration) -> String {
    let secs = offset.as_secs_f64();
    // Trim float noise such as 0.30000000000000004.
    let rounded = (secs * 1000.0).round() / 1000.0;
    format!("{rounded}s")
}
