#![forbid(unsafe_code)]

//! Decorative hero particles.
//!
//! On attach the emitter schedules an opening batch (wide or narrow, by
//! viewport width) spaced by a fixed stagger, then spawns one particle per
//! interval. Each particle is removed after its own `duration + delay`.
//!
//! Reduced motion is a hard precondition: an emitter attached to a page that
//! requests it is suppressed and never creates a particle.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use serde::Serialize;

use crate::animation::stagger::stagger_offsets;
use crate::config::EffectsConfig;
use crate::error::EffectsError;
use crate::ops::DomOp;
use crate::page::{PageSnapshot, hooks};
use crate::schedule::{CancellationToken, RepeatingTask};

/// Randomized appearance of one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleStyle {
    pub size_px: f64,
    pub x_percent: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub opacity: f64,
}

impl ParticleStyle {
    /// Time from spawn until the particle is removed.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs_f64(self.duration_s + self.delay_s)
    }

    /// Inline style declarations, in application order.
    #[must_use]
    pub fn css_declarations(&self) -> [(&'static str, String); 6] {
        [
            ("width", format!("{:.2}px", self.size_px)),
            ("height", format!("{:.2}px", self.size_px)),
            ("left", format!("{:.2}%", self.x_percent)),
            ("animation-duration", format!("{:.2}s", self.duration_s)),
            ("animation-delay", format!("{:.2}s", self.delay_s)),
            ("opacity", format!("{:.2}", self.opacity)),
        ]
    }
}

/// Small deterministic xorshift64 generator.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        // xorshift has a fixed point at 0.
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

/// Random particle appearance within the shipped ranges.
pub fn random_style(rng: &mut XorShift64) -> ParticleStyle {
    ParticleStyle {
        size_px: rng.range(5.0, 15.0),
        x_percent: rng.range(0.0, 100.0),
        duration_s: rng.range(10.0, 20.0),
        delay_s: rng.range(0.0, 5.0),
        opacity: rng.range(0.1, 0.6),
    }
}

/// Spawns and retires particles inside `#particles`.
#[derive(Debug)]
pub struct ParticleEmitter {
    rng: XorShift64,
    token: CancellationToken,
    spawner: RepeatingTask,
    /// Due times of the opening batch not yet spawned.
    opening: VecDeque<Duration>,
    /// Live particle id to removal time.
    live: BTreeMap<u64, Duration>,
    next_id: u64,
    suppressed: bool,
}

impl ParticleEmitter {
    /// Attach to `#particles` at time `now`.
    pub fn attach(
        page: &PageSnapshot,
        cfg: &EffectsConfig,
        now: Duration,
        seed: u64,
    ) -> Result<Self, EffectsError> {
        if !page.has(hooks::PARTICLES) {
            return Err(EffectsError::MissingTarget {
                hook: hooks::PARTICLES,
            });
        }

        let token = CancellationToken::new();
        let suppressed = page.reduced_motion();
        if suppressed {
            token.cancel();
        }

        let count = if page.viewport.width >= cfg.wide_viewport_px {
            cfg.initial_particles_wide
        } else {
            cfg.initial_particles_narrow
        };
        let opening = if suppressed {
            VecDeque::new()
        } else {
            stagger_offsets(count, EffectsConfig::ms(cfg.particle_stagger_ms))
            .into_iter()
            .map(|offset| now.saturating_add(offset))
            .collect()
        };

        Ok(Self {
            rng: XorShift64::new(seed),
            spawner: RepeatingTask::new(
                now,
                EffectsConfig::ms(cfg.particle_interval_ms),
                token.clone(),
            ),
            token,
            opening,
            live: BTreeMap::new(),
            next_id: 0,
            suppressed,
        })
    }

    /// Retire expired particles and spawn due ones.
    pub fn poll(&mut self, now: Duration, ops: &mut Vec<DomOp>) {
        let expired: Vec<u64> = self
            .live
            .iter()
            .filter(|(_, retire_at)| **retire_at <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            self.live.remove(&id);
            ops.push(DomOp::RemoveParticle { id });
        }

        if self.token.is_cancelled() {
            return;
        }

        while let Some(&due) = self.opening.front() {
            if due > now {
                break;
            }
            self.opening.pop_front();
            self.spawn(due, ops);
        }

        if self.spawner.poll(now) {
            self.spawn(now, ops);
        }
    }

    fn spawn(&mut self, at: Duration, ops: &mut Vec<DomOp>) {
        let style = random_style(&mut self.rng);
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, at.saturating_add(style.lifetime()));
        crate::trace!(id, live = self.live.len(), "particle spawned");
        ops.push(DomOp::SpawnParticle { id, style });
    }

    /// Stop spawning and remove every live particle.
    pub fn stop(&mut self, ops: &mut Vec<DomOp>) {
        self.token.cancel();
        self.opening.clear();
        for id in std::mem::take(&mut self.live).into_keys() {
            ops.push(DomOp::RemoveParticle { id });
        }
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Particles created since attach.
    #[must_use]
    pub fn spawned_total(&self) -> u64 {
        self.next_id
    }

    /// Pending opening-batch spawns.
    #[must_use]
    pub fn opening_remaining(&self) -> usize {
        self.opening.len()
    }
}
