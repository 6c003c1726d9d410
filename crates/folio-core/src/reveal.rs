#![forbid(unsafe_code)]

//! Scroll reveal: cards fading in, skill bars filling, stat counters
//! counting up.
//!
//! Everything here fires once per element. Under reduced motion the final
//! state is applied at attach time and nothing is observed.

use std::collections::HashSet;
use std::time::Duration;

use crate::animation::stagger::{css_seconds, stagger_offsets};
use crate::animation::{Animation, Fade, ease_out_quart};
use crate::config::EffectsConfig;
use crate::error::EffectsError;
use crate::ops::{DomOp, ListenKind, ListenTarget, ListenerSpec, Target};
use crate::page::{PageSnapshot, hooks};

/// Class added when an element enters the viewport.
pub const REVEALED_CLASS: &str = "animate-in";

/// Card classes revealed on intersection.
const CARD_HOOKS: [&str; 3] = [hooks::SKILL_CATEGORY, hooks::PROJECT_CARD, hooks::PACKAGE_CARD];

#[derive(Debug, Clone, Copy)]
enum CounterPhase {
    Waiting,
    Running(Fade),
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    target: u32,
    shown: Option<u32>,
    phase: CounterPhase,
}

/// Value shown at eased progress `t` for a counter heading to `target`.
#[must_use]
pub fn counter_value(target: u32, t: f32) -> u32 {
    let v = (f64::from(t.clamp(0.0, 1.0)) * f64::from(target)).round();
    (v as u32).min(target)
}

/// Reveal controller.
#[derive(Debug)]
pub struct RevealController {
    card_counts: [usize; 3],
    revealed: HashSet<(&'static str, usize)>,
    skill_progress: Vec<u32>,
    bars_started: bool,
    bar_stagger: Duration,
    counters: Vec<Counter>,
    counter_duration: Duration,
    immediate: bool,
}

impl RevealController {
    /// Attach to whichever reveal targets the page has.
    ///
    /// Pushes the stagger `transition-delay`s, or under reduced motion the
    /// final state of every target.
    pub fn attach(
        page: &PageSnapshot,
        cfg: &EffectsConfig,
        ops: &mut Vec<DomOp>,
    ) -> Result<Self, EffectsError> {
        let card_counts = CARD_HOOKS.map(|h| page.count(h));
        let bars = page.count(hooks::SKILL_PROGRESS).min(page.skill_progress.len());
        let counters = page.count(hooks::STAT_NUMBER).min(page.counter_targets.len());
        let has_bars = bars > 0 && page.has(hooks::SKILLS);

        if card_counts.iter().all(|c| *c == 0) && !has_bars && counters == 0 {
            return Err(EffectsError::MissingTarget {
                hook: hooks::STAT_NUMBER,
            });
        }

        let mut ctl = Self {
            card_counts,
            revealed: HashSet::new(),
            skill_progress: if has_bars {
                page.skill_progress[..bars].to_vec()
            } else {
                Vec::new()
            },
            bars_started: false,
            bar_stagger: EffectsConfig::ms(cfg.skill_bar_stagger_ms),
            counters: page.counter_targets[..counters]
                .iter()
                .map(|&target| Counter {
                    target,
                    shown: None,
                    phase: CounterPhase::Waiting,
                })
                .collect(),
            counter_duration: EffectsConfig::ms(cfg.counter_duration_ms),
            immediate: page.reduced_motion(),
        };

        if ctl.immediate {
            ctl.reveal_all(ops);
        } else {
            ctl.push_delays(hooks::SKILL_CATEGORY, cfg.skill_category_stagger_ms, ops);
            ctl.push_delays(hooks::PROJECT_CARD, cfg.project_card_stagger_ms, ops);
        }
        Ok(ctl)
    }

    fn count_of(&self, hook: &str) -> usize {
        CARD_HOOKS
            .iter()
            .position(|h| *h == hook)
            .map_or(0, |i| self.card_counts[i])
    }

    fn push_delays(&self, hook: &'static str, stagger_ms: u64, ops: &mut Vec<DomOp>) {
        let offsets = stagger_offsets(self.count_of(hook), EffectsConfig::ms(stagger_ms));
        for (index, offset) in offsets.into_iter().enumerate() {
            ops.push(DomOp::SetStyle {
                target: Target::class(hook, index),
                property: "transition-delay",
                value: css_seconds(offset),
            });
        }
    }

    fn reveal_all(&mut self, ops: &mut Vec<DomOp>) {
        for hook in CARD_HOOKS {
            for index in 0..self.count_of(hook) {
                self.reveal_card(hook, index, ops);
            }
        }
        for index in 0..self.skill_progress.len() {
            self.fill_bar(index, ops);
        }
        self.bars_started = true;
        for index in 0..self.counters.len() {
            self.finish_counter(index, ops);
        }
    }

    /// Listeners this controller needs. None under reduced motion.
    #[must_use]
    pub fn listeners(&self) -> Vec<ListenerSpec> {
        if self.immediate {
            return Vec::new();
        }
        let mut out: Vec<ListenerSpec> = CARD_HOOKS
            .iter()
            .filter(|h| self.count_of(h) > 0)
            .map(|&class| ListenerSpec::new(ListenTarget::Class { class }, ListenKind::Intersection))
            .collect();
        if !self.skill_progress.is_empty() {
            out.push(ListenerSpec::new(
                ListenTarget::Id { id: hooks::SKILLS },
                ListenKind::Intersection,
            ));
        }
        if !self.counters.is_empty() {
            out.push(ListenerSpec::new(
                ListenTarget::Class {
                    class: hooks::STAT_NUMBER,
                },
                ListenKind::Intersection,
            ));
        }
        out
    }

    /// Handle an intersection report. Returns the fill offsets of skill bars
    /// the caller must schedule (empty unless `#skills` just intersected).
    pub fn intersect(
        &mut self,
        hook: &'static str,
        index: usize,
        ops: &mut Vec<DomOp>,
    ) -> Vec<(usize, Duration)> {
        match hook {
            hooks::SKILLS => {
                if self.bars_started || self.skill_progress.is_empty() {
                    return Vec::new();
                }
                self.bars_started = true;
                stagger_offsets(self.skill_progress.len(), self.bar_stagger)
                    .into_iter()
                    .enumerate()
                    .collect()
            }
            hooks::STAT_NUMBER => {
                self.start_counter(index, ops);
                Vec::new()
            }
            _ => {
                if index < self.count_of(hook) {
                    self.reveal_card(hook, index, ops);
                }
                Vec::new()
            }
        }
    }

    fn reveal_card(&mut self, hook: &'static str, index: usize, ops: &mut Vec<DomOp>) {
        if self.revealed.insert((hook, index)) {
            ops.push(DomOp::AddClass {
                target: Target::class(hook, index),
                class: REVEALED_CLASS,
            });
        }
    }

    /// Set the width of skill bar `index` to its progress.
    pub fn fill_bar(&self, index: usize, ops: &mut Vec<DomOp>) {
        if let Some(p) = self.skill_progress.get(index) {
            ops.push(DomOp::SetStyle {
                target: Target::class(hooks::SKILL_PROGRESS, index),
                property: "width",
                value: format!("{p}%"),
            });
        }
    }

    fn start_counter(&mut self, index: usize, ops: &mut Vec<DomOp>) {
        let Some(counter) = self.counters.get_mut(index) else {
            return;
        };
        if !matches!(counter.phase, CounterPhase::Waiting) {
            return;
        }
        if counter.target == 0 {
            self.finish_counter(index, ops);
            return;
        }
        counter.phase =
            CounterPhase::Running(Fade::new(self.counter_duration).easing(ease_out_quart));
    }

    fn finish_counter(&mut self, index: usize, ops: &mut Vec<DomOp>) {
        let Some(counter) = self.counters.get_mut(index) else {
            return;
        };
        counter.phase = CounterPhase::Done;
        if counter.shown != Some(counter.target) {
            counter.shown = Some(counter.target);
            ops.push(set_counter(index, counter.target));
        }
    }

    /// Advance running counters by `dt`.
    pub fn frame(&mut self, dt: Duration, ops: &mut Vec<DomOp>) {
        for (index, counter) in self.counters.iter_mut().enumerate() {
            let CounterPhase::Running(fade) = &mut counter.phase else {
                continue;
            };
            fade.tick(dt);
            let done = fade.is_complete();
            let value = if done {
                counter.target
            } else {
                counter_value(counter.target, fade.value())
            };
            if done {
                counter.phase = CounterPhase::Done;
            }
            if counter.shown != Some(value) {
                counter.shown = Some(value);
                ops.push(set_counter(index, value));
            }
        }
    }

    /// Whether any counter is mid-animation.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.counters
            .iter()
            .any(|c| matches!(c.phase, CounterPhase::Running(_)))
    }

    /// Value currently shown by counter `index`.
    #[must_use]
    pub fn counter_shown(&self, index: usize) -> Option<u32> {
        self.counters.get(index).and_then(|c| c.shown)
    }

    #[must_use]
    pub fn is_revealed(&self, hook: &'static str, index: usize) -> bool {
        self.revealed.contains(&(hook, index))
    }
}

fn set_counter(index: usize, value: u32) -> DomOp {
    DomOp::SetText {
        target: Target::class(hooks::STAT_NUMBER, index),
        text: value.to_string(),
    }
}
