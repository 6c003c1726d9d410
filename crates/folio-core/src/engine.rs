#![forbid(unsafe_code)]

//! Host-driven effects engine.
//!
//! [`Engine`] owns every controller, the timer queue, and the deterministic
//! clock. The host controls the loop:
//!
//! 1. [`Engine::start`] with a [`PageSnapshot`] and a preference store, then
//!    register the listeners from [`Engine::listeners`].
//! 2. Push events via [`Engine::push_event`].
//! 3. Advance time via [`Engine::advance_time`] or [`Engine::set_time`].
//! 4. Call [`Engine::step`] once per animation frame.
//! 5. Apply the ops from [`Engine::take_ops`] in order.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio_core::engine::Engine;
//! use folio_core::page::{PageSnapshot, hooks};
//! use folio_core::theme::MemoryStore;
//! use folio_core::EffectsConfig;
//!
//! let page = PageSnapshot::new().with_hook(hooks::TYPED_TEXT, 1);
//! let mut engine = Engine::new(EffectsConfig::default()).unwrap();
//! engine.start(page, Box::new(MemoryStore::new()));
//!
//! engine.advance_time(Duration::from_millis(16));
//! engine.step();
//! let ops = engine.take_ops();
//! assert!(!ops.is_empty());
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

use crate::config::EffectsConfig;
use crate::error::EffectsError;
use crate::input::{InputEvent, Key};
use crate::navigation::NavigationController;
use crate::ops::{DomOp, ListenKind, ListenTarget, ListenerSpec, Target};
use crate::page::{PageSnapshot, hooks};
use crate::particles::ParticleEmitter;
use crate::reveal::RevealController;
use crate::schedule::{CancellationToken, DeterministicClock, TimerQueue};
use crate::theme::{PreferenceStore, Theme, ThemeController};
use crate::tilt::TiltController;
use crate::typing::TypingController;

/// Seed used when the host does not provide one.
const DEFAULT_SEED: u64 = 0x5EED_F011_0C0D_E5E7;

/// Floor for self-rescheduling timers so a zero delay cannot spin a step.
const MIN_RESCHEDULE: Duration = Duration::from_millis(1);

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Running,
    Stopped,
}

/// Result of a single [`Engine::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the engine is still running.
    pub running: bool,
    /// Number of events processed during this step.
    pub events_processed: u32,
    /// Number of one-shot timers that fired.
    pub timers_fired: u32,
    /// Ops appended during this step.
    pub ops_emitted: usize,
    /// Current frame index (monotonically increasing).
    pub frame_idx: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    TypeTick,
    HideLoader,
    ClearToggleAnimate,
    ScrollFlush,
    SkillBar(usize),
}

/// The effects engine.
#[derive(Debug)]
pub struct Engine {
    config: EffectsConfig,
    state: EngineState,
    clock: DeterministicClock,
    last_frame: Duration,
    frame_idx: u64,
    seed: u64,
    page: PageSnapshot,
    events: VecDeque<InputEvent>,
    timers: TimerQueue<Timer>,
    /// Gates the engine's own timers (loader, icon, scroll, skill bars).
    token: CancellationToken,
    ops: Vec<DomOp>,
    listeners: Vec<ListenerSpec>,
    typing: Option<TypingController>,
    particles: Option<ParticleEmitter>,
    tilt: Option<TiltController>,
    theme: Option<ThemeController>,
    navigation: Option<NavigationController>,
    reveal: Option<RevealController>,
    loader_pending: bool,
}

impl Engine {
    /// Create an idle engine. Fails if `config` does not validate.
    pub fn new(config: EffectsConfig) -> Result<Self, EffectsError> {
        config.validate()?;
        Ok(Self {
            config,
            state: EngineState::Idle,
            clock: DeterministicClock::new(),
            last_frame: Duration::ZERO,
            frame_idx: 0,
            seed: DEFAULT_SEED,
            page: PageSnapshot::new(),
            events: VecDeque::new(),
            timers: TimerQueue::new(),
            token: CancellationToken::new(),
            ops: Vec::new(),
            listeners: Vec::new(),
            typing: None,
            particles: None,
            tilt: None,
            theme: None,
            navigation: None,
            reveal: None,
            loader_pending: false,
        })
    }

    /// Seed the particle generator (builder).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Attach every controller whose targets `page` offers.
    ///
    /// Controllers attach independently; a missing target skips that
    /// controller only. Only the first call on an idle engine has any effect.
    pub fn start(&mut self, page: PageSnapshot, store: Box<dyn PreferenceStore>) {
        if self.state != EngineState::Idle {
            crate::warn!(state = ?self.state, "engine already started");
            return;
        }
        let now = self.clock.now();
        self.last_frame = now;
        self.page = page;
        let reduced = self.page.reduced_motion();

        let theme = ThemeController::init(&self.page, &self.config, store, &mut self.ops);
        if theme.has_toggle() {
            self.listen(
                ListenTarget::Id {
                    id: hooks::THEME_TOGGLE,
                },
                ListenKind::Click,
            );
            self.timers.schedule_at(
                now + EffectsConfig::ms(self.config.theme_icon_animate_ms),
                Timer::ClearToggleAnimate,
                &self.token,
            );
        }
        self.theme = Some(theme);

        match TypingController::attach(&self.page, &self.config) {
            Ok(typing) => {
                self.timers.schedule_at(now, Timer::TypeTick, typing.token());
                self.typing = Some(typing);
            }
            Err(err) => skipped("typing", &err),
        }

        if reduced {
            crate::debug!("reduced motion: particles and tilt disabled");
        } else {
            match ParticleEmitter::attach(&self.page, &self.config, now, self.seed) {
                Ok(emitter) => self.particles = Some(emitter),
                Err(err) => skipped("particles", &err),
            }
            match TiltController::attach(&self.page, &self.config) {
                Ok(tilt) => {
                    self.listen(ListenTarget::Window, ListenKind::PointerMove);
                    self.listen(ListenTarget::Document, ListenKind::KeyDown);
                    self.listen(ListenTarget::Window, ListenKind::Scroll);
                    self.listen(ListenTarget::Window, ListenKind::Resize);
                    self.tilt = Some(tilt);
                }
                Err(err) => skipped("tilt", &err),
            }
        }

        if self.page.has(hooks::LOADER) {
            self.loader_pending = true;
            self.listen(ListenTarget::Window, ListenKind::Load);
        }

        match NavigationController::attach(&self.page, &self.config) {
            Ok(nav) => {
                for spec in nav.listeners() {
                    self.listen(spec.target, spec.kind);
                }
                self.listen(ListenTarget::Window, ListenKind::Resize);
                self.navigation = Some(nav);
            }
            Err(err) => skipped("navigation", &err),
        }

        match RevealController::attach(&self.page, &self.config, &mut self.ops) {
            Ok(reveal) => {
                for spec in reveal.listeners() {
                    self.listen(spec.target, spec.kind);
                }
                self.reveal = Some(reveal);
            }
            Err(err) => skipped("reveal", &err),
        }

        self.state = EngineState::Running;
        crate::info!(
            listeners = self.listeners.len(),
            reduced_motion = reduced,
            "engine started"
        );
    }

    fn listen(&mut self, target: ListenTarget, kind: ListenKind) {
        let spec = ListenerSpec::new(target, kind);
        if !self.listeners.contains(&spec) {
            self.listeners.push(spec);
        }
    }

    /// Queue an event for the next [`step`](Self::step).
    ///
    /// Events pushed after [`stop`](Self::stop) are dropped.
    pub fn push_event(&mut self, event: InputEvent) {
        if self.state == EngineState::Stopped {
            return;
        }
        self.events.push_back(event);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time. Rewinds are ignored.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Process pending events, fire due timers, and advance one frame.
    pub fn step(&mut self) -> StepResult {
        if self.state != EngineState::Running {
            return StepResult {
                running: false,
                events_processed: 0,
                timers_fired: 0,
                ops_emitted: 0,
                frame_idx: self.frame_idx,
            };
        }
        let ops_before = self.ops.len();
        let now = self.clock.now();

        // 1. Events.
        let mut events_processed: u32 = 0;
        while let Some(event) = self.events.pop_front() {
            events_processed += 1;
            self.handle_event(event, now);
        }

        // 2. One-shot timers.
        let mut timers_fired: u32 = 0;
        while let Some((due, timer)) = self.timers.pop_due(now) {
            timers_fired += 1;
            self.fire(timer, due, now);
        }

        // 3. Particles.
        if let Some(particles) = &mut self.particles {
            particles.poll(now, &mut self.ops);
        }

        // 4. Per-frame animation.
        let dt = now.saturating_sub(self.last_frame);
        self.last_frame = now;
        if let Some(tilt) = &mut self.tilt {
            tilt.frame(&mut self.ops);
        }
        if let Some(reveal) = &mut self.reveal {
            reveal.frame(dt, &mut self.ops);
        }
        self.frame_idx += 1;

        StepResult {
            running: true,
            events_processed,
            timers_fired,
            ops_emitted: self.ops.len() - ops_before,
            frame_idx: self.frame_idx,
        }
    }

    fn handle_event(&mut self, event: InputEvent, now: Duration) {
        crate::trace!(?event, "event");
        let ops = &mut self.ops;
        match event {
            InputEvent::PointerMove { x, y } => {
                if let Some(tilt) = &mut self.tilt {
                    tilt.pointer_move(x, y);
                }
            }
            InputEvent::Key { key } => {
                if key == Key::Escape
                    && let Some(nav) = &mut self.navigation
                {
                    nav.close_menu(ops);
                }
                if let Some(tilt) = &mut self.tilt {
                    tilt.key(key);
                }
            }
            InputEvent::Scroll { y } => {
                if let Some(tilt) = &mut self.tilt {
                    tilt.scroll(y);
                }
                if let Some(nav) = &mut self.navigation
                    && let Some(delay) = nav.scroll(y)
                {
                    self.timers
                        .schedule_at(now + delay, Timer::ScrollFlush, &self.token);
                }
            }
            InputEvent::Resize { viewport } => {
                self.page.viewport = viewport;
                if let Some(tilt) = &mut self.tilt {
                    tilt.resize(viewport);
                }
            }
            InputEvent::Relayout {
                sections,
                navbar_height,
            } => {
                self.page.navbar_height = navbar_height;
                if let Some(nav) = &mut self.navigation {
                    nav.relayout(sections.clone(), navbar_height);
                }
                self.page.sections = sections;
            }
            InputEvent::ThemeToggle { x, y } => {
                if let Some(theme) = &mut self.theme {
                    theme.toggle(x, y, self.page.caps, self.page.viewport, ops);
                    if theme.has_toggle() {
                        self.timers.schedule_at(
                            now + EffectsConfig::ms(self.config.theme_icon_animate_ms),
                            Timer::ClearToggleAnimate,
                            &self.token,
                        );
                    }
                }
            }
            InputEvent::MenuToggle => {
                if let Some(nav) = &mut self.navigation {
                    nav.toggle_menu(ops);
                }
            }
            InputEvent::NavLinkClicked | InputEvent::OutsideClick => {
                if let Some(nav) = &mut self.navigation {
                    nav.close_menu(ops);
                }
            }
            InputEvent::AnchorClicked { target_top } => {
                if let Some(nav) = &self.navigation {
                    nav.anchor(target_top, ops);
                }
            }
            InputEvent::Intersected { hook, index } => {
                if let Some(reveal) = &mut self.reveal {
                    for (bar, offset) in reveal.intersect(hook, index, ops) {
                        self.timers
                            .schedule_at(now + offset, Timer::SkillBar(bar), &self.token);
                    }
                }
            }
            InputEvent::Loaded => {
                if self.loader_pending {
                    self.loader_pending = false;
                    self.timers.schedule_at(
                        now + EffectsConfig::ms(self.config.loader_hide_ms),
                        Timer::HideLoader,
                        &self.token,
                    );
                }
            }
        }
    }

    fn fire(&mut self, timer: Timer, due: Duration, now: Duration) {
        crate::trace!(?timer, ?due, "timer fired");
        match timer {
            Timer::TypeTick => {
                if let Some(typing) = &mut self.typing {
                    let delay = typing.step(&mut self.ops).max(MIN_RESCHEDULE);
                    let mut next = due + delay;
                    if next <= now {
                        // Host was suspended; resume from now.
                        next = now + delay;
                    }
                    self.timers.schedule_at(next, Timer::TypeTick, typing.token());
                }
            }
            Timer::HideLoader => self.ops.push(DomOp::AddClass {
                target: Target::id(hooks::LOADER),
                class: "hidden",
            }),
            Timer::ClearToggleAnimate => self.ops.push(DomOp::RemoveClass {
                target: Target::id(hooks::THEME_TOGGLE),
                class: "animate",
            }),
            Timer::ScrollFlush => {
                if let Some(nav) = &mut self.navigation {
                    nav.flush(&mut self.ops);
                }
            }
            Timer::SkillBar(index) => {
                if let Some(reveal) = &self.reveal {
                    reveal.fill_bar(index, &mut self.ops);
                }
            }
        }
    }

    /// Tear down: cancel every timer, remove live particles, and clear the
    /// listener list. The engine cannot be restarted.
    pub fn stop(&mut self) {
        if self.state == EngineState::Stopped {
            return;
        }
        self.token.cancel();
        if let Some(typing) = &self.typing {
            typing.stop();
        }
        if let Some(tilt) = &self.tilt {
            tilt.stop();
        }
        if let Some(particles) = &mut self.particles {
            particles.stop(&mut self.ops);
        }
        self.timers.purge_cancelled();
        self.events.clear();
        self.listeners.clear();
        self.state = EngineState::Stopped;
        crate::info!(frames = self.frame_idx, "engine stopped");
    }

    /// Take the ops emitted since the last call.
    pub fn take_ops(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }

    /// Read pending ops without consuming them.
    #[must_use]
    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    /// Listeners the host must register.
    #[must_use]
    pub fn listeners(&self) -> &[ListenerSpec] {
        &self.listeners
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Current clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Active theme, once started.
    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        self.theme.as_ref().map(ThemeController::theme)
    }

    #[must_use]
    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    #[must_use]
    pub fn page(&self) -> &PageSnapshot {
        &self.page
    }

    /// Earliest pending one-shot timer.
    #[must_use]
    pub fn next_timer(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    #[must_use]
    pub fn typing(&self) -> Option<&TypingController> {
        self.typing.as_ref()
    }

    #[must_use]
    pub fn particles(&self) -> Option<&ParticleEmitter> {
        self.particles.as_ref()
    }

    #[must_use]
    pub fn tilt(&self) -> Option<&TiltController> {
        self.tilt.as_ref()
    }

    #[must_use]
    pub fn theme_controller(&self) -> Option<&ThemeController> {
        self.theme.as_ref()
    }

    #[must_use]
    pub fn navigation(&self) -> Option<&NavigationController> {
        self.navigation.as_ref()
    }

    #[must_use]
    pub fn reveal(&self) -> Option<&RevealController> {
        self.reveal.as_ref()
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn skipped(controller: &'static str, err: &EffectsError) {
    crate::debug!(controller, %err, "controller skipped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageCaps, Viewport};
    use crate::theme::MemoryStore;
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn full_page() -> PageSnapshot {
        PageSnapshot::new()
            .with_viewport(Viewport::new(1280.0, 800.0))
            .with_hook(hooks::TYPED_TEXT, 1)
            .with_hook(hooks::PARTICLES, 1)
            .with_hook(hooks::HERO_TILT, 1)
            .with_hook(hooks::THEME_TOGGLE, 1)
            .with_hook(hooks::LOADER, 1)
    }

    fn started(page: PageSnapshot) -> Engine {
        let mut engine = Engine::new(EffectsConfig::default()).unwrap().with_seed(7);
        engine.start(page, Box::new(MemoryStore::new()));
        engine
    }

    fn run_for(engine: &mut Engine, total: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            engine.advance_time(FRAME);
            engine.step();
            elapsed += FRAME;
        }
    }

    #[test]
    fn new_engine_is_idle() {
        let engine = Engine::new(EffectsConfig::default()).unwrap();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.listeners().is_empty());
        assert_eq!(engine.theme(), None);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = EffectsConfig {
            phrases: Vec::new(),
            ..EffectsConfig::default()
        };
        assert!(matches!(Engine::new(cfg), Err(EffectsError::EmptyPhrases)));
    }

    #[test]
    fn step_before_start_does_nothing() {
        let mut engine = Engine::new(EffectsConfig::default()).unwrap();
        let result = engine.step();
        assert!(!result.running);
        assert!(engine.take_ops().is_empty());
    }

    #[test]
    fn empty_page_registers_no_listeners() {
        let mut engine = started(PageSnapshot::new());
        assert_eq!(engine.state(), EngineState::Running);
        assert!(engine.listeners().is_empty());
        assert!(engine.typing().is_none());
        assert!(engine.particles().is_none());
        assert!(engine.tilt().is_none());
        // The theme still applies.
        assert_eq!(
            engine.take_ops(),
            vec![DomOp::ApplyTheme { theme: Theme::Dark }]
        );
        run_for(&mut engine, Duration::from_secs(3));
        assert!(engine.take_ops().is_empty());
    }

    #[test]
    fn full_page_declares_listeners() {
        let engine = started(full_page());
        let l = engine.listeners();
        for spec in [
            ListenerSpec::new(ListenTarget::Window, ListenKind::PointerMove),
            ListenerSpec::new(ListenTarget::Document, ListenKind::KeyDown),
            ListenerSpec::new(
                ListenTarget::Id {
                    id: hooks::THEME_TOGGLE,
                },
                ListenKind::Click,
            ),
            ListenerSpec::new(ListenTarget::Window, ListenKind::Load),
        ] {
            assert!(l.contains(&spec), "missing {spec:?}");
        }
        let scroll = l
            .iter()
            .filter(|s| s.kind == ListenKind::Scroll)
            .count();
        assert_eq!(scroll, 1);
    }

    #[test]
    fn typing_writes_first_grapheme_on_first_step() {
        let mut engine = started(full_page());
        engine.take_ops();
        engine.step();
        let ops = engine.take_ops();
        assert!(ops.contains(&DomOp::SetText {
            target: Target::id(hooks::TYPED_TEXT),
            text: "F".into()
        }));
    }

    #[test]
    fn typing_follows_tick_interval() {
        let mut engine = started(PageSnapshot::new().with_hook(hooks::TYPED_TEXT, 1));
        engine.step();
        let typed = |engine: &mut Engine| {
            engine
                .take_ops()
                .iter()
                .filter(|op| matches!(op, DomOp::SetText { .. }))
                .count()
        };
        assert_eq!(typed(&mut engine), 1);
        engine.advance_time(Duration::from_millis(79));
        engine.step();
        assert_eq!(typed(&mut engine), 0);
        engine.advance_time(Duration::from_millis(1));
        engine.step();
        assert_eq!(typed(&mut engine), 1);
    }

    #[test]
    fn typing_resumes_after_suspension_without_catch_up() {
        let mut engine = started(PageSnapshot::new().with_hook(hooks::TYPED_TEXT, 1));
        engine.step();
        engine.take_ops();

        engine.advance_time(Duration::from_secs(3600));
        let result = engine.step();
        let texts = engine
            .take_ops()
            .iter()
            .filter(|op| matches!(op, DomOp::SetText { .. }))
            .count();
        assert_eq!(texts, 1);
        assert_eq!(result.timers_fired, 1);

        // Ticking resumes at the normal pace from the wake-up time.
        engine.advance_time(Duration::from_millis(80));
        engine.step();
        let texts = engine
            .take_ops()
            .iter()
            .filter(|op| matches!(op, DomOp::SetText { .. }))
            .count();
        assert_eq!(texts, 1);
    }

    #[test]
    fn reduced_motion_spawns_no_particles() {
        let mut engine = started(full_page().with_caps(PageCaps::REDUCED_MOTION));
        assert!(engine.particles().is_none());
        assert!(engine.tilt().is_none());
        run_for(&mut engine, Duration::from_secs(10));
        let spawned = engine
            .take_ops()
            .iter()
            .filter(|op| matches!(op, DomOp::SpawnParticle { .. }))
            .count();
        assert_eq!(spawned, 0);
    }

    #[test]
    fn loader_hides_after_load() {
        let mut engine = started(full_page());
        engine.push_event(InputEvent::Loaded);
        engine.step();
        engine.take_ops();
        let hidden = DomOp::AddClass {
            target: Target::id(hooks::LOADER),
            class: "hidden",
        };
        engine.advance_time(Duration::from_millis(1499));
        engine.step();
        assert!(!engine.take_ops().contains(&hidden));
        engine.advance_time(Duration::from_millis(1));
        engine.step();
        assert!(engine.take_ops().contains(&hidden));
    }

    #[test]
    fn theme_toggle_clears_animate_later() {
        let mut engine = started(full_page());
        run_for(&mut engine, Duration::from_millis(600));
        engine.take_ops();

        engine.push_event(InputEvent::ThemeToggle { x: 10.0, y: 10.0 });
        engine.step();
        assert_eq!(engine.theme(), Some(Theme::Light));
        assert!(engine.take_ops().contains(&DomOp::ApplyTheme {
            theme: Theme::Light
        }));

        let cleared = DomOp::RemoveClass {
            target: Target::id(hooks::THEME_TOGGLE),
            class: "animate",
        };
        run_for(&mut engine, Duration::from_millis(500));
        assert!(engine.take_ops().contains(&cleared));
    }

    #[test]
    fn stop_cancels_everything() {
        let mut engine = started(full_page());
        run_for(&mut engine, Duration::from_secs(3));
        let live = engine.particles().map_or(0, ParticleEmitter::live_count);
        assert!(live > 0);
        engine.take_ops();

        engine.stop();
        assert_eq!(engine.state(), EngineState::Stopped);
        assert!(engine.listeners().is_empty());
        let removed = engine
            .take_ops()
            .iter()
            .filter(|op| matches!(op, DomOp::RemoveParticle { .. }))
            .count();
        assert_eq!(removed, live);

        engine.push_event(InputEvent::Loaded);
        engine.advance_time(Duration::from_secs(5));
        let result = engine.step();
        assert!(!result.running);
        assert!(engine.take_ops().is_empty());
    }

    #[test]
    fn second_start_is_ignored() {
        let mut engine = started(full_page());
        let listeners = engine.listeners().len();
        engine.take_ops();
        engine.start(PageSnapshot::new(), Box::new(MemoryStore::new()));
        assert_eq!(engine.listeners().len(), listeners);
        assert!(engine.take_ops().is_empty());
    }

    #[test]
    fn step_counts_events_and_frames() {
        let mut engine = started(full_page());
        engine.push_event(InputEvent::PointerMove { x: 0.0, y: 0.0 });
        engine.push_event(InputEvent::Key { key: Key::Up });
        let r = engine.step();
        assert_eq!(r.events_processed, 2);
        assert_eq!(r.frame_idx, 1);
        assert!(r.running);
    }

    #[test]
    fn identical_inputs_produce_identical_ops() {
        fn run() -> Vec<DomOp> {
            let mut engine = started(full_page());
            engine.push_event(InputEvent::PointerMove { x: 100.0, y: 700.0 });
            run_for(&mut engine, Duration::from_secs(4));
            engine.take_ops()
        }
        assert_eq!(run(), run());
    }
}
