#![forbid(unsafe_code)]

//! Light/dark theme with a persisted preference and a circular reveal.
//!
//! On toggle the new theme is the opposite of the current one. When the page
//! supports view transitions (and motion is allowed) the swap is emitted as
//! a [`DomOp::RevealTheme`]: the host starts a transition that flips the root
//! attribute, then animates a circle clip from the click point out to the
//! covering radius. Otherwise the swap is a plain [`DomOp::ApplyTheme`].
//! Either way the new value is written to the [`PreferenceStore`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::CubicBezier;
use crate::config::EffectsConfig;
use crate::error::{StorageError, StorageResult};
use crate::ops::{DomOp, Target};
use crate::page::{PageCaps, PageSnapshot, Viewport, hooks};

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme";

/// Selector of the toggle icon.
pub const THEME_ICON_SELECTOR: &str = "#theme-toggle i";

/// Site color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything but `light`/`dark` is rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Font Awesome class for the toggle icon.
    #[must_use]
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fas fa-sun",
            Self::Dark => "fas fa-moon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Preference storage
// ---------------------------------------------------------------------------

/// Pluggable key-value store for the persisted preference.
///
/// The browser host backs this with `localStorage`; tests use [`MemoryStore`].
pub trait PreferenceStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read `key`. A missing key is `Ok(None)`.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `key`.
    fn store(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-memory store for tests and hosts without persistent storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate one entry (builder).
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_owned(), value.to_owned());
        self
    }

    /// A store that rejects every write, like a browser in strict privacy mode.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            data: HashMap::new(),
            read_only: true,
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::Rejected(format!("{key} is read-only")));
        }
        self.data.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Circular reveal
// ---------------------------------------------------------------------------

/// Distance from `(x, y)` to the farthest viewport corner.
#[must_use]
pub fn covering_radius(x: f64, y: f64, viewport: Viewport) -> f64 {
    let dx = x.max(viewport.width - x);
    let dy = y.max(viewport.height - y);
    dx.hypot(dy)
}

/// Parameters of the expanding-circle clip animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleReveal {
    pub center_x: f64,
    pub center_y: f64,
    pub end_radius: f64,
    pub duration_ms: u64,
    /// CSS timing function.
    pub easing: String,
    #[serde(skip)]
    curve: CubicBezier,
}

impl CircleReveal {
    #[must_use]
    pub fn new(x: f64, y: f64, viewport: Viewport, duration: Duration) -> Self {
        let curve = CubicBezier::THEME_REVEAL;
        Self {
            center_x: x,
            center_y: y,
            end_radius: covering_radius(x, y, viewport),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            easing: curve.to_css(),
            curve,
        }
    }

    /// `clip-path` start and end keyframes.
    #[must_use]
    pub fn keyframes(&self) -> [String; 2] {
        [
            format!("circle(0px at {}px {}px)", self.center_x, self.center_y),
            format!(
                "circle({}px at {}px {}px)",
                self.end_radius, self.center_x, self.center_y
            ),
        ]
    }

    /// Radius at linear progress `t` in [0, 1], after easing.
    #[must_use]
    pub fn radius_at(&self, t: f64) -> f64 {
        self.end_radius * self.curve.ease(t)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the current theme and its persistence.
pub struct ThemeController {
    theme: Theme,
    store: Box<dyn PreferenceStore>,
    has_toggle: bool,
    transition: Duration,
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("theme", &self.theme)
            .field("store", &self.store.name())
            .field("has_toggle", &self.has_toggle)
            .finish()
    }
}

impl ThemeController {
    /// Resolve the initial theme and apply it.
    ///
    /// Stored preference first, then the platform color-scheme signal, then
    /// dark. The theme applies even when the page has no toggle button.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn init(
        page: &PageSnapshot,
        cfg: &EffectsConfig,
        store: Box<dyn PreferenceStore>,
        ops: &mut Vec<DomOp>,
    ) -> Self {
        let stored = match store.load(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(err) => {
                crate::warn!(store = store.name(), %err, "theme preference unreadable");
                None
            }
        };
        let theme = stored.unwrap_or(if page.caps.contains(PageCaps::PREFERS_LIGHT) {
            Theme::Light
        } else {
            Theme::Dark
        });

        let ctl = Self {
            theme,
            store,
            has_toggle: page.has(hooks::THEME_TOGGLE),
            transition: EffectsConfig::ms(cfg.theme_transition_ms),
        };
        ops.push(DomOp::ApplyTheme { theme });
        ctl.update_icon(ops);
        crate::debug!(%theme, toggle = ctl.has_toggle, "theme initialized");
        ctl
    }

    /// Switch theme from a click at `(x, y)`. Returns the new theme.
    pub fn toggle(
        &mut self,
        x: f64,
        y: f64,
        caps: PageCaps,
        viewport: Viewport,
        ops: &mut Vec<DomOp>,
    ) -> Theme {
        let next = self.theme.toggled();
        let animated = caps.contains(PageCaps::VIEW_TRANSITIONS)
            && !caps.contains(PageCaps::REDUCED_MOTION);

        if animated {
            ops.push(DomOp::RevealTheme {
                theme: next,
                reveal: CircleReveal::new(x, y, viewport, self.transition),
            });
        } else {
            ops.push(DomOp::ApplyTheme { theme: next });
        }
        self.apply(next, ops);
        next
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn apply(&mut self, theme: Theme, ops: &mut Vec<DomOp>) {
        self.theme = theme;
        if let Err(err) = self.store.store(THEME_KEY, theme.as_str()) {
            crate::warn!(store = self.store.name(), %err, "theme preference not saved");
        }
        self.update_icon(ops);
    }

    /// Swap the icon and start the button animation. Returns whether the
    /// `animate` class was added (the caller clears it later).
    pub fn update_icon(&self, ops: &mut Vec<DomOp>) -> bool {
        if !self.has_toggle {
            return false;
        }
        ops.push(DomOp::AddClass {
            target: Target::id(hooks::THEME_TOGGLE),
            class: "animate",
        });
        ops.push(DomOp::SetClassName {
            target: Target::Selector {
                selector: THEME_ICON_SELECTOR,
            },
            value: self.theme.icon_class(),
        });
        true
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn has_toggle(&self) -> bool {
        self.has_toggle
    }

    /// The backing store, for inspection.
    #[must_use]
    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageSnapshot {
        PageSnapshot::new()
            .with_hook(hooks::THEME_TOGGLE, 1)
            .with_viewport(Viewport::new(1000.0, 600.0))
    }

    fn init(page: &PageSnapshot, store: MemoryStore) -> (ThemeController, Vec<DomOp>) {
        let mut ops = Vec::new();
        let ctl = ThemeController::init(page, &EffectsConfig::default(), Box::new(store), &mut ops);
        (ctl, ops)
    }

    #[test]
    fn stored_value_wins() {
        let p = page().with_caps(PageCaps::PREFERS_LIGHT);
        let (ctl, ops) = init(&p, MemoryStore::new().with_entry(THEME_KEY, "dark"));
        assert_eq!(ctl.theme(), Theme::Dark);
        assert_eq!(ops[0], DomOp::ApplyTheme { theme: Theme::Dark });
    }

    #[test]
    fn platform_preference_is_fallback() {
        let p = page().with_caps(PageCaps::PREFERS_LIGHT);
        let (ctl, _) = init(&p, MemoryStore::new());
        assert_eq!(ctl.theme(), Theme::Light);
    }

    #[test]
    fn garbage_stored_value_is_ignored() {
        let (ctl, _) = init(&page(), MemoryStore::new().with_entry(THEME_KEY, "sepia"));
        assert_eq!(ctl.theme(), Theme::Dark);
    }

    struct DisabledStore;

    impl PreferenceStore for DisabledStore {
        fn name(&self) -> &str {
            "disabled"
        }

        fn load(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }

        fn store(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }
    }

    #[test]
    fn unreadable_store_falls_back_to_platform() {
        let p = page().with_caps(PageCaps::PREFERS_LIGHT);
        let mut ops = Vec::new();
        let mut ctl =
            ThemeController::init(&p, &EffectsConfig::default(), Box::new(DisabledStore), &mut ops);
        assert_eq!(ctl.theme(), Theme::Light);

        let mut ops = Vec::new();
        ctl.toggle(0.0, 0.0, PageCaps::empty(), Viewport::new(10.0, 10.0), &mut ops);
        assert_eq!(ctl.theme(), Theme::Dark);
        assert!(ops.contains(&DomOp::ApplyTheme { theme: Theme::Dark }));
    }

    #[test]
    fn toggle_without_transitions_is_instant() {
        let (mut ctl, _) = init(&page(), MemoryStore::new());
        let mut ops = Vec::new();
        let t = ctl.toggle(10.0, 10.0, PageCaps::empty(), Viewport::new(1000.0, 600.0), &mut ops);
        assert_eq!(t, Theme::Light);
        assert_eq!(ops[0], DomOp::ApplyTheme { theme: Theme::Light });
    }

    #[test]
    fn toggle_with_transitions_reveals() {
        let (mut ctl, _) = init(&page(), MemoryStore::new());
        let mut ops = Vec::new();
        ctl.toggle(
            0.0,
            0.0,
            PageCaps::VIEW_TRANSITIONS,
            Viewport::new(300.0, 400.0),
            &mut ops,
        );
        match &ops[0] {
            DomOp::RevealTheme { theme, reveal } => {
                assert_eq!(*theme, Theme::Light);
                assert_eq!(reveal.end_radius, 500.0);
                assert_eq!(reveal.duration_ms, 500);
                assert_eq!(reveal.easing, "cubic-bezier(0.25, 1, 0.5, 1)");
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn reduced_motion_forces_instant_swap() {
        let (mut ctl, _) = init(&page(), MemoryStore::new());
        let mut ops = Vec::new();
        ctl.toggle(
            0.0,
            0.0,
            PageCaps::VIEW_TRANSITIONS | PageCaps::REDUCED_MOTION,
            Viewport::new(300.0, 400.0),
            &mut ops,
        );
        assert!(matches!(ops[0], DomOp::ApplyTheme { .. }));
    }

    #[test]
    fn double_toggle_restores_persisted_value() {
        let (mut ctl, _) = init(&page(), MemoryStore::new().with_entry(THEME_KEY, "light"));
        let vp = Viewport::new(100.0, 100.0);
        let mut ops = Vec::new();
        ctl.toggle(0.0, 0.0, PageCaps::empty(), vp, &mut ops);
        assert_eq!(ctl.store().load(THEME_KEY).unwrap().as_deref(), Some("dark"));
        ctl.toggle(0.0, 0.0, PageCaps::empty(), vp, &mut ops);
        assert_eq!(ctl.store().load(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn write_failure_still_switches_theme() {
        let (mut ctl, _) = init(&page(), MemoryStore::read_only());
        let mut ops = Vec::new();
        let t = ctl.toggle(0.0, 0.0, PageCaps::empty(), Viewport::new(10.0, 10.0), &mut ops);
        assert_eq!(t, Theme::Light);
        assert_eq!(ctl.theme(), Theme::Light);
    }

    #[test]
    fn icon_follows_theme() {
        let (mut ctl, _) = init(&page(), MemoryStore::new());
        let mut ops = Vec::new();
        ctl.toggle(0.0, 0.0, PageCaps::empty(), Viewport::new(10.0, 10.0), &mut ops);
        assert!(ops.contains(&DomOp::SetClassName {
            target: Target::Selector {
                selector: THEME_ICON_SELECTOR
            },
            value: "fas fa-sun",
        }));
    }

    #[test]
    fn no_toggle_button_means_no_icon_ops() {
        let (ctl, ops) = init(&PageSnapshot::new(), MemoryStore::new());
        assert!(!ctl.has_toggle());
        assert_eq!(ops, vec![DomOp::ApplyTheme { theme: Theme::Dark }]);
    }

    #[test]
    fn covering_radius_reaches_farthest_corner() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(covering_radius(0.0, 0.0, vp), 1000.0);
        assert_eq!(covering_radius(400.0, 300.0, vp), 500.0);
        assert_eq!(covering_radius(800.0, 0.0, vp), 1000.0);
    }

    #[test]
    fn reveal_keyframes_and_sampling() {
        let r = CircleReveal::new(100.0, 50.0, Viewport::new(200.0, 100.0), Duration::from_millis(500));
        let [from, to] = r.keyframes();
        assert_eq!(from, "circle(0px at 100px 50px)");
        assert!(to.starts_with("circle(111.80"));
        assert_eq!(r.radius_at(0.0), 0.0);
        assert_eq!(r.radius_at(1.0), r.end_radius);
        assert!(r.radius_at(0.5) > r.end_radius / 2.0);
    }
}
