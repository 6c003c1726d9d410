#![forbid(unsafe_code)]

//! What the host page offers the engine.
//!
//! The host inspects the live document once at startup (and again on resize)
//! and describes it with a [`PageSnapshot`]. Controllers look their targets
//! up here; a hook that is absent is a valid state, never an error.

use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Element hooks the engine knows about.
///
/// Plain names are element ids; names listed in [`hooks::CLASSES`] are class
/// selectors and may match several elements.
pub mod hooks {
    pub const TYPED_TEXT: &str = "typed-text";
    pub const PARTICLES: &str = "particles";
    pub const HERO_TILT: &str = "hero-tilt";
    pub const THEME_TOGGLE: &str = "theme-toggle";
    pub const LOADER: &str = "loader";
    pub const NAVBAR: &str = "navbar";
    pub const HAMBURGER: &str = "hamburger";
    pub const NAV_LINKS: &str = "nav-links";
    pub const BACK_TO_TOP: &str = "back-to-top";
    pub const SKILLS: &str = "skills";

    pub const NAV_LINK: &str = "nav-link";
    pub const SKILL_CATEGORY: &str = "skill-category";
    pub const SKILL_PROGRESS: &str = "skill-progress";
    pub const STAT_NUMBER: &str = "stat-number";
    pub const PROJECT_CARD: &str = "project-card";
    pub const PACKAGE_CARD: &str = "package-card";

    /// Every id hook, in lookup order.
    pub const IDS: &[&str] = &[
        TYPED_TEXT,
        PARTICLES,
        HERO_TILT,
        THEME_TOGGLE,
        LOADER,
        NAVBAR,
        HAMBURGER,
        NAV_LINKS,
        BACK_TO_TOP,
        SKILLS,
    ];

    /// Every class hook, in lookup order.
    pub const CLASSES: &[&str] = &[
        NAV_LINK,
        SKILL_CATEGORY,
        SKILL_PROGRESS,
        STAT_NUMBER,
        PROJECT_CARD,
        PACKAGE_CARD,
    ];

    /// Whether `name` is a class hook rather than an id hook.
    #[must_use]
    pub fn is_class(name: &str) -> bool {
        CLASSES.contains(&name)
    }
}

bitflags! {
    /// Platform signals and optional browser primitives.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PageCaps: u8 {
        /// `prefers-reduced-motion: reduce` matched.
        const REDUCED_MOTION   = 0b0001;
        /// `prefers-color-scheme: light` matched.
        const PREFERS_LIGHT    = 0b0010;
        /// `document.startViewTransition` exists.
        const VIEW_TRANSITIONS = 0b0100;
    }
}

/// Layout viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Document-space box of a `section[id]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBox {
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Host description of the page.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub viewport: Viewport,
    pub caps: PageCaps,
    /// Hook name to number of matching elements.
    present: HashMap<&'static str, usize>,
    pub sections: Vec<SectionBox>,
    /// `href` of each `.nav-link`, in document order.
    pub nav_links: Vec<String>,
    /// `data-target` of each `.stat-number`, in document order.
    pub counter_targets: Vec<u32>,
    /// `data-progress` of each `.skill-progress`, in document order.
    pub skill_progress: Vec<u32>,
    /// Height of `#navbar`, subtracted from anchor scroll targets.
    pub navbar_height: f64,
    /// `window.scrollY` when the snapshot was taken.
    pub scroll_y: f64,
}

impl PageSnapshot {
    /// An empty document with the default viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` elements matching `hook` (builder).
    #[must_use]
    pub fn with_hook(mut self, hook: &'static str, count: usize) -> Self {
        self.set_hook(hook, count);
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_scroll_y(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    #[must_use]
    pub fn with_caps(mut self, caps: PageCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Record `count` elements matching `hook`; zero removes it.
    pub fn set_hook(&mut self, hook: &'static str, count: usize) {
        if count == 0 {
            self.present.remove(hook);
        } else {
            self.present.insert(hook, count);
        }
    }

    /// Whether at least one element matches `hook`.
    #[must_use]
    pub fn has(&self, hook: &str) -> bool {
        self.count(hook) > 0
    }

    /// Number of elements matching `hook`.
    #[must_use]
    pub fn count(&self, hook: &str) -> usize {
        self.present.get(hook).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.caps.contains(PageCaps::REDUCED_MOTION)
    }

    /// Whether no known hook is present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}
