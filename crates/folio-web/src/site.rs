#![forbid(unsafe_code)]

//! Host-side composition of the effects engine, the language switch, and the
//! catalog renderer.
//!
//! [`Site`] holds no DOM handles. The wasm frontend snapshots the document,
//! forwards translated events, and applies the ops [`Site::frame`] returns;
//! native tests drive it the same way.

use std::time::Duration;

use folio_content::catalog::Catalog;
use folio_content::i18n::{self, Lang, LanguageController};
use folio_core::input::InputEvent;
use folio_core::ops::{DomOp, ListenerSpec};
use folio_core::page::{PageSnapshot, SectionBox, hooks};
use folio_core::theme::{PreferenceStore, Theme};
use folio_core::{EffectsConfig, EffectsError, Engine, EngineState};

/// Effects engine plus page content.
#[derive(Debug)]
pub struct Site {
    engine: Engine,
    catalog: Catalog,
    language: Option<LanguageController>,
    listeners: Vec<ListenerSpec>,
    /// Ops produced outside a frame (language toggles).
    pending: Vec<DomOp>,
}

impl Site {
    /// Create a site. Fails if `config` does not validate.
    pub fn new(config: EffectsConfig, seed: u64) -> Result<Self, EffectsError> {
        Ok(Self {
            engine: Engine::new(config)?.with_seed(seed),
            catalog: Catalog::default(),
            language: None,
            listeners: Vec::new(),
            pending: Vec::new(),
        })
    }

    /// Create a site from the JSON form of the constructor options.
    pub fn from_options_json(options: Option<&str>, seed: u64) -> Result<Self, EffectsError> {
        let config = match options {
            Some(json) => EffectsConfig::from_json(json)?,
            None => EffectsConfig::default(),
        };
        Self::new(config, seed)
    }

    /// Replace the embedded catalog (builder).
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Ops filling the catalog grids. Apply these and re-snapshot the page
    /// before [`start`](Self::start) so reveal sees the rendered cards.
    #[must_use]
    pub fn render_catalog(&self, page: &PageSnapshot) -> Vec<DomOp> {
        self.catalog.render_ops(page)
    }

    /// Align the engine clock with the host clock before [`start`](Self::start).
    pub fn set_time(&mut self, now: Duration) {
        self.engine.set_time(now);
    }

    /// Start the engine and, on pages with language panels, the language
    /// switch. Returns the initial ops.
    pub fn start(&mut self, page: PageSnapshot, store: Box<dyn PreferenceStore>) -> Vec<DomOp> {
        let has_language = [i18n::hooks::LANG_TOGGLE, i18n::hooks::CONTENT_AR, i18n::hooks::CONTENT_EN]
            .iter()
            .any(|h| page.has(h));
        let now = self.engine.now();
        let mut ops = Vec::new();
        if has_language {
            self.language = Some(LanguageController::init(&page, now, &mut ops));
        }

        self.engine.start(page, store);
        ops.extend(self.engine.take_ops());

        self.listeners = self.engine.listeners().to_vec();
        if let Some(language) = &self.language {
            for spec in language.listeners() {
                if !self.listeners.contains(&spec) {
                    self.listeners.push(spec);
                }
            }
        }
        tracing::debug!(
            listeners = self.listeners.len(),
            language = has_language,
            "site started"
        );
        ops
    }

    /// Listeners the frontend must register.
    #[must_use]
    pub fn listeners(&self) -> &[ListenerSpec] {
        &self.listeners
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.engine.push_event(event);
    }

    /// Window scrolled to `y`, with section boxes measured at the same time.
    pub fn scrolled(&mut self, y: f64, sections: Vec<SectionBox>, navbar_height: f64) {
        self.engine.push_event(InputEvent::Relayout {
            sections,
            navbar_height,
        });
        self.engine.push_event(InputEvent::Scroll { y });
    }

    /// Switch language. `None` when the page has no language switch.
    pub fn toggle_language(&mut self) -> Option<Lang> {
        if self.engine.state() != EngineState::Running {
            return None;
        }
        let now = self.engine.now();
        let language = self.language.as_mut()?;
        Some(language.toggle(now, &mut self.pending))
    }

    /// Advance to host time `now` and return every op to apply, in order.
    pub fn frame(&mut self, now: Duration) -> Vec<DomOp> {
        self.engine.set_time(now);
        self.engine.step();
        let mut ops = std::mem::take(&mut self.pending);
        ops.extend(self.engine.take_ops());
        if self.engine.is_running()
            && let Some(language) = &mut self.language
        {
            language.poll(now, &mut ops);
        }
        ops
    }

    /// Tear down. Returns the cleanup ops (particle removal).
    pub fn stop(&mut self) -> Vec<DomOp> {
        self.engine.stop();
        self.listeners.clear();
        self.pending.clear();
        self.engine.take_ops()
    }

    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        self.engine.theme()
    }

    #[must_use]
    pub fn language(&self) -> Option<Lang> {
        self.language.as_ref().map(LanguageController::lang)
    }

    /// Whether the mobile menu is open.
    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.engine
            .navigation()
            .is_some_and(folio_core::navigation::NavigationController::is_menu_open)
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// What a click anywhere in the document means for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentClick {
    /// Id of the in-page anchor target, when the click hit `a[href^="#"]`.
    /// `Some("")` for a bare `#`, which is swallowed without scrolling.
    pub anchor: Option<String>,
    /// Whether the click should close an open menu.
    pub close_menu: bool,
}

/// Classify a document click.
///
/// `anchor_href` is the `href` of the closest enclosing anchor, if any;
/// `inside_menu` whether the click hit the hamburger or the nav links.
#[must_use]
pub fn classify_document_click(
    anchor_href: Option<&str>,
    inside_menu: bool,
    menu_open: bool,
) -> DocumentClick {
    DocumentClick {
        anchor: anchor_href
            .and_then(|href| href.strip_prefix('#'))
            .map(str::to_owned),
        close_menu: menu_open && !inside_menu,
    }
}

/// `IntersectionObserver` settings for one observed hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

/// Observer settings for `hook`. Counters start just before they scroll in;
/// cards and skill bars wait until they are slightly inside the viewport.
#[must_use]
pub fn observer_options(hook: &str) -> ObserverOptions {
    if hook == hooks::STAT_NUMBER {
        ObserverOptions {
            threshold: 0.0,
            root_margin: "0px 0px 100px 0px",
        }
    } else {
        ObserverOptions {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px",
        }
    }
}
