#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use folio_content::catalog;
use folio_content::i18n;
use folio_core::StorageError;
use folio_core::error::StorageResult;
use folio_core::input::{InputEvent, normalize_dom_key};
use folio_core::ops::{DomOp, ListenKind, ListenTarget, ListenerSpec, Target};
use folio_core::page::{PageCaps, PageSnapshot, SectionBox, Viewport, hooks};
use folio_core::particles::ParticleStyle;
use folio_core::theme::{CircleReveal, PreferenceStore, Theme};
use folio_core::tilt::{CARD_REST_TRANSFORM, Rect, card_hover_transform, ripple_geometry};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent,
    ScrollBehavior, ScrollToOptions, Storage, Window,
};

use crate::site::{Site, classify_document_click, observer_options};

type Shared = Rc<RefCell<Site>>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

const PACKAGE_LINK: &str = "package-link";
const RIPPLE_MS: i32 = 600;
const REVEAL_PSEUDO: &str = "::view-transition-new(root)";

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

/// Portfolio site driver.
///
/// Owns the effects [`Site`], the DOM listeners it asked for, and the
/// `requestAnimationFrame` loop that steps it.
#[wasm_bindgen]
pub struct FolioSite {
    site: Shared,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
    _frame_loop: Option<FrameSlot>,
    running: Rc<Cell<bool>>,
    started: bool,
}

#[wasm_bindgen]
impl FolioSite {
    /// Create a site. `options` is a plain object with any subset of the
    /// effects configuration fields.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<FolioSite, JsValue> {
        let json = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                Some(String::from(js_sys::JSON::stringify(&value)?))
            }
            _ => None,
        };
        let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u64 | 1;
        let site = Site::from_options_json(json.as_deref(), seed)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            site: Rc::new(RefCell::new(site)),
            listeners: Vec::new(),
            observers: Vec::new(),
            _frame_loop: None,
            running: Rc::new(Cell::new(false)),
            started: false,
        })
    }

    /// Render the catalog, start every effect the page supports, and begin
    /// the frame loop. Calling it twice is a no-op.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        let (window, document) = dom()?;

        let ops = self.site.borrow().render_catalog(&snapshot(&window, &document));
        apply_ops(&window, &document, ops);

        let page = snapshot(&window, &document);
        let reduced = page.reduced_motion();
        let store = LocalStore::new(&window);
        let ops = {
            let mut site = self.site.borrow_mut();
            site.set_time(host_now(&window));
            site.start(page, Box::new(store))
        };
        apply_ops(&window, &document, ops);

        let specs = self.site.borrow().listeners().to_vec();
        for spec in specs {
            self.register(&window, &document, spec)?;
        }
        if !reduced {
            self.wire_package_cards(&document)?;
        }
        self.start_frame_loop(&window)
    }

    /// Remove every listener, stop the frame loop, and clear particles.
    pub fn stop(&mut self) {
        self.running.set(false);
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        for observer in self.observers.drain(..) {
            observer.observer.disconnect();
        }
        let ops = self.site.borrow_mut().stop();
        if let Ok((window, document)) = dom() {
            apply_ops(&window, &document, ops);
        }
    }

    /// Toggle the theme as if the toggle was clicked at viewport `(x, y)`.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self, x: f64, y: f64) {
        self.site
            .borrow_mut()
            .push_event(InputEvent::ThemeToggle { x, y });
    }

    /// Switch the page language. Returns the new language code, or
    /// `undefined` when the page has no language switch.
    #[wasm_bindgen(js_name = toggleLanguage)]
    pub fn toggle_language(&mut self) -> Option<String> {
        self.site
            .borrow_mut()
            .toggle_language()
            .map(|lang| lang.as_str().to_owned())
    }

    /// Current theme, once started.
    pub fn theme(&self) -> Option<String> {
        self.site.borrow().theme().map(|t| t.as_str().to_owned())
    }

    /// Current language, on pages with a language switch.
    pub fn language(&self) -> Option<String> {
        self.site
            .borrow()
            .language()
            .map(|lang| lang.as_str().to_owned())
    }
}

impl FolioSite {
    fn register(
        &mut self,
        window: &Window,
        document: &Document,
        spec: ListenerSpec,
    ) -> Result<(), JsValue> {
        if spec.kind == ListenKind::Intersection {
            return self.observe(document, spec.target);
        }
        let targets: Vec<EventTarget> = match spec.target {
            ListenTarget::Window => vec![window.clone().into()],
            ListenTarget::Document => vec![document.clone().into()],
            ListenTarget::Id { id } => document
                .get_element_by_id(id)
                .map(Into::into)
                .into_iter()
                .collect(),
            ListenTarget::Class { class } => elements_by_class(document, class)
                .into_iter()
                .map(Into::into)
                .collect(),
        };
        for target in targets {
            let Some(handler) = handler_for(spec, window, document, &self.site) else {
                tracing::warn!(?spec, "no DOM handler for listener");
                return Ok(());
            };
            self.add_listener(target, dom_event_name(spec.kind), Closure::wrap(handler))?;
        }
        Ok(())
    }

    fn add_listener(
        &mut self,
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<(), JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target,
            kind,
            callback,
        });
        Ok(())
    }

    fn observe(&mut self, document: &Document, target: ListenTarget) -> Result<(), JsValue> {
        let (hook, elements) = match target {
            ListenTarget::Class { class } => (class, elements_by_class(document, class)),
            ListenTarget::Id { id } => (id, document.get_element_by_id(id).into_iter().collect()),
            ListenTarget::Window | ListenTarget::Document => return Ok(()),
        };
        if elements.is_empty() {
            return Ok(());
        }
        let index_attr = format!("data-folio-{hook}");
        for (i, el) in elements.iter().enumerate() {
            el.set_attribute(&index_attr, &i.to_string())?;
        }

        let site = Rc::clone(&self.site);
        let attr = index_attr.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let el = entry.target();
                    observer.unobserve(&el);
                    let index = el
                        .get_attribute(&attr)
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    site.borrow_mut()
                        .push_event(InputEvent::Intersected { hook, index });
                }
            },
        );

        let init = IntersectionObserverInit::new();
        let options = observer_options(hook);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for el in &elements {
            observer.observe(el);
        }
        self.observers.push(Observer {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    /// Hover tilt and click ripple on catalog cards. Purely cosmetic, so it
    /// bypasses the engine.
    fn wire_package_cards(&mut self, document: &Document) -> Result<(), JsValue> {
        for card in elements_by_class(document, hooks::PACKAGE_CARD) {
            let Ok(card) = card.dyn_into::<HtmlElement>() else {
                continue;
            };
            let el = card.clone();
            let hover = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let transform = card_hover_transform(
                    client_rect(&el),
                    f64::from(mouse.client_x()),
                    f64::from(mouse.client_y()),
                );
                let _ = el.style().set_property("transform", &transform);
            });
            self.add_listener(card.clone().into(), "mousemove", hover)?;

            let el = card.clone();
            let leave = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                let _ = el.style().set_property("transform", CARD_REST_TRANSFORM);
            });
            self.add_listener(card.into(), "mouseleave", leave)?;
        }

        for link in elements_by_class(document, PACKAGE_LINK) {
            let el = link.clone();
            let doc = document.clone();
            let ripple = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>()
                    && let Err(err) = spawn_ripple(&doc, &el, mouse)
                {
                    tracing::warn!(?err, "ripple failed");
                }
            });
            self.add_listener(link.into(), "click", ripple)?;
        }
        Ok(())
    }

    fn start_frame_loop(&mut self, window: &Window) -> Result<(), JsValue> {
        self.running.set(true);
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let next = Rc::clone(&slot);
        let site = Rc::clone(&self.site);
        let running = Rc::clone(&self.running);
        let win = window.clone();

        *slot.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            if !running.get() {
                return;
            }
            let ops = site.borrow_mut().frame(millis(timestamp));
            if let Some(document) = win.document() {
                apply_ops(&win, &document, ops);
            }
            if let Some(callback) = next.borrow().as_ref() {
                let _ = win.request_animation_frame(callback.as_ref().unchecked_ref());
            }
        }));

        if let Some(callback) = slot.borrow().as_ref() {
            window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        }
        self._frame_loop = Some(slot);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event translation
// ---------------------------------------------------------------------------

fn dom_event_name(kind: ListenKind) -> &'static str {
    match kind {
        ListenKind::PointerMove => "mousemove",
        ListenKind::KeyDown => "keydown",
        ListenKind::Click => "click",
        ListenKind::Scroll => "scroll",
        ListenKind::Resize => "resize",
        ListenKind::Load => "load",
        ListenKind::Intersection => "intersection",
    }
}

fn handler_for(
    spec: ListenerSpec,
    window: &Window,
    document: &Document,
    site: &Shared,
) -> Option<Box<dyn FnMut(Event)>> {
    let site = Rc::clone(site);
    let window = window.clone();
    let document = document.clone();
    let handler: Box<dyn FnMut(Event)> = match (spec.target, spec.kind) {
        (ListenTarget::Window, ListenKind::PointerMove) => Box::new(move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                site.borrow_mut().push_event(InputEvent::PointerMove {
                    x: f64::from(mouse.client_x()),
                    y: f64::from(mouse.client_y()),
                });
            }
        }),
        (ListenTarget::Document, ListenKind::KeyDown) => Box::new(move |event: Event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                site.borrow_mut().push_event(InputEvent::Key {
                    key: normalize_dom_key(&key.key()),
                });
            }
        }),
        (ListenTarget::Window, ListenKind::Scroll) => Box::new(move |_: Event| {
            let y = window.scroll_y().unwrap_or(0.0);
            site.borrow_mut()
                .scrolled(y, sections(&document), navbar_height(&document));
        }),
        (ListenTarget::Window, ListenKind::Resize) => Box::new(move |_: Event| {
            let mut site = site.borrow_mut();
            site.push_event(InputEvent::Resize {
                viewport: viewport(&window),
            });
            site.push_event(InputEvent::Relayout {
                sections: sections(&document),
                navbar_height: navbar_height(&document),
            });
        }),
        (ListenTarget::Window, ListenKind::Load) => Box::new(move |_: Event| {
            site.borrow_mut().push_event(InputEvent::Loaded);
        }),
        (ListenTarget::Id { id }, ListenKind::Click) if id == hooks::THEME_TOGGLE => {
            Box::new(move |event: Event| {
                let (x, y) = event
                    .dyn_ref::<MouseEvent>()
                    .map_or((0.0, 0.0), |m| (f64::from(m.client_x()), f64::from(m.client_y())));
                site.borrow_mut().push_event(InputEvent::ThemeToggle { x, y });
            })
        }
        (ListenTarget::Id { id }, ListenKind::Click) if id == hooks::HAMBURGER => {
            Box::new(move |_: Event| {
                site.borrow_mut().push_event(InputEvent::MenuToggle);
            })
        }
        (ListenTarget::Class { class }, ListenKind::Click) if class == hooks::NAV_LINK => {
            Box::new(move |_: Event| {
                site.borrow_mut().push_event(InputEvent::NavLinkClicked);
            })
        }
        (ListenTarget::Id { id }, ListenKind::Click) if id == i18n::hooks::LANG_TOGGLE => {
            Box::new(move |_: Event| {
                site.borrow_mut().toggle_language();
            })
        }
        (ListenTarget::Document, ListenKind::Click) => Box::new(move |event: Event| {
            on_document_click(&document, &site, &event);
        }),
        _ => return None,
    };
    Some(handler)
}

fn on_document_click(document: &Document, site: &Shared, event: &Event) {
    let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
    let anchor = target
        .as_ref()
        .and_then(|el| el.closest("a[href^=\"#\"]").ok().flatten());
    let href = anchor.as_ref().and_then(|a| a.get_attribute("href"));
    let inside_menu = target.as_ref().is_some_and(|el| {
        [hooks::HAMBURGER, hooks::NAV_LINKS].iter().any(|id| {
            document
                .get_element_by_id(id)
                .is_some_and(|menu| menu.contains(Some(&**el)))
        })
    });

    let mut site = site.borrow_mut();
    let click = classify_document_click(href.as_deref(), inside_menu, site.menu_open());
    if let Some(id) = click.anchor {
        event.prevent_default();
        if !id.is_empty() {
            let target_top = document
                .get_element_by_id(&id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .map(|el| f64::from(el.offset_top()));
            site.push_event(InputEvent::AnchorClicked { target_top });
        }
    }
    if click.close_menu {
        site.push_event(InputEvent::OutsideClick);
    }
}

// ---------------------------------------------------------------------------
// Page snapshot
// ---------------------------------------------------------------------------

fn dom() -> Result<(Window, Document), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    Ok((window, document))
}

fn millis(ms: f64) -> Duration {
    Duration::from_secs_f64(ms.max(0.0) / 1000.0)
}

fn host_now(window: &Window) -> Duration {
    millis(window.performance().map_or(0.0, |p| p.now()))
}

fn snapshot(window: &Window, document: &Document) -> PageSnapshot {
    let mut page = PageSnapshot::new()
        .with_viewport(viewport(window))
        .with_caps(caps(window, document));

    let ids = hooks::IDS
        .iter()
        .chain(i18n::hooks::IDS)
        .chain(&[catalog::PACKAGES_GRID, catalog::PROJECTS_GRID]);
    for &id in ids {
        if document.get_element_by_id(id).is_some() {
            page.set_hook(id, 1);
        }
    }
    for &class in hooks::CLASSES {
        page.set_hook(class, elements_by_class(document, class).len());
    }
    for &selector in i18n::hooks::SELECTORS {
        if document.query_selector(selector).ok().flatten().is_some() {
            page.set_hook(selector, 1);
        }
    }

    page.scroll_y = window.scroll_y().unwrap_or(0.0);
    page.sections = sections(document);
    page.navbar_height = navbar_height(document);
    page.nav_links = elements_by_class(document, hooks::NAV_LINK)
        .iter()
        .map(|el| el.get_attribute("href").unwrap_or_default())
        .collect();
    page.counter_targets = data_values(document, hooks::STAT_NUMBER, "data-target");
    page.skill_progress = data_values(document, hooks::SKILL_PROGRESS, "data-progress");
    page
}

fn caps(window: &Window, document: &Document) -> PageCaps {
    let matches = |query: &str| {
        window
            .match_media(query)
            .ok()
            .flatten()
            .is_some_and(|m| m.matches())
    };
    let mut caps = PageCaps::empty();
    caps.set(
        PageCaps::REDUCED_MOTION,
        matches("(prefers-reduced-motion: reduce)"),
    );
    caps.set(
        PageCaps::PREFERS_LIGHT,
        matches("(prefers-color-scheme: light)"),
    );
    caps.set(
        PageCaps::VIEW_TRANSITIONS,
        Reflect::has(document, &JsValue::from_str("startViewTransition")).unwrap_or(false),
    );
    caps
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn sections(document: &Document) -> Vec<SectionBox> {
    let Ok(nodes) = document.query_selector_all("section[id]") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|el| SectionBox {
            id: el.id(),
            top: f64::from(el.offset_top()),
            height: f64::from(el.offset_height()),
        })
        .collect()
}

fn navbar_height(document: &Document) -> f64 {
    document
        .get_element_by_id(hooks::NAVBAR)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map_or(0.0, |el| f64::from(el.offset_height()))
}

fn elements_by_class(document: &Document, class: &str) -> Vec<Element> {
    let collection = document.get_elements_by_class_name(class);
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

fn data_values(document: &Document, class: &str, attr: &str) -> Vec<u32> {
    elements_by_class(document, class)
        .iter()
        .map(|el| {
            el.get_attribute(attr)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        })
        .collect()
}

fn client_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
}

// ---------------------------------------------------------------------------
// Op application
// ---------------------------------------------------------------------------

fn apply_ops(window: &Window, document: &Document, ops: Vec<DomOp>) {
    for op in ops {
        if let Err(err) = apply_op(window, document, op) {
            tracing::warn!(?err, "failed to apply DOM op");
        }
    }
}

fn apply_op(window: &Window, document: &Document, op: DomOp) -> Result<(), JsValue> {
    match op {
        DomOp::SetText { target, text } => for_each(document, target, |el| {
            el.set_text_content(Some(&text));
            Ok(())
        }),
        DomOp::SetHtml { target, html } => for_each(document, target, |el| {
            el.set_inner_html(&html);
            Ok(())
        }),
        DomOp::AddClass { target, class } => {
            for_each(document, target, |el| el.class_list().add_1(class))
        }
        DomOp::RemoveClass { target, class } => {
            for_each(document, target, |el| el.class_list().remove_1(class))
        }
        DomOp::ToggleClass { target, class, on } => for_each(document, target, |el| {
            el.class_list().toggle_with_force(class, on).map(|_| ())
        }),
        DomOp::SetClassName { target, value } => for_each(document, target, |el| {
            el.set_class_name(value);
            Ok(())
        }),
        DomOp::SetStyle {
            target,
            property,
            value,
        } => for_each(document, target, |el| set_style(el, property, &value)),
        DomOp::SetAttribute {
            target,
            name,
            value,
        } => for_each(document, target, |el| el.set_attribute(name, &value)),
        DomOp::RemoveAttribute { target, name } => {
            for_each(document, target, |el| el.remove_attribute(name))
        }
        DomOp::SetTitle { title } => {
            document.set_title(&title);
            Ok(())
        }
        DomOp::SpawnParticle { id, style } => spawn_particle(document, id, &style),
        DomOp::RemoveParticle { id } => {
            let selector = format!("[data-particle-id=\"{id}\"]");
            if let Some(el) = document.query_selector(&selector)? {
                el.remove();
            }
            Ok(())
        }
        DomOp::ApplyTheme { theme } => set_theme_attribute(document, theme),
        DomOp::RevealTheme { theme, reveal } => reveal_theme(document, theme, &reveal),
        DomOp::ScrollTo { top } => {
            let options = ScrollToOptions::new();
            options.set_top(top);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
            Ok(())
        }
        DomOp::LockScroll { locked } => match document.body() {
            Some(body) => body
                .style()
                .set_property("overflow", if locked { "hidden" } else { "" }),
            None => Ok(()),
        },
    }
}

/// Apply `f` to every element `target` resolves to. Missing elements are
/// skipped.
fn for_each(
    document: &Document,
    target: Target,
    mut f: impl FnMut(&Element) -> Result<(), JsValue>,
) -> Result<(), JsValue> {
    let elements: Vec<Element> = match target {
        Target::Root => document.document_element().into_iter().collect(),
        Target::Body => document.body().map(Into::into).into_iter().collect(),
        Target::Id { id } => document.get_element_by_id(id).into_iter().collect(),
        Target::Class { class, index } => u32::try_from(index)
            .ok()
            .and_then(|i| document.get_elements_by_class_name(class).item(i))
            .into_iter()
            .collect(),
        Target::AllOfClass { class } => elements_by_class(document, class),
        Target::Selector { selector } => document.query_selector(selector)?.into_iter().collect(),
    };
    elements.iter().try_for_each(|el| f(el))
}

fn set_style(el: &Element, property: &str, value: &str) -> Result<(), JsValue> {
    match el.dyn_ref::<HtmlElement>() {
        Some(el) => el.style().set_property(property, value),
        None => Ok(()),
    }
}

fn spawn_particle(document: &Document, id: u64, style: &ParticleStyle) -> Result<(), JsValue> {
    let Some(container) = document.get_element_by_id(hooks::PARTICLES) else {
        return Ok(());
    };
    let el = document.create_element("div")?;
    el.set_class_name("particle");
    el.set_attribute("data-particle-id", &id.to_string())?;
    for (property, value) in style.css_declarations() {
        set_style(&el, property, &value)?;
    }
    container.append_child(&el)?;
    Ok(())
}

fn spawn_ripple(document: &Document, link: &Element, mouse: &MouseEvent) -> Result<(), JsValue> {
    let ripple = ripple_geometry(
        client_rect(link),
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
    );
    let span = document.create_element("span")?;
    span.set_class_name("ripple");
    set_style(&span, "width", &format!("{}px", ripple.size))?;
    set_style(&span, "height", &format!("{}px", ripple.size))?;
    set_style(&span, "left", &format!("{}px", ripple.left))?;
    set_style(&span, "top", &format!("{}px", ripple.top))?;
    link.append_child(&span)?;

    let remove = Closure::once_into_js(move || span.remove());
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .set_timeout_with_callback_and_timeout_and_arguments_0(remove.unchecked_ref(), RIPPLE_MS)?;
    Ok(())
}

fn set_theme_attribute(document: &Document, theme: Theme) -> Result<(), JsValue> {
    let Some(root) = document.document_element() else {
        return Ok(());
    };
    match theme {
        Theme::Light => root.set_attribute("data-theme", "light"),
        Theme::Dark => root.remove_attribute("data-theme"),
    }
}

/// Swap the theme inside `document.startViewTransition`, then clip the new
/// snapshot with an expanding circle. Falls back to a plain swap when view
/// transitions are missing.
fn reveal_theme(document: &Document, theme: Theme, reveal: &CircleReveal) -> Result<(), JsValue> {
    let Ok(start) =
        Reflect::get(document, &JsValue::from_str("startViewTransition"))?.dyn_into::<Function>()
    else {
        return set_theme_attribute(document, theme);
    };

    let doc = document.clone();
    let update = Closure::once_into_js(move || {
        if let Err(err) = set_theme_attribute(&doc, theme) {
            tracing::warn!(?err, "theme swap failed");
        }
    });
    let transition = start.call1(document, &update)?;
    let ready = Reflect::get(&transition, &JsValue::from_str("ready"))?;
    let then = Reflect::get(&ready, &JsValue::from_str("then"))?.dyn_into::<Function>()?;

    let doc = document.clone();
    let reveal = reveal.clone();
    let animate = Closure::once_into_js(move |_: JsValue| {
        if let Err(err) = animate_clip(&doc, &reveal) {
            tracing::warn!(?err, "theme reveal animation failed");
        }
    });
    then.call1(&ready, &animate)?;
    Ok(())
}

fn animate_clip(document: &Document, reveal: &CircleReveal) -> Result<(), JsValue> {
    let Some(root) = document.document_element() else {
        return Ok(());
    };
    let [from, to] = reveal.keyframes();
    let frames = Object::new();
    Reflect::set(
        &frames,
        &JsValue::from_str("clipPath"),
        &Array::of2(&JsValue::from_str(&from), &JsValue::from_str(&to)),
    )?;
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("duration"),
        &JsValue::from_f64(reveal.duration_ms as f64),
    )?;
    Reflect::set(
        &options,
        &JsValue::from_str("easing"),
        &JsValue::from_str(&reveal.easing),
    )?;
    Reflect::set(
        &options,
        &JsValue::from_str("pseudoElement"),
        &JsValue::from_str(REVEAL_PSEUDO),
    )?;
    let animate = Reflect::get(&root, &JsValue::from_str("animate"))?.dyn_into::<Function>()?;
    animate.call2(&root, &frames, &options)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// localStorage
// ---------------------------------------------------------------------------

/// [`PreferenceStore`] over `window.localStorage`.
struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
    }
}

impl PreferenceStore for LocalStore {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn store(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(format!("{err:?}")))
    }
}
