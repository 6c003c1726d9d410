#![forbid(unsafe_code)]

//! Navbar scroll state, active-section tracking, and the mobile menu.
//!
//! Scroll events are throttled: the first event in a quiet period arms a
//! flush timer, later events only record the newest position, and the flush
//! applies whatever position is current when it fires.

use std::time::Duration;

use crate::config::EffectsConfig;
use crate::error::EffectsError;
use crate::ops::{DomOp, ListenKind, ListenTarget, ListenerSpec, Target};
use crate::page::{PageSnapshot, SectionBox, hooks};

/// Navigation controller.
#[derive(Debug)]
pub struct NavigationController {
    has_navbar: bool,
    has_back_to_top: bool,
    has_menu: bool,
    nav_links: Vec<String>,
    sections: Vec<SectionBox>,
    navbar_height: f64,
    scrolled_px: f64,
    back_to_top_px: f64,
    marker_offset: f64,
    throttle: Duration,
    latest_scroll: f64,
    flush_armed: bool,
    active: Option<usize>,
    menu_open: bool,
}

impl NavigationController {
    /// Attach when any navigation hook is present.
    pub fn attach(page: &PageSnapshot, cfg: &EffectsConfig) -> Result<Self, EffectsError> {
        let has_navbar = page.has(hooks::NAVBAR);
        let has_back_to_top = page.has(hooks::BACK_TO_TOP);
        let has_menu = page.has(hooks::HAMBURGER) && page.has(hooks::NAV_LINKS);
        let tracks_sections = page.has(hooks::NAV_LINK) && !page.sections.is_empty();

        if !(has_navbar || has_back_to_top || has_menu || tracks_sections) {
            return Err(EffectsError::MissingTarget {
                hook: hooks::NAVBAR,
            });
        }

        Ok(Self {
            has_navbar,
            has_back_to_top,
            has_menu,
            nav_links: page.nav_links.clone(),
            sections: page.sections.clone(),
            navbar_height: page.navbar_height,
            scrolled_px: cfg.navbar_scrolled_px,
            back_to_top_px: cfg.back_to_top_px,
            marker_offset: cfg.active_section_offset_px,
            throttle: EffectsConfig::ms(cfg.scroll_throttle_ms),
            latest_scroll: 0.0,
            flush_armed: false,
            active: None,
            menu_open: false,
        })
    }

    /// Listeners this controller needs.
    #[must_use]
    pub fn listeners(&self) -> Vec<ListenerSpec> {
        let mut out = vec![ListenerSpec::new(ListenTarget::Window, ListenKind::Scroll)];
        // Anchor clicks and outside-click detection are delegated on the document.
        out.push(ListenerSpec::new(ListenTarget::Document, ListenKind::Click));
        if self.has_menu {
            out.push(ListenerSpec::new(
                ListenTarget::Id {
                    id: hooks::HAMBURGER,
                },
                ListenKind::Click,
            ));
            out.push(ListenerSpec::new(ListenTarget::Document, ListenKind::KeyDown));
            if !self.nav_links.is_empty() {
                out.push(ListenerSpec::new(
                    ListenTarget::Class {
                        class: hooks::NAV_LINK,
                    },
                    ListenKind::Click,
                ));
            }
        }
        out
    }

    /// Record a scroll position. Returns the flush delay when a flush must be
    /// scheduled, `None` while one is already pending.
    pub fn scroll(&mut self, y: f64) -> Option<Duration> {
        self.latest_scroll = y;
        if self.flush_armed {
            return None;
        }
        self.flush_armed = true;
        Some(self.throttle)
    }

    /// Apply the newest scroll position.
    pub fn flush(&mut self, ops: &mut Vec<DomOp>) {
        self.flush_armed = false;
        let y = self.latest_scroll;

        if self.has_navbar {
            ops.push(DomOp::ToggleClass {
                target: Target::id(hooks::NAVBAR),
                class: "scrolled",
                on: y > self.scrolled_px,
            });
        }
        if self.has_back_to_top {
            ops.push(DomOp::ToggleClass {
                target: Target::id(hooks::BACK_TO_TOP),
                class: "visible",
                on: y > self.back_to_top_px,
            });
        }
        self.update_active_link(y, ops);
    }

    fn update_active_link(&mut self, y: f64, ops: &mut Vec<DomOp>) {
        let marker = y + self.marker_offset;
        // Last match wins when sections overlap, as in document order.
        let Some(section) = self.sections.iter().rev().find(|s| s.contains(marker)) else {
            return;
        };
        let href = format!("#{}", section.id);
        let active = self.nav_links.iter().position(|l| *l == href);
        if active == self.active {
            return;
        }
        for index in 0..self.nav_links.len() {
            ops.push(DomOp::ToggleClass {
                target: Target::class(hooks::NAV_LINK, index),
                class: "active",
                on: Some(index) == active,
            });
        }
        self.active = active;
    }

    pub fn toggle_menu(&mut self, ops: &mut Vec<DomOp>) {
        if !self.has_menu {
            return;
        }
        self.set_menu(!self.menu_open, ops);
    }

    /// Close the menu if open (Escape, link click, outside click).
    pub fn close_menu(&mut self, ops: &mut Vec<DomOp>) {
        if self.menu_open {
            self.set_menu(false, ops);
        }
    }

    fn set_menu(&mut self, open: bool, ops: &mut Vec<DomOp>) {
        self.menu_open = open;
        for id in [hooks::HAMBURGER, hooks::NAV_LINKS] {
            ops.push(DomOp::ToggleClass {
                target: Target::id(id),
                class: "active",
                on: open,
            });
        }
        ops.push(DomOp::SetAttribute {
            target: Target::id(hooks::HAMBURGER),
            name: "aria-expanded",
            value: open.to_string(),
        });
        ops.push(DomOp::LockScroll { locked: open });
    }

    /// Smooth-scroll to an anchor target, clearing the fixed navbar.
    pub fn anchor(&self, target_top: Option<f64>, ops: &mut Vec<DomOp>) {
        if let Some(top) = target_top {
            ops.push(DomOp::ScrollTo {
                top: top - self.navbar_height,
            });
        }
    }

    pub fn relayout(&mut self, sections: Vec<SectionBox>, navbar_height: f64) {
        self.sections = sections;
        self.navbar_height = navbar_height;
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    #[must_use]
    pub fn active_link(&self) -> Option<usize> {
        self.active
    }
}
