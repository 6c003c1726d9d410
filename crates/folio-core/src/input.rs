#![forbid(unsafe_code)]

//! Host input, normalized.
//!
//! The web host translates DOM events into [`InputEvent`]s. Hit-testing stays
//! on the host side: it already knows whether a click landed on the theme
//! toggle or outside the open menu, so the engine only sees intent.

use serde::Serialize;

use crate::page::{SectionBox, Viewport};

/// Directional and escape keys the tilt and menu controllers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

/// Normalize a DOM `KeyboardEvent.key` value.
#[must_use]
pub fn normalize_dom_key(dom_key: &str) -> Key {
    match dom_key {
        "ArrowUp" | "Up" => Key::Up,
        "ArrowDown" | "Down" => Key::Down,
        "ArrowLeft" | "Left" => Key::Left,
        "ArrowRight" | "Right" => Key::Right,
        "Escape" | "Esc" => Key::Escape,
        _ => Key::Other,
    }
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer position in viewport (client) coordinates.
    PointerMove { x: f64, y: f64 },
    Key { key: Key },
    Scroll { y: f64 },
    Resize { viewport: Viewport },
    /// Section offsets changed (fonts loaded, content rendered, resize).
    Relayout {
        sections: Vec<SectionBox>,
        navbar_height: f64,
    },
    /// Click on the theme toggle, at viewport coordinates.
    ThemeToggle { x: f64, y: f64 },
    /// Click on the hamburger button.
    MenuToggle,
    /// Click on any `.nav-link`.
    NavLinkClicked,
    /// Click that landed outside both the hamburger and the nav links.
    OutsideClick,
    /// Click on an in-page anchor. `target_top` is the document offset of the
    /// anchor target, or `None` when the target does not exist.
    AnchorClicked { target_top: Option<f64> },
    /// An observed element entered the viewport.
    Intersected { hook: &'static str, index: usize },
    /// The window `load` event.
    Loaded,
}
