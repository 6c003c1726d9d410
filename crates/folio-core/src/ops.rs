#![forbid(unsafe_code)]

//! DOM mutations and listener declarations emitted by the engine.
//!
//! The engine never touches the document. It emits [`DomOp`]s in the order
//! they must be applied and declares the [`ListenerSpec`]s the host has to
//! wire. Both serialize to JSON for record/replay.

use serde::Serialize;

use crate::particles::ParticleStyle;
use crate::theme::{CircleReveal, Theme};

/// Element an op applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// `document.documentElement`.
    Root,
    /// `document.body`.
    Body,
    /// `getElementById`.
    Id { id: &'static str },
    /// The `index`th element with class `class`.
    Class { class: &'static str, index: usize },
    /// Every element with class `class`.
    AllOfClass { class: &'static str },
    /// First match of an arbitrary selector.
    Selector { selector: &'static str },
}

impl Target {
    #[must_use]
    pub const fn id(id: &'static str) -> Self {
        Self::Id { id }
    }

    #[must_use]
    pub const fn class(class: &'static str, index: usize) -> Self {
        Self::Class { class, index }
    }
}

/// One DOM mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomOp {
    SetText {
        target: Target,
        text: String,
    },
    SetHtml {
        target: Target,
        html: String,
    },
    AddClass {
        target: Target,
        class: &'static str,
    },
    RemoveClass {
        target: Target,
        class: &'static str,
    },
    ToggleClass {
        target: Target,
        class: &'static str,
        on: bool,
    },
    /// Replace the full `className`.
    SetClassName {
        target: Target,
        value: &'static str,
    },
    SetStyle {
        target: Target,
        property: &'static str,
        value: String,
    },
    SetAttribute {
        target: Target,
        name: &'static str,
        value: String,
    },
    RemoveAttribute {
        target: Target,
        name: &'static str,
    },
    SetTitle {
        title: String,
    },
    /// Append a particle to `#particles`.
    SpawnParticle {
        id: u64,
        style: ParticleStyle,
    },
    RemoveParticle {
        id: u64,
    },
    /// Swap the theme attribute with no animation.
    ApplyTheme {
        theme: Theme,
    },
    /// Swap the theme inside a view transition, revealing it with an
    /// expanding circle.
    RevealTheme {
        theme: Theme,
        reveal: CircleReveal,
    },
    /// Smooth-scroll the window to a document offset.
    ScrollTo {
        top: f64,
    },
    /// Lock or release body scrolling (`overflow: hidden`).
    LockScroll {
        locked: bool,
    },
}

/// What a listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListenTarget {
    Window,
    Document,
    Id { id: &'static str },
    /// Every element with this class.
    Class { class: &'static str },
}

/// Which event to listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenKind {
    PointerMove,
    KeyDown,
    Click,
    Scroll,
    Resize,
    Load,
    /// Observe with an `IntersectionObserver`, reporting each entry once.
    Intersection,
}

/// A listener the host must register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListenerSpec {
    pub target: ListenTarget,
    pub kind: ListenKind,
}

impl ListenerSpec {
    #[must_use]
    pub const fn new(target: ListenTarget, kind: ListenKind) -> Self {
        Self { target, kind }
    }
}
