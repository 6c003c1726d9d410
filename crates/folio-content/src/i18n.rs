#![forbid(unsafe_code)]

//! Arabic/English language switch for the policy pages.
//!
//! Applying a language rewrites the document attributes and header strings
//! at once, then crossfades the two content panels: the outgoing panel fades
//! out, and after [`CROSSFADE`] the panels swap display and the incoming one
//! fades in.

use std::fmt;
use std::time::Duration;

use folio_core::ops::{DomOp, ListenKind, ListenTarget, ListenerSpec, Target};
use folio_core::page::PageSnapshot;
use serde::{Deserialize, Serialize};

/// Matches the CSS opacity transition on the content panels.
pub const CROSSFADE: Duration = Duration::from_millis(250);

/// Element hooks for the language switch.
pub mod hooks {
    pub const LANG_TOGGLE: &str = "lang-toggle";
    pub const CONTENT_AR: &str = "content-ar";
    pub const CONTENT_EN: &str = "content-en";

    pub const LANG_TEXT: &str = "#lang-toggle .lang-text";
    pub const BACK_TEXT: &str = "[data-i18n=\"back\"]";
    pub const BACK_ICON: &str = ".back-icon";
    pub const POLICY_TITLE: &str = ".policy-title";
    pub const POLICY_META: &str = ".policy-meta";

    /// Looked up with `getElementById`.
    pub const IDS: &[&str] = &[LANG_TOGGLE, CONTENT_AR, CONTENT_EN];
    /// Looked up with `querySelector`.
    pub const SELECTORS: &[&str] = &[LANG_TEXT, BACK_TEXT, BACK_ICON, POLICY_TITLE, POLICY_META];
}

/// Strings that change with the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translations {
    pub page_title: &'static str,
    pub policy_title: &'static str,
    /// Trusted markup (contains an icon).
    pub policy_meta_html: &'static str,
    pub back: &'static str,
    /// Label of the toggle, naming the *other* language.
    pub toggle_label: &'static str,
}

const AR: Translations = Translations {
    page_title: "سياسة الخصوصية | بكاسة قبطي",
    policy_title: "سياسة الخصوصية",
    policy_meta_html: "<i class=\"far fa-calendar-alt\"></i> آخر تحديث: 11 فبراير 2026",
    back: "العودة للمعرض",
    toggle_label: "EN",
};

const EN: Translations = Translations {
    page_title: "Privacy Policy | Bakasa Coptic",
    policy_title: "Privacy Policy",
    policy_meta_html: "<i class=\"far fa-calendar-alt\"></i> Last Updated: February 11, 2026",
    back: "Back to Portfolio",
    toggle_label: "عربي",
};

/// Page language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ar,
    En,
}

impl Lang {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ar" => Some(Self::Ar),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ar => Self::En,
            Self::En => Self::Ar,
        }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    #[must_use]
    pub const fn dir(self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }

    /// Back arrow points toward the start edge.
    #[must_use]
    pub const fn back_icon_class(self) -> &'static str {
        match self {
            Self::Ar => "fas fa-arrow-right back-icon",
            Self::En => "fas fa-arrow-left back-icon",
        }
    }

    #[must_use]
    pub const fn translations(self) -> &'static Translations {
        match self {
            Self::Ar => &AR,
            Self::En => &EN,
        }
    }

    const fn content_panel(self) -> &'static str {
        match self {
            Self::Ar => hooks::CONTENT_AR,
            Self::En => hooks::CONTENT_EN,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSwap {
    due: Duration,
    outgoing: &'static str,
    incoming: &'static str,
}

/// Owns the current language and the panel crossfade.
#[derive(Debug)]
pub struct LanguageController {
    lang: Lang,
    present: Vec<&'static str>,
    swap: Option<PendingSwap>,
}

impl LanguageController {
    /// Apply the default language at time `now`.
    pub fn init(page: &PageSnapshot, now: Duration, ops: &mut Vec<DomOp>) -> Self {
        let present = hooks::IDS
            .iter()
            .chain(hooks::SELECTORS)
            .copied()
            .filter(|h| page.has(h))
            .collect();
        let mut ctl = Self {
            lang: Lang::default(),
            present,
            swap: None,
        };
        ctl.apply(now, ops);
        if ctl.has(hooks::CONTENT_AR) {
            ops.push(DomOp::AddClass {
                target: Target::id(hooks::CONTENT_AR),
                class: "fade-in",
            });
        }
        folio_core::debug!(lang = %ctl.lang, "language initialized");
        ctl
    }

    fn has(&self, hook: &str) -> bool {
        self.present.iter().any(|p| *p == hook)
    }

    /// Listener for the toggle button, if the page has one.
    #[must_use]
    pub fn listeners(&self) -> Vec<ListenerSpec> {
        if self.has(hooks::LANG_TOGGLE) {
            vec![ListenerSpec::new(
                ListenTarget::Id {
                    id: hooks::LANG_TOGGLE,
                },
                ListenKind::Click,
            )]
        } else {
            Vec::new()
        }
    }

    /// Switch to the other language. Returns the new language.
    pub fn toggle(&mut self, now: Duration, ops: &mut Vec<DomOp>) -> Lang {
        self.lang = self.lang.toggled();
        self.apply(now, ops);
        self.lang
    }

    fn apply(&mut self, now: Duration, ops: &mut Vec<DomOp>) {
        let lang = self.lang;
        let t = lang.translations();

        ops.push(DomOp::SetAttribute {
            target: Target::Root,
            name: "lang",
            value: lang.as_str().to_owned(),
        });
        ops.push(DomOp::SetAttribute {
            target: Target::Body,
            name: "dir",
            value: lang.dir().to_owned(),
        });
        ops.push(DomOp::SetTitle {
            title: t.page_title.to_owned(),
        });

        let texts = [
            (hooks::LANG_TEXT, t.toggle_label),
            (hooks::BACK_TEXT, t.back),
            (hooks::POLICY_TITLE, t.policy_title),
        ];
        for (selector, text) in texts {
            if self.has(selector) {
                ops.push(DomOp::SetText {
                    target: Target::Selector { selector },
                    text: text.to_owned(),
                });
            }
        }
        if self.has(hooks::BACK_ICON) {
            ops.push(DomOp::SetClassName {
                target: Target::Selector {
                    selector: hooks::BACK_ICON,
                },
                value: lang.back_icon_class(),
            });
        }
        if self.has(hooks::POLICY_META) {
            ops.push(DomOp::SetHtml {
                target: Target::Selector {
                    selector: hooks::POLICY_META,
                },
                html: t.policy_meta_html.to_owned(),
            });
        }

        self.crossfade(lang.toggled().content_panel(), lang.content_panel(), now, ops);
    }

    fn crossfade(
        &mut self,
        outgoing: &'static str,
        incoming: &'static str,
        now: Duration,
        ops: &mut Vec<DomOp>,
    ) {
        if !(self.has(outgoing) && self.has(incoming)) {
            return;
        }
        ops.push(DomOp::AddClass {
            target: Target::id(outgoing),
            class: "fade-out",
        });
        ops.push(DomOp::RemoveClass {
            target: Target::id(outgoing),
            class: "fade-in",
        });
        // A newer crossfade replaces one still in flight.
        self.swap = Some(PendingSwap {
            due: now + CROSSFADE,
            outgoing,
            incoming,
        });
    }

    /// Complete a crossfade whose fade-out has elapsed.
    pub fn poll(&mut self, now: Duration, ops: &mut Vec<DomOp>) {
        let Some(swap) = self.swap else {
            return;
        };
        if swap.due > now {
            return;
        }
        self.swap = None;
        ops.push(DomOp::SetStyle {
            target: Target::id(swap.outgoing),
            property: "display",
            value: "none".into(),
        });
        ops.push(DomOp::RemoveClass {
            target: Target::id(swap.outgoing),
            class: "fade-out",
        });
        ops.push(DomOp::SetStyle {
            target: Target::id(swap.incoming),
            property: "display",
            value: "block".into(),
        });
        ops.push(DomOp::AddClass {
            target: Target::id(swap.incoming),
            class: "fade-in",
        });
    }

    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Whether a crossfade is waiting to swap panels.
    #[must_use]
    pub fn is_swapping(&self) -> bool {
        self.swap.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy_page() -> PageSnapshot {
        let mut page = PageSnapshot::new();
        for &hook in hooks::IDS.iter().chain(hooks::SELECTORS) {
            page.set_hook(hook, 1);
        }
        page
    }

    #[test]
    fn defaults_to_arabic_rtl() {
        let mut ops = Vec::new();
        let ctl = LanguageController::init(&policy_page(), Duration::ZERO, &mut ops);
        assert_eq!(ctl.lang(), Lang::Ar);
        assert!(ops.contains(&DomOp::SetAttribute {
            target: Target::Body,
            name: "dir",
            value: "rtl".into()
        }));
        assert!(ops.contains(&DomOp::SetText {
            target: Target::Selector {
                selector: hooks::LANG_TEXT
            },
            text: "EN".into()
        }));
        assert!(ops.contains(&DomOp::AddClass {
            target: Target::id(hooks::CONTENT_AR),
            class: "fade-in"
        }));
    }

    #[test]
    fn toggle_switches_to_english() {
        let mut ops = Vec::new();
        let mut ctl = LanguageController::init(&policy_page(), Duration::ZERO, &mut ops);
        ops.clear();
        assert_eq!(ctl.toggle(Duration::from_secs(1), &mut ops), Lang::En);
        assert_eq!(
            &ops[..3],
            &[
                DomOp::SetAttribute {
                    target: Target::Root,
                    name: "lang",
                    value: "en".into()
                },
                DomOp::SetAttribute {
                    target: Target::Body,
                    name: "dir",
                    value: "ltr".into()
                },
                DomOp::SetTitle {
                    title: "Privacy Policy | Bakasa Coptic".into()
                },
            ]
        );
        assert!(ops.contains(&DomOp::SetClassName {
            target: Target::Selector {
                selector: hooks::BACK_ICON
            },
            value: "fas fa-arrow-left back-icon"
        }));
        assert!(ops.contains(&DomOp::AddClass {
            target: Target::id(hooks::CONTENT_AR),
            class: "fade-out"
        }));
    }

    #[test]
    fn crossfade_swaps_after_delay() {
        let mut ops = Vec::new();
        let mut ctl = LanguageController::init(&policy_page(), Duration::ZERO, &mut ops);
        ctl.poll(CROSSFADE, &mut ops);
        ops.clear();

        let t0 = Duration::from_secs(2);
        ctl.toggle(t0, &mut ops);
        ops.clear();
        ctl.poll(t0 + Duration::from_millis(249), &mut ops);
        assert!(ops.is_empty());
        assert!(ctl.is_swapping());

        ctl.poll(t0 + CROSSFADE, &mut ops);
        assert_eq!(
            ops,
            vec![
                DomOp::SetStyle {
                    target: Target::id(hooks::CONTENT_AR),
                    property: "display",
                    value: "none".into()
                },
                DomOp::RemoveClass {
                    target: Target::id(hooks::CONTENT_AR),
                    class: "fade-out"
                },
                DomOp::SetStyle {
                    target: Target::id(hooks::CONTENT_EN),
                    property: "display",
                    value: "block".into()
                },
                DomOp::AddClass {
                    target: Target::id(hooks::CONTENT_EN),
                    class: "fade-in"
                },
            ]
        );
        assert!(!ctl.is_swapping());
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut ops = Vec::new();
        let mut ctl = LanguageController::init(&PageSnapshot::new(), Duration::ZERO, &mut ops);
        // Document attributes and title always apply.
        assert_eq!(ops.len(), 3);
        assert!(ctl.listeners().is_empty());
        ops.clear();
        ctl.toggle(Duration::ZERO, &mut ops);
        assert_eq!(ops.len(), 3);
        assert!(!ctl.is_swapping());
    }

    #[test]
    fn lang_parse_and_display() {
        assert_eq!(Lang::parse("en"), Some(Lang::En));
        assert_eq!(Lang::parse("fr"), None);
        assert_eq!(Lang::En.to_string(), "en");
        assert_eq!(Lang::Ar.toggled(), Lang::En);
    }
}
