//! End-to-end engine scenarios driven the way the browser host drives them.

use std::time::Duration;

use folio_core::input::{InputEvent, Key};
use folio_core::ops::{DomOp, ListenKind, ListenTarget, ListenerSpec, Target};
use folio_core::page::{PageCaps, PageSnapshot, SectionBox, Viewport, hooks};
use folio_core::reveal::REVEALED_CLASS;
use folio_core::theme::{MemoryStore, PreferenceStore, THEME_KEY, Theme};
use folio_core::{EffectsConfig, Engine, EngineState};
use pretty_assertions::assert_eq;

const FRAME: Duration = Duration::from_millis(16);

fn portfolio_page() -> PageSnapshot {
    let mut page = PageSnapshot::new()
        .with_viewport(Viewport::new(1440.0, 900.0))
        .with_hook(hooks::TYPED_TEXT, 1)
        .with_hook(hooks::PARTICLES, 1)
        .with_hook(hooks::HERO_TILT, 1)
        .with_hook(hooks::THEME_TOGGLE, 1)
        .with_hook(hooks::LOADER, 1)
        .with_hook(hooks::NAVBAR, 1)
        .with_hook(hooks::HAMBURGER, 1)
        .with_hook(hooks::NAV_LINKS, 1)
        .with_hook(hooks::NAV_LINK, 3)
        .with_hook(hooks::BACK_TO_TOP, 1)
        .with_hook(hooks::SKILLS, 1)
        .with_hook(hooks::SKILL_CATEGORY, 2)
        .with_hook(hooks::SKILL_PROGRESS, 3)
        .with_hook(hooks::STAT_NUMBER, 2)
        .with_caps(PageCaps::VIEW_TRANSITIONS);
    page.sections = vec![
        SectionBox {
            id: "home".into(),
            top: 0.0,
            height: 900.0,
        },
        SectionBox {
            id: "skills".into(),
            top: 900.0,
            height: 1200.0,
        },
        SectionBox {
            id: "contact".into(),
            top: 2100.0,
            height: 800.0,
        },
    ];
    page.nav_links = vec!["#home".into(), "#skills".into(), "#contact".into()];
    page.skill_progress = vec![95, 80, 60];
    page.counter_targets = vec![12, 500];
    page.navbar_height = 72.0;
    page
}

fn start(page: PageSnapshot, store: MemoryStore) -> Engine {
    let mut engine = Engine::new(EffectsConfig::default()).unwrap().with_seed(42);
    engine.start(page, Box::new(store));
    engine
}

fn frames(engine: &mut Engine, n: usize) -> Vec<DomOp> {
    let mut ops = Vec::new();
    for _ in 0..n {
        engine.advance_time(FRAME);
        engine.step();
        ops.extend(engine.take_ops());
    }
    ops
}

fn stored_theme(engine: &Engine) -> Option<String> {
    engine
        .theme_controller()
        .and_then(|t| t.store().load(THEME_KEY).ok().flatten())
}

#[test]
fn stored_preference_wins_over_platform() {
    let page = portfolio_page().with_caps(PageCaps::PREFERS_LIGHT);
    let mut engine = start(page, MemoryStore::new().with_entry(THEME_KEY, "dark"));
    assert_eq!(engine.theme(), Some(Theme::Dark));
    assert_eq!(engine.take_ops()[0], DomOp::ApplyTheme { theme: Theme::Dark });
}

#[test]
fn invalid_stored_value_falls_back_to_platform() {
    let page = portfolio_page().with_caps(PageCaps::PREFERS_LIGHT);
    let engine = start(page, MemoryStore::new().with_entry(THEME_KEY, "sepia"));
    assert_eq!(engine.theme(), Some(Theme::Light));
}

#[test]
fn double_toggle_restores_stored_value() {
    let mut engine = start(portfolio_page(), MemoryStore::new().with_entry(THEME_KEY, "light"));
    frames(&mut engine, 1);

    engine.push_event(InputEvent::ThemeToggle { x: 1400.0, y: 40.0 });
    let ops = frames(&mut engine, 1);
    assert_eq!(stored_theme(&engine).as_deref(), Some("dark"));
    let reveal = ops.iter().find_map(|op| match op {
        DomOp::RevealTheme { theme, reveal } => Some((*theme, reveal.clone())),
        _ => None,
    });
    let (theme, reveal) = reveal.unwrap();
    assert_eq!(theme, Theme::Dark);
    assert_eq!(reveal.end_radius, 1400.0f64.hypot(860.0));

    engine.push_event(InputEvent::ThemeToggle { x: 0.0, y: 0.0 });
    frames(&mut engine, 1);
    assert_eq!(stored_theme(&engine).as_deref(), Some("light"));
    assert_eq!(engine.theme(), Some(Theme::Light));
}

#[test]
fn read_only_store_still_switches_theme() {
    let mut engine = start(portfolio_page(), MemoryStore::read_only());
    engine.push_event(InputEvent::ThemeToggle { x: 0.0, y: 0.0 });
    frames(&mut engine, 1);
    assert_eq!(engine.theme(), Some(Theme::Light));
    assert_eq!(stored_theme(&engine), None);
}

#[test]
fn reduced_motion_swaps_theme_instantly() {
    let page = portfolio_page().with_caps(PageCaps::VIEW_TRANSITIONS | PageCaps::REDUCED_MOTION);
    let mut engine = start(page, MemoryStore::new());
    engine.push_event(InputEvent::ThemeToggle { x: 5.0, y: 5.0 });
    let ops = frames(&mut engine, 1);
    assert!(ops.contains(&DomOp::ApplyTheme { theme: Theme::Light }));
    assert!(!ops.iter().any(|op| matches!(op, DomOp::RevealTheme { .. })));
}

#[test]
fn scroll_burst_yields_one_update() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    frames(&mut engine, 1);

    for y in [100.0, 400.0, 800.0, 1200.0] {
        engine.push_event(InputEvent::Scroll { y });
    }
    let ops = frames(&mut engine, 2);
    let navbar_updates: Vec<&DomOp> = ops
        .iter()
        .filter(|op| {
            matches!(op, DomOp::ToggleClass { target, .. } if *target == Target::id(hooks::NAVBAR))
        })
        .collect();
    assert_eq!(
        navbar_updates,
        vec![&DomOp::ToggleClass {
            target: Target::id(hooks::NAVBAR),
            class: "scrolled",
            on: true
        }]
    );
    assert!(ops.contains(&DomOp::ToggleClass {
        target: Target::class(hooks::NAV_LINK, 1),
        class: "active",
        on: true
    }));
    assert_eq!(engine.navigation().and_then(|n| n.active_link()), Some(1));
}

#[test]
fn relayout_with_scroll_tracks_shifted_sections() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    frames(&mut engine, 1);

    // Content above `skills` grew after start (images, fonts).
    let shifted = vec![
        SectionBox {
            id: "home".into(),
            top: 0.0,
            height: 1400.0,
        },
        SectionBox {
            id: "skills".into(),
            top: 1400.0,
            height: 1200.0,
        },
        SectionBox {
            id: "contact".into(),
            top: 2600.0,
            height: 800.0,
        },
    ];
    engine.push_event(InputEvent::Relayout {
        sections: shifted,
        navbar_height: 72.0,
    });
    engine.push_event(InputEvent::Scroll { y: 900.0 });
    let ops = frames(&mut engine, 2);

    assert_eq!(engine.navigation().and_then(|n| n.active_link()), Some(0));
    assert!(ops.contains(&DomOp::ToggleClass {
        target: Target::class(hooks::NAV_LINK, 0),
        class: "active",
        on: true
    }));
    assert_eq!(engine.page().sections[1].top, 1400.0);
}

#[test]
fn menu_closes_on_escape() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    engine.push_event(InputEvent::MenuToggle);
    frames(&mut engine, 1);
    assert!(engine.navigation().is_some_and(|n| n.is_menu_open()));

    engine.push_event(InputEvent::Key { key: Key::Escape });
    let ops = frames(&mut engine, 1);
    assert!(ops.contains(&DomOp::LockScroll { locked: false }));
    assert!(!engine.navigation().is_some_and(|n| n.is_menu_open()));
}

#[test]
fn anchor_click_scrolls_below_navbar() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    engine.push_event(InputEvent::AnchorClicked {
        target_top: Some(2100.0),
    });
    let ops = frames(&mut engine, 1);
    assert!(ops.contains(&DomOp::ScrollTo { top: 2028.0 }));
}

#[test]
fn skill_bars_fill_staggered() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    frames(&mut engine, 1);
    engine.push_event(InputEvent::Intersected {
        hook: hooks::SKILLS,
        index: 0,
    });

    let widths = |ops: &[DomOp]| -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DomOp::SetStyle {
                    property: "width",
                    value,
                    ..
                } => Some(value.clone()),
                _ => None,
            })
            .collect()
    };

    engine.step();
    assert_eq!(widths(&engine.take_ops()), vec!["95%"]);
    engine.advance_time(Duration::from_millis(100));
    engine.step();
    assert_eq!(widths(&engine.take_ops()), vec!["80%"]);
    engine.advance_time(Duration::from_millis(100));
    engine.step();
    assert_eq!(widths(&engine.take_ops()), vec!["60%"]);
}

#[test]
fn counters_land_on_target() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    engine.push_event(InputEvent::Intersected {
        hook: hooks::STAT_NUMBER,
        index: 1,
    });
    let ops = frames(&mut engine, 150);
    let shown: Vec<u32> = ops
        .iter()
        .filter_map(|op| match op {
            DomOp::SetText { target, text } if *target == Target::class(hooks::STAT_NUMBER, 1) => {
                text.parse().ok()
            }
            _ => None,
        })
        .collect();
    assert!(shown.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(shown.last(), Some(&500));
    assert_eq!(engine.reveal().and_then(|r| r.counter_shown(1)), Some(500));
}

#[test]
fn reveal_class_added_once_per_card() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    for _ in 0..3 {
        engine.push_event(InputEvent::Intersected {
            hook: hooks::SKILL_CATEGORY,
            index: 0,
        });
    }
    let ops = frames(&mut engine, 1);
    let added = ops
        .iter()
        .filter(|op| matches!(op, DomOp::AddClass { class, .. } if *class == REVEALED_CLASS))
        .count();
    assert_eq!(added, 1);
}

#[test]
fn tilt_keys_ignored_once_scrolled_past_hero() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    engine.push_event(InputEvent::Scroll { y: 1000.0 });
    engine.push_event(InputEvent::Key { key: Key::Up });
    frames(&mut engine, 1);
    let key = engine.tilt().map(|t| t.state().key.x);
    assert_eq!(key, Some(0.0));
}

#[test]
fn particles_follow_viewport_width() {
    // Before the first periodic spawn, so only the opening batch counts.
    let opening = |engine: &Engine| {
        engine
            .particles()
            .map(|p| p.spawned_total() + p.opening_remaining() as u64)
    };
    let narrow = portfolio_page().with_viewport(Viewport::new(600.0, 900.0));
    let mut engine = start(narrow, MemoryStore::new());
    frames(&mut engine, 120);
    assert_eq!(opening(&engine), Some(8));

    let mut engine = start(portfolio_page(), MemoryStore::new());
    frames(&mut engine, 120);
    assert_eq!(opening(&engine), Some(15));
}

#[test]
fn listeners_match_attached_controllers() {
    let engine = start(portfolio_page(), MemoryStore::new());
    let listeners = engine.listeners();
    for spec in [
        ListenerSpec::new(
            ListenTarget::Id {
                id: hooks::HAMBURGER,
            },
            ListenKind::Click,
        ),
        ListenerSpec::new(
            ListenTarget::Class {
                class: hooks::SKILL_CATEGORY,
            },
            ListenKind::Intersection,
        ),
        ListenerSpec::new(ListenTarget::Id { id: hooks::SKILLS }, ListenKind::Intersection),
    ] {
        assert!(listeners.contains(&spec), "missing {spec:?}");
    }
    let unique: std::collections::HashSet<_> = listeners.iter().collect();
    assert_eq!(unique.len(), listeners.len());
}

#[test]
fn stop_is_final() {
    let mut engine = start(portfolio_page(), MemoryStore::new());
    frames(&mut engine, 10);
    engine.stop();
    engine.stop();
    assert_eq!(engine.state(), EngineState::Stopped);
    assert!(frames(&mut engine, 200).is_empty());
}
