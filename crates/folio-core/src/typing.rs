#![forbid(unsafe_code)]

//! Typed hero headline.
//!
//! [`PhraseCycle`] is a lazy, infinite, restartable sequence of display-text
//! snapshots: it types a phrase one grapheme at a time, pauses, deletes it,
//! pauses, and moves to the next phrase, wrapping after the last.
//!
//! | State               | Tick effect                       | Next delay     |
//! |---------------------|-----------------------------------|----------------|
//! | typing, not full    | `char_index += 1`                 | typing         |
//! | typing, now full    | flip to deleting                  | full pause     |
//! | deleting, not empty | `char_index -= 1`                 | deleting       |
//! | deleting, now empty | flip to typing, advance phrase    | empty pause    |
//!
//! Characters are grapheme clusters, so a combining accent or an emoji
//! sequence is typed and deleted as one unit.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::EffectsConfig;
use crate::error::EffectsError;
use crate::ops::{DomOp, Target};
use crate::page::{PageSnapshot, hooks};
use crate::schedule::CancellationToken;

/// Per-state tick delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTiming {
    pub typing: Duration,
    pub deleting: Duration,
    pub full_pause: Duration,
    pub empty_pause: Duration,
}

impl TypingTiming {
    #[must_use]
    pub fn from_config(cfg: &EffectsConfig) -> Self {
        Self {
            typing: EffectsConfig::ms(cfg.typing_interval_ms),
            deleting: EffectsConfig::ms(cfg.deleting_interval_ms),
            full_pause: EffectsConfig::ms(cfg.full_pause_ms),
            empty_pause: EffectsConfig::ms(cfg.empty_pause_ms),
        }
    }
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self::from_config(&EffectsConfig::default())
    }
}

/// One rendered snapshot and how long to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub text: String,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
struct Phrase {
    text: String,
    /// Byte offset after each grapheme; `bounds[0] == 0`.
    bounds: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let mut bounds = vec![0];
        bounds.extend(
            text.grapheme_indices(true)
                .map(|(start, g)| start + g.len()),
        );
        Self { text, bounds }
    }

    fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn prefix(&self, graphemes: usize) -> &str {
        &self.text[..self.bounds[graphemes.min(self.len())]]
    }
}

/// Typing/deleting state machine over a fixed phrase list.
#[derive(Debug, Clone)]
pub struct PhraseCycle {
    phrases: Vec<Phrase>,
    phrase_index: usize,
    char_index: usize,
    deleting: bool,
    timing: TypingTiming,
}

impl PhraseCycle {
    /// Build a cycle. Fails with [`EffectsError::EmptyPhrases`] on an empty list.
    pub fn new<I, S>(phrases: I, timing: TypingTiming) -> Result<Self, EffectsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|p| Phrase::new(p.into()))
            .collect();
        if phrases.is_empty() {
            return Err(EffectsError::EmptyPhrases);
        }
        Ok(Self {
            phrases,
            phrase_index: 0,
            char_index: 0,
            deleting: false,
            timing,
        })
    }

    /// Advance one tick and return the snapshot to display.
    pub fn tick(&mut self) -> TypingFrame {
        let len = self.phrases[self.phrase_index].len();

        let mut delay = if self.deleting {
            self.char_index = self.char_index.saturating_sub(1);
            self.timing.deleting
        } else {
            if self.char_index < len {
                self.char_index += 1;
            }
            self.timing.typing
        };

        let text = self.current_text().to_owned();

        if !self.deleting && self.char_index == len {
            self.deleting = true;
            delay = self.timing.full_pause;
        } else if self.deleting && self.char_index == 0 {
            self.deleting = false;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
            delay = self.timing.empty_pause;
        }

        TypingFrame { text, delay }
    }

    /// Restart from the first phrase with nothing typed.
    pub fn reset(&mut self) {
        self.phrase_index = 0;
        self.char_index = 0;
        self.deleting = false;
    }

    /// Text currently on display.
    #[must_use]
    pub fn current_text(&self) -> &str {
        self.phrases[self.phrase_index].prefix(self.char_index)
    }

    #[must_use]
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    #[must_use]
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    #[must_use]
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }
}

impl Iterator for PhraseCycle {
    type Item = TypingFrame;

    fn next(&mut self) -> Option<TypingFrame> {
        Some(self.tick())
    }
}

/// Drives a [`PhraseCycle`] into `#typed-text`.
#[derive(Debug)]
pub struct TypingController {
    cycle: PhraseCycle,
    token: CancellationToken,
}

impl TypingController {
    /// Attach to `#typed-text`.
    pub fn attach(page: &PageSnapshot, cfg: &EffectsConfig) -> Result<Self, EffectsError> {
        if !page.has(hooks::TYPED_TEXT) {
            return Err(EffectsError::MissingTarget {
                hook: hooks::TYPED_TEXT,
            });
        }
        let cycle = PhraseCycle::new(cfg.phrases.iter().cloned(), TypingTiming::from_config(cfg))?;
        Ok(Self {
            cycle,
            token: CancellationToken::new(),
        })
    }

    /// Run one tick, pushing the text update. Returns the delay until the next tick.
    pub fn step(&mut self, ops: &mut Vec<DomOp>) -> Duration {
        let frame = self.cycle.tick();
        ops.push(DomOp::SetText {
            target: Target::id(hooks::TYPED_TEXT),
            text: frame.text,
        });
        frame.delay
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[must_use]
    pub fn cycle(&self) -> &PhraseCycle {
        &self.cycle
    }

    pub fn stop(&self) {
        self.token.cancel();
    }
}
