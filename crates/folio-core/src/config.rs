#![forbid(unsafe_code)]

//! Effect timing and tuning constants.
//!
//! Every field has a default matching the shipped site, so hosts only pass
//! the values they want to override:
//!
//! ```
//! use folio_core::EffectsConfig;
//!
//! let cfg = EffectsConfig::from_json(r#"{ "typing_interval_ms": 60 }"#).unwrap();
//! assert_eq!(cfg.typing_interval_ms, 60);
//! assert_eq!(cfg.deleting_interval_ms, 40);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EffectsError;

/// Tuning for all controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Headline phrases cycled by the typing animator.
    pub phrases: Vec<String>,
    /// Delay between typed characters.
    pub typing_interval_ms: u64,
    /// Delay between deleted characters.
    pub deleting_interval_ms: u64,
    /// Pause once a phrase is fully typed.
    pub full_pause_ms: u64,
    /// Pause once a phrase is fully deleted.
    pub empty_pause_ms: u64,

    /// Viewport width at or above which the wide particle batch is used.
    pub wide_viewport_px: f64,
    pub initial_particles_wide: usize,
    pub initial_particles_narrow: usize,
    /// Spacing of the opening particle batch.
    pub particle_stagger_ms: u64,
    /// Steady-state spawn interval.
    pub particle_interval_ms: u64,

    /// Maximum tilt in degrees, per axis.
    pub tilt_sensitivity_deg: f64,
    /// Degrees per directional key press.
    pub tilt_key_step_deg: f64,
    /// Fraction of the remaining distance covered per frame.
    pub tilt_smoothing: f64,

    /// Duration of the circular theme reveal.
    pub theme_transition_ms: u64,
    /// How long the toggle button keeps its `animate` class.
    pub theme_icon_animate_ms: u64,

    /// Delay between page load and loader dismissal.
    pub loader_hide_ms: u64,

    pub scroll_throttle_ms: u64,
    pub navbar_scrolled_px: f64,
    pub back_to_top_px: f64,
    /// Offset below the scroll position for active-section tracking.
    pub active_section_offset_px: f64,

    pub counter_duration_ms: u64,
    pub skill_bar_stagger_ms: u64,
    pub skill_category_stagger_ms: u64,
    pub project_card_stagger_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Flutter Developer",
                "Mobile App Developer",
                "UI/UX Enthusiast",
                "Open Source Contributor",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            typing_interval_ms: 80,
            deleting_interval_ms: 40,
            full_pause_ms: 2500,
            empty_pause_ms: 400,
            wide_viewport_px: 768.0,
            initial_particles_wide: 15,
            initial_particles_narrow: 8,
            particle_stagger_ms: 200,
            particle_interval_ms: 2000,
            tilt_sensitivity_deg: 20.0,
            tilt_key_step_deg: 5.0,
            tilt_smoothing: 0.1,
            theme_transition_ms: 500,
            theme_icon_animate_ms: 500,
            loader_hide_ms: 1500,
            scroll_throttle_ms: 10,
            navbar_scrolled_px: 50.0,
            back_to_top_px: 500.0,
            active_section_offset_px: 200.0,
            counter_duration_ms: 2000,
            skill_bar_stagger_ms: 100,
            skill_category_stagger_ms: 150,
            project_card_stagger_ms: 100,
        }
    }
}

impl EffectsConfig {
    /// Parse and validate a JSON override document.
    pub fn from_json(json: &str) -> Result<Self, EffectsError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would stall or break a controller.
    pub fn validate(&self) -> Result<(), EffectsError> {
        if self.phrases.is_empty() {
            return Err(EffectsError::EmptyPhrases);
        }
        let intervals = [
            ("typing_interval_ms", self.typing_interval_ms),
            ("deleting_interval_ms", self.deleting_interval_ms),
            ("particle_interval_ms", self.particle_interval_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, v)| *v == 0) {
            return Err(EffectsError::InvalidConfig(format!("{name} must be > 0")));
        }
        if !(self.tilt_sensitivity_deg > 0.0) {
            return Err(EffectsError::InvalidConfig(
                "tilt_sensitivity_deg must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tilt_smoothing) {
            return Err(EffectsError::InvalidConfig(
                "tilt_smoothing must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }
}
