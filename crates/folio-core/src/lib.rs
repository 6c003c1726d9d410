#![forbid(unsafe_code)]

//! Core: deterministic, host-driven visual effects for the Folio site.
//!
//! Every controller here is plain state plus math. The host (the browser
//! frontend in `folio-web`, or a test) feeds [`input::InputEvent`]s, advances
//! time, and applies the [`ops::DomOp`]s the [`engine::Engine`] emits.

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod navigation;
pub mod ops;
pub mod page;
pub mod particles;
pub mod reveal;
pub mod schedule;
pub mod theme;
pub mod tilt;
pub mod typing;

pub use config::EffectsConfig;
pub use engine::{Engine, EngineState, StepResult};
pub use error::{EffectsError, StorageError};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
