#![forbid(unsafe_code)]

//! WASM frontend for the Folio site.
//!
//! The JS-facing surface is [`FolioSite`]: `new FolioSite(options?)`,
//! `start()`, `stop()`, `toggleTheme(x, y)`, `toggleLanguage()`, `theme()`,
//! `language()`. Everything it does between the DOM and the engine goes
//! through [`site::Site`], which is target-independent and tested natively.

pub mod site;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioSite;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioSite;

#[cfg(not(target_arch = "wasm32"))]
impl FolioSite {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
