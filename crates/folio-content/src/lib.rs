#![forbid(unsafe_code)]

//! Content for the Folio site: the package and project catalogs rendered to
//! card markup, and the Arabic/English language switch.
//!
//! Both produce [`folio_core::ops::DomOp`]s, so the web host applies them the
//! same way it applies engine output.

pub mod catalog;
pub mod error;
pub mod html;
pub mod i18n;

pub use catalog::{Catalog, Package, Project};
pub use error::ContentError;
pub use i18n::{Lang, LanguageController};
