//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame clock)
//! - Input events
//! - Image loading and presentation
//! - Storage (LocalStorage on web)

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;
