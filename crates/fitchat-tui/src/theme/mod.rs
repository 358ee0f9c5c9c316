//! Theme components for the chat widget.
//!
//! This module provides:
//! - [`Theme`] - Color palette (brand blue, plus a high contrast variant)
//! - [`IconSet`] - Launcher and header icons with Unicode/ASCII modes

mod colors;
mod icons;

pub use colors::Theme;
pub use icons::{IconMode, IconSet};
