//! CLI output formatting
//!
//! Provides human-readable terminal display for graph generation runs.

pub mod display;

pub use display::render_directive_listing;
pub use display::GraphDisplay;
