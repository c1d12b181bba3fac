//! Rendering for radar overlays.
//!
//! - Breakpoint color ramps and JSON style loading
//! - Grid-to-bitmap compositing
//! - Placeholder bitmap for undecodable payloads
//! - PNG encoding

pub mod composite;
pub mod placeholder;
pub mod png;
pub mod ramp;
pub mod style;

pub use composite::composite;
pub use placeholder::{render_placeholder, PlaceholderError, PlaceholderInfo};
pub use png::{encode_bitmap, PngError};
pub use ramp::{colorize, ColorRamp, ColorStop, RampError, Rgb8, OVERLAY_ALPHA};
pub use style::{StyleConfig, StyleError};
