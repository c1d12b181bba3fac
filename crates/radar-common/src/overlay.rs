//! The published overlay snapshot.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{Bitmap, GeoBounds};

/// One complete, geo-anchored overlay ready for display.
///
/// Produced by a successful acquisition cycle and owned by the overlay
/// manager once applied. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct OverlayState {
    /// Monotonic sequence assigned when the producing cycle started.
    pub sequence: u64,
    pub bitmap: Arc<Bitmap>,
    /// PNG encoding of `bitmap`.
    pub image_png: Bytes,
    pub bounds: GeoBounds,
    pub fetched_at: DateTime<Utc>,
    /// True when the bitmap is the placeholder rendered after a decode failure.
    pub fallback: bool,
}
