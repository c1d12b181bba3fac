//! One acquisition cycle: fetch, spool, decompress, decode, colorize, encode.
//!
//! Decode failures never fail the cycle. They produce a placeholder bitmap
//! and a published overlay flagged as `fallback`.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use radar_common::{Bitmap, CompressedPayload, GeoBounds, OverlayState};
use raster_decoder::{decode, decompress_gzip, DecompressionError};
use renderer::{composite, encode_bitmap, render_placeholder, ColorRamp, PlaceholderInfo};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::fetch::{FetchError, SourceFetcher};
use crate::metrics::{record_cycle_duration, record_payload_bytes, Timer};
use crate::scratch::ScratchFile;

/// Why a cycle produced no overlay.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decompression(#[from] DecompressionError),

    #[error("Compositing failed: {0}")]
    Composite(String),

    #[error("Unexpected cycle failure: {0}")]
    Unknown(String),
}

impl CycleError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Fetch(_) => "fetch",
            CycleError::Decompression(_) => "decompression",
            CycleError::Composite(_) => "composite",
            CycleError::Unknown(_) => "unknown",
        }
    }
}

/// Outcome of one cycle, handed to the overlay manager.
#[derive(Debug)]
pub enum CycleResult {
    Published(OverlayState),
    Failed(CycleError),
    Cancelled,
}

impl CycleResult {
    pub fn outcome(&self) -> &'static str {
        match self {
            CycleResult::Published(state) if state.fallback => "fallback",
            CycleResult::Published(_) => "published",
            CycleResult::Failed(e) => e.kind(),
            CycleResult::Cancelled => "cancelled",
        }
    }
}

/// Fixed inputs for every cycle of one region.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub source_url: String,
    pub gzip: bool,
    pub bounds: GeoBounds,
    /// Product title, shown on the placeholder.
    pub title: String,
    pub scratch_dir: PathBuf,
}

struct Rendered {
    bitmap: Bitmap,
    png: Vec<u8>,
    fallback: bool,
}

#[derive(Clone)]
pub struct AcquisitionCycle {
    fetcher: Arc<dyn SourceFetcher>,
    ramp: Arc<ColorRamp>,
    settings: Arc<CycleSettings>,
}

impl AcquisitionCycle {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, ramp: ColorRamp, settings: CycleSettings) -> Self {
        Self {
            fetcher,
            ramp: Arc::new(ramp),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    /// Run one cycle to completion. Never panics; every failure is a `CycleResult`.
    #[instrument(skip(self, token), fields(url = %self.settings.source_url))]
    pub async fn run(&self, sequence: u64, token: &CancellationToken) -> CycleResult {
        let timer = Timer::start();

        let fetched = tokio::select! {
            _ = token.cancelled() => return CycleResult::Cancelled,
            res = self.fetcher.fetch(&self.settings.source_url) => res,
        };
        let data: Bytes = match fetched {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Fetch failed");
                return CycleResult::Failed(e.into());
            }
        };
        record_payload_bytes(data.len());
        let payload = CompressedPayload::new(data, self.settings.gzip);

        let settings = self.settings.clone();
        let ramp = self.ramp.clone();
        let joined = tokio::task::spawn_blocking(move || process(payload, &settings, &ramp)).await;

        let rendered = match joined {
            Ok(Ok(rendered)) => rendered,
            Ok(Err(e)) => {
                warn!(kind = e.kind(), error = %e, "Cycle failed");
                return CycleResult::Failed(e);
            }
            Err(e) => {
                warn!(error = %e, "Cycle worker panicked");
                return CycleResult::Failed(CycleError::Unknown(e.to_string()));
            }
        };

        if token.is_cancelled() {
            debug!("Cancelled before publishing");
            return CycleResult::Cancelled;
        }

        let elapsed = timer.elapsed();
        record_cycle_duration(elapsed);
        info!(
            width = rendered.bitmap.width(),
            height = rendered.bitmap.height(),
            png_bytes = rendered.png.len(),
            fallback = rendered.fallback,
            elapsed_ms = elapsed.as_millis() as u64,
            "Cycle complete"
        );

        CycleResult::Published(OverlayState {
            sequence,
            bitmap: Arc::new(rendered.bitmap),
            image_png: Bytes::from(rendered.png),
            bounds: self.settings.bounds,
            fetched_at: Utc::now(),
            fallback: rendered.fallback,
        })
    }
}

/// CPU-bound half of the cycle, run on the blocking pool.
fn process(
    payload: CompressedPayload,
    settings: &CycleSettings,
    ramp: &ColorRamp,
) -> Result<Rendered, CycleError> {
    let mut scratch = ScratchFile::create_in(&settings.scratch_dir, &payload.data)
        .map_err(|e| CycleError::Unknown(format!("scratch file: {}", e)))?;
    let spooled = scratch
        .read_all()
        .map_err(|e| CycleError::Unknown(format!("scratch file: {}", e)))?;

    let raster = if payload.gzip {
        decompress_gzip(&spooled)?
    } else {
        Bytes::from(spooled)
    };
    debug!(compressed = payload.len(), raw = raster.len(), "Payload ready");

    let (bitmap, fallback) = match decode(&raster) {
        Ok(grid) => {
            debug!(
                width = grid.width(),
                height = grid.height(),
                valid = grid.valid_count(),
                "Decoded raster"
            );
            (composite(&grid, ramp), false)
        }
        Err(e) => {
            warn!(error = %e, "Decode failed, rendering placeholder");
            let info = PlaceholderInfo::new(settings.title.clone(), raster.len())
                .with_status(e.to_string());
            let bitmap = render_placeholder(&info).map_err(|e| CycleError::Composite(e.to_string()))?;
            (bitmap, true)
        }
    };

    let png = encode_bitmap(&bitmap).map_err(|e| CycleError::Composite(e.to_string()))?;
    Ok(Rendered {
        bitmap,
        png,
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_kinds() {
        let fetch = CycleError::Fetch(FetchError::Status {
            url: "https://example.com".into(),
            status: 503,
        });
        assert_eq!(fetch.kind(), "fetch");

        let decompress = CycleError::from(DecompressionError(io::Error::new(
            io::ErrorKind::InvalidData,
            "bad header",
        )));
        assert_eq!(decompress.kind(), "decompression");
        assert_eq!(CycleError::Composite("x".into()).kind(), "composite");
        assert_eq!(CycleError::Unknown("x".into()).kind(), "unknown");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(CycleResult::Cancelled.outcome(), "cancelled");
        assert_eq!(
            CycleResult::Failed(CycleError::Unknown("x".into())).outcome(),
            "unknown"
        );
    }
}
