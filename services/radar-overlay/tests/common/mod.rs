//! Shared helpers for radar-overlay integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use radar_common::{Bitmap, GeoBounds, OverlayState, RgbaPixel};
use radar_overlay::{AcquisitionCycle, CycleSettings, FetchError, SourceFetcher};
use renderer::ColorRamp;

pub const SOURCE_URL: &str = "https://mrms.example.com/2D/ALASKA/BREF_1HR_MAX/latest.grib2.gz";

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Body(Bytes),
    Status(u16),
}

/// In-memory fetcher keyed by URL, counting every call.
pub struct FakeFetcher {
    responses: Mutex<HashMap<String, FakeResponse>>,
    fallback: FakeResponse,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(fallback: FakeResponse) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn body(data: impl Into<Bytes>) -> Self {
        Self::new(FakeResponse::Body(data.into()))
    }

    pub fn status(status: u16) -> Self {
        Self::new(FakeResponse::Status(status))
    }

    pub fn with(self, url: &str, response: FakeResponse) -> Self {
        self.responses.lock().unwrap().insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());

        match response {
            FakeResponse::Body(data) => Ok(data),
            FakeResponse::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

pub fn settings(scratch_dir: &Path) -> CycleSettings {
    CycleSettings {
        source_url: SOURCE_URL.to_string(),
        gzip: true,
        bounds: GeoBounds::alaska(),
        title: "Alaska Radar - BREF 1HR MAX".to_string(),
        scratch_dir: scratch_dir.to_path_buf(),
    }
}

pub fn cycle_with(fetcher: Arc<FakeFetcher>, scratch_dir: &Path) -> AcquisitionCycle {
    AcquisitionCycle::new(fetcher, ColorRamp::reflectivity(), settings(scratch_dir))
}

pub fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// A 1x1 overlay with the given sequence.
pub fn overlay(sequence: u64) -> OverlayState {
    OverlayState {
        sequence,
        bitmap: Arc::new(Bitmap::filled(1, 1, RgbaPixel::TRANSPARENT).unwrap()),
        image_png: Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
        bounds: GeoBounds::alaska(),
        fetched_at: Utc::now(),
        fallback: false,
    }
}
