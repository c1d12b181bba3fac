//! Radar overlay service.
//!
//! Periodically fetches a radar raster, colorizes it into an RGBA overlay
//! anchored to fixed geographic bounds, and publishes it over HTTP.

pub mod config;
pub mod cycle;
pub mod fetch;
pub mod listing;
pub mod metrics;
pub mod overlay;
pub mod scheduler;
pub mod scratch;
pub mod server;

pub use config::RegionConfig;
pub use cycle::{AcquisitionCycle, CycleError, CycleResult, CycleSettings};
pub use fetch::{FetchError, HttpFetcher, SourceFetcher};
pub use listing::candidate_links;
pub use metrics::CycleStats;
pub use overlay::{Applied, LayerStack, MapSurface, OverlayManager};
pub use scheduler::Scheduler;
pub use scratch::ScratchFile;
pub use server::{create_router, ServerState};
