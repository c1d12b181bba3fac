//! Configuration loading for radar regions.
//!
//! Loads region configurations from YAML files in config/regions/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use radar_common::GeoBounds;
use renderer::{ColorRamp, StyleConfig};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Root configuration loaded from a region YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    pub region: RegionInfo,
    pub source: SourceConfig,
    /// `[[south, west], [north, east]]`
    pub bounds: GeoBounds,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub style: StyleRef,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Region identification.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionInfo {
    pub id: String,
    /// Product title, shown on the placeholder.
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Where the raster comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    /// Payload is gzip-wrapped.
    #[serde(default = "default_gzip")]
    pub gzip: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Append a `ts` query parameter to defeat intermediate caches.
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
}

fn default_gzip() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_cache_bust() -> bool {
    true
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_refresh_secs() -> u64 {
    120
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn refresh(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

/// Which ramp to colorize with. No file means the built-in reflectivity scale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleRef {
    /// Style file, relative to the config directory.
    pub file: Option<PathBuf>,
    #[serde(default = "default_style_name")]
    pub name: String,
}

fn default_style_name() -> String {
    "reflectivity".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    /// Drop published results older than the overlay on display.
    #[serde(default = "default_reject_out_of_order")]
    pub reject_out_of_order: bool,
    /// Display opacity hint passed to the UI.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_reject_out_of_order() -> bool {
    true
}

fn default_opacity() -> f64 {
    0.8
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            reject_out_of_order: default_reject_out_of_order(),
            opacity: default_opacity(),
        }
    }
}

impl RegionConfig {
    /// Load a region configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: RegionConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(region = %config.region.id, path = %path.display(), "Loaded region config");
        Ok(config)
    }

    /// Resolve the color ramp, reading the style file when one is named.
    pub fn ramp(&self, config_dir: &Path) -> Result<ColorRamp> {
        let Some(file) = &self.style.file else {
            return Ok(ColorRamp::reflectivity());
        };

        let path = config_dir.join(file);
        let styles = StyleConfig::from_file(&path)
            .with_context(|| format!("Failed to load style file: {}", path.display()))?;
        let ramp = styles
            .ramp(&self.style.name)
            .with_context(|| format!("Invalid style in {}", path.display()))?;

        info!(style = %self.style.name, stops = ramp.len(), "Loaded color ramp");
        Ok(ramp)
    }
}

/// Load one region by id from `config_dir/regions/<id>.yaml`.
pub fn load_region(config_dir: &Path, id: &str) -> Result<RegionConfig> {
    let regions_dir = config_dir.join("regions");
    for ext in ["yaml", "yml"] {
        let path = regions_dir.join(format!("{}.{}", id, ext));
        if path.exists() {
            return RegionConfig::load(&path);
        }
    }

    // Fall back to scanning in case the file name differs from the id
    let config = load_region_configs(config_dir)?
        .into_iter()
        .find(|c| c.region.id == id)
        .with_context(|| format!("No region '{}' under {}", id, regions_dir.display()))?;
    Ok(config)
}

/// Load all enabled region configurations from a directory.
pub fn load_region_configs(config_dir: &Path) -> Result<Vec<RegionConfig>> {
    let regions_dir = config_dir.join("regions");

    if !regions_dir.exists() {
        warn!(path = %regions_dir.display(), "Regions config directory not found");
        return Ok(Vec::new());
    }

    let mut configs = Vec::new();

    for entry in std::fs::read_dir(&regions_dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
            match RegionConfig::load(&path) {
                Ok(config) if config.region.enabled => configs.push(config),
                Ok(config) => debug!(region = %config.region.id, "Skipping disabled region"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to load region config"),
            }
        }
    }

    configs.sort_by(|a, b| a.region.id.cmp(&b.region.id));
    info!(count = configs.len(), "Loaded region configurations");
    Ok(configs)
}
