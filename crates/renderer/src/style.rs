//! Style configuration for radar overlays.
//!
//! Styles are JSON files holding one or more named ramps:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "styles": {
//!     "reflectivity": {
//!       "name": "Reflectivity",
//!       "stops": [{ "value": 5, "color": "#04E9E7" }]
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::ramp::{ColorRamp, ColorStop, RampError, Rgb8};

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to read style file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid style JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Style '{0}' not found")]
    UnknownStyle(String),

    #[error("Style '{style}' has an invalid ramp: {source}")]
    Ramp {
        style: String,
        #[source]
        source: RampError,
    },
}

/// Style configuration loaded from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    pub version: String,
    pub styles: HashMap<String, StyleDefinition>,
}

/// A single style definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleDefinition {
    pub name: String,
    pub description: Option<String>,
    pub units: Option<String>,
    pub stops: Vec<StyleStop>,
}

/// Color stop as written in the file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleStop {
    pub value: f64,
    pub color: String,
    pub label: Option<String>,
}

impl StyleConfig {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, StyleError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load style configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Get a specific style definition
    pub fn get_style(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    /// Build the validated ramp for a named style.
    pub fn ramp(&self, name: &str) -> Result<ColorRamp, StyleError> {
        let style = self
            .get_style(name)
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))?;
        style.to_ramp().map_err(|source| StyleError::Ramp {
            style: name.to_string(),
            source,
        })
    }
}

impl StyleDefinition {
    pub fn to_ramp(&self) -> Result<ColorRamp, RampError> {
        let stops = self
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                let color = Rgb8::from_hex(&stop.color).ok_or_else(|| RampError::InvalidColor {
                    index,
                    color: stop.color.clone(),
                })?;
                Ok(ColorStop::new(stop.value, color))
            })
            .collect::<Result<Vec<_>, RampError>>()?;

        ColorRamp::new(stops)
    }
}
