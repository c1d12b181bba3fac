//! Error types for the radar overlay API surface.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum RadarError {
    // === Request Errors ===
    #[error("Missing required query param: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Upstream Errors ===
    #[error("Failed to fetch {url}: {message}")]
    Upstream { url: String, message: String },

    #[error("No files found in directory")]
    NoFilesFound,

    // === Data Errors ===
    #[error("Failed to decompress payload: {0}")]
    Decompression(String),

    #[error("Failed to decode raster: {0}")]
    Decode(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    // === Availability ===
    #[error("No radar overlay available yet")]
    NotReady,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RadarError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            RadarError::MissingParameter(_) | RadarError::InvalidParameter { .. } => 400,

            RadarError::NoFilesFound => 404,

            RadarError::Decode(_) => 422,

            RadarError::Upstream { .. } => 502,

            RadarError::NotReady => 503,

            RadarError::Decompression(_) | RadarError::Render(_) | RadarError::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for RadarError {
    fn from(err: std::io::Error) -> Self {
        RadarError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for RadarError {
    fn from(err: serde_json::Error) -> Self {
        RadarError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RadarError::MissingParameter("base".into()).http_status_code(), 400);
        assert_eq!(RadarError::NoFilesFound.http_status_code(), 404);
        assert_eq!(RadarError::NotReady.http_status_code(), 503);
        assert_eq!(
            RadarError::Upstream {
                url: "https://example.com".into(),
                message: "503".into()
            }
            .http_status_code(),
            502
        );
    }
}
