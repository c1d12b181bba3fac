//! Informational bitmap shown when a payload cannot be decoded.
//!
//! The placeholder is drawn as SVG and rasterized with resvg so the text is
//! anti-aliased the same way as any other vector content. Text needs a
//! system font; without one the background still renders.

use std::sync::{Arc, OnceLock};

use radar_common::{Bitmap, RgbaPixel};
use thiserror::Error;
use tracing::{debug, warn};

pub const PLACEHOLDER_WIDTH: u32 = 1000;
pub const PLACEHOLDER_HEIGHT: u32 = 600;

const BACKGROUND: &str = "#0b1020";

#[derive(Debug, Error)]
pub enum PlaceholderError {
    #[error("Failed to parse placeholder SVG: {0}")]
    Svg(String),

    #[error("Failed to allocate {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("Invalid placeholder bitmap: {0}")]
    Bitmap(#[from] radar_common::BitmapError),
}

/// What the placeholder tells the viewer.
#[derive(Debug, Clone)]
pub struct PlaceholderInfo {
    /// Product title, e.g. "Alaska Radar - BREF 1HR MAX".
    pub title: String,
    /// Status line under the title.
    pub status: String,
    /// Size of the downloaded payload in bytes.
    pub payload_bytes: usize,
}

impl PlaceholderInfo {
    pub fn new(title: impl Into<String>, payload_bytes: usize) -> Self {
        Self {
            title: title.into(),
            status: "Data received; raster format not displayable".to_string(),
            payload_bytes,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Build the placeholder SVG document.
pub fn placeholder_svg(info: &PlaceholderInfo) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <rect width="100%" height="100%" fill="{bg}"/>
  <text x="50%" y="45%" text-anchor="middle" fill="white" font-family="sans-serif" font-size="48">{title}</text>
  <text x="50%" y="55%" text-anchor="middle" fill="white" font-family="sans-serif" font-size="24">{status}</text>
  <text x="50%" y="65%" text-anchor="middle" fill="white" font-family="sans-serif" font-size="18">File size: {bytes} bytes</text>
</svg>"#,
        w = PLACEHOLDER_WIDTH,
        h = PLACEHOLDER_HEIGHT,
        bg = BACKGROUND,
        title = escape_xml(&info.title),
        status = escape_xml(&info.status),
        bytes = info.payload_bytes,
    )
}

/// Rasterize the placeholder to a 1000x600 bitmap.
pub fn render_placeholder(info: &PlaceholderInfo) -> Result<Bitmap, PlaceholderError> {
    let svg = placeholder_svg(info);

    let mut opt = usvg::Options::default();
    opt.fontdb = system_fonts();

    let tree =
        usvg::Tree::from_str(&svg, &opt).map_err(|e| PlaceholderError::Svg(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT).ok_or(
        PlaceholderError::Pixmap {
            width: PLACEHOLDER_WIDTH,
            height: PLACEHOLDER_HEIGHT,
        },
    )?;

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha
    let pixels: Vec<RgbaPixel> = pixmap
        .pixels()
        .iter()
        .map(|p| {
            let c = p.demultiply();
            RgbaPixel::new(c.red(), c.green(), c.blue(), c.alpha())
        })
        .collect();

    debug!(bytes = info.payload_bytes, "Rendered placeholder bitmap");
    Ok(Bitmap::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, pixels)?)
}

fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            if db.is_empty() {
                warn!("No system fonts found; placeholder text will not render");
            }
            Arc::new(db)
        })
        .clone()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
