//! Logo assets.
//!
//! Logos are decoded once when the layout is composed and shared by both
//! variants. A missing or unreadable file degrades to a text placeholder in
//! the reserved footprint; it never aborts sheet generation.

use image::{imageops::FilterType, DynamicImage, Rgb, RgbImage};
use log::warn;
use std::path::Path;

/// What fills a logo footprint.
#[derive(Clone, Debug, PartialEq)]
pub enum LogoContent {
    /// Flattened onto white and fitted inside the footprint.
    Image(RgbImage),
    Placeholder { label: String, size_mm: f64 },
}

impl LogoContent {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, LogoContent::Placeholder { .. })
    }
}

/// Load `path` and fit it inside `max_w x max_h` pixels, falling back to a
/// placeholder carrying `label`.
pub fn load_logo(path: &Path, max_w: u32, max_h: u32, label: &str, size_mm: f64) -> LogoContent {
    match image::open(path) {
        Ok(img) => LogoContent::Image(fit_logo(img, max_w, max_h)),
        Err(err) => {
            warn!("logo {} unavailable ({err}), drawing placeholder {label:?}", path.display());
            LogoContent::Placeholder {
                label: label.to_string(),
                size_mm,
            }
        }
    }
}

/// Shrink (never enlarge) preserving aspect ratio, then drop alpha over white.
pub fn fit_logo(img: DynamicImage, max_w: u32, max_h: u32) -> RgbImage {
    let img = if img.width() > max_w || img.height() > max_h {
        img.resize(max_w.max(1), max_h.max(1), FilterType::Lanczos3)
    } else {
        img
    };
    let rgba = img.into_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        let over_white = |c: u8| -> u8 {
            let c = u32::from(c) * u32::from(a) + 255 * (255 - u32::from(a));
            ((c + 127) / 255) as u8
        };
        *dst = Rgb([over_white(r), over_white(g), over_white(b)]);
    }
    out
}
