//! Text faces.
//!
//! Sheets are rendered with the first outline font that loads from the
//! configured candidates. When none is available the built-in 5x7 bitmap
//! face is used instead; text never fails to render.

use crate::glyphs::{glyph, GLYPH_H, GLYPH_W};
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub enum TextFace {
    Outline { font: FontVec, source: PathBuf },
    Builtin,
}

impl std::fmt::Debug for TextFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextFace::Outline { source, .. } => f
                .debug_struct("Outline")
                .field("source", source)
                .finish_non_exhaustive(),
            TextFace::Builtin => f.write_str("Builtin"),
        }
    }
}

impl TextFace {
    /// First candidate that reads and parses as a font, else the bitmap face.
    pub fn load(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            match Self::load_file(path) {
                Ok(face) => {
                    debug!("using font {}", path.display());
                    return face;
                }
                Err(reason) => debug!("skipping font {}: {reason}", path.display()),
            }
        }
        if !candidates.is_empty() {
            warn!("no usable font among {} candidates, using built-in face", candidates.len());
        }
        TextFace::Builtin
    }

    fn load_file(path: &Path) -> Result<Self, String> {
        let bytes = fs::read(path).map_err(|e| e.to_string())?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| e.to_string())?;
        Ok(TextFace::Outline {
            font,
            source: path.to_path_buf(),
        })
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, TextFace::Builtin)
    }

    /// Pixel extent of `text` at a nominal size of `size_px`.
    pub fn measure(&self, text: &str, size_px: u32) -> (u32, u32) {
        match self {
            TextFace::Outline { font, .. } => text_size(scale(size_px), font, text),
            TextFace::Builtin => {
                let cell = builtin_cell(size_px);
                let n = text.chars().count() as u32;
                if n == 0 {
                    return (0, 0);
                }
                (n * (GLYPH_W + 1) * cell - cell, GLYPH_H * cell)
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, size_px: u32, text: &str, color: Rgb<u8>) {
        match self {
            TextFace::Outline { font, .. } => {
                draw_text_mut(canvas, color, x, y, scale(size_px), font, text);
            }
            TextFace::Builtin => draw_builtin(canvas, x, y, builtin_cell(size_px), text, color),
        }
    }
}

fn scale(size_px: u32) -> PxScale {
    PxScale::from(size_px.max(1) as f32)
}

/// Side of one glyph module; capitals come out at roughly 0.7 em.
fn builtin_cell(size_px: u32) -> u32 {
    ((size_px + 5) / 10).max(1)
}

fn draw_builtin(canvas: &mut RgbImage, x: i32, y: i32, cell: u32, text: &str, color: Rgb<u8>) {
    let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let cell_i = i64::from(cell);
    for (i, c) in text.chars().enumerate() {
        let gx = i64::from(x) + i as i64 * i64::from(GLYPH_W + 1) * cell_i;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let px0 = gx + i64::from(col) * cell_i;
                let py0 = i64::from(y) + row as i64 * cell_i;
                for py in py0.max(0)..(py0 + cell_i).min(h) {
                    for px in px0.max(0)..(px0 + cell_i).min(w) {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}
