//! Pattern encoding seam.
//!
//! The layout engine never knows how a tag or board is encoded; it asks a
//! [`PatternEncoder`] for a grayscale bitmap of a requested pixel size and
//! composites it. [`MarkerEncoder`] is the built-in implementation backed by
//! the dictionaries in `metre-aruco`.

use image::GrayImage;
use metre_aruco::{builtins, render_marker, Dictionary, MarkerRenderError};
use metre_charuco::{
    BoardRenderError, CharucoBoard, CharucoBoardError, CharucoBoardSpec, MarkerLayout,
};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("unknown dictionary {name:?} (available: {available:?})")]
    UnknownDictionary {
        name: String,
        available: &'static [&'static str],
    },
    #[error("cannot encode an empty {0}x{0} bitmap")]
    EmptyBitmap(u32),
    #[error(transparent)]
    Marker(#[from] MarkerRenderError),
    #[error(transparent)]
    Board(#[from] CharucoBoardError),
    #[error(transparent)]
    BoardRender(#[from] BoardRenderError),
}

/// Which machine-readable pattern a fiducial carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FiducialKind {
    Tag { id: u32 },
    Board { cols: u32, rows: u32 },
}

/// A fiducial with its physical footprint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiducialSpec {
    pub kind: FiducialKind,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl FiducialSpec {
    pub fn tag(id: u32, size_mm: f64) -> Self {
        Self {
            kind: FiducialKind::Tag { id },
            width_mm: size_mm,
            height_mm: size_mm,
        }
    }

    pub fn board(cols: u32, rows: u32, cell_mm: f64) -> Self {
        Self {
            kind: FiducialKind::Board { cols, rows },
            width_mm: f64::from(cols) * cell_mm,
            height_mm: f64::from(rows) * cell_mm,
        }
    }
}

/// Produces binary pattern bitmaps (0 = black module, 255 = white module).
pub trait PatternEncoder {
    /// A square tag of exactly `pixel_size` pixels per side.
    fn encode_tag(&self, id: u32, pixel_size: u32) -> Result<GrayImage, EncodeError>;

    /// A `cols x rows` board with square cells of `cell_pixel_size`.
    fn encode_board(
        &self,
        cols: u32,
        rows: u32,
        cell_pixel_size: u32,
    ) -> Result<GrayImage, EncodeError>;

    /// Validate a fiducial without rendering it.
    fn check(&self, kind: &FiducialKind) -> Result<(), EncodeError>;
}

/// Encoder over a built-in marker dictionary.
#[derive(Clone, Copy, Debug)]
pub struct MarkerEncoder {
    dictionary: Dictionary,
    marker_size_rel: f32,
}

impl MarkerEncoder {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            marker_size_rel: 0.6,
        }
    }

    /// Look up a built-in dictionary by name, e.g. `DICT_APRILTAG_36h11`.
    pub fn from_name(name: &str) -> Result<Self, EncodeError> {
        builtins::builtin_dictionary(name)
            .map(Self::new)
            .ok_or_else(|| EncodeError::UnknownDictionary {
                name: name.to_string(),
                available: builtins::BUILTIN_DICTIONARY_NAMES,
            })
    }

    /// Marker side relative to the board cell, used for boards only.
    pub fn with_marker_size_rel(mut self, marker_size_rel: f32) -> Self {
        self.marker_size_rel = marker_size_rel;
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn board(&self, cols: u32, rows: u32) -> Result<CharucoBoard, CharucoBoardError> {
        CharucoBoard::new(CharucoBoardSpec {
            rows,
            cols,
            marker_size_rel: self.marker_size_rel,
            dictionary: self.dictionary,
            marker_layout: MarkerLayout::OpenCvCharuco,
        })
    }
}

impl PatternEncoder for MarkerEncoder {
    fn encode_tag(&self, id: u32, pixel_size: u32) -> Result<GrayImage, EncodeError> {
        if pixel_size == 0 {
            return Err(EncodeError::EmptyBitmap(pixel_size));
        }
        Ok(render_marker(&self.dictionary, id, pixel_size)?)
    }

    fn encode_board(
        &self,
        cols: u32,
        rows: u32,
        cell_pixel_size: u32,
    ) -> Result<GrayImage, EncodeError> {
        if cell_pixel_size == 0 {
            return Err(EncodeError::EmptyBitmap(cell_pixel_size));
        }
        Ok(self.board(cols, rows)?.render(cell_pixel_size)?)
    }

    fn check(&self, kind: &FiducialKind) -> Result<(), EncodeError> {
        match *kind {
            FiducialKind::Tag { id } => {
                if self.dictionary.code(id).is_none() {
                    return Err(MarkerRenderError::UnknownId {
                        id,
                        dictionary: self.dictionary.name,
                        available: self.dictionary.len(),
                    }
                    .into());
                }
                Ok(())
            }
            FiducialKind::Board { cols, rows } => {
                self.board(cols, rows)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> MarkerEncoder {
        MarkerEncoder::from_name("DICT_APRILTAG_36h11").expect("builtin dictionary")
    }

    #[test]
    fn tag_bitmap_has_requested_size() {
        let img = encoder().encode_tag(33, 160).expect("tag");
        assert_eq!(img.dimensions(), (160, 160));
        assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn board_bitmap_is_cells_times_grid() {
        let img = encoder().encode_board(6, 4, 50).expect("board");
        assert_eq!(img.dimensions(), (300, 200));
    }

    #[test]
    fn check_rejects_out_of_range_ids() {
        let enc = encoder();
        assert!(enc.check(&FiducialKind::Tag { id: 33 }).is_ok());
        assert!(matches!(
            enc.check(&FiducialKind::Tag { id: 10_000 }),
            Err(EncodeError::Marker(MarkerRenderError::UnknownId { .. }))
        ));
        assert!(matches!(
            enc.check(&FiducialKind::Board { cols: 0, rows: 6 }),
            Err(EncodeError::Board(_))
        ));
    }

    #[test]
    fn unknown_dictionary_is_reported() {
        let err = MarkerEncoder::from_name("DICT_NOPE").expect_err("unknown");
        assert!(matches!(err, EncodeError::UnknownDictionary { .. }));
    }
}
