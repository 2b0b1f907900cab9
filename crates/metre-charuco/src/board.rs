//! Board specification and layout helpers for ChArUco.

use metre_aruco::Dictionary;

/// Marker placement scheme for the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MarkerLayout {
    /// OpenCV-style ChArUco layout:
    /// - markers are placed on white squares only (the top-left square is black),
    /// - marker IDs are assigned sequentially in row-major order over those squares.
    #[default]
    OpenCvCharuco,
}

/// Static ChArUco board specification.
///
/// `rows`/`cols` are **square counts** (not inner corner counts). Physical
/// size is not part of the board; the sheet layout decides the footprint.
#[derive(Clone, Copy, Debug)]
pub struct CharucoBoardSpec {
    pub rows: u32,
    pub cols: u32,
    /// Marker side relative to the square side, in `(0, 1]`.
    pub marker_size_rel: f32,
    pub dictionary: Dictionary,
    pub marker_layout: MarkerLayout,
}

/// Board specification validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CharucoBoardError {
    #[error("rows and cols must be >= 2")]
    InvalidSize,
    #[error("marker_size_rel must be in (0, 1]")]
    InvalidMarkerSizeRel,
    #[error("dictionary has no codes")]
    EmptyDictionary,
    #[error("board needs {needed} markers, dictionary has {available}")]
    NotEnoughDictionaryCodes { needed: usize, available: usize },
}

/// Validated board with precomputed marker positions.
#[derive(Clone, Debug)]
pub struct CharucoBoard {
    spec: CharucoBoardSpec,
    marker_positions: Vec<[u32; 2]>,
}

impl CharucoBoard {
    /// Validate and create a board from a spec.
    pub fn new(spec: CharucoBoardSpec) -> Result<Self, CharucoBoardError> {
        if spec.rows < 2 || spec.cols < 2 {
            return Err(CharucoBoardError::InvalidSize);
        }
        if !spec.marker_size_rel.is_finite()
            || spec.marker_size_rel <= 0.0
            || spec.marker_size_rel > 1.0
        {
            return Err(CharucoBoardError::InvalidMarkerSizeRel);
        }
        if spec.dictionary.is_empty() {
            return Err(CharucoBoardError::EmptyDictionary);
        }

        let marker_positions = match spec.marker_layout {
            MarkerLayout::OpenCvCharuco => open_cv_charuco_marker_positions(spec.rows, spec.cols),
        };

        let needed = marker_positions.len();
        let available = spec.dictionary.len();
        if available < needed {
            return Err(CharucoBoardError::NotEnoughDictionaryCodes { needed, available });
        }

        Ok(Self {
            spec,
            marker_positions,
        })
    }

    #[inline]
    pub fn spec(&self) -> CharucoBoardSpec {
        self.spec
    }

    /// Number of markers on the board.
    #[inline]
    pub fn marker_count(&self) -> usize {
        self.marker_positions.len()
    }

    /// Square coordinates `[sx, sy]` holding marker `id`.
    #[inline]
    pub fn marker_position(&self, id: u32) -> Option<[u32; 2]> {
        self.marker_positions.get(id as usize).copied()
    }

    /// True when square `(sx, sy)` is printed solid black.
    #[inline]
    pub fn is_black_square(&self, sx: u32, sy: u32) -> bool {
        (sx + sy) % 2 == 0
    }

    /// Marker id printed in square `(sx, sy)`, if any.
    pub fn marker_at(&self, sx: u32, sy: u32) -> Option<u32> {
        if sx >= self.spec.cols || sy >= self.spec.rows || self.is_black_square(sx, sy) {
            return None;
        }
        // white squares are numbered row-major; each row holds cols/2 (+1) of them
        let before_row: u32 = (0..sy)
            .map(|row| (0..self.spec.cols).filter(|&x| (x + row) % 2 == 1).count() as u32)
            .sum();
        let in_row = (0..sx).filter(|&x| (x + sy) % 2 == 1).count() as u32;
        Some(before_row + in_row)
    }
}

fn open_cv_charuco_marker_positions(rows: u32, cols: u32) -> Vec<[u32; 2]> {
    let mut out = Vec::new();
    for j in 0..rows {
        for i in 0..cols {
            // OpenCV: top-left square is black => white squares have (i+j) odd.
            if (i + j) % 2 == 1 {
                out.push([i, j]);
            }
        }
    }
    out
}
