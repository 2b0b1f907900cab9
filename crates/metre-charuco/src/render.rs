//! Board bitmap synthesis.

use crate::CharucoBoard;
use image::{imageops, GrayImage, Luma};
use metre_aruco::{render_marker, MarkerRenderError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardRenderError {
    #[error("cell size must be > 0 px")]
    EmptyCell,
    #[error(transparent)]
    Marker(#[from] MarkerRenderError),
}

impl CharucoBoard {
    /// Render the board with square cells of `cell_px` pixels.
    ///
    /// The bitmap is `cols × cell_px` wide and `rows × cell_px` high. Markers
    /// are centred in their white square at `marker_size_rel` of the cell,
    /// rendered nearest-neighbour like every marker bitmap.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub fn render(&self, cell_px: u32) -> Result<GrayImage, BoardRenderError> {
        if cell_px == 0 {
            return Err(BoardRenderError::EmptyCell);
        }
        let spec = self.spec();
        let marker_px = (cell_px as f32 * spec.marker_size_rel).round() as u32;
        let pad = i64::from((cell_px - marker_px.min(cell_px)) / 2);

        let mut img = GrayImage::from_fn(spec.cols * cell_px, spec.rows * cell_px, |x, y| {
            if self.is_black_square(x / cell_px, y / cell_px) {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        for id in 0..self.marker_count() as u32 {
            let Some([sx, sy]) = self.marker_position(id) else {
                continue;
            };
            let marker = render_marker(&spec.dictionary, id, marker_px)?;
            let x = i64::from(sx * cell_px) + pad;
            let y = i64::from(sy * cell_px) + pad;
            imageops::replace(&mut img, &marker, x, y);
        }
        log::debug!(
            "rendered {}x{} board ({} markers) at {cell_px} px/cell",
            spec.cols,
            spec.rows,
            self.marker_count()
        );
        Ok(img)
    }
}
