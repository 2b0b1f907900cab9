//! Marker bitmap synthesis.

use crate::Dictionary;
use image::{GrayImage, Luma};

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerRenderError {
    #[error("marker id {id} is not in {dictionary} ({available} ids)")]
    UnknownId {
        id: u32,
        dictionary: &'static str,
        available: usize,
    },
    #[error("{pixel_size} px cannot hold the {modules} modules of a {dictionary} marker")]
    TooSmall {
        pixel_size: u32,
        modules: u32,
        dictionary: &'static str,
    },
}

/// Render marker `id` as a `pixel_size × pixel_size` bitmap.
///
/// The marker is a one-module black border around the `marker_size²` data
/// modules. Every pixel samples the module under it (nearest neighbour), so
/// the output is strictly black/white and module edges stay crisp; when
/// `pixel_size` is not a multiple of the module count some modules are one
/// pixel wider than others.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(dict), fields(dict = dict.name)))]
pub fn render_marker(
    dict: &Dictionary,
    id: u32,
    pixel_size: u32,
) -> Result<GrayImage, MarkerRenderError> {
    if dict.code(id).is_none() {
        return Err(MarkerRenderError::UnknownId {
            id,
            dictionary: dict.name,
            available: dict.len(),
        });
    }
    let modules = dict.marker_size as u32 + 2;
    if pixel_size < modules {
        return Err(MarkerRenderError::TooSmall {
            pixel_size,
            modules,
            dictionary: dict.name,
        });
    }

    let module_of = |p: u32| (u64::from(p) * u64::from(modules) / u64::from(pixel_size)) as usize;
    let last = modules as usize - 1;
    Ok(GrayImage::from_fn(pixel_size, pixel_size, |x, y| {
        let (mx, my) = (module_of(x), module_of(y));
        if mx == 0 || my == 0 || mx == last || my == last {
            return BLACK;
        }
        match dict.module(id, my - 1, mx - 1) {
            Some(true) => WHITE,
            _ => BLACK,
        }
    }))
}
