//! Core types for printable calibration sheets.
//!
//! This crate is intentionally small and purely geometric: it converts
//! millimetres into print pixels, describes rectangles on a page and defines
//! the two colour policies a sheet can be rendered with. It does *not* draw
//! anything; see `metre-print` for the rendering engine.

mod color;
mod geometry;
mod logger;
mod units;

pub use color::{ColorPolicy, Variant};
pub use geometry::{PhysicalPoint, PhysicalRect, PixelRect};
pub use units::{mm_to_px, Page, PageError, MM_PER_INCH};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
