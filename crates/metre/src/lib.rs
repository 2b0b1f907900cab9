//! High-level facade crate for the `metre-*` workspace.
//!
//! `metre` renders a printable A4 calibration sheet: a framed square zone
//! with millimetre rulers, a dotted alignment border, corner crosses and a
//! centred AprilTag (or ChArUco board), plus header, info and logo bands.
//! Every sheet is produced as a light (paper) and a dark (projection)
//! variant with identical geometry.
//!
//! ## Quickstart
//!
//! ```no_run
//! use metre::{generate, write_variants, SheetConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SheetConfig::default();
//! let pair = generate(&config)?;
//! write_variants("public/printable".as_ref(), "metre-a4-v2.0", &pair)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `metre::core`: millimetre/pixel conversion, page and rectangle types, colour policies.
//! - `metre::aruco`: built-in marker dictionaries and marker bitmaps.
//! - `metre::charuco`: ChArUco board layout and bitmaps.
//! - `metre::print`: sheet config, layout composition, rendering and PNG/PDF export.

pub use metre_aruco as aruco;
pub use metre_charuco as charuco;
pub use metre_core as core;
pub use metre_print as print;

pub use metre_core::{init_with_level, mm_to_px, Page, Variant};
pub use metre_print::{
    generate, marker_encoder, write_variants, LayoutPlan, RenderedSheet, SheetConfig,
    SheetError, SheetRenderer, TextFace, VariantPair,
};
