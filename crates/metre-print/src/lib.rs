//! Printable calibration sheet rendering.
//!
//! A sheet is described by a [`SheetConfig`], composed once into a
//! [`LayoutPlan`] (all geometry in millimetres), and painted into light and
//! dark rasters by a [`SheetRenderer`]. Pixel positions come exclusively
//! from [`metre_core::mm_to_px`], so an element sits on the same pixels in
//! both renditions.
//!
//! ```no_run
//! use metre_print::{generate, write_variants, SheetConfig};
//!
//! let pair = generate(&SheetConfig::default())?;
//! write_variants(std::path::Path::new("out"), "metre-a4-v2.0", &pair)?;
//! # Ok::<(), metre_print::SheetError>(())
//! ```

mod assets;
mod config;
mod draw;
mod encoder;
mod export;
mod fiducial;
mod glyphs;
mod layout;
mod render;
mod text;

pub use assets::{fit_logo, load_logo, LogoContent};
pub use config::{
    ConfigIoError, CornerCrossConfig, DottedBorderConfig, InfoConfig, LogoSlotConfig,
    LogoZoneConfig, PageConfig, PatternConfig, RulerConfig, ScaleBarConfig, SheetConfig,
    TextLineConfig, ZoneConfig,
};
pub use draw::{
    blank_canvas, DottedRectSpec, LabelSide, Orientation, Painter, RulerSpec, Tick, TickLevel,
    INK,
};
pub use encoder::{EncodeError, FiducialKind, FiducialSpec, MarkerEncoder, PatternEncoder};
pub use export::{
    encode_pdf, encode_png, encode_sheet, pixels_per_metre, write_encoded, write_sheet,
    EncodedSheet, ExportError, ExportedFiles,
};
pub use fiducial::place_fiducial;
pub use layout::{ElementKind, LayoutError, LayoutPlan, PlanElement, TextElement, TEXT_ADVANCE_EM};
pub use render::{Placement, RenderedSheet, SheetRenderer, VariantPair};
pub use text::TextFace;

use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[error(transparent)]
    Config(#[from] ConfigIoError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Build the marker encoder a config asks for.
pub fn marker_encoder(config: &SheetConfig) -> Result<MarkerEncoder, EncodeError> {
    let encoder = MarkerEncoder::from_name(&config.dictionary)?;
    Ok(match config.pattern {
        PatternConfig::Board {
            marker_size_rel, ..
        } => encoder.with_marker_size_rel(marker_size_rel),
        PatternConfig::Tag { .. } => encoder,
    })
}

/// Compose `config` and render both variants.
pub fn generate(config: &SheetConfig) -> Result<VariantPair, SheetError> {
    let renderer = SheetRenderer::new(
        Box::new(marker_encoder(config)?),
        TextFace::load(&config.fonts),
    );
    let plan = LayoutPlan::compose(config, renderer.encoder())?;
    Ok(renderer.render_variants(&plan)?)
}

/// Write both variants of a pair into `dir`. Either all four files end up
/// on disk or none do.
pub fn write_variants(
    dir: &Path,
    stem: &str,
    pair: &VariantPair,
) -> Result<Vec<ExportedFiles>, ExportError> {
    let encoded = pair
        .iter()
        .map(encode_sheet)
        .collect::<Result<Vec<_>, _>>()?;
    write_encoded(dir, stem, &encoded)
}
