//! Unit conversion between physical millimetres and print pixels.

use crate::geometry::PhysicalRect;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Convert a physical length in millimetres to whole pixels at `dpi`.
///
/// The result is `mm × dpi / 25.4` rounded to the nearest integer with
/// **ties to even**. The product is evaluated as `mm × dpi × 10 / 254` so that
/// lengths given in tenths of a millimetre keep their exact value through
/// the division and hit ties exactly when they should (e.g. 0.5 mm at
/// 127 dpi is exactly 2.5 px and rounds to 2).
///
/// The mapping is monotonic non-decreasing in `mm`. Negative lengths are a
/// caller error; in release builds they saturate to zero.
#[inline]
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    debug_assert!(mm >= 0.0, "negative length {mm} mm");
    let exact = mm * f64::from(dpi) * 10.0 / 254.0;
    exact.round_ties_even() as u32
}

/// Page construction errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("page size must be finite and > 0 (got {width_mm} x {height_mm} mm)")]
    InvalidSize { width_mm: f64, height_mm: f64 },
    #[error("print resolution must be > 0 dpi")]
    InvalidResolution,
}

/// A physical page printed at a fixed resolution.
///
/// Width, height and resolution are fixed at construction; every pixel
/// coordinate on the sheet is derived through [`Page::to_px`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page {
    width_mm: f64,
    height_mm: f64,
    dpi: u32,
}

impl Page {
    /// Validate and create a page.
    pub fn new(width_mm: f64, height_mm: f64, dpi: u32) -> Result<Self, PageError> {
        if !width_mm.is_finite() || !height_mm.is_finite() || width_mm <= 0.0 || height_mm <= 0.0
        {
            return Err(PageError::InvalidSize {
                width_mm,
                height_mm,
            });
        }
        if dpi == 0 {
            return Err(PageError::InvalidResolution);
        }
        Ok(Self {
            width_mm,
            height_mm,
            dpi,
        })
    }

    /// ISO A4 portrait (210 × 297 mm).
    pub fn a4(dpi: u32) -> Result<Self, PageError> {
        Self::new(210.0, 297.0, dpi)
    }

    #[inline]
    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    #[inline]
    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    #[inline]
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Convert a length on this page to pixels.
    #[inline]
    pub fn to_px(&self, mm: f64) -> u32 {
        mm_to_px(mm, self.dpi)
    }

    /// Same as [`Page::to_px`], as a signed raster coordinate. Negative
    /// positions round symmetrically to their positive counterparts.
    #[inline]
    pub fn to_coord(&self, mm: f64) -> i32 {
        let px = i32::try_from(self.to_px(mm.abs())).unwrap_or(i32::MAX);
        if mm < 0.0 {
            -px
        } else {
            px
        }
    }

    /// Raster size of the whole page.
    pub fn size_px(&self) -> (u32, u32) {
        (self.to_px(self.width_mm), self.to_px(self.height_mm))
    }

    /// The full page as a rectangle anchored at the origin.
    pub fn bounds(&self) -> PhysicalRect {
        PhysicalRect::new(0.0, 0.0, self.width_mm, self.height_mm)
    }

    /// The page minus a band of `margin_mm` along every edge.
    pub fn printable(&self, margin_mm: f64) -> PhysicalRect {
        self.bounds().inset(margin_mm)
    }

    /// Page size in PostScript points (1/72 inch), for vector wrappers.
    pub fn size_pt(&self) -> (f64, f64) {
        (
            self.width_mm / MM_PER_INCH * 72.0,
            self.height_mm / MM_PER_INCH * 72.0,
        )
    }
}
