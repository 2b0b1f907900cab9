//! Compositing encoded patterns at exact physical footprints.

use crate::draw::Painter;
use crate::encoder::{EncodeError, FiducialKind, FiducialSpec, PatternEncoder};
use image::{imageops, imageops::FilterType, DynamicImage, GrayImage};
use log::debug;
use metre_core::{PhysicalRect, PixelRect};

/// Render `spec` into `target` on the painter's canvas.
///
/// The pattern is requested at the target's pixel size, resampled only when
/// the encoder cannot hit it exactly (boards whose cell count does not divide
/// the footprint), inverted for the dark policy and copied over the canvas at
/// the target's top-left pixel.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(painter, encoder)))]
pub fn place_fiducial(
    painter: &mut Painter<'_>,
    encoder: &dyn PatternEncoder,
    spec: &FiducialSpec,
    target: &PhysicalRect,
) -> Result<PixelRect, EncodeError> {
    let page = *painter.page();
    let w = page.to_px(target.width);
    let h = page.to_px(target.height);
    if w == 0 || h == 0 {
        return Err(EncodeError::EmptyBitmap(w.min(h)));
    }
    let bitmap = encode(encoder, spec, w, h)?;
    let mut bitmap = if bitmap.dimensions() == (w, h) {
        bitmap
    } else {
        debug!("resampling pattern {:?} -> {}x{}", bitmap.dimensions(), w, h);
        imageops::resize(&bitmap, w, h, FilterType::Triangle)
    };
    if painter.policy().is_inverted() {
        imageops::invert(&mut bitmap);
    }
    let rgb = DynamicImage::ImageLuma8(bitmap).into_rgb8();
    let x = page.to_coord(target.x);
    let y = page.to_coord(target.y);
    Ok(painter.blit(&rgb, x, y))
}

fn encode(
    encoder: &dyn PatternEncoder,
    spec: &FiducialSpec,
    w: u32,
    h: u32,
) -> Result<GrayImage, EncodeError> {
    match spec.kind {
        FiducialKind::Tag { id } => encoder.encode_tag(id, w.min(h)),
        FiducialKind::Board { cols, rows } => {
            let cell = (w / cols.max(1)).min(h / rows.max(1));
            encoder.encode_board(cols, rows, cell)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::blank_canvas;
    use crate::encoder::MarkerEncoder;
    use crate::text::TextFace;
    use metre_core::{ColorPolicy, Page};

    fn place(policy: ColorPolicy, spec: FiducialSpec, target: PhysicalRect) -> (image::RgbImage, PixelRect) {
        let page = Page::new(100.0, 100.0, 254).expect("page");
        let face = TextFace::Builtin;
        let encoder = MarkerEncoder::from_name("DICT_APRILTAG_36h11").expect("dict");
        let mut canvas = blank_canvas(&page, policy);
        let bounds = {
            let mut painter = Painter::new(&mut canvas, page, policy, &face);
            place_fiducial(&mut painter, &encoder, &spec, &target).expect("place")
        };
        (canvas, bounds)
    }

    #[test]
    fn tag_lands_on_exact_footprint() {
        let target = PhysicalRect::new(10.0, 20.0, 40.0, 40.0);
        let (canvas, bounds) = place(ColorPolicy::LIGHT, FiducialSpec::tag(33, 40.0), target);
        assert_eq!(bounds, PixelRect::new(100, 200, 400, 400));
        // border module is black on light, background just outside is white
        assert_eq!(canvas.get_pixel(100, 200).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(99, 200).0, [255, 255, 255]);
        assert_eq!(canvas.get_pixel(499, 599).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(500, 599).0, [255, 255, 255]);
    }

    #[test]
    fn dark_policy_inverts_the_pattern() {
        let target = PhysicalRect::new(10.0, 20.0, 40.0, 40.0);
        let spec = FiducialSpec::tag(33, 40.0);
        let (light, _) = place(ColorPolicy::LIGHT, spec, target);
        let (dark, _) = place(ColorPolicy::DARK, spec, target);
        for (l, d) in light.pixels().zip(dark.pixels()) {
            assert_eq!(d.0[0], 255 - l.0[0]);
        }
    }

    #[test]
    fn board_is_resampled_to_footprint() {
        // 7 cells into 333 px do not divide evenly
        let target = PhysicalRect::new(0.0, 0.0, 33.3, 33.3);
        let (_, bounds) = place(ColorPolicy::LIGHT, FiducialSpec::board(7, 7, 33.3 / 7.0), target);
        assert_eq!((bounds.width, bounds.height), (333, 333));
    }
}
