//! Primitive drawing on a page raster.
//!
//! All inputs are in page millimetres and converted through [`Page`], so a
//! primitive lands on the same pixels no matter which variant is painted.
//! Colours are given as light-sheet luminance and mapped through the
//! painter's [`ColorPolicy`]. Every primitive returns the pixel bounds it
//! touched (before clipping).

use crate::text::TextFace;
use image::{imageops, RgbImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_filled_rect_mut},
    rect::Rect,
};
use metre_core::{ColorPolicy, Page, PhysicalPoint, PhysicalRect, PixelRect};
use serde::{Deserialize, Serialize};

/// Ink at full strength.
pub const INK: u8 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Where ruler labels sit relative to the ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSide {
    /// On the other side of the baseline.
    Behind,
    /// Past the end of the major ticks.
    Beyond,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickLevel {
    Minor,
    Mid,
    Major,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Integer millimetres from the ruler origin.
    pub offset_mm: u32,
    pub level: TickLevel,
    pub label: Option<u32>,
}

/// A graduated ruler.
///
/// Horizontal rulers run right from `origin`; vertical rulers run down.
/// `inward` ticks grow towards +y (horizontal) or +x (vertical), otherwise
/// towards -y / -x.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulerSpec {
    pub origin: PhysicalPoint,
    pub length_mm: f64,
    pub orientation: Orientation,
    pub inward: bool,
    pub tick_every_mm: u32,
    pub mid_every: u32,
    pub major_every: u32,
    /// Labels show `offset_mm / label_unit_mm`.
    pub label_unit_mm: u32,
    pub label_side: LabelSide,
    /// Label the ticks at offset 0 and at the far end.
    pub label_ends: bool,
    pub minor_len_mm: f64,
    pub mid_len_mm: f64,
    pub major_len_mm: f64,
    pub line_width_mm: f64,
    pub label_size_mm: f64,
    pub label_gap_mm: f64,
}

impl RulerSpec {
    /// Ticks at every whole multiple of `tick_every_mm` up to the length.
    pub fn ticks(&self) -> Vec<Tick> {
        let step = self.tick_every_mm.max(1);
        let count = (self.length_mm / f64::from(step) + 1e-9).floor() as u32;
        let last = count * step;
        (0..=count)
            .map(|k| {
                let offset_mm = k * step;
                let level = if self.major_every > 0 && k % self.major_every == 0 {
                    TickLevel::Major
                } else if self.mid_every > 0 && k % self.mid_every == 0 {
                    TickLevel::Mid
                } else {
                    TickLevel::Minor
                };
                let at_end = offset_mm == 0 || offset_mm == last;
                let label = (level == TickLevel::Major && (self.label_ends || !at_end))
                    .then(|| offset_mm / self.label_unit_mm.max(1));
                Tick {
                    offset_mm,
                    level,
                    label,
                }
            })
            .collect()
    }

    fn tick_len(&self, level: TickLevel) -> f64 {
        match level {
            TickLevel::Minor => self.minor_len_mm,
            TickLevel::Mid => self.mid_len_mm,
            TickLevel::Major => self.major_len_mm,
        }
    }

    /// Label centres and values, in tick order.
    pub fn labels(&self) -> Vec<(PhysicalPoint, u32)> {
        let half = self.label_size_mm / 2.0;
        let across = match self.label_side {
            LabelSide::Behind => -(self.label_gap_mm + half),
            LabelSide::Beyond => self.major_len_mm + self.label_gap_mm + half,
        };
        self.ticks()
            .into_iter()
            .filter_map(|t| Some((self.at(f64::from(t.offset_mm), across), t.label?)))
            .collect()
    }

    /// Point `along` mm down the ruler and `across` mm in the tick direction.
    fn at(&self, along: f64, across: f64) -> PhysicalPoint {
        let across = if self.inward { across } else { -across };
        match self.orientation {
            Orientation::Horizontal => self.origin.offset(along, across),
            Orientation::Vertical => self.origin.offset(across, along),
        }
    }
}

/// Dots evenly distributed along the four sides of a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DottedRectSpec {
    pub rect: PhysicalRect,
    pub spacing_mm: f64,
    pub radius_mm: f64,
}

impl DottedRectSpec {
    /// Dot centres, side by side (top, right, bottom, left).
    ///
    /// Each side carries `floor(len / spacing) + 1` dots from corner to corner,
    /// evenly spread, so corners appear once per adjoining side.
    pub fn centers(&self) -> Vec<PhysicalPoint> {
        let [tl, tr, br, bl] = self.rect.corners();
        let mut out = Vec::new();
        for (a, b) in [(tl, tr), (tr, br), (br, bl), (bl, tl)] {
            let len = a.distance(b);
            let n = (len / self.spacing_mm + 1e-9).floor() as usize + 1;
            if n < 2 {
                out.push(a);
                continue;
            }
            for i in 0..n {
                let t = i as f64 / (n - 1) as f64;
                out.push(PhysicalPoint::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        out
    }
}

pub struct Painter<'a> {
    canvas: &'a mut RgbImage,
    page: Page,
    policy: ColorPolicy,
    face: &'a TextFace,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut RgbImage, page: Page, policy: ColorPolicy, face: &'a TextFace) -> Self {
        Self {
            canvas,
            page,
            policy,
            face,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn policy(&self) -> ColorPolicy {
        self.policy
    }

    /// Fill the whole raster with the policy background.
    pub fn clear(&mut self) {
        let bg = self.policy.background();
        for p in self.canvas.pixels_mut() {
            *p = bg;
        }
    }

    /// Fill an axis-aligned pixel rectangle. Empty rectangles are skipped.
    pub fn fill_px(&mut self, r: PixelRect, shade: u8) -> PixelRect {
        if !r.is_empty() {
            let color = self.policy.tone(shade);
            draw_filled_rect_mut(
                self.canvas,
                Rect::at(r.x, r.y).of_size(r.width, r.height),
                color,
            );
        }
        r
    }

    pub fn px_rect(&self, rect: &PhysicalRect) -> PixelRect {
        PixelRect::new(
            self.page.to_coord(rect.x),
            self.page.to_coord(rect.y),
            self.page.to_px(rect.width),
            self.page.to_px(rect.height),
        )
    }

    fn stroke_px(&self, width_mm: f64) -> u32 {
        self.page.to_px(width_mm).max(1)
    }

    /// Axis-aligned segment of the given width, centred on the a-b line.
    pub fn draw_segment(&mut self, a: PhysicalPoint, b: PhysicalPoint, width_mm: f64, shade: u8) -> PixelRect {
        debug_assert!(a.x == b.x || a.y == b.y, "segments are axis-aligned");
        let w = self.stroke_px(width_mm);
        let half = (w / 2) as i32;
        let (ax, ay) = (self.page.to_coord(a.x), self.page.to_coord(a.y));
        let (bx, by) = (self.page.to_coord(b.x), self.page.to_coord(b.y));
        let (x0, x1) = (ax.min(bx), ax.max(bx));
        let (y0, y1) = (ay.min(by), ay.max(by));
        let r = PixelRect::new(
            x0 - half,
            y0 - half,
            (x1 - x0) as u32 + w,
            (y1 - y0) as u32 + w,
        );
        self.fill_px(r, shade)
    }

    /// Rectangular border of `thickness_mm` drawn inside `rect` shrunk by `margin_mm`.
    pub fn draw_frame(&mut self, rect: &PhysicalRect, thickness_mm: f64, margin_mm: f64) -> PixelRect {
        let outer = self.px_rect(&rect.inset(margin_mm));
        let t = self.stroke_px(thickness_mm).min(outer.width).min(outer.height);
        let (x, y, w, h) = (outer.x, outer.y, outer.width, outer.height);
        self.fill_px(PixelRect::new(x, y, w, t), INK);
        self.fill_px(PixelRect::new(x, y + (h - t) as i32, w, t), INK);
        self.fill_px(PixelRect::new(x, y, t, h), INK);
        self.fill_px(PixelRect::new(x + (w - t) as i32, y, t, h), INK);
        outer
    }

    /// Outline of `rect` with the stroke inside the rectangle.
    pub fn draw_outline(&mut self, rect: &PhysicalRect, width_mm: f64, shade: u8) -> PixelRect {
        let outer = self.px_rect(rect);
        let t = self.stroke_px(width_mm).min(outer.width).min(outer.height);
        let (x, y, w, h) = (outer.x, outer.y, outer.width, outer.height);
        self.fill_px(PixelRect::new(x, y, w, t), shade);
        self.fill_px(PixelRect::new(x, y + (h - t) as i32, w, t), shade);
        self.fill_px(PixelRect::new(x, y, t, h), shade);
        self.fill_px(PixelRect::new(x + (w - t) as i32, y, t, h), shade);
        outer
    }

    pub fn draw_ruler(&mut self, ruler: &RulerSpec) -> PixelRect {
        let mut bounds = self.draw_segment(
            ruler.at(0.0, 0.0),
            ruler.at(ruler.length_mm, 0.0),
            ruler.line_width_mm,
            INK,
        );
        for tick in ruler.ticks() {
            let along = f64::from(tick.offset_mm);
            let len = ruler.tick_len(tick.level);
            let r = self.draw_segment(ruler.at(along, 0.0), ruler.at(along, len), ruler.line_width_mm, INK);
            bounds = bounds.union(&r);
        }
        for (center, value) in ruler.labels() {
            let r = self.draw_centered_text(center, &value.to_string(), ruler.label_size_mm, INK);
            bounds = bounds.union(&r);
        }
        bounds
    }

    pub fn draw_dotted_rect(&mut self, spec: &DottedRectSpec) -> PixelRect {
        let radius = self.page.to_px(spec.radius_mm).max(1);
        let color = self.policy.tone(INK);
        let mut bounds: Option<PixelRect> = None;
        for c in spec.centers() {
            let (cx, cy) = (self.page.to_coord(c.x), self.page.to_coord(c.y));
            draw_filled_circle_mut(self.canvas, (cx, cy), radius as i32, color);
            let r = PixelRect::new(cx - radius as i32, cy - radius as i32, 2 * radius + 1, 2 * radius + 1);
            bounds = Some(bounds.map_or(r, |b| b.union(&r)));
        }
        bounds.unwrap_or_else(|| self.px_rect(&spec.rect))
    }

    /// A "+" centred on `center` with arms of `arm_mm` each way.
    pub fn draw_corner_cross(&mut self, center: PhysicalPoint, arm_mm: f64, width_mm: f64) -> PixelRect {
        let h = self.draw_segment(center.offset(-arm_mm, 0.0), center.offset(arm_mm, 0.0), width_mm, INK);
        let v = self.draw_segment(center.offset(0.0, -arm_mm), center.offset(0.0, arm_mm), width_mm, INK);
        h.union(&v)
    }

    /// Text centred on `center` at a nominal height of `size_mm`.
    pub fn draw_centered_text(&mut self, center: PhysicalPoint, text: &str, size_mm: f64, shade: u8) -> PixelRect {
        let size_px = self.page.to_px(size_mm).max(1);
        let (w, h) = self.face.measure(text, size_px);
        let x = self.page.to_coord(center.x) - (w / 2) as i32;
        let y = self.page.to_coord(center.y) - (h / 2) as i32;
        let color = self.policy.tone(shade);
        self.face.draw(self.canvas, x, y, size_px, text, color);
        PixelRect::new(x, y, w, h)
    }

    /// Overwrite pixels with `image` at a pixel offset (no blending).
    pub fn blit(&mut self, image: &RgbImage, x: i32, y: i32) -> PixelRect {
        imageops::replace(self.canvas, image, i64::from(x), i64::from(y));
        PixelRect::new(x, y, image.width(), image.height())
    }
}

/// Blank raster for `page` filled with the policy background.
pub fn blank_canvas(page: &Page, policy: ColorPolicy) -> RgbImage {
    let (w, h) = page.size_px();
    RgbImage::from_pixel(w, h, policy.background())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use metre_core::Variant;

    fn ruler(length_mm: f64) -> RulerSpec {
        RulerSpec {
            origin: PhysicalPoint::new(10.0, 10.0),
            length_mm,
            orientation: Orientation::Horizontal,
            inward: true,
            tick_every_mm: 1,
            mid_every: 5,
            major_every: 10,
            label_unit_mm: 10,
            label_side: LabelSide::Behind,
            label_ends: false,
            minor_len_mm: 1.0,
            mid_len_mm: 1.5,
            major_len_mm: 2.0,
            line_width_mm: 0.2,
            label_size_mm: 2.0,
            label_gap_mm: 0.5,
        }
    }

    #[test]
    fn ruler_ticks_follow_intervals() {
        let ticks = ruler(30.0).ticks();
        assert_eq!(ticks.len(), 31);
        assert_eq!(ticks[0].level, TickLevel::Major);
        assert_eq!(ticks[5].level, TickLevel::Mid);
        assert_eq!(ticks[7].level, TickLevel::Minor);
        let labels: Vec<u32> = ticks.iter().filter_map(|t| t.label).collect();
        assert_eq!(labels, vec![1, 2]);
    }

    #[test]
    fn ruler_labels_ends_when_asked() {
        let mut r = ruler(30.0);
        r.label_ends = true;
        let labels: Vec<u32> = r.ticks().iter().filter_map(|t| t.label).collect();
        assert_eq!(labels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn labels_sit_behind_the_baseline() {
        let labels = ruler(30.0).labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].1, 1);
        assert_relative_eq!(labels[0].0.x, 20.0);
        assert_relative_eq!(labels[0].0.y, 8.5);

        let mut r = ruler(30.0);
        r.label_side = LabelSide::Beyond;
        r.inward = false;
        assert_relative_eq!(r.labels()[1].0.y, 10.0 - (2.0 + 0.5 + 1.0));
    }

    #[test]
    fn dotted_rect_is_evenly_spread() {
        let spec = DottedRectSpec {
            rect: PhysicalRect::new(0.0, 0.0, 164.0, 164.0),
            spacing_mm: 10.0,
            radius_mm: 0.6,
        };
        let dots = spec.centers();
        assert_eq!(dots.len(), 4 * 17);
        for side in dots.chunks(17) {
            for pair in side.windows(2) {
                assert_relative_eq!(pair[0].distance(pair[1]), 10.25, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn frame_paints_only_the_border() {
        let page = Page::new(20.0, 20.0, 254).expect("page");
        let face = TextFace::Builtin;
        let mut canvas = blank_canvas(&page, ColorPolicy::LIGHT);
        let mut painter = Painter::new(&mut canvas, page, ColorPolicy::LIGHT, &face);
        let b = painter.draw_frame(&PhysicalRect::new(2.0, 2.0, 10.0, 10.0), 1.0, 0.0);
        assert_eq!(b, PixelRect::new(20, 20, 100, 100));
        assert_eq!(canvas.get_pixel(20, 60).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(29, 60).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(30, 60).0, [255, 255, 255]);
        assert_eq!(canvas.get_pixel(119, 119).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(120, 120).0, [255, 255, 255]);
    }

    #[test]
    fn dark_policy_paints_white_ink() {
        let page = Page::new(20.0, 20.0, 254).expect("page");
        let face = TextFace::Builtin;
        let policy = Variant::Dark.policy();
        let mut canvas = blank_canvas(&page, policy);
        let mut painter = Painter::new(&mut canvas, page, policy, &face);
        painter.draw_corner_cross(PhysicalPoint::new(10.0, 10.0), 3.0, 0.4);
        assert_eq!(canvas.get_pixel(100, 100).0, [255, 255, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
