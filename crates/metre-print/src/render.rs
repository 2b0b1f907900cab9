//! Painting a [`LayoutPlan`] into light and dark rasters.

use crate::assets::LogoContent;
use crate::draw::{blank_canvas, Painter, INK};
use crate::encoder::{EncodeError, PatternEncoder};
use crate::fiducial::place_fiducial;
use crate::layout::{ElementKind, LayoutPlan, PlanElement};
use crate::text::TextFace;
use image::RgbImage;
use log::debug;
use metre_core::{Page, PhysicalRect, PixelRect, Variant};
use serde::{Deserialize, Serialize};

/// Where one plan element ended up on the raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: ElementKind,
    pub bounds: PixelRect,
}

#[derive(Clone, Debug)]
pub struct RenderedSheet {
    pub variant: Variant,
    pub page: Page,
    pub image: RgbImage,
    /// One entry per plan element, in paint order.
    pub placements: Vec<Placement>,
}

impl RenderedSheet {
    pub fn placements_of(&self, kind: ElementKind) -> impl Iterator<Item = &Placement> + '_ {
        self.placements.iter().filter(move |p| p.kind == kind)
    }
}

/// Both renditions of one plan.
#[derive(Clone, Debug)]
pub struct VariantPair {
    pub light: RenderedSheet,
    pub dark: RenderedSheet,
}

impl VariantPair {
    pub fn get(&self, variant: Variant) -> &RenderedSheet {
        match variant {
            Variant::Light => &self.light,
            Variant::Dark => &self.dark,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedSheet> {
        [&self.light, &self.dark].into_iter()
    }
}

/// Paints plans with a fixed encoder and text face.
pub struct SheetRenderer {
    encoder: Box<dyn PatternEncoder>,
    face: TextFace,
}

impl SheetRenderer {
    pub fn new(encoder: Box<dyn PatternEncoder>, face: TextFace) -> Self {
        Self { encoder, face }
    }

    pub fn encoder(&self) -> &dyn PatternEncoder {
        self.encoder.as_ref()
    }

    /// Paint `plan` on a fresh canvas under `variant`'s colour policy.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(self, plan)))]
    pub fn render(&self, plan: &LayoutPlan, variant: Variant) -> Result<RenderedSheet, EncodeError> {
        let page = *plan.page();
        let policy = variant.policy();
        let mut image = blank_canvas(&page, policy);
        let mut placements = Vec::with_capacity(plan.elements().len());
        {
            let mut painter = Painter::new(&mut image, page, policy, &self.face);
            for element in plan.elements() {
                let bounds = self.paint(&mut painter, element)?;
                placements.push(Placement {
                    kind: element.kind(),
                    bounds,
                });
            }
        }
        debug!("rendered {variant} sheet with {} placements", placements.len());
        Ok(RenderedSheet {
            variant,
            page,
            image,
            placements,
        })
    }

    /// Render light then dark from the same plan.
    pub fn render_variants(&self, plan: &LayoutPlan) -> Result<VariantPair, EncodeError> {
        Ok(VariantPair {
            light: self.render(plan, Variant::Light)?,
            dark: self.render(plan, Variant::Dark)?,
        })
    }

    fn paint(&self, painter: &mut Painter<'_>, element: &PlanElement) -> Result<PixelRect, EncodeError> {
        let bounds = match element {
            PlanElement::Frame {
                rect,
                thickness_mm,
                margin_mm,
            } => painter.draw_frame(rect, *thickness_mm, *margin_mm),
            PlanElement::Ruler(ruler) => painter.draw_ruler(ruler),
            PlanElement::DottedRect(dotted) => painter.draw_dotted_rect(dotted),
            PlanElement::Fiducial { spec, target } => {
                place_fiducial(painter, self.encoder.as_ref(), spec, target)?
            }
            PlanElement::CornerCross {
                center,
                arm_mm,
                width_mm,
            } => painter.draw_corner_cross(*center, *arm_mm, *width_mm),
            PlanElement::Text(t) => painter.draw_centered_text(t.center, &t.text, t.size_mm, t.shade),
            PlanElement::Separator {
                from,
                to,
                width_mm,
                shade,
            } => painter.draw_segment(*from, *to, *width_mm, *shade),
            PlanElement::Logo { footprint, content } => paint_logo(painter, footprint, content),
        };
        Ok(bounds)
    }
}

fn paint_logo(painter: &mut Painter<'_>, footprint: &PhysicalRect, content: &LogoContent) -> PixelRect {
    match content {
        LogoContent::Image(img) => {
            let slot = painter.px_rect(footprint);
            let policy = painter.policy();
            let mut tinted = img.clone();
            for p in tinted.pixels_mut() {
                *p = policy.recolor(*p);
            }
            let x = slot.x + (slot.width.saturating_sub(img.width()) / 2) as i32;
            let y = slot.y + (slot.height.saturating_sub(img.height()) / 2) as i32;
            painter.blit(&tinted, x, y)
        }
        LogoContent::Placeholder { label, size_mm } => {
            let bounds = painter.draw_outline(footprint, 0.2, INK);
            painter.draw_centered_text(footprint.center(), label, *size_mm, INK);
            bounds
        }
    }
}
