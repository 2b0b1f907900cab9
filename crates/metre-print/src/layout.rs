//! Sheet composition.
//!
//! [`LayoutPlan::compose`] turns a [`SheetConfig`] into an ordered list of
//! drawing elements, all positioned in page millimetres and derived from the
//! calibration zone origin and size. The plan is variant independent: the
//! renderer paints the same plan once per colour policy.
//!
//! Composition rejects geometry that would put the fiducial outside the
//! dotted border, the dotted border outside the frame, header, footer or
//! logo band content over the zone or its captions, or anything (text
//! included) outside the printable area.

use crate::assets::{load_logo, LogoContent};
use crate::config::{PatternConfig, SheetConfig};
use crate::draw::{DottedRectSpec, LabelSide, Orientation, RulerSpec};
use crate::encoder::{EncodeError, FiducialSpec, PatternEncoder};
use log::debug;
use metre_core::{Page, PageError, PhysicalPoint, PhysicalRect};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
    #[error("{inner} must lie strictly inside {outer}")]
    NotContained {
        inner: &'static str,
        outer: &'static str,
    },
    #[error("{kind:?} element extends past the printable area")]
    OutsidePrintable { kind: ElementKind },
    #[error("{kind:?} element overlaps the calibration zone or its captions")]
    ZoneOverlap { kind: ElementKind },
    #[error(transparent)]
    Pattern(#[from] EncodeError),
}

/// Element category, also used to tag rendered placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Frame,
    Ruler,
    DottedBorder,
    Fiducial,
    CornerCross,
    Text,
    Separator,
    Logo,
}

impl ElementKind {
    /// Paint order; lower layers are drawn first.
    pub fn layer(self) -> u8 {
        match self {
            ElementKind::Frame => 0,
            ElementKind::Ruler => 1,
            ElementKind::DottedBorder => 2,
            ElementKind::Fiducial => 3,
            ElementKind::CornerCross => 4,
            ElementKind::Text | ElementKind::Separator => 5,
            ElementKind::Logo => 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub center: PhysicalPoint,
    pub text: String,
    pub size_mm: f64,
    /// Light-sheet luminance.
    pub shade: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlanElement {
    Frame {
        rect: PhysicalRect,
        thickness_mm: f64,
        margin_mm: f64,
    },
    Ruler(RulerSpec),
    DottedRect(DottedRectSpec),
    Fiducial {
        spec: FiducialSpec,
        target: PhysicalRect,
    },
    CornerCross {
        center: PhysicalPoint,
        arm_mm: f64,
        width_mm: f64,
    },
    Text(TextElement),
    Separator {
        from: PhysicalPoint,
        to: PhysicalPoint,
        width_mm: f64,
        shade: u8,
    },
    Logo {
        footprint: PhysicalRect,
        content: LogoContent,
    },
}

impl PlanElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            PlanElement::Frame { .. } => ElementKind::Frame,
            PlanElement::Ruler(_) => ElementKind::Ruler,
            PlanElement::DottedRect(_) => ElementKind::DottedBorder,
            PlanElement::Fiducial { .. } => ElementKind::Fiducial,
            PlanElement::CornerCross { .. } => ElementKind::CornerCross,
            PlanElement::Text(_) => ElementKind::Text,
            PlanElement::Separator { .. } => ElementKind::Separator,
            PlanElement::Logo { .. } => ElementKind::Logo,
        }
    }

    /// Physical extent of the element. Text and ruler labels use the
    /// nominal advance of [`TEXT_ADVANCE_EM`] per character.
    pub fn extent_mm(&self) -> PhysicalRect {
        match self {
            PlanElement::Frame {
                rect, margin_mm, ..
            } => rect.inset(*margin_mm),
            PlanElement::Ruler(r) => ruler_extent(r),
            PlanElement::DottedRect(d) => d.rect.inset(-d.radius_mm),
            PlanElement::Fiducial { target, .. } => *target,
            PlanElement::CornerCross { center, arm_mm, .. } => PhysicalRect::new(
                center.x - arm_mm,
                center.y - arm_mm,
                2.0 * arm_mm,
                2.0 * arm_mm,
            ),
            PlanElement::Text(t) => text_extent(t.center, &t.text, t.size_mm),
            PlanElement::Separator { from, to, .. } => PhysicalRect::new(
                from.x.min(to.x),
                from.y.min(to.y),
                (to.x - from.x).abs(),
                (to.y - from.y).abs(),
            ),
            PlanElement::Logo { footprint, .. } => *footprint,
        }
    }
}

/// Nominal character advance as a fraction of the text size. Matches the
/// built-in face and is generous for the usual sans-serif outline fonts.
pub const TEXT_ADVANCE_EM: f64 = 0.6;

/// Box of `text` centred on `center`, a full `size_mm` tall.
fn text_extent(center: PhysicalPoint, text: &str, size_mm: f64) -> PhysicalRect {
    let width = text.chars().count() as f64 * TEXT_ADVANCE_EM * size_mm;
    PhysicalRect::new(
        center.x - width / 2.0,
        center.y - size_mm / 2.0,
        width,
        size_mm,
    )
}

fn ruler_extent(r: &RulerSpec) -> PhysicalRect {
    let depth = r.major_len_mm.max(r.mid_len_mm).max(r.minor_len_mm);
    let (lo, hi) = if r.inward { (0.0, depth) } else { (-depth, 0.0) };
    let strokes = match r.orientation {
        Orientation::Horizontal => {
            PhysicalRect::new(r.origin.x, r.origin.y + lo, r.length_mm, hi - lo)
        }
        Orientation::Vertical => {
            PhysicalRect::new(r.origin.x + lo, r.origin.y, hi - lo, r.length_mm)
        }
    };
    r.labels().into_iter().fold(strokes, |acc, (center, value)| {
        acc.union(&text_extent(center, &value.to_string(), r.label_size_mm))
    })
}

/// A fully positioned, variant-independent sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    page: Page,
    zone: PhysicalRect,
    elements: Vec<PlanElement>,
}

impl LayoutPlan {
    /// Derive every element from `config` and validate containment.
    ///
    /// Logo files are read here, once, so both variants share them.
    pub fn compose(
        config: &SheetConfig,
        encoder: &dyn PatternEncoder,
    ) -> Result<Self, LayoutError> {
        let page = config.page()?;
        let printable = page.printable(config.unprintable_margin_mm);
        if !printable.is_valid() {
            return Err(LayoutError::InvalidGeometry(
                "unprintable margin leaves no printable area",
            ));
        }
        validate_config(config)?;

        let zone = config.zone_rect();
        if !zone.is_valid() {
            return Err(LayoutError::InvalidGeometry("calibration zone is empty"));
        }
        if !printable.contains_rect(&zone) {
            return Err(LayoutError::NotContained {
                inner: "calibration zone",
                outer: "printable area",
            });
        }

        let mut elements = Vec::new();
        elements.push(PlanElement::Frame {
            rect: zone,
            thickness_mm: config.zone.frame_thickness_mm,
            margin_mm: 0.0,
        });
        elements.extend(zone_rulers(config, zone).into_iter().map(PlanElement::Ruler));

        let dotted = DottedRectSpec {
            rect: zone.inset(config.dotted_border.inset_mm),
            spacing_mm: config.dotted_border.spacing_mm,
            radius_mm: config.dotted_border.radius_mm,
        };
        let frame_inner = zone.inset(config.zone.frame_thickness_mm);
        if !frame_inner.strictly_contains_rect(&dotted.rect.inset(-dotted.radius_mm)) {
            return Err(LayoutError::NotContained {
                inner: "dotted border",
                outer: "zone frame",
            });
        }
        elements.push(PlanElement::DottedRect(dotted));

        let spec = fiducial_spec(&config.pattern);
        encoder.check(&spec.kind)?;
        let target = zone.centered(spec.width_mm, spec.height_mm);
        if !target.is_valid() {
            return Err(LayoutError::InvalidGeometry("fiducial footprint is empty"));
        }
        if !dotted.rect.inset(dotted.radius_mm).strictly_contains_rect(&target) {
            return Err(LayoutError::NotContained {
                inner: "fiducial",
                outer: "dotted border",
            });
        }
        elements.push(PlanElement::Fiducial { spec, target });

        let cross = &config.corner_crosses;
        for corner in zone.inset(cross.inset_mm).corners() {
            elements.push(PlanElement::CornerCross {
                center: corner,
                arm_mm: cross.arm_mm,
                width_mm: cross.width_mm,
            });
        }

        // everything placed around the zone rather than derived from it
        let mut surround = Vec::new();
        let mid_x = page.width_mm() / 2.0;
        for line in &config.header {
            surround.push(text(PhysicalPoint::new(mid_x, line.y_mm), &line.text, line.size_mm, line.shade));
        }
        let info = &config.info;
        let info_y = zone.bottom() + info.gap_mm;
        let captions = [
            text(
                PhysicalPoint::new(mid_x, info_y),
                &ruler_caption(zone),
                info.size_mm,
                0,
            ),
            text(
                PhysicalPoint::new(mid_x, info_y + info.line_spacing_mm),
                &sheet_caption(config, &page, &spec),
                info.size_mm,
                0,
            ),
        ];
        let zone_block = captions
            .iter()
            .fold(zone, |acc, c| acc.union(&c.extent_mm()));
        elements.extend(captions);

        let band = &config.logo_zone;
        let band_top = band.top_mm(page.height_mm());
        let sep_y = band_top + band.separator_offset_mm;
        surround.push(PlanElement::Separator {
            from: PhysicalPoint::new(band.separator_inset_mm, sep_y),
            to: PhysicalPoint::new(page.width_mm() - band.separator_inset_mm, sep_y),
            width_mm: 0.1,
            shade: band.separator_shade,
        });

        if let Some(bar) = &config.scale_bar {
            let length_mm = f64::from(bar.length_cm) * 10.0;
            let origin = PhysicalPoint::new(bar.x_mm, band_top + bar.offset_mm);
            surround.push(PlanElement::Ruler(RulerSpec {
                origin,
                length_mm,
                orientation: Orientation::Horizontal,
                inward: true,
                tick_every_mm: 10,
                mid_every: 0,
                major_every: bar.label_every_cm,
                label_unit_mm: 10,
                label_side: LabelSide::Beyond,
                label_ends: true,
                minor_len_mm: 2.0,
                mid_len_mm: 2.0,
                major_len_mm: 3.0,
                line_width_mm: config.rulers.line_width_mm,
                label_size_mm: config.rulers.label_size_mm,
                label_gap_mm: 1.0,
            }));
            surround.push(text(
                origin.offset(length_mm + 12.0, 1.5),
                &bar.caption,
                config.rulers.label_size_mm,
                0,
            ));
        }

        if let Some(footer) = &config.footer {
            surround.push(text(
                PhysicalPoint::new(mid_x, footer.y_mm),
                &footer.text,
                footer.size_mm,
                footer.shade,
            ));
        }

        let logos_y = band_top + band.logos_offset_mm;
        for slot in &band.slots {
            let footprint = PhysicalRect::new(slot.x_mm, logos_y, slot.width_mm, slot.height_mm);
            let content = load_logo(
                &band.asset_dir.join(&slot.asset),
                page.to_px(slot.width_mm),
                page.to_px(slot.height_mm),
                &slot.placeholder,
                slot.placeholder_size_mm,
            );
            surround.push(PlanElement::Logo { footprint, content });
        }
        if let Some(e) = surround
            .iter()
            .find(|e| e.extent_mm().overlaps(&zone_block))
        {
            return Err(LayoutError::ZoneOverlap { kind: e.kind() });
        }
        elements.extend(surround);

        // stable: keeps insertion order inside a layer
        elements.sort_by_key(|e| e.kind().layer());

        if let Some(e) = elements
            .iter()
            .find(|e| !printable.contains_rect(&e.extent_mm()))
        {
            return Err(LayoutError::OutsidePrintable { kind: e.kind() });
        }

        debug!(
            "composed {} elements, fiducial at {:?}",
            elements.len(),
            target
        );
        Ok(Self {
            page,
            zone,
            elements,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn zone(&self) -> PhysicalRect {
        self.zone
    }

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    pub fn fiducial(&self) -> Option<(&FiducialSpec, &PhysicalRect)> {
        self.elements.iter().find_map(|e| match e {
            PlanElement::Fiducial { spec, target } => Some((spec, target)),
            _ => None,
        })
    }

    pub fn dotted_border(&self) -> Option<&DottedRectSpec> {
        self.elements.iter().find_map(|e| match e {
            PlanElement::DottedRect(d) => Some(d),
            _ => None,
        })
    }
}

fn validate_config(config: &SheetConfig) -> Result<(), LayoutError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(config.zone.frame_thickness_mm) {
        return Err(LayoutError::InvalidGeometry("frame thickness must be > 0"));
    }
    if !positive(config.dotted_border.spacing_mm) || !positive(config.dotted_border.radius_mm) {
        return Err(LayoutError::InvalidGeometry(
            "dotted border spacing and radius must be > 0",
        ));
    }
    let r = &config.rulers;
    if r.tick_every_mm == 0 || !positive(r.line_width_mm) || !positive(r.label_size_mm) {
        return Err(LayoutError::InvalidGeometry(
            "ruler tick interval, line width and label size must be > 0",
        ));
    }
    if let Some(bar) = &config.scale_bar {
        if bar.length_cm == 0 {
            return Err(LayoutError::InvalidGeometry("scale bar length must be > 0"));
        }
    }
    Ok(())
}

fn fiducial_spec(pattern: &PatternConfig) -> FiducialSpec {
    match *pattern {
        PatternConfig::Tag { id, size_mm } => FiducialSpec::tag(id, size_mm),
        PatternConfig::Board {
            cols,
            rows,
            cell_mm,
            ..
        } => FiducialSpec::board(cols, rows, cell_mm),
    }
}

/// The four zone rulers: top and left tick inward, bottom and right tick
/// back towards the zone centre.
fn zone_rulers(config: &SheetConfig, zone: PhysicalRect) -> [RulerSpec; 4] {
    let r = &config.rulers;
    let ruler = |origin: PhysicalPoint, orientation: Orientation, inward: bool| RulerSpec {
        origin,
        length_mm: zone.width,
        orientation,
        inward,
        tick_every_mm: r.tick_every_mm,
        mid_every: r.mid_every,
        major_every: r.major_every,
        label_unit_mm: 10,
        label_side: LabelSide::Behind,
        label_ends: false,
        minor_len_mm: r.minor_len_mm,
        mid_len_mm: r.mid_len_mm,
        major_len_mm: r.major_len_mm,
        line_width_mm: r.line_width_mm,
        label_size_mm: r.label_size_mm,
        label_gap_mm: r.label_gap_mm,
    };
    [
        ruler(zone.origin().offset(0.0, r.inset_mm), Orientation::Horizontal, true),
        ruler(
            PhysicalPoint::new(zone.x, zone.bottom() - r.inset_mm),
            Orientation::Horizontal,
            false,
        ),
        ruler(zone.origin().offset(r.inset_mm, 0.0), Orientation::Vertical, true),
        ruler(
            PhysicalPoint::new(zone.right() - r.inset_mm, zone.y),
            Orientation::Vertical,
            false,
        ),
    ]
}

fn text(center: PhysicalPoint, text: &str, size_mm: f64, shade: u8) -> PlanElement {
    PlanElement::Text(TextElement {
        center,
        text: text.to_string(),
        size_mm,
        shade,
    })
}

fn cm(mm: f64) -> String {
    let cm = mm / 10.0;
    if cm.fract() == 0.0 {
        format!("{cm:.0}")
    } else {
        format!("{cm:.1}")
    }
}

fn ruler_caption(zone: PhysicalRect) -> String {
    format!(
        "Règles : Horizontal 0–{}cm | Vertical 0–{}cm",
        cm(zone.width),
        cm(zone.height)
    )
}

fn sheet_caption(config: &SheetConfig, page: &Page, spec: &FiducialSpec) -> String {
    let pattern = match spec.kind {
        crate::encoder::FiducialKind::Tag { id } => {
            format!("Tag {} #{id} {}cm", config.dictionary, cm(spec.width_mm))
        }
        crate::encoder::FiducialKind::Board { cols, rows } => {
            format!("ChArUco {cols}×{rows} {}", config.dictionary)
        }
    };
    format!(
        "ID : {} — {} — {}×{} mm",
        config.sheet_id,
        pattern,
        page.width_mm(),
        page.height_mm()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::MarkerEncoder;
    use approx::assert_relative_eq;

    fn compose(config: &SheetConfig) -> Result<LayoutPlan, LayoutError> {
        let encoder = MarkerEncoder::from_name(&config.dictionary).expect("dictionary");
        LayoutPlan::compose(config, &encoder)
    }

    #[test]
    fn default_sheet_places_tag_centred_in_zone() {
        let plan = compose(&SheetConfig::default()).expect("plan");
        let (_, target) = plan.fiducial().expect("fiducial");
        assert_eq!(*target, PhysicalRect::new(25.0, 40.0, 160.0, 160.0));
        assert_eq!(plan.zone(), PhysicalRect::new(15.0, 30.0, 180.0, 180.0));
    }

    #[test]
    fn elements_are_back_to_front() {
        let plan = compose(&SheetConfig::default()).expect("plan");
        let layers: Vec<u8> = plan.elements().iter().map(|e| e.kind().layer()).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(plan.elements()[0].kind(), ElementKind::Frame);
        let rulers = plan
            .elements()
            .iter()
            .filter(|e| e.kind() == ElementKind::Ruler)
            .count();
        assert_eq!(rulers, 5);
    }

    #[test]
    fn oversized_tag_is_rejected() {
        let mut config = SheetConfig::default();
        config.pattern = PatternConfig::Tag {
            id: 33,
            size_mm: 170.0,
        };
        assert_eq!(
            compose(&config),
            Err(LayoutError::NotContained {
                inner: "fiducial",
                outer: "dotted border",
            })
        );
    }

    #[test]
    fn zone_in_margin_is_rejected() {
        let mut config = SheetConfig::default();
        config.zone.x_mm = 2.0;
        assert!(matches!(
            compose(&config),
            Err(LayoutError::NotContained {
                inner: "calibration zone",
                ..
            })
        ));
    }

    #[test]
    fn zone_moved_into_the_logo_band_is_rejected() {
        let mut config = SheetConfig::default();
        config.zone.y_mm = 85.0;
        assert_eq!(
            compose(&config),
            Err(LayoutError::ZoneOverlap {
                kind: ElementKind::Separator
            })
        );
    }

    #[test]
    fn info_lines_must_clear_the_separator() {
        let mut config = SheetConfig::default();
        config.info.line_spacing_mm = 9.0;
        assert_eq!(
            compose(&config),
            Err(LayoutError::ZoneOverlap {
                kind: ElementKind::Separator
            })
        );
    }

    #[test]
    fn text_in_the_unprintable_band_is_rejected() {
        let mut config = SheetConfig::default();
        config.header[0].y_mm = 1.0;
        assert_eq!(
            compose(&config),
            Err(LayoutError::OutsidePrintable {
                kind: ElementKind::Text
            })
        );

        let mut config = SheetConfig::default();
        if let Some(footer) = config.footer.as_mut() {
            footer.y_mm = 296.5;
        }
        assert_eq!(
            compose(&config),
            Err(LayoutError::OutsidePrintable {
                kind: ElementKind::Text
            })
        );
    }

    #[test]
    fn text_extent_uses_nominal_advance() {
        let e = text_extent(PhysicalPoint::new(105.0, 20.0), "ABCD", 5.0);
        assert_relative_eq!(e.x, 99.0, epsilon = 1e-9);
        assert_relative_eq!(e.y, 17.5);
        assert_relative_eq!(e.width, 12.0, epsilon = 1e-9);
        assert_relative_eq!(e.height, 5.0);
    }

    #[test]
    fn ruler_extent_covers_labels() {
        let plan = compose(&SheetConfig::default()).expect("plan");
        let PlanElement::Ruler(top) = &plan.elements()[1] else {
            panic!("expected the top ruler after the frame");
        };
        let extent = ruler_extent(top);
        // labels sit 0.6 mm + half their size above the baseline at y = 34
        assert!(extent.y < 34.0 - 0.6 - 1.0);
        assert!(extent.y >= 30.0);
    }

    #[test]
    fn unknown_tag_id_is_a_pattern_error() {
        let mut config = SheetConfig::default();
        config.pattern = PatternConfig::Tag {
            id: 5000,
            size_mm: 160.0,
        };
        assert!(matches!(compose(&config), Err(LayoutError::Pattern(_))));
    }

    #[test]
    fn board_pattern_is_centred() {
        let mut config = SheetConfig::default();
        config.pattern = PatternConfig::Board {
            cols: 6,
            rows: 6,
            cell_mm: 20.0,
            marker_size_rel: 0.6,
        };
        let plan = compose(&config).expect("plan");
        let (_, target) = plan.fiducial().expect("fiducial");
        assert_eq!(*target, PhysicalRect::new(45.0, 60.0, 120.0, 120.0));
    }

    #[test]
    fn captions_describe_the_zone() {
        assert_eq!(
            ruler_caption(PhysicalRect::new(0.0, 0.0, 180.0, 175.0)),
            "Règles : Horizontal 0–18cm | Vertical 0–17.5cm"
        );
    }
}
