use approx::assert_relative_eq;
use image::{Rgba, RgbaImage};
use metre_core::{PixelRect, Variant};
use metre_print::{
    marker_encoder, ElementKind, LayoutError, LayoutPlan, LogoContent, PatternConfig,
    PlanElement, SheetConfig, SheetRenderer, TextFace, VariantPair,
};

/// Default sheet with the bitmap face so output does not depend on installed fonts.
fn config_at(dpi: u32) -> SheetConfig {
    let mut config = SheetConfig::default();
    config.page.dpi = dpi;
    config.fonts.clear();
    config.logo_zone.asset_dir = "/nonexistent/logos".into();
    config
}

fn render_pair(config: &SheetConfig) -> (LayoutPlan, VariantPair) {
    let renderer = SheetRenderer::new(
        Box::new(marker_encoder(config).expect("encoder")),
        TextFace::load(&config.fonts),
    );
    let plan = LayoutPlan::compose(config, renderer.encoder()).expect("compose");
    let pair = renderer.render_variants(&plan).expect("render");
    (plan, pair)
}

fn fiducial_bounds(pair: &VariantPair, variant: Variant) -> PixelRect {
    pair.get(variant)
        .placements_of(ElementKind::Fiducial)
        .next()
        .expect("fiducial placement")
        .bounds
}

#[test]
fn a4_at_300_dpi_places_tag_at_known_pixels() {
    let (_, pair) = render_pair(&config_at(300));
    let light = &pair.light;
    assert_eq!(light.image.dimensions(), (2480, 3508));

    let tag = fiducial_bounds(&pair, Variant::Light);
    assert_eq!(tag, PixelRect::new(295, 472, 1890, 1890));

    // the tag's outer border module is ink, the pixel before it is paper
    assert_eq!(light.image.get_pixel(295, 472).0, [0, 0, 0]);
    assert_eq!(light.image.get_pixel(295 + 1889, 472 + 1889).0, [0, 0, 0]);
    assert_eq!(light.image.get_pixel(294, 1000).0, [255, 255, 255]);
}

#[test]
fn variants_share_geometry_and_invert_pixels() {
    let (plan, pair) = render_pair(&config_at(100));
    assert_eq!(pair.light.placements, pair.dark.placements);
    assert_eq!(pair.light.placements.len(), plan.elements().len());
    assert_eq!(pair.light.image.dimensions(), pair.dark.image.dimensions());

    for (l, d) in pair.light.image.pixels().zip(pair.dark.image.pixels()) {
        for c in 0..3 {
            assert_eq!(d.0[c], 255 - l.0[c]);
        }
    }
}

#[test]
fn dark_tag_is_inverted_bitmap() {
    let (_, pair) = render_pair(&config_at(100));
    let tag = fiducial_bounds(&pair, Variant::Dark);
    let (x, y) = (tag.x as u32, tag.y as u32);
    assert_eq!(pair.dark.image.get_pixel(x, y).0, [255, 255, 255]);
    assert_eq!(pair.light.image.get_pixel(x, y).0, [0, 0, 0]);
}

#[test]
fn dotted_border_is_uniform_on_every_side() {
    let (plan, pair) = render_pair(&config_at(200));
    let dotted = plan.dotted_border().expect("dotted border");
    let dots = dotted.centers();
    assert_eq!(dots.len(), 4 * 17);
    for side in dots.chunks(17) {
        let gaps: Vec<f64> = side.windows(2).map(|w| w[0].distance(w[1])).collect();
        for gap in &gaps {
            assert_relative_eq!(*gap, gaps[0], epsilon = 1e-9);
            assert!(*gap >= dotted.spacing_mm * 0.99);
        }
    }
    assert!(dots.iter().all(|d| dotted.rect.contains_point(*d)));

    let page = *plan.page();
    for dot in &dots {
        let (x, y) = (page.to_coord(dot.x) as u32, page.to_coord(dot.y) as u32);
        assert_eq!(pair.light.image.get_pixel(x, y).0, [0, 0, 0]);
    }
}

#[test]
fn containment_chain_holds_for_default_sheet() {
    let (plan, pair) = render_pair(&config_at(100));
    let bounds_of = |kind| {
        pair.light
            .placements_of(kind)
            .next()
            .expect("placement")
            .bounds
    };
    let frame = bounds_of(ElementKind::Frame);
    let dotted = bounds_of(ElementKind::DottedBorder);
    let tag = bounds_of(ElementKind::Fiducial);
    assert!(frame.contains(&dotted));
    assert!(dotted.contains(&tag));

    let printable = plan.page().printable(5.0);
    for element in plan.elements() {
        assert!(
            printable.contains_rect(&element.extent_mm()),
            "{:?}",
            element.kind()
        );
    }
}

/// Either the chain fiducial ⊂ dots ⊂ frame ⊂ printable holds and nothing
/// around the zone covers it, or composition fails with a geometry error.
fn check_chain(config: &SheetConfig) -> bool {
    let encoder = marker_encoder(config).expect("encoder");
    let plan = match LayoutPlan::compose(config, &encoder) {
        Ok(plan) => plan,
        Err(err) => {
            assert!(
                matches!(
                    err,
                    LayoutError::NotContained { .. }
                        | LayoutError::OutsidePrintable { .. }
                        | LayoutError::ZoneOverlap { .. }
                ),
                "unexpected error {err:?} for {:?} / {:?}",
                config.zone,
                config.pattern
            );
            return false;
        }
    };

    let zone = plan.zone();
    let (_, target) = plan.fiducial().expect("fiducial");
    let dotted = plan.dotted_border().expect("dotted border");
    let printable = plan.page().printable(config.unprintable_margin_mm);
    assert!(dotted.rect.inset(dotted.radius_mm).strictly_contains_rect(target));
    assert!(zone
        .inset(config.zone.frame_thickness_mm)
        .strictly_contains_rect(&dotted.rect.inset(-dotted.radius_mm)));
    assert!(printable.contains_rect(&zone));
    for element in plan.elements() {
        let extent = element.extent_mm();
        assert!(printable.contains_rect(&extent), "{:?}", element.kind());
        if matches!(element.kind(), ElementKind::Logo | ElementKind::Separator) {
            assert!(!extent.overlaps(&zone), "{:?} over the zone", element.kind());
        }
    }
    true
}

#[test]
fn containment_holds_across_layout_constants() {
    let mut accepted = 0;
    let mut rejected = 0;
    for x in [5.0, 15.0, 25.0] {
        for y in [5.0, 30.0, 45.0, 85.0] {
            for size in [100.0, 150.0, 180.0, 200.0] {
                for inset in [0.5, 8.0, 14.0] {
                    let patterns = [
                        PatternConfig::Tag { id: 33, size_mm: size - 20.0 },
                        PatternConfig::Tag { id: 0, size_mm: size * 0.5 },
                        PatternConfig::Board {
                            cols: 5,
                            rows: 4,
                            cell_mm: size / 7.0,
                            marker_size_rel: 0.7,
                        },
                    ];
                    for pattern in patterns {
                        let mut config = config_at(50);
                        config.zone.x_mm = x;
                        config.zone.y_mm = y;
                        config.zone.size_mm = size;
                        config.dotted_border.inset_mm = inset;
                        config.pattern = pattern;
                        if check_chain(&config) {
                            accepted += 1;
                        } else {
                            rejected += 1;
                        }
                    }
                }
            }
        }
    }
    assert!(accepted > 0 && rejected > 0, "{accepted} accepted, {rejected} rejected");
}

#[test]
fn missing_logos_render_as_placeholders() {
    let config = config_at(100);
    let (plan, pair) = render_pair(&config);
    let logos: Vec<_> = plan
        .elements()
        .iter()
        .filter_map(|e| match e {
            PlanElement::Logo { footprint, content } => Some((footprint, content)),
            _ => None,
        })
        .collect();
    assert_eq!(logos.len(), 3);
    assert!(logos.iter().all(|(_, c)| c.is_placeholder()));

    // placeholder occupies its whole footprint
    let page = *plan.page();
    let placed: Vec<PixelRect> = pair
        .light
        .placements_of(ElementKind::Logo)
        .map(|p| p.bounds)
        .collect();
    for ((footprint, _), bounds) in logos.iter().zip(&placed) {
        assert_eq!(bounds.x, page.to_coord(footprint.x));
        assert_eq!(bounds.width, page.to_px(footprint.width));
    }
}

#[test]
fn logo_files_are_fitted_into_their_slot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logo = RgbaImage::from_pixel(800, 100, Rgba([0, 0, 0, 255]));
    logo.save(dir.path().join("crm-logo.png")).expect("save logo");

    let mut config = config_at(100);
    config.logo_zone.asset_dir = dir.path().to_path_buf();
    let (plan, pair) = render_pair(&config);

    let crm = plan
        .elements()
        .iter()
        .find_map(|e| match e {
            PlanElement::Logo { footprint, content } if footprint.x == 150.0 => Some(content),
            _ => None,
        })
        .expect("crm slot");
    let LogoContent::Image(img) = crm else {
        panic!("expected decoded logo");
    };
    // 35 x 18 mm at 100 dpi is 138 x 71 px; 8:1 aspect fits by width
    assert_eq!(img.dimensions(), (138, 17));

    let placed = pair
        .dark
        .placements_of(ElementKind::Logo)
        .nth(2)
        .expect("third logo")
        .bounds;
    assert_eq!((placed.width, placed.height), (138, 17));
    // black logo turns white on the dark sheet
    let (cx, cy) = (placed.x as u32 + 69, placed.y as u32 + 8);
    assert_eq!(pair.dark.image.get_pixel(cx, cy).0, [255, 255, 255]);
}

#[test]
fn board_pattern_renders_in_zone() {
    let mut config = config_at(100);
    config.pattern = PatternConfig::Board {
        cols: 6,
        rows: 6,
        cell_mm: 20.0,
        marker_size_rel: 0.6,
    };
    let (_, pair) = render_pair(&config);
    let board = fiducial_bounds(&pair, Variant::Light);
    // 120 mm at 100 dpi
    assert_eq!((board.width, board.height), (472, 472));
    // top-left square is black
    assert_eq!(
        pair.light.image.get_pixel(board.x as u32 + 2, board.y as u32 + 2).0,
        [0, 0, 0]
    );
}
