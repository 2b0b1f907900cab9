use metre_print::{generate, write_variants, SheetConfig};
use std::io::Cursor;

fn small_config() -> SheetConfig {
    let mut config = SheetConfig::default();
    config.page.dpi = 72;
    config.fonts.clear();
    config.logo_zone.asset_dir = "/nonexistent/logos".into();
    config
}

#[test]
fn writes_png_and_pdf_for_both_variants() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("printable");
    let pair = generate(&small_config()).expect("generate");
    let files = write_variants(&out, "metre-a4-v2.0", &pair).expect("write");

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].png, out.join("metre-a4-v2.0-light.png"));
    assert_eq!(files[1].pdf, out.join("metre-a4-v2.0-dark.pdf"));

    for f in &files {
        let png = std::fs::read(&f.png).expect("read png");
        let reader = png::Decoder::new(Cursor::new(png.as_slice()))
            .read_info()
            .expect("png header");
        let info = reader.info();
        assert_eq!((info.width, info.height), pair.light.page.size_px());
        assert_eq!(info.pixel_dims.expect("pHYs").xppu, 2835);

        let pdf = lopdf::Document::load(&f.pdf).expect("pdf");
        assert_eq!(pdf.get_pages().len(), 1);
    }
}

#[test]
fn config_round_trips_through_json_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sheet.json");
    let mut config = SheetConfig::default();
    config.sheet_id = "A4-CALIB-TEST".to_string();
    config.scale_bar = None;
    config.write_json(&path).expect("write");
    let loaded = SheetConfig::load_json(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn malformed_config_is_a_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"page\": 12 }").expect("write");
    assert!(matches!(
        SheetConfig::load_json(&path),
        Err(metre_print::ConfigIoError::Json(_))
    ));
}

#[test]
fn blocked_destination_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("printable");
    std::fs::create_dir_all(out.join("metre-a4-v2.0-dark.pdf")).expect("blocker");
    let pair = generate(&small_config()).expect("generate");

    assert!(write_variants(&out, "metre-a4-v2.0", &pair).is_err());
    assert!(!out.join("metre-a4-v2.0-light.png").exists());
    assert!(!out.join("metre-a4-v2.0-light.pdf").exists());
    assert!(!out.join("metre-a4-v2.0-dark.png").exists());
    assert_eq!(std::fs::read_dir(&out).expect("read dir").count(), 1);
}
