//! PNG and PDF output.
//!
//! Both encoders produce complete byte buffers. [`write_encoded`] stages
//! every buffer in a temporary file next to its destination and only then
//! moves them into place, so a failing encoder or a failed write never
//! leaves a partial set of sheets behind.

use crate::render::RenderedSheet;
use flate2::{write::ZlibEncoder, Compression};
use image::RgbImage;
use log::info;
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream,
};
use metre_core::{Page, Variant, MM_PER_INCH};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("pdf encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Pixels per metre for a print resolution, as stored in the PNG `pHYs` chunk.
pub fn pixels_per_metre(dpi: u32) -> u32 {
    (f64::from(dpi) * 1000.0 / MM_PER_INCH).round() as u32
}

/// Encode an RGB raster as PNG tagged with its print resolution.
pub fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = pixels_per_metre(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Wrap a raster in a single-page PDF whose media box is the physical page,
/// so the image prints at exactly the page size.
pub fn encode_pdf(image: &RgbImage, page: &Page) -> Result<Vec<u8>, ExportError> {
    let (w_pt, h_pt) = page.size_pt();
    let (w_pt, h_pt) = (w_pt as f32, h_pt as f32);

    let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
    zlib.write_all(image.as_raw())?;
    let pixels = zlib.finish()?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image_id = doc.add_object(
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width()),
                "Height" => i64::from(image.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "FlateDecode",
            },
            pixels,
        )
        .with_compression(false),
    );
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    w_pt.into(),
                    0_i64.into(),
                    0_i64.into(),
                    h_pt.into(),
                    0_i64.into(),
                    0_i64.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![0_i64.into(), 0_i64.into(), w_pt.into(), h_pt.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

/// Paths of the two files written for one rendered sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFiles {
    pub png: PathBuf,
    pub pdf: PathBuf,
}

/// PNG and PDF bytes of one rendered sheet, not yet on disk.
#[derive(Clone, Debug)]
pub struct EncodedSheet {
    pub variant: Variant,
    pub png: Vec<u8>,
    pub pdf: Vec<u8>,
}

impl EncodedSheet {
    /// Destinations of this sheet: `<stem>-<variant>.png` and `.pdf` in `dir`.
    pub fn paths(&self, dir: &Path, stem: &str) -> ExportedFiles {
        let base = format!("{stem}-{}", self.variant);
        ExportedFiles {
            png: dir.join(format!("{base}.png")),
            pdf: dir.join(format!("{base}.pdf")),
        }
    }

    /// Write this sheet's PNG and PDF into `dir`, both or neither.
    pub fn write(&self, dir: &Path, stem: &str) -> Result<ExportedFiles, ExportError> {
        let mut written = write_encoded(dir, stem, std::slice::from_ref(self))?;
        Ok(written.remove(0))
    }
}

fn stage(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile, ExportError> {
    let mut file = tempfile::Builder::new()
        .prefix(".metre-")
        .suffix(".part")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}

/// Write every sheet into `dir`, all files or none.
///
/// Bytes go to hidden temporary files first; staged files that are never
/// persisted are removed when dropped. If moving a file into place fails,
/// the files already moved are deleted again.
pub fn write_encoded(
    dir: &Path,
    stem: &str,
    sheets: &[EncodedSheet],
) -> Result<Vec<ExportedFiles>, ExportError> {
    fs::create_dir_all(dir)?;
    let mut staged = Vec::with_capacity(2 * sheets.len());
    let mut written = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let files = sheet.paths(dir, stem);
        staged.push((stage(dir, &sheet.png)?, files.png.clone()));
        staged.push((stage(dir, &sheet.pdf)?, files.pdf.clone()));
        written.push(files);
    }

    let mut persisted: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        if let Err(err) = file.persist(&path) {
            for done in &persisted {
                let _ = fs::remove_file(done);
            }
            return Err(err.error.into());
        }
        persisted.push(path);
    }
    for files in &written {
        info!("wrote {} and {}", files.png.display(), files.pdf.display());
    }
    Ok(written)
}

pub fn encode_sheet(sheet: &RenderedSheet) -> Result<EncodedSheet, ExportError> {
    Ok(EncodedSheet {
        variant: sheet.variant,
        png: encode_png(&sheet.image, sheet.page.dpi())?,
        pdf: encode_pdf(&sheet.image, &sheet.page)?,
    })
}

/// Encode then write one sheet; nothing is written if encoding fails.
pub fn write_sheet(dir: &Path, stem: &str, sheet: &RenderedSheet) -> Result<ExportedFiles, ExportError> {
    encode_sheet(sheet)?.write(dir, stem)
}
