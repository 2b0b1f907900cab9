//! JSON-configurable sheet description.
//!
//! Every field has a default, so `{}` is a valid config and produces the
//! A4 v2.0 calibration sheet. Geometry is expressed in millimetres; the
//! composer derives every element position from [`ZoneConfig`] and the
//! insets below.

use metre_core::{Page, PageError, PhysicalRect};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Top-level sheet configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Identifier printed in the info block, e.g. `A4-CALIB-V2.0`.
    pub sheet_id: String,
    pub page: PageConfig,
    /// Border every printer is assumed to clip; nothing may be placed there.
    pub unprintable_margin_mm: f64,
    pub zone: ZoneConfig,
    pub pattern: PatternConfig,
    /// Name of a built-in marker dictionary.
    pub dictionary: String,
    pub rulers: RulerConfig,
    pub dotted_border: DottedBorderConfig,
    pub corner_crosses: CornerCrossConfig,
    pub header: Vec<TextLineConfig>,
    pub info: InfoConfig,
    pub logo_zone: LogoZoneConfig,
    pub scale_bar: Option<ScaleBarConfig>,
    pub footer: Option<TextLineConfig>,
    /// Font files tried in order; the built-in bitmap face is used when none loads.
    pub fonts: Vec<PathBuf>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_id: "A4-CALIB-V2.0".to_string(),
            page: PageConfig::default(),
            unprintable_margin_mm: 5.0,
            zone: ZoneConfig::default(),
            pattern: PatternConfig::default(),
            dictionary: "DICT_APRILTAG_36h11".to_string(),
            rulers: RulerConfig::default(),
            dotted_border: DottedBorderConfig::default(),
            corner_crosses: CornerCrossConfig::default(),
            header: vec![
                TextLineConfig::new("TOP ↑", 12.0, 6.0),
                TextLineConfig::new("⚠ NE PAS AJUSTER À LA PAGE ⚠", 20.0, 4.0),
                TextLineConfig::new("Imprimer à 100 % (taille réelle)", 26.0, 3.0),
            ],
            info: InfoConfig::default(),
            logo_zone: LogoZoneConfig::default(),
            scale_bar: Some(ScaleBarConfig::default()),
            footer: Some(TextLineConfig {
                text: "© 2Thier CRM - Si cette ligne est coupée, marge impression > 3cm".to_string(),
                y_mm: 287.0,
                size_mm: 2.0,
                shade: 128,
            }),
            fonts: default_font_candidates(),
        }
    }
}

impl SheetConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn page(&self) -> Result<Page, PageError> {
        Page::new(self.page.width_mm, self.page.height_mm, self.page.dpi)
    }

    /// The square calibration zone in page millimetres.
    pub fn zone_rect(&self) -> PhysicalRect {
        PhysicalRect::new(self.zone.x_mm, self.zone.y_mm, self.zone.size_mm, self.zone.size_mm)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub dpi: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            dpi: 300,
        }
    }
}

/// The framed square holding rulers, dots and the fiducial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub x_mm: f64,
    pub y_mm: f64,
    pub size_mm: f64,
    pub frame_thickness_mm: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            x_mm: 15.0,
            y_mm: 30.0,
            size_mm: 180.0,
            frame_thickness_mm: 0.8,
        }
    }
}

/// What is printed in the middle of the zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternConfig {
    /// A single square tag centred in the zone.
    Tag { id: u32, size_mm: f64 },
    /// A ChArUco board centred in the zone.
    Board {
        cols: u32,
        rows: u32,
        cell_mm: f64,
        #[serde(default = "default_marker_size_rel")]
        marker_size_rel: f32,
    },
}

fn default_marker_size_rel() -> f32 {
    0.6
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig::Tag {
            id: 33,
            size_mm: 160.0,
        }
    }
}

/// Millimetre rulers along the four zone sides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerConfig {
    /// Distance from the zone edge to the ruler baseline.
    pub inset_mm: f64,
    pub tick_every_mm: u32,
    /// Mid-length tick every N ticks.
    pub mid_every: u32,
    /// Labelled major tick every N ticks.
    pub major_every: u32,
    pub minor_len_mm: f64,
    pub mid_len_mm: f64,
    pub major_len_mm: f64,
    pub line_width_mm: f64,
    pub label_size_mm: f64,
    pub label_gap_mm: f64,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            inset_mm: 4.0,
            tick_every_mm: 1,
            mid_every: 5,
            major_every: 10,
            minor_len_mm: 1.5,
            mid_len_mm: 2.25,
            major_len_mm: 3.0,
            line_width_mm: 0.2,
            label_size_mm: 2.0,
            label_gap_mm: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DottedBorderConfig {
    pub inset_mm: f64,
    pub spacing_mm: f64,
    pub radius_mm: f64,
}

impl Default for DottedBorderConfig {
    fn default() -> Self {
        Self {
            inset_mm: 8.0,
            spacing_mm: 10.0,
            radius_mm: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerCrossConfig {
    pub inset_mm: f64,
    pub arm_mm: f64,
    pub width_mm: f64,
}

impl Default for CornerCrossConfig {
    fn default() -> Self {
        Self {
            inset_mm: 3.0,
            arm_mm: 5.0,
            width_mm: 0.6,
        }
    }
}

/// A single horizontally centred line of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextLineConfig {
    pub text: String,
    /// Vertical centre of the line.
    pub y_mm: f64,
    pub size_mm: f64,
    /// Light-sheet luminance; 0 is full ink.
    #[serde(default)]
    pub shade: u8,
}

impl TextLineConfig {
    pub fn new(text: impl Into<String>, y_mm: f64, size_mm: f64) -> Self {
        Self {
            text: text.into(),
            y_mm,
            size_mm,
            shade: 0,
        }
    }
}

/// Two lines under the zone describing the rulers and the sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    /// Distance from the zone bottom to the first line.
    pub gap_mm: f64,
    pub line_spacing_mm: f64,
    pub size_mm: f64,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            gap_mm: 5.0,
            line_spacing_mm: 5.0,
            size_mm: 2.5,
        }
    }
}

/// Band above the bottom margin carrying a separator and the logos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoZoneConfig {
    pub height_mm: f64,
    pub bottom_margin_mm: f64,
    pub separator_offset_mm: f64,
    pub separator_inset_mm: f64,
    /// Light-sheet luminance of the separator line.
    pub separator_shade: u8,
    pub logos_offset_mm: f64,
    /// Directory logo `asset` paths are resolved against.
    pub asset_dir: PathBuf,
    pub slots: Vec<LogoSlotConfig>,
}

impl Default for LogoZoneConfig {
    fn default() -> Self {
        Self {
            height_mm: 57.0,
            bottom_margin_mm: 30.0,
            separator_offset_mm: 15.0,
            separator_inset_mm: 20.0,
            separator_shade: 211,
            logos_offset_mm: 22.0,
            asset_dir: PathBuf::from("public/logos"),
            slots: vec![
                LogoSlotConfig::new("2thier.png", "2THIER", 25.0, 35.0, 5.0),
                LogoSlotConfig::new("metre-logo.png", "M²TRÉ", 85.0, 40.0, 8.0),
                LogoSlotConfig::new("crm-logo.png", "CRM", 150.0, 35.0, 5.0),
            ],
        }
    }
}

impl LogoZoneConfig {
    /// Top edge of the band for a page of the given height.
    pub fn top_mm(&self, page_height_mm: f64) -> f64 {
        page_height_mm - self.bottom_margin_mm - self.height_mm
    }
}

/// One reserved logo footprint. The placeholder is drawn when the asset
/// cannot be read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoSlotConfig {
    pub asset: PathBuf,
    pub placeholder: String,
    #[serde(default = "default_placeholder_size_mm")]
    pub placeholder_size_mm: f64,
    pub x_mm: f64,
    pub width_mm: f64,
    #[serde(default = "default_logo_height_mm")]
    pub height_mm: f64,
}

fn default_placeholder_size_mm() -> f64 {
    5.0
}

fn default_logo_height_mm() -> f64 {
    18.0
}

impl LogoSlotConfig {
    fn new(asset: &str, placeholder: &str, x_mm: f64, width_mm: f64, size_mm: f64) -> Self {
        Self {
            asset: PathBuf::from(asset),
            placeholder: placeholder.to_string(),
            placeholder_size_mm: size_mm,
            x_mm,
            width_mm,
            height_mm: default_logo_height_mm(),
        }
    }
}

/// Centimetre bar in the logo band used to verify print scale with a ruler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleBarConfig {
    pub x_mm: f64,
    /// Offset from the logo band top.
    pub offset_mm: f64,
    pub length_cm: u32,
    /// Labelled tick every N centimetres.
    pub label_every_cm: u32,
    pub caption: String,
}

impl Default for ScaleBarConfig {
    fn default() -> Self {
        Self {
            x_mm: 30.0,
            offset_mm: 45.0,
            length_cm: 15,
            label_every_cm: 5,
            caption: "cm (vérification)".to_string(),
        }
    }
}

fn default_font_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}
