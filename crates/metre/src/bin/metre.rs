use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use metre::print::{encode_sheet, write_encoded, ElementKind, PlanElement};
use metre::{marker_encoder, LayoutPlan, SheetConfig, SheetRenderer, TextFace, Variant};

#[cfg(not(feature = "tracing"))]
use log::info;
#[cfg(feature = "tracing")]
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "metre", version, about = "Printable calibration sheet generator")]
struct Cli {
    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,
    /// Emit JSON logs (only with the `tracing` feature).
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the sheet and write PNG + PDF files.
    Generate(GenerateArgs),
    /// Write the default sheet config as JSON.
    InitConfig {
        /// Destination file.
        path: PathBuf,
    },
    /// List the built-in marker dictionaries.
    Dictionaries,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// JSON sheet config; defaults to the built-in A4 sheet.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "public/printable")]
    out_dir: PathBuf,
    /// File name stem; `-light`/`-dark` and the extension are appended.
    #[arg(long, default_value = "metre-a4-v2.0")]
    stem: String,
    #[arg(long, value_enum, default_value_t = VariantArg::Both)]
    variant: VariantArg,
    /// Override the print resolution from the config.
    #[arg(long)]
    dpi: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Light,
    Dark,
    Both,
}

impl VariantArg {
    fn variants(self) -> &'static [Variant] {
        match self {
            VariantArg::Light => &[Variant::Light],
            VariantArg::Dark => &[Variant::Dark],
            VariantArg::Both => &Variant::ALL,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    {
        let _ = cli.json_logs;
        metre::init_with_level(cli.log_level)?;
    }
    #[cfg(feature = "tracing")]
    {
        // RUST_LOG drives the subscriber filter
        let _ = cli.log_level;
        metre::core::init_tracing(cli.json_logs);
    }

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::InitConfig { path } => init_config(&path),
        Command::Dictionaries => {
            for name in metre::aruco::builtins::BUILTIN_DICTIONARY_NAMES {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn init_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    SheetConfig::default().write_json(path)?;
    info!("wrote default config to {}", path.display());
    Ok(())
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(args)))]
fn generate(args: &GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SheetConfig::load_json(path)?,
        None => SheetConfig::default(),
    };
    if let Some(dpi) = args.dpi {
        config.page.dpi = dpi;
    }

    let renderer = SheetRenderer::new(
        Box::new(marker_encoder(&config)?),
        TextFace::load(&config.fonts),
    );
    let plan = LayoutPlan::compose(&config, renderer.encoder())?;
    let page = plan.page();
    let (w, h) = page.size_px();
    let ticks: usize = plan
        .elements()
        .iter()
        .filter_map(|e| match e {
            PlanElement::Ruler(r) => Some(r.ticks().len()),
            _ => None,
        })
        .sum();
    let dots = plan.dotted_border().map_or(0, |d| d.centers().len());
    let zone = plan.zone();
    info!(
        "sheet {}: {} x {} mm at {} dpi ({w} x {h} px), zone {} mm at ({}, {}), {:?}",
        config.sheet_id,
        page.width_mm(),
        page.height_mm(),
        page.dpi(),
        zone.width,
        zone.x,
        zone.y,
        config.pattern
    );
    info!(
        "{} elements, {ticks} ruler ticks, {dots} border dots",
        plan.elements().len()
    );

    let mut encoded = Vec::new();
    for &variant in args.variant.variants() {
        let sheet = renderer.render(&plan, variant)?;
        if let Some(tag) = sheet.placements_of(ElementKind::Fiducial).next() {
            info!(
                "{variant}: fiducial at ({}, {}) px, {} x {} px",
                tag.bounds.x, tag.bounds.y, tag.bounds.width, tag.bounds.height
            );
        }
        encoded.push(encode_sheet(&sheet)?);
    }

    let written = write_encoded(&args.out_dir, &args.stem, &encoded)?;
    for files in &written {
        println!("{}", files.png.display());
        println!("{}", files.pdf.display());
    }
    Ok(())
}
