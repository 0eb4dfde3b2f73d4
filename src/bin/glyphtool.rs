use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use glyph_crop::page::{BookSpread, DEFAULT_DPI, SpreadLayout};
use glyph_crop::tools::{load_rgb, render_marker};
use glyph_crop::{DetectedMarker, Detector, Rotation};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glyphtool", version, about = "Glyph marker detection and page cropping")]
struct Cli {
    /// Log per-marker decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the markers found in an image
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// Print markers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Crop both pages of a book spread
    Crop {
        #[arg(long)]
        image: PathBuf,
        /// Marker rectangle width in inches
        #[arg(long, required_unless_present = "layout")]
        page_width: Option<f32>,
        /// Marker rectangle height in inches
        #[arg(long, required_unless_present = "layout")]
        page_height: Option<f32>,
        #[arg(long, default_value_t = DEFAULT_DPI)]
        dpi: f32,
        /// Spread layout JSON, replacing the standard book layout
        #[arg(long)]
        layout: Option<PathBuf>,
        #[arg(long)]
        left_out: PathBuf,
        #[arg(long)]
        right_out: PathBuf,
    },
    /// Draw a glyph as an image
    Render {
        #[arg(long)]
        id: u8,
        /// Clockwise rotation: 0, 90, 180 or 270
        #[arg(long, default_value_t = 0)]
        rotation: u32,
        /// Pixels per grid cell
        #[arg(long, default_value_t = 20)]
        cell_size: u32,
        /// Paper border in cells
        #[arg(long, default_value_t = 1)]
        quiet: u32,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Detect { image, json } => detect_cmd(&image, json),
        Command::Crop {
            image,
            page_width,
            page_height,
            dpi,
            layout,
            left_out,
            right_out,
        } => {
            let spread = match layout {
                Some(path) => read_layout(&path)?,
                None => match (page_width, page_height) {
                    (Some(w), Some(h)) => SpreadLayout::book(w, h, dpi),
                    _ => bail!("--page-width and --page-height are required without --layout"),
                },
            };
            crop_cmd(&image, &spread, &left_out, &right_out)
        }
        Command::Render {
            id,
            rotation,
            cell_size,
            quiet,
            out,
        } => render_cmd(id, rotation, cell_size, quiet, &out),
    }
}

fn detect(image: &Path) -> Result<(image::RgbImage, Vec<DetectedMarker>)> {
    let rgb = load_rgb(image).with_context(|| format!("failed to load {}", image.display()))?;
    let gray = DynamicImage::ImageRgb8(rgb.clone()).to_luma8();

    let start = Instant::now();
    let markers = Detector::from_env().detect(&gray)?;
    tracing::info!(
        image = %image.display(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "detected {} markers",
        markers.len()
    );
    Ok((rgb, markers))
}

fn detect_cmd(image: &Path, json: bool) -> Result<()> {
    let (rgb, markers) = detect(image)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
        return Ok(());
    }

    println!("Image: {} ({}x{})", image.display(), rgb.width(), rgb.height());
    println!("Found {} markers", markers.len());
    for marker in &markers {
        let anchor = marker.anchor();
        println!(
            "  Marker {:2}: rotation={:3}, anchor=({:.1}, {:.1}), area={:.0}",
            marker.id,
            marker.rotation.degrees(),
            anchor.x,
            anchor.y,
            marker.area
        );
    }
    Ok(())
}

fn read_layout(path: &Path) -> Result<SpreadLayout> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid layout {}", path.display()))
}

fn crop_cmd(image: &Path, layout: &SpreadLayout, left_out: &Path, right_out: &Path) -> Result<()> {
    let (rgb, markers) = detect(image)?;
    let spread = BookSpread::new(&rgb, &markers);

    let mut failed = 0;
    let (left, right) = spread.spread_images(layout);
    for (name, page, out) in [("left", left, left_out), ("right", right, right_out)] {
        match page {
            Ok(page) => {
                page.save(out)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("{name} page: {}x{} -> {}", page.width(), page.height(), out.display());
            }
            Err(err) => {
                eprintln!("{name} page: {err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} page(s) could not be cropped");
    }
    Ok(())
}

fn render_cmd(id: u8, rotation: u32, cell_size: u32, quiet: u32, out: &Path) -> Result<()> {
    let Some(rotation) = Rotation::from_degrees(rotation) else {
        bail!("rotation must be 0, 90, 180 or 270, got {rotation}");
    };
    if id > 15 {
        bail!("marker id must be 0-15, got {id}");
    }
    let Some(glyph) = render_marker(id, rotation, cell_size, quiet) else {
        bail!("glyph of {cell_size} px cells with {quiet} quiet cells is too large");
    };
    glyph
        .save(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Marker {id} ({}°) -> {}", rotation.degrees(), out.display());
    Ok(())
}
