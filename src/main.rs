use clap::{Parser, Subcommand};
use simple_thumb::config::{self, ThumbConfig};
use simple_thumb::imaging::rust_backend::supported_input_extensions;
use simple_thumb::imaging::ScalingMode;
use simple_thumb::output::{self, RunSummary};
use simple_thumb::{StandardRename, Thumbnails};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

mod logging;

#[derive(Parser)]
#[command(name = "simple-thumb")]
#[command(about = "Create thumbnails from image files")]
#[command(long_about = "\
Create thumbnails from image files

Directories are searched recursively for supported images. Thumbnails are
written next to each original (renamed, e.g. photo.jpg -> thumbnail.photo.jpg)
or into --out-dir.

Images are turned upright according to their EXIF orientation before
resizing. Large reductions are done in several halving steps for quality.

Settings are read from simple-thumb.toml in the working directory (or
--config); flags override the file. Run 'simple-thumb gen-config' to
generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create thumbnails for files and directories
    Resize(ResizeArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Bounding box width
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Bounding box height
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Scale factor instead of a bounding box
    #[arg(long, conflicts_with_all = ["width", "height"])]
    scale: Option<f64>,

    /// Stretch to exactly width x height
    #[arg(long)]
    exact: bool,

    /// Output format (png, jpg, webp, ... or "original")
    #[arg(short, long)]
    format: Option<String>,

    /// Encoder quality, 0.0-1.0
    #[arg(short, long)]
    quality: Option<f32>,

    /// Interpolation: nearest, bilinear, bicubic, lanczos3
    #[arg(long)]
    scaling: Option<ScalingMode>,

    /// Ignore EXIF orientation
    #[arg(long)]
    no_exif: bool,

    /// Skip thumbnails whose destination exists
    #[arg(long)]
    no_overwrite: bool,

    /// Naming: no-change, prefix-dot-thumbnail, prefix-hyphen-thumbnail,
    /// suffix-dot-thumbnail, suffix-hyphen-thumbnail
    #[arg(long)]
    rename: Option<StandardRename>,

    /// Write thumbnails into this directory (created if missing)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl ResizeArgs {
    /// Layer the flags over the loaded config.
    fn override_config(&self, config: &mut ThumbConfig) {
        if self.width.is_some() || self.height.is_some() || self.scale.is_some() {
            config.size.width = self.width;
            config.size.height = self.height;
            config.size.scale = self.scale;
        }
        if self.exact {
            config.size.keep_aspect_ratio = false;
        }
        if let Some(format) = &self.format {
            config.output.format = Some(format.clone());
        }
        if let Some(quality) = self.quality {
            config.output.quality = Some(quality);
        }
        if let Some(scaling) = self.scaling {
            config.processing.scaling = scaling;
        }
        if self.no_exif {
            config.processing.exif_orientation = false;
        }
        if self.no_overwrite {
            config.output.allow_overwrite = false;
        }
        if let Some(rename) = self.rename {
            config.output.rename = rename;
        }
        if let Some(dir) = &self.out_dir {
            config.output.directory = Some(dir.clone());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match cli.command {
        Command::Resize(args) => resize(&args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn resize(args: &ResizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config::load_config(&args.config)?;
    args.override_config(&mut config);
    config.validate()?;
    if !config.size.is_set() {
        return Err(format!(
            "no thumbnail size: pass --width/--height/--scale or set [size] in {}",
            args.config.display()
        )
        .into());
    }

    let inputs = collect_inputs(&args.inputs);
    debug!(count = inputs.len(), "collected inputs");

    let builder = config.apply(Thumbnails::of(inputs.iter().map(PathBuf::as_path)));
    let rename = config.output.rename;
    let written = match &config.output.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            builder.as_files_in_dir(dir, rename)?
        }
        None => builder.as_files_renamed(rename)?,
    };

    let summary = RunSummary::new(inputs.len(), written);
    if args.json {
        output::print_run_json(&summary)?;
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        output::print_run_output(&summary, &cwd);
    }
    Ok(())
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| supported_input_extensions().contains(&e.as_str()))
}

/// Expand directories into the supported images below them, in name order.
/// Explicit file arguments are kept as given.
fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    for path in paths {
        if !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() && has_supported_extension(entry.path()) => {
                    inputs.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable entry"),
            }
        }
    }
    inputs
}
