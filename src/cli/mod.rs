//! # CLI Module
//!
//! Command-line interface for the gallery builder.
//!
//! ## Usage
//! ```bash
//! # Resolve metadata for one storage key
//! gallery-builder extract albums/2024-trip/photo.jpg
//!
//! # With an EXIF sidecar and JSON output
//! gallery-builder extract albums/photo.jpg --exif picked.json --output json
//!
//! # Build the full gallery manifest
//! gallery-builder build ~/Photos --config config.json --manifest manifest.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use gallery_builder::config::UserConfig;
use gallery_builder::core::manifest::{BuildResult, ManifestBuilder};
use gallery_builder::core::scanner::ScanConfig;
use gallery_builder::error::ConfigError;
use gallery_builder::events::{BuildEvent, Event, EventChannel, ExtractEvent, ScanEvent};
use gallery_builder::{PhotoInfoExtractor, PickedExif, Result, StorageConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Gallery Builder - photo metadata and manifests for static galleries
#[derive(Parser, Debug)]
#[command(name = "gallery-builder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve display metadata for a single storage key
    Extract {
        /// Storage key, e.g. albums/2024-trip/photo.jpg
        key: String,

        /// EXIF sidecar (JSON with EXIF field names) to resolve against
        #[arg(short, long)]
        exif: Option<PathBuf>,

        /// Path to config.json
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Storage prefix, overriding the configured one
        #[arg(short, long)]
        prefix: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Build the gallery manifest from a photo directory
    Build {
        /// Directory containing the photos
        photos_dir: PathBuf,

        /// Path to config.json
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the manifest
        #[arg(short, long, default_value = "manifest.json")]
        manifest: PathBuf,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose progress (shows the key being processed)
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    gallery_builder::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            key,
            exif,
            config,
            prefix,
            output,
        } => run_extract(&key, exif.as_deref(), config.as_deref(), prefix, output),
        Commands::Build {
            photos_dir,
            config,
            manifest,
            include_hidden,
            output,
            verbose,
        } => run_build(
            photos_dir,
            config.as_deref(),
            manifest,
            include_hidden,
            output,
            verbose,
        ),
    }
}

/// Load user configuration, falling back to defaults plus an optional
/// prefix override when no file is given.
fn load_config(path: Option<&Path>, prefix: Option<String>) -> Result<UserConfig> {
    let mut config = match path {
        Some(path) => UserConfig::load(path)?,
        None => UserConfig::default(),
    };
    if let Some(prefix) = prefix {
        config.storage = StorageConfig { prefix };
    }
    Ok(config)
}

/// Parse an EXIF sidecar file into a picked record.
fn load_exif_sidecar(path: &Path) -> Result<PickedExif> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let picked = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(picked)
}

fn run_extract(
    key: &str,
    exif_path: Option<&Path>,
    config_path: Option<&Path>,
    prefix: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path, prefix)?;
    let exif = exif_path.map(load_exif_sidecar).transpose()?;

    let extractor = PhotoInfoExtractor::new(&config.storage);
    let info = extractor.extract(key, exif.as_ref());

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info).unwrap_or_default());
        }
        OutputFormat::Pretty => {
            let term = Term::stdout();
            term.write_line(&format!("{}  {}", style("key").dim(), key)).ok();
            term.write_line(&format!("{}  {}", style("title").cyan(), info.title))
                .ok();
            term.write_line(&format!(
                "{}  {}",
                style("taken").cyan(),
                info.date_taken.to_rfc3339()
            ))
            .ok();
            term.write_line(&format!(
                "{}  {}",
                style("tags").cyan(),
                if info.tags.is_empty() {
                    style("(none)").dim().to_string()
                } else {
                    info.tags.join(", ")
                }
            ))
            .ok();
            term.write_line(&format!(
                "{}  {}",
                style("descr").cyan(),
                if info.description.is_empty() {
                    style("(none)").dim().to_string()
                } else {
                    info.description.clone()
                }
            ))
            .ok();
        }
    }

    Ok(())
}

fn run_build(
    photos_dir: PathBuf,
    config_path: Option<&Path>,
    manifest_path: PathBuf,
    include_hidden: bool,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Gallery Builder").bold().cyan(),
            style(env!("CARGO_PKG_VERSION")).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let config = load_config(config_path, None)?;
    let scan_config = ScanConfig {
        include_hidden,
        ..Default::default()
    };

    let builder = ManifestBuilder::new(&photos_dir)
        .config(config)
        .scan_config(scan_config)
        .manifest_path(&manifest_path);

    // Event channel feeds the progress bar
    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Scan(ScanEvent::Started { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message("scanning");
                    }
                }
                Event::Extract(ExtractEvent::Started { total }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total as u64);
                        pb.set_message("extracting");
                    }
                }
                Event::Extract(ExtractEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose {
                            pb.set_message(p.current_key.clone());
                        }
                    }
                }
                Event::Build(BuildEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let result = builder.run_with_events(&sender);

    // Drop sender to signal the event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match output {
        OutputFormat::Pretty => print_pretty_build(&term, &result, &manifest_path),
        OutputFormat::Json => print_json_build(&result, &manifest_path),
    }

    Ok(())
}

fn print_pretty_build(term: &Term, result: &BuildResult, manifest_path: &Path) {
    term.write_line("").ok();
    term.write_line(&format!("{} Build Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} photos in {:.1}s",
        style(result.manifest.photos.len()).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  manifest written to {}",
        style(manifest_path.display()).cyan()
    ))
    .ok();

    if !result.errors.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "  {} {} file(s) skipped:",
            style("!").yellow().bold(),
            result.errors.len()
        ))
        .ok();
        for error in &result.errors {
            term.write_line(&format!("    {}", style(error).dim())).ok();
        }
    }
}

fn print_json_build(result: &BuildResult, manifest_path: &Path) {
    let summary = serde_json::json!({
        "photos": result.manifest.photos.len(),
        "manifest": manifest_path.display().to_string(),
        "durationMs": result.duration_ms,
        "errors": result.errors,
    });
    println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
}
