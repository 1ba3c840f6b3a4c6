use clap::{Parser, Subcommand};
use print_album::album::AlbumBuilder;
use print_album::config::{self, AlbumConfig};
use print_album::imaging::{FaceDetector, NoFaceDetector, RustfaceDetector};
use print_album::{output, pdf, scan};
use std::path::PathBuf;
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "print-album")]
#[command(about = "Build a print-ready PDF album from a folder of photos")]
#[command(long_about = "\
Build a print-ready PDF album from a folder of photos

Each photo is cropped to the configured aspect ratio around the faces in it
(or its center when none are found), labeled with its filename, and stacked
in a centered column on letter-size pages.

Photo folder:

  photos/
  ├── album.toml      # Config (optional; see gen-config)
  ├── IMG_0001.jpg    # JPEG, PNG, BMP and TIFF are read
  ├── IMG_0002.png
  └── 2023/           # Only read with --recursive

Face detection uses a SeetaFace model file (seeta_fd_frontal_v1.0.bin), set
with --model or detector.model_path. Without one, every crop is centered.

Files that cannot be decoded are skipped and listed after the build.

Set RUST_LOG=info or RUST_LOG=debug for diagnostics.

Run 'print-album gen-config' to generate a documented album.toml.")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Flags shared by commands that read a photo folder.
#[derive(clap::Args, Clone)]
struct AlbumArgs {
    /// Folder containing the photos
    folder: PathBuf,

    /// Config file (default: album.toml in the photo folder)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Photos stacked on each page
    #[arg(long)]
    photos_per_page: Option<usize>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// SeetaFace face detection model file
    #[arg(long)]
    model: Option<PathBuf>,

    /// TrueType font for filename labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Do not draw filename labels
    #[arg(long)]
    no_labels: bool,

    /// Also read photos in subfolders
    #[arg(long)]
    recursive: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build the PDF album
    Build {
        #[command(flatten)]
        album: AlbumArgs,

        /// Output PDF
        #[arg(short, long, default_value = "album.pdf")]
        output: PathBuf,

        /// Also write the build report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Validate the config and list the photos without building
    Check(AlbumArgs),
    /// Print a stock album.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            album,
            output: pdf_path,
            report,
        } => {
            let config = resolve_config(&album)?;
            config.validate()?;
            init_thread_pool(&config.processing);
            let detector = load_detector(&config)?;

            println!("==> Scanning {}", album.folder.display());
            let files = scan::scan_folder(&album.folder, album.recursive)?;
            output::print_scan_output(&files, &album.folder);

            println!("==> Composing photos");
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_album_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = AlbumBuilder::new(config, detector)
                .with_events(tx)
                .build(&files);
            if printer.join().is_err() {
                log::error!("progress printer thread panicked");
            }
            let album_report = result?;

            let summary = album_report.summary();
            println!("==> Report");
            output::print_report(&summary);
            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
                println!("Report: {}", path.display());
            }

            println!("==> Writing {}", pdf_path.display());
            pdf::write_pdf(&album_report.pages, &album_report.geometry, &pdf_path)?;
            println!("==> Album complete: {}", pdf_path.display());
        }
        Command::Check(album) => {
            let config = resolve_config(&album)?;
            println!("==> Config");
            output::print_config_check(&config);
            config.validate()?;

            println!("==> Scanning {}", album.folder.display());
            let files = scan::scan_folder(&album.folder, album.recursive)?;
            output::print_scan_output(&files, &album.folder);
            if files.is_empty() {
                return Err(print_album::album::AlbumError::NoImages.into());
            }
            println!("==> Ready to build");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides. Not validated.
fn resolve_config(args: &AlbumArgs) -> Result<AlbumConfig, config::ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(config::ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            config::load_config_file(path)?
        }
        None => config::load_config(&args.folder)?,
    };

    if let Some(n) = args.photos_per_page {
        config.page.photos_per_page = n;
    }
    if let Some(dpi) = args.dpi {
        config.photo.dpi = dpi;
    }
    if let Some(model) = &args.model {
        config.detector.model_path = Some(model.clone());
    }
    if let Some(font) = &args.font {
        config.label.font_path = Some(font.clone());
    }
    if args.no_labels {
        config.label.enabled = false;
    }
    Ok(config)
}

/// Build the face detector once for the whole album.
///
/// A configured model that fails to load is fatal; no model means center crops.
fn load_detector(config: &AlbumConfig) -> Result<Arc<dyn FaceDetector>, Box<dyn std::error::Error>> {
    match config.detector.model_path.as_deref() {
        Some(path) => {
            log::info!("Loading face model {}", path.display());
            let detector = RustfaceDetector::from_model_file(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            Ok(Arc::new(detector))
        }
        None => {
            log::info!("No face model configured; crops will be centered");
            Ok(Arc::new(NoFaceDetector))
        }
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
