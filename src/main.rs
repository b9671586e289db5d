use clap::{Parser, Subcommand};
use gallery_index::{build, config, output, persist, resolve};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gallery-index")]
#[command(version)]
#[command(about = "Build the static JSON gallery manifest for a landmark site")]
#[command(long_about = "\
Build the static JSON gallery manifest for a landmark site

Every subfolder of the gallery root is a landmark; its image files become
that landmark's gallery. The manifest lets the site list images without a
server-side directory listing.

  public/gallery/
  ├── 1_Fort/
  │   ├── a.jpg            → indexed
  │   └── notes.txt        → not an image
  ├── 2_Mosque/
  │   └── c.png
  └── 3_Empty/             → omitted (no images)

  public/galleryIndex.json
  {
    \"1_Fort\": [\"a.jpg\"],
    \"2_Mosque\": [\"c.png\"]
  }

Keys and filenames are sorted case-insensitively, so rebuilding an
unchanged tree produces byte-identical output. The file is replaced
atomically.

Settings are read from gallery-index.toml if present, or from the file
named by --config, which must exist; flags and
GALLERY_INDEX_* environment variables override it. Run
'gallery-index gen-config' for a documented config file.")]
struct Cli {
    /// Config file [default: gallery-index.toml, if present]
    #[arg(long, env = "GALLERY_INDEX_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Gallery root: one subfolder per landmark
    #[arg(long, env = "GALLERY_INDEX_ROOT", global = true)]
    gallery_root: Option<PathBuf>,

    /// Manifest output path
    #[arg(long, env = "GALLERY_INDEX_OUTPUT", global = true)]
    output: Option<PathBuf>,

    /// Recognized image extension (repeatable; replaces the configured list)
    #[arg(long = "extension", value_name = "EXT", global = true)]
    extensions: Vec<String>,

    /// Treat symlinks as their targets
    #[arg(long, global = true)]
    follow_links: bool,

    /// Index folders and files whose names start with a dot
    #[arg(long, global = true)]
    include_hidden: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the gallery root and write the manifest (default)
    Build {
        /// Print every indexed folder and image
        #[arg(long)]
        list: bool,
    },
    /// Report whether the manifest on disk matches the gallery root
    Check,
    /// Print the image URLs of one landmark from the existing manifest
    Resolve {
        /// Landmark id, matched against the `<id>_` prefix of folder names
        id: u32,
        /// Base URL the site is served under
        #[arg(long, default_value = "/")]
        base_url: String,
    },
    /// Print a stock gallery-index.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_index=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(mut cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let command = cli.command.take().unwrap_or(Command::Build { list: false });

    match command {
        Command::Build { list } => {
            let config = resolve_config(&cli)?;
            let report = build::build_index(&config)?;
            output::print_build_output(&report, list);
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            let report = build::check(&config)?;
            output::print_check_output(&report);
            if report.status != build::CheckStatus::UpToDate {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Resolve { id, base_url } => {
            let config = resolve_config(&cli)?;
            let index = persist::load_index(&config.output_path)?;
            for url in resolve::landmark_urls(&index, id, &base_url)? {
                println!("{}", url);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Layer command-line overrides on top of the config file, then validate.
fn resolve_config(cli: &Cli) -> Result<config::IndexConfig, String> {
    let fail = |e: config::ConfigError| format!("ConfigurationError: {e}");
    let mut config = match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(config::CONFIG_FILENAME)),
    }
    .map_err(fail)?;
    if let Some(root) = &cli.gallery_root {
        config.gallery_root = root.clone();
    }
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if !cli.extensions.is_empty() {
        config.extensions = cli.extensions.clone();
    }
    config.follow_links |= cli.follow_links;
    config.include_hidden |= cli.include_hidden;
    config.normalize();
    config.validate().map_err(fail)?;
    Ok(config)
}
