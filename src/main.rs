//! pixgrid - search Pixabay images from the terminal.
//!
//! # Usage
//!
//! ```bash
//! pixgrid
//! pixgrid "red fox"
//! pixgrid --per-page 80 --orientation vertical mountains
//! pixgrid cats --html cats.html --pages 3
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pixgrid::api::{FetchClient, ImageType, Orientation, PixabayClient};
use pixgrid::app::App;
use pixgrid::config::{
    API_KEY_ENV, ConfigFlags, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use pixgrid::export::export_html;
use pixgrid::notify::LogNotifier;

/// A terminal image search client with infinite scrolling and inline previews
#[derive(Parser, Debug)]
#[command(name = "pixgrid", version, about, long_about = None)]
struct Cli {
    /// Search to run on startup
    #[arg(value_name = "QUERY", num_args = 0.., trailing_var_arg = true)]
    query: Vec<String>,

    /// Pixabay API key (falls back to PIXABAY_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Results per page (3-200)
    #[arg(long, value_name = "N")]
    per_page: Option<u32>,

    /// Kind of image to search for
    #[arg(long, value_enum)]
    image_type: Option<ImageType>,

    /// Image orientation filter
    #[arg(long, value_enum)]
    orientation: Option<Orientation>,

    /// Include results not suitable for all ages
    #[arg(long)]
    no_safesearch: bool,

    /// Disable full-size image rendering in the preview
    #[arg(long)]
    no_images: bool,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write the results of QUERY to an HTML file and exit
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Number of pages to collect with --html
    #[arg(long, value_name = "N", default_value_t = 1, requires = "html")]
    pages: u32,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn query(&self) -> Option<String> {
        let query = self.query.join(" ");
        (!query.trim().is_empty()).then_some(query)
    }

    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            api_key: self.api_key.clone(),
            per_page: self.per_page,
            image_type: self.image_type,
            orientation: self.orientation,
            no_safesearch: self.no_safesearch,
            no_images: self.no_images,
            force_half_cell: self.force_half_cell,
            log_file: self.log_file.clone(),
        }
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

fn run_export(client: &dyn FetchClient, query: Option<&str>, pages: u32, path: &Path) -> Result<()> {
    let query = query.context("--html needs a search query")?;
    let export = export_html(client, LogNotifier, query, pages.max(1))?;
    std::fs::write(path, &export.document)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "Wrote {} of {} images ({} page(s)) to {}",
        export.shown,
        export.total_matches,
        export.pages,
        path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_tracing(effective.log_file.as_deref())?;

    let api_config = effective.api_config(std::env::var(API_KEY_ENV).ok())?;
    let client = PixabayClient::new(api_config).context("Failed to set up the HTTP client")?;

    if let Some(path) = cli.html.as_deref() {
        return run_export(&client, cli.query().as_deref(), cli.pages, path);
    }

    let mut app = App::new(client)
        .with_initial_query(cli.query())
        .with_images_enabled(!effective.no_images)
        .with_force_half_cell(effective.force_half_cell);

    app.run().context("Application error")
}
