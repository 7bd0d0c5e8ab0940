//! CLI entry point for matrixtools

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "matrixtools")]
#[command(author = "MatrixTools Team")]
#[command(version)]
#[command(about = "A tools directory and tutorial site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the config port, or $PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Export the site as static files
    #[command(alias = "g")]
    Generate,

    /// Validate all content
    Check,

    /// List site content
    List {
        /// Type of content to list (tools, tutorials, categories, pages, tags)
        #[arg(default_value = "tools")]
        r#type: String,
    },

    /// Create a new tutorial
    New {
        /// Title of the new tutorial
        title: String,

        /// Category id or slug
        #[arg(short, long)]
        category: Option<String>,

        /// File name slug (derived from the title by default)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "matrixtools=debug,tower_http=debug,info"
    } else {
        "matrixtools=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip, open } => {
            let mut site = matrixtools::Site::new(&base_dir)?;
            // An explicit --port wins over $PORT
            if port.is_none() {
                site.apply_port_env()?;
            }
            let catalog = site.load_catalog()?;

            let port = port.unwrap_or(site.config.port);
            let ip = ip.unwrap_or_else(|| site.config.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            matrixtools::server::start(&site, catalog, &ip, port, open).await?;
        }

        Commands::Generate => {
            let site = matrixtools::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Check => {
            let site = matrixtools::Site::new(&base_dir)?;
            matrixtools::commands::check::run(&site)?;
        }

        Commands::List { r#type } => {
            let site = matrixtools::Site::new(&base_dir)?;
            matrixtools::commands::list::run(&site, &r#type)?;
        }

        Commands::New {
            title,
            category,
            slug,
        } => {
            let site = matrixtools::Site::new(&base_dir)?;
            tracing::info!("Creating new tutorial: {}", title);
            site.new_tutorial(&title, category.as_deref(), slug.as_deref())?;
        }

        Commands::Clean => {
            let site = matrixtools::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("matrixtools version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
