//! Pods package migration tool - Main Entry Point
//!
//! Thin command-line wrapper; the actual implementation is in the
//! `pods_migrate` library.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use pods_migrate::formatting::format_summary;
use pods_migrate::{Config, PackageManager, Selection, Selector};
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pods package tool - import and export pods, templates, pages and helpers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the catalog file
    catalog: PathBuf,

    /// Path to the configuration file
    #[arg(long, default_value = "pods-migrate.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a package into the catalog
    Import {
        /// Package file, or `-` to read from stdin
        package: String,

        /// Replace entities with the same name instead of merging into them
        #[arg(long)]
        replace: bool,
    },
    /// Export entities from the catalog as a package
    Export {
        /// Pods to export (`all` or comma-separated ids)
        #[arg(long)]
        pods: Option<Selector>,

        /// Templates to export (`all` or comma-separated ids)
        #[arg(long)]
        templates: Option<Selector>,

        /// Pages to export (`all` or comma-separated ids)
        #[arg(long)]
        pages: Option<Selector>,

        /// Helpers to export (`all` or comma-separated ids)
        #[arg(long)]
        helpers: Option<Selector>,

        /// Write the package to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_package(package: &str) -> Result<String> {
    if package == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read package from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(package).with_context(|| format!("Failed to read package {}", package))
}

fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = Config::load(&args.config)?;
    let mut manager = PackageManager::open(&args.catalog, config)?;

    match args.command {
        Command::Import { package, replace } => {
            let text = read_package(&package)?;
            match manager.import(text, replace)? {
                Some(summary) => print!("{}", format_summary(&summary)),
                None => println!("Nothing was imported."),
            }
        }
        Command::Export {
            pods,
            templates,
            pages,
            helpers,
            output,
        } => {
            let selection = Selection {
                pods,
                templates,
                pages,
                helpers,
            };
            let Some(package) = manager.export(&selection)? else {
                bail!("Nothing selected. Use --pods, --templates, --pages or --helpers");
            };
            match output {
                Some(path) => std::fs::write(&path, package)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", package),
            }
        }
    }
    Ok(())
}
