//! deckgen CLI - build PowerPoint decks from slide outlines
//!
//! Reads a JSON outline, picks a layout for every slide and writes the deck
//! into a `.pptx` template.

use clap::{Parser, Subcommand};
use colored::*;
use deckgen::{Assembler, AssemblyReport, Config, Outline, SkipReason, Template};
use std::fs;
use std::path::{Path, PathBuf};

/// Build PowerPoint decks from slide outlines
#[derive(Parser)]
#[command(
    name = "deckgen",
    author = "iyulab",
    version,
    about = "Build PowerPoint decks from slide outlines",
    long_about = "deckgen - layout inference and template-driven PPTX assembly.\n\n\
                  Each slide in a JSON outline is matched to one of eight named layouts\n\
                  and written into the placeholders of a PowerPoint template."
)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deck from an outline
    #[command(visible_alias = "gen")]
    Generate {
        /// Outline JSON file
        outline: PathBuf,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Template (overrides the configured template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file (default: <output_dir>/<title>.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Root for relative asset paths
        #[arg(long)]
        asset_root: Option<PathBuf>,

        /// Print the assembly report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the layouts of a template with their ids
    Layouts {
        /// Template file
        template: PathBuf,
    },

    /// Show the layout chosen for every slide without writing a deck
    Plan {
        /// Outline JSON file
        outline: PathBuf,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate {
            outline,
            config,
            template,
            output,
            asset_root,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(template) = template {
                config.ppt_template = template;
            }
            if asset_root.is_some() {
                config.asset_root = asset_root;
            }
            warn_unknown_layouts(&config);

            let presentation = read_outline(&outline)?.into_presentation(&config.layout_mapping);
            let output = output.unwrap_or_else(|| config.output_path_for(&presentation.title));
            tracing::debug!(
                template = %config.ppt_template.display(),
                output = %output.display(),
                "generating deck"
            );

            let assembler: Assembler = deckgen::assembler_for(&config);
            let report = assembler.assemble(&presentation, &config.ppt_template, &output)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Commands::Layouts { template } => {
            let template = Template::open(&template)?;

            println!("{}", "Template Layouts".cyan().bold());
            println!("{}", "─".repeat(40));
            for (id, name) in template.layout_names().iter().enumerate() {
                println!("{:>3}  {}", id.to_string().bold(), name);
            }
            let (width, height) = template.slide_size();
            println!(
                "\n{}: {:.2} x {:.2} in",
                "Slide size".bold(),
                width as f64 / 914_400.0,
                height as f64 / 914_400.0
            );
        }

        Commands::Plan {
            outline,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            warn_unknown_layouts(&config);
            let presentation = read_outline(&outline)?.into_presentation(&config.layout_mapping);

            if json {
                println!("{}", serde_json::to_string_pretty(&presentation)?);
            } else {
                println!("{}", presentation);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> deckgen::Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn read_outline(path: &Path) -> Result<Outline, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read outline {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&text)?)
}

fn warn_unknown_layouts(config: &Config) {
    for name in config.layout_mapping.unknown_names() {
        println!(
            "{} layout_mapping entry '{}' does not match any layout",
            "!".yellow().bold(),
            name
        );
    }
}

fn print_report(report: &AssemblyReport) {
    println!(
        "{} Wrote {} slides to {}",
        "✓".green().bold(),
        report.slides_written,
        report.output_path.display()
    );

    for fallback in &report.layout_fallbacks {
        println!(
            "{} Slide {}: layout {} not in template ({} layouts), used layout 0",
            "!".yellow().bold(),
            fallback.slide_index + 1,
            fallback.requested,
            fallback.available
        );
    }

    for skipped in &report.skipped {
        let reason = match &skipped.reason {
            SkipReason::AssetNotFound => "file not found".to_string(),
            SkipReason::NoPlaceholder => "layout has no matching placeholder".to_string(),
            SkipReason::InsertionFailed(err) => err.clone(),
        };
        println!(
            "{} Slide {}: {} {} skipped ({})",
            "!".yellow().bold(),
            skipped.slide_index + 1,
            skipped.kind,
            skipped.path.display(),
            reason
        );
    }
}

fn print_version() {
    println!("{} {}", "deckgen".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout inference and template-driven PowerPoint assembly");
}
