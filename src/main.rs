//! confbind CLI - inspect configuration documents

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use confbind::error::{ConfigError, FixSuggestion};
use confbind::{loader, placeholder, BindingContext, Entry};

#[derive(Parser)]
#[command(name = "confbind")]
#[command(about = "confbind - resolve and inspect configuration documents")]
#[command(version)]
struct Cli {
    /// Load variables from this .env file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge files in order, resolve placeholders and print the result
    Render {
        /// .json, .toml, .yaml or .yml files (later files win per key)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print only the subtree at this path (e.g. app.controller)
        #[arg(short, long)]
        path: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Parse files and report environment variables they reference
    Check {
        /// .json, .toml, .yaml or .yml files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() {
    let cli = Cli::parse();

    // Load .env file (ignore if not present)
    match &cli.env_file {
        Some(file) => {
            if let Err(e) = dotenvy::from_path(file) {
                eprintln!("{} {}: {}", "Error:".red().bold(), file.display(), e);
                std::process::exit(1);
            }
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    // Initialize tracing (stderr, so rendered documents stay clean)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Render {
            files,
            path,
            format,
        } => render(&files, path.as_deref(), format),
        Commands::Check { files } => check(&files),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            std::process::exit(1);
        }
    }
}

fn render(
    files: &[PathBuf],
    path: Option<&str>,
    format: OutputFormat,
) -> Result<bool, ConfigError> {
    let ctx = BindingContext::new();
    for file in files {
        ctx.load_file(file)?;
    }

    let value = match path {
        Some(p) => ctx.get_path(p).map(Entry::into_value)?,
        None => ctx.to_value(),
    };

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(true)
}

fn check(files: &[PathBuf]) -> Result<bool, ConfigError> {
    let resolver = placeholder::PlaceholderResolver::from_process_env();
    let mut all_found = true;

    for file in files {
        let document = loader::load_document(file)?;
        let referenced = placeholder::referenced_variables(&document);
        let missing = resolver.missing_variables(&document);

        println!("{} {}", "✓".green(), file.display());
        if referenced.is_empty() {
            println!("  No environment variables referenced");
        }
        for name in &referenced {
            if missing.contains(name) {
                println!("  {} {} {}", "✗".red(), name, "(not set)".red());
            } else {
                println!("  {} {}", "✓".green(), name);
            }
        }
        all_found &= missing.is_empty();
    }

    if !all_found {
        eprintln!(
            "  {} Export the missing variables or add them to your .env file",
            "Fix:".yellow()
        );
    }
    Ok(all_found)
}
