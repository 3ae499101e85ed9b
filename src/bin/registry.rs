//! Event Schema Registry CLI
//!
//! Validates registry projects and builds their distributable directory.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use event_schemas::{
    validation, ChecksumService, Distribution, IndexFileCalculator, MissingTransformationCalculator,
    NodeScriptRunner, Project, RegistryConfig, RegistryError, ValidationService,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "event-schemas")]
#[command(about = "Validate and package event schema registry projects")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a registry project
    Validate {
        /// Project root
        path: PathBuf,
    },

    /// Validate a project and write the distributable registry
    Build {
        /// Project root
        path: PathBuf,
        /// Output directory (replaced if it exists)
        output: PathBuf,
    },

    /// Validate a project and print its index
    Index {
        /// Project root
        path: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long, conflicts_with = "toml")]
        json: bool,

        /// Output as TOML (default)
        #[arg(long)]
        toml: bool,
    },

    /// Write the default configuration to a file
    Init {
        #[arg(short, long, default_value = "event-schemas.toml")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = RegistryConfig::load_from(cli.config.as_deref()).map_err(RegistryError::from)?;

    match cli.command {
        Commands::Validate { path } => {
            println!("🔍 Validating {:?}", path);
            load(&path, &config)?;
            println!("✅ Project is valid");
            Ok(())
        }

        Commands::Build { path, output } => {
            println!("🔍 Validating {:?}", path);
            let project = load(&path, &config)?;
            let index = calculator(&config).calculate_index(&project)?;

            let distribution = Distribution::create(&project, &index, &output, &config.index)?;
            println!(
                "✅ Registry written to {:?} ({} schemas, {} transformations)",
                distribution.root(),
                index.schemas.len(),
                index.transformations.len()
            );
            Ok(())
        }

        Commands::Index { path, output } => {
            let project = load(&path, &config)?;
            let index = calculator(&config).calculate_index(&project)?;
            let json = config.index.output_format.render(&index)?;

            if let Some(path) = output {
                std::fs::write(&path, &json)?;
                println!("✅ Index written to {:?}", path);
            } else {
                println!("{}", json);
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show { json, toml: _ } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
                Ok(())
            }
            ConfigCommands::Init { output } => {
                RegistryConfig::default().save(&output)?;
                println!("✅ Configuration written to {}", output);
                Ok(())
            }
        },
    }
}

fn load(path: &Path, config: &RegistryConfig) -> event_schemas::Result<Project> {
    let runner = NodeScriptRunner::new(&config.transform.runtime);
    let validation = ValidationService::with_runner(runner, config.transform.function.clone());
    validation::load_project(path, config, &validation)
}

fn calculator(config: &RegistryConfig) -> IndexFileCalculator {
    IndexFileCalculator::new(
        ChecksumService::new(config.index.checksum),
        MissingTransformationCalculator::new(),
    )
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<RegistryError>() {
        Some(RegistryError::Validation(errors)) => {
            for e in errors {
                eprintln!("❌ {}", e);
            }
            eprintln!("\n❌ {} validation error(s)", errors.len());
        }
        _ => eprintln!("❌ Error: {}", error),
    }
}
