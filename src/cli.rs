//! The command line interface for siteprox.
use crate::input::load_input;
use crate::interference::run_analysis;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod demo;
use demo::DemoSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for siteprox.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Maximum distance in miles between a construction site and an existing building for them
    /// to interfere (overrides analysis.toml)
    #[arg(long)]
    pub build_threshold: Option<f64>,
    /// Maximum distance in miles from a metro for a location to be counted as part of it
    /// (overrides analysis.toml)
    #[arg(long)]
    pub city_threshold: Option<f64>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Analyse the sites in an input folder.
    Run {
        /// Path to the input folder.
        input_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage the bundled demo inputs.
    Demo {
        /// The available subcommands for managing demo inputs.
        #[command(subcommand)]
        subcommand: DemoSubcommands,
    },
    /// Validate an input folder.
    Validate {
        /// The path to the input folder.
        input_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { input_dir, opts } => handle_run_command(&input_dir, &opts, None),
            Self::Demo { subcommand } => subcommand.execute(),
            Self::Validate { input_dir } => handle_validate_command(&input_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start siteprox
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ siteprox --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
pub fn handle_run_command(
    input_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(input_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(settings.log_level.as_str()), Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the input data and apply any thresholds given on the command line
    let mut input = load_input(input_path).context("Failed to load input data.")?;
    input.parameters = input
        .parameters
        .with_overrides(opts.build_threshold, opts.city_threshold)
        .context("Invalid threshold given on command line.")?;
    info!("Loaded input data from {}", input_path.display());
    info!("Output folder: {}", output_path.display());
    info!(
        "Build threshold: {} mi, city threshold: {} mi",
        input.parameters.build_threshold, input.parameters.city_threshold
    );

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let results = run_analysis(&input)?;
    write_results(output_path, &input, &results).context("Failed to write results.")?;
    write_metadata(
        output_path,
        input_path,
        &input.parameters,
        results.total_interferences,
    )
    .context("Failed to save metadata.")?;
    info!("Analysis complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(input_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None)
        .context("Failed to initialise logging.")?;

    // Load/validate the input data
    let input = load_input(input_path).context("Failed to validate input data.")?;
    info!(
        "Read {} metros and {} companies",
        input.metros.len(),
        input.companies.len()
    );
    info!("Input validation successful!");

    Ok(())
}
