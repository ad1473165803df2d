//! securethis: containerized SAST scans driven by a project-local config.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use securethis::{
    cli::{self, exit_codes},
    config::generate_json_schema,
    scan::{DEFAULT_DOCKER_PROGRAM, DEFAULT_MANIFEST_FILE_NAME, DEFAULT_SCANNER_IMAGE},
    BaseConfigSource, ConfigOverrides, DockerRunner, ScanOptions, TypeSource,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "securethis")]
#[command(version)]
#[command(about = "Run a containerized SAST scan using a project-local config", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Scan completed
    1  Issues found (with --fail-on-issues)
    2  Config file created; review it and run again
    3  Error occurred

EXAMPLES:
    # First run creates securethis.config.ts, second run scans
    securethis
    securethis scan

    # Machine-readable result
    securethis scan --json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by commands that locate a project.
#[derive(Args, Default)]
struct ProjectArgs {
    /// Directory to start searching for the project root from
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Manifest file that marks the project root
    #[arg(long)]
    manifest: Option<String>,

    /// Import the config type from the bundled local definition instead of the package
    #[arg(long, env = "SECURETHIS_LOCAL_TYPES")]
    local_types: bool,
}

impl ProjectArgs {
    fn manifest(&self) -> &str {
        self.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST_FILE_NAME)
    }
}

/// Arguments for the `scan` subcommand
#[derive(Args, Default)]
struct ScanArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Scanner image to run
    #[arg(long, env = "SECURETHIS_DOCKER_IMAGE")]
    image: Option<String>,

    /// Container runtime executable
    #[arg(long, env = "SECURETHIS_DOCKER")]
    docker: Option<String>,

    /// Base scanner config to merge exclusions into (defaults to the bundled one)
    #[arg(long, env = "SECURETHIS_BASE_CONFIG")]
    base_config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Exit with code 1 when the scan reports issues
    #[arg(long)]
    fail_on_issues: bool,
}

/// Arguments for the `init` subcommand
#[derive(Args)]
struct InitArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Results directory, relative to the project root
    #[arg(long)]
    output_dir: Option<String>,

    /// Exclusion entries; replaces the default list when given
    #[arg(long = "exclude", value_name = "PATH_OR_GLOB")]
    exclude: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scan (default)
    Scan(ScanArgs),

    /// Write a config file into the project without scanning
    Init(InitArgs),

    /// Print the JSON Schema of the config value
    Schema,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match dispatch(cli.command.unwrap_or_else(|| Commands::Scan(ScanArgs::default()))) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn dispatch(command: Commands) -> Result<i32> {
    match command {
        Commands::Scan(args) => {
            let options = ScanOptions {
                cwd: args.project.cwd.clone(),
                manifest_file_name: args.project.manifest().to_string(),
                type_source: TypeSource::from_local_flag(args.project.local_types),
                base_config: args
                    .base_config
                    .map_or(BaseConfigSource::Bundled, BaseConfigSource::File),
            };
            let runner = DockerRunner::new(
                args.docker.as_deref().unwrap_or(DEFAULT_DOCKER_PROGRAM),
                args.image.as_deref().unwrap_or(DEFAULT_SCANNER_IMAGE),
            );
            tracing::info!("Starting Security Scan...");
            cli::run_scan_command(&options, &runner, args.json, args.fail_on_issues)
        }

        Commands::Init(args) => {
            let cwd = match args.project.cwd {
                Some(ref cwd) => cwd.clone(),
                None => std::env::current_dir()?,
            };
            let mut overrides = ConfigOverrides::none();
            overrides.output_dir_relative = args.output_dir;
            if !args.exclude.is_empty() {
                overrides.sast_exclude = Some(args.exclude);
            }
            cli::run_init(
                &cwd,
                args.project.manifest(),
                &overrides,
                &TypeSource::from_local_flag(args.project.local_types),
            )
        }

        Commands::Schema => {
            println!("{}", generate_json_schema());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "securethis", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}
