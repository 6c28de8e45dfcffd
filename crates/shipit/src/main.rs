//! shipit CLI - prepares a static web app build for GitHub Pages.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod pipeline;
mod prompt;
mod report;

use report::Reporter;

#[derive(Parser)]
#[command(name = "shipit")]
#[command(about = "Prepare a static web app build for publication on GitHub Pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root (where the dependency manifest lives)
    #[arg(short, long, default_value = ".", global = true)]
    project: PathBuf,

    /// Path to shipit.toml, relative to the project root
    #[arg(short, long, default_value = "shipit.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the app and stage the output for GitHub Pages (default)
    Deploy {
        /// Custom domain for the CNAME file; skips the domain questions
        #[arg(long)]
        domain: Option<String>,
    },

    /// Write a default shipit.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Preview the staged output directory
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "4000")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut reporter = Reporter::stdout();
    match run(cli, &mut reporter).await {
        Ok(code) => code,
        Err(e) => {
            reporter.error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, reporter: &mut Reporter) -> Result<ExitCode> {
    let config_path = cli.project.join(&cli.config);

    match cli.command.unwrap_or(Commands::Deploy { domain: None }) {
        Commands::Deploy { domain } => {
            return commands::deploy::run(&cli.project, &config_path, domain, reporter).await;
        }
        Commands::Init { yes } => {
            commands::init::run(&config_path, yes, reporter).await?;
        }
        Commands::Serve { port, no_open } => {
            let config = config::load_config(&config_path)?;
            let dir = config.output_dir(&cli.project);
            commands::serve::run(port, &dir, !no_open, reporter).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
