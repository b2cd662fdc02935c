use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Stagehand - run configured tasks against staged files
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(about = "Runs configured lint and format commands against file groups")]
#[command(version)]
struct Cli {
    /// Base directory for configuration discovery (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Explicit configuration file path or module specifier
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured tasks against the given files
    Run {
        /// Files the configured patterns are matched against
        files: Vec<String>,

        /// Execute commands through the shell
        #[arg(long)]
        shell: bool,

        /// Force the current working directory for every command
        #[arg(long)]
        relative: bool,
    },
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            files,
            shell,
            relative,
        } => commands::run::execute(&cli.dir, cli.config.as_deref(), files, shell, relative).await,
        Commands::Config => commands::config::execute(&cli.dir, cli.config.as_deref()),
    }
}
