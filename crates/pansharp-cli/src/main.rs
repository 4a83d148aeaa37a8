mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pansharp", about = "Pan-sharpening and fusion quality tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sharpen a scene as described by a job file
    Sharpen(commands::sharpen::SharpenArgs),
    /// Score a fused image against a reference
    Quality(commands::quality::QualityArgs),
    /// Print a default job file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Sharpen(args) => commands::sharpen::run(args),
        Commands::Quality(args) => commands::quality::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
