//! Slow-motion recorder sample
//!
//! Drives the recorder's method-call surface against the virtual camera
//! backend from the command line.

mod commands;
mod console_delegate;

use clap::{Parser, Subcommand};

use commands::{ProfileArg, RecordOptions};

#[derive(Parser, Debug)]
#[command(name = "slowmo-sample")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a slow-motion clip
    Record(RecordOptions),
    /// List the simulated camera's formats
    Formats {
        #[arg(long, value_enum, default_value_t = ProfileArg::Iphone)]
        profile: ProfileArg,
    },
    /// Show version and platform information
    Version {
        #[arg(long, value_enum, default_value_t = ProfileArg::Iphone)]
        profile: ProfileArg,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let outcome = match cli.command {
        Commands::Record(options) => commands::record(options, cli.json),
        Commands::Formats { profile } => commands::formats(profile, cli.json),
        Commands::Version { profile } => commands::version(profile, cli.json),
    };

    if let Err(message) = outcome {
        log::error!("{}", message);
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}
