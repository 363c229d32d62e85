//! Main entry point for tabrecon CLI

use clap::Parser;
use tabrecon::cli::Cli;
use tabrecon::commands::execute_command;

/// Exit status for runs that could not complete
const EXIT_ERROR: i32 = 2;

fn main() {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set up verbose logging if requested
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Execute the command
    match execute_command(cli.command, !cli.no_progress) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}
