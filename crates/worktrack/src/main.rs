// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Worktrack - tool/task assignment tracking service.
//!
//! This is the binary entry point. It loads configuration and dispatches to
//! the `serve`, `doctor`, and `seed` subcommands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod seed;
mod serve;

use clap::{Parser, Subcommand};

/// Worktrack - tool/task assignment tracking service.
#[derive(Parser, Debug)]
#[command(name = "worktrack", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP service.
    Serve,
    /// Check configuration and storage health.
    Doctor,
    /// Populate the database with simulated tools and tasks.
    Seed {
        /// Number of tools to create.
        #[arg(long, default_value_t = 5)]
        tools: usize,
        /// Number of tasks to create.
        #[arg(long, default_value_t = 5)]
        tasks: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match worktrack_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            worktrack_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        Some(Commands::Seed { tools, tasks }) => seed::run_seed(&config, tools, tasks).await,
        None => {
            println!("worktrack: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("worktrack: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc can advance the epoch; the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            worktrack_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.service.name, "worktrack");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn seed_counts_parse() {
        let cli = Cli::parse_from(["worktrack", "seed", "--tools", "3", "--tasks", "7"]);
        match cli.command {
            Some(Commands::Seed { tools, tasks }) => {
                assert_eq!(tools, 3);
                assert_eq!(tasks, 7);
            }
            other => panic!("expected seed, got {other:?}"),
        }
    }

    #[test]
    fn seed_counts_default_to_five() {
        let cli = Cli::parse_from(["worktrack", "seed"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Seed { tools: 5, tasks: 5 })
        ));
    }

    #[test]
    fn no_subcommand_is_accepted() {
        let cli = Cli::parse_from(["worktrack"]);
        assert!(cli.command.is_none());
    }
}
