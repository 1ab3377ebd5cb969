// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tablebook - a Telegram bot that books restaurant tables.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tablebook_config::{ConfigError, TablebookConfig};

/// Tablebook - a Telegram bot that books restaurant tables.
#[derive(Parser, Debug)]
#[command(name = "tablebook", version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Validate the configuration and print the effective values.
    Config,
}

fn load(path: Option<&PathBuf>) -> Result<TablebookConfig, Vec<ConfigError>> {
    match path {
        Some(path) => tablebook_config::load_and_validate_path(path),
        None => tablebook_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("tablebook: use --help for available commands");
        return;
    };

    // Load and validate configuration at startup
    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            tablebook_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match command {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("tablebook: {e}");
                std::process::exit(1);
            }
        }
        Commands::Config => match toml::to_string_pretty(&config.redacted()) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("tablebook: failed to render config: {e}");
                std::process::exit(1);
            }
        },
    }
}
