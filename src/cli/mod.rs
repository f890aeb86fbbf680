//! CLI interface for Touchline

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "touchline")]
#[command(author = "Krakaw")]
#[command(version = "1.0.0")]
#[command(about = "Team management server - authentication, sessions and role-based access", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new touchline.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create an administrator account (prompts for a password)
    CreateAdmin {
        /// Username for the new admin (lowercase, 3-20 chars)
        username: String,
    },

    /// List user accounts
    Users,
}
