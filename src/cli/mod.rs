//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{GraphCommand, ResolveCommand, ValidateCommand};
use std::ffi::OsString;

/// Resolver and validator for CI build configurations
#[derive(Debug, Parser, Clone)]
#[command(name = "ci-resolver")]
#[command(version)]
#[command(about = "Validate CI build configurations and resolve their dependencies", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Validate a build configuration
    Validate(ValidateCommand),

    /// Resolve a dependency reference to its image stream tag
    Resolve(ResolveCommand),

    /// Print the producer/consumer graph of a build configuration
    Graph(GraphCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
