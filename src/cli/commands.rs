//! CLI command definitions

use crate::resolve::ClaimRelease;
use clap::Args;

/// Validate a build configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the configuration YAML file
    #[arg(short, long)]
    pub file: String,

    /// The configuration was merged from several repositories
    #[arg(long)]
    pub merged: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Resolve a dependency reference
#[derive(Debug, Args, Clone)]
pub struct ResolveCommand {
    /// Path to the configuration YAML file
    #[arg(short, long)]
    pub file: String,

    /// Dependency reference, `[<stream>:]<tag>`
    pub dependency: String,

    #[command(flatten)]
    pub claim: ClaimArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Print the producer/consumer graph
#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Path to the configuration YAML file
    #[arg(short, long)]
    pub file: String,

    /// The configuration was merged from several repositories
    #[arg(long)]
    pub merged: bool,

    #[command(flatten)]
    pub claim: ClaimArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Cluster claim overriding one release of the configuration
#[derive(Debug, Args, Clone, Default)]
pub struct ClaimArgs {
    /// Release the claimed cluster was installed with
    #[arg(long, requires = "claim_override")]
    pub claim_release: Option<String>,

    /// Release of the configuration the claim stands in for
    #[arg(long, requires = "claim_release")]
    pub claim_override: Option<String>,
}

impl ClaimArgs {
    pub fn to_claim(&self) -> Option<ClaimRelease> {
        match (&self.claim_release, &self.claim_override) {
            (Some(release), Some(override_name)) => Some(ClaimRelease::new(release, override_name)),
            _ => None,
        }
    }
}
