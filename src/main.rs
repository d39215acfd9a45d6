use anyhow::{Context, Result};
use ci_resolver::cli::commands::{GraphCommand, ResolveCommand, ValidateCommand};
use ci_resolver::cli::output::*;
use ci_resolver::cli::{Cli, Command};
use ci_resolver::core::config::ReleaseBuildConfiguration;
use ci_resolver::graph::ResolvedGraph;
use ci_resolver::validation::{self, ConfigurationError};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let valid = match &cli.command {
        Command::Validate(cmd) => validate_config(cmd)?,
        Command::Resolve(cmd) => resolve_dependency(cmd)?,
        Command::Graph(cmd) => print_graph(cmd)?,
    };
    if !valid {
        std::process::exit(1);
    }

    Ok(())
}

fn load(file: &str) -> Result<ReleaseBuildConfiguration> {
    let config = ReleaseBuildConfiguration::from_file(file)
        .with_context(|| format!("Failed to load build configuration {}", file))?;
    info!("Loaded build configuration from {}", file);
    Ok(config)
}

fn validate_config(cmd: &ValidateCommand) -> Result<bool> {
    let config = load(&cmd.file)?;

    match validation::validate(&config, cmd.merged) {
        Ok(()) => {
            if cmd.json {
                println!("{}", serde_json::json!({ "valid": true, "errors": [] }));
            } else {
                println!("{} Build configuration is valid!", CHECK);
                println!("  Images: {}", style(config.images.len()).cyan());
                println!("  Tests: {}", style(config.tests.len()).cyan());
            }
            Ok(true)
        }
        Err(errors) => {
            warn!("{} rejected with {} problems", cmd.file, errors.len());
            if cmd.json {
                let data = serde_json::json!({ "valid": false, "errors": errors });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_errors(&ConfigurationError::Invalid(errors));
            }
            Ok(false)
        }
    }
}

fn resolve_dependency(cmd: &ResolveCommand) -> Result<bool> {
    let config = load(&cmd.file)?;
    let claim = cmd.claim.to_claim();
    let resolved = config.resolve_artifact_stream(&cmd.dependency, claim.as_ref());

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{} {}", INFO, format_artifact_stream(&cmd.dependency, &resolved));
    }
    Ok(true)
}

fn print_graph(cmd: &GraphCommand) -> Result<bool> {
    let config = load(&cmd.file)?;
    let claim = cmd.claim.to_claim();

    let graph = match ResolvedGraph::build(&config, cmd.merged, claim.as_ref()) {
        Ok(graph) => graph,
        Err(err) => {
            warn!("{} rejected with {} problems", cmd.file, err.errors().len());
            print_errors(&err);
            return Ok(false);
        }
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
        return Ok(true);
    }

    println!("{} Producers ({}):", INFO, style(graph.producers.len()).cyan());
    for producer in &graph.producers {
        println!("{}", format_producer(producer));
    }
    println!("{} Consumers ({}):", INFO, style(graph.consumers.len()).cyan());
    for edge in &graph.consumers {
        println!("{}", format_consumer(edge));
    }
    Ok(true)
}

fn print_errors(err: &ConfigurationError) {
    println!("{} Validation failed:", CROSS);
    for error in err.errors() {
        println!("{}", format_validation_error(error));
    }
}
