//! CLI output formatting

use crate::graph::ConsumerEdge;
use crate::resolve::ArtifactStream;
use crate::validation::{Producer, ValidationError};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");

/// Format a validation error, highlighting its location
pub fn format_validation_error(error: &ValidationError) -> String {
    if error.path.is_empty() {
        format!("  {} {}", CROSS, style(&error.message).red())
    } else {
        format!(
            "  {} {}: {}",
            CROSS,
            style(error.location()).bold(),
            style(&error.message).red()
        )
    }
}

/// Format a resolved reference
pub fn format_artifact_stream(dependency: &str, resolved: &ArtifactStream) -> String {
    let kind = if resolved.explicit {
        style("explicit").green()
    } else {
        style("implicit").yellow()
    };
    format!(
        "{} → {} ({})",
        style(dependency).cyan(),
        style(resolved).bold(),
        kind
    )
}

/// Format a producer of the graph
pub fn format_producer(producer: &Producer) -> String {
    format!(
        "  {} {}",
        style(&producer.name).bold(),
        style(format!("({})", producer.origin)).dim()
    )
}

/// Format a consumer edge of the graph
pub fn format_consumer(edge: &ConsumerEdge) -> String {
    let env = if edge.env.is_empty() {
        String::new()
    } else {
        format!(" as {}", style(&edge.env).cyan())
    };
    let producer = match &edge.producer {
        Some(origin) => format!(" ← {}", style(origin).dim()),
        None => String::new(),
    };
    format!(
        "  {} {}{}: {}:{}{}",
        style(&edge.test).bold(),
        style(&edge.dependency).cyan(),
        env,
        edge.stream,
        edge.tag,
        producer
    )
}
