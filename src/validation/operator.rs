//! Operator bundle checks

use crate::core::config::OperatorStepConfiguration;
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;

/// Accepted `update_graph` modes
pub const UPDATE_GRAPH_MODES: [&str; 3] = ["semver", "semver-skippatch", "replaces"];

/// Answers whether an image name is produced somewhere in the pipeline
pub trait ArtifactResolver {
    fn is_produced(&self, name: &str) -> bool;
}

impl<F> ArtifactResolver for F
where
    F: Fn(&str) -> bool,
{
    fn is_produced(&self, name: &str) -> bool {
        self(name)
    }
}

/// Validate operator substitutions and bundles
pub fn validate_operator(
    ctx: &ConfigContext,
    operator: &OperatorStepConfiguration,
    resolver: &dyn ArtifactResolver,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let substitutions = ctx.field("substitute");
    for (i, substitution) in operator.substitutions.iter().enumerate() {
        let entry = substitutions.index(i);
        if substitution.pullspec.is_empty() {
            errors.push(entry.field("pullspec").error("must be set"));
        }
        if substitution.with.is_empty() {
            errors.push(entry.field("with").error("must be set"));
        } else if !resolver.is_produced(&substitution.with) {
            errors.push(entry.field("with").error(format!(
                "could not resolve '{}' to an image involved in the config",
                substitution.with
            )));
        }
    }

    let bundles = ctx.field("bundles");
    for (i, bundle) in operator.bundles.iter().enumerate() {
        let entry = bundles.index(i);
        if !bundle.update_graph.is_empty() && bundle.base_index.is_empty() {
            errors.push(
                entry
                    .field("update_graph")
                    .error("update_graph requires base_index to be set"),
            );
        }
        if !bundle.base_index.is_empty() && bundle.name.is_empty() {
            errors.push(
                entry
                    .field("base_index")
                    .error("base_index requires 'as' to be set"),
            );
        }
        if bundle.skip_building_index && bundle.name.is_empty() {
            errors.push(
                entry
                    .field("skip_building_index")
                    .error("skip_building_index requires 'as' to be set"),
            );
        }
        if !bundle.update_graph.is_empty()
            && !UPDATE_GRAPH_MODES.contains(&bundle.update_graph.as_str())
        {
            errors.push(
                entry
                    .field("update_graph")
                    .error("update_graph must be semver, semver-skippatch, or replaces"),
            );
        }
    }

    errors
}
