//! Producer/consumer graph of a validated configuration

use crate::core::config::{ReleaseBuildConfiguration, PIPELINE_IMAGE_STREAM};
use crate::resolve::ClaimRelease;
use crate::validation::context::ConfigContext;
use crate::validation::{collect_producers, is_valid_configuration, ConfigurationError, Producer};
use serde::Serialize;
use tracing::debug;

/// A test step's use of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerEdge {
    /// Name of the consuming test
    pub test: String,
    /// Field path of the dependency
    pub location: String,
    /// Dependency reference after overrides
    pub dependency: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub env: String,
    pub stream: String,
    pub tag: String,
    pub explicit: bool,
    /// Origin of the pipeline producer bound to this edge, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
}

/// Every artifact a configuration produces and every dependency on one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedGraph {
    pub producers: Vec<Producer>,
    pub consumers: Vec<ConsumerEdge>,
}

impl ResolvedGraph {
    /// Validate `config` and resolve all of its dependencies.
    ///
    /// `claim` is applied to every reference, as when tests run on a
    /// claimed cluster.
    pub fn build(
        config: &ReleaseBuildConfiguration,
        merged: bool,
        claim: Option<&ClaimRelease>,
    ) -> Result<Self, ConfigurationError> {
        is_valid_configuration(config, merged)?;

        let registry = collect_producers(config);
        let tests = ConfigContext::new().field("tests");
        let mut consumers = Vec::new();
        for (i, test) in config.tests.iter().enumerate() {
            for step in test.literal_steps() {
                let dependencies = tests
                    .index(i)
                    .field(step.kind.field_name())
                    .field(step.phase.as_str())
                    .index(step.index)
                    .field("dependencies");
                for (k, dependency) in step.step.dependencies.iter().enumerate() {
                    let name = test.effective_dependency_name(dependency);
                    let resolved = config.resolve_artifact_stream(name, claim);
                    let producer = if resolved.stream == PIPELINE_IMAGE_STREAM {
                        registry.origin(&resolved.tag).map(str::to_string)
                    } else {
                        None
                    };
                    consumers.push(ConsumerEdge {
                        test: test.name.clone(),
                        location: dependencies.index(k).to_string(),
                        dependency: name.to_string(),
                        env: dependency.env.clone(),
                        stream: resolved.stream,
                        tag: resolved.tag,
                        explicit: resolved.explicit,
                        producer,
                    });
                }
            }
        }

        debug!(
            "Resolved {} producers and {} consumers",
            registry.producers().len(),
            consumers.len()
        );
        Ok(Self {
            producers: registry.into_producers(),
            consumers,
        })
    }

    pub fn producer(&self, name: &str) -> Option<&Producer> {
        self.producers.iter().find(|p| p.name == name)
    }

    /// Edges reading the pipeline tag `name`
    pub fn consumers_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConsumerEdge> + 'a {
        self.consumers
            .iter()
            .filter(move |edge| edge.stream == PIPELINE_IMAGE_STREAM && edge.tag == name)
    }
}
