//! Satisfiability of the dependencies declared by test steps

use crate::core::config::{
    ReleaseBuildConfiguration, BUNDLE_INDEX_PREFIX, BUNDLE_SOURCE, PIPELINE_BINARIES,
    PIPELINE_ROOT, PIPELINE_RPMS, PIPELINE_SOURCE, PIPELINE_TEST_BINARIES, UNNAMED_BUNDLE_INDEX,
    UNNAMED_BUNDLE_PREFIX,
};
use crate::resolve::{ArtifactStream, StreamKind};
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;
use crate::validation::names::{collect_producers, NameRegistry};
use thiserror::Error;
use tracing::debug;

/// Why no producer could be found for a dependency
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingSource {
    #[error("this dependency requires a build root, which is not configured")]
    BuildRoot,

    #[error("this dependency requires built binaries, which are not configured")]
    Binaries,

    #[error("this dependency requires built test binaries, which are not configured")]
    TestBinaries,

    #[error("this dependency requires built RPMs, which are not configured")]
    Rpms,

    #[error("this dependency requires an operator bundle configuration, which is not configured")]
    OperatorBundle,

    #[error("no base image import, project image build, or bundle image build is configured to provide this dependency")]
    PipelineImage,

    #[error("this dependency requires a \"{0}\" release, which is not configured")]
    Release(String),

    #[error("ensure the correct ImageStream name was provided")]
    UnknownStream,
}

/// Find what is missing for an explicit reference to be satisfied.
///
/// `producers` holds every pipeline name of `config`, see
/// [`collect_producers`].
pub fn missing_source(
    config: &ReleaseBuildConfiguration,
    producers: &NameRegistry,
    resolved: &ArtifactStream,
) -> Option<MissingSource> {
    match StreamKind::parse(&resolved.stream) {
        StreamKind::Pipeline => missing_pipeline_tag(producers, &resolved.tag),
        StreamKind::Stable(release) => {
            (!config.has_release(release)).then(|| MissingSource::Release(release.to_string()))
        }
        StreamKind::Release => (!config.has_release(&resolved.tag))
            .then(|| MissingSource::Release(resolved.tag.clone())),
        StreamKind::Other(_) => Some(MissingSource::UnknownStream),
    }
}

fn missing_pipeline_tag(producers: &NameRegistry, tag: &str) -> Option<MissingSource> {
    if tag == PIPELINE_SOURCE || producers.contains(tag) {
        return None;
    }
    let reason = match tag {
        PIPELINE_ROOT => MissingSource::BuildRoot,
        PIPELINE_BINARIES => MissingSource::Binaries,
        PIPELINE_TEST_BINARIES => MissingSource::TestBinaries,
        PIPELINE_RPMS => MissingSource::Rpms,
        _ if is_operator_artifact(tag) => MissingSource::OperatorBundle,
        _ => MissingSource::PipelineImage,
    };
    Some(reason)
}

fn is_operator_artifact(tag: &str) -> bool {
    if tag == UNNAMED_BUNDLE_INDEX || tag == BUNDLE_SOURCE || tag.starts_with(BUNDLE_INDEX_PREFIX) {
        return true;
    }
    tag.strip_prefix(UNNAMED_BUNDLE_PREFIX)
        .is_some_and(|position| !position.is_empty() && position.bytes().all(|b| b.is_ascii_digit()))
}

/// Check every dependency of every literal test step.
///
/// Dependency overrides of the test are applied first. References that
/// resolve implicitly to the `stable` stream are not checked, as they may
/// name any component of the release.
pub fn validate_test_step_dependencies(config: &ReleaseBuildConfiguration) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.tests.is_empty() {
        return errors;
    }
    let producers = collect_producers(config);
    let tests = ConfigContext::new().field("tests");

    for (i, test) in config.tests.iter().enumerate() {
        for step in test.literal_steps() {
            let step_ctx = tests
                .index(i)
                .field(step.kind.field_name())
                .field(step.phase.as_str())
                .index(step.index);
            for (k, dependency) in step.step.dependencies.iter().enumerate() {
                let name = test.effective_dependency_name(dependency);
                let resolved = config.resolve_artifact_stream(name, None);
                if !resolved.explicit {
                    debug!("Skipping implicit dependency {} of test {}", name, test.name);
                    continue;
                }
                if let Some(reason) = missing_source(config, &producers, &resolved) {
                    errors.push(step_ctx.field("dependencies").index(k).error(format!(
                        "cannot determine source for dependency \"{}\" - {}",
                        name, reason
                    )));
                }
            }
        }
    }
    errors
}
