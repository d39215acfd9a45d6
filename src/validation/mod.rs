//! Validation of build configurations
//!
//! Field checks run first, then every produced name is registered to find
//! collisions, and finally every test step dependency is checked against the
//! producers. All problems found are reported together.

pub mod build_root;
pub mod context;
pub mod dependencies;
pub mod error;
pub mod images;
pub mod names;
pub mod operator;
pub mod promotion;
pub mod resources;
pub mod test_config;

pub use context::{ConfigContext, PathSegment};
pub use dependencies::{missing_source, validate_test_step_dependencies, MissingSource};
pub use error::{ConfigurationError, ValidationError, ValidationErrors};
pub use names::{collect_producers, NameRegistry, Producer};
pub use operator::ArtifactResolver;

use crate::core::config::{ReleaseBuildConfiguration, LATEST_RELEASE_NAME};
use tracing::debug;

/// Reported when a configuration has nothing to build or test
pub const EMPTY_CONFIGURATION_MESSAGE: &str =
    "you must define at least one test or image build in 'tests' or 'images'";

/// Reported when per-repository command lists appear outside a merged configuration
pub const MERGED_LISTS_MESSAGE: &str = "it is not permissible to directly set: ‘binary_build_commands_list’, ‘test_binary_build_commands_list’, ‘rpm_build_commands_list’, or ‘rpm_build_location_list’";

/// Reported when several build roots appear outside a merged configuration
pub const MERGED_BUILD_ROOTS_MESSAGE: &str =
    "it is not permissible to directly set: ‘build_roots’ directly in the config";

/// Validate a whole configuration.
///
/// `merged` marks configurations assembled from several repositories, the
/// only ones allowed to use per-repository fields.
pub fn validate(config: &ReleaseBuildConfiguration, merged: bool) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let root = ConfigContext::new();

    debug!("Validating configuration policies (merged: {})", merged);
    if config.images.is_empty() && config.tests.is_empty() && !config.promotes_additional_images() {
        errors.push(ValidationError::global(EMPTY_CONFIGURATION_MESSAGE));
    }
    if !merged {
        let uses_lists = !config.binary_build_commands_list.is_empty()
            || !config.test_binary_build_commands_list.is_empty()
            || !config.rpm_build_commands_list.is_empty()
            || !config.rpm_build_location_list.is_empty();
        if uses_lists {
            errors.push(ValidationError::global(MERGED_LISTS_MESSAGE));
        }
        if !config.input.build_roots.is_empty() {
            errors.push(ValidationError::global(MERGED_BUILD_ROOTS_MESSAGE));
        }
    }

    debug!("Validating inputs");
    if config.input.build_root.is_some() || config.input.build_roots.is_empty() {
        errors.extend(build_root::validate_build_root(
            &root.field("build_root"),
            config.input.build_root.as_ref(),
            !config.images.is_empty(),
        ));
    }
    let build_roots = root.field("build_roots");
    for (reference, build_root) in &config.input.build_roots {
        errors.extend(build_root::validate_build_root(
            &build_roots.key(reference),
            Some(build_root),
            false,
        ));
    }
    errors.extend(images::validate_image_stream_tag_reference_map(
        &root.field("base_images"),
        &config.input.base_images,
    ));
    errors.extend(images::validate_image_stream_tag_reference_map(
        &root.field("base_rpm_images"),
        &config.input.base_rpm_images,
    ));
    errors.extend(images::validate_external_images(
        &root.field("external_images"),
        config.input.external_images.as_ref(),
    ));
    if let Some(tag_specification) = &config.input.release_tag_configuration {
        errors.extend(promotion::validate_release_tag_configuration(
            &root.field("tag_specification"),
            tag_specification,
        ));
    }
    errors.extend(promotion::validate_releases(
        &root.field("releases"),
        &config.input.releases,
    ));
    errors.extend(resources::validate_resources(
        &root.field("resources"),
        &config.resources,
    ));

    debug!("Registering produced names");
    let mut registry = NameRegistry::new();
    errors.extend(names::register_inputs(config, &mut registry));
    errors.extend(images::validate_images(
        &root.field("images"),
        &config.images,
        &mut registry,
    ));
    errors.extend(names::register_from_images(config, &mut registry));

    debug!("Validating {} tests", config.tests.len());
    errors.extend(test_config::validate_tests(
        &root.field("tests"),
        &config.tests,
        &config.images,
    ));

    if let Some(operator) = &config.operator {
        let resolver = |name: &str| is_produced(config, &registry, name);
        errors.extend(operator::validate_operator(
            &root.field("operator"),
            operator,
            &resolver,
        ));
    }

    errors.extend(dependencies::validate_test_step_dependencies(config));

    if let Some(promotion_config) = &config.promotion {
        errors.extend(promotion::validate_promotion(
            &root.field("promotion"),
            promotion_config,
            promotion::promotes_official_images(promotion_config),
            !config.images.is_empty(),
            config.input.release_tag_configuration.as_ref(),
            &config.input.releases,
        ));
    }

    debug!("Validation found {} problems", errors.len());
    errors.into_result()
}

/// Validate a configuration, wrapping any problems into a single error
pub fn is_valid_configuration(
    config: &ReleaseBuildConfiguration,
    merged: bool,
) -> Result<(), ConfigurationError> {
    validate(config, merged).map_err(ConfigurationError::Invalid)
}

/// Whether `name` is an image the pipeline will have available.
///
/// Names not produced by the configuration are expected to come from the
/// `latest` release.
fn is_produced(config: &ReleaseBuildConfiguration, registry: &NameRegistry, name: &str) -> bool {
    let resolved = config.resolve_artifact_stream(name, None);
    if !resolved.explicit {
        return config.has_release(LATEST_RELEASE_NAME);
    }
    missing_source(config, registry, &resolved).is_none()
}
