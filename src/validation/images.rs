//! Image build and image import checks

use crate::core::config::{
    ExternalImage, ImageStreamTagReference, ProjectDirectoryImageBuildStepConfiguration,
    BUNDLE_SOURCE,
};
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;
use crate::validation::names::NameRegistry;
use std::collections::BTreeMap;

/// Architectures an image may additionally be built for
pub const VALID_ARCHITECTURES: [&str; 4] = ["amd64", "arm64", "ppc64le", "s390x"];

/// Validate the images list, claiming every target name in `registry`
pub fn validate_images(
    ctx: &ConfigContext,
    images: &[ProjectDirectoryImageBuildStepConfiguration],
    registry: &mut NameRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, image) in images.iter().enumerate() {
        let image_ctx = ctx.index(i);
        if image.to.is_empty() {
            errors.push(image_ctx.error("`to` must be set"));
        } else if let Err(err) = registry.claim(&image.to, &image_ctx) {
            errors.push(err);
        }

        let inputs = &image.inputs;
        if inputs.dockerfile_literal.is_some()
            && (!inputs.context_dir.is_empty() || !inputs.dockerfile_path.is_empty())
        {
            errors.push(image_ctx.error(
                "dockerfile_literal is mutually exclusive with context_dir and dockerfile_path",
            ));
        }

        for arch in &image.additional_architectures {
            if !VALID_ARCHITECTURES.contains(&arch.as_str()) {
                errors.push(image_ctx.error(format!(
                    "invalid architecture: {}. Use one of {}",
                    arch,
                    VALID_ARCHITECTURES.join(", ")
                )));
            }
        }
    }
    errors
}

/// Validate a map of imported images such as `base_images`
pub fn validate_image_stream_tag_reference_map(
    ctx: &ConfigContext,
    images: &BTreeMap<String, ImageStreamTagReference>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (name, reference) in images {
        let entry = ctx.key(name);
        if name == BUNDLE_SOURCE {
            errors.push(entry.error(format!(
                "cannot be named {} as it is reserved for the operator bundle source",
                BUNDLE_SOURCE
            )));
        }
        if reference.tag.is_empty() {
            errors.push(entry.field("tag").error("must be set"));
        }
    }
    errors
}

/// Validate images pulled from external registries
pub fn validate_external_images(
    ctx: &ConfigContext,
    external: Option<&BTreeMap<String, ExternalImage>>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let Some(external) = external else {
        return errors;
    };
    for (name, image) in external {
        let entry = ctx.key(name);
        if !image.pull_spec.is_empty() {
            errors.push(entry.field("pull_spec").error(
                "is deprecated and mutually exclusive with registry, namespace, name and tag; it must not be set",
            ));
        }
        if image.registry.is_empty() {
            errors.push(entry.field("registry").error("must be set"));
        }
        let reference = &image.image_stream_tag_reference;
        for (field, value) in [
            ("namespace", &reference.namespace),
            ("name", &reference.name),
            ("tag", &reference.tag),
        ] {
            if value.is_empty() {
                errors.push(entry.field(field).error("must be set"));
            }
        }
    }
    errors
}
