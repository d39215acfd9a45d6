//! Build root checks

use crate::core::config::BuildRootImageConfiguration;
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;

/// Validate a build root.
///
/// A missing build root is only a problem when there are images to build in
/// it. When present, exactly one way of obtaining it must be chosen.
pub fn validate_build_root(
    ctx: &ConfigContext,
    build_root: Option<&BuildRootImageConfiguration>,
    has_images: bool,
) -> Option<ValidationError> {
    let Some(build_root) = build_root else {
        if has_images {
            return Some(ctx.error(
                "when 'images' are specified 'build_root' is required and must have image_stream_tag, project_image or from_repository set",
            ));
        }
        return None;
    };

    let sources = [
        build_root.image_stream_tag_reference.is_some(),
        build_root.project_image_build.is_some(),
        build_root.from_repository,
    ]
    .iter()
    .filter(|set| **set)
    .count();

    match sources {
        0 => Some(ctx.error("one of image_stream_tag, project_image or from_repository must be set")),
        1 => None,
        _ => Some(ctx.error(
            "image_stream_tag, project_image and from_repository are mutually exclusive, set only one",
        )),
    }
}
