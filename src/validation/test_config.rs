//! Test definition checks

use crate::core::config::{ProjectDirectoryImageBuildStepConfiguration, UNNAMED_BUNDLE_INDEX};
use crate::core::test_step::TestStepConfiguration;
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const MAX_TEST_NAME_LENGTH: usize = 253;

fn object_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("object name pattern is valid")
    })
}

/// Validate test names and the kind of every test.
///
/// Test names share a namespace with built images as both become targets.
pub fn validate_tests(
    ctx: &ConfigContext,
    tests: &[TestStepConfiguration],
    images: &[ProjectDirectoryImageBuildStepConfiguration],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let image_names: HashSet<&str> = images.iter().map(|image| image.to.as_str()).collect();
    let mut test_names: HashSet<&str> = HashSet::new();

    for (i, test) in tests.iter().enumerate() {
        let test_ctx = ctx.index(i);
        let name_ctx = test_ctx.field("as");
        let name = test.name.as_str();

        if name.is_empty() {
            errors.push(name_ctx.error("is required"));
        } else if name == "images" {
            errors.push(name_ctx.error(
                "should not be called 'images' because it gets confused with '[images]' target",
            ));
        } else if name.starts_with(UNNAMED_BUNDLE_INDEX) {
            errors.push(name_ctx.error(format!(
                "should not begin with '{0}' because it gets confused with '{0}' and `{0}-...` targets",
                UNNAMED_BUNDLE_INDEX
            )));
        } else if name.len() > MAX_TEST_NAME_LENGTH || !object_name_pattern().is_match(name) {
            errors.push(name_ctx.error(format!(
                "'{}' is not a valid Kubernetes object name",
                name
            )));
        }

        if !name.is_empty() {
            if image_names.contains(name) {
                errors.push(name_ctx.error(format!(
                    "duplicated name {:?} already declared in 'images'",
                    name
                )));
            } else if !test_names.insert(name) {
                errors.push(name_ctx.error(format!(
                    "duplicated name {:?} already declared in 'tests'",
                    name
                )));
            }
        }

        let kinds = [
            test.container.is_some(),
            test.multi_stage.is_some(),
            test.multi_stage_literal.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        match kinds {
            0 => errors.push(test_ctx.error(
                "has no type, you may want to specify 'container' for a container based test",
            )),
            1 => {}
            _ => errors.push(test_ctx.error("has more than one type")),
        }

        if test.container.is_some() && test.commands.is_empty() {
            errors.push(test_ctx.field("commands").error("is required for container tests"));
        }
    }
    errors
}
