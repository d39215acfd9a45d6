//! Promotion target checks

use crate::core::config::{
    PromotionConfiguration, PromotionTarget, ReleaseTagConfiguration, UnresolvedRelease,
    LATEST_RELEASE_NAME,
};
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Namespaces nothing may be promoted into
pub const RESERVED_NAMESPACE_PATTERN: &str = "(^kube.*|^openshift.*|^default$|^redhat.*)";

/// Namespaces holding officially released images
pub const OFFICIAL_NAMESPACES: [&str; 2] = ["ocp", "origin"];

fn reserved_namespaces() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(RESERVED_NAMESPACE_PATTERN).expect("reserved namespace pattern is valid")
    })
}

/// Whether any enabled target promotes into an official namespace
pub fn promotes_official_images(promotion: &PromotionConfiguration) -> bool {
    promotion
        .targets
        .iter()
        .any(|t| !t.disabled && OFFICIAL_NAMESPACES.contains(&t.namespace.as_str()))
}

/// Validate promotion targets.
///
/// `promotes_official_images` and `has_image_targets` are decided by the
/// caller; together they require the `latest` release to be imported so the
/// promoted images can be tested against it.
pub fn validate_promotion(
    ctx: &ConfigContext,
    promotion: &PromotionConfiguration,
    promotes_official_images: bool,
    has_image_targets: bool,
    release_tag_configuration: Option<&ReleaseTagConfiguration>,
    releases: &BTreeMap<String, UnresolvedRelease>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let targets = ctx.field("to");

    for (i, target) in promotion.targets.iter().enumerate() {
        let target_ctx = targets.index(i);
        if target.namespace.is_empty() {
            errors.push(target_ctx.error("no namespace defined"));
        }
        match (target.name.is_empty(), target.tag.is_empty()) {
            (true, true) => errors.push(target_ctx.error("no name or tag defined")),
            (false, false) => errors.push(target_ctx.error("both name and tag defined")),
            _ => {}
        }
        if reserved_namespaces().is_match(&target.namespace) {
            errors.push(target_ctx.error(format!(
                "cannot promote to namespace {} matching this regular expression: {}",
                target.namespace, RESERVED_NAMESPACE_PATTERN
            )));
        }
    }

    for (i, target) in promotion.targets.iter().enumerate() {
        for (j, other) in promotion.targets.iter().enumerate() {
            if i != j && overlaps(target, other) {
                errors.push(targets.index(i).error(format!(
                    "promotes to the same target as {}",
                    targets.index(j)
                )));
            }
        }
    }

    if promotes_official_images && has_image_targets {
        let imports_latest = release_tag_configuration.is_some()
            || releases.contains_key(LATEST_RELEASE_NAME);
        if !imports_latest {
            for namespace in target_namespaces(promotion) {
                errors.push(ValidationError::global(format!(
                    "importing the release stream is required to ensure the promoted images to the namespace {} can be integrated properly. Although it can be achieved by tag_specification or releases[\"latest\"], adding an e2e test is strongly suggested",
                    namespace
                )));
            }
        }
    }

    errors
}

fn overlaps(a: &PromotionTarget, b: &PromotionTarget) -> bool {
    if a.disabled || b.disabled || a.namespace != b.namespace {
        return false;
    }
    (!a.name.is_empty() && a.name == b.name) || (!a.tag.is_empty() && a.tag == b.tag)
}

/// Distinct namespaces of enabled targets, in declaration order
fn target_namespaces(promotion: &PromotionConfiguration) -> Vec<&str> {
    let mut namespaces: Vec<&str> = Vec::new();
    for target in promotion.targets.iter().filter(|t| !t.disabled) {
        if !namespaces.contains(&target.namespace.as_str()) {
            namespaces.push(&target.namespace);
        }
    }
    namespaces
}

/// Validate the legacy single-release import
pub fn validate_release_tag_configuration(
    ctx: &ConfigContext,
    config: &ReleaseTagConfiguration,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.name.is_empty() {
        errors.push(ctx.field("name").error("must be set"));
    }
    if config.namespace.is_empty() {
        errors.push(ctx.field("namespace").error("must be set"));
    }
    errors
}

/// Validate named release imports; each sets exactly one source
pub fn validate_releases(
    ctx: &ConfigContext,
    releases: &BTreeMap<String, UnresolvedRelease>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (name, release) in releases {
        let sources = [
            release.integration.is_some(),
            release.candidate.is_some(),
            release.prerelease.is_some(),
            release.release.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if sources != 1 {
            errors.push(ctx.key(name).error(
                "exactly one of integration, candidate, prerelease or release must be set",
            ));
        }
    }
    errors
}
