//! Resource requirement checks

use crate::core::config::{ResourceConfiguration, ResourceList, ResourceRequirements};
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

/// Key of the entry applying to every step
pub const BLANKET_RESOURCE_KEY: &str = "*";

/// Shared memory mounted into test containers
pub const SHM_RESOURCE: &str = "ci-operator.openshift.io/shm";

pub const NVIDIA_GPU_RESOURCE: &str = "nvidia.com/gpu";

/// Resource names accepted in requests and limits
pub const ALLOWED_RESOURCES: [&str; 5] = [
    "cpu",
    "memory",
    "ephemeral-storage",
    SHM_RESOURCE,
    NVIDIA_GPU_RESOURCE,
];

/// Largest shared memory request or limit, 2Gi
pub const MAX_SHM_BYTES: f64 = 2.0 * 1024.0 * 1024.0 * 1024.0;

/// Validate the resource map of a configuration
pub fn validate_resources(ctx: &ConfigContext, resources: &ResourceConfiguration) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if resources.is_empty() {
        errors.push(ctx.error("should be specified to provide resource requests"));
        return errors;
    }
    if !resources.contains_key(BLANKET_RESOURCE_KEY) {
        errors.push(ctx.error("must specify blanket policy for '*'"));
    }
    for (key, requirements) in resources {
        errors.extend(validate_resource_requirements(&ctx.key(key), requirements));
    }
    errors
}

/// Validate a single requests/limits pair
pub fn validate_resource_requirements(
    ctx: &ConfigContext,
    requirements: &ResourceRequirements,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(validate_resource_list(&ctx.field("limits"), &requirements.limits));
    errors.extend(validate_resource_list(&ctx.field("requests"), &requirements.requests));
    if requirements.requests.is_empty() && requirements.limits.is_empty() {
        errors.push(ctx.error("should have at least one request or limit"));
    }
    errors
}

fn validate_resource_list(ctx: &ConfigContext, list: &ResourceList) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (name, value) in list {
        let entry = ctx.field(name);
        if !ALLOWED_RESOURCES.contains(&name.as_str()) {
            errors.push(entry.error(format!(
                "invalid resource type {}, only {} are allowed",
                name,
                ALLOWED_RESOURCES.join(", ")
            )));
            continue;
        }
        match parse_quantity(value) {
            None => errors.push(entry.error(format!("invalid quantity: {:?}", value))),
            Some(quantity) if quantity <= 0.0 => {
                errors.push(entry.error(format!("{} must be a positive quantity", value)))
            }
            Some(quantity) if name == SHM_RESOURCE && quantity > MAX_SHM_BYTES => {
                errors.push(entry.error(format!("{} exceeds the maximum of 2Gi", value)))
            }
            Some(_) => {}
        }
    }
    errors
}

fn quantity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))(Ki|Mi|Gi|Ti|Pi|Ei|[numkMGTPE]|[eE][+-]?[0-9]+)?$")
            .expect("quantity pattern is valid")
    })
}

/// Parse a Kubernetes quantity (`100m`, `2Gi`, `1e3`) into its base value
pub fn parse_quantity(value: &str) -> Option<f64> {
    let captures = quantity_pattern().captures(value.trim())?;
    let number: f64 = captures.get(1)?.as_str().parse().ok()?;
    let multiplier = match captures.get(2).map(|m| m.as_str()) {
        None => 1.0,
        Some("n") => 1e-9,
        Some("u") => 1e-6,
        Some("m") => 1e-3,
        Some("k") => 1e3,
        Some("M") => 1e6,
        Some("G") => 1e9,
        Some("T") => 1e12,
        Some("P") => 1e15,
        Some("E") => 1e18,
        Some("Ki") => 1024.0,
        Some("Mi") => 1024f64.powi(2),
        Some("Gi") => 1024f64.powi(3),
        Some("Ti") => 1024f64.powi(4),
        Some("Pi") => 1024f64.powi(5),
        Some("Ei") => 1024f64.powi(6),
        Some(exponent) => {
            let power: i32 = exponent[1..].parse().ok()?;
            10f64.powi(power)
        }
    };
    let quantity = number * multiplier;
    quantity.is_finite().then_some(quantity)
}
