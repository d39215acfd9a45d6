//! Registry of every artifact name the pipeline can produce

use crate::core::config::{
    ImageStreamTagReference, ReleaseBuildConfiguration, BUNDLE_SOURCE, PIPELINE_BINARIES,
    PIPELINE_ROOT, PIPELINE_RPMS, PIPELINE_TEST_BINARIES, UNNAMED_BUNDLE_INDEX,
    WITHOUT_RPMS_SUFFIX,
};
use crate::validation::context::ConfigContext;
use crate::validation::error::ValidationError;
use serde::Serialize;
use std::collections::HashMap;

/// Where an artifact name was first claimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Producer {
    pub name: String,
    /// Field path of the claiming configuration entry
    pub origin: String,
}

/// Flat namespace of produced artifact names.
///
/// The first claim of a name wins and is kept as its origin; later claims
/// are reported as duplicates.
#[derive(Debug, Default)]
pub struct NameRegistry {
    producers: Vec<Producer>,
    by_name: HashMap<String, usize>,
    /// `from_image` aliases, which may be shared by identical references
    aliases: HashMap<String, ImageStreamTagReference>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for the field at `ctx`, failing there if already taken
    pub fn claim(&mut self, name: &str, ctx: &ConfigContext) -> Result<(), ValidationError> {
        if let Some(existing) = self.by_name.get(name) {
            return Err(duplicate(ctx, name, &self.producers[*existing].origin));
        }
        self.insert(name, ctx.to_string());
        Ok(())
    }

    /// Claim the pipeline alias of a `from_image` reference.
    ///
    /// Several steps may import the same image; only a different producer
    /// under the same name is a duplicate. A collision is reported once per
    /// reference, at its first use.
    pub fn claim_from_image(
        &mut self,
        reference: &ImageStreamTagReference,
        location: &ConfigContext,
    ) -> Result<(), ValidationError> {
        let name = reference.pipeline_alias();
        if let Some(existing) = self.aliases.get(&name) {
            if existing == reference {
                return Ok(());
            }
        }
        if let Some(existing) = self.by_name.get(&name) {
            let err = duplicate(location, &name, &self.producers[*existing].origin);
            self.aliases.entry(name).or_insert_with(|| reference.clone());
            return Err(err);
        }
        self.aliases.insert(name.clone(), reference.clone());
        self.insert(&name, location.to_string());
        Ok(())
    }

    fn insert(&mut self, name: &str, origin: String) {
        self.by_name.insert(name.to_string(), self.producers.len());
        self.producers.push(Producer {
            name: name.to_string(),
            origin,
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn origin(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|i| self.producers[*i].origin.as_str())
    }

    /// Producers in claim order
    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    pub fn into_producers(self) -> Vec<Producer> {
        self.producers
    }
}

fn duplicate(location: &ConfigContext, name: &str, origin: &str) -> ValidationError {
    location.error(format!(
        "duplicate image name '{}' (previously defined by field '{}')",
        name, origin
    ))
}

/// Claim everything produced before the images list: build root, base
/// images, base RPM images, build commands and operator bundles.
pub fn register_inputs(
    config: &ReleaseBuildConfiguration,
    registry: &mut NameRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let root = ConfigContext::new();
    let mut claim = |name: &str, ctx: &ConfigContext| {
        if let Err(err) = registry.claim(name, ctx) {
            errors.push(err);
        }
    };

    if config.input.build_root.is_some() {
        let ctx = root.field("build_root");
        claim(PIPELINE_ROOT, &ctx);
    } else if !config.input.build_roots.is_empty() {
        let ctx = root.field("build_roots");
        claim(PIPELINE_ROOT, &ctx);
    }

    let base_images = root.field("base_images");
    for name in config.input.base_images.keys() {
        let ctx = base_images.key(name);
        claim(name.as_str(), &ctx);
    }

    let base_rpm_images = root.field("base_rpm_images");
    for name in config.input.base_rpm_images.keys() {
        let ctx = base_rpm_images.key(name);
        claim(name.as_str(), &ctx);
        claim(&format!("{}{}", name, WITHOUT_RPMS_SUFFIX), &ctx);
    }

    let commands = [
        (PIPELINE_BINARIES, "binary_build_commands", !config.binary_build_commands.is_empty()),
        (PIPELINE_BINARIES, "binary_build_commands_list", !config.binary_build_commands_list.is_empty()),
        (PIPELINE_TEST_BINARIES, "test_binary_build_commands", !config.test_binary_build_commands.is_empty()),
        (PIPELINE_TEST_BINARIES, "test_binary_build_commands_list", !config.test_binary_build_commands_list.is_empty()),
        (PIPELINE_RPMS, "rpm_build_commands", !config.rpm_build_commands.is_empty()),
        (PIPELINE_RPMS, "rpm_build_commands_list", !config.rpm_build_commands_list.is_empty()),
    ];
    for (name, field, set) in commands {
        if set {
            let ctx = root.field(field);
            claim(name, &ctx);
        }
    }

    if let Some(operator) = &config.operator {
        let operator_ctx = root.field("operator");
        let bundles = operator_ctx.field("bundles");
        let mut has_unnamed = false;
        for (i, bundle) in operator.bundles.iter().enumerate() {
            if bundle.name.is_empty() {
                has_unnamed = true;
                let ctx = bundles.index(i);
                claim(&bundle.image_name(i), &ctx);
            } else {
                let ctx = bundles.index(i).field("as");
                claim(&bundle.image_name(i), &ctx);
                claim(&bundle.index_name(), &ctx);
            }
        }
        if has_unnamed {
            claim(UNNAMED_BUNDLE_INDEX, &operator_ctx);
        }
        claim(BUNDLE_SOURCE, &operator_ctx);
    }

    errors
}

/// Claim the pipeline aliases of every multi-stage `from_image`.
///
/// Collisions are reported under `steps` for both templated and literal
/// tests.
pub fn register_from_images(
    config: &ReleaseBuildConfiguration,
    registry: &mut NameRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let tests = ConfigContext::new().field("tests");
    for (i, test) in config.tests.iter().enumerate() {
        for step in test.literal_steps() {
            let Some(reference) = &step.step.from_image else {
                continue;
            };
            let location = tests
                .index(i)
                .field("steps")
                .field(step.phase.as_str())
                .index(step.index)
                .field("from_image");
            if let Err(err) = registry.claim_from_image(reference, &location) {
                errors.push(err);
            }
        }
    }
    errors
}

/// Every name the configuration produces, in precedence order.
///
/// Collisions are ignored here; the first claimant is kept.
pub fn collect_producers(config: &ReleaseBuildConfiguration) -> NameRegistry {
    let mut registry = NameRegistry::new();
    register_inputs(config, &mut registry);
    let images = ConfigContext::new().field("images");
    for (i, image) in config.images.iter().enumerate() {
        if !image.to.is_empty() {
            let _ = registry.claim(&image.to, &images.index(i));
        }
    }
    register_from_images(config, &mut registry);
    registry
}
