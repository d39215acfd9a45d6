//! Build configuration loaded from YAML

use crate::core::test_step::TestStepConfiguration;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Image stream holding everything built during a single pipeline run
pub const PIPELINE_IMAGE_STREAM: &str = "pipeline";

/// Image stream holding promoted component tags of the `latest` release
pub const STABLE_IMAGE_STREAM: &str = "stable";

/// Image stream holding full release payloads
pub const RELEASE_IMAGE_STREAM: &str = "release";

/// Prefix for per-release stable streams (`stable-<release>`)
pub const STABLE_STREAM_PREFIX: &str = "stable-";

/// Release imported by default and by the legacy tag specification
pub const LATEST_RELEASE_NAME: &str = "latest";

/// Second release derived from the legacy tag specification
pub const INITIAL_RELEASE_NAME: &str = "initial";

/// Well-known tags in the pipeline stream
pub const PIPELINE_ROOT: &str = "root";
pub const PIPELINE_SOURCE: &str = "src";
pub const PIPELINE_BINARIES: &str = "bin";
pub const PIPELINE_TEST_BINARIES: &str = "test-bin";
pub const PIPELINE_RPMS: &str = "rpms";

/// Operator bundle artifacts
pub const BUNDLE_SOURCE: &str = "src-bundle";
pub const UNNAMED_BUNDLE_INDEX: &str = "ci-index";
pub const BUNDLE_INDEX_PREFIX: &str = "ci-index-";
pub const UNNAMED_BUNDLE_PREFIX: &str = "ci-bundle";

/// Suffix of the companion image produced for every base RPM image
pub const WITHOUT_RPMS_SUFFIX: &str = "-without-rpms";

/// Top-level build configuration for a repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseBuildConfiguration {
    /// Everything imported into the pipeline before builds start
    #[serde(flatten)]
    pub input: InputConfiguration,

    /// Commands that build the repository binaries into `bin`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub binary_build_commands: String,

    /// Commands that build test binaries into `test-bin`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test_binary_build_commands: String,

    /// Commands that build RPMs into `rpms`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rpm_build_commands: String,

    /// Where the RPM build leaves its output
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rpm_build_location: String,

    /// Per-repository binary build commands (merged configurations only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binary_build_commands_list: Vec<RefCommands>,

    /// Per-repository test binary build commands (merged configurations only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_binary_build_commands_list: Vec<RefCommands>,

    /// Per-repository RPM build commands (merged configurations only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpm_build_commands_list: Vec<RefCommands>,

    /// Per-repository RPM output locations (merged configurations only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpm_build_location_list: Vec<RefLocation>,

    /// Images built from the repository
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ProjectDirectoryImageBuildStepConfiguration>,

    /// Operator bundle builds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorStepConfiguration>,

    /// Tests run against the built artifacts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestStepConfiguration>,

    /// Where built images end up once merged
    #[serde(default, rename = "promotion", skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionConfiguration>,

    /// Resource requirements per step, `*` being the blanket entry
    #[serde(default)]
    pub resources: ResourceConfiguration,
}

/// Inputs to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfiguration {
    /// Image the repository is built in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_root: Option<BuildRootImageConfiguration>,

    /// Build roots keyed by repository reference (merged configurations only)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_roots: BTreeMap<String, BuildRootImageConfiguration>,

    /// Images imported into the pipeline stream as-is
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub base_images: BTreeMap<String, ImageStreamTagReference>,

    /// Images imported and then layered with the built RPMs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub base_rpm_images: BTreeMap<String, ImageStreamTagReference>,

    /// Images pulled from registries outside the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_images: Option<BTreeMap<String, ExternalImage>>,

    /// Legacy single-release import, providing `latest` and `initial`
    #[serde(default, rename = "tag_specification", skip_serializing_if = "Option::is_none")]
    pub release_tag_configuration: Option<ReleaseTagConfiguration>,

    /// Named release imports
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub releases: BTreeMap<String, UnresolvedRelease>,
}

/// Reference to an image stream tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageStreamTagReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

impl ImageStreamTagReference {
    pub fn new(namespace: &str, name: &str, tag: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Name under which this image is aliased in the pipeline stream
    pub fn pipeline_alias(&self) -> String {
        format!("{}-{}-{}", self.namespace, self.name, self.tag)
    }
}

/// How the build root image is obtained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildRootImageConfiguration {
    /// Import an existing image stream tag
    #[serde(default, rename = "image_stream_tag", skip_serializing_if = "Option::is_none")]
    pub image_stream_tag_reference: Option<ImageStreamTagReference>,

    /// Build the root from a Dockerfile in the repository
    #[serde(default, rename = "project_image", skip_serializing_if = "Option::is_none")]
    pub project_image_build: Option<ProjectDirectoryImageBuildInputs>,

    /// Read the build root definition from the repository itself
    #[serde(default)]
    pub from_repository: bool,
}

/// Inputs for building an image from the repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDirectoryImageBuildInputs {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context_dir: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dockerfile_path: String,

    /// Inline Dockerfile, replacing the repository one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile_literal: Option<String>,
}

/// An image built from the repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDirectoryImageBuildStepConfiguration {
    /// Pipeline image the build starts from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,

    /// Pipeline image produced by the build
    #[serde(default)]
    pub to: String,

    #[serde(flatten)]
    pub inputs: ProjectDirectoryImageBuildInputs,

    /// Architectures built in addition to amd64
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_architectures: Vec<String>,
}

/// Build commands for one repository of a merged configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefCommands {
    #[serde(rename = "ref")]
    pub reference: String,
    pub commands: String,
}

/// RPM output location for one repository of a merged configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefLocation {
    #[serde(rename = "ref")]
    pub reference: String,
    pub location: String,
}

/// Image imported from an external registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalImage {
    #[serde(default)]
    pub registry: String,

    #[serde(flatten)]
    pub image_stream_tag_reference: ImageStreamTagReference,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pull_secret: String,

    /// Deprecated flat pull spec
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pull_spec: String,
}

/// Legacy release import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseTagConfiguration {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub include_built_images: bool,
}

/// A named release import. Exactly one source should be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedRelease {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<Integration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<Prerelease>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
}

/// Release assembled from an integration stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub include_built_images: bool,
}

/// Release candidate payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub stream: String,
    pub version: String,
}

/// Pre-release payload resolved from a version bound
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prerelease {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub architecture: String,
    pub version_bounds: VersionBounds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionBounds {
    pub lower: String,
    pub upper: String,
}

/// Published release payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub architecture: String,
    pub version: String,
    pub channel: String,
}

/// Operator bundle configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorStepConfiguration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundles: Vec<Bundle>,

    /// Pull specs in the manifests replaced with pipeline images
    #[serde(default, rename = "substitutions", skip_serializing_if = "Vec::is_empty")]
    pub substitutions: Vec<PullSpecSubstitution>,
}

/// A single operator bundle build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default, rename = "as", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dockerfile_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context_dir: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_index: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub update_graph: String,
    #[serde(default)]
    pub skip_building_index: bool,
}

impl Bundle {
    /// Pipeline name of this bundle at `position` in the bundle list
    pub fn image_name(&self, position: usize) -> String {
        if self.name.is_empty() {
            format!("{}{}", UNNAMED_BUNDLE_PREFIX, position)
        } else {
            self.name.clone()
        }
    }

    /// Pipeline name of the index this bundle is added to
    pub fn index_name(&self) -> String {
        if self.name.is_empty() {
            UNNAMED_BUNDLE_INDEX.to_string()
        } else {
            format!("{}{}", BUNDLE_INDEX_PREFIX, self.name)
        }
    }
}

/// Replacement of a pull spec within operator manifests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullSpecSubstitution {
    #[serde(default)]
    pub pullspec: String,
    #[serde(default)]
    pub with: String,
}

/// Promotion of built images once changes merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotionConfiguration {
    #[serde(default, rename = "to")]
    pub targets: Vec<PromotionTarget>,
}

/// A single promotion destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotionTarget {
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Extra images promoted, keyed by destination name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_images: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_images: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Resource requirements keyed by step name, `*` applying to all steps
pub type ResourceConfiguration = BTreeMap<String, ResourceRequirements>;

/// Resource name to quantity
pub type ResourceList = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: ResourceList,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: ResourceList,
}

impl ReleaseBuildConfiguration {
    /// Load a build configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse a build configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ReleaseBuildConfiguration =
            serde_yaml::from_str(yaml).context("Failed to parse build configuration")?;
        Ok(config)
    }

    /// Whether any build root is configured, single or per repository
    pub fn has_build_root(&self) -> bool {
        self.input.build_root.is_some() || !self.input.build_roots.is_empty()
    }

    pub fn has_binary_build(&self) -> bool {
        !self.binary_build_commands.is_empty() || !self.binary_build_commands_list.is_empty()
    }

    pub fn has_test_binary_build(&self) -> bool {
        !self.test_binary_build_commands.is_empty()
            || !self.test_binary_build_commands_list.is_empty()
    }

    pub fn has_rpm_build(&self) -> bool {
        !self.rpm_build_commands.is_empty() || !self.rpm_build_commands_list.is_empty()
    }

    /// Whether a release of this name can be imported.
    ///
    /// The legacy tag specification provides both `latest` and `initial`.
    pub fn has_release(&self, name: &str) -> bool {
        if self.input.releases.contains_key(name) {
            return true;
        }
        self.input.release_tag_configuration.is_some()
            && (name == LATEST_RELEASE_NAME || name == INITIAL_RELEASE_NAME)
    }

    /// Whether any promotion target carries additional images
    pub fn promotes_additional_images(&self) -> bool {
        self.promotion
            .as_ref()
            .map(|p| p.targets.iter().any(|t| !t.additional_images.is_empty()))
            .unwrap_or(false)
    }
}
