//! Resolution of dependency references to image stream tags
//!
//! A reference has the form `[<stream>:]<tag>`. Bare names are looked up in
//! the configuration; anything the configuration does not produce is assumed
//! to be a component of the `latest` release.

use crate::core::config::{
    ReleaseBuildConfiguration, LATEST_RELEASE_NAME, PIPELINE_BINARIES, PIPELINE_IMAGE_STREAM,
    PIPELINE_ROOT, PIPELINE_RPMS, PIPELINE_SOURCE, PIPELINE_TEST_BINARIES, RELEASE_IMAGE_STREAM,
    STABLE_IMAGE_STREAM, STABLE_STREAM_PREFIX,
};
use crate::core::test_step::StepDependency;
use serde::Serialize;
use std::fmt;

/// Pipeline tags that always exist or are tied to well-known fields
pub const WELL_KNOWN_PIPELINE_TAGS: [&str; 5] = [
    PIPELINE_ROOT,
    PIPELINE_SOURCE,
    PIPELINE_BINARIES,
    PIPELINE_TEST_BINARIES,
    PIPELINE_RPMS,
];

/// A claimed cluster's release standing in for a release of the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimRelease {
    /// Name the claimed release is imported under
    pub release_name: String,
    /// Release of the configuration it replaces
    pub override_name: String,
}

impl ClaimRelease {
    pub fn new(release_name: &str, override_name: &str) -> Self {
        Self {
            release_name: release_name.to_string(),
            override_name: override_name.to_string(),
        }
    }

    fn overrides(&self, release: &str) -> bool {
        self.override_name == release
    }
}

/// Where a dependency physically lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactStream {
    pub stream: String,
    pub tag: String,
    /// Whether the reference named its stream or a produced image
    pub explicit: bool,
}

impl ArtifactStream {
    fn new(stream: impl Into<String>, tag: impl Into<String>, explicit: bool) -> Self {
        Self {
            stream: stream.into(),
            tag: tag.into(),
            explicit,
        }
    }
}

impl fmt::Display for ArtifactStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stream, self.tag)
    }
}

/// Stream selected by a reference prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind<'a> {
    Pipeline,
    /// `stable` or `stable-<release>`, carrying the release name
    Stable(&'a str),
    Release,
    Other(&'a str),
}

impl<'a> StreamKind<'a> {
    pub fn parse(stream: &'a str) -> Self {
        match stream {
            PIPELINE_IMAGE_STREAM => StreamKind::Pipeline,
            STABLE_IMAGE_STREAM => StreamKind::Stable(LATEST_RELEASE_NAME),
            RELEASE_IMAGE_STREAM => StreamKind::Release,
            _ => match stream.strip_prefix(STABLE_STREAM_PREFIX) {
                Some(release) => StreamKind::Stable(release),
                None => StreamKind::Other(stream),
            },
        }
    }
}

impl ReleaseBuildConfiguration {
    /// Whether a bare name refers to something this configuration produces
    pub fn is_explicitly_produced(&self, name: &str) -> bool {
        self.input.base_images.contains_key(name)
            || self.input.base_rpm_images.contains_key(name)
            || WELL_KNOWN_PIPELINE_TAGS.contains(&name)
            || self.images.iter().any(|image| image.to == name)
    }

    /// Stream a bare name resolves to, and whether that was explicit
    pub fn image_stream_for(&self, name: &str) -> (&'static str, bool) {
        if self.is_explicitly_produced(name) {
            (PIPELINE_IMAGE_STREAM, true)
        } else {
            (STABLE_IMAGE_STREAM, false)
        }
    }

    /// Resolve a reference to its stream and tag.
    ///
    /// `claim` rebinds the release it overrides to the claimed cluster's
    /// release for `stable`, `stable-<release>` and `release` references.
    pub fn resolve_artifact_stream(
        &self,
        name: &str,
        claim: Option<&ClaimRelease>,
    ) -> ArtifactStream {
        let Some((stream, tag)) = name.split_once(':') else {
            let (stream, explicit) = self.image_stream_for(name);
            return ArtifactStream::new(stream, name, explicit);
        };

        match StreamKind::parse(stream) {
            StreamKind::Pipeline => ArtifactStream::new(PIPELINE_IMAGE_STREAM, tag, true),
            StreamKind::Stable(release) => match claim {
                Some(claim) if claim.overrides(release) => ArtifactStream::new(
                    format!("{}{}", STABLE_STREAM_PREFIX, claim.release_name),
                    tag,
                    true,
                ),
                _ => ArtifactStream::new(stream, tag, true),
            },
            StreamKind::Release => match claim {
                Some(claim) if claim.overrides(tag) => {
                    ArtifactStream::new(RELEASE_IMAGE_STREAM, claim.release_name.as_str(), true)
                }
                _ => ArtifactStream::new(RELEASE_IMAGE_STREAM, tag, true),
            },
            StreamKind::Other(stream) => ArtifactStream::new(stream, tag, true),
        }
    }

    /// Resolve a step dependency by its declared name
    pub fn dependency_parts(
        &self,
        dependency: &StepDependency,
        claim: Option<&ClaimRelease>,
    ) -> ArtifactStream {
        self.resolve_artifact_stream(&dependency.name, claim)
    }
}
