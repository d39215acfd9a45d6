//! Test definitions and the steps they run

use crate::core::config::{ImageStreamTagReference, ResourceRequirements};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A test run by the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestStepConfiguration {
    /// Test name
    #[serde(default, rename = "as")]
    pub name: String,

    /// Commands run by a container test
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commands: String,

    /// Single-container test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerTestConfiguration>,

    /// Multi-stage test referencing registry steps
    #[serde(default, rename = "steps", skip_serializing_if = "Option::is_none")]
    pub multi_stage: Option<MultiStageTestConfiguration>,

    /// Multi-stage test with every step fully spelled out
    #[serde(default, rename = "literal_steps", skip_serializing_if = "Option::is_none")]
    pub multi_stage_literal: Option<MultiStageTestConfigurationLiteral>,
}

/// Container a single-container test runs in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerTestConfiguration {
    pub from: String,
}

/// Multi-stage test whose steps may be references, chains or literals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiStageTestConfiguration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_profile: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre: Vec<TestStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<TestStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<TestStep>,
    /// Rebinds the dependency feeding an environment variable
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependency_overrides: BTreeMap<String, String>,
}

/// Multi-stage test made only of literal steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiStageTestConfigurationLiteral {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_profile: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre: Vec<LiteralTestStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<LiteralTestStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<LiteralTestStep>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependency_overrides: BTreeMap<String, String>,
}

/// A step of a templated multi-stage test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestStep {
    /// Step resolved from the step registry
    Reference(StepReference),
    /// Chain of steps resolved from the step registry
    Chain(ChainReference),
    /// Inline step definition
    Literal(LiteralTestStep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepReference {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainReference {
    pub chain: String,
}

impl TestStep {
    pub fn as_literal(&self) -> Option<&LiteralTestStep> {
        match self {
            TestStep::Literal(step) => Some(step),
            _ => None,
        }
    }
}

/// A fully-specified step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteralTestStep {
    #[serde(default, rename = "as")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_image: Option<ImageStreamTagReference>,
    #[serde(default)]
    pub commands: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<StepDependency>,
}

/// An artifact a step needs, exposed through an environment variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDependency {
    /// Dependency reference, `[<stream>:]<tag>`
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub env: String,
}

impl StepDependency {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            env: String::new(),
        }
    }

    pub fn with_env(mut self, env: &str) -> Self {
        self.env = env.to_string();
        self
    }
}

/// Phase of a multi-stage test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPhase {
    Pre,
    Test,
    Post,
}

impl TestPhase {
    pub const ALL: [TestPhase; 3] = [TestPhase::Pre, TestPhase::Test, TestPhase::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestPhase::Pre => "pre",
            TestPhase::Test => "test",
            TestPhase::Post => "post",
        }
    }
}

impl fmt::Display for TestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which flavour of multi-stage test a literal step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiStageKind {
    /// `steps`
    Templated,
    /// `literal_steps`
    Literal,
}

impl MultiStageKind {
    pub fn field_name(&self) -> &'static str {
        match self {
            MultiStageKind::Templated => "steps",
            MultiStageKind::Literal => "literal_steps",
        }
    }
}

/// A literal step together with where it sits in its test
#[derive(Debug, Clone, Copy)]
pub struct LiteralStepRef<'a> {
    pub kind: MultiStageKind,
    pub phase: TestPhase,
    pub index: usize,
    pub step: &'a LiteralTestStep,
}

impl TestStepConfiguration {
    /// Dependency overrides declared by the multi-stage test, if any
    pub fn dependency_overrides(&self) -> Option<&BTreeMap<String, String>> {
        if let Some(ms) = &self.multi_stage {
            Some(&ms.dependency_overrides)
        } else {
            self.multi_stage_literal
                .as_ref()
                .map(|ms| &ms.dependency_overrides)
        }
    }

    /// Every literal step of the test, in pre, test, post order.
    ///
    /// Registry references and chains are skipped as their content is not
    /// known without the step registry.
    pub fn literal_steps(&self) -> Vec<LiteralStepRef<'_>> {
        let mut steps = Vec::new();
        if let Some(ms) = &self.multi_stage {
            for phase in TestPhase::ALL {
                let list = match phase {
                    TestPhase::Pre => &ms.pre,
                    TestPhase::Test => &ms.test,
                    TestPhase::Post => &ms.post,
                };
                for (index, step) in list.iter().enumerate() {
                    if let Some(step) = step.as_literal() {
                        steps.push(LiteralStepRef {
                            kind: MultiStageKind::Templated,
                            phase,
                            index,
                            step,
                        });
                    }
                }
            }
        }
        if let Some(ms) = &self.multi_stage_literal {
            for phase in TestPhase::ALL {
                let list = match phase {
                    TestPhase::Pre => &ms.pre,
                    TestPhase::Test => &ms.test,
                    TestPhase::Post => &ms.post,
                };
                for (index, step) in list.iter().enumerate() {
                    steps.push(LiteralStepRef {
                        kind: MultiStageKind::Literal,
                        phase,
                        index,
                        step,
                    });
                }
            }
        }
        steps
    }

    /// Dependency name after applying the test's overrides for its env
    pub fn effective_dependency_name<'a>(&'a self, dependency: &'a StepDependency) -> &'a str {
        self.dependency_overrides()
            .and_then(|overrides| overrides.get(&dependency.env))
            .map(String::as_str)
            .unwrap_or(&dependency.name)
    }
}
