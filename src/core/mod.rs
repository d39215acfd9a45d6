//! Core domain models for build configurations
//!
//! This module defines the configuration a repository declares: its inputs,
//! the images it builds, its tests and where its images are promoted.

pub mod config;
pub mod test_step;

pub use config::ReleaseBuildConfiguration;
pub use test_step::{LiteralTestStep, StepDependency, TestStepConfiguration};
