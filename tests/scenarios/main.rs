//! Scenario-based tests for ci-resolver

mod helpers;

mod duplicate_names;
mod merged_config;
mod operator_bundles;
mod promotion_targets;
mod test_dependencies;
