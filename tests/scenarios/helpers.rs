//! Test utility functions for ci-resolver scenarios
#![allow(dead_code)]

use ci_resolver::core::config::ReleaseBuildConfiguration;
use ci_resolver::validation;

/// Inputs shared by most scenarios: a build root and the blanket resources
pub const BASE_YAML: &str = r#"
build_root:
  from_repository: true
resources:
  "*":
    requests:
      cpu: "1"
"#;

/// Parse a configuration from YAML string
pub fn config_from_yaml(yaml: &str) -> ReleaseBuildConfiguration {
    ReleaseBuildConfiguration::from_yaml(yaml)
        .unwrap_or_else(|e| panic!("Failed to parse configuration YAML: {:#}", e))
}

/// Parse a configuration made of `BASE_YAML` followed by `yaml`
pub fn config_with_base(yaml: &str) -> ReleaseBuildConfiguration {
    config_from_yaml(&format!("{}{}", BASE_YAML, yaml))
}

/// Validation messages for a configuration, in reporting order
pub fn validation_messages(config: &ReleaseBuildConfiguration, merged: bool) -> Vec<String> {
    match validation::validate(config, merged) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.messages(),
    }
}

/// Assert a configuration passes validation
pub fn assert_valid(config: &ReleaseBuildConfiguration) {
    let messages = validation_messages(config, false);
    assert!(
        messages.is_empty(),
        "Configuration should be valid, but got:\n{}",
        messages.join("\n")
    );
}

/// Assert a configuration fails validation with exactly these messages
pub fn assert_errors(config: &ReleaseBuildConfiguration, expected: &[&str]) {
    let messages = validation_messages(config, false);
    assert_eq!(
        messages, expected,
        "Expected errors:\n{}\nActual:\n{}",
        expected.join("\n"),
        messages.join("\n")
    );
}

/// Assert the aggregated error of a configuration
pub fn assert_configuration_error(config: &ReleaseBuildConfiguration, merged: bool, expected: &str) {
    match validation::is_valid_configuration(config, merged) {
        Ok(()) => panic!("Configuration should be invalid with: {}", expected),
        Err(err) => assert_eq!(err.to_string(), expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_yaml_is_parsed() {
        let config = config_with_base("images:\n  - to: image\n");
        assert!(config.input.build_root.is_some());
        assert_eq!(config.images.len(), 1);
        assert_valid(&config);
    }

    #[test]
    fn test_validation_messages_of_empty_config() {
        let config = config_from_yaml(BASE_YAML);
        assert_eq!(
            validation_messages(&config, false),
            vec!["you must define at least one test or image build in 'tests' or 'images'"]
        );
    }
}
