//! Test: fields reserved to configurations merged from several repositories

use crate::helpers::*;

const PLURAL_FIELDS: &str = r#"
promotion:
  to:
    - namespace: ci
      tag: latest
      additional_images:
        name: src
binary_build_commands_list:
  - ref: org.repo
    commands: build this
  - ref: org.other-repo
    commands: build that
test_binary_build_commands_list:
  - ref: org.repo
    commands: build test this
  - ref: org.other-repo
    commands: build test that
rpm_build_commands_list:
  - ref: org.repo
    commands: rpms
rpm_build_location_list:
  - ref: org.repo
    location: here
resources:
  "*":
    requests:
      cpu: "1"
"#;

const BUILD_ROOTS: &str = r#"
build_roots:
  "":
    from_repository: true
  org.repo:
    from_repository: true
images:
  - to: image
tests:
  - as: test
    commands: commands
    container:
      from: from
resources:
  "*":
    requests:
      cpu: "1"
"#;

#[test]
fn test_merged_config_allows_plural_fields() {
    let config = config_from_yaml(PLURAL_FIELDS);
    assert!(validation_messages(&config, true).is_empty());
}

#[test]
fn test_plural_fields_rejected_outside_merged_config() {
    let config = config_from_yaml(PLURAL_FIELDS);
    assert_eq!(
        validation_messages(&config, false),
        vec!["it is not permissible to directly set: ‘binary_build_commands_list’, ‘test_binary_build_commands_list’, ‘rpm_build_commands_list’, or ‘rpm_build_location_list’"]
    );
}

#[test]
fn test_merged_config_allows_build_roots() {
    let config = config_from_yaml(BUILD_ROOTS);
    assert!(validation_messages(&config, true).is_empty());
}

#[test]
fn test_build_roots_rejected_outside_merged_config() {
    let config = config_from_yaml(BUILD_ROOTS);
    assert_configuration_error(
        &config,
        false,
        "invalid configuration: it is not permissible to directly set: ‘build_roots’ directly in the config",
    );
}

#[test]
fn test_each_build_root_is_validated() {
    let config = config_from_yaml(&BUILD_ROOTS.replace(
        "  org.repo:\n    from_repository: true\n",
        "  org.repo:\n    from_repository: true\n    image_stream_tag:\n      namespace: ci\n      name: root\n      tag: latest\n",
    ));
    assert_eq!(
        validation_messages(&config, true),
        vec!["build_roots[org.repo]: image_stream_tag, project_image and from_repository are mutually exclusive, set only one"]
    );
}

#[test]
fn test_plural_commands_produce_pipeline_images() {
    let config = config_from_yaml(&format!("{}images:\n  - to: bin\n", PLURAL_FIELDS).replace(
        "resources:",
        "build_root:\n  from_repository: true\nresources:",
    ));
    assert_eq!(
        validation_messages(&config, true),
        vec!["images[0]: duplicate image name 'bin' (previously defined by field 'binary_build_commands_list')"]
    );
}
