//! Test: artifact names claimed by more than one producer

use crate::helpers::*;

#[test]
fn test_unique_pipeline_images() {
    let config = config_with_base(
        r#"
images:
  - to: to0
  - to: to1
"#,
    );
    assert_valid(&config);
}

#[test]
fn test_image_named_like_built_binaries() {
    let config = config_with_base(
        r#"
binary_build_commands: make build
test_binary_build_commands: make test-build
rpm_build_commands: make rpms
images:
  - to: bin
  - to: test-bin
  - to: rpms
"#,
    );
    assert_errors(
        &config,
        &[
            "images[0]: duplicate image name 'bin' (previously defined by field 'binary_build_commands')",
            "images[1]: duplicate image name 'test-bin' (previously defined by field 'test_binary_build_commands')",
            "images[2]: duplicate image name 'rpms' (previously defined by field 'rpm_build_commands')",
        ],
    );
}

#[test]
fn test_image_named_like_operator_artifacts() {
    let config = config_with_base(
        r#"
operator:
  bundles:
    - as: bundle
    - {}
images:
  - to: bundle
  - to: ci-index-bundle
  - to: ci-bundle1
  - to: ci-index
  - to: src-bundle
"#,
    );
    assert_errors(
        &config,
        &[
            "images[0]: duplicate image name 'bundle' (previously defined by field 'operator.bundles[0].as')",
            "images[1]: duplicate image name 'ci-index-bundle' (previously defined by field 'operator.bundles[0].as')",
            "images[2]: duplicate image name 'ci-bundle1' (previously defined by field 'operator.bundles[1]')",
            "images[3]: duplicate image name 'ci-index' (previously defined by field 'operator')",
            "images[4]: duplicate image name 'src-bundle' (previously defined by field 'operator')",
        ],
    );
}

#[test]
fn test_image_named_like_base_images() {
    let config = config_with_base(
        r#"
base_images:
  base-image:
    tag: tag
base_rpm_images:
  base-rpm-image:
    tag: tag
rpm_build_commands: make rpms
images:
  - to: base-image
  - to: base-rpm-image
  - to: base-rpm-image-without-rpms
"#,
    );
    assert_errors(
        &config,
        &[
            "images[0]: duplicate image name 'base-image' (previously defined by field 'base_images[base-image]')",
            "images[1]: duplicate image name 'base-rpm-image' (previously defined by field 'base_rpm_images[base-rpm-image]')",
            "images[2]: duplicate image name 'base-rpm-image-without-rpms' (previously defined by field 'base_rpm_images[base-rpm-image]')",
        ],
    );
}

#[test]
fn test_duplicated_images() {
    let config = config_with_base(
        r#"
images:
  - to: duplicated
  - to: duplicated
"#,
    );
    assert_configuration_error(
        &config,
        false,
        "invalid configuration: images[1]: duplicate image name 'duplicated' (previously defined by field 'images[0]')",
    );
}

#[test]
fn test_image_named_root() {
    let config = config_from_yaml(
        r#"
build_root:
  project_image:
    dockerfile_path: Dockerfile.root
images:
  - to: root
resources:
  "*":
    requests:
      cpu: "1"
"#,
    );
    assert_configuration_error(
        &config,
        false,
        "invalid configuration: images[0]: duplicate image name 'root' (previously defined by field 'build_root')",
    );
}

const FROM_IMAGE_TESTS: &str = r#"
tests:
  - as: test0
    literal_steps:
      test:
        - as: step-name
          commands: commands
          from_image:
            namespace: ns
            name: name
            tag: from_image
          resources:
            requests:
              cpu: "1"
  - as: test1
    literal_steps:
      test:
        - as: step-name
          commands: commands
          from_image:
            namespace: ns
            name: name
            tag: from_image
          resources:
            requests:
              cpu: "1"
"#;

#[test]
fn test_from_image_collides_with_built_image() {
    let config = config_with_base(&format!("images:\n  - to: ns-name-from_image\n{}", FROM_IMAGE_TESTS));
    assert_configuration_error(
        &config,
        false,
        "invalid configuration: tests[0].steps.test[0].from_image: duplicate image name 'ns-name-from_image' (previously defined by field 'images[0]')",
    );
}

#[test]
fn test_from_image_shared_across_tests() {
    let config = config_with_base(FROM_IMAGE_TESTS);
    assert_valid(&config);
}

#[test]
fn test_test_named_like_image() {
    let config = config_with_base(
        r#"
images:
  - to: duplicated
tests:
  - as: duplicated
    commands: make test
    container:
      from: src
"#,
    );
    assert_configuration_error(
        &config,
        false,
        r#"invalid configuration: tests[0].as: duplicated name "duplicated" already declared in 'images'"#,
    );
}

#[test]
fn test_first_claimant_wins_regardless_of_declaration_order() {
    // base_rpm_images is registered after base_images even when listed first
    let config = config_with_base(
        r#"
base_rpm_images:
  os:
    tag: rpm
base_images:
  os:
    tag: plain
images:
  - to: image
"#,
    );
    assert_errors(
        &config,
        &["base_rpm_images[os]: duplicate image name 'os' (previously defined by field 'base_images[os]')"],
    );
}
