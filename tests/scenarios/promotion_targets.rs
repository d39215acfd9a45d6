//! Test: promotion targets and release imports

use crate::helpers::*;

#[test]
fn test_overlapping_targets() {
    let config = config_with_base(
        r#"
images:
  - to: image
promotion:
  to:
    - namespace: foo
      tag: bar
    - namespace: foo
      tag: bar
"#,
    );
    assert_errors(
        &config,
        &[
            "promotion.to[0]: promotes to the same target as promotion.to[1]",
            "promotion.to[1]: promotes to the same target as promotion.to[0]",
        ],
    );
}

#[test]
fn test_reserved_namespace() {
    let config = config_with_base(
        r#"
images:
  - to: image
promotion:
  to:
    - namespace: openshift-some
      tag: bar
"#,
    );
    assert_errors(
        &config,
        &["promotion.to[0]: cannot promote to namespace openshift-some matching this regular expression: (^kube.*|^openshift.*|^default$|^redhat.*)"],
    );
}

#[test]
fn test_official_images_require_latest_release() {
    let promotion = r#"
images:
  - to: image
promotion:
  to:
    - namespace: ocp
      name: "4.15"
"#;
    let config = config_with_base(promotion);
    assert_errors(
        &config,
        &["importing the release stream is required to ensure the promoted images to the namespace ocp can be integrated properly. Although it can be achieved by tag_specification or releases[\"latest\"], adding an e2e test is strongly suggested"],
    );

    let config = config_with_base(&format!(
        "{}releases:\n  latest:\n    candidate:\n      product: ocp\n      stream: nightly\n      version: \"4.15\"\n",
        promotion
    ));
    assert_valid(&config);
}

#[test]
fn test_disabled_official_target_needs_no_release() {
    let config = config_with_base(
        r#"
images:
  - to: image
promotion:
  to:
    - namespace: ocp
      name: "4.15"
      disabled: true
"#,
    );
    assert_valid(&config);
}

#[test]
fn test_release_imports() {
    let config = config_with_base(
        r#"
images:
  - to: image
tag_specification:
  namespace: ocp
releases:
  initial:
    integration:
      namespace: ocp
      name: "4.14"
  broken: {}
"#,
    );
    assert_errors(
        &config,
        &[
            "tag_specification.name: must be set",
            "releases[broken]: exactly one of integration, candidate, prerelease or release must be set",
        ],
    );
}

#[test]
fn test_resources_blanket_entry_required() {
    let config = config_from_yaml(
        r#"
build_root:
  from_repository: true
images:
  - to: image
resources:
  unit:
    requests:
      cpu: 100m
    limits:
      ci-operator.openshift.io/shm: 3G
"#,
    );
    assert_errors(
        &config,
        &[
            "resources: must specify blanket policy for '*'",
            "resources[unit].limits.ci-operator.openshift.io/shm: 3G exceeds the maximum of 2Gi",
        ],
    );
}
