//! Test: operator bundles and pull spec substitutions

use crate::helpers::*;

#[test]
fn test_substitutions_resolve_against_the_pipeline() {
    let config = config_with_base(
        r#"
tag_specification:
  namespace: ocp
  name: "4.15"
images:
  - to: operator
operator:
  bundles:
    - as: my-bundle
      dockerfile_path: bundle.Dockerfile
      context_dir: manifests
      base_index: an-index
      update_graph: replaces
  substitutions:
    - pullspec: quay.io/org/operator:v1
      with: operator
    - pullspec: quay.io/org/operator-index:v1
      with: "pipeline:ci-index-my-bundle"
    - pullspec: quay.io/openshift/cli:v1
      with: cli
    - pullspec: quay.io/openshift/installer:v1
      with: "stable:installer"
"#,
    );
    assert_valid(&config);
}

#[test]
fn test_unresolvable_substitutions() {
    let config = config_with_base(
        r#"
images:
  - to: operator
operator:
  bundles:
    - dockerfile_path: bundle.Dockerfile
  substitutions:
    - pullspec: quay.io/org/operator:v1
      with: operator-typo
    - pullspec: quay.io/org/operator:v1
      with: "pipeline:operator-typo"
    - pullspec: ""
      with: ""
"#,
    );
    assert_errors(
        &config,
        &[
            "operator.substitute[0].with: could not resolve 'operator-typo' to an image involved in the config",
            "operator.substitute[1].with: could not resolve 'pipeline:operator-typo' to an image involved in the config",
            "operator.substitute[2].pullspec: must be set",
            "operator.substitute[2].with: must be set",
        ],
    );
}

#[test]
fn test_bundle_index_options_need_a_name() {
    let config = config_with_base(
        r#"
images:
  - to: operator
operator:
  bundles:
    - base_index: an-index
      update_graph: sideways
      skip_building_index: true
"#,
    );
    assert_errors(
        &config,
        &[
            "operator.bundles[0].base_index: base_index requires 'as' to be set",
            "operator.bundles[0].skip_building_index: skip_building_index requires 'as' to be set",
            "operator.bundles[0].update_graph: update_graph must be semver, semver-skippatch, or replaces",
        ],
    );
}

#[test]
fn test_bundle_source_cannot_be_imported() {
    let config = config_with_base(
        r#"
base_images:
  src-bundle:
    namespace: ci
    name: bundle
    tag: latest
images:
  - to: operator
"#,
    );
    let messages = validation_messages(&config, false);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("base_images[src-bundle]: cannot be named src-bundle"));
}
