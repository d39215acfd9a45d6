//! Test: dependencies declared by multi-stage test steps

use crate::helpers::*;

/// Test that every kind of producer satisfies its dependencies
#[test]
fn test_valid_dependencies() {
    let config = config_with_base(
        r#"
tag_specification:
  namespace: ocp
  name: "4.5"
releases:
  custom:
    release:
      version: "4.7"
      channel: stable
binary_build_commands: make
images:
  - to: image
operator:
  bundles:
    - dockerfile_path: bundle.Dockerfile
      context_dir: manifests
    - as: my-bundle
      dockerfile_path: bundle.Dockerfile
      context_dir: manifests
tests:
  - as: e2e
    steps:
      cluster_profile: aws
      pre:
        - as: setup
          from: src
          commands: setup
          dependencies:
            - name: src
            - name: bin
            - name: installer
            - name: "pipeline:ci-index"
        - ref: ipi-install
        - as: bundles
          from: src
          commands: bundles
          dependencies:
            - name: "pipeline:my-bundle"
            - name: "stable:installer"
            - name: "stable-initial:installer"
      test:
        - as: run
          from: src
          commands: run
          dependencies:
            - name: "pipeline:bin"
      post:
        - chain: gather
        - as: teardown
          from: src
          commands: teardown
          dependencies:
            - name: image
  - as: literal
    literal_steps:
      pre:
        - as: cli
          from: src
          commands: cli
          dependencies:
            - name: "stable-custom:cli"
            - name: ci-index-my-bundle
      test:
        - as: payload
          from: src
          commands: payload
          dependencies:
            - name: "release:custom"
            - name: "release:initial"
      post:
        - as: image
          from: src
          commands: image
          dependencies:
            - name: "pipeline:image"
"#,
    );
    assert_valid(&config);
}

/// Test that overridden dependencies are checked under their new name
#[test]
fn test_overridden_dependencies() {
    let config = config_with_base(
        r#"
tests:
  - as: templated
    steps:
      test:
        - as: run
          from: src
          commands: run
          dependencies:
            - name: "pipeline:bin"
              env: OH_SNAP
      dependency_overrides:
        OH_SNAP: nice
  - as: literal
    literal_steps:
      test:
        - as: run
          from: src
          commands: run
          dependencies:
            - name: ci-index-my-bundle
              env: OO_INDEX
            - name: rpms
              env: SOME_THING
      dependency_overrides:
        OO_INDEX: coolstuff
        SOME_THING: awwwyeah
"#,
    );
    assert_valid(&config);
}

/// Test that each unmet dependency is reported at its own location
#[test]
fn test_invalid_dependencies() {
    let config = config_with_base(
        r#"
tests:
  - as: templated
    steps:
      pre:
        - as: a
          from: src
          commands: a
          dependencies:
            - name: "stable:installer"
            - name: "stable:grafana"
        - as: b
          from: src
          commands: b
          dependencies:
            - name: "stable-custom:cli"
            - name: "totally-invalid:cli"
      test:
        - as: c
          from: src
          commands: c
          dependencies:
            - name: "pipeline:bin"
        - as: d
          from: src
          commands: d
          dependencies:
            - name: "pipeline:test-bin"
      post:
        - as: e
          from: src
          commands: e
          dependencies:
            - name: "pipeline:image"
  - as: literal
    literal_steps:
      pre:
        - as: f
          from: src
          commands: f
          dependencies:
            - name: "release:custom"
            - name: "pipeline:ci-index"
        - as: g
          from: src
          commands: g
          dependencies:
            - name: "pipeline:ci-index-my-bundle"
      post:
        - as: h
          from: src
          commands: h
          dependencies:
            - name: "pipeline:rpms"
"#,
    );
    assert_errors(
        &config,
        &[
            r#"tests[0].steps.pre[0].dependencies[0]: cannot determine source for dependency "stable:installer" - this dependency requires a "latest" release, which is not configured"#,
            r#"tests[0].steps.pre[0].dependencies[1]: cannot determine source for dependency "stable:grafana" - this dependency requires a "latest" release, which is not configured"#,
            r#"tests[0].steps.pre[1].dependencies[0]: cannot determine source for dependency "stable-custom:cli" - this dependency requires a "custom" release, which is not configured"#,
            r#"tests[0].steps.pre[1].dependencies[1]: cannot determine source for dependency "totally-invalid:cli" - ensure the correct ImageStream name was provided"#,
            r#"tests[0].steps.test[0].dependencies[0]: cannot determine source for dependency "pipeline:bin" - this dependency requires built binaries, which are not configured"#,
            r#"tests[0].steps.test[1].dependencies[0]: cannot determine source for dependency "pipeline:test-bin" - this dependency requires built test binaries, which are not configured"#,
            r#"tests[0].steps.post[0].dependencies[0]: cannot determine source for dependency "pipeline:image" - no base image import, project image build, or bundle image build is configured to provide this dependency"#,
            r#"tests[1].literal_steps.pre[0].dependencies[0]: cannot determine source for dependency "release:custom" - this dependency requires a "custom" release, which is not configured"#,
            r#"tests[1].literal_steps.pre[0].dependencies[1]: cannot determine source for dependency "pipeline:ci-index" - this dependency requires an operator bundle configuration, which is not configured"#,
            r#"tests[1].literal_steps.pre[1].dependencies[0]: cannot determine source for dependency "pipeline:ci-index-my-bundle" - this dependency requires an operator bundle configuration, which is not configured"#,
            r#"tests[1].literal_steps.post[0].dependencies[0]: cannot determine source for dependency "pipeline:rpms" - this dependency requires built RPMs, which are not configured"#,
        ],
    );
}

/// Test that a missing build root is reported for `pipeline:root`
#[test]
fn test_root_requires_build_root() {
    let config = config_from_yaml(
        r#"
resources:
  "*":
    requests:
      cpu: "1"
tests:
  - as: literal
    literal_steps:
      test:
        - as: run
          from: src
          commands: run
          dependencies:
            - name: "pipeline:root"
"#,
    );
    assert_errors(
        &config,
        &[r#"tests[0].literal_steps.test[0].dependencies[0]: cannot determine source for dependency "pipeline:root" - this dependency requires a build root, which is not configured"#],
    );
}

/// Test that adding the missing producer fixes the configuration
#[test]
fn test_binaries_become_available() {
    let tests = r#"
tests:
  - as: literal
    literal_steps:
      test:
        - as: run
          from: src
          commands: run
          dependencies:
            - name: "pipeline:bin"
"#;
    let config = config_with_base(tests);
    let messages = validation_messages(&config, false);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("built binaries, which are not configured"));

    let config = config_with_base(&format!("binary_build_commands: make\n{}", tests));
    assert_valid(&config);
}
