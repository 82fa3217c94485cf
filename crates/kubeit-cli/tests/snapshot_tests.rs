//! Snapshot tests for report display formatting

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run kubeit command and capture output
fn kubeit_output(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_kubeit"))
        .args(args)
        .env_remove("KUBEIT_SOURCE")
        .env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE")
        .output()
        .expect("Failed to execute kubeit");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn create_config(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// Replace the temporary directory with a stable placeholder
fn normalize_output(output: &str, dir: &TempDir) -> String {
    output
        .replace(dir.path().to_str().unwrap(), "[DIR]")
        .trim_end()
        .to_string()
}

const SERVICE: &str = r#"apiVersion: kubeit.io/v1alpha1
kind: Service
metadata:
  name: payments
spec:
  environments: [staging]
  organization: retail
"#;

const NAMED: &str = r#"apiVersion: kubeit.io/v1alpha1
kind: NamedValues
metadata:
  name: staging
spec:
  values:
    - type: mapping
      data:
        ingress.host: payments.staging.example.com
"#;

const HELM_APP: &str = r#"apiVersion: kubeit.io/v1alpha1
kind: HelmApplication
metadata:
  name: payments
spec:
  chart:
    repository: https://charts.example.com
    name: payments
    version: 3.1.0
    releaseName: payments
  values:
    - type: mapping
      data:
        image.repository: $dockerImageRepository
    - type: named
    - type: raw
      data:
        resources:
          limits:
            memory: 256Mi
"#;

mod validate_snapshots {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let dir = create_config(&[("svc.yaml", SERVICE)]);
        let (stdout, _stderr, success) =
            kubeit_output(&["validate", dir.path().to_str().unwrap()]);

        assert!(!success);
        insta::assert_snapshot!(normalize_output(&stdout, &dir), @r###"
        → Validating kubeit resources from [DIR]

          ✗ Loading failed: 2 errors in 1 source

          → [DIR]/svc.yaml (2 errors)
            ✗ Resource of kind Service with name payments has errors: spec.organization: invalid value 'retail', must be one of: bet, data-eng, infra, media
            ✗ Resource of kind Service with name payments has errors: spec.sourceRepository: is required
        "###);
    }

    #[test]
    fn test_kind_typo_shows_hint() {
        let dir = create_config(&[(
            "typo.yaml",
            "apiVersion: kubeit.io/v1alpha1\nkind: HelmAplication\nmetadata:\n  name: x\n",
        )]);
        let (stdout, _stderr, success) =
            kubeit_output(&["validate", dir.path().to_str().unwrap()]);

        assert!(!success);
        insta::assert_snapshot!(normalize_output(&stdout, &dir), @r###"
        → Validating kubeit resources from [DIR]

          ✗ Loading failed: 1 error in 1 source

          → [DIR]/typo.yaml (1 error)
            ✗ unknown kind: HelmAplication
              hint: did you mean `HelmApplication`?
        "###);
    }
}

mod values_snapshots {
    use super::*;

    #[test]
    fn test_values_output() {
        let dir = create_config(&[("named.yaml", NAMED), ("app.yaml", HELM_APP)]);
        let (stdout, _stderr, success) = kubeit_output(&[
            "values",
            dir.path().to_str().unwrap(),
            "payments",
            "--named",
            "staging",
        ]);

        assert!(success);
        insta::assert_snapshot!(normalize_output(&stdout, &dir), @r###"
        --set image.repository=$dockerImageRepository!!NOT_GENERATED_FROM_DOCKER_IMAGE!!
        --set ingress.host=payments.staging.example.com
        ---
        resources:
          limits:
            memory: 256Mi
        "###);
    }
}
