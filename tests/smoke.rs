use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("mednlp-assistant").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn interactions_command_prints_matches() {
    let out_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("mednlp-assistant").expect("binary exists");
    let output = cmd
        .env("OUTPUTS_DIR", out_dir.path())
        .env("NER_BACKEND", "dictionary")
        .env_remove("INTERACTIONS_CSV")
        .args(["interactions", "--drugs", "Methotrexate, Amoxicillin"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["drugs"], serde_json::json!(["methotrexate", "amoxicillin"]));
    assert_eq!(
        report["interactions"][0]["drug_pair"],
        serde_json::json!(["methotrexate", "amoxicillin"])
    );
}
