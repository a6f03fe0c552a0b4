use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lsp-launch"))
        .args(args)
        .env("HOME", home)
        .output()
        .expect("run lsp-launch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

fn write_settings(home: &Path, body: &str) {
    let dir = home.join(".lsp-launch");
    fs::create_dir_all(&dir).expect("settings dir");
    fs::write(dir.join("settings.yaml"), body).expect("write settings");
}

fn link_for(home: &Path, answers: &str) -> String {
    let path = home.join("answers.yaml");
    fs::write(&path, answers).expect("write answers");
    let output = run(home, &["link", path.to_str().expect("utf8 path")]);
    assert_ok(&output);
    stdout(&output).trim().to_string()
}

const ANSWERS: &str = r#"
fields:
  pairName: ETH range
  expirationTimestamp: "2099-06-30T12:00:00Z"
  collateralPerPair: 2
  priceIdentifier: ETHUSD
  longSynthName: ETH range long
  longSynthSymbol: ETHl
  shortSynthName: ETH range short
  shortSynthSymbol: ETHs
  collateralToken: WETH
  fpl: RangeBond
  lowerBound: 1000
  upperBound: 4000
  gasPrice: 60
"#;

#[test]
fn no_arguments_prints_help() {
    let home = tempdir().expect("tempdir");
    let output = run(home.path(), &[]);
    assert_ok(&output);
    assert!(stdout(&output).contains("launch <link> --simulate|--deploy"));
}

#[test]
fn unknown_command_fails() {
    let home = tempdir().expect("tempdir");
    assert_err_contains(
        &run(home.path(), &["deploy"]),
        "unknown command `deploy`",
    );
}

#[test]
fn fields_lists_library_specific_step2_fields() {
    let home = tempdir().expect("tempdir");
    let output = run(
        home.path(),
        &["fields", "step2", "KPI", "Option", "-", "Linear"],
    );
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("upperBound"));
    assert!(text.contains("Interval"));
    assert!(!text.contains("basePercentage"));

    assert_err_contains(&run(home.path(), &["fields", "step3"]), "unknown step");
}

#[test]
fn link_uses_configured_share_base_and_decodes_back() {
    let home = tempdir().expect("tempdir");
    write_settings(home.path(), "share_base_url: https://share.example/lsp\n");

    let link = link_for(home.path(), ANSWERS);
    assert!(link.starts_with("https://share.example/lsp?pairName=ETH%20range&"));

    let decoded = run(home.path(), &["decode", &link]);
    assert_ok(&decoded);
    let text = stdout(&decoded);
    assert!(text.contains("expirationTimestamp=4086504000"));
    assert!(text.contains("fpl=RangeBond"));
    assert!(text.contains("upperBound=4000"));
}

#[test]
fn launch_without_relay_reports_generic_failure_with_reason() {
    let home = tempdir().expect("tempdir");
    let link = link_for(home.path(), ANSWERS);

    assert_err_contains(
        &run(home.path(), &["launch", &link, "--simulate"]),
        "An error has occurred: no launch relay is configured",
    );
}

#[test]
fn launch_of_incomplete_link_reports_field_errors() {
    let home = tempdir().expect("tempdir");
    let output = run(
        home.path(),
        &[
            "launch",
            "https://lsp.local/launch?pairName=half%20done",
            "--deploy",
        ],
    );
    assert_err_contains(&output, "step1 rejected:");
    assert_err_contains(&output, "collateralToken: This field is required");
}

#[test]
fn invalid_settings_fail_settings_backed_commands() {
    let home = tempdir().expect("tempdir");
    write_settings(home.path(), "relay:\n  endpoint: \"\"\n");
    assert_err_contains(
        &run(home.path(), &["fields", "step1"]),
        "relay.endpoint must be non-empty",
    );
}
