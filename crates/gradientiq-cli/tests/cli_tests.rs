//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gradientiq() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("gradientiq").unwrap()
}

const LOOPS_ANSWER: &str = "Use a for loop to iterate the array and sum each element because it \
accumulates the total, therefore the result is the sum.";

#[test]
fn analyze_loops_answer() {
    gradientiq()
        .args(["analyze", "--concept", "Loops", "--text", LOOPS_ANSWER])
        .assert()
        .success()
        .stdout(predicate::str::contains("Concept: Loops (Coding)"))
        .stdout(predicate::str::contains("Signal: Needs Review"))
        .stdout(predicate::str::contains("Composite: 61/100"))
        .stdout(predicate::str::contains("rule-based text heuristics"));
}

#[test]
fn analyze_json_output() {
    let output = gradientiq()
        .args([
            "analyze", "--concept", "Loops", "--text", LOOPS_ANSWER, "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["signal"], "needs_review");
    assert_eq!(json["composite"], 61);
    assert_eq!(json["scores"]["keyword"]["score"], 56);
    assert_eq!(json["scores"]["flow"]["score"], 20);
    assert!(json["behavior"].as_array().unwrap().is_empty());
}

#[test]
fn analyze_short_answer_is_insufficient() {
    gradientiq()
        .args(["analyze", "--concept", "Loops", "--text", "loop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Insufficient Content"))
        .stdout(predicate::str::contains("Composite: 0/100"))
        .stdout(predicate::str::contains(
            "Provide a more detailed answer with explanations",
        ));
}

#[test]
fn analyze_reports_writing_notices() {
    let answer = "First and foremost a loop will iterate over the array index. \
Furthermore the loop adds each element to a running sum counter. \
Moreover the loop stops once the index reaches the array length. \
The body of the loop runs while the condition still holds true. \
A loop without any exit condition will never stop its iteration. \
In conclusion a for loop sums the array without copying any code.";

    gradientiq()
        .args(["analyze", "--concept", "Loops", "--text", answer])
        .assert()
        .success()
        .stdout(predicate::str::contains("Writing:"))
        .stdout(predicate::str::contains("uniform, template-like writing"))
        .stdout(predicate::str::contains("generic phrasing"));
}

#[test]
fn replay_uses_earlier_answers_as_baseline() {
    let dir = TempDir::new().unwrap();
    let script = serde_json::json!({
        "attempts": [
            {
                "concept": "Loops",
                "started_at": "2024-05-01T10:00:00Z",
                "submitted_at": "2024-05-01T10:01:00Z",
                "answer": "A loop is a way to go on. It can end. So we use it."
            },
            {
                "concept": "Kinematics",
                "started_at": "2024-05-01T10:02:00Z",
                "submitted_at": "2024-05-01T10:03:00Z",
                "answer": "Displacement characterizes positional change, whereas velocity quantifies instantaneous displacement relative to elapsed time."
            }
        ]
    });
    let path = dir.path().join("script.json");
    std::fs::write(&path, script.to_string()).unwrap();

    let output = gradientiq()
        .args(["replay", "--format", "json", "--script"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &json["outcomes"][0]["submission"]["result"];
    let second = &json["outcomes"][1]["submission"]["result"];
    assert!(!first["writing"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("quality_jump")));
    assert!(second["writing"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("quality_jump")));
    assert_eq!(second["profile"]["quality_jump"]["detected"], true);
}

#[test]
fn analyze_reads_answer_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answer.txt");
    std::fs::write(&path, LOOPS_ANSWER).unwrap();

    gradientiq()
        .args(["analyze", "--concept", "Loops", "--answer"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs Review"));
}

#[test]
fn analyze_unknown_concept() {
    gradientiq()
        .args(["analyze", "--concept", "Alchemy", "--text", LOOPS_ANSWER])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("concept 'Alchemy' not found"));
}

#[test]
fn analyze_requires_an_answer() {
    gradientiq()
        .args(["analyze", "--concept", "Loops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one of --answer or --text"));
}

#[test]
fn analyze_rejects_unknown_format() {
    gradientiq()
        .args([
            "analyze", "--concept", "Loops", "--text", LOOPS_ANSWER, "--format", "xml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'xml'"));
}

#[test]
fn analyze_with_custom_weights() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gradientiq.toml");
    std::fs::write(
        &config,
        "[scoring.weights]\nkeyword = 1.0\nflow = 0.0\nrepetition = 0.0\npaste = 0.0\n",
    )
    .unwrap();

    gradientiq()
        .args(["analyze", "--concept", "Loops", "--text", LOOPS_ANSWER, "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Composite: 56/100"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[progression]\nunlock_threshold = 250\n").unwrap();

    gradientiq()
        .args(["analyze", "--concept", "Loops", "--text", LOOPS_ANSWER, "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unlock_threshold"));
}

#[test]
fn concepts_lists_builtin_catalog() {
    gradientiq()
        .arg("concepts")
        .assert()
        .success()
        .stdout(predicate::str::contains("14 concepts"))
        .stdout(predicate::str::contains("Encryption Basics"))
        .stdout(predicate::str::contains("Step-based Explanation"));
}

#[test]
fn concepts_filters_by_subject() {
    gradientiq()
        .args(["concepts", "--subject", "Physics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kinematics"))
        .stdout(predicate::str::contains("Laws of Motion"))
        .stdout(predicate::str::contains("Loops").not());
}

#[test]
fn concepts_unknown_subject() {
    gradientiq()
        .args(["concepts", "--subject", "Art"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("subject 'Art' not found"));
}

#[test]
fn validate_builtin_catalog_file() {
    gradientiq()
        .arg("validate")
        .arg("--catalog")
        .arg("../gradientiq-core/catalogs/builtin.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 subjects, 14 concepts"))
        .stdout(predicate::str::contains("All catalogs valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("messy.toml"),
        r#"
[catalog]
id = "messy"
name = "Messy"

[[concepts]]
id = "Atoms"
subject = "Chemistry"
keywords = []
"#,
    )
    .unwrap();

    gradientiq()
        .arg("validate")
        .arg("--catalog")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[Atoms] WARNING: no keywords"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    gradientiq()
        .arg("validate")
        .arg("--catalog")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn replay_demo_script() {
    gradientiq()
        .arg("replay")
        .arg("--script")
        .arg("../../demos/loops-replay.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rejected: concept is locked: Recursion"))
        .stdout(predicate::str::contains("Originality Likely"))
        .stdout(predicate::str::contains("Unlocked: Recursion"))
        .stdout(predicate::str::contains("Insufficient Content"))
        .stdout(predicate::str::contains("unlocked"));
}

#[test]
fn replay_json_output() {
    let output = gradientiq()
        .args([
            "replay",
            "--script",
            "../../demos/loops-replay.json",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["outcome"], "rejected");
    assert_eq!(outcomes[1]["outcome"], "submitted");
    assert_eq!(
        outcomes[1]["submission"]["progress"]["newly_unlocked"],
        "Recursion"
    );
    assert_eq!(
        outcomes[1]["submission"]["result"]["signal"],
        "originality_likely"
    );
    assert_eq!(
        outcomes[2]["submission"]["result"]["signal"],
        "insufficient_content"
    );

    let progress = json["progress"].as_array().unwrap();
    assert_eq!(progress.len(), 14);
    let recursion = progress
        .iter()
        .find(|p| p["concept_id"] == "Recursion")
        .unwrap();
    assert_eq!(recursion["unlocked"], true);
    assert_eq!(recursion["attempts"], 1);
}

#[test]
fn replay_flags_paste() {
    let dir = TempDir::new().unwrap();
    let pasted = "A loop repeats a block of code while a condition holds. ".repeat(3);
    let script = serde_json::json!({
        "attempts": [{
            "concept": "Loops",
            "started_at": "2024-05-01T10:00:00Z",
            "events": [
                { "at": "2024-05-01T10:00:01.000Z", "text": "A" },
                { "at": "2024-05-01T10:00:01.300Z", "text": "A l" },
                { "at": "2024-05-01T10:00:01.600Z", "text": "A lo" },
                { "at": "2024-05-01T10:00:03.000Z", "text": pasted }
            ],
            "submitted_at": "2024-05-01T10:00:20Z"
        }]
    });
    let path = dir.path().join("script.json");
    std::fs::write(&path, script.to_string()).unwrap();

    let output = gradientiq()
        .args(["replay", "--format", "json", "--script"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let behavior = json["outcomes"][0]["submission"]["result"]["behavior"]
        .as_array()
        .unwrap()
        .clone();
    assert!(behavior.contains(&serde_json::json!("typed_incrementally")));
    assert!(behavior.contains(&serde_json::json!("paste_detected")));
}

#[test]
fn replay_malformed_script() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    gradientiq()
        .args(["replay", "--script"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse replay script"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradientiq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradientiq.toml"))
        .stdout(predicate::str::contains("Created catalogs/example.toml"));

    assert!(dir.path().join("gradientiq.toml").exists());
    assert!(dir.path().join("catalogs/example.toml").exists());

    gradientiq()
        .current_dir(dir.path())
        .args(["validate", "--catalog", "catalogs/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All catalogs valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    gradientiq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    gradientiq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
