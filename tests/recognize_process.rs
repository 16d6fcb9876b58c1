//! Recognition runs against a real child process.
//!
//! The stand-in recognizer is a small shell script: on every request it counts
//! the observations logged so far and reports that count as a score.

#![cfg(unix)]

use std::path::{Path, PathBuf};

use goalrec::config::GoalRecConfig;
use goalrec::pipeline;

const ORACLE: &str = r#"
obs="$1"
while IFS= read -r line; do
  case "$line" in
    x*)
      n=$(wc -l < "$obs" | tr -d ' ')
      printf "'boiledegg': 0.%s\n" "$n"
      printf "omelette: NaN\n"
      printf "x\n"
      ;;
  esac
done
"#;

fn setup(dir: &Path) -> (GoalRecConfig, PathBuf) {
    let script = dir.join("oracle.sh");
    std::fs::write(&script, ORACLE).unwrap();
    let obs = dir.join("demo").join("obs.dat");

    let mut config = GoalRecConfig::default();
    config.goals = vec!["boiledegg".into(), "omelette".into()];
    config.groups.insert("egg", ["shell_egg"]);
    config.recognizer.command = vec![
        "/bin/sh".into(),
        script.display().to_string(),
        obs.display().to_string(),
    ];
    config.recognizer.observations = obs.clone();
    config.recognizer.read_timeout_secs = 30;
    (config, obs)
}

#[test]
fn single_file_writes_scores_next_to_input() {
    let dir = tempfile::TempDir::new().unwrap();
    let (config, obs) = setup(dir.path());
    let trial = dir.path().join("1-boiledegg.txt");
    std::fs::write(
        &trial,
        "0 pan on stove\n1 pan on stove\n2 shell_egg in pan\n3 shell_egg in pan\n",
    )
    .unwrap();

    let summaries = pipeline::recognize(&trial, None, &config).unwrap();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.frames, 4);
    assert_eq!(summary.requests, 2);
    assert_eq!(summary.scores, dir.path().join("scores_1-boiledegg.csv"));

    let csv = std::fs::read_to_string(&summary.scores).unwrap();
    assert_eq!(
        csv,
        "frame,boiledegg,omelette\n0,0.1,-1\n1,0.1,-1\n2,0.2,-1\n3,0.2,-1\n"
    );

    let trail = std::fs::read_to_string(&obs).unwrap();
    assert_eq!(
        trail,
        "(pan1),(stove1),(on pan1 stove1)\n\
         (egg1),(pan1),(in egg1 pan1),(shell_egg egg1)\n"
    );
}

#[test]
fn folder_runs_each_file_with_fresh_log() {
    let dir = tempfile::TempDir::new().unwrap();
    let (config, obs) = setup(dir.path());
    let trials = dir.path().join("trials");
    std::fs::create_dir(&trials).unwrap();
    std::fs::write(trials.join("1-a.txt"), "0 A on B\n1 A on C\n2 A on D\n").unwrap();
    std::fs::write(trials.join("2-b.txt"), "0 X on Y\n").unwrap();
    let out = dir.path().join("scores");

    let summaries = pipeline::recognize(&trials, Some(&out), &config).unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].requests, 3);
    assert_eq!(summaries[1].requests, 1);
    assert!(out.join("scores_1-a.csv").exists());

    // The second run truncated the trail and restarted its count.
    let csv = std::fs::read_to_string(out.join("scores_2-b.csv")).unwrap();
    assert_eq!(csv, "frame,boiledegg,omelette\n0,0.1,-1\n");
    assert_eq!(std::fs::read_to_string(&obs).unwrap(), "(X1),(Y1),(on X1 Y1)\n");
}

#[test]
fn missing_recognizer_aborts_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut config, _) = setup(dir.path());
    config.recognizer.command = vec!["/nonexistent/recognizer".into()];
    let trial = dir.path().join("1-a.txt");
    std::fs::write(&trial, "0 A on B\n").unwrap();

    let err = pipeline::recognize(&trial, None, &config).unwrap_err();
    assert!(err.to_string().contains("failed to spawn recognizer"));
    assert!(!dir.path().join("scores_1-a.csv").exists());
}
