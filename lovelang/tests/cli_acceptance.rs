use lovelang_core::session::{read_save_file, write_save_file};
use lovelang_core::{QuestionBank, SessionRepository, SessionSnapshot, SqliteSessionStore};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    work: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let work = base.join("work");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&work).expect("failed to create working directory");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        seed_config(&xdg_config);

        Self {
            _temp_dir: temp_dir,
            home,
            work,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("lovelang/sessions.db")
    }
}

/// No pause between answers so piped runs finish quickly.
fn seed_config(xdg_config: &std::path::Path) {
    let dir = xdg_config.join("lovelang");
    fs::create_dir_all(&dir).expect("failed to create config dir");
    fs::write(dir.join("config.toml"), "[quiz]\nadvance_delay_ms = 0\n")
        .expect("failed to write config");
}

/// A save file with the bundled questions in bank order.
fn seed_save_file(env: &CliTestEnv, name: &str, answer: usize, answered: usize) -> PathBuf {
    let questions = QuestionBank::bundled()
        .expect("bundled bank")
        .into_questions();
    let mut answers = lovelang_core::AnswerSet::new(questions.len());
    for position in 0..answered {
        answers.record(position, answer);
    }
    let snapshot = SessionSnapshot {
        name: name.to_string(),
        timestamp: chrono::Utc::now(),
        current_question_index: answered.min(questions.len() - 1),
        answers,
        questions,
    };
    write_save_file(&env.work, &snapshot).expect("failed to write save file")
}

fn run_bin(env: &CliTestEnv, args: &[&str], input: &str) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("lovelang"));

    let mut child = Command::new(bin_path)
        .args(args)
        .current_dir(&env.work)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("failed to execute lovelang: {e}"));

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");

    child
        .wait_with_output()
        .expect("failed to wait for lovelang")
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "lovelang {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn all_first_options() -> String {
    let count = QuestionBank::bundled().expect("bundled bank").len();
    let mut script = String::from("\n");
    for _ in 0..count {
        script.push_str("1\n");
    }
    script
}

#[test]
fn take_completes_with_piped_answers_and_prints_report() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["take"], &all_first_options());
    assert_success(&["take"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("YOUR LOVE LANGUAGE PROFILE"),
        "expected report header, got:\n{stdout}"
    );
    assert!(stdout.contains("KEY INSIGHTS"));
    assert!(stdout.contains("Aligned"));

    // Completion clears the persisted session
    let store = SqliteSessionStore::open(&env.db_path()).expect("failed to open store");
    assert!(store.load().expect("failed to load").is_none());
}

#[test]
fn take_exports_json_with_partner_to_file() {
    let env = CliTestEnv::new();
    let args = [
        "take",
        "--partner-receiving",
        "words",
        "--partner-giving",
        "words",
        "--export",
        "json",
        "--output",
        "profile.json",
    ];

    let output = run_bin(&env, &args, &all_first_options());
    assert_success(&args, &output);

    let content = fs::read_to_string(env.work.join("profile.json")).expect("missing export");
    let report: serde_json::Value = serde_json::from_str(&content).expect("invalid JSON");
    assert_eq!(report["primary_receiving"], "words");
    assert_eq!(report["primary_giving"], "words");
    assert_eq!(report["compatibility"]["match_type"], "perfect_match");
}

#[test]
fn quitting_mid_quiz_persists_progress_for_status_and_resume() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["take"], "\n1\n2\nq\n");
    assert_success(&["take"], &output);

    let output = run_bin(&env, &["status"], "");
    assert_success(&["status"], &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Session: Auto-save"), "got:\n{stdout}");
    assert!(
        stdout.contains("Progress: 2/10 answered (20% complete), at question 3"),
        "got:\n{stdout}"
    );

    let output = run_bin(&env, &["take"], "q\n");
    assert_success(&["take"], &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Welcome back! Resuming at question 3"),
        "got:\n{stdout}"
    );
}

#[test]
fn save_command_writes_love_file_that_reports() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["take"], "\n1\n1\n1\ns Date Night\nq\n");
    assert_success(&["take"], &output);

    let save_path = env.work.join("date_night.love");
    let snapshot = read_save_file(&save_path).expect("save file should load");
    assert_eq!(snapshot.name, "Date Night");
    assert_eq!(snapshot.answers.answered_count(), 3);

    let args = ["report", "date_night.love", "--export", "md"];
    let output = run_bin(&env, &args, "");
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Your Love Language Profile"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("7 of 10 questions are unanswered"), "got:\n{stderr}");
}

#[test]
fn report_scores_complete_save_file() {
    let env = CliTestEnv::new();
    let path = seed_save_file(&env, "Complete", 0, 10);

    let args = ["report", path.to_str().unwrap(), "--export", "json"];
    let output = run_bin(&env, &args, "");
    assert_success(&args, &output);

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report should be JSON");
    assert_eq!(report["primary_receiving"], "words");
    assert_eq!(report["receiving"]["max_score"], 15);
    assert_eq!(report["receiving"]["ranked"][0]["score"], 10);
    assert_eq!(report["receiving"]["ranked"][0]["percentage"], 67);
    assert!(report.get("compatibility").is_none());
}

#[test]
fn import_and_export_roundtrip_through_store() {
    let env = CliTestEnv::new();
    let path = seed_save_file(&env, "Shared", 1, 4);

    let args = ["import", path.to_str().unwrap()];
    let output = run_bin(&env, &args, "");
    assert_success(&args, &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("(4/10 answered)"));

    let export_dir = env.work.join("exports");
    fs::create_dir_all(&export_dir).unwrap();
    let args = ["export", "Round Trip", "--dir", export_dir.to_str().unwrap()];
    let output = run_bin(&env, &args, "");
    assert_success(&args, &output);

    let original = read_save_file(&path).unwrap();
    let exported = read_save_file(&export_dir.join("round_trip.love")).unwrap();
    assert_eq!(exported.name, "Round Trip");
    assert_eq!(exported.questions, original.questions);
    assert_eq!(exported.answers, original.answers);
    assert_eq!(exported.current_question_index, original.current_question_index);
}

#[test]
fn import_rejects_wrong_extension_and_keeps_session() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["take"], "\n1\nq\n");
    assert_success(&["take"], &output);

    let bogus = env.work.join("progress.json");
    fs::write(&bogus, "{}").unwrap();
    let output = run_bin(&env, &["import", bogus.to_str().unwrap()], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a .love file"), "got:\n{stderr}");
    assert!(
        stderr.contains("Details were logged to") && stderr.contains("lovelang."),
        "got:\n{stderr}"
    );
    let logs: Vec<_> = fs::read_dir(env.xdg_state.join("lovelang"))
        .expect("log directory should exist")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".log"))
        .collect();
    assert!(!logs.is_empty());

    let store = SqliteSessionStore::open(&env.db_path()).expect("failed to open store");
    let snapshot = store.load().unwrap().expect("session should survive");
    assert_eq!(snapshot.answers.answered_count(), 1);
}

#[test]
fn import_rejects_malformed_love_file() {
    let env = CliTestEnv::new();
    let bad = env.work.join("broken.love");
    fs::write(&bad, "{\"name\": \"x\"}").unwrap();

    let output = run_bin(&env, &["import", bad.to_str().unwrap()], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not be loaded"));
}

#[test]
fn restart_clears_session() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["take"], "\n1\nq\n");
    assert_success(&["take"], &output);

    let output = run_bin(&env, &["restart"], "");
    assert_success(&["restart"], &output);

    let output = run_bin(&env, &["status"], "");
    assert_success(&["status"], &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No session in progress."));
}

#[test]
fn unknown_export_format_fails_before_quiz() {
    let env = CliTestEnv::new();
    let args = ["take", "--export", "pdf"];
    let output = run_bin(&env, &args, "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown export format"));
}
