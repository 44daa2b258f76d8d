use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const NOW: &str = "2024-03-15 11:00:00";

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("cachedash");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }

    fn write_snapshot(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home.join(name);
        fs::write(&path, content).expect("failed to write snapshot");
        path
    }
}

fn fixture_snapshot() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../cachedash-core/tests/fixtures/dashboard.json")
        .to_string_lossy()
        .into_owned()
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    Command::new(assert_cmd::cargo::cargo_bin!("cachedash"))
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute cachedash: {e}"))
}

fn assert_success(args: &[&str], output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        panic!(
            "cachedash {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    stdout
}

#[test]
fn domains_table_shows_relative_times_and_statuses() {
    let env = CliTestEnv::new();
    let snapshot = fixture_snapshot();
    let args = ["--now", NOW, "domains", snapshot.as_str()];

    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("DOMAIN"), "missing header:\n{stdout}");
    assert!(stdout.contains("example.com"));
    assert!(stdout.contains("Active"));
    assert!(stdout.contains("Incorrect"));
    assert!(stdout.contains("in 30m"));
    assert!(stdout.contains("3 days"));
}

#[test]
fn queue_filter_and_json_output() {
    let env = CliTestEnv::new();
    let snapshot = fixture_snapshot();
    let args = [
        "--now",
        NOW,
        "--format",
        "json",
        "queue",
        snapshot.as_str(),
        "--filter",
        "priority",
    ];

    let stdout = assert_success(&args, &run(&env, &args));
    let rows: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    let rows = rows.as_array().expect("expected a JSON array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["priority"]["label"], "Priority");
    assert_eq!(rows[0]["status"]["icon"], "spinner");
    assert_eq!(rows[0]["added"], "30m ago");
}

#[test]
fn parameters_hide_system_entries_by_default() {
    let env = CliTestEnv::new();
    let snapshot = fixture_snapshot();

    let args = ["parameters", snapshot.as_str()];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("sort"));
    assert!(!stdout.contains("fbclid"));

    let args = ["parameters", snapshot.as_str(), "--show-system"];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("fbclid"));
    assert!(stdout.contains("Always ignored"));
}

#[test]
fn unknown_status_is_fallback_unless_strict() {
    let env = CliTestEnv::new();
    let snapshot = env.write_snapshot(
        "odd.json",
        r#"{"sitemaps": [{
            "enabled": false,
            "url": "https://example.com/sitemap.xml",
            "created_at": "2024-03-01",
            "revisit_interval": "24 hours",
            "last_visited_at": "2024-03-15 10:30:00",
            "next_visit": "2024-03-16 10:30:00",
            "origin": "Manual",
            "health": "degraded"
        }]}"#,
    );
    let snapshot = snapshot.to_string_lossy().into_owned();

    let args = ["--now", NOW, "sitemaps", snapshot.as_str()];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("Unknown"), "expected fallback label:\n{stdout}");

    let strict = run(&env, &["--strict", "--now", NOW, "sitemaps", snapshot.as_str()]);
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("degraded"), "stderr:\n{stderr}");

    env.write_config("[display]\nstrict_status = true\n");
    let from_config = run(&env, &["--now", NOW, "sitemaps", snapshot.as_str()]);
    assert!(!from_config.status.success());
}

#[test]
fn invalid_timestamp_fails_instead_of_just_now() {
    let env = CliTestEnv::new();
    let snapshot = env.write_snapshot(
        "bad-time.json",
        r#"{"history": [{
            "url": "https://example.com/page1",
            "device": "Desktop",
            "status": "Success",
            "duration_secs": 1.5,
            "timestamp": "last tuesday",
            "status_code": 200
        }]}"#,
    );
    let snapshot = snapshot.to_string_lossy().into_owned();

    let output = run(&env, &["--now", NOW, "history", snapshot.as_str()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid timestamp"), "stderr:\n{stderr}");
}

#[test]
fn ago_formats_past_and_future() {
    let env = CliTestEnv::new();

    let args = ["--now", NOW, "ago", "2024-03-15 10:59:01"];
    assert_eq!(assert_success(&args, &run(&env, &args)).trim(), "just now");

    let args = ["--now", NOW, "ago", "2024-03-15 10:00:00"];
    assert_eq!(assert_success(&args, &run(&env, &args)).trim(), "1h ago");

    let args = ["--now", NOW, "ago", "2024-03-15 11:01:00"];
    assert_eq!(assert_success(&args, &run(&env, &args)).trim(), "in 1m");

    let args = ["--now", NOW, "--format", "json", "ago", "2024-02-14 11:00:00"];
    let stdout = assert_success(&args, &run(&env, &args));
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(value["text"], "1mo ago");
    assert_eq!(value["bucket"], "months");
    assert_eq!(value["direction"], "past");
}

#[test]
fn domains_search_filters_by_name() {
    let env = CliTestEnv::new();
    let snapshot = fixture_snapshot();

    let args = ["--now", NOW, "domains", snapshot.as_str(), "--search", "TEST"];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("test-site.com"));
    assert!(!stdout.contains("example.com"));

    let args = ["--now", NOW, "domains", snapshot.as_str(), "--search", "nomatch"];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("No rows."));
}

#[test]
fn priority_queue_table_stays_aligned() {
    let env = CliTestEnv::new();
    let snapshot = fixture_snapshot();
    let args = ["--now", NOW, "queue", snapshot.as_str()];

    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("⚡ Priority"), "{stdout}");
    let widths: Vec<usize> = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().map(|c| if c == '⚡' { 2 } else { 1 }).sum())
        .collect();
    assert!(
        widths.iter().all(|w| *w == widths[0]),
        "rows differ in width {widths:?}:\n{stdout}"
    );
}

#[test]
fn logs_go_to_the_dated_state_file() {
    let env = CliTestEnv::new();
    let args = ["--now", NOW, "ago", "2024-03-15 10:00:00"];
    assert_success(&args, &run(&env, &args));

    let log_dir = env.xdg_state.join("cachedash");
    let names: Vec<String> = fs::read_dir(&log_dir)
        .expect("log directory should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1, "{names:?}");
    assert!(names[0].starts_with("cachedash.") && names[0].ends_with(".log"));
    let date = &names[0]["cachedash.".len()..names[0].len() - ".log".len()];
    assert!(
        chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
        "{names:?}"
    );
}

#[test]
fn invite_lists_accepted_addresses() {
    let env = CliTestEnv::new();
    let list = env.write_snapshot("invites.txt", "a@example.com\n\n  b@example.com\n");
    let list = list.to_string_lossy().into_owned();

    let args = ["invite", list.as_str()];
    let stdout = assert_success(&args, &run(&env, &args));
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["a@example.com", "b@example.com"]);

    let bad = env.write_snapshot("bad-invites.txt", "a@example.com, b@example.com");
    let output = run(&env, &["invite", bad.to_string_lossy().as_ref()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("one email per line"));
}

#[test]
fn validate_commands_report_errors() {
    let env = CliTestEnv::new();

    let args = ["validate-domain", "example.com"];
    let stdout = assert_success(&args, &run(&env, &args));
    assert!(stdout.contains("valid domain: example.com"));

    let bad = run(&env, &["validate-domain", "https://example.com"]);
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("Please enter a valid domain name"));

    let bad = run(&env, &["validate-parameter", "a=b"]);
    assert!(!bad.status.success());
}
