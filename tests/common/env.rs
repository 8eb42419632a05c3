//! Test environment for isolated Marginalia runs.
//!
//! Every `TestEnv` gets its own home directory (exported as
//! `MARGINALIA_TEST_HOME`, so the default `~/Library/...` source paths land
//! inside it), its own vault, and an empty working directory. Output is
//! forced to plain ASCII so human-mode assertions are stable.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{BooksDb, DOCUMENTS_DIR};

/// Variables that would leak the developer's setup into a test run
const SCRUBBED_VARS: &[&str] = &[
    "RUST_LOG",
    "MARGINALIA_LOG",
    "MARGINALIA_VAULT",
    "MARGINALIA_STAGING_DIR",
    "MARGINALIA_DEBOUNCE_MS",
    "MARGINALIA_TICK_SECS",
];

/// Result of running a Marginalia CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("stdout line is not JSON ({e}): {line}"))
            })
            .collect()
    }

    /// The last event with the given `event` tag
    pub fn last_event(&self, name: &str) -> serde_json::Value {
        self.events()
            .into_iter()
            .rev()
            .find(|e| e["event"] == name)
            .unwrap_or_else(|| panic!("no '{name}' event in:\n{}", self.stdout))
    }
}

pub struct TestEnv {
    pub home: TempDir,
    pub workdir: TempDir,
    pub books: BooksDb,
    vault: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = tempfile::tempdir().unwrap();
        let workdir = tempfile::tempdir().unwrap();
        let books = BooksDb::create(&home.path().join(DOCUMENTS_DIR));
        let vault = home.path().join("vault");
        Self {
            home,
            workdir,
            books,
            vault,
        }
    }

    /// Add the Dune (`DUNE-1`) and Foundation (`FOUND-1`) books
    pub fn with_classics(self) -> Self {
        self.books.add_book("DUNE-1", "Dune", "Frank Herbert");
        self.books.add_book("FOUND-1", "Foundation", "Isaac Asimov");
        self
    }

    pub fn vault(&self) -> &Path {
        &self.vault
    }

    /// `marginalia` with isolated home and vault; not yet spawned
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_marginalia"));
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.workdir.path())
            .args(args)
            .env("MARGINALIA_TEST_HOME", self.home.path())
            .env("HOME", self.home.path())
            .env("MARGINALIA_VAULT", &self.vault)
            .env("NO_COLOR", "1")
            .env("LC_ALL", "C");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = self.command(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        let output = cmd.output().expect("failed to execute marginalia");
        TestResult::from_output(output)
    }

    /// Write `marginalia.toml` into the working directory
    pub fn write_config(&self, content: &str) {
        fs::write(self.workdir.path().join("marginalia.toml"), content).unwrap();
    }

    pub fn artifact_path(&self, slug: &str) -> PathBuf {
        self.vault
            .join("apple_books_sync")
            .join(format!("{slug}.md"))
    }

    pub fn artifact(&self, slug: &str) -> String {
        let path = self.artifact_path(slug);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
    }

    pub fn state_path(&self) -> PathBuf {
        self.vault.join("marginalia_state.json")
    }

    /// Persisted `last_pk`, if the state file exists
    pub fn watermark(&self) -> Option<i64> {
        let content = fs::read_to_string(self.state_path()).ok()?;
        let value: serde_json::Value = serde_json::from_str(&content).ok()?;
        value["last_pk"].as_i64()
    }

    pub fn set_watermark(&self, last_pk: i64) {
        fs::create_dir_all(&self.vault).unwrap();
        fs::write(
            self.state_path(),
            format!("{{\n  \"last_pk\": {last_pk}\n}}\n"),
        )
        .unwrap();
    }
}
