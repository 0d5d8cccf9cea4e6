//! Isolated project directory for stratum tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use stratum::domain::value_objects::ModuleId;
use tempfile::TempDir;

/// Result of running a stratum CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// A temporary project root; paths are canonical so they compare equal to
/// the module identities the resolver produces.
pub struct TestProject {
    dir: TempDir,
    root: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        Self { dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn module(&self, relative: &str) -> ModuleId {
        ModuleId::new(self.path(relative))
    }

    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn remove(&self, relative: &str) -> &Self {
        fs::remove_file(self.path(relative)).unwrap();
        self
    }

    /// Run the stratum binary with `args`, from the project root.
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> TestResult {
        let mut command = Command::new(env!("CARGO_BIN_EXE_stratum"));
        command
            .args(args)
            .current_dir(&self.root)
            .env_remove("STRATUM_MODE")
            .env_remove("STRATUM_PORT")
            .env_remove("RUST_LOG");
        for (key, value) in env {
            command.env(key, value);
        }
        let output = command.output().unwrap();
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
