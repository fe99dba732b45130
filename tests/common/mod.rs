//! Shared test helpers for modscope integration tests.
#![allow(dead_code)]
//!
//! [`TestRepo`] is a multi-module Maven-style checkout in a temp directory,
//! built with real git commands. The temp dir is removed on drop.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A git checkout with modules `alpha` and `beta`, a `docs/` directory and a
/// build record pointing at the initial commit.
pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
}

impl TestRepo {
    /// Create the checkout and commit it. The build record is written but
    /// ignored by git, like a real `target/` directory.
    ///
    /// # Panics
    /// Panics if any git command fails.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path().to_path_buf();
        let repo = Self { _dir: dir, root };

        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.name", "Test"]);
        repo.git(&["config", "user.email", "test@localhost"]);
        repo.git(&["config", "commit.gpgsign", "false"]);

        repo.write(".gitignore", "target/\n");
        repo.write("alpha/pom.xml", &pom("alpha"));
        repo.write("alpha/src/main/java/A.java", "class A {}\n");
        repo.write("beta/pom.xml", &pom("beta"));
        repo.write("beta/src/main/java/B.java", "class B {}\n");
        repo.write("docs/design.md", "# design\n");
        let head = repo.commit_all("initial");
        repo.record_build(&head[..7]);
        repo
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().expect("path has a parent"))
            .expect("failed to create parent dirs");
        std::fs::write(&path, contents).expect("failed to write file");
    }

    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.root.join(rel)).expect("failed to remove file");
    }

    pub fn remove_dir(&self, rel: &str) {
        std::fs::remove_dir_all(self.root.join(rel)).expect("failed to remove dir");
    }

    /// Stage everything, commit, and return the new HEAD id.
    pub fn commit_all(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
        self.head()
    }

    #[must_use]
    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_owned()
    }

    /// Write the build record as the build would.
    pub fn record_build(&self, commit: &str) {
        self.write(
            "target/classes/build-info.properties",
            &format!("#Generated by the build\nbuild.number={commit}\nbuild.user=test\n"),
        );
    }

    /// Run git in the checkout, asserting success; returns stdout.
    pub fn git(&self, args: &[&str]) -> String {
        git_ok(&self.root, args)
    }

    /// Run the `modscope` binary against this checkout.
    pub fn modscope(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_modscope"))
            .arg("--source-root")
            .arg(&self.root)
            .args(args)
            .env_remove("MODSCOPE_SOURCE_ROOT")
            .env_remove("MODSCOPE_LOG")
            .env_remove("MODSCOPE_LOG_FORMAT")
            .output()
            .expect("failed to run modscope")
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal Maven descriptor for `artifact`.
#[must_use]
pub fn pom(artifact: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<project>\n  <modelVersion>4.0.0</modelVersion>\n  \
         <artifactId>{artifact}</artifactId>\n</project>\n"
    )
}

pub fn git_ok(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {}: {e}", args.join(" ")));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "git {} failed in {}:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
        dir.display(),
    );
    stdout.to_string()
}
