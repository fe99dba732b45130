//! Build invocation: format the scoped build command, confirm, run it.

use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::BuildConfig;
use crate::modules::ModuleSet;

/// Error indicating the build exited with a non-zero status.
/// Carries the exit code for the caller to propagate.
#[derive(Debug)]
pub struct ExitCodeError(pub i32);

impl fmt::Display for ExitCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "build exited with code {}", self.0)
    }
}

impl std::error::Error for ExitCodeError {}

/// A build command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildPlan {
    /// Build only `modules` and whatever depends on them:
    /// `mvn --projects :a,:b --also-make-dependents clean install -DskipTests`.
    #[must_use]
    pub fn scoped(config: &BuildConfig, modules: &ModuleSet) -> Self {
        let projects = modules
            .iter()
            .map(|m| format!(":{m}"))
            .collect::<Vec<_>>()
            .join(",");
        let mut args = vec![config.projects_flag.clone(), projects];
        args.extend(config.scoped_args.iter().cloned());
        Self {
            program: config.program.clone(),
            args,
        }
    }

    /// Build everything. Used when there is no previous build to diff against.
    #[must_use]
    pub fn full(config: &BuildConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.full_args.clone(),
        }
    }

    /// Run the command in `dir` with inherited stdio.
    ///
    /// # Errors
    /// Fails if the program cannot be spawned, or with [`ExitCodeError`] if
    /// it exits unsuccessfully.
    pub fn run(&self, dir: &Path) -> Result<()> {
        tracing::info!(command = %self, dir = %dir.display(), "running build");
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .status()
            .with_context(|| format!("Failed to run '{}'", self.program))?;

        if !status.success() {
            return Err(ExitCodeError(status.code().unwrap_or(1)).into());
        }
        Ok(())
    }
}

impl fmt::Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of asking whether to run the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    /// Nobody to ask: stdin or stderr is not a terminal.
    NonInteractive,
}

/// Ask `message` on stderr and read the answer from stdin.
///
/// `assume_yes` skips the prompt. Without a terminal no prompt is shown and
/// [`Confirmation::NonInteractive`] is returned.
///
/// # Errors
/// Fails on terminal I/O errors.
pub fn confirm(message: &str, assume_yes: bool) -> Result<Confirmation> {
    if assume_yes {
        return Ok(Confirmation::Yes);
    }
    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return Ok(Confirmation::NonInteractive);
    }
    ask(message, &mut io::stdin().lock(), &mut io::stderr())
}

fn ask(message: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<Confirmation> {
    write!(output, "{message} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(Confirmation::Yes),
        "n" | "no" | "" => Ok(Confirmation::No),
        other => {
            writeln!(output, "answer '{other}' not recognised, not building")?;
            Ok(Confirmation::No)
        }
    }
}
