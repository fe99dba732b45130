use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use modscope::build_info::BuildInfo;
use modscope::config::ModscopeConfig;
use modscope::descriptor::PomReader;
use modscope::format::OutputFormat;
use modscope::invoke::{self, BuildPlan, Confirmation, ExitCodeError};
use modscope::{ModscopeError, Resolver, report, telemetry};
use modscope_git::{GitRepo as _, GixRepo};

/// Rebuild only the modules that changed since the last build
///
/// Reads the commit recorded by the last build, diffs it against HEAD,
/// adds uncommitted local edits, and maps every changed file to the module
/// that owns it (the directory holding pom.xml next to its src/). Prints
/// the scoped build command and offers to run it.
///
/// EXAMPLES:
///
///   modscope --source-root ~/work/platform
///
///   # compare against a specific commit instead of the last build
///   modscope --source-root . --since 4f2a9c1 --no-build
///
///   # machine-readable report, build without asking
///   MODSCOPE_SOURCE_ROOT=. modscope --format json --yes
#[derive(Parser, Debug)]
#[command(name = "modscope")]
#[command(version, about)]
struct Cli {
    /// Root of the checkout (where the build runs)
    #[arg(long, env = "MODSCOPE_SOURCE_ROOT", value_name = "PATH")]
    source_root: Option<PathBuf>,

    /// Compare against this commit instead of the one in the build record
    #[arg(long, value_name = "COMMIT")]
    since: Option<String>,

    /// Report format: text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Run the build without asking
    #[arg(short, long)]
    yes: bool,

    /// Only report, never build
    #[arg(long, conflicts_with = "yes")]
    no_build: bool,

    /// Debug-level logging (overridden by MODSCOPE_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ExitCodeError(code)) = e.downcast_ref::<ExitCodeError>() {
                return ExitCode::from(u8::try_from(*code).unwrap_or(1));
            }
            eprintln!("error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source_root = source_root(cli.source_root.as_deref())?;
    let config = ModscopeConfig::load(&source_root)?;

    let loaded = BuildInfo::load(&source_root, &config.build_info, &config.build);
    let (build_info, last_build) = match (loaded, &cli.since) {
        (Ok(info), Some(since)) => (Some(info), since.clone()),
        (Ok(info), None) => {
            let last = info.last_build_commit()?.to_owned();
            (Some(info), last)
        }
        (Err(ModscopeError::BuildInfoMissing { path, .. }), Some(since)) => {
            tracing::debug!(path = %path.display(), "no build record, using --since");
            (None, since.clone())
        }
        (Err(e), _) => return Err(e.into()),
    };

    let repo = GixRepo::open(&source_root)?;
    let repo_root = repo.workdir().unwrap_or(source_root.as_path()).to_path_buf();

    let started = Instant::now();
    let resolution = Resolver::new(&repo, repo_root, &config.modules, &PomReader).run(&last_build)?;
    let elapsed = started.elapsed();

    let plan = (!resolution.modules.is_empty())
        .then(|| BuildPlan::scoped(&config.build, &resolution.modules));

    match cli.format {
        OutputFormat::Json => println!("{}", cli.format.serialize(&resolution)?),
        OutputFormat::Text => {
            let properties = build_info.map(|i| i.properties).unwrap_or_default();
            print!(
                "{}",
                report::render_text(
                    &properties,
                    &resolution,
                    plan.as_ref(),
                    elapsed,
                    std::io::stdout().is_terminal(),
                )
            );
        }
    }

    let Some(plan) = plan else {
        return Ok(());
    };
    if cli.no_build {
        return Ok(());
    }
    match invoke::confirm("Run this build?", cli.yes)? {
        Confirmation::Yes => plan.run(&source_root),
        Confirmation::No => Ok(()),
        Confirmation::NonInteractive => {
            eprintln!("not running the build without a terminal; pass --yes to run it");
            Ok(())
        }
    }
}

fn source_root(arg: Option<&Path>) -> Result<PathBuf, ModscopeError> {
    let root = arg.ok_or_else(|| {
        ModscopeError::configuration(
            "source root not set.\n  To fix: pass --source-root <PATH> or set MODSCOPE_SOURCE_ROOT.",
        )
    })?;
    if !root.is_dir() {
        return Err(ModscopeError::configuration(format!(
            "source root {} is not a directory",
            root.display()
        )));
    }
    Ok(root.to_path_buf())
}
