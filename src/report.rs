//! Plain-text rendering of a [`Resolution`].

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use crossterm::style::Stylize as _;

use crate::invoke::BuildPlan;
use crate::ownership::IgnoreReason;
use crate::resolve::Resolution;

/// Printed when no module needs rebuilding.
pub const NOTHING_TO_REBUILD: &str = "no changes detected, nothing to rebuild";

/// Render the report as shown at the terminal.
///
/// `properties` is the last build record, `plan` the command that would
/// rebuild the changed modules (`None` when nothing changed). `color` turns
/// on ANSI styling.
#[must_use]
pub fn render_text(
    properties: &BTreeMap<String, String>,
    resolution: &Resolution,
    plan: Option<&BuildPlan>,
    elapsed: Duration,
    color: bool,
) -> String {
    let mut out = String::new();

    if !properties.is_empty() {
        out.push_str("last build:\n");
        for (key, value) in properties {
            let _ = writeln!(out, "  {key} = {value}");
        }
        out.push('\n');
    }

    if resolution.history_skipped {
        let _ = writeln!(
            out,
            "HEAD is the last build commit ({}), checking local changes only",
            resolution.last_build
        );
    } else {
        let _ = writeln!(out, "changes since {}:", resolution.last_build);
    }
    for change in &resolution.changes {
        let _ = writeln!(out, "  {change}");
    }

    for ignored in &resolution.ignored {
        let why = match ignored.reason {
            IgnoreReason::OutsideModules => "not part of a module source directory",
            IgnoreReason::ModuleRemoved => "its module was removed",
        };
        let line = format!("warning: ignoring '{}', {why}", ignored.path);
        if color {
            let _ = writeln!(out, "{}", line.yellow());
        } else {
            let _ = writeln!(out, "{line}");
        }
    }

    let Some(plan) = plan.filter(|_| !resolution.modules.is_empty()) else {
        let _ = writeln!(out, "{NOTHING_TO_REBUILD}");
        return out;
    };

    let _ = writeln!(out, "\nmodules to rebuild ({}):", resolution.modules.len());
    for module in &resolution.modules {
        let _ = writeln!(out, "  {module}");
    }
    let _ = writeln!(out, "\nresolved in {} ms", elapsed.as_millis());

    let command = plan.to_string();
    if color {
        let _ = writeln!(out, "{}", command.green().bold());
    } else {
        let _ = writeln!(out, "{command}");
    }
    out
}

#[cfg(test)]
mod tests {
    use modscope_git::ChangeType;

    use super::*;
    use crate::change::{ChangeOrigin, ChangeRecord};
    use crate::config::BuildConfig;
    use crate::descriptor::ModuleId;
    use crate::resolve::IgnoredPath;

    fn resolution(modules: &[&str]) -> Resolution {
        Resolution {
            last_build: "abc1234".to_owned(),
            head: "f".repeat(40),
            history_skipped: false,
            changes: vec![
                ChangeRecord {
                    path: "alpha/src/A.java".to_owned(),
                    kind: ChangeType::Modified,
                    origin: ChangeOrigin::History,
                },
                ChangeRecord {
                    path: "docs/x.md".to_owned(),
                    kind: ChangeType::Added,
                    origin: ChangeOrigin::Unstaged,
                },
            ],
            ignored: vec![IgnoredPath {
                path: "docs/x.md".to_owned(),
                reason: IgnoreReason::OutsideModules,
            }],
            modules: modules.iter().map(|m| ModuleId::new(m).unwrap()).collect(),
        }
    }

    #[test]
    fn renders_changes_modules_and_command() {
        let res = resolution(&["alpha"]);
        let plan = BuildPlan::scoped(&BuildConfig::default(), &res.modules);
        let props = BTreeMap::from([("build.number".to_owned(), "abc1234".to_owned())]);
        let text = render_text(&props, &res, Some(&plan), Duration::from_millis(12), false);

        assert!(text.contains("  build.number = abc1234\n"));
        assert!(text.contains("  [M] alpha/src/A.java\n"));
        assert!(text.contains("  [A] docs/x.md\n"));
        assert!(text.contains(
            "warning: ignoring 'docs/x.md', not part of a module source directory\n"
        ));
        assert!(text.contains("modules to rebuild (1):\n  alpha\n"));
        assert!(text.contains("resolved in 12 ms"));
        assert!(text.ends_with(
            "mvn --projects :alpha --also-make-dependents clean install -DskipTests\n"
        ));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn empty_module_set_says_nothing_to_rebuild() {
        let res = resolution(&[]);
        let text = render_text(&BTreeMap::new(), &res, None, Duration::ZERO, false);
        assert!(text.ends_with(&format!("{NOTHING_TO_REBUILD}\n")));
        assert!(!text.contains("mvn"));
    }

    #[test]
    fn removed_module_warning_names_the_reason() {
        let mut res = resolution(&[]);
        res.ignored.insert(
            0,
            IgnoredPath {
                path: "beta/src/B.java".to_owned(),
                reason: IgnoreReason::ModuleRemoved,
            },
        );
        let text = render_text(&BTreeMap::new(), &res, None, Duration::ZERO, false);
        assert!(text.contains("warning: ignoring 'beta/src/B.java', its module was removed\n"));
        assert!(!text.contains("'beta/src/B.java', not part of"));
        assert!(text.contains("'docs/x.md', not part of a module source directory"));
    }

    #[test]
    fn color_styles_the_command() {
        if std::env::var_os("NO_COLOR").is_some() {
            return;
        }
        let res = resolution(&["alpha"]);
        let plan = BuildPlan::scoped(&BuildConfig::default(), &res.modules);
        let text = render_text(&BTreeMap::new(), &res, Some(&plan), Duration::ZERO, true);
        assert!(text.contains('\u{1b}'));
    }
}
