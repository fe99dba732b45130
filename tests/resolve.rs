//! End-to-end resolution against real git repositories.

mod common;

use common::TestRepo;
use modscope::config::ModuleLayout;
use modscope::descriptor::PomReader;
use modscope::ownership::IgnoreReason;
use modscope::{ModscopeError, Resolution, Resolver};
use modscope_git::GixRepo;

fn resolve(repo: &TestRepo, last_build: &str) -> Result<Resolution, ModscopeError> {
    let git = GixRepo::open(repo.root()).unwrap();
    let layout = ModuleLayout::default();
    Resolver::new(&git, repo.root(), &layout, &PomReader).run(last_build)
}

fn modules(res: &Resolution) -> Vec<String> {
    res.modules.iter().map(ToString::to_string).collect()
}

fn ignored(res: &Resolution) -> Vec<(&str, IgnoreReason)> {
    res.ignored.iter().map(|i| (i.path.as_str(), i.reason)).collect()
}

#[test]
fn committed_and_uncommitted_changes_in_two_modules() {
    let repo = TestRepo::new();
    let built = repo.head();

    repo.write("alpha/src/main/java/A.java", "class A { int x; }\n");
    repo.commit_all("touch alpha");
    repo.write("beta/src/main/java/B.java", "class B { int y; }\n");

    let res = resolve(&repo, &built[..7]).unwrap();
    assert!(!res.history_skipped);
    assert_eq!(modules(&res), ["alpha", "beta"]);
    assert!(res.ignored.is_empty());
}

#[test]
fn build_at_head_with_only_a_top_level_readme() {
    let repo = TestRepo::new();
    repo.write("README.md", "hello\n");

    let res = resolve(&repo, &repo.head()[..7]).unwrap();
    assert!(res.history_skipped);
    assert!(res.modules.is_empty());
    assert_eq!(ignored(&res), [("README.md", IgnoreReason::OutsideModules)]);
}

#[test]
fn descriptor_change_selects_its_module() {
    let repo = TestRepo::new();
    let built = repo.head();
    repo.write(
        "beta/pom.xml",
        &common::pom("beta").replace("</project>", "<packaging>jar</packaging></project>"),
    );
    repo.commit_all("beta packaging");

    let res = resolve(&repo, &built).unwrap();
    assert_eq!(modules(&res), ["beta"]);
}

#[test]
fn committed_move_between_modules_selects_both() {
    let repo = TestRepo::new();
    let built = repo.head();
    repo.git(&["mv", "alpha/src/main/java/A.java", "beta/src/main/java/A.java"]);
    repo.commit_all("move A to beta");

    let res = resolve(&repo, &built[..7]).unwrap();
    assert_eq!(modules(&res), ["alpha", "beta"]);
    assert_eq!(res.changes.len(), 1, "{:?}", res.changes);
    assert_eq!(res.changes[0].path, "beta/src/main/java/A.java");
}

#[test]
fn deleted_module_is_ignored() {
    let repo = TestRepo::new();
    let built = repo.head();
    repo.remove_dir("beta");
    repo.commit_all("drop beta");

    let res = resolve(&repo, &built[..7]).unwrap();
    assert!(res.modules.is_empty());
    assert_eq!(
        ignored(&res),
        [
            ("beta/pom.xml", IgnoreReason::ModuleRemoved),
            ("beta/src/main/java/B.java", IgnoreReason::ModuleRemoved),
        ]
    );
}

#[test]
fn deleted_module_with_leftover_build_output_is_ignored() {
    let repo = TestRepo::new();
    let built = repo.head();
    repo.write("beta/target/classes/B.class", "compiled");
    repo.git(&["rm", "-r", "-q", "beta"]);
    repo.commit_all("drop beta");
    assert!(repo.root().join("beta/target/classes/B.class").is_file());

    let res = resolve(&repo, &built[..7]).unwrap();
    assert!(res.modules.is_empty());
    assert_eq!(
        ignored(&res),
        [
            ("beta/pom.xml", IgnoreReason::ModuleRemoved),
            ("beta/src/main/java/B.java", IgnoreReason::ModuleRemoved),
        ]
    );
}

#[test]
fn untracked_source_file_counts() {
    let repo = TestRepo::new();
    repo.write("alpha/src/test/java/ATest.java", "class ATest {}\n");

    let res = resolve(&repo, &repo.head()[..7]).unwrap();
    assert_eq!(modules(&res), ["alpha"]);
}

#[test]
fn source_dir_without_descriptor_is_fatal() {
    let repo = TestRepo::new();
    repo.write("gamma/src/G.java", "class G {}\n");

    let err = resolve(&repo, &repo.head()[..7]).unwrap_err();
    assert!(matches!(err, ModscopeError::FilesystemInconsistency { .. }));
}

#[test]
fn unknown_commit_is_not_found() {
    let repo = TestRepo::new();
    let missing = if repo.head().starts_with("0000000") { "fffffff" } else { "0000000" };
    let err = resolve(&repo, missing).unwrap_err();
    assert!(matches!(err, ModscopeError::ReferenceNotFound { .. }), "{err:?}");
}
