//! Version derivation of projects in real Git repositories

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use wand::error::ProjectErrorKind;
use wand::{Error, GoModuleId, Project, ProjectOptions, VcsKind};

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=wand", "-c", "user.email=wand@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(status.status.success(), "git {args:?}: {status:?}");
}

fn commit(dir: &Path, message: &str) {
    git(dir, &["commit", "--allow-empty", "-q", "-m", message]);
}

fn project(dir: &Path) -> Project {
    Project::new(
        ProjectOptions::new()
            .with_root_dir(dir)
            .with_go_module(GoModuleId::latest("github.com/svengreb/fruit-mixer"))
            .with_default_version("v0.1.0")
            .with_vcs_kind(VcsKind::Git),
    )
    .unwrap()
}

#[test]
fn test_version_follows_git_history() {
    if !git_available() {
        eprintln!("git is not available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);

    // Repository without commits
    let version = project(dir.path()).version().unwrap();
    assert_eq!(version.to_string(), "0.1.0");

    // Commits without version tags
    commit(dir.path(), "initial");
    git(dir.path(), &["tag", "not-a-version"]);
    let untagged = project(dir.path());
    assert_eq!(untagged.version().unwrap().to_string(), "0.1.0");
    assert_eq!(untagged.vcs_version().unwrap().commits_ahead, 0);
    assert!(untagged.vcs_version().unwrap().commit_hash.is_some());

    // HEAD carries an annotated version tag
    git(dir.path(), &["tag", "-a", "v1.0.0", "-m", "release 1.0.0"]);
    let tagged = project(dir.path());
    assert_eq!(tagged.version().unwrap().to_string(), "1.0.0");
    assert_eq!(
        tagged.vcs_version().unwrap().latest_version_tag.as_deref(),
        Some("v1.0.0")
    );

    // Two commits ahead of the tag
    commit(dir.path(), "feature");
    commit(dir.path(), "fix");
    let ahead = project(dir.path());
    let vcs = ahead.vcs_version().unwrap();
    assert_eq!(vcs.commits_ahead, 2);

    let head = vcs.commit_hash.clone().unwrap();
    assert_eq!(
        ahead.version().unwrap().to_string(),
        format!("1.0.0+2.{}", &head[..8])
    );
}

#[test]
fn test_version_without_vcs() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("go.mod"),
        "module github.com/svengreb/fruit-mixer\n",
    )
    .unwrap();

    let project = Project::new(
        ProjectOptions::new()
            .with_root_dir(dir.path())
            .with_default_version("v2.3.4-rc.1"),
    )
    .unwrap();
    assert_eq!(project.vcs_kind(), VcsKind::None);
    assert_eq!(project.version().unwrap().to_string(), "2.3.4-rc.1");
    assert_eq!(project.go_module().path, "github.com/svengreb/fruit-mixer");
}

#[test]
fn test_git_project_outside_repository_fails() {
    if !git_available() {
        eprintln!("git is not available, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    let inside_repository = Command::new("git")
        .arg("-C")
        .arg(dir.path())
        .args(["rev-parse", "--git-dir"])
        .output()
        .unwrap()
        .status
        .success();
    if inside_repository {
        eprintln!("temporary directory is inside a git repository, skipping");
        return;
    }

    let err = Project::new(
        ProjectOptions::new()
            .with_root_dir(dir.path())
            .with_go_module(GoModuleId::latest("github.com/svengreb/fruit-mixer"))
            .with_vcs_kind(VcsKind::Git),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Project {
            kind: ProjectErrorKind::DeriveVcsInformation,
            ..
        }
    ));
}
