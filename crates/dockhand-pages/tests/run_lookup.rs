//! `latest_run_id` against a stub `gh` that answers per workflow name.
//!
//! The lookup has one positive shape (a listing with at least one row
//! carrying a `databaseId`) and collapses everything else into `None`:
//! an empty listing, unparseable output, a row without an id, and the
//! listing command failing outright.
//!
//! A single test function keeps the PATH mutation race-free.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use dockhand_pages::{latest_run_id, RunId};

fn write_stub_gh(path: &Path) {
    // Dispatches on the --workflow= argument so one stub covers every
    // lookup outcome.
    let script = r#"#!/bin/sh
workflow=""
for a in "$@"; do
    case "$a" in
        --workflow=*) workflow="${a#--workflow=}" ;;
    esac
done
case "$workflow" in
    has-run)
        printf '[{"databaseId":4242}]'
        exit 0
        ;;
    no-runs)
        printf '[]'
        exit 0
        ;;
    garbage)
        printf 'gh: To get started with GitHub CLI, please run: gh auth login'
        exit 0
        ;;
    missing-id)
        printf '[{"headSha":"abcde"}]'
        exit 0
        ;;
    boom)
        echo "HTTP 404: workflow not found" >&2
        exit 1
        ;;
esac
echo "unexpected gh invocation: $*" >&2
exit 1
"#;
    std::fs::write(path, script).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn lookup_outcomes_against_stub_gh() {
    let root = tempfile::tempdir().unwrap();
    let bin_dir = root.path().join("bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    write_stub_gh(&bin_dir.join("gh"));

    let old_path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{}", bin_dir.display(), old_path));

    let repo_dir = root.path();

    assert_eq!(
        latest_run_id(repo_dir, "has-run").await,
        Some(RunId(4242))
    );
    assert_eq!(latest_run_id(repo_dir, "no-runs").await, None);
    assert_eq!(latest_run_id(repo_dir, "garbage").await, None);
    assert_eq!(latest_run_id(repo_dir, "missing-id").await, None);
    assert_eq!(latest_run_id(repo_dir, "boom").await, None);
}
