//! Runs against real `git` and `/bin/sh`, cloning from local origin repositories

mod common;

use common::{create_origin_repo, is_git_available, FakeLister, SharedBuffer};
use foreach_repos::core::{ExecutorBuilder, OutputFormat, Repository};
use foreach_repos::git::{Cloner, GitCloner};
use serde_json::Value;
use tempfile::TempDir;

#[tokio::test]
async fn test_git_cloner_clones_local_origin() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let temp = TempDir::new().expect("Failed to create temp directory");
    let origin = create_origin_repo(temp.path(), "svc-a").expect("Failed to create origin");
    let dest = temp.path().join("work").join("svc-a");

    GitCloner::new()
        .clone_repository(&origin.to_string_lossy(), &dest, None)
        .await
        .expect("clone should succeed");

    assert!(dest.join(".git").is_dir());
    assert_eq!(std::fs::read_to_string(dest.join("README.md")).unwrap(), "# svc-a\n");
}

#[tokio::test]
async fn test_end_to_end_with_real_tools() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let temp = TempDir::new().expect("Failed to create temp directory");
    let mut page = Vec::new();
    for name in ["svc-a", "svc-b"] {
        let origin = create_origin_repo(temp.path(), name).expect("Failed to create origin");
        page.push(Repository::new("acme", name, origin.to_string_lossy()));
    }
    page.push(Repository::new(
        "acme",
        "svc-gone",
        temp.path().join("origin").join("svc-gone").to_string_lossy(),
    ));

    let out = SharedBuffer::new();
    let executor = ExecutorBuilder::new()
        .org("acme")
        .tmp_dir(temp.path().join("work"))
        .concurrency(2)
        .unwrap()
        .output_format(OutputFormat::Json)
        .lister(std::sync::Arc::new(FakeLister::new(vec![page])))
        .output(Box::new(out.clone()))
        .build();

    let summary = executor.run("cat README.md").await.unwrap();

    assert_eq!(summary.reported, 3);
    assert_eq!(summary.failed, 1);
    for line in out.lines() {
        let result: Value = serde_json::from_str(&line).unwrap();
        let name = result["repository"].as_str().unwrap();
        if name == "svc-gone" {
            assert!(result["error"].as_str().unwrap().starts_with("clone failed"));
        } else {
            assert_eq!(result["stdout"], format!("# {name}\n"));
            assert!(result["error"].is_null());
        }
    }
}
