use crate::common::file::{write_file, FileSpec};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit tracking `1.txt`, `a/2.txt` and `a/b/3.txt`.
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    run_vit_command(repository_dir.path(), &["add"])
        .assert()
        .success();

    vit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// A repository with three commits, each adding one `fileN.txt`.
#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (file_name, content, message) in [
        ("file1.txt", "content 1", "First commit"),
        ("file2.txt", "content 2", "Second commit"),
        ("file3.txt", "content 3", "Third commit"),
    ] {
        let file = FileSpec::new(repository_dir.path().join(file_name), content.to_string());
        write_file(file);

        run_vit_command(repository_dir.path(), &["add"])
            .assert()
            .success();
        vit_commit(repository_dir.path(), message)
            .assert()
            .success();
    }

    repository_dir
}

pub fn run_vit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vit").expect("Failed to find vit binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// A commit command with a pinned author and timestamp, so commit hashes and
/// rendered dates are stable across runs.
pub fn vit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_vit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("VIT_AUTHOR_NAME", "fake_user"),
        ("VIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("VIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Current HEAD commit sha, following the symref when HEAD is attached
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".vit").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".vit").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

/// Parent sha of a commit, read back through cat-file
pub fn get_parent_commit_sha(
    dir: &Path,
    commit_sha: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = run_vit_command(dir, &["cat-file", "-p", commit_sha]).output()?;
    let stdout = String::from_utf8(output.stdout)?;

    for line in stdout.lines() {
        if let Some(oid) = line.strip_prefix("parent ") {
            return Ok(oid.to_string());
        }
    }

    Err("No parent found".into())
}

pub fn get_ancestor_commit_sha(
    dir: &Path,
    commit_sha: &str,
    generations: usize,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut current = commit_sha.to_string();
    for _ in 0..generations {
        current = get_parent_commit_sha(dir, &current)?;
    }
    Ok(current)
}
