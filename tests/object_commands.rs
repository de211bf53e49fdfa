use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{init_repository_dir, repository_dir, run_vit_command};
use common::file::write_generated_files;

#[rstest]
fn hashing_a_file_prints_its_object_key_without_storing_it(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let files = write_generated_files(repository_dir.path(), 1);
    let file_name = files[0]
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or("generated file name is not valid utf-8")?;

    let output = run_vit_command(repository_dir.path(), &["hash-object", file_name])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{40}$")?)
        .get_output()
        .stdout
        .clone();
    let blob_sha = String::from_utf8(output)?;

    assert!(!repository_dir
        .path()
        .join(".vit/objects")
        .join(&blob_sha)
        .exists());

    Ok(())
}

#[rstest]
fn hashing_with_write_stores_the_object_under_a_flat_path(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let files = write_generated_files(repository_dir.path(), 1);
    let file_name = files[0]
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or("generated file name is not valid utf-8")?;

    let output = run_vit_command(repository_dir.path(), &["hash-object", "-w", file_name])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{40}$")?)
        .get_output()
        .stdout
        .clone();
    let blob_sha = String::from_utf8(output)?;

    // objects live directly under objects/<sha>, without fan-out directories
    assert!(repository_dir
        .path()
        .join(".vit/objects")
        .join(&blob_sha)
        .is_file());

    Ok(())
}

#[rstest]
fn cat_file_round_trips_blob_content(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let files = write_generated_files(repository_dir.path(), 1);
    let file_name = files[0]
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or("generated file name is not valid utf-8")?;

    let output = run_vit_command(repository_dir.path(), &["hash-object", "-w", file_name])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let blob_sha = String::from_utf8(output)?;

    run_vit_command(repository_dir.path(), &["cat-file", "-p", &blob_sha])
        .assert()
        .success()
        .stdout(predicate::eq(files[0].content.clone()));

    // a unique prefix resolves to the same object
    run_vit_command(repository_dir.path(), &["cat-file", "-p", &blob_sha[..8]])
        .assert()
        .success()
        .stdout(predicate::eq(files[0].content.clone()));

    Ok(())
}

#[rstest]
fn identical_content_lands_on_the_same_key(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    std::fs::write(repository_dir.path().join("left.txt"), "same content")?;
    std::fs::write(repository_dir.path().join("right.txt"), "same content")?;

    let left = run_vit_command(repository_dir.path(), &["hash-object", "-w", "left.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let right = run_vit_command(repository_dir.path(), &["hash-object", "-w", "right.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(left, right);

    Ok(())
}

#[rstest]
fn cat_file_resolves_head_to_the_current_commit(init_repository_dir: TempDir) {
    let assertion = run_vit_command(init_repository_dir.path(), &["cat-file", "-p", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("tree "))
        .stdout(predicate::str::contains("author fake_user"))
        .stdout(predicate::str::contains("commiter fake_user"))
        .stdout(predicate::str::contains("Initial commit"));

    // the @ alias resolves to the same object
    let expected = assertion.get_output().stdout.clone();
    run_vit_command(init_repository_dir.path(), &["cat-file", "-p", "@"])
        .assert()
        .success()
        .stdout(predicate::eq(expected));
}

#[rstest]
fn cat_file_renders_tree_entries_with_modes_and_kinds(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = run_vit_command(init_repository_dir.path(), &["cat-file", "-p", "HEAD"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let commit_text = String::from_utf8(output)?;
    let tree_sha = commit_text
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("tree "))
        .ok_or("commit text has no tree line")?;

    run_vit_command(init_repository_dir.path(), &["cat-file", "-p", tree_sha])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^100644 blob [0-9a-f]{40} 1\.txt\n040000 tree [0-9a-f]{40} a$",
        )?);

    Ok(())
}

#[rstest]
fn cat_file_for_a_missing_object_fails(repository_dir: TempDir) {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_vit_command(
        repository_dir.path(),
        &[
            "cat-file",
            "-p",
            "0000000000000000000000000000000000000000",
        ],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("not found in the object database"));
}
