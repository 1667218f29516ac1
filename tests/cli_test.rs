use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn fileinfo(home: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("fileinfo")?;
    cmd.env("HOME", home).env_remove("RUST_LOG");
    Ok(cmd)
}

fn write_file(root: &Path, relative: &str, size: usize) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, vec![b'x'; size])?;
    Ok(())
}

fn manifest_lines(path: &Path) -> Result<BTreeSet<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}

#[test]
fn test_kb_manifest_skips_git() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "a.txt", 100)?;
    write_file(tree.path(), ".git/config", 50)?;
    write_file(tree.path(), "sub/b.txt", 2048)?;

    fileinfo(home.path())?
        .arg("--directory")
        .arg(tree.path())
        .args(["--unit", "KB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 entries"));

    let expected: BTreeSet<String> = ["/a.txt, 0.10 KB", "/sub/b.txt, 2.00 KB"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(manifest_lines(&tree.path().join("output.txt"))?, expected);

    Ok(())
}

#[test]
fn test_default_unit_is_mb() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "big.bin", 1_048_576)?;

    fileinfo(home.path())?
        .arg("-d")
        .arg(tree.path())
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let manifest = fs::read_to_string(tree.path().join("output.txt"))?;
    assert_eq!(manifest, "/big.bin, 1.00 MB\n");

    Ok(())
}

#[test]
fn test_missing_directory_fails() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    let missing = tree.path().join("does-not-exist");

    fileinfo(home.path())?
        .arg("-d")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory not found"));

    assert!(!missing.join("output.txt").exists());

    Ok(())
}

#[test]
fn test_user_excludes_are_added_to_defaults() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "src/main.rs", 10)?;
    write_file(tree.path(), "target/debug/app", 10)?;
    write_file(tree.path(), "debug.log", 10)?;
    write_file(tree.path(), "node_modules/pkg/index.js", 10)?;

    fileinfo(home.path())?
        .arg("-d")
        .arg(tree.path())
        .args(["-u", "Byte", "-o", "files.txt", "-e", "/target/", ".log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/target/"));

    let expected: BTreeSet<String> = ["/src/main.rs, 10.00 Byte".to_string()].into();
    assert_eq!(manifest_lines(&tree.path().join("files.txt"))?, expected);
    assert!(!tree.path().join("output.txt").exists());

    Ok(())
}

#[test]
fn test_config_file_supplies_settings() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "keep.txt", 2048)?;
    write_file(tree.path(), "drop.tmp", 2048)?;

    let config_dir = home.path().join(".config").join("fileinfo");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("config.toml"),
        "unit = \"KB\"\noutput = \"list.txt\"\nexclude = [\".tmp\"]\n",
    )?;

    fileinfo(home.path())?
        .arg("-d")
        .arg(tree.path())
        .assert()
        .success();

    let manifest = fs::read_to_string(tree.path().join("list.txt"))?;
    assert_eq!(manifest, "/keep.txt, 2.00 KB\n");

    Ok(())
}

#[test]
fn test_rerun_overwrites_manifest() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "one.txt", 1024)?;

    for _ in 0..2 {
        fileinfo(home.path())?
            .arg("-d")
            .arg(tree.path())
            .args(["-u", "KB", "-q"])
            .assert()
            .success();
    }

    let manifest = fs::read_to_string(tree.path().join("output.txt"))?;
    assert_eq!(manifest, "/one.txt, 1.00 KB\n");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_entry_warns_and_succeeds() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "ok.txt", 10)?;
    std::os::unix::fs::symlink(tree.path().join("gone"), tree.path().join("broken"))?;

    fileinfo(home.path())?
        .arg("-d")
        .arg(tree.path())
        .args(["-u", "Byte", "-q"])
        .assert()
        .success()
        .stderr(predicate::str::contains("broken"));

    let manifest = fs::read_to_string(tree.path().join("output.txt"))?;
    assert_eq!(manifest, "/ok.txt, 10.00 Byte\n");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_warnings_survive_quiet_rust_log() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "ok.txt", 10)?;
    std::os::unix::fs::symlink(tree.path().join("gone"), tree.path().join("broken"))?;

    fileinfo(home.path())?
        .env("RUST_LOG", "error")
        .arg("-d")
        .arg(tree.path())
        .arg("-q")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error walking entry"));

    Ok(())
}

#[test]
fn test_uncreatable_output_fails() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;
    write_file(tree.path(), "a.txt", 10)?;

    fileinfo(home.path())?
        .arg("-d")
        .arg(tree.path())
        .args(["-o", "missing_dir/out.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create output file"));

    assert!(!tree.path().join("missing_dir").exists());

    Ok(())
}

#[test]
fn test_unknown_unit_is_rejected() -> Result<()> {
    let home = TempDir::new()?;
    let tree = TempDir::new()?;

    fileinfo(home.path())?
        .arg("-d")
        .arg(tree.path())
        .args(["-u", "PB"])
        .assert()
        .failure();

    assert!(!tree.path().join("output.txt").exists());

    Ok(())
}
