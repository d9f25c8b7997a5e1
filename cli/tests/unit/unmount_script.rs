//! Runs the resolved unmount script under `sh` against a fake mounts table.
//!
//! `umount` is replaced by a shell function and `/proc/mounts` by a temp
//! file, so only the target selection and exit status are exercised.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fmt::Write as _;
use std::process::Command;

use apkdeploy_cli::domain::PackageName;
use apkdeploy_cli::domain::commands::UNMOUNT_SCRIPT;
use tempfile::TempDir;

const OWN: &str = "/data/app/~~aa==/com.example.app-1==/base.apk";
const SIBLING: &str = "/data/app/~~bb==/com.example.app.pro-2==/base.apk";
const LOOKALIKE: &str = "/data/app/~~cc==/comXexampleXapp-3==/base.apk";

struct ScriptRun {
    code: Option<i32>,
    unmounted: Vec<String>,
}

fn run_script(mount_targets: &[&str], umount_stub: &str) -> ScriptRun {
    let dir = TempDir::new().expect("tempdir");
    let mounts = dir.path().join("mounts");
    let mut table = String::from("/dev/block/dm-0 / ext4 ro,seclabel 0 0\n");
    for target in mount_targets {
        writeln!(table, "/dev/block/dm-5 {target} ext4 ro,seclabel 0 0").expect("write");
    }
    std::fs::write(&mounts, table).expect("write mounts");

    let package = PackageName::parse("com.example.app").expect("valid package");
    let script = UNMOUNT_SCRIPT
        .resolve(&package)
        .replace("/proc/mounts", mounts.to_str().expect("utf-8 path"));
    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("umount() {{ {umount_stub}; }}\n{script}"))
        .output()
        .expect("run sh");

    ScriptRun {
        code: output.status.code(),
        unmounted: String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect(),
    }
}

#[test]
fn test_unmounts_only_own_base_apk() {
    let run = run_script(&[OWN, SIBLING, LOOKALIKE], "return 0");

    assert_eq!(run.code, Some(0));
    assert_eq!(run.unmounted, vec![OWN.to_string()]);
}

#[test]
fn test_nothing_mounted_exits_zero_silently() {
    let run = run_script(&[SIBLING], "return 0");

    assert_eq!(run.code, Some(0));
    assert!(run.unmounted.is_empty());
}

#[test]
fn test_failed_umount_exits_non_zero() {
    let run = run_script(&[OWN], "return 1");

    assert_ne!(run.code, Some(0));
    assert!(run.unmounted.is_empty());
}
