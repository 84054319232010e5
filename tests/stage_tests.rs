//! Tree builder tests: layout, idempotency, control record, hook scripts.

mod helpers;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use debstage::descriptor::parse_control;
use debstage::manifest::default_manifest;
use debstage::stage::{self, hooks::Hook, StagedTree};
use helpers::{
    assert_file_contains, assert_file_exists, mode_of, sample_descriptor, TestEnv, FAKE_SYSTEMCTL,
};
use serial_test::serial;

/// Snapshot of (relative path, contents, mode) for every file in the tree.
fn snapshot(tree: &StagedTree) -> Vec<(PathBuf, Vec<u8>, u32)> {
    tree.files()
        .unwrap()
        .into_iter()
        .map(|rel| {
            let path = tree.root().join(&rel);
            (rel, fs::read(&path).unwrap(), mode_of(&path))
        })
        .collect()
}

#[test]
fn test_stage_places_every_manifest_entry() {
    let env = TestEnv::new();
    env.write_sources();
    let descriptor = sample_descriptor();

    let tree = stage::stage(&env.base_dir, &descriptor, &default_manifest()).unwrap();

    assert_eq!(tree.root(), env.tree_root(&descriptor));
    for entry in default_manifest() {
        let dst = tree.root().join(&entry.destination);
        assert_file_exists(&dst);
        assert_file_contains(&dst, &entry.source.display().to_string());
        // Sources are 0600; the manifest mode wins.
        assert_eq!(mode_of(&dst), entry.mode, "{}", dst.display());
    }
    assert_eq!(mode_of(&tree.root().join("usr/bin/opennic-up")), 0o755);
    assert_eq!(
        mode_of(&tree.root().join("lib/systemd/system/opennic-up.timer")),
        0o644
    );
}

#[test]
fn test_stage_is_idempotent() {
    let env = TestEnv::new();
    env.write_sources();
    let descriptor = sample_descriptor();
    let manifest = default_manifest();

    let first = stage::stage(&env.base_dir, &descriptor, &manifest).unwrap();
    let before = snapshot(&first);

    // Loosen a mode by hand; the second run must restore it.
    fs::set_permissions(
        first.root().join("DEBIAN/prerm"),
        fs::Permissions::from_mode(0o600),
    )
    .unwrap();

    let second = stage::stage(&env.base_dir, &descriptor, &manifest).unwrap();
    assert_eq!(first, second);
    assert_eq!(snapshot(&second), before);
}

#[test]
fn test_restage_keeps_unrelated_files() {
    let env = TestEnv::new();
    env.write_sources();
    let descriptor = sample_descriptor();

    let tree = stage::stage(&env.base_dir, &descriptor, &default_manifest()).unwrap();
    let extra = tree.root().join("usr/share/doc/notes.txt");
    fs::create_dir_all(extra.parent().unwrap()).unwrap();
    fs::write(&extra, "hand-added").unwrap();

    stage::stage(&env.base_dir, &descriptor, &default_manifest()).unwrap();
    assert_file_exists(&extra);
    assert!(tree.files().unwrap().iter().any(|p| p.ends_with("notes.txt")));
}

#[test]
fn test_control_record_round_trips_through_tree() {
    let env = TestEnv::new();
    env.write_sources();
    let descriptor = sample_descriptor();

    let tree = stage::stage(&env.base_dir, &descriptor, &default_manifest()).unwrap();
    let text = fs::read_to_string(tree.control_path()).unwrap();

    let keys: Vec<&str> = text
        .lines()
        .filter(|l| !l.starts_with(' '))
        .filter_map(|l| l.split_once(':').map(|(k, _)| k))
        .collect();
    assert_eq!(
        keys,
        [
            "Package",
            "Version",
            "Section",
            "Priority",
            "Architecture",
            "Maintainer",
            "Description"
        ]
    );
    assert_eq!(parse_control(&text), Some(descriptor));
}

fn run_hook(env: &TestEnv, script: &Path, fail_glob: &str) -> (i32, Vec<String>) {
    let log = env.base_dir.join("systemctl.log");
    let _ = fs::remove_file(&log);

    let status = Command::new(script)
        .env("PATH", env.path_var())
        .env("SYSTEMCTL_LOG", &log)
        .env("SYSTEMCTL_FAIL", fail_glob)
        .status()
        .expect("hook should be executable");

    let calls = fs::read_to_string(&log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect();
    (status.code().unwrap_or(-1), calls)
}

fn staged_hooks(env: &TestEnv) -> std::path::PathBuf {
    env.write_sources();
    env.install_tool("systemctl", FAKE_SYSTEMCTL);
    stage::stage(&env.base_dir, &sample_descriptor(), &default_manifest())
        .unwrap()
        .metadata_dir()
}

#[test]
#[serial]
fn test_hooks_run_and_exit_zero() {
    let env = TestEnv::new();
    let meta = staged_hooks(&env);

    let (code, calls) = run_hook(&env, &meta.join(Hook::PostInst.file_name()), "");
    assert_eq!(code, 0);
    assert_eq!(
        calls,
        [
            "daemon-reload",
            "enable opennic-up.timer",
            "start opennic-up.timer"
        ]
    );

    let (code, calls) = run_hook(&env, &meta.join(Hook::PreRm.file_name()), "");
    assert_eq!(code, 0);
    assert_eq!(
        calls,
        [
            "stop opennic-up.timer",
            "disable opennic-up.timer",
            "stop opennic-up.service"
        ]
    );

    let (code, calls) = run_hook(&env, &meta.join(Hook::PostRm.file_name()), "");
    assert_eq!(code, 0);
    assert_eq!(calls, ["daemon-reload"]);
}

#[test]
#[serial]
fn test_prerm_tolerates_already_stopped_timer() {
    let env = TestEnv::new();
    let meta = staged_hooks(&env);

    // Both timer operations fail, as they do once the timer is gone.
    let (code, calls) = run_hook(&env, &meta.join("prerm"), "*opennic-up.timer");
    assert_eq!(code, 0);
    assert_eq!(calls.len(), 3);
}

#[test]
#[serial]
fn test_prerm_service_stop_failure_is_fatal() {
    let env = TestEnv::new();
    let meta = staged_hooks(&env);

    let (code, _) = run_hook(&env, &meta.join("prerm"), "stop opennic-up.service");
    assert_ne!(code, 0);
}

#[test]
#[serial]
fn test_postinst_aborts_on_first_failure() {
    let env = TestEnv::new();
    let meta = staged_hooks(&env);

    let (code, calls) = run_hook(&env, &meta.join("postinst"), "enable *");
    assert_ne!(code, 0);
    // `set -e` stops before the start call.
    assert_eq!(calls, ["daemon-reload", "enable opennic-up.timer"]);
}
