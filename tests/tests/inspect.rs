use insta::assert_snapshot;
use tempfile::tempdir;

use crate::rigcopy_test::io_util::{avatar_scene, run_rigcopy, write_scene};

#[test]
fn list_components() {
    let dir = tempdir().unwrap();
    write_scene(dir.path(), "avatar.json", &avatar_scene());

    let output = run_rigcopy(
        dir.path(),
        &["components", "avatar.json", "--source", "Armature"],
        true,
    );

    assert_snapshot!(String::from_utf8_lossy(&output.stdout), @r###"
    Plugin framework (1):
      nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster
    Third-party runtime (1):
      VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone
    "###);
}

#[test]
fn find_targets() {
    let dir = tempdir().unwrap();
    write_scene(dir.path(), "avatar.json", &avatar_scene());

    let output = run_rigcopy(
        dir.path(),
        &["find", "avatar.json", "--source", "Armature"],
        true,
    );
    assert_snapshot!(String::from_utf8_lossy(&output.stdout), @r###"
    Jacket/Armature
    Boots/Armature
    "###);

    let output = run_rigcopy(
        dir.path(),
        &["find", "avatar.json", "--include-inactive"],
        true,
    );
    assert_snapshot!(String::from_utf8_lossy(&output.stdout), @r###"
    Armature
    Jacket/Armature
    Boots/Armature
    Hat/Armature
    "###);

    let output = run_rigcopy(dir.path(), &["find", "avatar.json", "--root", "Boots"], true);
    assert_snapshot!(String::from_utf8_lossy(&output.stdout), @"Boots/Armature");
}

#[test]
fn missing_scene_is_an_error() {
    let dir = tempdir().unwrap();

    let output = run_rigcopy(dir.path(), &["find", "nowhere.json"], false);
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere.json"));
}
