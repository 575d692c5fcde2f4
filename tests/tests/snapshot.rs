use insta::assert_snapshot;
use serde_json::json;
use tempfile::tempdir;

use crate::rigcopy_test::io_util::{avatar_scene, read_json, run_rigcopy, scene_node, write_scene};

const SCALE_ADJUSTER: &str = "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster";

fn outfit_scene() -> serde_json::Value {
    json!({
        "name": "Skirt",
        "children": [{
            "name": "Armature",
            "children": [{ "name": "Hips", "children": [{ "name": "Tail" }] }]
        }]
    })
}

#[test]
fn outline_of_snapshot() {
    let dir = tempdir().unwrap();
    write_scene(dir.path(), "avatar.json", &avatar_scene());

    let output = run_rigcopy(
        dir.path(),
        &["snapshot", "avatar.json", "--source", "Armature"],
        true,
    );

    assert_snapshot!(String::from_utf8_lossy(&output.stdout), @r###"
    • Hips - 1 components
      • Spine - 0 components
      • Tail - 0 components
    "###);
}

#[test]
fn snapshot_then_apply_elsewhere() {
    let dir = tempdir().unwrap();
    write_scene(dir.path(), "avatar.json", &avatar_scene());
    let outfit_path = write_scene(dir.path(), "skirt.json", &outfit_scene());

    run_rigcopy(
        dir.path(),
        &[
            "snapshot",
            "avatar.json",
            "--source",
            "Armature",
            "--output",
            "hips.snapshot.json",
        ],
        true,
    );

    let snapshot = read_json(&dir.path().join("hips.snapshot.json"));
    assert_eq!(snapshot["roots"][0]["name"], "Hips");
    assert_eq!(
        snapshot["roots"][0]["components"][0]["type"],
        SCALE_ADJUSTER
    );

    // The skirt's scene has never seen a scale adjuster, so the profile has
    // to make the type known.
    fs_err::write(
        dir.path().join("rigcopy.json"),
        format!(r#"{{ "knownTypes": ["{}"] }}"#, SCALE_ADJUSTER),
    )
    .unwrap();

    run_rigcopy(
        dir.path(),
        &[
            "apply",
            "skirt.json",
            "--snapshot",
            "hips.snapshot.json",
            "--target",
            "Armature",
        ],
        true,
    );

    let skirt = read_json(&outfit_path);
    let hips = scene_node(&skirt, "Armature/Hips");
    assert_eq!(hips["scale"], json!([1.1, 1.1, 1.1]));
    assert_eq!(
        hips["components"],
        json!([{ "type": SCALE_ADJUSTER, "fields": { "scale": [1.0, 1.2, 1.0] } }])
    );
}

#[test]
fn unknown_types_are_skipped() {
    let dir = tempdir().unwrap();
    write_scene(dir.path(), "avatar.json", &avatar_scene());
    let outfit_path = write_scene(dir.path(), "skirt.json", &outfit_scene());

    run_rigcopy(
        dir.path(),
        &[
            "snapshot",
            "avatar.json",
            "--source",
            "Armature",
            "-o",
            "hips.snapshot.json",
        ],
        true,
    );

    run_rigcopy(
        dir.path(),
        &[
            "apply",
            "skirt.json",
            "--snapshot",
            "hips.snapshot.json",
            "--target",
            "Armature",
        ],
        true,
    );

    let hips = scene_node(&read_json(&outfit_path), "Armature/Hips").clone();
    assert_eq!(hips["scale"], json!([1.1, 1.1, 1.1]));
    assert!(hips.get("components").is_none());
}
