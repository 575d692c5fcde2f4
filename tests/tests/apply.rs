use serde_json::json;
use tempfile::tempdir;

use crate::rigcopy_test::io_util::{avatar_scene, read_json, run_rigcopy, scene_node, write_scene};

const SCALE_ADJUSTER: &str = "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster";
const PHYS_BONE: &str = "VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone";

#[test]
fn apply_from_source() {
    let _ = env_logger::try_init();

    let dir = tempdir().unwrap();
    let scene_path = write_scene(dir.path(), "avatar.json", &avatar_scene());

    run_rigcopy(
        dir.path(),
        &[
            "apply",
            "avatar.json",
            "--source",
            "Armature",
            "--target",
            "Jacket/Armature",
            "--target",
            "Boots/Armature",
            "--all-components",
            "--output",
            "dressed.json",
        ],
        true,
    );

    // The input scene is left alone when an output path is given.
    assert_eq!(read_json(&scene_path), avatar_scene());

    let dressed = read_json(&dir.path().join("dressed.json"));

    let jacket_hips = scene_node(&dressed, "Jacket/Armature/Hips");
    assert_eq!(jacket_hips["scale"], json!([1.1, 1.1, 1.1]));
    assert!(jacket_hips.get("position").is_none());
    assert_eq!(
        jacket_hips["components"],
        json!([
            { "type": SCALE_ADJUSTER, "fields": { "scale": [1.0, 1.2, 1.0] } },
            { "type": PHYS_BONE, "fields": { "pull": 0.2 } }
        ])
    );

    let jacket_spine = scene_node(&dressed, "Jacket/Armature/Hips/Spine");
    assert_eq!(jacket_spine["scale"], json!([0.9, 0.9, 0.9]));

    // Boots have no spine, and no tail gets added to anything.
    let boots_hips = scene_node(&dressed, "Boots/Armature/Hips");
    assert_eq!(boots_hips["scale"], json!([1.1, 1.1, 1.1]));
    assert!(boots_hips.get("children").is_none());
}

#[test]
fn apply_in_place_with_profile() {
    let dir = tempdir().unwrap();
    let scene_path = write_scene(dir.path(), "avatar.json", &avatar_scene());

    fs_err::write(
        dir.path().join("rigcopy.json"),
        r#"{
            // Bones only, no components.
            "copyPosition": true,
            "capture": { "categories": [] },
        }"#,
    )
    .unwrap();

    run_rigcopy(
        dir.path(),
        &["apply", "avatar.json", "--source", "Armature", "--all-targets"],
        true,
    );

    let scene = read_json(&scene_path);

    for target in ["Jacket/Armature/Hips", "Boots/Armature/Hips"] {
        let hips = scene_node(&scene, target);
        assert_eq!(hips["position"], json!([0.0, 0.9, 0.0]));
        assert_eq!(hips["scale"], json!([1.1, 1.1, 1.1]));
        assert!(hips.get("components").is_none());
    }

    // Inactive outfits are not picked up.
    let hat_hips = scene_node(&scene, "Hat/Armature/Hips");
    assert_eq!(hat_hips, &json!({ "name": "Hips" }));
}

#[test]
fn keep_existing_components() {
    let mut scene = avatar_scene();
    scene["children"][1]["children"][0]["children"][0]["components"] = json!([
        { "type": PHYS_BONE, "fields": { "pull": 0.7 } }
    ]);

    let dir = tempdir().unwrap();
    let scene_path = write_scene(dir.path(), "avatar.json", &scene);

    run_rigcopy(
        dir.path(),
        &[
            "apply",
            "avatar.json",
            "--source",
            "Armature",
            "--target",
            "Jacket/Armature",
            "--all-components",
            "--keep-existing",
            "--only",
            PHYS_BONE,
        ],
        true,
    );

    let hips = scene_node(&read_json(&scene_path), "Jacket/Armature/Hips").clone();
    assert_eq!(
        hips["components"],
        json!([{ "type": PHYS_BONE, "fields": { "pull": 0.7 } }])
    );
}

#[test]
fn nothing_selected_is_an_error() {
    let dir = tempdir().unwrap();
    write_scene(dir.path(), "avatar.json", &avatar_scene());
    fs_err::write(dir.path().join("rigcopy.json"), r#"{ "allowedTypes": [] }"#).unwrap();

    let output = run_rigcopy(
        dir.path(),
        &[
            "apply",
            "avatar.json",
            "--source",
            "Armature",
            "--all-targets",
            "--no-scale",
        ],
        false,
    );

    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to copy"));
}

#[test]
fn source_cannot_be_a_target() {
    let dir = tempdir().unwrap();
    let scene_path = write_scene(dir.path(), "avatar.json", &avatar_scene());

    run_rigcopy(
        dir.path(),
        &[
            "apply",
            "avatar.json",
            "--source",
            "Armature",
            "--target",
            "Armature",
        ],
        false,
    );

    assert_eq!(read_json(&scene_path), avatar_scene());
}
