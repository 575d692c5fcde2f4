use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::Value;

pub static RIGCOPY_PATH: &str = env!("CARGO_BIN_EXE_rigcopy");

/// An avatar with a source armature and two outfits dressed on it.
pub fn avatar_scene() -> Value {
    serde_json::json!({
        "name": "Avatar",
        "children": [
            {
                "name": "Armature",
                "children": [{
                    "name": "Hips",
                    "position": [0.0, 0.9, 0.0],
                    "scale": [1.1, 1.1, 1.1],
                    "components": [
                        {
                            "type": "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster",
                            "fields": { "scale": [1.0, 1.2, 1.0] }
                        },
                        {
                            "type": "VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone",
                            "fields": { "pull": 0.2 }
                        }
                    ],
                    "children": [
                        { "name": "Spine", "scale": [0.9, 0.9, 0.9] },
                        { "name": "Tail" }
                    ]
                }]
            },
            {
                "name": "Jacket",
                "children": [{
                    "name": "Armature",
                    "children": [{
                        "name": "Hips",
                        "children": [{ "name": "Spine" }]
                    }]
                }]
            },
            {
                "name": "Boots",
                "children": [{
                    "name": "Armature",
                    "children": [{ "name": "Hips" }]
                }]
            },
            {
                "name": "Hat",
                "active": false,
                "children": [{ "name": "Armature", "children": [{ "name": "Hips" }] }]
            }
        ]
    })
}

pub fn write_scene(dir: &Path, name: &str, scene: &Value) -> PathBuf {
    let path = dir.join(name);
    fs_err::write(&path, serde_json::to_string_pretty(scene).unwrap()).unwrap();
    path
}

pub fn read_json(path: &Path) -> Value {
    let contents = fs_err::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

/// Runs rigcopy in `working_dir` and returns its output. Panics with the
/// captured stderr if `should_succeed` does not match the exit status.
pub fn run_rigcopy(working_dir: &Path, args: &[&str], should_succeed: bool) -> Output {
    let output = Command::new(RIGCOPY_PATH)
        .args(args)
        .current_dir(working_dir)
        .env("RUST_LOG", "error")
        .output()
        .expect("Couldn't start rigcopy");

    if output.status.success() != should_succeed {
        panic!(
            "rigcopy {:?} exited with {}\nstdout: {}\nstderr: {}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    output
}

/// Follows a `/`-separated path of child names through a scene value.
pub fn scene_node<'a>(scene: &'a Value, path: &str) -> &'a Value {
    let mut current = scene;

    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        current = current["children"]
            .as_array()
            .and_then(|children| children.iter().find(|child| child["name"] == segment))
            .unwrap_or_else(|| panic!("no node at {}", path));
    }

    current
}
