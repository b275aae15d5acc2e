//! Asset Import Tests
//!
//! Tests for:
//! - GltfImporter: node tree, skin weights regrouped per joint, animation channels
//! - Loading a SkinnedModel straight from a .glb payload
//! - Error propagation for malformed input
//!
//! The fixture is a binary glTF assembled in memory: one joint node `hip`, one
//! skinned triangle and one clip rotating `hip` 90° about Y over one second.
#![cfg(feature = "gltf")]

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::{Mat4, Quat, Vec3};

use armature::animation::InterpolationMode;
use armature::assets::loaders::gltf::GLTF_ROOT_NAME;
use armature::assets::{GltfImporter, ImportedScene, SceneImporter};
use armature::errors::ArmatureError;
use armature::math::mat4_approx_eq;
use armature::model::SkinnedModel;
use armature::settings::SkinningSettings;

const EPSILON: f32 = 1e-4;

// ============================================================================
// Fixture
// ============================================================================

fn push_f32s(bin: &mut Vec<u8>, values: &[f32]) {
    bin.extend_from_slice(bytemuck::cast_slice(values));
}

fn pad_to_4(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

fn skinned_triangle_glb() -> Vec<u8> {
    glb_with_scenes(false)
}

/// With `stray_scene`, a second non-default scene holds its own joint and a
/// skinned node reusing the triangle mesh.
fn glb_with_scenes(stray_scene: bool) -> Vec<u8> {
    let mut bin = Vec::new();

    // 0: positions, 3 x vec3
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    // 36: joints, 3 x u8vec4
    bin.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    // 48: weights, 3 x vec4
    push_f32s(
        &mut bin,
        &[1.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    );
    // 96: indices, 3 x u16 (+2 padding)
    bin.extend_from_slice(bytemuck::cast_slice(&[0u16, 1, 2]));
    pad_to_4(&mut bin, 0);
    // 104: inverse bind matrix
    push_f32s(
        &mut bin,
        &Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)).to_cols_array(),
    );
    // 168: key times
    push_f32s(&mut bin, &[0.0, 1.0]);
    // 176: rotations, 2 x quat (xyzw)
    let end = Quat::from_rotation_y(FRAC_PI_2);
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, end.x, end.y, end.z, end.w]);
    assert_eq!(bin.len(), 208);

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [ {{ "nodes": [0, 1] }}{extra_scenes} ],
  "nodes": [
    {{ "name": "hip", "translation": [0.0, 1.0, 0.0] }},
    {{ "name": "body", "mesh": 0, "skin": 0 }}{extra_nodes}
  ],
  "meshes": [ {{
    "name": "tri",
    "primitives": [ {{
      "attributes": {{ "POSITION": 0, "JOINTS_0": 1, "WEIGHTS_0": 2 }},
      "indices": 3
    }} ]
  }} ],
  "skins": [ {{ "joints": [0], "inverseBindMatrices": 4 }}{extra_skins} ],
  "animations": [ {{
    "name": "turn",
    "samplers": [ {{ "input": 5, "output": 6, "interpolation": "LINEAR" }} ],
    "channels": [ {{ "sampler": 0, "target": {{ "node": 0, "path": "rotation" }} }} ]
  }} ],
  "buffers": [ {{ "byteLength": {len} }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 12 }},
    {{ "buffer": 0, "byteOffset": 48, "byteLength": 48 }},
    {{ "buffer": 0, "byteOffset": 96, "byteLength": 6 }},
    {{ "buffer": 0, "byteOffset": 104, "byteLength": 64 }},
    {{ "buffer": 0, "byteOffset": 168, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 176, "byteLength": 32 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5121, "count": 3, "type": "VEC4" }},
    {{ "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC4" }},
    {{ "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }},
    {{ "bufferView": 4, "componentType": 5126, "count": 1, "type": "MAT4" }},
    {{ "bufferView": 5, "componentType": 5126, "count": 2, "type": "SCALAR",
       "min": [0.0], "max": [1.0] }},
    {{ "bufferView": 6, "componentType": 5126, "count": 2, "type": "VEC4" }}
  ]
}}"#,
        len = bin.len(),
        extra_scenes = if stray_scene { r#", { "nodes": [2, 3] }"# } else { "" },
        extra_nodes = if stray_scene {
            r#", { "name": "stray_joint" }, { "name": "stray_body", "mesh": 0, "skin": 1 }"#
        } else {
            ""
        },
        extra_skins = if stray_scene { r#", { "joints": [2] }"# } else { "" },
    );

    let mut json = json.into_bytes();
    pad_to_4(&mut json, b' ');

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}

fn import_fixture() -> ImportedScene {
    GltfImporter::new()
        .import_slice(&skinned_triangle_glb(), None)
        .unwrap()
}

// ============================================================================
// GltfImporter
// ============================================================================

#[test]
fn scene_roots_hang_under_synthetic_root() {
    let scene = import_fixture();
    assert_eq!(scene.root.name, GLTF_ROOT_NAME);
    assert_eq!(scene.root.local_transform, Mat4::IDENTITY);

    let names: Vec<&str> = scene.root.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["hip", "body"]);
    assert!(mat4_approx_eq(
        &scene.root.children[0].local_transform,
        &Mat4::from_translation(Vec3::Y),
        EPSILON
    ));
}

#[test]
fn skin_weights_are_regrouped_per_joint() {
    let scene = import_fixture();
    assert_eq!(scene.meshes.len(), 1);

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, [0, 1, 2]);
    assert_eq!(mesh.bones.len(), 1);

    let hip = &mesh.bones[0];
    assert_eq!(hip.name, "hip");
    let weights: Vec<(u32, f32)> = hip.weights.iter().map(|w| (w.vertex_id, w.weight)).collect();
    assert_eq!(weights, [(0, 1.0), (1, 0.5), (2, 1.0)]);
    assert!(mat4_approx_eq(
        &hip.offset_matrix,
        &Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        EPSILON
    ));
}

#[test]
fn animation_channels_become_node_tracks() {
    let scene = import_fixture();
    assert_eq!(scene.animations.len(), 1);

    let anim = &scene.animations[0];
    assert_eq!(anim.name, "turn");
    assert!((anim.ticks_per_second - 1.0).abs() < f32::EPSILON);
    assert_eq!(anim.channels.len(), 1);

    let track = &anim.channels[0];
    assert_eq!(track.node_name, "hip");
    assert!(track.translation.is_none());
    let rotation = track.rotation.as_ref().unwrap();
    assert_eq!(rotation.times, [0.0, 1.0]);
    assert_eq!(rotation.interpolation, InterpolationMode::Linear);
}

#[test]
fn only_default_scene_meshes_are_imported() {
    let scene = GltfImporter::new()
        .import_slice(&glb_with_scenes(true), None)
        .unwrap();

    // gltf_root, hip, body
    assert_eq!(scene.root.count(), 3);
    assert_eq!(scene.meshes.len(), 1);
    let bones: Vec<&str> = scene.meshes[0].bones.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(bones, ["hip"]);

    let model = SkinnedModel::from_scene(&scene, &SkinningSettings::default()).unwrap();
    assert_eq!(model.skeleton().len(), 1);
    assert!(model.skeleton().bone_index("stray_joint").is_none());
}

#[test]
fn malformed_payload_is_an_error() {
    let err = GltfImporter::new()
        .import_slice(b"definitely not gltf", None)
        .unwrap_err();
    assert!(matches!(err, ArmatureError::GltfError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GltfImporter::new()
        .import(Path::new("does/not/exist.glb"))
        .unwrap_err();
    assert!(matches!(err, ArmatureError::IoError(_)));
}

// ============================================================================
// End to End
// ============================================================================

#[test]
fn glb_drives_a_skinned_model() {
    let scene = import_fixture();
    let mut model = SkinnedModel::from_scene(&scene, &SkinningSettings::default()).unwrap();

    // Rest pose: hip global cancels its inverse bind matrix.
    assert!(mat4_approx_eq(&model.bone_transforms()[0], &Mat4::IDENTITY, EPSILON));

    // Half a second in: 45° about Y around the hip.
    model.update(0.5);
    let expected = Mat4::from_translation(Vec3::Y)
        * Mat4::from_quat(Quat::from_rotation_y(FRAC_PI_2 / 2.0))
        * Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
    assert!(mat4_approx_eq(&model.bone_transforms()[0], &expected, EPSILON));
}
