use std::fs;
use std::path::Path;

use gltf::animation::util::ReadOutputs;
use glam::{Mat4, Quat, Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::{InterpolationMode, KeyframeTrack, NodeTrack};
use crate::assets::importer::{
    ImportedAnimation, ImportedBone, ImportedMesh, ImportedNode, ImportedScene, SceneImporter,
    VertexWeight,
};
use crate::errors::{ArmatureError, Result};

/// Name of the synthetic node that parents a glTF scene's root nodes.
pub const GLTF_ROOT_NAME: &str = "gltf_root";

/// Imports `.gltf` / `.glb` files.
///
/// glTF animation inputs are seconds, so clips come out with one tick per
/// second. Cubic-spline channels keep only their key values and are sampled
/// linearly.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl GltfImporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Imports from an in-memory `.glb` / `.gltf` payload. External buffers
    /// are resolved relative to `base_path`.
    pub fn import_slice(&self, data: &[u8], base_path: Option<&Path>) -> Result<ImportedScene> {
        let gltf = gltf::Gltf::from_slice(data)?;
        let buffers = load_buffers(&gltf, base_path)?;
        build_scene(&gltf, &buffers)
    }
}

impl SceneImporter for GltfImporter {
    fn import(&self, path: &Path) -> Result<ImportedScene> {
        let data = fs::read(path)?;
        log::info!("Importing glTF: {}", path.display());
        self.import_slice(&data, path.parent())
    }
}

fn load_buffers(gltf: &gltf::Gltf, base_path: Option<&Path>) -> Result<Vec<Vec<u8>>> {
    let buffers = gltf::import_buffers(&gltf.document, base_path, gltf.blob.clone())?;
    Ok(buffers.into_iter().map(|data| data.0).collect())
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn build_scene(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<ImportedScene> {
    let mut root = ImportedNode::new(GLTF_ROOT_NAME, Mat4::IDENTITY);
    let mut meshes = Vec::new();
    // Only the default scene is imported; meshes in other scenes would bind
    // bones that have no node in the hierarchy.
    if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
        for node in scene.nodes() {
            root.children.push(build_node(&node, buffers, &mut meshes)?);
        }
    }

    let animations = gltf
        .animations()
        .map(|anim| load_animation(&anim, buffers))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "glTF import: {} nodes, {} meshes, {} animations",
        root.count(),
        meshes.len(),
        animations.len()
    );

    Ok(ImportedScene {
        root,
        meshes,
        animations,
    })
}

/// Converts `node` and its subtree, appending their meshes in pre-order.
fn build_node(
    node: &gltf::Node,
    buffers: &[Vec<u8>],
    meshes: &mut Vec<ImportedMesh>,
) -> Result<ImportedNode> {
    load_node_meshes(node, buffers, meshes)?;
    let children = node
        .children()
        .map(|child| build_node(&child, buffers, meshes))
        .collect::<Result<Vec<_>>>()?;

    Ok(ImportedNode {
        name: node_name(node),
        local_transform: Mat4::from_cols_array_2d(&node.transform().matrix()),
        children,
    })
}

fn load_skin_bones(skin: &gltf::Skin, buffers: &[Vec<u8>]) -> Vec<ImportedBone> {
    let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
    let joint_count = skin.joints().count();

    let ibms: Vec<Mat4> = match reader.read_inverse_bind_matrices() {
        Some(iter) => iter.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
        None => vec![Mat4::IDENTITY; joint_count],
    };

    skin.joints()
        .enumerate()
        .map(|(i, joint)| {
            ImportedBone::new(
                node_name(&joint),
                ibms.get(i).copied().unwrap_or(Mat4::IDENTITY),
            )
        })
        .collect()
}

fn load_node_meshes(
    node: &gltf::Node,
    buffers: &[Vec<u8>],
    meshes: &mut Vec<ImportedMesh>,
) -> Result<()> {
    let Some(mesh) = node.mesh() else {
        return Ok(());
    };

    let skin_bones = node.skin().map(|skin| load_skin_bones(&skin, buffers));

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping primitive {} of mesh '{}': only triangle lists are supported",
                primitive.index(),
                mesh.name().unwrap_or("unnamed")
            );
            continue;
        }

        let name = format!(
            "{}#{}",
            mesh.name().map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string),
            primitive.index()
        );
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .map(|iter| iter.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let vertex_count = positions.len();

        let normals: Vec<Vec3> = reader
            .read_normals()
            .map(|iter| iter.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let tex_coords: Vec<Vec2> = reader
            .read_tex_coords(0)
            .map(|iter| iter.into_f32().map(Vec2::from_array).collect())
            .unwrap_or_default();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..vertex_count as u32).collect(),
        };

        let mut bones = Vec::new();
        if let Some(skin_bones) = &skin_bones {
            bones.clone_from(skin_bones);

            if let (Some(joints), Some(weights)) = (reader.read_joints(0), reader.read_weights(0)) {
                for (vertex_id, (joint_set, weight_set)) in
                    joints.into_u16().zip(weights.into_f32()).enumerate()
                {
                    for (&joint, &weight) in joint_set.iter().zip(weight_set.iter()) {
                        if weight == 0.0 {
                            continue;
                        }
                        let bone = bones.get_mut(joint as usize).ok_or_else(|| {
                            ArmatureError::ImportFailed(format!(
                                "mesh '{name}' references joint {joint}, but its skin has {} joints",
                                skin_bones.len()
                            ))
                        })?;
                        bone.weights.push(VertexWeight {
                            vertex_id: vertex_id as u32,
                            weight,
                        });
                    }
                }
            }

            // Joints that influence nothing in this primitive still define bones
            // for the rest of the skin, but carry no weights here.
            bones.retain(|bone| !bone.weights.is_empty());
        }

        meshes.push(ImportedMesh {
            name,
            positions,
            normals,
            tex_coords,
            indices,
            material_index: primitive.material().index().map_or(0, |i| i as u32),
            bones,
        });
    }

    Ok(())
}

fn load_animation(anim: &gltf::Animation, buffers: &[Vec<u8>]) -> Result<ImportedAnimation> {
    let name = anim
        .name()
        .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);

    // Channels are regrouped per target node, in order of first appearance.
    let mut channels: Vec<NodeTrack> = Vec::new();
    let mut by_node: FxHashMap<usize, usize> = FxHashMap::default();

    for channel in anim.channels() {
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let target = channel.target();
        let node = target.node();

        let Some(inputs) = reader.read_inputs() else {
            return Err(ArmatureError::ImportFailed(format!(
                "animation '{name}' has a channel without key times"
            )));
        };
        let times: Vec<f32> = inputs.collect();

        let (interpolation, stride) = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => (InterpolationMode::Linear, 1),
            gltf::animation::Interpolation::Step => (InterpolationMode::Step, 1),
            gltf::animation::Interpolation::CubicSpline => {
                log::warn!(
                    "Animation '{name}': cubic spline channel on '{}' sampled linearly",
                    node_name(&node)
                );
                (InterpolationMode::Linear, 3)
            }
        };

        let slot = *by_node.entry(node.index()).or_insert_with(|| {
            channels.push(NodeTrack::new(node_name(&node)));
            channels.len() - 1
        });
        let track = &mut channels[slot];

        match reader.read_outputs() {
            Some(ReadOutputs::Translations(iter)) => {
                let values = key_values(iter.map(Vec3::from_array), stride);
                track.translation = Some(KeyframeTrack::new(times, values, interpolation));
            }
            Some(ReadOutputs::Rotations(iter)) => {
                let values = key_values(iter.into_f32().map(Quat::from_array), stride);
                track.rotation = Some(KeyframeTrack::new(times, values, interpolation));
            }
            Some(ReadOutputs::Scales(iter)) => {
                let values = key_values(iter.map(Vec3::from_array), stride);
                track.scale = Some(KeyframeTrack::new(times, values, interpolation));
            }
            Some(ReadOutputs::MorphTargetWeights(_)) => {
                log::debug!("Animation '{name}': morph target weights ignored");
            }
            None => {
                return Err(ArmatureError::ImportFailed(format!(
                    "animation '{name}' has a channel without key values"
                )));
            }
        }
    }

    // Morph-only targets leave tracks with no transform channel behind.
    channels.retain(|t| t.translation.is_some() || t.rotation.is_some() || t.scale.is_some());

    Ok(ImportedAnimation {
        name,
        duration_ticks: 0.0,
        ticks_per_second: 1.0,
        channels,
    })
}

/// Cubic-spline outputs are stored as (in-tangent, value, out-tangent) triples.
fn key_values<T>(iter: impl Iterator<Item = T>, stride: usize) -> Vec<T> {
    if stride == 1 {
        iter.collect()
    } else {
        iter.skip(1).step_by(stride).collect()
    }
}
