//! Skinned Model
//!
//! [`SkinnedModel`] ties the pieces together: it copies an imported scene into
//! owned runtime structures, and then turns elapsed time into a skinning
//! palette every frame.
//!
//! # Loading
//!
//! ```rust,ignore
//! use armature::{GltfImporter, SkinnedModel, SkinningSettings};
//!
//! let mut model = SkinnedModel::load(&GltfImporter, "walk.glb", &SkinningSettings::default())?;
//! model.update(1.0 / 60.0);
//! upload(model.palette().as_bytes());
//! ```
//!
//! Loading is all-or-nothing: any error leaves no partially built model
//! behind. The palette holds a valid pose as soon as loading returns.

use std::path::Path;

use glam::Mat4;

use crate::animation::{AnimationClip, LoopMode, PoseBinding, PoseEvaluator};
use crate::assets::{ImportedAnimation, ImportedScene, SceneImporter};
use crate::errors::{ArmatureError, Result};
use crate::resources::{MeshGeometry, SkinBindings, SkinningPalette, VertexBoneBinding};
use crate::scene::{Hierarchy, Skeleton, SkeletonBuilder};
use crate::settings::{ClipSelector, SkinningSettings};

#[derive(Debug)]
pub struct SkinnedModel {
    hierarchy: Hierarchy,
    skeleton: Skeleton,
    skin: SkinBindings,
    geometry: MeshGeometry,
    clips: Vec<AnimationClip>,

    global_inverse: Mat4,
    palette: SkinningPalette,

    // Playback state
    active_clip: Option<usize>,
    binding: PoseBinding,
    evaluator: PoseEvaluator,
    loop_mode: LoopMode,
    time_since_loaded: f32,
}

impl SkinnedModel {
    /// Imports `path` with `importer` and builds the model.
    pub fn load<I, P>(importer: &I, path: P, settings: &SkinningSettings) -> Result<Self>
    where
        I: SceneImporter + ?Sized,
        P: AsRef<Path>,
    {
        settings.validate()?;
        let path = path.as_ref();
        let scene = importer.import(path)?;
        let model = Self::from_scene(&scene, settings)?;
        log::info!(
            "Loaded '{}': {} bones, {} vertices, {} clips",
            path.display(),
            model.skeleton.len(),
            model.geometry.vertex_count(),
            model.clips.len()
        );
        Ok(model)
    }

    /// Builds the model from an already imported scene. Nothing of `scene` is
    /// referenced afterwards.
    pub fn from_scene(scene: &ImportedScene, settings: &SkinningSettings) -> Result<Self> {
        settings.validate()?;

        let hierarchy = Hierarchy::from_imported(&scene.root);
        let (skeleton, skin) = SkeletonBuilder::build(&scene.meshes, settings)?;
        let geometry = MeshGeometry::from_meshes(&scene.meshes)?;
        let clips = scene
            .animations
            .iter()
            .map(|anim| build_clip(anim, settings.default_ticks_per_second))
            .collect::<Result<Vec<_>>>()?;
        let palette = SkinningPalette::new(skeleton.len(), settings.max_bones)?;

        let active_clip = match &settings.initial_clip {
            None => None,
            Some(_) if clips.is_empty() => {
                log::debug!("Model has no animations, starting in bind pose");
                None
            }
            Some(selector) => Some(resolve_clip(&clips, selector)?),
        };

        let binding = PoseBinding::bind(&hierarchy, &skeleton, active_clip.map(|i| &clips[i]));
        let global_inverse = hierarchy.global_inverse_transform();

        let mut model = Self {
            hierarchy,
            skeleton,
            skin,
            geometry,
            clips,
            global_inverse,
            palette,
            active_clip,
            binding,
            evaluator: PoseEvaluator::new(),
            loop_mode: settings.loop_mode,
            time_since_loaded: 0.0,
        };
        model.update_pose(0.0);
        Ok(model)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Advances the model clock by `delta_seconds` and re-evaluates the pose
    /// of the active clip. Without an active clip the palette keeps the bind
    /// pose.
    pub fn update(&mut self, delta_seconds: f32) {
        self.time_since_loaded += delta_seconds;

        let Some(clip) = self.active_clip.and_then(|i| self.clips.get(i)) else {
            return;
        };
        let ticks = clip.ticks_at(self.time_since_loaded, self.loop_mode);
        self.update_pose(ticks);
    }

    /// Evaluates the pose at an explicit clip time, in ticks. Non-finite times
    /// evaluate at tick 0.
    pub fn update_pose(&mut self, time_ticks: f32) {
        let time_ticks = if time_ticks.is_finite() { time_ticks } else { 0.0 };
        let clip = self.active_clip.and_then(|i| self.clips.get(i));
        self.evaluator.update_pose(
            &self.hierarchy,
            &mut self.skeleton,
            &self.binding,
            clip,
            time_ticks,
            &self.global_inverse,
            &mut self.palette,
        );
    }

    /// Makes clip `index` the active clip. The model clock keeps running.
    pub fn select_clip(&mut self, index: usize) -> Result<()> {
        let index = resolve_clip(&self.clips, &ClipSelector::Index(index))?;
        self.activate(Some(index));
        Ok(())
    }

    pub fn select_clip_by_name(&mut self, name: &str) -> Result<()> {
        let index = resolve_clip(&self.clips, &ClipSelector::Name(name.to_string()))?;
        self.activate(Some(index));
        Ok(())
    }

    /// Stops animating and returns to the bind pose.
    pub fn clear_clip(&mut self) {
        self.activate(None);
    }

    fn activate(&mut self, clip: Option<usize>) {
        self.active_clip = clip;
        self.binding = match clip {
            Some(i) => PoseBinding::bind(&self.hierarchy, &self.skeleton, self.clips.get(i)),
            None => self.binding.without_tracks(),
        };

        let ticks = self
            .active_clip()
            .map_or(0.0, |c| c.ticks_at(self.time_since_loaded, self.loop_mode));
        self.update_pose(ticks);
    }

    #[inline]
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    #[inline]
    #[must_use]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    /// Final bone transforms, one per bone, in bone index order.
    #[inline]
    #[must_use]
    pub fn bone_transforms(&self) -> &[Mat4] {
        self.palette.as_slice()
    }

    #[inline]
    #[must_use]
    pub fn palette(&self) -> &SkinningPalette {
        &self.palette
    }

    /// Per-vertex bone bindings, indexed like [`geometry`](Self::geometry)'s vertices.
    #[inline]
    #[must_use]
    pub fn vertex_bone_data(&self) -> &[VertexBoneBinding] {
        self.skin.vertices()
    }

    #[inline]
    #[must_use]
    pub fn skin(&self) -> &SkinBindings {
        &self.skin
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    #[must_use]
    pub fn active_clip(&self) -> Option<&AnimationClip> {
        self.active_clip.and_then(|i| self.clips.get(i))
    }

    #[inline]
    #[must_use]
    pub fn active_clip_index(&self) -> Option<usize> {
        self.active_clip
    }

    #[inline]
    #[must_use]
    pub fn global_inverse_transform(&self) -> &Mat4 {
        &self.global_inverse
    }

    #[inline]
    #[must_use]
    pub fn time_since_loaded(&self) -> f32 {
        self.time_since_loaded
    }
}

fn build_clip(anim: &ImportedAnimation, default_ticks_per_second: f32) -> Result<AnimationClip> {
    let clip = AnimationClip::new(
        anim.name.clone(),
        anim.duration_ticks,
        anim.ticks_per_second,
        anim.channels.clone(),
    )?;
    Ok(clip.with_default_rate(default_ticks_per_second))
}

fn resolve_clip(clips: &[AnimationClip], selector: &ClipSelector) -> Result<usize> {
    match selector {
        ClipSelector::Index(index) if *index < clips.len() => Ok(*index),
        ClipSelector::Index(index) => Err(ArmatureError::ClipIndexOutOfBounds {
            index: *index,
            count: clips.len(),
        }),
        ClipSelector::Name(name) => clips
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| ArmatureError::ClipNotFound(name.clone())),
    }
}
