//! Loads a skinned glTF model and prints its bone palette over a few frames.
//!
//! ```text
//! cargo run --example skinning -- path/to/model.glb [clip-name] [settings.json]
//! ```

use std::path::PathBuf;

use anyhow::Context;
use armature::{GltfImporter, SkinnedModel, SkinningSettings};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path: PathBuf = args
        .next()
        .context("usage: skinning <model.glb> [clip-name] [settings.json]")?
        .into();
    let clip = args.next();

    let settings = match args.next() {
        Some(file) => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading settings from {file}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {file}"))?
        }
        None => SkinningSettings::default(),
    };

    let mut model = SkinnedModel::load(&GltfImporter::new(), &path, &settings)?;
    if let Some(name) = clip {
        model.select_clip_by_name(&name)?;
    }

    println!(
        "{}: {} bones, {} vertices, {} sub-meshes",
        path.display(),
        model.skeleton().len(),
        model.geometry().vertex_count(),
        model.geometry().sub_meshes.len()
    );
    for clip in model.clips() {
        println!(
            "  clip '{}': {:.1} ticks at {:.1} ticks/s",
            clip.name(),
            clip.duration_ticks(),
            clip.ticks_per_second()
        );
    }

    let dropped = model.skin().dropped_influences();
    if dropped > 0 {
        println!("  {dropped} bone influences discarded");
    }

    // Ten frames at 30 fps
    for frame in 0..10 {
        model.update(1.0 / 30.0);
        println!("frame {frame} (t = {:.3} s)", model.time_since_loaded());
        for (bone, m) in model.skeleton().bones().iter().zip(model.bone_transforms()) {
            let (_, rotation, translation) = m.to_scale_rotation_translation();
            let (axis, angle) = rotation.to_axis_angle();
            println!(
                "  {:<24} t = {:>7.3} {:>7.3} {:>7.3}  r = {:>6.1}° about {:.2}",
                bone.name,
                translation.x,
                translation.y,
                translation.z,
                angle.to_degrees(),
                axis
            );
        }
    }

    Ok(())
}
