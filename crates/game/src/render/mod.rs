//! Rendering: the lit scene pass followed by the HUD overlay.

mod instances;

pub use instances::FrameInstances;

use procgen::TerrainVertex;
use renderer::{DrawBatch, InstanceData, Mesh, RenderError, SceneUniform, Vertex};

use crate::hud::HudData;
use crate::GameState;

/// Upload ground or mountain geometry as a renderer mesh.
pub fn upload_terrain(device: &wgpu::Device, vertices: &[TerrainVertex], indices: &[u32], label: &str) -> Mesh {
    let vertices: Vec<Vertex> = vertices
        .iter()
        .map(|v| Vertex::with_color(v.position, v.normal, v.color))
        .collect();
    Mesh::new(device, &vertices, indices, label)
}

/// Run all render passes. Called from `GameState::render()`.
pub fn run(state: &mut GameState) -> Result<(), RenderError> {
    let (sw, sh) = state.renderer.dimensions();
    state.camera.set_aspect(sw, sh);
    state.sim.camera.apply(&mut state.camera);

    let point_light = state.sim.explosion.as_ref().and_then(|e| e.point_light());
    let lighting = state.sim.environment.lighting(point_light);
    state
        .renderer
        .update_scene(&SceneUniform::new(&state.camera, &lighting));

    let frame = FrameInstances::collect(&state.world, &state.sim, &state.aircraft_parts);

    let (output, mut encoder) = state.renderer.begin_frame()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    // Terrain meshes are already in world space.
    let identity = [InstanceData::default()];
    let mut opaque = vec![
        DrawBatch::new(&state.ground_mesh, &identity),
        DrawBatch::new(&state.mountain_mesh, &identity),
    ];
    let mut transparent = Vec::new();
    for (batches, buckets) in [(&mut opaque, &frame.opaque), (&mut transparent, &frame.transparent)] {
        for (id, instances) in buckets {
            match state.meshes.get(*id) {
                Some(mesh) => batches.push(DrawBatch::new(mesh, instances)),
                None => log::warn!("No mesh loaded for {:?}", id),
            }
        }
    }

    state.renderer.render_scene(
        &mut encoder,
        &view,
        state.sim.environment.sky_color(),
        &opaque,
        &transparent,
    );

    let hud = HudData {
        info: state.sim.aircraft.info(),
        phase: state.sim.phase,
        fps: state.time.fps(),
    }
    .build(sw as f32, sh as f32);
    state
        .renderer
        .render_overlay(&mut encoder, &view, &hud.vertices, &hud.indices);

    state.renderer.end_frame(output, encoder);
    Ok(())
}
