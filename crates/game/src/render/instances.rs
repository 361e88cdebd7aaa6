//! Per-frame instance lists, grouped by mesh and pass.

use engine_core::{rgb_hex, MeshId, MeshInstance, Transform};
use glam::{Mat4, Quat, Vec3};
use hecs::World;
use renderer::InstanceData;
use std::collections::HashMap;

use crate::aircraft_model::ModelPart;
use crate::effects::{Explosion, SmokeEmitter, FLARE_COLOR, FLARE_RADIUS};
use crate::state::Simulation;

/// Instances for one frame, bucketed by mesh.
#[derive(Default)]
pub struct FrameInstances {
    pub opaque: HashMap<MeshId, Vec<InstanceData>>,
    pub transparent: HashMap<MeshId, Vec<InstanceData>>,
}

impl FrameInstances {
    pub fn collect(world: &World, sim: &Simulation, parts: &[ModelPart]) -> Self {
        let mut frame = Self::default();
        frame.add_world(world);
        if sim.model_visible {
            let aircraft = Transform::from_position_rotation(
                sim.aircraft.position,
                sim.aircraft.model_rotation(),
            );
            frame.add_aircraft(aircraft.to_matrix(), parts);
        }
        if let Some(explosion) = &sim.explosion {
            frame.add_explosion(explosion);
        }
        if let Some(smoke) = &sim.smoke {
            frame.add_smoke(smoke);
        }
        frame
    }

    fn push(&mut self, transparent: bool, mesh: MeshId, instance: InstanceData) {
        let bucket = if transparent {
            &mut self.transparent
        } else {
            &mut self.opaque
        };
        bucket.entry(mesh).or_default().push(instance);
    }

    /// Every entity with a transform and a mesh.
    pub fn add_world(&mut self, world: &World) {
        for (_, (transform, mesh)) in world.query::<(&Transform, &MeshInstance)>().iter() {
            self.push(false, mesh.mesh, InstanceData::opaque(transform.to_matrix(), mesh.color));
        }
    }

    pub fn add_aircraft(&mut self, aircraft: Mat4, parts: &[ModelPart]) {
        for part in parts {
            let instance = InstanceData::new(part.world_matrix(aircraft), part.color.extend(part.alpha));
            self.push(part.is_transparent(), part.mesh, instance);
        }
    }

    /// Self-lit sparks plus the flare sphere. Sparks keep a fixed world size
    /// while the burst spreads them apart.
    pub fn add_explosion(&mut self, explosion: &Explosion) {
        let opacity = explosion.opacity().min(1.0);
        for p in &explosion.particles {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(p.size * 0.5),
                Quat::IDENTITY,
                explosion.particle_position(p),
            );
            self.push(true, MeshId::Sphere, InstanceData::new(model, p.color.extend(opacity)).emissive(1.0));
        }

        let flare_opacity = explosion.flare_opacity();
        if flare_opacity > 0.0 {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(FLARE_RADIUS * explosion.flare_scale()),
                Quat::IDENTITY,
                explosion.position,
            );
            let color = rgb_hex(FLARE_COLOR).extend(flare_opacity);
            self.push(true, MeshId::Sphere, InstanceData::new(model, color).emissive(1.0));
        }
    }

    pub fn add_smoke(&mut self, smoke: &SmokeEmitter) {
        for p in smoke.particles() {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(smoke.particle_size(p)),
                Quat::IDENTITY,
                p.position,
            );
            let color = smoke.color.extend(smoke.opacity(p) * 0.6);
            self.push(true, MeshId::Sphere, InstanceData::new(model, color).emissive(0.3));
        }
    }

    pub fn len(&self) -> usize {
        self.opaque.values().chain(self.transparent.values()).map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft_model::aircraft_parts;
    use crate::camera_rig::ChaseCamera;
    use input::InputState;
    use physics::AircraftParams;
    use procgen::{GroundConfig, SceneryConfig, SceneryLayout};

    fn sim() -> Simulation {
        Simulation::new(
            AircraftParams::arcade(),
            ChaseCamera::default(),
            GroundConfig::default(),
            1,
        )
    }

    #[test]
    fn scenery_is_drawn_opaque_by_mesh() {
        let mut world = World::new();
        let config = SceneryConfig {
            tree_count: 5,
            rock_count: 3,
            ..Default::default()
        };
        SceneryLayout::generate(&config, &GroundConfig::default()).spawn_into(&mut world);

        let mut frame = FrameInstances::default();
        frame.add_world(&world);
        assert_eq!(frame.opaque[&MeshId::Trunk].len(), 5);
        assert_eq!(frame.opaque[&MeshId::Cone].len(), 5);
        assert_eq!(frame.opaque[&MeshId::Rock].len(), 3);
        assert!(frame.transparent.is_empty());
    }

    #[test]
    fn flying_aircraft_has_a_transparent_canopy() {
        let frame = FrameInstances::collect(&World::new(), &sim(), &aircraft_parts());
        assert_eq!(frame.len(), 6);
        assert_eq!(frame.transparent[&MeshId::Sphere].len(), 1);
        assert_eq!(frame.transparent[&MeshId::Sphere][0].color[3], 0.7);
    }

    #[test]
    fn crash_swaps_aircraft_for_fireball() {
        let mut sim = sim();
        sim.aircraft.position = Vec3::new(0.0, 5.0, 0.0);
        sim.aircraft.velocity = Vec3::new(0.0, -30.0, 60.0);
        sim.step(1.0 / 60.0, &InputState::new());

        let frame = FrameInstances::collect(&World::new(), &sim, &aircraft_parts());
        assert!(frame.opaque.is_empty());
        let spheres = &frame.transparent[&MeshId::Sphere];
        // 1000 sparks, the flare, and the first puff of smoke.
        assert!(spheres.len() > 1001);
        assert!(spheres.iter().all(|i| i.color[3] > 0.0));
    }
}
