//! Scenery layout: trees, rocks and the distant mountain ring.
//!
//! Layouts are pure data generated from a seed. [`SceneryLayout::spawn_into`]
//! turns them into ECS entities the renderer draws as instanced meshes.

use crate::terrain::{deterministic_noise_seed, GroundConfig, TerrainVertex};
use engine_core::{rgb_hex, MeshId, MeshInstance, Quat, Scenery, Transform, Vec3, World};
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Trunk colour (saddle brown).
pub const TRUNK_COLOR: u32 = 0x8B4513;
/// Foliage colour (forest green).
pub const FOLIAGE_COLOR: u32 = 0x228B22;
/// Rock colour.
pub const ROCK_COLOR: u32 = 0x808080;

/// Configuration for scenery placement.
#[derive(Debug, Clone)]
pub struct SceneryConfig {
    pub seed: u64,
    pub tree_count: usize,
    pub rock_count: usize,
    /// Trees and rocks are scattered uniformly in distance up to this radius.
    pub scatter_radius: f32,
    pub mountain_count: usize,
    /// Mountains sit on a ring between these radii.
    pub mountain_ring: (f32, f32),
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            tree_count: 1000,
            rock_count: 200,
            scatter_radius: 1500.0,
            mountain_count: 40,
            mountain_ring: (3000.0, 4000.0),
        }
    }
}

/// A single conifer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    /// Point where the trunk meets the ground.
    pub base: Vec3,
    /// Total height, in [10, 50).
    pub height: f32,
}

impl Tree {
    /// Trunk: cylinder of radii 1 (top) and 2 (bottom), 0.4 of the height,
    /// centred at 0.2 of the height.
    pub fn trunk_transform(&self) -> Transform {
        Transform::from_position(self.base + Vec3::Y * (self.height * 0.2))
            .with_scale(Vec3::new(1.0, self.height * 0.4, 1.0))
    }

    /// Foliage: cone of radius 0.2h and height 0.8h centred at 0.6h.
    pub fn foliage_transform(&self) -> Transform {
        Transform::from_position(self.base + Vec3::Y * (self.height * 0.6))
            .with_scale(Vec3::new(self.height * 0.2, self.height * 0.8, self.height * 0.2))
    }
}

/// A boulder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rock {
    /// Ground point below the rock.
    pub base: Vec3,
    /// Radius, in [5, 20).
    pub size: f32,
    /// Euler angles in [0, pi), applied X then Y then Z.
    pub rotation: Vec3,
}

impl Rock {
    /// Half buried: the centre sits half a radius above the ground.
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z);
        Transform::from_position_rotation(self.base + Vec3::Y * (self.size * 0.5), rotation)
            .with_scale(Vec3::splat(self.size))
    }
}

/// A distant mountain, drawn as one flat-shaded triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mountain {
    pub center: Vec3,
    pub height: f32,
    /// Grey level in [0.3, 0.5).
    pub shade: f32,
}

/// Half the base width of a mountain triangle.
pub const MOUNTAIN_HALF_WIDTH: f32 = 300.0;

/// Placed scenery for one flight.
#[derive(Debug, Clone)]
pub struct SceneryLayout {
    pub trees: Vec<Tree>,
    pub rocks: Vec<Rock>,
    pub mountains: Vec<Mountain>,
}

impl SceneryLayout {
    /// Place every scenery item. Trees, rocks and mountains draw from
    /// separate streams so changing one count leaves the others in place.
    pub fn generate(config: &SceneryConfig, ground: &GroundConfig) -> Self {
        let mut tree_rng = StdRng::seed_from_u64(deterministic_noise_seed(config.seed, 10) as u64);
        let mut rock_rng = StdRng::seed_from_u64(deterministic_noise_seed(config.seed, 11) as u64);
        let mut mountain_rng =
            StdRng::seed_from_u64(deterministic_noise_seed(config.seed, 12) as u64);

        let trees = (0..config.tree_count)
            .map(|_| {
                let base = scatter(&mut tree_rng, config.scatter_radius, ground);
                let height = 10.0 + tree_rng.gen::<f32>() * 40.0;
                Tree { base, height }
            })
            .collect();

        let rocks = (0..config.rock_count)
            .map(|_| {
                let base = scatter(&mut rock_rng, config.scatter_radius, ground);
                let size = 5.0 + rock_rng.gen::<f32>() * 15.0;
                let rotation = Vec3::new(
                    rock_rng.gen::<f32>() * PI,
                    rock_rng.gen::<f32>() * PI,
                    rock_rng.gen::<f32>() * PI,
                );
                Rock {
                    base,
                    size,
                    rotation,
                }
            })
            .collect();

        let (inner, outer) = config.mountain_ring;
        let mountains = (0..config.mountain_count)
            .map(|i| {
                let angle = i as f32 / config.mountain_count as f32 * TAU;
                let radius = inner + mountain_rng.gen::<f32>() * (outer - inner);
                let height = 200.0 + mountain_rng.gen::<f32>() * 800.0;
                let shade = 0.3 + mountain_rng.gen::<f32>() * 0.2;
                Mountain {
                    center: Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius),
                    height,
                    shade,
                }
            })
            .collect();

        Self {
            trees,
            rocks,
            mountains,
        }
    }

    /// Spawn trees and rocks as renderable entities. Returns how many
    /// entities were created.
    pub fn spawn_into(&self, world: &mut World) -> usize {
        let trunk = rgb_hex(TRUNK_COLOR);
        let foliage = rgb_hex(FOLIAGE_COLOR);
        let rock = rgb_hex(ROCK_COLOR);

        for tree in &self.trees {
            world.spawn((
                tree.trunk_transform(),
                MeshInstance::new(MeshId::Trunk, trunk),
                Scenery::TreeTrunk,
            ));
            world.spawn((
                tree.foliage_transform(),
                MeshInstance::new(MeshId::Cone, foliage),
                Scenery::TreeFoliage,
            ));
        }
        for r in &self.rocks {
            world.spawn((r.transform(), MeshInstance::new(MeshId::Rock, rock), Scenery::Rock));
        }

        let spawned = self.trees.len() * 2 + self.rocks.len();
        log::info!(
            "Spawned scenery: {} trees, {} rocks ({} entities)",
            self.trees.len(),
            self.rocks.len(),
            spawned
        );
        spawned
    }

    /// Flat-shaded triangle mesh for the mountain ring. The base corners take
    /// the darker bluish grey, the peak a lighter one.
    pub fn mountain_mesh(&self) -> (Vec<TerrainVertex>, Vec<u32>) {
        let mut vertices = Vec::with_capacity(self.mountains.len() * 3);
        let mut indices = Vec::with_capacity(self.mountains.len() * 3);

        for m in &self.mountains {
            let left = m.center - Vec3::X * MOUNTAIN_HALF_WIDTH;
            let peak = m.center + Vec3::Y * m.height;
            let right = m.center + Vec3::X * MOUNTAIN_HALF_WIDTH;
            let normal = (peak - left).cross(right - left).normalize_or(Vec3::Z);

            let s = m.shade;
            let base_color = [s * 0.8, s * 0.8, s];
            let peak_color = [s + 0.1, s + 0.1, s + 0.2];

            let start = vertices.len() as u32;
            for (p, color) in [(left, base_color), (peak, peak_color), (right, base_color)] {
                vertices.push(TerrainVertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    color,
                });
            }
            indices.extend_from_slice(&[start, start + 1, start + 2]);
        }

        (vertices, indices)
    }
}

/// Uniform angle, uniform distance in [0, radius), dropped onto the ground.
fn scatter(rng: &mut StdRng, radius: f32, ground: &GroundConfig) -> Vec3 {
    let distance = rng.gen::<f32>() * radius;
    let angle = rng.gen::<f32>() * TAU;
    let x = angle.cos() * distance;
    let z = angle.sin() * distance;
    Vec3::new(x, ground.height_at(x, z), z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(seed: u64) -> SceneryLayout {
        let config = SceneryConfig {
            seed,
            ..Default::default()
        };
        SceneryLayout::generate(&config, &GroundConfig::default())
    }

    #[test]
    fn counts_match_config() {
        let l = layout(5);
        assert_eq!(l.trees.len(), 1000);
        assert_eq!(l.rocks.len(), 200);
        assert_eq!(l.mountains.len(), 40);
    }

    #[test]
    fn deterministic_per_seed() {
        let a = layout(77);
        let b = layout(77);
        assert_eq!(a.trees, b.trees);
        assert_eq!(a.rocks, b.rocks);
        assert_eq!(a.mountains, b.mountains);
        assert_ne!(layout(78).trees, a.trees);
    }

    #[test]
    fn tree_count_does_not_move_rocks() {
        let ground = GroundConfig::default();
        let few = SceneryConfig {
            seed: 3,
            tree_count: 10,
            ..Default::default()
        };
        let many = SceneryConfig {
            tree_count: 500,
            ..few.clone()
        };
        let a = SceneryLayout::generate(&few, &ground);
        let b = SceneryLayout::generate(&many, &ground);
        assert_eq!(a.rocks, b.rocks);
    }

    #[test]
    fn placement_within_bounds() {
        let ground = GroundConfig::default();
        let l = layout(9);
        for t in &l.trees {
            let r = Vec3::new(t.base.x, 0.0, t.base.z).length();
            assert!(r < 1500.0 + 1e-2);
            assert!(t.height >= 10.0 && t.height < 50.0);
            assert_eq!(t.base.y, ground.height_at(t.base.x, t.base.z));
        }
        for rock in &l.rocks {
            let r = Vec3::new(rock.base.x, 0.0, rock.base.z).length();
            assert!(r < 1500.0 + 1e-2);
            assert!(rock.size >= 5.0 && rock.size < 20.0);
            assert!(rock.rotation.max_element() < PI);
        }
        for m in &l.mountains {
            let r = m.center.length();
            assert!(r >= 3000.0 - 1e-2 && r < 4000.0 + 1e-2);
            assert!(m.height >= 200.0 && m.height < 1000.0);
            assert!(m.shade >= 0.3 && m.shade < 0.5);
        }
    }

    #[test]
    fn tree_parts_stack_on_the_base() {
        let tree = Tree {
            base: Vec3::new(10.0, 4.0, -3.0),
            height: 20.0,
        };
        let trunk = tree.trunk_transform();
        assert_eq!(trunk.position, Vec3::new(10.0, 8.0, -3.0));
        assert_eq!(trunk.scale.y, 8.0);
        let foliage = tree.foliage_transform();
        assert_eq!(foliage.position.y, 16.0);
        assert_eq!(foliage.scale, Vec3::new(4.0, 16.0, 4.0));
    }

    #[test]
    fn spawn_creates_entities() {
        let config = SceneryConfig {
            tree_count: 4,
            rock_count: 3,
            ..Default::default()
        };
        let l = SceneryLayout::generate(&config, &GroundConfig::default());
        let mut world = World::new();
        assert_eq!(l.spawn_into(&mut world), 11);
        let rocks = world
            .query::<&Scenery>()
            .iter()
            .filter(|(_, s)| **s == Scenery::Rock)
            .count();
        assert_eq!(rocks, 3);
    }

    #[test]
    fn mountain_mesh_is_one_triangle_each() {
        let l = layout(2);
        let (vertices, indices) = l.mountain_mesh();
        assert_eq!(vertices.len(), 120);
        assert_eq!(indices.len(), 120);
        let m = l.mountains[0];
        assert_eq!(vertices[1].position[1], m.height);
        assert_eq!(vertices[0].position[1], 0.0);
    }
}
