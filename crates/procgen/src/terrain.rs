//! Ground height field and the ground mesh built from it.
//!
//! The ground is a large square plane. Inside a flat radius around the
//! origin it sits at height zero; beyond it rolls as a sine/cosine swell.
//! Colour is a grass green broken up by seeded noise, so the same seed always
//! produces the same mesh.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::prelude::*;

/// Derive a deterministic u32 noise seed from a world seed and an offset.
#[inline]
pub(crate) fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Vertex for procedurally generated meshes (ground, mountains).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Configuration for the ground plane.
#[derive(Debug, Clone)]
pub struct GroundConfig {
    /// Edge length of the square plane in world units.
    pub size: f32,
    /// Quads per side.
    pub segments: u32,
    /// Radius around the origin that stays perfectly flat.
    pub flat_radius: f32,
    /// Horizontal scale of the swell (world units per radian).
    pub wavelength: f32,
    /// Peak height of the swell.
    pub amplitude: f32,
    /// Seed for colour variation.
    pub seed: u64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 10_000.0,
            segments: 128,
            flat_radius: 500.0,
            wavelength: 200.0,
            amplitude: 50.0,
            seed: 0,
        }
    }
}

impl GroundConfig {
    /// Ground height at world position (x, z).
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if (x * x + z * z).sqrt() <= self.flat_radius {
            0.0
        } else {
            (x / self.wavelength).sin() * (z / self.wavelength).cos() * self.amplitude
        }
    }
}

/// Generated ground mesh.
#[derive(Debug)]
pub struct GroundMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    pub config: GroundConfig,
}

impl GroundMesh {
    /// Build the ground grid: `(segments + 1)^2` vertices centred on the origin.
    pub fn generate(config: GroundConfig) -> Self {
        let res = config.segments as usize + 1;
        let step = config.size / config.segments as f32;
        let half = config.size / 2.0;

        let patches = Perlin::new(deterministic_noise_seed(config.seed, 0));
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut vertices = Vec::with_capacity(res * res);
        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - half;
                let world_z = z as f32 * step - half;
                let world_y = config.height_at(world_x, world_z);
                vertices.push(TerrainVertex {
                    position: [world_x, world_y, world_z],
                    normal: [0.0, 1.0, 0.0],
                    color: grass_color(&patches, &mut rng, world_x, world_z),
                });
            }
        }

        Self::calculate_normals(&mut vertices, res);

        let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
        for z in 0..(res - 1) {
            for x in 0..(res - 1) {
                let top_left = (z * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.push(top_left);
                indices.push(bottom_left);
                indices.push(top_right);

                indices.push(top_right);
                indices.push(bottom_left);
                indices.push(bottom_right);
            }
        }

        log::debug!(
            "Ground mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );

        Self {
            vertices,
            indices,
            config,
        }
    }

    fn calculate_normals(vertices: &mut [TerrainVertex], resolution: usize) {
        // Calculate face normals and accumulate
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; vertices.len()];

        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let i0 = z * resolution + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * resolution + x;
                let i3 = i2 + 1;

                let v0: Vec3 = vertices[i0].position.into();
                let v1: Vec3 = vertices[i1].position.into();
                let v2: Vec3 = vertices[i2].position.into();
                let v3: Vec3 = vertices[i3].position.into();

                let n1 = (v2 - v0).cross(v1 - v0).normalize();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                let n2 = (v3 - v1).cross(v2 - v1).normalize();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (i, vertex) in vertices.iter_mut().enumerate() {
            let n = normals[i].normalize_or(Vec3::Y);
            vertex.normal = [n.x, n.y, n.z];
        }
    }
}

/// Grass green: 30-50 red, 100-140 green, 30-50 blue (of 255), with one
/// vertex in twenty lifted into a lighter speckle.
fn grass_color(patches: &Perlin, rng: &mut StdRng, x: f32, z: f32) -> [f32; 3] {
    let patch = ((patches.get([x as f64 * 0.004, z as f64 * 0.004]) + 1.0) * 0.5) as f32;
    let t = (patch * 0.7 + rng.gen::<f32>() * 0.3).clamp(0.0, 1.0);
    let mut r = 30.0 + t * 20.0;
    let mut g = 100.0 + t * 40.0;
    let mut b = 30.0 + t * 20.0;
    if rng.gen::<f32>() > 0.95 {
        r += 40.0;
        g += 40.0;
        b += 10.0;
    }
    [r / 255.0, g / 255.0, b / 255.0]
}
