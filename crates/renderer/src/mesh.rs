//! Mesh data structures and primitive generation.
//!
//! Primitives are built on the CPU as [`MeshData`] (testable without a GPU)
//! and uploaded into [`Mesh`] buffers. Every primitive is centred on the
//! origin and wound counter-clockwise seen from outside.

use crate::vertex::Vertex;
use engine_core::MeshId;
use glam::{Quat, Vec3};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32], label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }
}

/// Mesh data before GPU upload (for procedural generation).
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload(&self, device: &wgpu::Device, label: &str) -> Mesh {
        Mesh::new(device, &self.vertices, &self.indices, label)
    }

    /// Rotate positions and normals in place.
    pub fn rotated(mut self, rotation: Quat) -> Self {
        for v in &mut self.vertices {
            v.position = (rotation * Vec3::from(v.position)).to_array();
            v.normal = (rotation * Vec3::from(v.normal)).to_array();
        }
        self
    }

    /// Unit cube centered at origin.
    pub fn cube() -> Self {
        // (normal, u axis, v axis) per face; corners walk CCW around the normal
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
        ];

        let mut data = Self::new();
        for (normal, u, v) in faces {
            let base = data.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + u * su + v * sv) * 0.5;
                data.vertices.push(Vertex::new(p.to_array(), normal.to_array()));
            }
            data.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        data
    }

    /// Cylinder along Y centred at the origin. A zero top radius makes a cone.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height * 0.5;
        let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
        let mut data = Self::new();

        // Side: two vertices per seam step, the last seam duplicates the first.
        for i in 0..=segments {
            let theta = TAU * i as f32 / segments as f32;
            let (s, c) = theta.sin_cos();
            let normal = Vec3::new(c, slope, s).normalize();
            data.vertices.push(Vertex::new(
                [radius_bottom * c, -half, radius_bottom * s],
                normal.to_array(),
            ));
            data.vertices
                .push(Vertex::new([radius_top * c, half, radius_top * s], normal.to_array()));
        }
        for i in 0..segments {
            let b0 = i * 2;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            data.indices.extend_from_slice(&[b0, t0, b1]);
            if radius_top > 0.0 {
                data.indices.extend_from_slice(&[b1, t0, t1]);
            }
        }

        if radius_top > 0.0 {
            data.add_cap(radius_top, half, segments, true);
        }
        if radius_bottom > 0.0 {
            data.add_cap(radius_bottom, -half, segments, false);
        }
        data
    }

    fn add_cap(&mut self, radius: f32, y: f32, segments: u32, top: bool) {
        let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
        let center = self.vertices.len() as u32;
        self.vertices.push(Vertex::new([0.0, y, 0.0], normal));
        for i in 0..=segments {
            let theta = TAU * i as f32 / segments as f32;
            let (s, c) = theta.sin_cos();
            self.vertices.push(Vertex::new([radius * c, y, radius * s], normal));
        }
        for i in 0..segments {
            let p0 = center + 1 + i;
            let p1 = p0 + 1;
            if top {
                self.indices.extend_from_slice(&[center, p1, p0]);
            } else {
                self.indices.extend_from_slice(&[center, p0, p1]);
            }
        }
    }

    /// Cone along +Y centred at the origin (apex at +height/2).
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        Self::cylinder(0.0, radius, height, segments)
    }

    /// UV sphere.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut data = Self::new();

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();

            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let position = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                let normal = position.normalize_or(Vec3::Y);
                data.vertices
                    .push(Vertex::new(position.to_array(), normal.to_array()));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;

                if ring != 0 {
                    data.indices.extend_from_slice(&[current, current + 1, next]);
                }
                if ring != rings - 1 {
                    data.indices.extend_from_slice(&[current + 1, next + 1, next]);
                }
            }
        }
        data
    }

    /// Flat-shaded icosahedron of the given circumradius (low-poly rock).
    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .map(|c| c.normalize() * radius);

        #[rustfmt::skip]
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        let mut data = Self::new();
        for [a, b, c] in faces {
            let (mut pa, mut pb, pc) = (corners[a], corners[b], corners[c]);
            let mut normal = (pb - pa).cross(pc - pa).normalize();
            if normal.dot(pa + pb + pc) < 0.0 {
                std::mem::swap(&mut pa, &mut pb);
                normal = -normal;
            }
            let base = data.vertices.len() as u32;
            for p in [pa, pb, pc] {
                data.vertices.push(Vertex::new(p.to_array(), normal.to_array()));
            }
            data.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
        data
    }

    /// Geometry for a shared [`MeshId`].
    pub fn for_id(id: MeshId) -> Self {
        match id {
            MeshId::Cube => Self::cube(),
            MeshId::Trunk => Self::cylinder(1.0, 2.0, 1.0, 6),
            MeshId::Cone => Self::cone(1.0, 1.0, 8),
            MeshId::Sphere => Self::sphere(1.0, 12, 8),
            MeshId::Rock => Self::icosahedron(1.0),
            // nose radius 2, tail radius 3, long axis along Z
            MeshId::Fuselage => {
                Self::cylinder(2.0, 3.0, 20.0, 8).rotated(Quat::from_rotation_x(FRAC_PI_2))
            }
        }
    }
}

/// Uploaded meshes for every [`MeshId`].
pub struct MeshLibrary {
    meshes: HashMap<MeshId, Mesh>,
}

impl MeshLibrary {
    pub const ALL: [MeshId; 6] = [
        MeshId::Cube,
        MeshId::Trunk,
        MeshId::Cone,
        MeshId::Sphere,
        MeshId::Rock,
        MeshId::Fuselage,
    ];

    pub fn new(device: &wgpu::Device) -> Self {
        let meshes = Self::ALL
            .iter()
            .map(|id| (*id, MeshData::for_id(*id).upload(device, &format!("{id:?}"))))
            .collect();
        Self { meshes }
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }
}
