//! Visual aircraft assembled from primitive meshes in aircraft-local space
//! (+Z nose, +Y up).

use engine_core::{rgb_hex, MeshId, Transform};
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPart {
    pub mesh: MeshId,
    pub local: Transform,
    pub color: Vec3,
    /// Below 1.0 the part is drawn in the transparent pass.
    pub alpha: f32,
}

impl ModelPart {
    fn new(mesh: MeshId, local: Transform, color: u32) -> Self {
        Self {
            mesh,
            local,
            color: rgb_hex(color),
            alpha: 1.0,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }

    /// World matrix for this part given the aircraft's world transform.
    pub fn world_matrix(&self, aircraft: Mat4) -> Mat4 {
        aircraft * self.local.to_matrix()
    }
}

/// Fuselage, glass canopy, wings, tailplane, fin and a red nose cone.
pub fn aircraft_parts() -> Vec<ModelPart> {
    let canopy = ModelPart {
        alpha: 0.7,
        ..ModelPart::new(
            MeshId::Sphere,
            Transform::from_position(Vec3::new(0.0, 0.0, 8.0)).with_scale(Vec3::splat(2.5)),
            0x333333,
        )
    };

    vec![
        ModelPart::new(MeshId::Fuselage, Transform::default(), 0xC0C0C0),
        canopy,
        ModelPart::new(
            MeshId::Cube,
            Transform::default().with_scale(Vec3::new(30.0, 1.0, 5.0)),
            0x909090,
        ),
        ModelPart::new(
            MeshId::Cube,
            Transform::from_position(Vec3::new(0.0, 2.0, -8.0)).with_scale(Vec3::new(10.0, 1.0, 3.0)),
            0x909090,
        ),
        ModelPart::new(
            MeshId::Cube,
            Transform::from_position(Vec3::new(0.0, 4.0, -8.0)).with_scale(Vec3::new(1.0, 6.0, 4.0)),
            0x909090,
        ),
        // Cone apex is +Y; tip it forward.
        ModelPart::new(
            MeshId::Cone,
            Transform::from_position_rotation(
                Vec3::new(0.0, 0.0, 10.0),
                Quat::from_rotation_x(FRAC_PI_2),
            )
            .with_scale(Vec3::new(2.0, 4.0, 2.0)),
            0xFF0000,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_canopy_is_see_through() {
        let parts = aircraft_parts();
        assert_eq!(parts.len(), 6);
        let transparent: Vec<_> = parts.iter().filter(|p| p.is_transparent()).collect();
        assert_eq!(transparent.len(), 1);
        assert_eq!(transparent[0].mesh, MeshId::Sphere);
    }

    #[test]
    fn nose_cone_points_forward() {
        let nose = aircraft_parts()
            .into_iter()
            .find(|p| p.mesh == MeshId::Cone)
            .unwrap();
        let apex = nose.world_matrix(Mat4::IDENTITY).transform_vector3(Vec3::Y);
        assert!(apex.normalize().distance(Vec3::Z) < 1e-5);
    }

    #[test]
    fn parts_follow_the_aircraft() {
        let aircraft = Transform::from_position(Vec3::new(0.0, 100.0, 0.0)).to_matrix();
        let wings = aircraft_parts()[2];
        let centre = wings.world_matrix(aircraft).transform_point3(Vec3::ZERO);
        assert!(centre.distance(Vec3::new(0.0, 100.0, 0.0)) < 1e-5);
    }
}
