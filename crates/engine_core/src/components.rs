//! Common ECS components used across the simulator.

use glam::Vec3;

/// Signed control axes derived from the keyboard each frame.
///
/// Opposing keys cancel and combined keys add, so yaw can reach +/-1.5 when
/// a coordinated roll and a rudder key agree. The flight model scales each
/// axis by its own rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInputs {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
    pub throttle: f32,
}

/// Shared mesh the renderer draws for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    /// Unit cube centred at the origin.
    Cube,
    /// Tree trunk: cylinder tapering from radius 2 to 1, unit height.
    Trunk,
    /// Unit cone (radius 1, height 1) centred at the origin.
    Cone,
    /// Unit sphere.
    Sphere,
    /// Low-poly rock (unit icosahedron).
    Rock,
    /// Aircraft fuselage cylinder, long axis along Z.
    Fuselage,
}

/// Renderable instance of a shared mesh.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance {
    pub mesh: MeshId,
    /// Linear RGB albedo.
    pub color: Vec3,
}

impl MeshInstance {
    pub fn new(mesh: MeshId, color: Vec3) -> Self {
        Self { mesh, color }
    }
}

/// Tag component for static scenery (trees, rocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenery {
    TreeTrunk,
    TreeFoliage,
    Rock,
}

/// Convert a `0xRRGGBB` colour into a normalised RGB vector.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colour_channels() {
        let c = rgb_hex(0x87CEEB);
        assert!((c.x - 135.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 206.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 235.0 / 255.0).abs() < 1e-6);
    }
}
