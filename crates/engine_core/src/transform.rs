//! Transform component and Euler attitude helpers.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder-style uniform or per-axis scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Nose direction. Aircraft models are built facing +Z.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Aircraft orientation as Euler angles in radians.
///
/// `pitch` turns about X, `yaw` about Y and `roll` about Z. The composed
/// rotation is `Rz(roll) * Ry(yaw) * Rx(pitch)`, so pitch is applied to a
/// vector first and roll last.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Attitude {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation quaternion for this attitude.
    pub fn to_quat(&self) -> Quat {
        Quat::from_rotation_z(self.roll)
            * Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_x(self.pitch)
    }

    /// Unit vector the nose points along: +Z rotated by the attitude.
    pub fn forward(&self) -> Vec3 {
        self.to_quat() * Vec3::Z
    }

    /// Angles in degrees, `(pitch, roll, yaw)`.
    pub fn degrees(&self) -> (f32, f32, f32) {
        (
            self.pitch.to_degrees(),
            self.roll.to_degrees(),
            self.yaw.to_degrees(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn level_attitude_points_along_z() {
        assert!(close(Attitude::default().forward(), Vec3::Z));
    }

    #[test]
    fn positive_pitch_lowers_the_nose() {
        let forward = Attitude::new(0.3, 0.0, 0.0).forward();
        assert!(forward.y < 0.0);
        assert!((forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn yaw_quarter_turn_faces_x() {
        assert!(close(Attitude::new(0.0, FRAC_PI_2, 0.0).forward(), Vec3::X));
    }

    #[test]
    fn roll_alone_keeps_heading() {
        assert!(close(Attitude::new(0.0, 0.0, 0.7).forward(), Vec3::Z));
    }

    #[test]
    fn pitch_applies_before_yaw() {
        // Nose down 90 degrees then yaw: still pointing straight down.
        let forward = Attitude::new(FRAC_PI_2, 1.0, 0.0).forward();
        assert!(close(forward, -Vec3::Y));
    }

    #[test]
    fn transform_forward_follows_rotation() {
        let t = Transform::from_position_rotation(Vec3::ONE, Quat::from_rotation_y(FRAC_PI_2));
        assert!(close(t.forward(), Vec3::X));
    }
}
