//! Perspective camera and the per-frame scene uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Look-at camera: a position and the point it looks at.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 20.0, -50.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 75.0,
            near: 0.1,
            far: 10_000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::Z)
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        // Looking straight along `up` would make look_at degenerate.
        let up = if self.forward().cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Lighting and atmosphere for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLighting {
    /// Direction towards the sun (normalised by the uniform).
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    pub ambient: Vec3,
    /// Hemisphere light: sky colour from above, ground colour from below.
    pub hemisphere_sky: Vec3,
    pub hemisphere_ground: Vec3,
    pub hemisphere_intensity: f32,
    pub fog_color: Vec3,
    pub fog_near: f32,
    pub fog_far: f32,
    /// Optional point light: position, colour, intensity, range.
    pub point_light: Option<PointLight>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// Scene uniform data for GPU (must match `Scene` in scene.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz camera position, w unused.
    pub camera_position: [f32; 4],
    /// xyz towards the sun, w intensity.
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub ambient: [f32; 4],
    /// rgb sky tint, w hemisphere intensity.
    pub hemisphere_sky: [f32; 4],
    pub hemisphere_ground: [f32; 4],
    pub fog_color: [f32; 4],
    /// x near, y far.
    pub fog_params: [f32; 4],
    /// xyz position, w range.
    pub point_light_position: [f32; 4],
    /// rgb colour, w intensity (0 = off).
    pub point_light_color: [f32; 4],
}

impl SceneUniform {
    pub fn new(camera: &Camera, lighting: &SceneLighting) -> Self {
        let pos = camera.position;
        let sun = lighting.sun_direction.normalize_or(Vec3::Y);
        let (point_position, point_color) = match lighting.point_light {
            Some(p) => (p.position.extend(p.range), p.color.extend(p.intensity)),
            None => (Vec3::ZERO.extend(1.0), Vec3::ZERO.extend(0.0)),
        };
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: [pos.x, pos.y, pos.z, 1.0],
            sun_direction: sun.extend(lighting.sun_intensity).to_array(),
            sun_color: lighting.sun_color.extend(1.0).to_array(),
            ambient: lighting.ambient.extend(1.0).to_array(),
            hemisphere_sky: lighting
                .hemisphere_sky
                .extend(lighting.hemisphere_intensity)
                .to_array(),
            hemisphere_ground: lighting.hemisphere_ground.extend(1.0).to_array(),
            fog_color: lighting.fog_color.extend(1.0).to_array(),
            fog_params: [lighting.fog_near, lighting.fog_far, 0.0, 0.0],
            point_light_position: point_position.to_array(),
            point_light_color: point_color.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SceneUniform>(), 64 + 10 * 16);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = Camera {
            position: Vec3::new(10.0, 30.0, -40.0),
            target: Vec3::new(0.0, 5.0, 20.0),
            ..Default::default()
        };
        let clip = camera.view_projection_matrix() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn straight_down_view_is_finite() {
        let camera = Camera {
            position: Vec3::new(0.0, 100.0, 0.0),
            target: Vec3::ZERO,
            ..Default::default()
        };
        assert!(camera.view_matrix().is_finite());
    }
}
