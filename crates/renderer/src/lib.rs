//! wgpu renderer: lit instanced meshes plus a bitmap-font HUD overlay.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod overlay;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use camera::{Camera, PointLight, SceneLighting, SceneUniform};
pub use error::RenderError;
pub use mesh::{Mesh, MeshData, MeshLibrary};
pub use overlay::{Align, OverlayTextBuilder};
pub use renderer::{DrawBatch, Renderer};
pub use vertex::{InstanceData, OverlayVertex, Vertex};
