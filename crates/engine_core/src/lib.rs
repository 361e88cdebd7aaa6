//! Core types shared by every flight simulator crate.
//!
//! This crate provides the foundational types used across all systems:
//! - Transforms and Euler attitudes
//! - Frame timing
//! - ECS components and the control axes fed to the flight model

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
