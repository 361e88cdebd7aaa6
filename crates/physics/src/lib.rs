//! Arcade flight dynamics and the ground impact policy.
//!
//! The model is kinematic: attitude comes straight from control rates, speed
//! from the throttle, and velocity is the nose vector times speed with a
//! gravity bias. There are no forces or rigid bodies.

pub mod aircraft;
pub mod ground;

pub use aircraft::*;
pub use ground::*;

/// Gravitational acceleration in m/s^2.
pub const GRAVITY: f32 = 9.8;
