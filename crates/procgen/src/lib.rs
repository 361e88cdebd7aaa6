//! Procedural generation for the ground, scenery placement and mountains.

pub mod scenery;
pub mod terrain;

pub use scenery::*;
pub use terrain::*;
