//! Rendering of the wave field
//!
//! Uploads the simulated field into a float texture and composites it over
//! a procedural backdrop with a 2D material.

pub mod backdrop;
pub mod field_texture;
pub mod material;

pub use backdrop::*;
pub use field_texture::*;
pub use material::*;
