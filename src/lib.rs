//! Deterministic improved Perlin noise over permutation tables.

pub mod error;
pub mod field;
pub mod fractal;
pub mod perlin;
pub mod space;
pub mod texture;
pub mod uniform;

pub use error::{Axis, NoiseError, Result};
pub use field::{field2d, field3d, Field2, Field3};
pub use fractal::Octaves;
pub use perlin::{evaluate, noise3d, NoiseField, PERMUTATION};
pub use space::{arange, linspace};
