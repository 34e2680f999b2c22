// White noise, independent samples in [-1, 1)

use rand::Rng;

use crate::field::Field2;

pub fn point<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..1.0)
}

/// A `width × height` grid of independent samples.
pub fn uniform_field<R: Rng>(width: usize, height: usize, rng: &mut R) -> Field2 {
    let data = (0..width * height).map(|_| point(rng)).collect();
    Field2::from_parts([width, height], data)
}
