// Dense grids of noise samples, stored row major: `[i, j, k]` holds the
// sample at `(xs[i], ys[j], zs[k])`.

use std::ops::Index;

use log::debug;
use rayon::prelude::*;

use crate::error::{Axis, Result};
use crate::perlin::{check_coordinate, NoiseField};

/// Samples over `xs × ys × zs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field3 {
    shape: [usize; 3],
    data: Vec<f64>,
}

/// Samples over `xs × ys`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2 {
    shape: [usize; 2],
    data: Vec<f64>,
}

impl Field3 {
    pub fn empty() -> Self {
        Self {
            shape: [0; 3],
            data: Vec::new(),
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let [nx, ny, nz] = self.shape;
        if i < nx && j < ny && k < nz {
            Some(self.data[(i * ny + j) * nz + k])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Drops a trailing axis of length one.
    fn into_plane(self) -> Field2 {
        let [nx, ny, nz] = self.shape;
        debug_assert!(nz <= 1);
        if nz == 0 {
            return Field2::empty();
        }
        Field2 {
            shape: [nx, ny],
            data: self.data,
        }
    }
}

impl Index<[usize; 3]> for Field3 {
    type Output = f64;

    fn index(&self, [i, j, k]: [usize; 3]) -> &f64 {
        let [nx, ny, nz] = self.shape;
        assert!(i < nx && j < ny && k < nz, "index [{i}, {j}, {k}] out of bounds for shape {:?}", self.shape);
        &self.data[(i * ny + j) * nz + k]
    }
}

impl Field2 {
    pub fn empty() -> Self {
        Self {
            shape: [0; 2],
            data: Vec::new(),
        }
    }

    pub(crate) fn from_parts(shape: [usize; 2], data: Vec<f64>) -> Self {
        debug_assert_eq!(shape[0] * shape[1], data.len());
        Self { shape, data }
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let [nx, ny] = self.shape;
        if i < nx && j < ny {
            Some(self.data[i * ny + j])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Iterates the samples along y for each x.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, and a zero-width grid has no rows worth yielding
        let width = self.shape[1].max(1);
        self.data.chunks(width)
    }

    /// Smallest and largest sample, `None` when empty.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl Index<[usize; 2]> for Field2 {
    type Output = f64;

    fn index(&self, [i, j]: [usize; 2]) -> &f64 {
        let [nx, ny] = self.shape;
        assert!(i < nx && j < ny, "index [{i}, {j}] out of bounds for shape {:?}", self.shape);
        &self.data[i * ny + j]
    }
}

fn check_axis(axis: Axis, values: &[f64]) -> Result<()> {
    for (index, &value) in values.iter().enumerate() {
        check_coordinate(axis, index, value)?;
    }
    Ok(())
}

pub(crate) fn check_axes(xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<()> {
    check_axis(Axis::X, xs)?;
    check_axis(Axis::Y, ys)?;
    check_axis(Axis::Z, zs)
}

impl NoiseField {
    /// Noise at every point of `xs × ys × zs`.
    pub fn field3d(&self, xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<Field3> {
        check_axes(xs, ys, zs)?;

        let mut data = Vec::with_capacity(xs.len() * ys.len() * zs.len());
        for &x in xs {
            for &y in ys {
                for &z in zs {
                    data.push(self.sample(x, y, z));
                }
            }
        }

        debug!("built {}x{}x{} noise field", xs.len(), ys.len(), zs.len());
        Ok(Field3 {
            shape: [xs.len(), ys.len(), zs.len()],
            data,
        })
    }

    /// Same result as [`field3d`](Self::field3d), with x planes computed in parallel.
    pub fn par_field3d(&self, xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<Field3> {
        check_axes(xs, ys, zs)?;

        let shape = [xs.len(), ys.len(), zs.len()];
        let plane = ys.len() * zs.len();
        let mut data = vec![0.0; xs.len() * plane];

        if !data.is_empty() {
            data.par_chunks_mut(plane)
                .zip(xs.par_iter())
                .for_each(|(out, &x)| {
                    for (j, &y) in ys.iter().enumerate() {
                        for (k, &z) in zs.iter().enumerate() {
                            out[j * zs.len() + k] = self.sample(x, y, z);
                        }
                    }
                });
        }

        debug!("built {}x{}x{} noise field on {} threads", shape[0], shape[1], shape[2], rayon::current_num_threads());
        Ok(Field3 { shape, data })
    }

    /// Noise over `xs × ys` at a single depth `z`.
    pub fn field2d(&self, xs: &[f64], ys: &[f64], z: f64) -> Result<Field2> {
        Ok(self.field3d(xs, ys, &[z])?.into_plane())
    }
}

/// Noise over `xs × ys × zs` using the table `perm`.
///
/// An empty `perm` yields an empty field whatever the coordinates are. Any
/// other table must satisfy [`NoiseField::from_permutation`].
pub fn field3d(xs: &[f64], ys: &[f64], zs: &[f64], perm: &[u8]) -> Result<Field3> {
    if perm.is_empty() {
        return Ok(Field3::empty());
    }
    NoiseField::from_permutation(perm)?.field3d(xs, ys, zs)
}

/// `field3d(xs, ys, [z], perm)` without the trailing axis.
pub fn field2d(xs: &[f64], ys: &[f64], z: f64, perm: &[u8]) -> Result<Field2> {
    Ok(field3d(xs, ys, &[z], perm)?.into_plane())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoiseError;
    use crate::perlin::PERMUTATION;

    #[test]
    fn field_is_indexed_in_input_order() {
        let noise = NoiseField::canonical();
        let xs = [0.5, 3.14, -2.25];
        let ys = [0.5, 42.0];
        let zs = [0.5, 7.0, 1.1, 9.9];
        let field = noise.field3d(&xs, &ys, &zs).unwrap();

        assert_eq!(field.shape(), [3, 2, 4]);
        assert_eq!(field.len(), 24);
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                for (k, &z) in zs.iter().enumerate() {
                    assert_eq!(field[[i, j, k]], noise.sample(x, y, z));
                }
            }
        }
        assert_eq!(field[[1, 1, 1]], 0.13691995878400012);
        assert_eq!(field.get(3, 0, 0), None);
    }

    #[test]
    fn empty_permutation_yields_empty_field() {
        let field = field3d(&[1.0, 2.0], &[3.0], &[f64::NAN], &[]).unwrap();
        assert!(field.is_empty());
        assert_eq!(field.shape(), [0, 0, 0]);
        assert!(field2d(&[1.0], &[2.0], 0.0, &[]).unwrap().is_empty());
    }

    #[test]
    fn empty_axis_yields_zero_sized_shape() {
        let noise = NoiseField::canonical();
        let field = noise.field3d(&[], &[1.0, 2.0], &[0.0]).unwrap();
        assert_eq!(field.shape(), [0, 2, 1]);
        assert!(field.is_empty());
        assert_eq!(noise.par_field3d(&[1.0], &[], &[0.0]).unwrap().shape(), [1, 0, 1]);
    }

    #[test]
    fn bad_coordinate_reports_axis_and_index() {
        let noise = NoiseField::canonical();
        let err = noise.field3d(&[0.0, 1.0], &[0.0, 1.0, f64::NAN], &[0.0]).unwrap_err();
        match err {
            NoiseError::InvalidCoordinate { axis, index, value } => {
                assert_eq!(axis, Axis::Y);
                assert_eq!(index, 2);
                assert!(value.is_nan());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_table_is_an_error() {
        assert!(matches!(
            field3d(&[0.0], &[0.0], &[0.0], &[0, 1, 2]),
            Err(NoiseError::TableTooShort(3))
        ));
    }

    #[test]
    fn field2d_drops_trailing_axis() {
        let xs: Vec<f64> = (0..7).map(|i| i as f64 * 0.37).collect();
        let ys: Vec<f64> = (0..5).map(|i| i as f64 * -0.61).collect();
        let flat = field2d(&xs, &ys, 1.25, &PERMUTATION).unwrap();
        let deep = field3d(&xs, &ys, &[1.25], &PERMUTATION).unwrap();

        assert_eq!(flat.shape(), [7, 5]);
        for i in 0..7 {
            for j in 0..5 {
                assert_eq!(flat[[i, j]], deep[[i, j, 0]]);
            }
        }
        assert_eq!(flat.rows().count(), 7);
    }

    #[test]
    fn parallel_matches_sequential() {
        let noise = NoiseField::seeded(7);
        let xs: Vec<f64> = (0..33).map(|i| i as f64 * 0.21 - 3.0).collect();
        let ys: Vec<f64> = (0..17).map(|i| i as f64 * 0.43).collect();
        let zs = [0.0, 0.5, 12.75];
        assert_eq!(
            noise.field3d(&xs, &ys, &zs).unwrap(),
            noise.par_field3d(&xs, &ys, &zs).unwrap()
        );
    }

    #[test]
    fn min_max_spans_samples() {
        let field = Field2::from_parts([1, 3], vec![0.25, -0.5, 0.75]);
        assert_eq!(field.min_max(), Some((-0.5, 0.75)));
        assert_eq!(Field2::empty().min_max(), None);
    }
}
