// Octave noise: each layer samples at `lacunarity` times the frequency and
// `persistence` times the amplitude of the previous one, normalised by the total

use glam::DVec3;

use crate::error::{Axis, NoiseError, Result};
use crate::field::{check_axes, Field2};
use crate::perlin::{check_coordinate, NoiseField};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Octaves {
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
}

impl Default for Octaves {
    fn default() -> Self {
        Self {
            octaves: 2,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl Octaves {
    pub fn new(octaves: u32, persistence: f64, lacunarity: f64) -> Result<Self> {
        let settings = Self {
            octaves,
            persistence,
            lacunarity,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(NoiseError::InvalidOctaves);
        }
        for (name, value) in [("persistence", self.persistence), ("lacunarity", self.lacunarity)] {
            if !value.is_finite() {
                return Err(NoiseError::InvalidOctaveParameter { name, value });
            }
        }
        // amplitudes grow without bound when persistence is huge
        if !self.total_amplitude().is_finite() {
            return Err(NoiseError::InvalidOctaveParameter {
                name: "persistence",
                value: self.persistence,
            });
        }
        Ok(())
    }

    /// Sum of all octave amplitudes.
    pub fn total_amplitude(&self) -> f64 {
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }

    pub fn sample(&self, field: &NoiseField, x: f64, y: f64, z: f64) -> f64 {
        self.sample_point(field, DVec3::new(x, y, z))
    }

    pub fn sample_point(&self, field: &NoiseField, point: DVec3) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..self.octaves {
            value += amplitude * field.sample_point(point * frequency);
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        let total = self.total_amplitude();
        if total == 0.0 {
            0.0
        } else {
            value / total
        }
    }

    /// Octave noise over `xs × ys` at depth `z`.
    ///
    /// Every scaled coordinate is checked, so a finite input that overflows at
    /// a high frequency is an [`NoiseError::InvalidCoordinate`] rather than NaN.
    pub fn field2d(&self, field: &NoiseField, xs: &[f64], ys: &[f64], z: f64) -> Result<Field2> {
        self.validate()?;
        check_axes(xs, ys, &[z])?;

        let mut data = vec![0.0; xs.len() * ys.len()];
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..self.octaves {
            let sx = scaled(Axis::X, xs, frequency)?;
            let sy = scaled(Axis::Y, ys, frequency)?;
            let sz = check_coordinate(Axis::Z, 0, z * frequency)?;

            for (i, &x) in sx.iter().enumerate() {
                for (j, &y) in sy.iter().enumerate() {
                    data[i * ys.len() + j] += amplitude * field.sample(x, y, sz);
                }
            }

            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        let total = self.total_amplitude();
        for value in &mut data {
            *value = if total == 0.0 { 0.0 } else { *value / total };
        }

        Ok(Field2::from_parts([xs.len(), ys.len()], data))
    }
}

fn scaled(axis: Axis, values: &[f64], frequency: f64) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &v)| check_coordinate(axis, index, v * frequency))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_octave_is_plain_noise() {
        let field = NoiseField::canonical();
        let octaves = Octaves::new(1, 0.5, 2.0).unwrap();
        assert_eq!(octaves.sample(&field, 3.14, 42.0, 7.0), field.sample(3.14, 42.0, 7.0));
    }

    #[test]
    fn octaves_are_normalised_by_total_amplitude() {
        let field = NoiseField::canonical();
        let octaves = Octaves::default();
        assert_eq!(octaves.total_amplitude(), 1.5);

        let (x, y, z) = (0.3, 1.7, 2.9);
        let expected = (field.sample(x, y, z) + 0.5 * field.sample(2.0 * x, 2.0 * y, 2.0 * z)) / 1.5;
        assert!((octaves.sample(&field, x, y, z) - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_octaves_rejected() {
        assert!(matches!(Octaves::new(0, 0.5, 2.0), Err(NoiseError::InvalidOctaves)));
        let bad = Octaves {
            octaves: 0,
            ..Octaves::default()
        };
        assert!(bad.field2d(&NoiseField::canonical(), &[0.0], &[0.0], 0.0).is_err());
    }

    #[test]
    fn field_matches_point_samples() {
        let field = NoiseField::seeded(3);
        let octaves = Octaves::new(4, 0.6, 2.5).unwrap();
        let xs = [0.1, 0.9, 4.4];
        let ys = [-1.3, 2.2];
        let grid = octaves.field2d(&field, &xs, &ys, 0.75).unwrap();

        assert_eq!(grid.shape(), [3, 2]);
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                assert_eq!(grid[[i, j]], octaves.sample(&field, x, y, 0.75));
            }
        }
    }

    #[test]
    fn non_finite_parameters_rejected() {
        assert!(matches!(
            Octaves::new(2, 0.5, f64::INFINITY),
            Err(NoiseError::InvalidOctaveParameter { name: "lacunarity", .. })
        ));
        assert!(matches!(
            Octaves::new(2, f64::NAN, 2.0),
            Err(NoiseError::InvalidOctaveParameter { name: "persistence", .. })
        ));
        assert!(matches!(
            Octaves::new(3, 1e300, 2.0),
            Err(NoiseError::InvalidOctaveParameter { name: "persistence", .. })
        ));

        let bad = Octaves {
            lacunarity: f64::INFINITY,
            ..Octaves::default()
        };
        assert!(bad.field2d(&NoiseField::canonical(), &[0.0, 0.5], &[0.25], 0.5).is_err());
    }

    #[test]
    fn overflowing_scaled_coordinate_is_an_error() {
        let field = NoiseField::canonical();
        assert!(field.evaluate(1e308, 0.25, 0.5).is_ok());

        let octaves = Octaves::new(3, 0.5, 2.0).unwrap();
        match octaves.field2d(&field, &[0.0, 1e308], &[0.25], 0.5) {
            Err(NoiseError::InvalidCoordinate { axis, index, value }) => {
                assert_eq!(axis, Axis::X);
                assert_eq!(index, 1);
                assert!(value.is_infinite());
            }
            other => panic!("expected an invalid coordinate, got {other:?}"),
        }
    }

    #[test]
    fn octave_grid_rejects_nan() {
        let octaves = Octaves::default();
        assert!(octaves.field2d(&NoiseField::canonical(), &[f64::NAN], &[0.0], 0.0).is_err());
    }
}
