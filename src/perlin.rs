// Improved Perlin noise over a permutation table
// Gradients follow Ken Perlin's Java reference: https://cs.nyu.edu/~perlin/noise/

use std::borrow::Cow;

use glam::DVec3;
use log::debug;
use noise::NoiseFn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Axis, NoiseError, Result};

/// Ken Perlin's reference permutation of `0..=255`.
pub const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91,  90,  15,  131, 13,  201, 95,  96,  53,  194, 233, 7,   225,
    140, 36,  103, 30,  69,  142, 8,   99,  37,  240, 21,  10,  23,  190, 6,   148,
    247, 120, 234, 75,  0,   26,  197, 62,  94,  252, 219, 203, 117, 35,  11,  32,
    57,  177, 33,  88,  237, 149, 56,  87,  174, 20,  125, 136, 171, 168, 68,  175,
    74,  165, 71,  134, 139, 48,  27,  166, 77,  146, 158, 231, 83,  111, 229, 122,
    60,  211, 133, 230, 220, 105, 92,  41,  55,  46,  245, 40,  244, 102, 143, 54,
    65,  25,  63,  161, 1,   216, 80,  73,  209, 76,  132, 187, 208, 89,  18,  169,
    200, 196, 135, 130, 116, 188, 159, 86,  164, 100, 109, 198, 173, 186, 3,   64,
    52,  217, 226, 250, 124, 123, 5,   202, 38,  147, 118, 126, 255, 82,  85,  212,
    207, 206, 59,  227, 47,  16,  58,  17,  182, 189, 28,  42,  223, 183, 170, 213,
    119, 248, 152, 2,   44,  154, 163, 70,  221, 153, 101, 155, 167, 43,  172, 9,
    129, 22,  39,  253, 19,  98,  108, 110, 79,  113, 224, 232, 178, 185, 112, 104,
    218, 246, 97,  228, 251, 34,  242, 193, 238, 210, 144, 12,  191, 179, 162, 241,
    81,  51,  145, 235, 249, 14,  239, 107, 49,  192, 214, 31,  181, 199, 106, 157,
    184, 84,  204, 176, 115, 121, 50,  45,  127, 4,   150, 254, 138, 236, 205, 93,
    222, 114, 67,  29,  24,  72,  243, 141, 128, 195, 78,  66,  215, 61,  156, 180,
];

/// Lookups index up to `255 + 255 + 1`, so every table is at least this long.
pub const EXTENDED_LEN: usize = 512;

const fn doubled(table: [u8; 256]) -> [u8; EXTENDED_LEN] {
    let mut out = [0u8; EXTENDED_LEN];
    let mut i = 0;
    while i < EXTENDED_LEN {
        out[i] = table[i & 255];
        i += 1;
    }
    out
}

static CANONICAL: [u8; EXTENDED_LEN] = doubled(PERMUTATION);

/// A noise source backed by an immutable, extended permutation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseField {
    table: Cow<'static, [u8]>,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::canonical()
    }
}

impl NoiseField {
    /// Noise over [`PERMUTATION`]. Reproduces the reference implementation exactly.
    pub fn canonical() -> Self {
        Self {
            table: Cow::Borrowed(&CANONICAL),
        }
    }

    /// Builds a field from a caller supplied table.
    ///
    /// The first 256 entries must be a permutation of `0..=255`. The table is
    /// extended by concatenating it with itself until it holds at least
    /// [`EXTENDED_LEN`] entries; any entries past 256 are kept as given.
    pub fn from_permutation(perm: &[u8]) -> Result<Self> {
        if perm.len() < 256 {
            return Err(NoiseError::TableTooShort(perm.len()));
        }

        let mut seen = [false; 256];
        for &value in &perm[..256] {
            if seen[value as usize] {
                return Err(NoiseError::NotAPermutation(value));
            }
            seen[value as usize] = true;
        }

        let mut table = perm.to_vec();
        while table.len() < EXTENDED_LEN {
            table.extend_from_within(..);
        }
        debug!("extended permutation table from {} to {} entries", perm.len(), table.len());

        Ok(Self {
            table: Cow::Owned(table),
        })
    }

    /// Random permutation derived from `seed`. Same seed, same table.
    pub fn seeded(seed: u64) -> Self {
        let mut perm: Vec<u8> = (0..=255).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        perm.shuffle(&mut rng);
        perm.extend_from_within(..);

        Self {
            table: Cow::Owned(perm),
        }
    }

    /// The extended table used for lookups.
    pub fn table(&self) -> &[u8] {
        &self.table
    }

    /// Noise at `(x, y, z)`, rejecting NaN and infinite coordinates.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        check_coordinate(Axis::X, 0, x)?;
        check_coordinate(Axis::Y, 0, y)?;
        check_coordinate(Axis::Z, 0, z)?;
        Ok(self.sample(x, y, z))
    }

    pub fn evaluate_point(&self, point: DVec3) -> Result<f64> {
        self.evaluate(point.x, point.y, point.z)
    }

    /// Noise at `(x, y, z)` without validating the input.
    ///
    /// Non-finite coordinates produce NaN. Callers that have already checked
    /// their coordinates (the grid builders do) use this directly.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.table[..];

        let x_floor = x.floor();
        let y_floor = y.floor();
        let z_floor = z.floor();

        // floor mod 256 in float space keeps the lattice wrap exact for any magnitude
        let x_int = x_floor.rem_euclid(256.0) as usize;
        let y_int = y_floor.rem_euclid(256.0) as usize;
        let z_int = z_floor.rem_euclid(256.0) as usize;

        let x_frac = x - x_floor;
        let y_frac = y - y_floor;
        let z_frac = z - z_floor;

        let u = fade(x_frac);
        let v = fade(y_frac);
        let w = fade(z_frac);

        // Hash coordinates of the 8 cube corners
        let a = p[x_int] as usize + y_int;
        let aa = p[a] as usize + z_int;
        let ab = p[a + 1] as usize + z_int;
        let b = p[x_int + 1] as usize + y_int;
        let ba = p[b] as usize + z_int;
        let bb = p[b + 1] as usize + z_int;

        lerp(w,
            lerp(v,
                lerp(u, grad3d(p[aa], x_frac, y_frac, z_frac),
                        grad3d(p[ba], x_frac - 1.0, y_frac, z_frac)),
                lerp(u, grad3d(p[ab], x_frac, y_frac - 1.0, z_frac),
                        grad3d(p[bb], x_frac - 1.0, y_frac - 1.0, z_frac))),
            lerp(v,
                lerp(u, grad3d(p[aa + 1], x_frac, y_frac, z_frac - 1.0),
                        grad3d(p[ba + 1], x_frac - 1.0, y_frac, z_frac - 1.0)),
                lerp(u, grad3d(p[ab + 1], x_frac, y_frac - 1.0, z_frac - 1.0),
                        grad3d(p[bb + 1], x_frac - 1.0, y_frac - 1.0, z_frac - 1.0))))
    }

    pub fn sample_point(&self, point: DVec3) -> f64 {
        self.sample(point.x, point.y, point.z)
    }
}

impl NoiseFn<f64, 3> for NoiseField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1], 0.0)
    }
}

/// Noise at `(x, y, z)` over the canonical table.
pub fn noise3d(x: f64, y: f64, z: f64) -> f64 {
    NoiseField::canonical().sample(x, y, z)
}

/// Checked noise at `(x, y, z)` over `field`'s table.
pub fn evaluate(x: f64, y: f64, z: f64, field: &NoiseField) -> Result<f64> {
    field.evaluate(x, y, z)
}

pub(crate) fn check_coordinate(axis: Axis, index: usize, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NoiseError::InvalidCoordinate { axis, index, value })
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad3d(h: u8, x: f64, y: f64, z: f64) -> f64 {
    match h & 15 {
        0 | 12 => x + y,
        1 | 14 => y - x,
        2 => x - y,
        3 => -x - y,
        4 => x + z,
        5 => z - x,
        6 => x - z,
        7 => -x - z,
        8 => y + z,
        9 | 13 => z - y,
        10 => y - z,
        _ => -y - z,
    }
}
