use thiserror::Error;

/// Axis a grid coordinate belongs to, used when reporting bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NoiseError {
    #[error("invalid {axis} coordinate at index {index}: {value}")]
    InvalidCoordinate { axis: Axis, index: usize, value: f64 },
    #[error("permutation table has {0} entries, at least 256 are required")]
    TableTooShort(usize),
    #[error("permutation table is not a permutation of 0..=255 (repeated value {0})")]
    NotAPermutation(u8),
    #[error("octave count must be at least 1")]
    InvalidOctaves,
    #[error("octave {name} must be finite, got {value}")]
    InvalidOctaveParameter { name: &'static str, value: f64 },
    #[error("step must be finite and positive, got {0}")]
    InvalidStep(f64),
    #[error("range holds {0} values, more than the {} allowed", crate::space::MAX_RANGE_LEN)]
    RangeTooLong(f64),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, NoiseError>;
