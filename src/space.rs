// Coordinate sequences for building grid axes

use crate::error::{NoiseError, Result};

/// Longest sequence [`arange`] will build.
pub const MAX_RANGE_LEN: usize = 1 << 26;

/// `steps` evenly spaced values starting at `a`, stopping short of `b`.
pub fn linspace(a: f64, b: f64, steps: usize) -> Vec<f64> {
    let step = (b - a) / steps as f64;
    (0..steps).map(|i| a + i as f64 * step).collect()
}

/// Values `a, a + step, ...` below `b`.
pub fn arange(a: f64, b: f64, step: f64) -> Result<Vec<f64>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(NoiseError::InvalidStep(step));
    }

    let count = ((b - a) / step).floor();
    if count.is_nan() || count <= 0.0 {
        return Ok(Vec::new());
    }
    if count > MAX_RANGE_LEN as f64 {
        return Err(NoiseError::RangeTooLong(count));
    }

    Ok((0..count as usize).map(|i| a + i as f64 * step).collect())
}
