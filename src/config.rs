use std::str::FromStr;

use anyhow::{Context, Result};
use perlin_field::{NoiseField, Octaves};

/// Viewer settings, read from `PERLIN_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub scale: f64,
    pub zspeed: f64,
    /// `None` uses the canonical permutation.
    pub seed: Option<u64>,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scale: 8.0,
            zspeed: 0.03,
            seed: None,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let seed = match lookup("PERLIN_SEED") {
            Some(raw) => Some(parse_value("PERLIN_SEED", &raw)?),
            None => None,
        };

        Ok(Self {
            scale: parse_or(&lookup, "PERLIN_SCALE", defaults.scale)?,
            zspeed: parse_or(&lookup, "PERLIN_ZSPEED", defaults.zspeed)?,
            seed,
            octaves: parse_or(&lookup, "PERLIN_OCTAVES", defaults.octaves)?,
            persistence: parse_or(&lookup, "PERLIN_PERSISTENCE", defaults.persistence)?,
            lacunarity: parse_or(&lookup, "PERLIN_LACUNARITY", defaults.lacunarity)?,
        })
    }

    pub fn noise_field(&self) -> NoiseField {
        match self.seed {
            Some(seed) => NoiseField::seeded(seed),
            None => NoiseField::canonical(),
        }
    }

    pub fn octaves(&self) -> Result<Octaves> {
        Octaves::new(self.octaves, self.persistence, self.lacunarity)
            .context("invalid octave settings (PERLIN_OCTAVES, PERLIN_PERSISTENCE, PERLIN_LACUNARITY)")
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {raw:?}"))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
