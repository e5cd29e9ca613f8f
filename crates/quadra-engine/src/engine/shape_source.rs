use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeKind;

/// Seed for deterministic shape generation.
///
/// A 128-bit (16-byte) seed for the shape source's random number generator.
/// The same seed produces the same shape sequence, enabling:
///
/// - Reproducible gameplay for debugging
/// - Reproducible simulation runs
/// - Deterministic testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid shape seed (expected 32 hex characters)")]
pub struct InvalidSeedError;

impl FromStr for ShapeSeed {
    type Err = InvalidSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(InvalidSeedError);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| InvalidSeedError)?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Formats the seed as the 32-character hex string `from_str` accepts.
impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_str(&hex_str)
            .map_err(|e| serde::de::Error::custom(format!("{e}: {hex_str:?}")))
    }
}

/// Allows generating random `ShapeSeed` values with `rng.random()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

/// Supplies shapes as independent uniform random draws.
///
/// Every draw picks one of the 7 kinds with equal probability, with no
/// bag or memory between draws. Seedable for deterministic sequences.
#[derive(Debug, Clone)]
pub struct ShapeSource {
    rng: Pcg32,
}

impl Default for ShapeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSource {
    /// Creates a shape source seeded from the OS random data source.
    ///
    /// For deterministic sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws the next shape, uniformly at random.
    pub fn draw(&mut self) -> ShapeKind {
        self.rng.random()
    }
}
