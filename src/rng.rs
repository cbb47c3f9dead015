//! Deterministic pseudo-random stream used for map generation and replays.
//!
//! The generator is Mulberry32: a 32-bit additive counter mixed through two
//! multiply-xorshift rounds. The constants below are part of the map format;
//! changing any of them changes every map generated from a seed.
//!
//! ```text
//! state += 0x6D2B79F5
//! t  = imul(state ^ (state >> 15), state | 1)
//! t ^= t + imul(t ^ (t >> 7), t | 61)
//! out = t ^ (t >> 14)
//! ```
//!
//! String seeds are hashed with 32-bit FNV-1a over UTF-16 code units, so a
//! room code produces the same stream on every client regardless of the
//! language that implements it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mulberry32 counter increment.
const GOLDEN_GAMMA: u32 = 0x6D2B_79F5;

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;

/// 2^32 as a float, the divisor that maps a `u32` into `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// A seed for the deterministic stream: free text (room codes) or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    /// Numeric seed used verbatim as the generator state.
    Number(u32),
    /// Text seed, hashed with FNV-1a.
    Text(String),
}

impl Seed {
    /// Resolve the seed to the 32-bit generator state.
    #[must_use]
    pub fn to_state(&self) -> u32 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => fnv1a_utf16(text),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::Text(crate::config::DEFAULT_SEED.to_string())
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl std::str::FromStr for Seed {
    type Err = std::convert::Infallible;

    /// Decimal text that fits in a `u32` is a numeric seed; anything else is
    /// a text seed.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(text
            .parse::<u32>()
            .map_or_else(|_| Self::Text(text.to_string()), Self::Number))
    }
}

/// Hash a string with 32-bit FNV-1a over its UTF-16 code units.
#[must_use]
pub fn fnv1a_utf16(text: &str) -> u32 {
    text.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Mulberry32 stream state.
///
/// The state is a plain `Copy` value: [`Mulberry32::next`] is a pure function
/// returning the sample and the successor state, so independent streams never
/// share hidden mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a stream from a raw 32-bit state.
    #[must_use]
    pub const fn new(state: u32) -> Self {
        Self { state }
    }

    /// Create a stream from a [`Seed`].
    #[must_use]
    pub fn from_seed(seed: &Seed) -> Self {
        Self::new(seed.to_state())
    }

    /// Current raw state.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Pure step: returns the next 32-bit output and the successor stream.
    #[must_use]
    pub const fn next_raw(self) -> (u32, Self) {
        let state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut t = (state ^ (state >> 15)).wrapping_mul(state | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14), Self { state })
    }

    /// Pure step: returns a float in `[0, 1)` and the successor stream.
    #[must_use]
    pub fn next(self) -> (f64, Self) {
        let (raw, next) = self.next_raw();
        (f64::from(raw) / TWO_POW_32, next)
    }

    /// Advance in place and return a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let (value, next) = self.next();
        *self = next;
        value
    }

    /// Advance in place and return an integer in `[0, bound)`.
    ///
    /// Uses `floor(sample * bound)` so it matches the float stream exactly.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        (self.next_f64() * f64::from(bound)).floor() as u32
    }
}

impl rand::RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        let (raw, next) = self.next_raw();
        *self = next;
        raw
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_from_str() {
        assert_eq!("42".parse::<Seed>().unwrap(), Seed::Number(42));
        assert_eq!(
            "tunti-local".parse::<Seed>().unwrap(),
            Seed::Text("tunti-local".to_string())
        );
        assert_eq!(
            "99999999999".parse::<Seed>().unwrap(),
            Seed::Text("99999999999".to_string())
        );
    }

    #[test]
    fn test_reference_vectors() {
        // Published Mulberry32 outputs for seed 42.
        let mut rng = Mulberry32::new(42);
        let outputs: Vec<u32> = (0..3).map(|_| rand::RngCore::next_u32(&mut rng)).collect();
        assert_eq!(outputs, vec![2_581_720_956, 1_925_393_290, 3_661_312_704]);

        let mut zero = Mulberry32::new(0);
        assert_eq!(rand::RngCore::next_u32(&mut zero), 1_144_304_738);
    }

    #[test]
    fn test_fnv_reference() {
        assert_eq!(fnv1a_utf16(""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a_utf16("tunti-local"), 1_157_791_769);
        assert_eq!(Seed::from("room-7").to_state(), 3_162_819_430);
    }

    #[test]
    fn test_pure_next_does_not_mutate() {
        let rng = Mulberry32::new(7);
        let (a, _) = rng.next();
        let (b, _) = rng.next();
        assert!((a - b).abs() < f64::EPSILON);
    }

    #[test]
    fn test_independent_streams() {
        let mut first = Mulberry32::from_seed(&Seed::from("alpha"));
        let mut second = Mulberry32::from_seed(&Seed::from("alpha"));
        let mut other = Mulberry32::from_seed(&Seed::from("beta"));

        let a: Vec<f64> = (0..16).map(|_| first.next_f64()).collect();
        let b: Vec<f64> = (0..16).map(|_| second.next_f64()).collect();
        let c: Vec<f64> = (0..16).map(|_| other.next_f64()).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unit_interval() {
        let mut rng = Mulberry32::new(123);
        for _ in 0..10_000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_next_below_bounds() {
        let mut rng = Mulberry32::new(99);
        let mut seen = [false; 3];
        for _ in 0..1_000 {
            let value = rng.next_below(3);
            assert!(value < 3);
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn test_seed_display() {
        assert_eq!(Seed::from(5).to_string(), "5");
        assert_eq!(Seed::from("abc").to_string(), "\"abc\"");
    }
}
