//! String-seeded deterministic random streams.
//!
//! A [`SeededRandom`] is keyed by an arbitrary string and produces the same sequence of
//! draws for the same key on every platform. Generation runs derive one stream per
//! [`StreamPurpose`] from the world-state timestamp via [`seed_string`].
use rand::RngCore;

use crate::params::WorldParameters;

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// 2^-53, the spacing of `f64` values produced by [`SeededRandom::next_f64`].
const UNIT_53: f64 = 1.0 / (1u64 << 53) as f64;

/// Role a random stream plays in a generation run.
///
/// Each purpose has its own seed tag, so the streams never share internal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamPurpose {
    /// Noise permutation and per-pixel grain.
    Canvas,
    /// Palette drafting.
    Palette,
}

impl StreamPurpose {
    /// Tag appended to the timestamp when deriving the seed string.
    pub fn tag(self) -> &'static str {
        match self {
            StreamPurpose::Canvas => "canvas",
            StreamPurpose::Palette => "palette",
        }
    }
}

/// Builds the seed string `timestamp + "_" + tag`.
pub fn seed_string(timestamp: &str, tag: &str) -> String {
    let mut seed = String::with_capacity(timestamp.len() + 1 + tag.len());
    seed.push_str(timestamp);
    seed.push('_');
    seed.push_str(tag);
    seed
}

/// Deterministic pseudo-random stream keyed by a string seed.
///
/// The seed bytes are hashed with FNV-1a and finalized with the SplitMix64 mixer; the
/// stream itself is SplitMix64. Any string is a valid seed. The empty string hashes to the
/// finalized FNV offset basis and behaves like every other seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Creates a stream from an arbitrary seed string.
    pub fn new(seed: &str) -> Self {
        Self {
            state: mix_u64(fnv1a(seed.as_bytes())),
        }
    }

    /// Creates the stream for `purpose`, keyed by the parameters' timestamp.
    pub fn for_purpose(params: &WorldParameters, purpose: StreamPurpose) -> Self {
        Self::new(&seed_string(&params.timestamp, purpose.tag()))
    }

    /// Advances the stream and returns a uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.advance() >> 11) as f64 * UNIT_53
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64).floor() as usize;
        i.min(len.saturating_sub(1))
    }

    #[inline]
    fn advance(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix_u64(self.state)
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[inline]
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

#[inline]
pub(crate) fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
