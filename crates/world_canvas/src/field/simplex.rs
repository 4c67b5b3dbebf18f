//! Seeded 2D simplex noise.
use crate::random::SeededRandom;

/// Correctly rounded `sqrt(3)`, kept literal so skew factors are identical everywhere.
const SQRT_3: f64 = 1.7320508075688772;
const F2: f64 = 0.5 * (SQRT_3 - 1.0);
const G2: f64 = (3.0 - SQRT_3) / 6.0;

/// Scales the summed corner contributions to roughly `[-1, 1]`.
const OUTPUT_SCALE: f64 = 70.0;

const TABLE_SIZE: usize = 256;

/// The twelve 2D gradient directions (edges of a cube projected onto the plane).
const GRADIENTS: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Deterministic 2D simplex noise keyed by a permutation table.
///
/// Construction consumes exactly 255 draws from the stream. Sampling is pure: the same
/// field and coordinate always give the same value.
#[derive(Clone)]
pub struct NoiseField {
    perm: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    /// Builds a field by shuffling the permutation table with `rng`.
    pub fn new(rng: &mut SeededRandom) -> Self {
        let mut table = [0u8; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in 0..TABLE_SIZE - 1 {
            let r = i + (rng.next_f64() * (TABLE_SIZE - i) as f64).floor() as usize;
            table.swap(i, r.min(TABLE_SIZE - 1));
        }

        let mut perm = [0u8; TABLE_SIZE * 2];
        perm[..TABLE_SIZE].copy_from_slice(&table);
        perm[TABLE_SIZE..].copy_from_slice(&table);
        Self { perm }
    }

    /// Samples the field at `(x, y)`. The result is in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor() as i64;
        let j = (y + s).floor() as i64;
        let t = i.wrapping_add(j) as f64 * G2;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);

        let (i1, j1) = if x0 > y0 { (1usize, 0usize) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let n0 = self.corner(
            0.5 - x0 * x0 - y0 * y0,
            ii + self.perm[jj] as usize,
            x0,
            y0,
        );
        let n1 = self.corner(
            0.5 - x1 * x1 - y1 * y1,
            ii + i1 + self.perm[jj + j1] as usize,
            x1,
            y1,
        );
        let n2 = self.corner(
            0.5 - x2 * x2 - y2 * y2,
            ii + 1 + self.perm[jj + 1] as usize,
            x2,
            y2,
        );

        (OUTPUT_SCALE * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Samples the field at a mint/glam point.
    #[inline]
    pub fn sample_point(&self, p: impl Into<mint::Vector2<f64>>) -> f64 {
        let p = p.into();
        self.sample(p.x, p.y)
    }

    #[inline]
    fn corner(&self, t: f64, hash_index: usize, x: f64, y: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let (gx, gy) = GRADIENTS[self.perm[hash_index] as usize % GRADIENTS.len()];
        let t = t * t;
        t * t * (gx * x + gy * y)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("perm_head", &&self.perm[..8])
            .finish()
    }
}
