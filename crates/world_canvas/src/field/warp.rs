//! Domain warping over a [`NoiseField`].
use glam::DVec2;

use crate::error::{Error, Result};
use crate::field::NoiseField;
use crate::params::RunParameters;

/// Offset between the two warp reads. Large enough that the axes are uncorrelated.
pub const DEFAULT_WARP_OFFSET: f64 = 1000.0;

/// Warped-noise evaluator for output pixels.
///
/// For a pixel `(x, y)`, two warp values are read at `(x, y) * zoom` and at the same point
/// shifted by `offset` on both axes. The pixel is displaced by `warp * distortion` and the
/// field is read a third time at the displaced, rescaled position. The result is remapped
/// from `[-1, 1]` to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainWarp {
    pub zoom: f64,
    pub distortion: f64,
    pub offset: f64,
}

impl DomainWarp {
    pub fn new(zoom: f64, distortion: f64) -> Self {
        Self {
            zoom,
            distortion,
            offset: DEFAULT_WARP_OFFSET,
        }
    }

    pub fn from_run(run: &RunParameters) -> Self {
        Self::new(run.zoom, run.distortion)
    }

    /// Sets the offset between the two warp reads.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Warped value at output pixel `(x, y)`, in `[0, 1]`.
    pub fn evaluate(&self, field: &NoiseField, x: f64, y: f64) -> Result<f64> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::Noise(format!(
                "non-finite pixel coordinate ({x}, {y})"
            )));
        }

        let nx = x * self.zoom;
        let ny = y * self.zoom;
        if !nx.is_finite() || !ny.is_finite() {
            return Err(Error::Noise(format!(
                "scaled coordinate for ({x}, {y}) is non-finite at zoom {}",
                self.zoom
            )));
        }
        let wx = field.sample(nx, ny);
        let wy = field.sample(nx + self.offset, ny + self.offset);

        let wx_pos = (x + wx * self.distortion) * self.zoom;
        let wy_pos = (y + wy * self.distortion) * self.zoom;
        if !wx_pos.is_finite() || !wy_pos.is_finite() {
            return Err(Error::Noise(format!(
                "warped coordinate for ({x}, {y}) is non-finite"
            )));
        }

        let v = field.sample(wx_pos, wy_pos);
        Ok((v + 1.0) / 2.0)
    }

    /// Displacement in pixels applied to `p` before the final read.
    pub fn displacement(&self, field: &NoiseField, p: DVec2) -> DVec2 {
        let n = p * self.zoom;
        DVec2::new(
            field.sample(n.x, n.y),
            field.sample(n.x + self.offset, n.y + self.offset),
        ) * self.distortion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    fn field() -> NoiseField {
        NoiseField::new(&mut SeededRandom::new("warp"))
    }

    #[test]
    fn values_are_remapped_to_unit_interval() {
        let f = field();
        let warp = DomainWarp::new(0.004, 300.0);
        for y in (0..400).step_by(7) {
            for x in (0..400).step_by(11) {
                let v = warp.evaluate(&f, x as f64, y as f64).expect("finite");
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn matches_manual_three_read_composition() {
        let f = field();
        let warp = DomainWarp::new(0.003, 240.0);
        let (x, y) = (123.0, 456.0);
        let wx = f.sample(x * 0.003, y * 0.003);
        let wy = f.sample(x * 0.003 + 1000.0, y * 0.003 + 1000.0);
        let expected =
            (f.sample((x + wx * 240.0) * 0.003, (y + wy * 240.0) * 0.003) + 1.0) / 2.0;
        assert_eq!(warp.evaluate(&f, x, y).expect("finite"), expected);

        let d = warp.displacement(&f, DVec2::new(x, y));
        assert_eq!(d, DVec2::new(wx * 240.0, wy * 240.0));
    }

    #[test]
    fn zero_distortion_reads_the_plain_field() {
        let f = field();
        let warp = DomainWarp::new(0.01, 0.0);
        let got = warp.evaluate(&f, 50.0, 70.0).expect("finite");
        assert_eq!(got, (f.sample(50.0 * 0.01, 70.0 * 0.01) + 1.0) / 2.0);
    }

    #[test]
    fn offset_decorrelates_warp_axes() {
        let f = field();
        let warp = DomainWarp::new(0.01, 1.0);
        let d = warp.displacement(&f, DVec2::new(10.0, 20.0));
        let same = DomainWarp::new(0.01, 1.0).with_offset(0.0);
        let s = same.displacement(&f, DVec2::new(10.0, 20.0));
        assert_eq!(s.x, s.y);
        assert_ne!(d.x, d.y);
    }

    #[test]
    fn non_finite_coordinates_are_noise_errors() {
        let f = field();
        let warp = DomainWarp::new(0.003, 200.0);
        assert!(matches!(
            warp.evaluate(&f, f64::NAN, 0.0),
            Err(Error::Noise(_))
        ));
        assert!(matches!(
            warp.evaluate(&f, 0.0, f64::INFINITY),
            Err(Error::Noise(_))
        ));
        let huge = DomainWarp::new(f64::MAX, 200.0);
        assert!(huge.evaluate(&f, 2.0, 2.0).is_err());
    }
}
