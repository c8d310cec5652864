//! Random draws of sunspot positions and sizes.
//!
//! Spot factories consume randomness only through [`SunspotSampler`], so a seeded
//! implementation makes randomly spotted stars reproducible.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::Float;
use crate::error::Error;
use crate::geometry::Angle;

/// Source of random sunspot latitudes, longitudes and radii.
pub trait SunspotSampler<F: Float> {
    /// Draw `n` latitudes from the two symmetric active latitude bands centered on
    /// `±mean_latitude`.
    ///
    /// Fails if the sampler cannot draw around `mean_latitude`.
    fn draw_latitudes(
        &mut self,
        n: usize,
        mean_latitude: Angle<F>,
    ) -> Result<Vec<Angle<F>>, Error>;

    /// Draw `n` longitudes, uniform on `[0, 2π)`.
    fn draw_longitudes(&mut self, n: usize) -> Vec<Angle<F>>;

    /// Draw `n` spot radii, in stellar radii.
    fn draw_radii(&mut self, n: usize) -> Vec<F>;
}

/// Sunspot statistics of the Sun.
///
/// - Latitudes: normal around `±mean_latitude` with width [`latitude_width`](Self::with_latitude_width)
///   (default 5°), hemisphere chosen with equal probability. Draws with `|lat| ≥ 90°` or
///   exactly on the equator are redrawn. The mean latitude has to lie in `[0°, 90°)` and the
///   width in `(0°, 90°]`, which keeps the redraw probability below one half.
/// - Radii: umbral areas follow the lognormal distribution of Bogdan et al. (1988) with a
///   mean of 0.62 µHem and a width σ = 3.80, converted to the radius of a circle covering
///   the same fraction of a hemisphere.
#[derive(Clone, Debug)]
pub struct SolarSunspotSampler<R: Rng> {
    rng: R,
    latitude_width_deg: f64,
}

/// Mean umbral area, in micro-hemispheres.
const MEAN_AREA_MUHEM: f64 = 0.62;
/// Geometric width of the lognormal area distribution.
const AREA_SIGMA: f64 = 3.80;

impl<R: Rng> SolarSunspotSampler<R> {
    /// Create a sampler drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            latitude_width_deg: 5.,
        }
    }

    /// Set the width of each active latitude band, in degrees. It has to lie in `(0, 90]`.
    pub fn with_latitude_width(mut self, width_deg: f64) -> Result<Self, Error> {
        if !(width_deg > 0. && width_deg <= 90.) {
            return Err(Error::InvalidLatitudeWidth(width_deg));
        }
        self.latitude_width_deg = width_deg;
        Ok(self)
    }

    fn draw_latitude_deg(&mut self, mean_latitude_deg: f64) -> f64 {
        loop {
            let z: f64 = self.rng.sample(StandardNormal);
            let latitude = mean_latitude_deg + self.latitude_width_deg * z;
            if latitude != 0. && latitude.abs() < 90. {
                let sign = if self.rng.random_bool(0.5) { 1. } else { -1. };
                return sign * latitude;
            }
        }
    }

    fn draw_radius(&mut self) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        let area_muhem = (MEAN_AREA_MUHEM.ln() + AREA_SIGMA.ln().sqrt() * z).exp();
        (2. * area_muhem * 1e-6).sqrt()
    }
}

impl<F: Float, R: Rng> SunspotSampler<F> for SolarSunspotSampler<R> {
    fn draw_latitudes(
        &mut self,
        n: usize,
        mean_latitude: Angle<F>,
    ) -> Result<Vec<Angle<F>>, Error> {
        let mean_deg = mean_latitude.to_degrees().to_f64().unwrap_or(f64::NAN);
        if !(0. ..90.).contains(&mean_deg) {
            return Err(Error::InvalidMeanLatitude(mean_deg));
        }
        Ok((0..n)
            .map(|_| Angle::degrees(F::from_f64(self.draw_latitude_deg(mean_deg)).unwrap()))
            .collect())
    }

    fn draw_longitudes(&mut self, n: usize) -> Vec<Angle<F>> {
        (0..n)
            .map(|_| {
                let lon = self.rng.random_range(0.0..std::f64::consts::TAU);
                Angle::radians(F::from_f64(lon).unwrap())
            })
            .collect()
    }

    fn draw_radii(&mut self, n: usize) -> Vec<F> {
        (0..n)
            .map(|_| F::from_f64(self.draw_radius()).unwrap())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    use super::*;

    #[test]
    fn latitudes_populate_both_bands() {
        let mut sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(42));
        let latitudes: Vec<Angle<f64>> =
            sampler.draw_latitudes(2000, Angle::degrees(15.)).unwrap();
        let degrees: Vec<f64> = latitudes.iter().map(|l| l.to_degrees()).collect();

        assert_eq!(degrees.len(), 2000);
        assert!(degrees.iter().all(|l| *l != 0. && l.abs() < 90.));

        let north = degrees.iter().filter(|l| **l > 0.).count();
        assert!((800..1200).contains(&north), "north band got {north} of 2000");

        let mean_abs = degrees.iter().map(|l| l.abs()).sum::<f64>() / degrees.len() as f64;
        assert!((mean_abs - 15.).abs() < 0.5, "mean absolute latitude {mean_abs}");
    }

    #[test]
    fn narrow_bands() {
        let mut sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(5))
            .with_latitude_width(1e-3)
            .unwrap();
        let latitudes: Vec<Angle<f64>> =
            sampler.draw_latitudes(100, Angle::degrees(30.)).unwrap();
        assert!(latitudes.iter().all(|l| (l.to_degrees().abs() - 30.).abs() < 0.1));

        let equatorial: Vec<Angle<f64>> =
            sampler.draw_latitudes(100, Angle::degrees(0.)).unwrap();
        assert!(equatorial.iter().all(|l| l.to_degrees() != 0.));
    }

    #[test]
    fn rejects_invalid_latitude_width() {
        for width in [0., -5., 90.5, f64::NAN, f64::INFINITY] {
            let sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(0));
            assert!(matches!(
                sampler.with_latitude_width(width),
                Err(Error::InvalidLatitudeWidth(_))
            ));
        }
    }

    #[test]
    fn rejects_invalid_mean_latitude() {
        let mut sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(0));
        for mean in [-10., 95., 400., f64::NAN, f64::INFINITY] {
            let drawn: Result<Vec<Angle<f64>>, _> =
                sampler.draw_latitudes(1, Angle::degrees(mean));
            assert!(matches!(drawn, Err(Error::InvalidMeanLatitude(_))), "mean {mean}");
        }
    }

    #[test]
    fn longitudes_in_range() {
        let mut sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(7));
        let longitudes: Vec<Angle<f64>> = sampler.draw_longitudes(500);
        assert!(
            longitudes
                .iter()
                .all(|l| l.to_radians() >= 0. && l.to_radians() < std::f64::consts::TAU)
        );
    }

    #[test]
    fn radii_follow_lognormal_median() {
        let mut sampler = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(3));
        let mut radii: Vec<f64> = sampler.draw_radii(2001);
        assert!(radii.iter().all(|r| *r > 0.));

        radii.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected_median = (2. * MEAN_AREA_MUHEM * 1e-6).sqrt();
        let median = radii[1000];
        assert!(
            (median / expected_median - 1.).abs() < 0.15,
            "median radius {median}, expected {expected_median}"
        );
    }

    #[test]
    fn seeded_samplers_agree() {
        let mut a = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(11));
        let mut b = SolarSunspotSampler::new(ChaChaRng::seed_from_u64(11));
        let ra: Vec<f32> = a.draw_radii(10);
        let rb: Vec<f32> = b.draw_radii(10);
        assert_eq!(ra, rb);
    }
}
