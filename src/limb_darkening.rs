//! Quadratic limb-darkening law.

use crate::Float;
use crate::integrate::adaptive_simpson;

/// Absolute tolerance of the disk integral.
const DISK_INTEGRAL_TOLERANCE: f64 = 1e-12;

/// Quadratic limb-darkening law
/// \[ I(r) = \frac{1 - u_1 (1 - \mu) - u_2 (1 - \mu)^2}{\pi (1 - u_1/3 - u_2/6)}, \quad \mu = \sqrt{1 - r^2}. \]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticLimbDarkening<F: Float> {
    /// Linear coefficient.
    pub u1: F,
    /// Quadratic coefficient.
    pub u2: F,
}

impl<F: Float> QuadraticLimbDarkening<F> {
    /// Create a new law.
    pub fn new(u1: F, u2: F) -> Self {
        Self { u1, u2 }
    }

    /// Intensity at radial position `r` on the projected disk, with `r = 0` at the disk
    /// center and `r = 1` at the limb.
    pub fn intensity(&self, r: F) -> F {
        let one = F::one();
        let mu = (one - r * r).sqrt();
        let edge = one - mu;
        let norm = one - self.u1 / F::from_f64(3.).unwrap() - self.u2 / F::from_f64(6.).unwrap();
        (one - self.u1 * edge - self.u2 * edge * edge) / norm / F::pi()
    }

    /// Intensity at `r` relative to the intensity at the disk center.
    pub fn intensity_normed(&self, r: F) -> F {
        self.intensity(r) / self.intensity(F::zero())
    }

    /// Total normalized flux of a disk of radius `radius`,
    /// \( 2\pi \int_0^R r\,I_{norm}(r/R)\,dr \), by numerical quadrature.
    ///
    /// The law is evaluated at the radial coordinate scaled to the limb, so the result is
    /// `radius²` times the flux of the unit disk. A radius that is not positive carries no flux.
    pub fn disk_flux(&self, radius: F) -> F {
        if radius <= F::zero() {
            return F::zero();
        }
        let tolerance = F::from_f64(DISK_INTEGRAL_TOLERANCE).unwrap();
        let integrand = |r: F| r * self.intensity_normed(r / radius);
        F::two_pi() * adaptive_simpson(integrand, F::zero(), radius, tolerance)
    }

    /// Closed form of [`disk_flux`](Self::disk_flux) for the unit disk, \( \pi (1 - u_1/3 - u_2/6) \).
    pub fn unit_disk_flux(&self) -> F {
        let three = F::from_f64(3.).unwrap();
        let six = F::from_f64(6.).unwrap();
        F::pi() * (F::one() - self.u1 / three - self.u2 / six)
    }
}

impl<F: Float> Default for QuadraticLimbDarkening<F> {
    fn default() -> Self {
        Self::new(F::from_f64(0.4987).unwrap(), F::from_f64(0.1772).unwrap())
    }
}
