//! The spotted star and its light curve.

use itertools::Itertools;
use log::{debug, info, trace};
use nalgebra::{DVector, Matrix3xX, Vector2};
use ndarray::{Array1, Array2, ArrayView1};

use crate::Float;
use crate::error::Error;
use crate::geometry::{Angle, RotationAxis, rem_floor, rotation_matrix};
use crate::limb_darkening::QuadraticLimbDarkening;
use crate::spot::Spot;

/// A rotating, limb-darkened star covered in spots.
///
/// The star keeps its [`Spot`]s untouched and works on a separate 3×N matrix of spot
/// positions (`spots_cartesian`) together with the matching radii (`spots_r`), column `i`
/// belonging to spot `i`. [`rotate`](Star::rotate) only moves the working matrix; the star
/// is always viewed equator-on.
///
/// A `Star` is not meant to be shared between threads while a light curve is computed.
/// Give every evaluation its own clone, as [`flux_par`](Star::flux_par) does.
#[derive(Clone, Debug)]
pub struct Star<F: Float> {
    /// Spots, as constructed.
    spots: Vec<Spot<F>>,
    /// Working positions of the spots, one column per spot.
    spots_cartesian: Matrix3xX<F>,
    /// Spot radii.
    spots_r: DVector<F>,
    /// Limb-darkening law.
    limb_darkening: QuadraticLimbDarkening<F>,
    /// Stellar radius.
    r: F,
    /// Spot size threshold between analytic and numerical photocenters. Unused.
    radius_threshold: F,
    /// Rotation period.
    rotation_period: F,
    /// Total rotation applied to `spots_cartesian` since construction.
    rotations_applied: Angle<F>,
    /// Stellar inclination.
    inclination: Angle<F>,
    /// Spot contrast.
    contrast: F,
    /// Flux of the star without any spots.
    unspotted_flux: F,
}

/// Projected outline of a visible spot: an ellipse centered on the spot, with its major
/// axis tangential to the limb.
#[derive(Clone, Copy, Debug)]
struct Footprint<F: Float> {
    x: F,
    y: F,
    semi_major: F,
    semi_minor: F,
    cos_angle: F,
    sin_angle: F,
}

impl<F: Float> Star<F> {
    /// Create a star carrying `spots`, with default parameters:
    /// `u1 = 0.4987`, `u2 = 0.1772`, `r = 1`, `radius_threshold = 0.1`,
    /// `rotation_period = 25` and `contrast = 0.7`.
    /// Use `with_` functions to set parameters.
    pub fn new(spots: Vec<Spot<F>>) -> Self {
        let spots_cartesian = Self::spot_positions(&spots);
        let spots_r = DVector::from_vec(spots.iter().map(Spot::r).collect_vec());
        let limb_darkening = QuadraticLimbDarkening::default();
        let r = F::one();

        let mut star = Self {
            spots,
            spots_cartesian,
            spots_r,
            limb_darkening,
            r,
            radius_threshold: F::from_f64(0.1).unwrap(),
            rotation_period: F::from_f64(25.).unwrap(),
            rotations_applied: Angle::zero(),
            inclination: Angle::degrees(F::from_f64(90.).unwrap()),
            contrast: F::from_f64(0.7).unwrap(),
            unspotted_flux: F::zero(),
        };
        star.update_unspotted_flux();
        star
    }

    /// Create a star with all parameters given explicitly.
    pub fn from_parameters(
        spots: Vec<Spot<F>>,
        u1: F,
        u2: F,
        r: F,
        radius_threshold: F,
        rotation_period: F,
        contrast: F,
    ) -> Result<Self, Error> {
        Self::new(spots)
            .with_limb_darkening(u1, u2)
            .with_radius(r)?
            .with_radius_threshold(radius_threshold)
            .with_rotation_period(rotation_period)?
            .with_contrast(contrast)
    }

    /// Set the quadratic limb-darkening coefficients.
    pub fn with_limb_darkening(mut self, u1: F, u2: F) -> Self {
        self.limb_darkening = QuadraticLimbDarkening::new(u1, u2);
        self.update_unspotted_flux();
        self
    }

    /// Set the stellar radius, which has to be positive and finite.
    ///
    /// Spot positions are not rescaled. The limb-darkening law is evaluated at radial
    /// distances in units of `r`, so the unspotted flux grows with `r²`.
    pub fn with_radius(mut self, r: F) -> Result<Self, Error> {
        if !(r > F::zero() && r.is_finite()) {
            return Err(Error::InvalidRadius(r.to_f64().unwrap_or(f64::NAN)));
        }
        self.r = r;
        self.update_unspotted_flux();
        Ok(self)
    }

    /// Set the spot radius threshold.
    ///
    /// The threshold is meant to choose between an analytic and a numerical photocenter,
    /// but no computation consults it yet.
    pub fn with_radius_threshold(mut self, radius_threshold: F) -> Self {
        self.radius_threshold = radius_threshold;
        self
    }

    /// Set the rotation period, which has to be positive and finite.
    pub fn with_rotation_period(mut self, rotation_period: F) -> Result<Self, Error> {
        if !(rotation_period > F::zero() && rotation_period.is_finite()) {
            return Err(Error::InvalidRotationPeriod(
                rotation_period.to_f64().unwrap_or(f64::NAN),
            ));
        }
        self.rotation_period = rotation_period;
        Ok(self)
    }

    /// Set the spot contrast, which has to lie in `(0, 1]`.
    pub fn with_contrast(mut self, contrast: F) -> Result<Self, Error> {
        if !(contrast > F::zero() && contrast <= F::one()) {
            return Err(Error::InvalidContrast(contrast.to_f64().unwrap_or(f64::NAN)));
        }
        self.contrast = contrast;
        Ok(self)
    }

    fn spot_positions(spots: &[Spot<F>]) -> Matrix3xX<F> {
        Matrix3xX::from_fn(spots.len(), |i, j| spots[j].position()[i])
    }

    fn update_unspotted_flux(&mut self) {
        self.unspotted_flux = self.limb_darkening.disk_flux(self.r);
        debug!(
            "Unspotted flux for u1 = {}, u2 = {}, r = {}: {}",
            self.limb_darkening.u1, self.limb_darkening.u2, self.r, self.unspotted_flux
        );
    }

    /// Spots, in their construction-time orientation.
    pub fn spots(&self) -> &[Spot<F>] {
        &self.spots
    }

    /// Current spot positions, one column per spot.
    pub fn spots_cartesian(&self) -> &Matrix3xX<F> {
        &self.spots_cartesian
    }

    /// Spot radii, in the order of [`spots`](Star::spots).
    pub fn spots_r(&self) -> &DVector<F> {
        &self.spots_r
    }

    /// Limb-darkening law.
    pub fn limb_darkening_law(&self) -> &QuadraticLimbDarkening<F> {
        &self.limb_darkening
    }

    /// Stellar radius.
    pub fn r(&self) -> F {
        self.r
    }

    /// Spot radius threshold. See [`with_radius_threshold`](Star::with_radius_threshold).
    pub fn radius_threshold(&self) -> F {
        self.radius_threshold
    }

    /// Rotation period.
    pub fn rotation_period(&self) -> F {
        self.rotation_period
    }

    /// Spot contrast.
    pub fn contrast(&self) -> F {
        self.contrast
    }

    /// Stellar inclination, always 90°.
    pub fn inclination(&self) -> Angle<F> {
        self.inclination
    }

    /// Total rotation applied since construction or the last [`derotate`](Star::derotate).
    pub fn rotations_applied(&self) -> Angle<F> {
        self.rotations_applied
    }

    /// Flux of the star without spots.
    pub fn unspotted_flux(&self) -> F {
        self.unspotted_flux
    }

    /// Intensity of the quadratic limb-darkening law at radial position `r`, in units of the
    /// stellar radius.
    pub fn limb_darkening(&self, r: F) -> F {
        self.limb_darkening.intensity(r)
    }

    /// Intensity at radial position `r`, in units of the stellar radius, relative to the disk
    /// center.
    pub fn limb_darkening_normed(&self, r: F) -> F {
        self.limb_darkening.intensity_normed(r)
    }

    /// Rotate the star about its rotation axis by moving the spots.
    pub fn rotate(&mut self, angle: Angle<F>) {
        let rotation = rotation_matrix(angle, RotationAxis::Y);
        self.spots_cartesian = rotation.matrix() * &self.spots_cartesian;
        self.rotations_applied += angle;
        trace!("Rotated by {}, total {}.", angle, self.rotations_applied);
    }

    /// Undo all rotations applied since construction.
    ///
    /// The spot positions are rebuilt from the spots themselves, so the original geometry
    /// is restored exactly.
    pub fn derotate(&mut self) {
        debug!("Derotating by {}.", self.rotations_applied);
        self.spots_cartesian = Self::spot_positions(&self.spots);
        self.rotations_applied = Angle::zero();
    }

    /// Flux of the star in its current orientation.
    ///
    /// Every spot on the visible hemisphere (`z > 0`) removes
    /// \[ \pi r_s^2 \sqrt{1 - (\rho / R)^2} \, I_{norm}(\rho / R) \, (1 - c) \]
    /// from the unspotted flux, with \(\rho\) the spot's distance from the disk center
    /// (Morris et al. 2018, Eqn. 1).
    pub fn instantaneous_flux(&self) -> F {
        let one = F::one();
        let spot_flux = self
            .spots_cartesian
            .column_iter()
            .zip(self.spots_r.iter())
            .filter(|(position, _)| position[2] > F::zero())
            .map(|(position, &spot_r)| {
                let r_spot = (position[0] * position[0] + position[1] * position[1]).sqrt();
                let rho = r_spot / self.r;
                let foreshortening = (one - rho * rho).sqrt();
                let area = F::pi() * spot_r * spot_r * foreshortening;
                -area * self.limb_darkening_normed(rho) * (one - self.contrast)
            })
            .fold(F::zero(), |acc, flux| acc + flux);

        self.unspotted_flux + spot_flux
    }

    /// Rotational phase at time `t`, in `[0, 2π)`.
    fn rotational_phase(&self, t: F, t0: F) -> Angle<F> {
        let phase = rem_floor(t - t0, self.rotation_period) / self.rotation_period;
        Angle::radians(phase * F::two_pi())
    }

    /// Compute the flux at `times` as the star rotates, with phase zero at `t0`.
    ///
    /// Samples are visited in the given order: before each sample the star is rotated by the
    /// difference between its phase and the phase of the previous sample. Afterwards the
    /// rotation state is restored to what it was before the call, so repeated calls return
    /// identical light curves.
    pub fn flux(&mut self, times: ArrayView1<F>, t0: F) -> Array1<F> {
        info!("Computing flux at {} times.", times.len());
        let spots_cartesian = self.spots_cartesian.clone();
        let rotations_applied = self.rotations_applied;

        let mut prev_rot = Angle::zero();
        let fluxes = times
            .iter()
            .map(|&t| {
                let rotational_phase = self.rotational_phase(t, t0);
                self.rotate(rotational_phase - prev_rot);
                prev_rot = rotational_phase;
                self.instantaneous_flux()
            })
            .collect::<Array1<F>>();

        self.spots_cartesian = spots_cartesian;
        self.rotations_applied = rotations_applied;
        debug!("Restored rotation state to {}.", self.rotations_applied);

        fluxes
    }

    fn visible_footprints(&self) -> Vec<Footprint<F>> {
        let one = F::one();
        self.spots_cartesian
            .column_iter()
            .zip(self.spots_r.iter())
            .filter(|(position, _)| position[2] > F::zero())
            .map(|(position, &spot_r)| {
                let (x, y) = (position[0], position[1]);
                let r_spot = (x * x + y * y).sqrt();
                let angle = F::frac_pi_2() + y.atan2(x);
                let (sin_angle, cos_angle) = angle.sin_cos();
                Footprint {
                    x,
                    y,
                    semi_major: spot_r,
                    semi_minor: spot_r * (one - (r_spot / self.r).powi(2)).sqrt(),
                    cos_angle,
                    sin_angle,
                }
            })
            .collect()
    }

    fn pixel_intensity(&self, x: F, y: F, footprints: &[Footprint<F>]) -> F {
        let r_sq = self.r * self.r;
        let rho_sq = x * x + y * y;
        if rho_sq > r_sq {
            return F::zero();
        }

        footprints
            .iter()
            .filter(|spot| {
                let (dx, dy) = (x - spot.x, y - spot.y);
                let along = dx * spot.cos_angle + dy * spot.sin_angle;
                let across = dx * spot.sin_angle - dy * spot.cos_angle;
                (along * along) / (spot.semi_major * spot.semi_major)
                    + (across * across) / (spot.semi_minor * spot.semi_minor)
                    <= r_sq
            })
            .fold(self.limb_darkening_normed(rho_sq.sqrt() / self.r), |intensity, _| {
                intensity * self.contrast
            })
    }

    /// Pixel centers from `-r` to `r`, mirrored exactly about zero.
    fn pixel_axis(&self, n: usize) -> Vec<F> {
        if n < 2 {
            return vec![-self.r; n];
        }
        let span = self.r + self.r;
        let steps = F::from_usize(n - 1).unwrap();
        let mut axis = vec![F::zero(); n];
        for i in 0..n / 2 {
            let center = -self.r + span * F::from_usize(i).unwrap() / steps;
            axis[i] = center;
            axis[n - 1 - i] = -center;
        }
        axis
    }

    /// Rasterize the visible disk into an `n × n` image of normalized intensity.
    ///
    /// Pixel centers run from `-r` to `r` on both axes; row `i` is at height `y[i]` and column
    /// `j` at `x[j]`. Pixels off the disk are zero, pixels inside a visible spot's projected
    /// ellipse are darkened by the contrast once per covering spot.
    ///
    /// The spots are drawn where they currently are: after a manual [`rotate`](Star::rotate)
    /// the image shows the rotated star, and [`derotate`](Star::derotate) brings back the
    /// construction-time view.
    pub fn compute_image(&self, n: usize) -> Array2<F> {
        info!("Computing {n}x{n} image of {} spots.", self.spots.len());
        let footprints = self.visible_footprints();
        let axis = self.pixel_axis(n);
        Array2::from_shape_fn((n, n), |(i, j)| {
            self.pixel_intensity(axis[j], axis[i], &footprints)
        })
    }

    /// Intensity-weighted photocenter of an `n × n` rasterized image, in stellar radii.
    ///
    /// Returns `None` if the image carries no flux.
    pub fn centroid(&self, n: usize) -> Option<Vector2<F>> {
        let image = self.compute_image(n);
        image_centroid(&image, &self.pixel_axis(n))
    }
}

impl<F: Float> Default for Star<F> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn image_centroid<F: Float>(image: &Array2<F>, axis: &[F]) -> Option<Vector2<F>> {
    let (total, sum_x, sum_y) = image.indexed_iter().fold(
        (F::zero(), F::zero(), F::zero()),
        |(total, sum_x, sum_y), ((i, j), &value)| {
            (total + value, sum_x + value * axis[j], sum_y + value * axis[i])
        },
    );
    if total <= F::zero() {
        return None;
    }
    Some(Vector2::new(sum_x / total, sum_y / total))
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;
    use ndarray::Zip;
    use rayon::prelude::*;

    impl<F: Float> Star<F> {
        /// Compute the flux at `times`, in parallel.
        ///
        /// `times` is split into contiguous chunks, each evaluated on a private clone of the
        /// star, so `self` is left untouched. Also see [`flux`](Star::flux()) for more details.
        pub fn flux_par(&self, times: ArrayView1<F>, t0: F) -> Array1<F> {
            info!("Computing flux at {} times in parallel.", times.len());
            let times = times.to_vec();
            let chunk_size = times.len().div_ceil(rayon::current_num_threads()).max(1);

            let chunks: Vec<Array1<F>> = times
                .par_chunks(chunk_size)
                .map(|chunk| {
                    let mut star = self.clone();
                    star.flux(ArrayView1::from(chunk), t0)
                })
                .collect();

            chunks.iter().flatten().copied().collect()
        }

        /// Rasterize the visible disk, in parallel.
        ///
        /// Also see [`compute_image`](Star::compute_image()) for more details.
        pub fn compute_image_par(&self, n: usize) -> Array2<F> {
            info!("Computing {n}x{n} image of {} spots in parallel.", self.spots.len());
            let footprints = self.visible_footprints();
            let axis = self.pixel_axis(n);

            let mut image = Array2::zeros((n, n));
            Zip::indexed(&mut image).par_for_each(|(i, j), pixel| {
                *pixel = self.pixel_intensity(axis[j], axis[i], &footprints);
            });
            image
        }
    }
}
