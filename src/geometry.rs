//! Angles and the rotations that carry stellar surface coordinates into the sky frame.
//!
//! The sky frame used throughout this crate has its X-Y plane in the plane of the sky:
//! X is aligned with the stellar equator, Y with the stellar rotation axis, and Z points
//! towards the observer.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use nalgebra::{Rotation3, Unit, Vector3};

use crate::Float;

/// An angular quantity.
///
/// Stored in radians; construct it with [`Angle::degrees`] or [`Angle::radians`] so the unit
/// is always explicit. A bare number converted with [`From`] is read as degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle<F: Float> {
    radians: F,
}

impl<F: Float> Angle<F> {
    /// Angle of `value` radians.
    pub fn radians(value: F) -> Self {
        Self { radians: value }
    }

    /// Angle of `value` degrees.
    pub fn degrees(value: F) -> Self {
        Self {
            radians: value * F::pi() / F::from_f64(180.).unwrap(),
        }
    }

    /// The zero angle.
    pub fn zero() -> Self {
        Self { radians: F::zero() }
    }

    /// Value in radians.
    pub fn to_radians(self) -> F {
        self.radians
    }

    /// Value in degrees.
    pub fn to_degrees(self) -> F {
        self.radians * F::from_f64(180.).unwrap() / F::pi()
    }
}

impl<F: Float> From<F> for Angle<F> {
    fn from(degrees: F) -> Self {
        Self::degrees(degrees)
    }
}

impl<F: Float> Add for Angle<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::radians(self.radians + rhs.radians)
    }
}

impl<F: Float> Sub for Angle<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::radians(self.radians - rhs.radians)
    }
}

impl<F: Float> Neg for Angle<F> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::radians(-self.radians)
    }
}

impl<F: Float> AddAssign for Angle<F> {
    fn add_assign(&mut self, rhs: Self) {
        self.radians += rhs.radians;
    }
}

impl<F: Float> SubAssign for Angle<F> {
    fn sub_assign(&mut self, rhs: Self) {
        self.radians -= rhs.radians;
    }
}

impl<F: Float> Display for Angle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rad", self.radians)
    }
}

/// Cartesian axis of a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationAxis {
    /// Sky-plane equatorial direction.
    X,
    /// Stellar rotation axis.
    Y,
    /// Line of sight.
    Z,
}

/// Rotation of the coordinate frame by `angle` about `axis`.
///
/// This is the passive convention: a point expressed in the old frame is re-expressed in a
/// frame turned by `angle`, so about Y a point moves as
/// `x' = cos·x − sin·z`, `z' = sin·x + cos·z`.
pub fn rotation_matrix<F: Float>(angle: Angle<F>, axis: RotationAxis) -> Rotation3<F> {
    let axis: Unit<Vector3<F>> = match axis {
        RotationAxis::X => Vector3::x_axis(),
        RotationAxis::Y => Vector3::y_axis(),
        RotationAxis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&axis, -angle.to_radians())
}

/// Convert a latitude/longitude on a star with the given inclination into sky-frame
/// Cartesian coordinates on the unit sphere.
///
/// `stellar_inclination` is measured away from the line of sight; 90° views the star
/// equator-on, in which case latitude 0°, longitude 0° maps to the sub-observer point
/// `(0, 0, 1)`.
pub fn latlon_to_cartesian<F: Float>(
    latitude: Angle<F>,
    longitude: Angle<F>,
    stellar_inclination: Angle<F>,
) -> Vector3<F> {
    let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
    let unit = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    let right_angle = Angle::degrees(F::from_f64(90.).unwrap());
    let rotate_about_z = rotation_matrix(right_angle, RotationAxis::Z);
    let rotate_is = rotation_matrix(stellar_inclination, RotationAxis::Y);
    rotate_about_z * rotate_is * unit
}

/// [`latlon_to_cartesian`] for a star viewed equator-on.
pub fn latlon_to_cartesian_equator_on<F: Float>(
    latitude: Angle<F>,
    longitude: Angle<F>,
) -> Vector3<F> {
    latlon_to_cartesian(latitude, longitude, Angle::degrees(F::from_f64(90.).unwrap()))
}

/// Floored modulo, which unlike `%` never returns a negative value for a positive `modulus`.
pub(crate) fn rem_floor<F: Float>(value: F, modulus: F) -> F {
    let rem = value % modulus;
    if rem < F::zero() { rem + modulus } else { rem }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::vector;

    use super::*;

    #[test]
    fn angle_conversions() {
        let angle = Angle::degrees(180.);
        assert_abs_diff_eq!(angle.to_radians(), std::f64::consts::PI, epsilon = 1e-15);
        let right_angle = Angle::radians(std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(right_angle.to_degrees(), 90., epsilon = 1e-12);

        let bare: Angle<f64> = 45.0_f64.into();
        assert_eq!(bare, Angle::degrees(45.));
    }

    #[test]
    fn angle_arithmetic() {
        let mut angle = Angle::degrees(30.) + Angle::degrees(60.);
        angle -= Angle::degrees(90.);
        assert_abs_diff_eq!(angle.to_radians(), 0., epsilon = 1e-15);
        assert_eq!(-Angle::radians(1.), Angle::radians(-1.));
        assert_eq!(Angle::<f32>::default(), Angle::zero());
    }

    #[test]
    fn passive_rotation_about_y() {
        let rot = rotation_matrix(Angle::degrees(90.), RotationAxis::Y);
        let moved = rot * vector![0., 0., 1.];
        assert_abs_diff_eq!(moved, vector![-1., 0., 0.], epsilon = 1e-15);

        let rot = rotation_matrix(Angle::degrees(30.), RotationAxis::Y);
        let (s, c) = Angle::<f64>::degrees(30.).to_radians().sin_cos();
        let moved = rot * vector![0.3, 0.2, 0.5];
        let expected = vector![c * 0.3 - s * 0.5, 0.2, s * 0.3 + c * 0.5];
        assert_abs_diff_eq!(moved, expected, epsilon = 1e-15);
    }

    #[test]
    fn passive_rotation_about_z() {
        let rot = rotation_matrix(Angle::degrees(90.), RotationAxis::Z);
        assert_abs_diff_eq!(rot * vector![1., 0., 0.], vector![0., -1., 0.], epsilon = 1e-15);
        assert_abs_diff_eq!(rot * vector![0., 1., 0.], vector![1., 0., 0.], epsilon = 1e-15);
    }

    #[test]
    fn equator_on_landmarks() {
        let sub_observer = latlon_to_cartesian_equator_on(Angle::degrees(0.), Angle::degrees(0.));
        assert_abs_diff_eq!(sub_observer, vector![0., 0., 1.], epsilon = 1e-15);

        let north_pole = latlon_to_cartesian_equator_on(Angle::degrees(90.), Angle::degrees(0.));
        assert_abs_diff_eq!(north_pole, vector![0., 1., 0.], epsilon = 1e-15);

        let east_limb = latlon_to_cartesian_equator_on(Angle::degrees(0.), Angle::degrees(90.));
        assert_abs_diff_eq!(east_limb, vector![1., 0., 0.], epsilon = 1e-15);
    }

    #[test]
    fn equator_on_closed_form() {
        let (lat, lon) = (Angle::degrees(23.), Angle::degrees(-141.));
        let position = latlon_to_cartesian_equator_on(lat, lon);
        let (lat, lon): (f64, f64) = (lat.to_radians(), lon.to_radians());
        let expected = vector![lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos()];

        assert_abs_diff_eq!(position, expected, epsilon = 1e-14);
        assert_abs_diff_eq!(position.norm(), 1., epsilon = 1e-14);
    }

    #[test]
    fn pole_on_view() {
        let pole = latlon_to_cartesian(Angle::degrees(90.), Angle::degrees(0.), Angle::degrees(0.));
        assert_abs_diff_eq!(pole, vector![0., 0., 1.], epsilon = 1e-15);
    }

    #[test]
    fn floored_modulo() {
        assert_abs_diff_eq!(rem_floor(7., 5.), 2., epsilon = 1e-15);
        assert_abs_diff_eq!(rem_floor(-1., 5.), 4., epsilon = 1e-15);
        assert_eq!(rem_floor(10., 5.), 0.);
    }
}
