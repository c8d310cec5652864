#![warn(missing_docs)]

//! Photometric variability of spotted stars. \
//! A star is modelled as a limb-darkened disk carrying circular dark spots fixed on its
//! surface. As the star rotates, spots cross the visible hemisphere and remove flux in
//! proportion to their foreshortened area, the local limb-darkened intensity and their
//! contrast, which produces a synthetic light curve.
//!
//! ## Interface
//! The central struct of this library is [`Star`]. It owns a list of [`Spot`]s, which can be
//! placed by Cartesian coordinates ([`Spot::from_xy()`]), by latitude and longitude
//! ([`Spot::from_latlon()`]), or randomly following sunspot statistics
//! ([`Spot::from_sunspot_distribution()`]). Additional parameters are set via `Star::with_*()`
//! functions.
//!
//! Example:
//! ```rust
//! # use ndarray::Array1;
//! # use starspots::{Angle, Spot, Star};
//! let spot = Spot::from_latlon(Angle::degrees(20.), Angle::degrees(-30.), 0.1);
//! let mut star = Star::new(vec![spot])
//!     .with_limb_darkening(0.4987, 0.1772)
//!     .with_contrast(0.7)
//!     .unwrap();
//!
//! let times = Array1::linspace(0., 25., 100);
//! let light_curve = star.flux(times.view(), 0.);
//! assert!(light_curve.iter().all(|f| *f <= star.unspotted_flux()));
//! ```
//!
//! After constructing the star, there are three options:
//! - Compute the flux of the star in its current orientation ([`Star::instantaneous_flux()`]).
//! - Compute a light curve over a series of times ([`Star::flux()`]).
//! - Rasterize the visible disk into an image ([`Star::compute_image()`]).
//!
//! The latter two can also be executed in parallel.
//!
//! ## Parameters
//! - `u1`, `u2`: Coefficients of the quadratic limb-darkening law.
//! - `r`: Stellar radius. Spot positions and radii are given in the same units.
//! - `rotation_period`: Stellar rotation period, in the same time unit as the times passed to
//!     [`Star::flux()`].
//! - `contrast`: Spot intensity relative to the surrounding photosphere, in `(0, 1]`.
//! - `radius_threshold`: Accepted for compatibility but currently has no effect.

pub mod error;
pub mod geometry;
pub(crate) mod integrate;
pub mod limb_darkening;
pub mod sampling;
pub(crate) mod spot;
pub(crate) mod star;

pub use error::Error;
pub use geometry::Angle;
pub use limb_darkening::QuadraticLimbDarkening;
pub use sampling::{SolarSunspotSampler, SunspotSampler};
pub use spot::Spot;
pub use star::Star;

/// A generic float trait such that the model is generic over `f32`/`f64`.
///
/// This trait is automatically implemented for all types implementing the supertraits.
/// Particularly, this includes `f32` and `f64`.
/// [`num_traits::Float`] is not a supertrait as the need to specify the provider of the redundant definitions of the basic math functions would clutter the code.
pub trait Float:
    Copy + Default + nalgebra::RealField + num_traits::FromPrimitive + num_traits::ToPrimitive
{
}

impl<F> Float for F where
    F: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive + num_traits::ToPrimitive
{
}
