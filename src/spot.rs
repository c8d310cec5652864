//! Starspots.

use std::fmt::{self, Display};

use nalgebra::Vector3;

use crate::Float;
use crate::error::Error;
use crate::geometry::{Angle, latlon_to_cartesian_equator_on};
use crate::sampling::SunspotSampler;

/// A circular spot fixed on the stellar surface.
///
/// Position and radius are given in stellar radii, in the sky frame described in
/// [`geometry`](crate::geometry). A spot never changes after construction; rotating a
/// [`Star`](crate::Star) moves the star's working copy of the positions instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Spot<F: Float> {
    position: Vector3<F>,
    r: F,
}

impl<F: Float> Spot<F> {
    /// Create a spot at `position` with radius `r`.
    pub fn new(position: Vector3<F>, r: F) -> Self {
        Self { position, r }
    }

    /// Create a spot from explicit Cartesian coordinates.
    pub fn from_xyz(x: F, y: F, z: F, r: F) -> Self {
        Self::new(Vector3::new(x, y, z), r)
    }

    /// Create a spot on the visible hemisphere from its sky-plane coordinates,
    /// with `z = sqrt(stellar_radius² − x² − y²)`.
    ///
    /// The caller must ensure `x² + y² ≤ stellar_radius²`; otherwise `z` is NaN.
    /// Use [`try_from_xy`](Self::try_from_xy) for a checked version.
    pub fn from_xy(x: F, y: F, r: F, stellar_radius: F) -> Self {
        let z = (stellar_radius * stellar_radius - x * x - y * y).sqrt();
        Self::from_xyz(x, y, z, r)
    }

    /// Checked [`from_xy`](Self::from_xy).
    pub fn try_from_xy(x: F, y: F, r: F, stellar_radius: F) -> Result<Self, Error> {
        if x * x + y * y > stellar_radius * stellar_radius {
            return Err(Error::OffDisk {
                x: x.to_f64().unwrap_or(f64::NAN),
                y: y.to_f64().unwrap_or(f64::NAN),
                stellar_radius: stellar_radius.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self::from_xy(x, y, r, stellar_radius))
    }

    /// Create a spot from its latitude and longitude on a star viewed equator-on.
    pub fn from_latlon(latitude: Angle<F>, longitude: Angle<F>, radius: F) -> Self {
        Self::new(latlon_to_cartesian_equator_on(latitude, longitude), radius)
    }

    /// Create a spot at a random position and with a random size following sunspot statistics.
    ///
    /// `mean_latitude` is the mean absolute latitude of the two symmetric active latitude
    /// bands. The drawn radius is scaled by `radius_multiplier`. Fails if the sampler
    /// rejects `mean_latitude`.
    pub fn from_sunspot_distribution<S>(
        sampler: &mut S,
        mean_latitude: Angle<F>,
        radius_multiplier: F,
    ) -> Result<Self, Error>
    where
        S: SunspotSampler<F> + ?Sized,
    {
        let latitude = sampler.draw_latitudes(1, mean_latitude)?[0];
        let longitude = sampler.draw_longitudes(1)[0];
        let radius = sampler.draw_radii(1)[0];

        Ok(Self::from_latlon(latitude, longitude, radius * radius_multiplier))
    }

    /// Position in stellar radii.
    pub fn position(&self) -> &Vector3<F> {
        &self.position
    }

    /// Sky-plane equatorial coordinate.
    pub fn x(&self) -> F {
        self.position.x
    }

    /// Sky-plane coordinate along the rotation axis.
    pub fn y(&self) -> F {
        self.position.y
    }

    /// Coordinate along the line of sight, positive towards the observer.
    pub fn z(&self) -> F {
        self.position.z
    }

    /// Spot radius in stellar radii.
    pub fn r(&self) -> F {
        self.r
    }
}

impl<F: Float> Display for Spot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Spot: x={}, y={}, z={}, r={}>",
            self.x(),
            self.y(),
            self.z(),
            self.r
        )
    }
}
