//! Errors raised by checked constructors and setters.

use thiserror::Error;

/// Violations of the model's input constraints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A spot placed by its sky-plane coordinates lies outside the stellar disk.
    #[error("spot at ({x}, {y}) lies outside the stellar disk of radius {stellar_radius}")]
    OffDisk {
        /// Sky-plane x coordinate.
        x: f64,
        /// Sky-plane y coordinate.
        y: f64,
        /// Radius of the star.
        stellar_radius: f64,
    },
    /// Spot contrast must lie in `(0, 1]`.
    #[error("spot contrast {0} is outside (0, 1]")]
    InvalidContrast(f64),
    /// Rotation period must be positive and finite.
    #[error("rotation period must be positive and finite, got {0}")]
    InvalidRotationPeriod(f64),
    /// Stellar radius must be positive and finite.
    #[error("stellar radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    /// Mean latitude of the active bands must lie in `[0°, 90°)`.
    #[error("mean active latitude {0}° is outside [0°, 90°)")]
    InvalidMeanLatitude(f64),
    /// Width of the active latitude bands must lie in `(0°, 90°]`.
    #[error("active latitude band width {0}° is outside (0°, 90°]")]
    InvalidLatitudeWidth(f64),
}
