//! Geodetic geometry primitives.
//!
//! Locations live on a spherical Earth. Distances, azimuths and great-circle
//! interpolation are computed on unit vectors and scaled by the mean radius.

mod location;
mod trace;

pub use location::{
    Location, EARTH_RADIUS_KM,
    angular_distance, local_tangent_basis, normalize_azimuth,
};
pub use trace::Trace;
pub(crate) use trace::push_distinct;
