//! Geospatial queries over an in-memory snapshot of outlets.
//!
//! Everything here is a pure function of the records and parameters passed
//! in. Outlets without a usable coordinate pair are skipped silently unless
//! they are the reference of the query, in which case the call fails with
//! [`GeoError::MissingCoordinates`].

mod catchment;
mod distance;

use serde::Serialize;
use thiserror::Error;

use crate::Outlet;

pub use catchment::{all_intersections, catchment_of, CatchmentRadius};
pub use distance::{distance_km, distances_from, nearby};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("outlet {0} not found")]
    NotFound(i64),
    #[error("outlet {0} has no coordinates")]
    MissingCoordinates(i64),
    #[error("radius must be a finite, non-negative number of kilometers (got {0})")]
    InvalidRadius(f64),
    #[error("coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinates`] unless latitude is within
    /// `[-90, 90]` and longitude within `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(GeoError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    #[must_use]
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(self) -> f64 {
        self.longitude
    }
}

/// An outlet annotated with its distance from a reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutletWithDistance {
    #[serde(flatten)]
    pub outlet: Outlet,
    #[serde(rename = "distance")]
    pub distance_km: f64,
}

/// An outlet together with the ids of every outlet whose catchment overlaps its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutletWithIntersections {
    #[serde(flatten)]
    pub outlet: Outlet,
    pub intersects_with: Vec<i64>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;

    use crate::Outlet;

    pub(crate) const KL_SENTRAL: (f64, f64) = (3.1334, 101.6869);
    pub(crate) const QUILL_CITY: (f64, f64) = (3.1623, 101.7003);
    pub(crate) const INTERMARK: (f64, f64) = (3.1614, 101.7199);

    pub(crate) fn outlet(id: i64, position: Option<(f64, f64)>) -> Outlet {
        Outlet {
            id,
            name: format!("Outlet {id}"),
            address: format!("{id} Jalan Test, Kuala Lumpur"),
            operating_hours: None,
            waze_link: None,
            google_maps_link: None,
            latitude: position.map(|p| p.0),
            longitude: position.map(|p| p.1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Three central Kuala Lumpur outlets plus one with no coordinates.
    pub(crate) fn kl_outlets() -> Vec<Outlet> {
        vec![
            outlet(1, Some(KL_SENTRAL)),
            outlet(2, Some(QUILL_CITY)),
            outlet(3, Some(INTERMARK)),
            outlet(4, None),
        ]
    }
}
