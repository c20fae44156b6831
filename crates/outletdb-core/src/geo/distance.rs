use std::cmp::Ordering;
use std::sync::LazyLock;

use geographiclib_rs::{Geodesic, InverseGeodesic};

use super::catchment::CatchmentRadius;
use super::{Coordinates, GeoError, OutletWithDistance};
use crate::Outlet;

static WGS84: LazyLock<Geodesic> = LazyLock::new(Geodesic::wgs84);

/// Geodesic distance in kilometers between two points on the WGS-84 ellipsoid.
///
/// The arguments are put in a fixed order before solving, so swapping them
/// yields a bit-identical result.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }
    let (p, q) = match a
        .latitude()
        .total_cmp(&b.latitude())
        .then(a.longitude().total_cmp(&b.longitude()))
    {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };
    let meters: f64 = WGS84.inverse(p.latitude(), p.longitude(), q.latitude(), q.longitude());
    (meters / 1000.0).max(0.0)
}

/// Every locatable outlet within `radius_km` of `reference`, nearest first.
///
/// The boundary is inclusive. Ties keep their input order.
///
/// # Errors
///
/// Returns [`GeoError::InvalidRadius`] if `radius_km` is negative or not finite.
pub fn nearby(
    reference: Coordinates,
    outlets: &[Outlet],
    radius_km: f64,
) -> Result<Vec<OutletWithDistance>, GeoError> {
    let radius_km = validate_radius(radius_km)?;
    Ok(rank_by_distance(reference, outlets, None, |d| d <= radius_km))
}

/// Distance from the outlet `reference_id` to every other locatable outlet,
/// nearest first.
///
/// # Errors
///
/// Returns [`GeoError::NotFound`] if no outlet has `reference_id`, or
/// [`GeoError::MissingCoordinates`] if that outlet is not locatable.
pub fn distances_from(
    reference_id: i64,
    outlets: &[Outlet],
) -> Result<Vec<OutletWithDistance>, GeoError> {
    rank_from_reference(reference_id, outlets, Reach::Unbounded)
}

/// How far from a reference outlet a neighbour may be and still be reported.
#[derive(Debug, Clone, Copy)]
pub(super) enum Reach {
    Unbounded,
    Catchment(CatchmentRadius),
}

impl Reach {
    fn admits(self, distance_km: f64) -> bool {
        match self {
            Reach::Unbounded => true,
            Reach::Catchment(radius) => radius.intersects(distance_km),
        }
    }
}

/// Rank the neighbours of one outlet, excluding the outlet itself.
pub(super) fn rank_from_reference(
    reference_id: i64,
    outlets: &[Outlet],
    reach: Reach,
) -> Result<Vec<OutletWithDistance>, GeoError> {
    let reference = outlets
        .iter()
        .find(|o| o.id == reference_id)
        .ok_or(GeoError::NotFound(reference_id))?;
    let origin = reference
        .coordinates()
        .ok_or(GeoError::MissingCoordinates(reference_id))?;

    Ok(rank_by_distance(origin, outlets, Some(reference_id), |d| {
        reach.admits(d)
    }))
}

pub(super) fn validate_radius(radius_km: f64) -> Result<f64, GeoError> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(GeoError::InvalidRadius(radius_km))
    }
}

fn rank_by_distance(
    origin: Coordinates,
    outlets: &[Outlet],
    exclude_id: Option<i64>,
    admit: impl Fn(f64) -> bool,
) -> Vec<OutletWithDistance> {
    let mut ranked: Vec<OutletWithDistance> = outlets
        .iter()
        .filter(|o| Some(o.id) != exclude_id)
        .filter_map(|o| {
            let distance_km = distance_km(origin, o.coordinates()?);
            admit(distance_km).then(|| OutletWithDistance {
                outlet: o.clone(),
                distance_km,
            })
        })
        .collect();
    // `sort_by` is stable, so equal distances keep input order.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
