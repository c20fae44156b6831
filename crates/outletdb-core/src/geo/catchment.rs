use super::distance::{distance_km, rank_from_reference, validate_radius, Reach};
use super::{Coordinates, GeoError, OutletWithDistance, OutletWithIntersections};
use crate::Outlet;

/// Radius in kilometers of the circular service area around every outlet.
///
/// Two catchments of the same radius overlap when their centers are at most
/// twice the radius apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchmentRadius(f64);

impl CatchmentRadius {
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidRadius`] if `radius_km` is negative or not finite.
    pub fn new(radius_km: f64) -> Result<Self, GeoError> {
        validate_radius(radius_km).map(Self)
    }

    #[must_use]
    pub fn km(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn intersects(self, distance_km: f64) -> bool {
        distance_km <= 2.0 * self.0
    }
}

/// For every locatable outlet, the ids of the outlets whose catchment overlaps
/// its own.
///
/// Outlets with no overlaps are omitted. Results follow input order, and each
/// `intersects_with` list follows input order too.
///
/// # Errors
///
/// Returns [`GeoError::InvalidRadius`] if `catchment_radius_km` is negative or
/// not finite.
pub fn all_intersections(
    outlets: &[Outlet],
    catchment_radius_km: f64,
) -> Result<Vec<OutletWithIntersections>, GeoError> {
    let radius = CatchmentRadius::new(catchment_radius_km)?;

    let located: Vec<(&Outlet, Coordinates)> = outlets
        .iter()
        .filter_map(|o| o.coordinates().map(|c| (o, c)))
        .collect();

    // Each unordered pair is measured once and recorded on both sides.
    let mut partners: Vec<Vec<i64>> = vec![Vec::new(); located.len()];
    for (i, &(a, at_a)) in located.iter().enumerate() {
        for (j, &(b, at_b)) in located.iter().enumerate().skip(i + 1) {
            if a.id == b.id {
                continue;
            }
            if radius.intersects(distance_km(at_a, at_b)) {
                partners[i].push(b.id);
                partners[j].push(a.id);
            }
        }
    }

    Ok(located
        .into_iter()
        .zip(partners)
        .filter(|(_, ids)| !ids.is_empty())
        .map(|((outlet, _), intersects_with)| OutletWithIntersections {
            outlet: outlet.clone(),
            intersects_with,
        })
        .collect())
}

/// Outlets whose catchment overlaps that of `reference_id`, nearest first.
///
/// # Errors
///
/// Returns [`GeoError::InvalidRadius`] for a bad radius, [`GeoError::NotFound`]
/// if no outlet has `reference_id`, or [`GeoError::MissingCoordinates`] if
/// that outlet is not locatable.
pub fn catchment_of(
    reference_id: i64,
    outlets: &[Outlet],
    radius_km: f64,
) -> Result<Vec<OutletWithDistance>, GeoError> {
    let radius = CatchmentRadius::new(radius_km)?;
    rank_from_reference(reference_id, outlets, Reach::Catchment(radius))
}
