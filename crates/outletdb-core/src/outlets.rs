use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A retail outlet as stored in the `outlets` table.
///
/// Coordinates are kept as two independent optional fields because the
/// scraper can recover one without the other. Use [`Outlet::coordinates`]
/// to get a usable pair.
///
/// On the wire the coordinate fields are named `lat` and `lng`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub waze_link: Option<String>,
    pub google_maps_link: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lng")]
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Outlet {
    /// The outlet's position, if it is locatable.
    ///
    /// Returns `None` when either field is missing, non-finite, or out of
    /// range.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude?, self.longitude?).ok()
    }

    #[must_use]
    pub fn is_locatable(&self) -> bool {
        self.coordinates().is_some()
    }
}
