//! Row types for the `outlets` table.

use chrono::{DateTime, Utc};
use outletdb_core::Outlet;

/// Input record for the bulk refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOutlet {
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub waze_link: Option<String>,
    pub google_maps_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A row from the `outlets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutletRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub waze_link: Option<String>,
    pub google_maps_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OutletRow> for Outlet {
    fn from(row: OutletRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            operating_hours: row.operating_hours,
            waze_link: row.waze_link,
            google_maps_link: row.google_maps_link,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
