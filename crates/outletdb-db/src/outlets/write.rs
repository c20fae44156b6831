//! Write operations for the `outlets` table.

use sqlx::PgPool;

use super::types::NewOutlet;

/// Replace the whole table with `outlets`.
///
/// Runs `DELETE` and a single `INSERT … SELECT * FROM UNNEST(…)` in one
/// transaction, so readers see either the old snapshot or the new one. Any
/// failure rolls back and leaves the old rows in place.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if either statement or the commit fails.
pub async fn replace_all_outlets(pool: &PgPool, outlets: &[NewOutlet]) -> Result<u64, sqlx::Error> {
    let mut names: Vec<String> = Vec::with_capacity(outlets.len());
    let mut addresses: Vec<String> = Vec::with_capacity(outlets.len());
    let mut operating_hours: Vec<Option<String>> = Vec::with_capacity(outlets.len());
    let mut waze_links: Vec<Option<String>> = Vec::with_capacity(outlets.len());
    let mut google_maps_links: Vec<Option<String>> = Vec::with_capacity(outlets.len());
    let mut latitudes: Vec<Option<f64>> = Vec::with_capacity(outlets.len());
    let mut longitudes: Vec<Option<f64>> = Vec::with_capacity(outlets.len());

    for outlet in outlets {
        names.push(outlet.name.clone());
        addresses.push(outlet.address.clone());
        operating_hours.push(outlet.operating_hours.clone());
        waze_links.push(outlet.waze_link.clone());
        google_maps_links.push(outlet.google_maps_link.clone());
        latitudes.push(outlet.latitude);
        longitudes.push(outlet.longitude);
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM outlets").execute(&mut *tx).await?;

    let inserted = if outlets.is_empty() {
        0
    } else {
        sqlx::query(
            "INSERT INTO outlets \
                 (name, address, operating_hours, waze_link, google_maps_link, latitude, longitude) \
             SELECT * FROM UNNEST(\
                 $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], \
                 $6::float8[], $7::float8[])",
        )
        .bind(&names)
        .bind(&addresses)
        .bind(&operating_hours)
        .bind(&waze_links)
        .bind(&google_maps_links)
        .bind(&latitudes)
        .bind(&longitudes)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    };

    tx.commit().await?;
    Ok(inserted)
}
