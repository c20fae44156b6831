//! Read operations for the `outlets` table.

use sqlx::PgPool;

use super::types::OutletRow;

const OUTLET_COLUMNS: &str = "id, name, address, operating_hours, waze_link, google_maps_link, \
                              latitude, longitude, created_at, updated_at";

/// Every outlet, ordered by `id ASC`.
///
/// The geo queries work on this full snapshot.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_all_outlets(pool: &PgPool) -> Result<Vec<OutletRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await
}

/// One page of outlets, ordered by `id ASC`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_outlets(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<OutletRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets ORDER BY id ASC OFFSET $1 LIMIT $2"
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_outlet_by_id(pool: &PgPool, id: i64) -> Result<Option<OutletRow>, sqlx::Error> {
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Case-insensitive substring search over `name` and `address`.
///
/// `%`, `_` and `\` in `query` match literally.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_outlets(pool: &PgPool, query: &str) -> Result<Vec<OutletRow>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(query));
    sqlx::query_as::<_, OutletRow>(&format!(
        "SELECT {OUTLET_COLUMNS} FROM outlets \
         WHERE name ILIKE $1 ESCAPE '\\' OR address ILIKE $1 ESCAPE '\\' \
         ORDER BY id ASC"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
