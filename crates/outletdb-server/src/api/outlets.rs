use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use outletdb_core::{Coordinates, GeoError, Outlet, OutletWithDistance, OutletWithIntersections};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;
const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;
const DEFAULT_CATCHMENT_RADIUS_KM: f64 = 5.0;
const DEFAULT_SINGLE_CATCHMENT_RADIUS_KM: f64 = 1.0;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct IntersectingQuery {
    pub catchment_radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CatchmentQuery {
    pub outlet_id: i64,
    pub radius: Option<f64>,
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub(super) fn map_geo_error(request_id: String, error: &GeoError) -> ApiError {
    let code = match error {
        GeoError::NotFound(_) => "not_found",
        GeoError::MissingCoordinates(_) => "missing_coordinates",
        GeoError::InvalidRadius(_) | GeoError::InvalidCoordinates { .. } => "validation_error",
    };
    ApiError::new(request_id, code, error.to_string())
}

fn reject_query(request_id: String, rejection: &QueryRejection) -> ApiError {
    ApiError::new(request_id, "validation_error", rejection.body_text())
}

fn reject_path(request_id: String, rejection: &PathRejection) -> ApiError {
    ApiError::new(request_id, "validation_error", rejection.body_text())
}

fn ok<T: serde::Serialize>(request_id: String, data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(request_id),
    }))
}

/// Full snapshot the geo queries run against.
async fn load_snapshot(state: &AppState, request_id: &str) -> Result<Vec<Outlet>, ApiError> {
    let rows = outletdb_db::list_all_outlets(&state.pool)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &outletdb_db::DbError::from(e)))?;
    Ok(rows.into_iter().map(Outlet::from).collect())
}

pub(super) async fn list_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Outlet>> {
    let Query(query) = query.map_err(|e| reject_query(req_id.0.clone(), &e))?;
    let skip = query.skip.unwrap_or(0);
    if skip < 0 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "skip must be zero or greater",
        ));
    }

    let rows = outletdb_db::list_outlets(&state.pool, skip, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?;

    ok(req_id.0, rows.into_iter().map(Outlet::from).collect())
}

pub(super) async fn search_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Vec<Outlet>> {
    let Query(query) = query.map_err(|e| reject_query(req_id.0.clone(), &e))?;
    let Some(term) = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query must not be empty",
        ));
    };

    let rows = outletdb_db::search_outlets(&state.pool, term)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?;

    ok(req_id.0, rows.into_iter().map(Outlet::from).collect())
}

pub(super) async fn get_outlet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Outlet> {
    let Path(id) = id.map_err(|e| reject_path(req_id.0.clone(), &e))?;

    let row = outletdb_db::get_outlet_by_id(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &outletdb_db::DbError::from(e)))?
        .ok_or_else(|| map_geo_error(req_id.0.clone(), &GeoError::NotFound(id)))?;

    ok(req_id.0, Outlet::from(row))
}

pub(super) async fn nearby_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> ApiResult<Vec<OutletWithDistance>> {
    let Query(query) = query.map_err(|e| reject_query(req_id.0.clone(), &e))?;
    let reference = Coordinates::new(query.lat, query.lng)
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;
    let radius_km = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);

    let snapshot = load_snapshot(&state, &req_id.0).await?;
    let data = outletdb_core::nearby(reference, &snapshot, radius_km)
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    ok(req_id.0, data)
}

pub(super) async fn intersecting_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<IntersectingQuery>, QueryRejection>,
) -> ApiResult<Vec<OutletWithIntersections>> {
    let Query(query) = query.map_err(|e| reject_query(req_id.0.clone(), &e))?;
    let radius_km = query
        .catchment_radius
        .unwrap_or(DEFAULT_CATCHMENT_RADIUS_KM);

    let snapshot = load_snapshot(&state, &req_id.0).await?;
    let data = outletdb_core::all_intersections(&snapshot, radius_km)
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    ok(req_id.0, data)
}

pub(super) async fn catchment_outlets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<CatchmentQuery>, QueryRejection>,
) -> ApiResult<Vec<OutletWithDistance>> {
    let Query(query) = query.map_err(|e| reject_query(req_id.0.clone(), &e))?;
    let radius_km = query.radius.unwrap_or(DEFAULT_SINGLE_CATCHMENT_RADIUS_KM);

    let snapshot = load_snapshot(&state, &req_id.0).await?;
    let data = outletdb_core::catchment_of(query.outlet_id, &snapshot, radius_km)
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    ok(req_id.0, data)
}

pub(super) async fn outlet_distances(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<OutletWithDistance>> {
    let Path(id) = id.map_err(|e| reject_path(req_id.0.clone(), &e))?;

    let snapshot = load_snapshot(&state, &req_id.0).await?;
    let data = outletdb_core::distances_from(id, &snapshot)
        .map_err(|e| map_geo_error(req_id.0.clone(), &e))?;

    ok(req_id.0, data)
}

#[cfg(test)]
#[path = "outlets_test.rs"]
mod tests;
