use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use outletdb_db::NewOutlet;
use tower::ServiceExt;

use super::*;
use crate::api::build_app;
use crate::middleware::RateLimitState;

const KL_SENTRAL: (f64, f64) = (3.1334, 101.6869);
const QUILL_CITY: (f64, f64) = (3.1623, 101.7003);
const INTERMARK: (f64, f64) = (3.1614, 101.7199);

fn new_outlet(name: &str, position: Option<(f64, f64)>) -> NewOutlet {
    NewOutlet {
        name: name.to_string(),
        address: format!("{name}, Kuala Lumpur"),
        operating_hours: Some("8:00 AM - 10:00 PM".to_string()),
        waze_link: None,
        google_maps_link: None,
        latitude: position.map(|p| p.0),
        longitude: position.map(|p| p.1),
    }
}

/// Seeds three locatable outlets and one without coordinates, returning
/// their ids in insertion order.
async fn seed_outlets(pool: &sqlx::PgPool) -> Vec<i64> {
    let outlets = vec![
        new_outlet("Subway KL Sentral", Some(KL_SENTRAL)),
        new_outlet("Subway Quill City Mall", Some(QUILL_CITY)),
        new_outlet("Subway Intermark", Some(INTERMARK)),
        new_outlet("Subway Unmapped", None),
    ];
    outletdb_db::replace_all_outlets(pool, &outlets)
        .await
        .expect("seed outlets");
    outletdb_db::list_all_outlets(pool)
        .await
        .expect("list outlets")
        .into_iter()
        .map(|row| row.id)
        .collect()
}

async fn get_json(pool: sqlx::PgPool, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = build_app(
        AppState { pool },
        RateLimitState::new(120, Duration::from_secs(60)),
    );
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

fn ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 100);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(10_000)), 500);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn geo_errors_map_to_api_codes() {
    let cases = [
        (GeoError::NotFound(9), StatusCode::NOT_FOUND),
        (GeoError::MissingCoordinates(4), StatusCode::BAD_REQUEST),
        (GeoError::InvalidRadius(-1.0), StatusCode::BAD_REQUEST),
        (
            GeoError::InvalidCoordinates {
                latitude: 95.0,
                longitude: 0.0,
            },
            StatusCode::BAD_REQUEST,
        ),
    ];
    for (error, expected) in cases {
        let response = map_geo_error("req-1".to_string(), &error).into_response();
        assert_eq!(response.status(), expected, "{error}");
    }
}

#[test]
fn missing_coordinates_uses_distinct_code() {
    let api_error = map_geo_error("req-1".to_string(), &GeoError::MissingCoordinates(4));
    assert_eq!(api_error.error.code, "missing_coordinates");
    assert_eq!(api_error.error.message, "outlet 4 has no coordinates");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_outlets_returns_wire_fields(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;
    let (status, json) = get_json(pool, "/api/v1/outlets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), seeded);
    let first = &json["data"][0];
    assert_eq!(first["name"], "Subway KL Sentral");
    assert_eq!(first["lat"].as_f64(), Some(KL_SENTRAL.0));
    assert_eq!(first["lng"].as_f64(), Some(KL_SENTRAL.1));
    assert!(first.get("longitude").is_none());
    assert!(json["data"][3]["lat"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_outlets_paginates_and_validates_skip(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;
    let (status, json) = get_json(pool.clone(), "/api/v1/outlets?skip=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), seeded[1..3].to_vec());

    let (status, json) = get_json(pool, "/api/v1/outlets?skip=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_requires_non_empty_query(pool: sqlx::PgPool) {
    seed_outlets(&pool).await;
    let (status, json) = get_json(pool.clone(), "/api/v1/outlets/search?query=quill").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));

    let (status, json) = get_json(pool, "/api/v1/outlets/search?query=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_outlet_returns_404_for_unknown_id(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;
    let (status, json) = get_json(pool.clone(), &format!("/api/v1/outlets/{}", seeded[1])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Subway Quill City Mall");

    let (status, json) = get_json(pool, "/api/v1/outlets/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn nearby_returns_sorted_distances(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;
    let uri = format!(
        "/api/v1/outlets/nearby?lat={}&lng={}&radius=4",
        QUILL_CITY.0, QUILL_CITY.1
    );
    let (status, json) = get_json(pool, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![seeded[1], seeded[2], seeded[0]]);
    assert_eq!(json["data"][0]["distance"].as_f64(), Some(0.0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn nearby_rejects_bad_parameters(pool: sqlx::PgPool) {
    let (status, json) = get_json(
        pool.clone(),
        "/api/v1/outlets/nearby?lat=3.1&lng=101.6&radius=-1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, _) = get_json(pool.clone(), "/api/v1/outlets/nearby?lat=95&lng=101.6").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get_json(pool, "/api/v1/outlets/nearby?lat=3.1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn intersecting_lists_symmetric_pairs(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;
    let (status, json) = get_json(
        pool.clone(),
        "/api/v1/outlets/intersecting?catchment_radius=1.2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![seeded[1], seeded[2]]);
    assert_eq!(json["data"][0]["intersects_with"], serde_json::json!([seeded[2]]));
    assert_eq!(json["data"][1]["intersects_with"], serde_json::json!([seeded[1]]));

    let (status, json) = get_json(pool, "/api/v1/outlets/intersecting?catchment_radius=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../migrations")]
async fn catchment_reports_reference_errors(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;

    let (status, json) = get_json(
        pool.clone(),
        &format!("/api/v1/outlets/catchment?outlet_id={}&radius=2", seeded[1]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![seeded[2], seeded[0]]);

    let (status, json) = get_json(pool.clone(), "/api/v1/outlets/catchment?outlet_id=9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");

    let (status, json) = get_json(
        pool,
        &format!("/api/v1/outlets/catchment?outlet_id={}", seeded[3]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "missing_coordinates");
}

#[sqlx::test(migrations = "../../migrations")]
async fn distances_exclude_reference(pool: sqlx::PgPool) {
    let seeded = seed_outlets(&pool).await;
    let (status, json) = get_json(
        pool.clone(),
        &format!("/api/v1/outlets/distance/{}", seeded[0]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![seeded[1], seeded[2]]);

    let (status, json) = get_json(pool, &format!("/api/v1/outlets/distance/{}", seeded[3])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "missing_coordinates");
}
