//! Offline geospatial queries over the stored outlets.

use clap::Subcommand;
use outletdb_core::{Coordinates, Outlet, OutletWithDistance, OutletWithIntersections};

#[derive(Debug, Subcommand)]
pub enum GeoCommands {
    /// Outlets within a radius of a point, nearest first
    Nearby {
        /// Reference latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Reference longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in kilometers
        #[arg(long, default_value_t = 5.0)]
        radius: f64,
    },
    /// Distance from one outlet to every other locatable outlet
    Distances {
        #[arg(long)]
        outlet_id: i64,
    },
    /// Every outlet whose catchment overlaps another
    Intersecting {
        /// Catchment radius in kilometers
        #[arg(long, default_value_t = 5.0)]
        catchment_radius: f64,
    },
    /// Outlets whose catchment overlaps that of one outlet
    Catchment {
        #[arg(long)]
        outlet_id: i64,
        /// Catchment radius in kilometers
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
    },
}

/// Load the outlet snapshot and run one geo query, printing one line per result.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the query parameters
/// are rejected.
pub(crate) async fn run_geo(pool: &sqlx::PgPool, command: GeoCommands) -> anyhow::Result<()> {
    let snapshot: Vec<Outlet> = outletdb_db::list_all_outlets(pool)
        .await?
        .into_iter()
        .map(Outlet::from)
        .collect();
    tracing::debug!(outlets = snapshot.len(), "loaded outlet snapshot");

    match command {
        GeoCommands::Nearby { lat, lng, radius } => {
            let reference = Coordinates::new(lat, lng)?;
            let results = outletdb_core::nearby(reference, &snapshot, radius)?;
            print_distances(&results);
        }
        GeoCommands::Distances { outlet_id } => {
            let results = outletdb_core::distances_from(outlet_id, &snapshot)?;
            print_distances(&results);
        }
        GeoCommands::Intersecting { catchment_radius } => {
            let results = outletdb_core::all_intersections(&snapshot, catchment_radius)?;
            print_intersections(&results);
        }
        GeoCommands::Catchment { outlet_id, radius } => {
            let results = outletdb_core::catchment_of(outlet_id, &snapshot, radius)?;
            print_distances(&results);
        }
    }

    Ok(())
}

fn print_distances(results: &[OutletWithDistance]) {
    if results.is_empty() {
        println!("no outlets found");
        return;
    }
    println!("{:<8}{:>10}  NAME", "ID", "KM");
    for r in results {
        println!("{:<8}{:>10.3}  {}", r.outlet.id, r.distance_km, r.outlet.name);
    }
}

fn print_intersections(results: &[OutletWithIntersections]) {
    if results.is_empty() {
        println!("no intersecting catchments");
        return;
    }
    println!("{:<8}{:<40}INTERSECTS WITH", "ID", "NAME");
    for r in results {
        let ids = r
            .intersects_with
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<8}{:<40}{ids}", r.outlet.id, truncate(&r.outlet.name, 38));
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_owned()
    }
}
