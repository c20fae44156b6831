//! Trust validation for scrape results.
//!
//! A refresh replaces the whole `outlets` table, so a broken page (markup
//! change, bot challenge, empty listing) must be caught before it is written.

use crate::types::ScrapedOutlet;

/// Validate whether a scrape result is trusted enough to replace stored data.
///
/// # Errors
///
/// Returns `Err` with a human-readable reason when the scrape is empty or
/// fewer than half of its outlets carry both coordinates.
pub fn validate_scrape_trust(outlets: &[ScrapedOutlet]) -> Result<(), String> {
    if outlets.is_empty() {
        return Err("scrape returned zero outlets".to_string());
    }

    let located = outlets.iter().filter(|o| o.has_coordinates()).count();
    if located * 2 < outlets.len() {
        return Err(format!(
            "only {located} of {} outlets have coordinates",
            outlets.len()
        ));
    }

    Ok(())
}
