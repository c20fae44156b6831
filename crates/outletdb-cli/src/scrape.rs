//! Scrape pipeline: fetch → extract → area filter → trust guard → refresh.

use std::path::Path;

use anyhow::Context;
use outletdb_scraper::{ScrapedOutlet, NOT_SPECIFIED};

pub(crate) struct ScrapeArgs<'a> {
    pub url: Option<&'a str>,
    pub html_file: Option<&'a Path>,
    pub area: Option<&'a str>,
    pub dry_run: bool,
}

/// Scrape the locator page and replace the stored outlets with the result.
///
/// A scrape that fails the trust guard leaves the table untouched.
///
/// # Errors
///
/// Returns an error if the page cannot be read, the scrape is untrusted, or
/// the refresh fails.
pub(crate) async fn run_scrape(
    config: &outletdb_core::AppConfig,
    args: ScrapeArgs<'_>,
) -> anyhow::Result<()> {
    let html = match args.html_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let url = args.url.unwrap_or(&config.locator_url);
            let client = outletdb_scraper::LocatorClient::new(
                config.scraper_request_timeout_secs,
                &config.scraper_user_agent,
                config.scraper_max_retries,
                config.scraper_retry_backoff_base_secs,
            )?;
            tracing::info!(url, "fetching locator page");
            client
                .fetch_page(url)
                .await
                .with_context(|| format!("failed to fetch locator page {url}"))?
        }
    };

    let extracted = outletdb_scraper::extract_outlets(&html);
    let extracted_count = extracted.len();
    let area = args.area.unwrap_or(&config.locator_area);
    let outlets = outletdb_scraper::filter_by_area(extracted, area);
    tracing::info!(
        extracted = extracted_count,
        kept = outlets.len(),
        area,
        "outlets extracted"
    );

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&outlets)?);
        println!(
            "dry run: {} of {extracted_count} outlets match '{area}'; database not modified",
            outlets.len()
        );
        return Ok(());
    }

    let pool = crate::connect(config).await?;
    let inserted = refresh_outlets(&pool, &outlets, area).await?;
    let located = outlets.iter().filter(|o| o.has_coordinates()).count();

    tracing::info!(inserted, located, "outlets table refreshed");
    println!("refreshed outlets: {inserted} stored, {located} with coordinates");
    Ok(())
}

/// Replace the outlets table with `outlets` if the scrape passes the trust guard.
///
/// An untrusted scrape returns an error before anything is written.
pub(crate) async fn refresh_outlets(
    pool: &sqlx::PgPool,
    outlets: &[ScrapedOutlet],
    area: &str,
) -> anyhow::Result<u64> {
    if let Err(reason) = outletdb_scraper::validate_scrape_trust(outlets) {
        tracing::warn!(area, "scrape rejected: {reason}");
        anyhow::bail!("untrusted scrape result: {reason}; outlets table left unchanged");
    }

    let new_outlets: Vec<outletdb_db::NewOutlet> =
        outlets.iter().map(scraped_to_new_outlet).collect();
    outletdb_db::replace_all_outlets(pool, &new_outlets)
        .await
        .context("failed to refresh outlets table")
}

/// Convert a [`ScrapedOutlet`] to an [`outletdb_db::NewOutlet`].
///
/// Placeholder or blank opening hours are stored as `NULL`.
pub(crate) fn scraped_to_new_outlet(outlet: &ScrapedOutlet) -> outletdb_db::NewOutlet {
    let operating_hours = Some(outlet.operating_hours.trim())
        .filter(|h| !h.is_empty() && *h != NOT_SPECIFIED)
        .map(str::to_owned);

    outletdb_db::NewOutlet {
        name: outlet.name.clone(),
        address: outlet.address.clone(),
        operating_hours,
        waze_link: outlet.waze_link.clone(),
        google_maps_link: outlet.google_maps_link.clone(),
        latitude: outlet.latitude,
        longitude: outlet.longitude,
    }
}
