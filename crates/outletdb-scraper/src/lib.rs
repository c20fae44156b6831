pub mod client;
pub mod error;
pub mod extract;
mod retry;
pub mod trust;
pub mod types;

pub use client::LocatorClient;
pub use error::ScraperError;
pub use extract::{extract_outlets, filter_by_area};
pub use trust::validate_scrape_trust;
pub use types::{ScrapedOutlet, NOT_SPECIFIED};
