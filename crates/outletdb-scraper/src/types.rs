use serde::Serialize;

/// Placeholder for an address or opening-hours paragraph the listing omits.
pub const NOT_SPECIFIED: &str = "Not specified";

/// One outlet as read off the locator page, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedOutlet {
    pub name: String,
    pub address: String,
    pub operating_hours: String,
    pub waze_link: Option<String>,
    pub google_maps_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ScrapedOutlet {
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
