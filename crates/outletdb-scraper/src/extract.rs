//! Outlet extraction from the store-locator listing markup.
//!
//! Each outlet is a `div.fp_listitem` carrying `data-latitude` and
//! `data-longitude` attributes, an `h4` name, a `div.infoboxcontent` whose
//! paragraphs hold the address (first) and opening hours (third), and a
//! `div.directionButton` with Google Maps and Waze links told apart by their
//! Font Awesome icon.

use scraper::{ElementRef, Html, Selector};

use crate::types::{ScrapedOutlet, NOT_SPECIFIED};

struct ListingSelectors {
    item: Selector,
    heading: Selector,
    info: Selector,
    paragraph: Selector,
    direction_link: Selector,
    google_icon: Selector,
    waze_icon: Selector,
}

impl ListingSelectors {
    fn new() -> Self {
        // All selectors are string literals; parsing cannot fail.
        let parse = |css: &str| Selector::parse(css).expect("static CSS selector");
        Self {
            item: parse("div.fp_listitem"),
            heading: parse("h4"),
            info: parse("div.infoboxcontent"),
            paragraph: parse("p"),
            direction_link: parse("div.directionButton a"),
            google_icon: parse("i.fa-location-dot"),
            waze_icon: parse("i.fa-waze"),
        }
    }
}

/// Extract every visible outlet from a locator page, in document order.
///
/// Hidden items (inline `display: none`) and items without an `h4` name are
/// skipped. Missing or unparsable coordinates become `None`.
#[must_use]
pub fn extract_outlets(html: &str) -> Vec<ScrapedOutlet> {
    let selectors = ListingSelectors::new();
    let document = Html::parse_document(html);

    let outlets: Vec<ScrapedOutlet> = document
        .select(&selectors.item)
        .filter_map(|item| extract_item(item, &selectors))
        .collect();

    tracing::debug!(count = outlets.len(), "extracted outlets from listing");
    outlets
}

/// Keep outlets whose address mentions `area`, ignoring case.
///
/// A blank `area` keeps everything.
#[must_use]
pub fn filter_by_area(outlets: Vec<ScrapedOutlet>, area: &str) -> Vec<ScrapedOutlet> {
    let needle = area.trim().to_lowercase();
    if needle.is_empty() {
        return outlets;
    }
    outlets
        .into_iter()
        .filter(|o| o.address.to_lowercase().contains(&needle))
        .collect()
}

fn extract_item(item: ElementRef<'_>, selectors: &ListingSelectors) -> Option<ScrapedOutlet> {
    if is_hidden(item) {
        return None;
    }

    let name = item.select(&selectors.heading).next().map(element_text)?;

    let paragraphs: Vec<String> = item
        .select(&selectors.info)
        .next()
        .map(|info| info.select(&selectors.paragraph).map(element_text).collect())
        .unwrap_or_default();
    let address = paragraphs
        .first()
        .cloned()
        .unwrap_or_else(|| NOT_SPECIFIED.to_owned());
    let operating_hours = paragraphs
        .get(2)
        .cloned()
        .unwrap_or_else(|| NOT_SPECIFIED.to_owned());

    let mut google_maps_link = None;
    let mut waze_link = None;
    for link in item.select(&selectors.direction_link) {
        let Some(href) = link
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty())
        else {
            continue;
        };
        if link.select(&selectors.google_icon).next().is_some() {
            google_maps_link = Some(href.to_owned());
        } else if link.select(&selectors.waze_icon).next().is_some() {
            waze_link = Some(href.to_owned());
        }
    }

    Some(ScrapedOutlet {
        name,
        address,
        operating_hours,
        waze_link,
        google_maps_link,
        latitude: coordinate_attr(item, "data-latitude"),
        longitude: coordinate_attr(item, "data-longitude"),
    })
}

fn is_hidden(item: ElementRef<'_>) -> bool {
    item.value().attr("style").is_some_and(|style| {
        style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .contains("display:none")
    })
}

fn coordinate_attr(item: ElementRef<'_>, attr: &str) -> Option<f64> {
    item.value()
        .attr(attr)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISIBLE_OUTLET_HTML: &str = r#"
<div class="fp_listitem fp_list_marker2" data-latitude="3.128099" data-longitude="101.678678" style="order: 1;">
    <div class="location_left">
        <h4>Subway Menara UOA Bangsar</h4>
        <div class="infoboxcontent">
            <p>Jalan Bangsar Utama 1, Unit 1-2-G, Menara UOA Bangsar, Kuala Lumpur, 59000</p>
            <p></p>
            <p>Monday - Sunday, 8:00 AM - 8:00 PM</p>
            <p></p>
            <p class="infoboxlink"><a href="/find-a-subway" title="Subway Menara UOA Bangsar">Find out more...</a></p>
        </div>
        <div class="infopointer"></div>
    </div>
    <div class="location_right">
        <div class="directionButton">
            <a target="_blank" href="https://goo.gl/maps/8n6W5Syy3vUAGeQV8">
                <i class="fa-solid fa-location-dot"></i>
            </a>
            <a target="_blank" href="https://www.waze.com/example">
                <i class="fa-brands fa-waze"></i>
            </a>
        </div>
    </div>
</div>
"#;

    const HIDDEN_OUTLET_HTML: &str = r#"
<div class="fp_listitem fp_list_marker29" data-latitude="3.067989" data-longitude="101.489526" style="order: 145; display: none;">
    <div class="location_left">
        <h4>Subway SS7</h4>
        <div class="infoboxcontent">
            <p>#15G Jalan Plumbum R7/R, Pusat Komersial Seksyen 7, Shah Alam, 40000</p>
            <p></p>
            <p>Monday - Sunday, 8:00 AM - 9:30 PM</p>
        </div>
    </div>
    <div class="location_right">
        <div class="directionButton">
            <a target="_blank" href="https://goo.gl/maps/example">
                <i class="fa-solid fa-location-dot"></i>
            </a>
        </div>
    </div>
</div>
"#;

    fn scraped(name: &str, address: &str) -> ScrapedOutlet {
        ScrapedOutlet {
            name: name.to_owned(),
            address: address.to_owned(),
            operating_hours: NOT_SPECIFIED.to_owned(),
            waze_link: None,
            google_maps_link: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn extracts_visible_outlet() {
        let outlets = extract_outlets(VISIBLE_OUTLET_HTML);
        assert_eq!(outlets.len(), 1);
        let outlet = &outlets[0];

        assert_eq!(outlet.name, "Subway Menara UOA Bangsar");
        assert_eq!(
            outlet.address,
            "Jalan Bangsar Utama 1, Unit 1-2-G, Menara UOA Bangsar, Kuala Lumpur, 59000"
        );
        assert_eq!(outlet.operating_hours, "Monday - Sunday, 8:00 AM - 8:00 PM");
        assert_eq!(
            outlet.google_maps_link.as_deref(),
            Some("https://goo.gl/maps/8n6W5Syy3vUAGeQV8")
        );
        assert_eq!(outlet.waze_link.as_deref(), Some("https://www.waze.com/example"));
        assert_eq!(outlet.latitude, Some(3.128_099));
        assert_eq!(outlet.longitude, Some(101.678_678));
    }

    #[test]
    fn skips_hidden_outlet() {
        assert!(extract_outlets(HIDDEN_OUTLET_HTML).is_empty());
    }

    #[test]
    fn extracts_only_visible_outlets() {
        let html = format!("{VISIBLE_OUTLET_HTML}{HIDDEN_OUTLET_HTML}");
        let outlets = extract_outlets(&html);
        assert_eq!(outlets.len(), 1);
        assert_eq!(outlets[0].name, "Subway Menara UOA Bangsar");
    }

    #[test]
    fn missing_optional_data_gets_defaults() {
        let html = r#"
        <div class="fp_listitem fp_list_marker2" data-latitude="3.128099" style="order: 1;">
            <div class="location_left">
                <h4>Test Outlet</h4>
                <div class="infoboxcontent">
                    <p>Test Address</p>
                </div>
            </div>
            <div class="location_right">
                <div class="directionButton">
                </div>
            </div>
        </div>
        "#;
        let outlets = extract_outlets(html);
        assert_eq!(outlets.len(), 1);
        let outlet = &outlets[0];

        assert_eq!(outlet.name, "Test Outlet");
        assert_eq!(outlet.address, "Test Address");
        assert_eq!(outlet.operating_hours, NOT_SPECIFIED);
        assert!(outlet.google_maps_link.is_none());
        assert!(outlet.waze_link.is_none());
        assert_eq!(outlet.latitude, Some(3.128_099));
        assert!(outlet.longitude.is_none());
        assert!(!outlet.has_coordinates());
    }

    #[test]
    fn missing_info_box_defaults_address() {
        let html = r#"<div class="fp_listitem"><h4>  Bare Outlet </h4></div>"#;
        let outlets = extract_outlets(html);
        assert_eq!(outlets.len(), 1);
        assert_eq!(outlets[0].name, "Bare Outlet");
        assert_eq!(outlets[0].address, NOT_SPECIFIED);
        assert_eq!(outlets[0].operating_hours, NOT_SPECIFIED);
    }

    #[test]
    fn invalid_coordinates_become_none() {
        let html = r#"
        <div class="fp_listitem fp_list_marker2" data-latitude="invalid" data-longitude="NaN" style="order: 1;">
            <div class="location_left">
                <h4>Test Outlet</h4>
                <div class="infoboxcontent"><p>Test Address</p></div>
            </div>
        </div>
        "#;
        let outlets = extract_outlets(html);
        assert_eq!(outlets.len(), 1);
        assert!(outlets[0].latitude.is_none());
        assert!(outlets[0].longitude.is_none());
    }

    #[test]
    fn items_without_heading_are_skipped() {
        let html =
            r#"<div class="fp_listitem"><div class="infoboxcontent"><p>Somewhere</p></div></div>"#;
        assert!(extract_outlets(html).is_empty());
    }

    #[test]
    fn empty_html_yields_nothing() {
        assert!(extract_outlets("").is_empty());
    }

    #[test]
    fn html_without_listing_yields_nothing() {
        assert!(extract_outlets("<div>No outlets here</div>").is_empty());
    }

    #[test]
    fn filter_by_area_is_case_insensitive() {
        let outlets = vec![
            scraped("Subway Bangsar", "Jalan Bangsar, KUALA LUMPUR, 59000"),
            scraped("Subway SS7", "Pusat Komersial Seksyen 7, Shah Alam, 40000"),
        ];
        let kept = filter_by_area(outlets, "kuala lumpur");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Subway Bangsar");
    }

    #[test]
    fn filter_by_blank_area_keeps_everything() {
        let outlets = vec![scraped("A", "Shah Alam"), scraped("B", "Kuala Lumpur")];
        assert_eq!(filter_by_area(outlets, "  ").len(), 2);
    }
}
