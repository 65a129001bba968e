//! Hyperlink extraction
//!
//! Pulls the raw attribute values out of every hyperlink-bearing element:
//! anchors, images, stylesheet/feed links, and scripts. Values are returned
//! exactly as written in the markup; resolution and scope filtering are the
//! scope policy's job.

use scraper::{Html, Selector};

/// Element/attribute pairs that carry hyperlinks, in extraction order
const LINK_SOURCES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("img[src]", "src"),
    ("link[href]", "href"),
    ("script[src]", "src"),
];

/// Extracts every hyperlink attribute value from an HTML document
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for (selector, attr) in LINK_SOURCES {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                links.push(value.to_string());
            }
        }
    }

    links
}
