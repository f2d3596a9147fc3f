//! Outbound share-link construction. Interface only: the engine builds the
//! URLs, the embedding UI opens them or copies the clipboard text.

use url::Url;

use crate::spot::Spot;

/// One share URL per supported platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareLinks {
    pub x: Url,
    pub facebook: Url,
    pub line: Url,
}

pub fn share_links(text: &str, page: &Url) -> ShareLinks {
    let mut x = Url::parse("https://twitter.com/intent/tweet").unwrap();
    x.query_pairs_mut()
        .append_pair("text", text)
        .append_pair("url", page.as_str());

    let mut facebook = Url::parse("https://www.facebook.com/sharer/sharer.php").unwrap();
    facebook.query_pairs_mut().append_pair("u", page.as_str());

    let mut line = Url::parse("https://social-plugins.line.me/lineit/share").unwrap();
    line.query_pairs_mut().append_pair("url", page.as_str());

    ShareLinks { x, facebook, line }
}

/// Deep link to one spot: the app page with the spot's identity and position
/// in the query string.
pub fn spot_permalink(base: &Url, spot: &Spot) -> Url {
    let mut link = base.clone();
    link.query_pairs_mut()
        .append_pair("category", spot.category().as_str())
        .append_pair("id", &spot.id)
        .append_pair("lat", &spot.position.lat.to_string())
        .append_pair("lng", &spot.position.lon.to_string());
    link
}

/// Text handed to the clipboard-copy action.
pub fn clipboard_text(text: &str, page: &Url) -> String {
    format!("{} {}", text, page)
}
