// src/specs/history.rs
//
// Continuation handle: the "older battles" link at the bottom of a battles page.

use scraper::Html;

use crate::config::consts::HISTORY_LINK_MARKER;
use crate::core::html::attr;
use crate::core::net::resolve_href;

/// Absolute URL of the next history page, or `None` when the history ends here.
pub fn next_history_url(html: &str, page_url: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let href = doc
        .select(selector!(r#"a[href*="/battles/history?before="]"#))
        .filter_map(|a| attr(a, "href"))
        .find(|h| h.contains(HISTORY_LINK_MARKER))?;

    match resolve_href(page_url, href) {
        Ok(url) => Some(url),
        Err(e) => {
            logw!("History: unusable link {:?} on {}: {}", href, page_url, e);
            None
        }
    }
}
