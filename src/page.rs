// src/page.rs
//
// The live, scrollable view of a remote page that the scroll driver and the
// stability detector talk to. A browser-backed host implements `LivePage`
// directly; `StaticPage` wraps a plain fetched document.

use scraper::Html;

use crate::config::consts::BATTLE_SELECTOR;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280.0, height: 900.0 }
    }
}

/// On-screen geometry and computed style of the loading indicator,
/// relative to the viewport (like `getBoundingClientRect`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoaderBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub display_none: bool,
    pub visibility_hidden: bool,
    pub opacity: f64,
}

impl LoaderBox {
    pub fn bottom(&self) -> f64 { self.top + self.height }
    pub fn right(&self) -> f64 { self.left + self.width }

    /// Present, sized, inside the viewport and not hidden by style.
    pub fn is_visible(&self, vp: Viewport) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        if self.bottom() < 0.0 || self.top > vp.height {
            return false;
        }
        if self.right() < 0.0 || self.left > vp.width {
            return false;
        }
        !(self.display_none || self.visibility_hidden || self.opacity == 0.0)
    }
}

pub trait LivePage {
    fn url(&self) -> &str;

    /// Current document markup.
    fn html(&self) -> String;

    /// Number of battle entries currently in the document.
    fn record_count(&self) -> usize;

    fn scroll_y(&self) -> f64;
    fn scroll_height(&self) -> f64;
    fn viewport(&self) -> Viewport;
    fn scroll_to(&mut self, y: f64);

    /// The loading indicator, if one exists in the document.
    fn loader(&self) -> Option<LoaderBox>;

    fn loader_visible(&self) -> bool {
        self.loader().is_some_and(|l| l.is_visible(self.viewport()))
    }
}

/// A fully loaded document. Scripts never run, so there is no loader to wait
/// for and all content already fits the viewport.
pub struct StaticPage {
    url: String,
    html: String,
    count: usize,
    viewport: Viewport,
    scroll_y: f64,
}

impl StaticPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let count = count_records(&html);
        Self { url: url.into(), html, count, viewport: Viewport::default(), scroll_y: 0.0 }
    }
}

impl LivePage for StaticPage {
    fn url(&self) -> &str { &self.url }
    fn html(&self) -> String { self.html.clone() }
    fn record_count(&self) -> usize { self.count }
    fn scroll_y(&self) -> f64 { self.scroll_y }
    fn scroll_height(&self) -> f64 { self.viewport.height }
    fn viewport(&self) -> Viewport { self.viewport }
    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, (self.scroll_height() - self.viewport.height).max(0.0));
    }
    fn loader(&self) -> Option<LoaderBox> { None }
}

/// Battle entries in a document.
pub fn count_records(html: &str) -> usize {
    Html::parse_document(html).select(selector!(BATTLE_SELECTOR)).count()
}
