// src/core/net.rs
//
// Where page HTML comes from: the live site over HTTPS, or a directory of
// saved snapshots for offline runs.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{blocking::Client, Url};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

pub trait PageSource {
    fn load(&mut self, url: &str) -> Result<String>;
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn load(&mut self, url: &str) -> Result<String> {
        let t = std::time::Instant::now();
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status { status: status.as_u16(), url: s!(url) });
        }
        let body = resp.text()?;
        logd!("Net: GET {} → {} bytes in {:?}", url, body.len(), t.elapsed());
        Ok(body)
    }
}

/// Offline snapshots. `https://host/player/X/battles` → `<root>/player/X/battles.html`,
/// query strings folded into the file name (`history?before=1` → `history_before_1.html`).
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, url: &str) -> Result<PathBuf> {
        let parsed = parse_url(url)?;
        let mut rel = parsed.path().trim_matches('/').to_string();
        if rel.is_empty() {
            rel = s!("index");
        }
        if let Some(q) = parsed.query() {
            let q: String = q
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            rel = join!(&rel, "_", &q);
        }
        Ok(self.root.join(Path::new(&join!(&rel, ".html"))))
    }
}

impl PageSource for DirSource {
    fn load(&mut self, url: &str) -> Result<String> {
        let path = self.path_for(url)?;
        if !path.is_file() {
            return Err(Error::MissingPage(path.display().to_string()));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}

pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::Url { url: s!(url), reason: e.to_string() })
}

/// Resolve `href` against the page it was found on.
pub fn resolve_href(base: &str, href: &str) -> Result<String> {
    let base = parse_url(base)?;
    base.join(href)
        .map(|u| u.to_string())
        .map_err(|e| Error::Url { url: s!(href), reason: e.to_string() })
}
