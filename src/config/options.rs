// src/config/options.rs
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    /// Tracked player tag, normalized (no '#', uppercase).
    pub tag: String,
    pub base_url: String,
    /// Upper bound on the accumulated collection.
    pub cap: usize,
    /// Inventory entries below this level are left out of the report. 0 keeps all.
    pub min_card_level: u32,
    pub stability: StabilityOptions,
    pub loader: LoaderOptions,
    pub scroll: ScrollOptions,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            tag: s!(),
            base_url: s!(BASE_URL),
            cap: DEFAULT_CAP,
            min_card_level: 0,
            stability: StabilityOptions::default(),
            loader: LoaderOptions::default(),
            scroll: ScrollOptions::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityOptions {
    pub poll_ms: u64,
    pub quiet_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self { poll_ms: STABLE_POLL_MS, quiet_ms: STABLE_QUIET_MS, max_wait_ms: STABLE_MAX_WAIT_MS }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub poll_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { poll_ms: LOADER_POLL_MS, max_wait_ms: LOADER_MAX_WAIT_MS }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    pub step_px: f64,
    pub step_delay_ms: u64,
    pub budget_ms: u64,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self { step_px: SCROLL_STEP_PX, step_delay_ms: SCROLL_DELAY_MS, budget_ms: CONVERGE_BUDGET_MS }
    }
}

impl FlowOptions {
    pub fn with_tag(tag: &str) -> Self {
        Self { tag: normalize_tag(tag), ..Self::default() }
    }

    /// Read a TOML file; missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut opts: FlowOptions = toml::from_str(text)?;
        opts.tag = normalize_tag(&opts.tag);
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tag.is_empty() {
            return Err(Error::Config(s!("player tag is empty")));
        }
        if self.cap == 0 {
            return Err(Error::Config(s!("cap must be at least 1")));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!("base URL must be http(s): {}", self.base_url)));
        }
        Ok(())
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn cards_path(&self) -> String {
        CARDS_PATH_TMPL.replace("{tag}", &self.tag)
    }

    pub fn battles_path(&self) -> String {
        BATTLES_PATH_TMPL.replace("{tag}", &self.tag)
    }

    pub fn root_url(&self) -> String {
        join!(self.base(), "/")
    }

    pub fn cards_url(&self) -> String {
        join!(self.base(), &self.cards_path())
    }

    pub fn battles_url(&self) -> String {
        join!(self.base(), &self.battles_path())
    }
}

/// Trim, drop a leading '#', uppercase.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().trim_start_matches('#').to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_normalized() {
        assert_eq!(normalize_tag("  #abc123 "), "ABC123");
        assert_eq!(FlowOptions::with_tag("#q2").tag, "Q2");
    }

    #[test]
    fn urls_follow_templates() {
        let mut o = FlowOptions::with_tag("P0LYJC8");
        o.base_url = s!("https://example.test/");
        assert_eq!(o.root_url(), "https://example.test/");
        assert_eq!(o.cards_url(), "https://example.test/player/P0LYJC8/cards/levels");
        assert_eq!(o.battles_url(), "https://example.test/player/P0LYJC8/battles");
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let o = FlowOptions::from_toml_str("tag = \"#ab\"\ncap = 12\n[stability]\nquiet_ms = 500\n").unwrap();
        assert_eq!(o.tag, "AB");
        assert_eq!(o.cap, 12);
        assert_eq!(o.stability.quiet_ms, 500);
        assert_eq!(o.stability.poll_ms, STABLE_POLL_MS);
        assert_eq!(o.loader, LoaderOptions::default());
    }

    #[test]
    fn validate_rejects_empty_tag_and_zero_cap() {
        assert!(FlowOptions::default().validate().is_err());
        let mut o = FlowOptions::with_tag("AB");
        assert!(o.validate().is_ok());
        o.cap = 0;
        assert!(o.validate().is_err());
    }
}
