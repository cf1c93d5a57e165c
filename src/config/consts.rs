// src/config/consts.rs

// Site
pub const BASE_URL: &str = "https://royaleapi.com";
pub const CARDS_PATH_TMPL: &str = "/player/{tag}/cards/levels";
pub const BATTLES_PATH_TMPL: &str = "/player/{tag}/battles";
pub const HISTORY_LINK_MARKER: &str = "/battles/history?before=";
pub const USER_AGENT: &str = "ra_scrape/0.3";
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// Local cache
pub const STORE_DIR: &str = ".store";
pub const SESSION_SUBDIR: &str = "session";
pub const LOG_FILE: &str = "debug.log";

// Session storage keys
pub const KEY_CARDS_TEXT: &str = "ra_cards_text_v1";
pub const KEY_BATTLES_DATA: &str = "ra_battles_data_v1";
pub const KEY_RESUME_META: &str = "ra_battles_resume_v1";
pub const KEY_FLOW_STAGE: &str = "ra_flow_stage_v1";
pub const KEY_FINAL_TEXT: &str = "ra_final_text_v1";

// Collection
pub const DEFAULT_CAP: usize = 30;
pub const MAX_PAGE_LOADS: usize = 64;

// Selectors
pub const BATTLE_SELECTOR: &str = ".battle_list_battle, .battle.battle_list_battle, [id^=\"battle_\"]";
pub const CARD_ITEM_SELECTOR: &str = ".player_card_link.player_card_item, .player_card_item, a.player_card_link";

// Convergence (scroll driver)
pub const SCROLL_STEP_PX: f64 = 800.0;
pub const SCROLL_DELAY_MS: u64 = 250;
pub const SCROLL_SLACK_MS: u64 = 80;
pub const SCROLL_SETTLE_MS: u64 = 350;
pub const LOADER_NUDGE_MS: u64 = 300;
pub const LOADER_RESUME_MS: u64 = 200;
pub const FORCED_SCROLL_MS: u64 = 600;
pub const BOTTOM_TOLERANCE_PX: f64 = 10.0;
pub const CONVERGE_BUDGET_MS: u64 = 20_000;

// Loader indicator
pub const LOADER_POLL_MS: u64 = 300;
pub const LOADER_MAX_WAIT_MS: u64 = 8_000;

// Stability
pub const STABLE_POLL_MS: u64 = 300;
pub const STABLE_QUIET_MS: u64 = 900;
pub const STABLE_MAX_WAIT_MS: u64 = 8_000;

// Inventory
pub const CARDS_WAIT_MS: u64 = 15_000;
pub const CARDS_POLL_MS: u64 = 300;

// Pauses around navigation
pub const PRE_NAV_PAUSE_MS: u64 = 400;
pub const PAGE_SETTLE_MS: u64 = 300;
