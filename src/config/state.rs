// src/config/state.rs
use super::options::FlowOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Report,
    Battles,
    Cards,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Report, Tab::Battles, Tab::Cards];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Report => "Report",
            Tab::Battles => "Battles",
            Tab::Cards => "Opponent cards",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GuiState {
    /// Text fields mirror options until a run parses them.
    pub tag_text: String,
    pub cap_text: String,
    pub min_level_text: String,
    /// Empty = fetch from the network.
    pub offline_dir: String,

    pub window_w: u32,
    pub window_h: u32,

    pub current_tab: Tab,
}

impl GuiState {
    pub fn from_options(opts: &FlowOptions) -> Self {
        Self {
            tag_text: opts.tag.clone(),
            cap_text: opts.cap.to_string(),
            min_level_text: opts.min_card_level.to_string(),
            ..Self::default()
        }
    }
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            tag_text: s!(),
            cap_text: s!(),
            min_level_text: s!(),
            offline_dir: s!(),
            window_w: 1100,
            window_h: 700,
            current_tab: Tab::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub options: FlowOptions,
    pub gui: GuiState,
}

impl AppState {
    /// Parse the text fields into `options`. Bad numbers are reported, not guessed.
    pub fn sync_gui_into_options(&mut self) -> Result<(), String> {
        self.options.tag = super::options::normalize_tag(&self.gui.tag_text);
        self.options.cap = self
            .gui
            .cap_text
            .trim()
            .parse()
            .map_err(|_| format!("cap is not a number: {:?}", self.gui.cap_text))?;
        self.options.min_card_level = match self.gui.min_level_text.trim() {
            "" => 0,
            t => t.parse().map_err(|_| format!("min level is not a number: {t:?}"))?,
        };
        self.options.validate().map_err(|e| e.to_string())
    }
}

impl Default for AppState {
    fn default() -> Self {
        let options = FlowOptions::default();
        Self { gui: GuiState::from_options(&options), options }
    }
}
