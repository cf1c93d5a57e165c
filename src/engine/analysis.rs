// src/engine/analysis.rs
//
// Opponent card frequency over the analysed window. Every match in the window
// counts (not only losses); a card counts once per match.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::sanitize::strip_card_name;
use crate::record::Record;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardFrequencyEntry {
    pub card_name: String,
    pub occurrence_count: usize,
    pub percent_of_window: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct Analysis {
    pub window: usize,
    pub losses: usize,
    /// Full ranking, best first.
    pub entries: Vec<CardFrequencyEntry>,
}

impl Analysis {
    /// `ceil(window / 2)` entries, fewer if there are not that many cards.
    pub fn top(&self) -> &[CardFrequencyEntry] {
        let n = self.window.div_ceil(2).min(self.entries.len());
        &self.entries[..n]
    }
}

/// Rank opponent cards over the newest `cap` records.
pub fn analyze(records: &[Record], cap: usize) -> Analysis {
    let window = &records[..records.len().min(cap)];
    let losses = window.iter().filter(|r| r.self_lost).count();
    Analysis { window: window.len(), losses, entries: frequencies(window) }
}

pub fn frequencies(window: &[Record]) -> Vec<CardFrequencyEntry> {
    if window.is_empty() {
        return Vec::new();
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    for r in window {
        let distinct: HashSet<String> = r
            .opponent_deck
            .iter()
            .map(|c| strip_card_name(c))
            .filter(|c| !c.is_empty())
            .collect();
        for card in distinct {
            *counts.entry(card).or_insert(0) += 1;
        }
    }

    let size = window.len() as f64;
    let mut entries: Vec<CardFrequencyEntry> = counts
        .into_iter()
        .map(|(card_name, occurrence_count)| CardFrequencyEntry {
            percent_of_window: (occurrence_count as f64 / size * 100.0).round() as u32,
            card_name,
            occurrence_count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.occurrence_count
            .cmp(&a.occurrence_count)
            .then_with(|| b.percent_of_window.cmp(&a.percent_of_window))
            .then_with(|| a.card_name.cmp(&b.card_name))
    });
    entries
}

/// Report section. Never fails; an empty window gets its own message.
pub fn render_section(a: &Analysis) -> String {
    if a.window == 0 {
        return s!("Opponent card analysis: No battles available to analyze.");
    }
    if a.entries.is_empty() {
        return format!(
            "Opponent card analysis: {} battles ({} losses), but opponent decks could not be parsed.",
            a.window, a.losses
        );
    }

    let mut lines = vec![
        format!("Opponent card analysis (last {} battles, {} losses):", a.window, a.losses),
        s!("Most frequent opponent cards (share of all analysed battles):"),
    ];
    for (i, e) in a.top().iter().enumerate() {
        lines.push(format!("{}) {} - {}% - {} times", i + 1, e.card_name, e.percent_of_window, e.occurrence_count));
    }
    lines.join("\n")
}
