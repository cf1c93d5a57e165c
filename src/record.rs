// src/record.rs
use serde::{Deserialize, Serialize};

/// Per-side metrics as shown on the battle card. Empty string = not shown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideStats {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub avg_elixir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shortest_cycle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub elixir_leaked: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hp: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tower_level: String,
}

impl SideStats {
    /// `Avg Elixir: 3.6 • 4-Card Cycle: 10 • …`, or empty when nothing is known.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if !self.avg_elixir.is_empty() { parts.push(join!("Avg Elixir: ", &self.avg_elixir)); }
        if !self.shortest_cycle.is_empty() { parts.push(join!("4-Card Cycle: ", &self.shortest_cycle)); }
        if !self.elixir_leaked.is_empty() { parts.push(join!("Elixir Leaked: ", &self.elixir_leaked)); }
        if !self.hp.is_empty() { parts.push(join!("HP: ", &self.hp)); }
        parts.join(" • ")
    }
}

/// One completed match, normalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Site-assigned battle id, `battle_` prefix removed.
    pub id: Option<String>,
    /// Dedup key: the id, or a key synthesized from time and text.
    pub key: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub text: String,
    /// True when the tracked player lost.
    pub self_lost: bool,
    pub self_deck: Vec<String>,
    pub opponent_deck: Vec<String>,
    #[serde(default)]
    pub self_stats: Option<SideStats>,
    #[serde(default)]
    pub opponent_stats: Option<SideStats>,
}

impl Record {
    /// Admission rule for the collection.
    pub fn admissible(&self) -> bool {
        (self.id.is_some() || self.timestamp > 0) && !self.text.trim().is_empty()
    }
}

/// Key for records without a site id. Stable for the same time and text.
pub fn synth_key(timestamp: i64, text: &str) -> String {
    format!("t{}_{:016x}", timestamp, fnv1a(text.as_bytes()))
}

/// Key for records without a site id whose time was only given relative to
/// the page load. The "… Ago" line moves between loads, so it is left out.
pub fn synth_key_untimed(text: &str) -> String {
    let stable: Vec<&str> = text.lines().filter(|l| !l.trim_end().ends_with(" Ago")).collect();
    format!("r_{:016x}", fnv1a(stable.join("\n").as_bytes()))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        h ^= *b as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synth_key_is_stable_and_text_sensitive() {
        assert_eq!(synth_key(5, "a"), synth_key(5, "a"));
        assert_ne!(synth_key(5, "a"), synth_key(5, "b"));
        assert!(synth_key(5, "a").starts_with("t5_"));
    }

    #[test]
    fn untimed_key_ignores_the_elapsed_line() {
        let early = "Ladder\n3m Ago\nResult: Defeat\nPlayer 1: Self";
        let later = "Ladder\n1h 3m Ago\nResult: Defeat\nPlayer 1: Self";
        assert_eq!(synth_key_untimed(early), synth_key_untimed(later));
        assert_ne!(synth_key_untimed(early), synth_key_untimed("Ladder\n3m Ago\nResult: Victory"));
        assert!(synth_key_untimed(early).starts_with("r_"));
    }

    #[test]
    fn stats_summary_skips_empty_fields() {
        let s = SideStats { avg_elixir: s!("3.6"), hp: s!("4000 HP"), ..SideStats::default() };
        assert_eq!(s.summary(), "Avg Elixir: 3.6 • HP: 4000 HP");
        assert_eq!(SideStats::default().summary(), "");
    }

    #[test]
    fn admission_needs_text_and_identity() {
        let mut r = Record {
            id: None, key: s!("k"), timestamp: 0, text: s!("x"), self_lost: false,
            self_deck: vec![], opponent_deck: vec![], self_stats: None, opponent_stats: None,
        };
        assert!(!r.admissible());
        r.timestamp = 1;
        assert!(r.admissible());
        r.text = s!("  ");
        assert!(!r.admissible());
    }
}
