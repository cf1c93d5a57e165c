// src/specs/cards.rs
//
// Inventory: the tracked player's card collection, one line per card.
// Single pass over the cards page; the text is stored as-is and pasted
// verbatim into the report.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::config::consts::{CARDS_POLL_MS, CARDS_WAIT_MS, CARD_ITEM_SELECTOR};
use crate::core::html::{attr, first, first_of, text_of};
use crate::core::sanitize::first_digits;
use crate::core::wait::{poll_until, Deadline};
use crate::core::Clock;
use crate::page::LivePage;

static EVOLUTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-(ev\d+)").expect("regex"));

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardEntry {
    pub name: String,
    /// Digits only; empty when the page shows no level.
    pub level: String,
    pub elixir: String,
    /// `ev1`, `ev2`… or empty.
    pub evolution: String,
}

impl CardEntry {
    pub fn level_num(&self) -> Option<u32> {
        self.level.parse().ok()
    }

    /// `Knight - Lvl 14 - Elixir: 3 - Evolution: ev1`
    pub fn line(&self) -> String {
        let lvl = if self.level.is_empty() { "n/a" } else { &self.level };
        let elixir = if self.elixir.is_empty() { "n/a" } else { &self.elixir };
        let mut out = format!("{} - Lvl {} - Elixir: {}", self.name, lvl, elixir);
        if !self.evolution.is_empty() {
            out.push_str(&join!(" - Evolution: ", &self.evolution));
        }
        out
    }
}

/// Every card tile in the document, in page order.
pub fn parse_cards(html: &str) -> Vec<CardEntry> {
    let doc = Html::parse_document(html);
    doc.select(selector!(CARD_ITEM_SELECTOR)).map(read_card).collect()
}

fn read_card(tile: ElementRef<'_>) -> CardEntry {
    let name_node = first_of(tile, &[
        selector!(".player_cards__card_name"),
        selector!(".card_name"),
        selector!(".name"),
    ]);
    let img_alt = first(tile, selector!("img")).and_then(|img| attr(img, "alt"));
    let name = match text_of(name_node) {
        n if !n.is_empty() => n,
        _ => img_alt.map(|s| s!(s)).unwrap_or_else(|| s!("Unknown")),
    };

    let level_text = text_of(first_of(tile, &[selector!(".player_cards__card_level"), selector!(".card-level")]));
    let level = first_digits(&level_text).unwrap_or_default();

    let elixir = match attr(tile, "data-elixir") {
        Some(e) => s!(e),
        None => text_of(first_of(tile, &[selector!(".player_cards__crelixir"), selector!(".elixir")])),
    };

    let ident = attr(tile, "id").or_else(|| attr(tile, "href")).unwrap_or("");
    let evolution = EVOLUTION
        .captures(ident)
        .map(|c| c[1].to_ascii_lowercase())
        .unwrap_or_default();

    CardEntry { name, level, elixir, evolution }
}

/// Drop cards under `min_level`; 0 keeps everything, unknown levels are kept.
pub fn filter_min_level(cards: Vec<CardEntry>, min_level: u32) -> Vec<CardEntry> {
    if min_level == 0 {
        return cards;
    }
    cards
        .into_iter()
        .filter(|c| c.level_num().is_none_or(|l| l >= min_level))
        .collect()
}

pub fn serialize(cards: &[CardEntry]) -> String {
    cards.iter().map(CardEntry::line).collect::<Vec<_>>().join("\n")
}

/// Wait (bounded) for the first tile, then read the page. Empty text when
/// nothing shows up in time.
pub fn collect_cards(page: &dyn LivePage, clock: &dyn Clock, min_level: u32) -> String {
    let deadline = Deadline::after(clock, CARDS_WAIT_MS);
    let mut html = page.html();
    let present = poll_until(clock, &deadline, CARDS_POLL_MS, |_| {
        html = page.html();
        !parse_cards(&html).is_empty()
    });
    if !present.satisfied() {
        logw!("Cards: no card tiles after {} ms on {}", CARDS_WAIT_MS, page.url());
    }

    let all = parse_cards(&html);
    let total = all.len();
    let kept = filter_min_level(all, min_level);
    logf!("Cards: {} read, {} kept (min level {})", total, kept.len(), min_level);
    serialize(&kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::page::StaticPage;

    const PAGE: &str = r#"
      <a class="player_card_link player_card_item" id="card-knight-ev1" data-elixir="3">
        <img alt="Knight"><span class="player_cards__card_name">Knight</span>
        <span class="player_cards__card_level">Level 14</span>
      </a>
      <div class="player_card_item" href="/card/zap">
        <img alt="Zap"><span class="card-level">Lvl 9</span><span class="elixir">2</span>
      </div>
      <a class="player_card_link"><img alt="Mirror"></a>
    "#;

    #[test]
    fn tiles_parse_into_entries() {
        let cards = parse_cards(PAGE);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], CardEntry { name: s!("Knight"), level: s!("14"), elixir: s!("3"), evolution: s!("ev1") });
        assert_eq!(cards[1].name, "Zap", "name falls back to the image alt");
        assert_eq!(cards[1].elixir, "2");
        assert_eq!(cards[2].line(), "Mirror - Lvl n/a - Elixir: n/a");
        assert_eq!(cards[0].line(), "Knight - Lvl 14 - Elixir: 3 - Evolution: ev1");
    }

    #[test]
    fn min_level_filter_keeps_unknown_levels() {
        let kept = filter_min_level(parse_cards(PAGE), 10);
        let names: Vec<_> = kept.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Knight", "Mirror"]);
        assert_eq!(filter_min_level(parse_cards(PAGE), 0).len(), 3);
    }

    #[test]
    fn empty_page_times_out_on_the_virtual_clock() {
        let clock = ManualClock::at(0);
        let page = StaticPage::new("https://royaleapi.com/player/X/cards/levels", "<p>nothing</p>");
        assert_eq!(collect_cards(&page, &clock, 0), "");
        assert!(clock.now_ms() >= CARDS_WAIT_MS as i64);
    }
}
