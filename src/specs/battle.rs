// src/specs/battle.rs
//
// One battle card (`.battle_list_battle`) → one `Record`.
//
// The markup differs between layouts (team segments vs plain player blocks,
// stats with or without icon classes), so most lookups are fallback chains.
// Nothing here fails a batch: a card that yields nothing useful is skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::config::consts::BATTLE_SELECTOR;
use crate::core::html::{attr, closest, contains, dyn_selector, first, first_of, parent, text_of};
use crate::core::sanitize::{clean_stat_raw, parse_delta, signed_int_token, strip_card_name, strip_level_prefix};
use crate::core::time::{self, ResolvedTime, TimeSource};
use crate::record::{synth_key, synth_key_untimed, Record, SideStats};

use super::resolver::Chain;

static PLAYER_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)player/([^/?#]+)").expect("regex"));
static LVL_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Lvl\s*([0-9]+)").expect("regex"));
static LEVEL_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)level\s*([0-9]+)").expect("regex"));
static TRAILING_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*$").expect("regex"));
static WIN_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)win|victory|victorious").expect("regex"));
static WIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)win").expect("regex"));
static LOSS_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)lose|lost|defeat").expect("regex"));

/// Inputs that do not come from the markup.
#[derive(Clone, Copy, Debug)]
pub struct ExtractContext<'a> {
    /// Tracked tag, normalized (uppercase, no '#').
    pub tag: &'a str,
    /// Fallback time for cards without a readable timestamp.
    pub now_ms: i64,
}

/// One side of a battle as read from the card.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Participant {
    pub name: String,
    pub clan: String,
    pub trophies: String,
    pub trophy_change: String,
    /// `"Knight (14)"` style entries, level kept.
    pub deck: Vec<String>,
    pub stats: SideStats,
}

/// Every battle card in the document, malformed ones skipped.
pub fn extract_batch(html: &str, ctx: &ExtractContext<'_>) -> Vec<Record> {
    let doc = Html::parse_document(html);
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for card in doc.select(selector!(BATTLE_SELECTOR)) {
        match extract_record(card, ctx) {
            Some(r) => out.push(r),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        logd!("Extract: {} parsed, {} skipped", out.len(), skipped);
    }
    out
}

/// Map one battle card to a record; `None` when the admission rule fails.
pub fn extract_record(card: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<Record> {
    let id = battle_id(card);
    let raw_time = raw_timestamp(card);
    let when = time::resolve(&raw_time, ctx.now_ms);

    let scopes = participant_scopes(card);
    let segmented = is_segmented(card);
    let players: Vec<Participant> = scopes.iter().map(|s| read_participant(*s, segmented)).collect();

    let result_text = text_of(first_of(card, &[
        selector!(".ui.ribbon.label"),
        selector!(".result .ui.header"),
        selector!(".win_loss .ui.right.ribbon.label"),
    ]));
    let score_text = text_of(first(card, selector!(".result_header")));

    let me = tracked_side(card, &scopes, ctx.tag);
    let winner = winner_side(card, &players, &result_text);
    let self_lost = resolve_loss(me, winner, &players, &result_text);
    if me.is_none() {
        logd!("Extract: tracked player not found in {:?}; counted as not a loss", id);
    }

    let text = render_text(card, &when, &players, me, &result_text, &score_text);

    let (self_deck, opponent_deck) = split_decks(&players, me);
    let (self_stats, opponent_stats) = split_stats(&players, me);

    let key = match (&id, when.source) {
        (Some(id), _) => id.clone(),
        (None, TimeSource::Relative) => synth_key_untimed(&text),
        (None, _) => synth_key(when.millis, &text),
    };

    let rec = Record {
        id,
        key,
        timestamp: when.millis,
        text,
        self_lost,
        self_deck,
        opponent_deck,
        self_stats,
        opponent_stats,
    };
    rec.admissible().then_some(rec)
}

/* ---------------- identity & time ---------------- */

fn battle_id(card: ElementRef<'_>) -> Option<String> {
    let raw = attr(card, "id").or_else(|| attr(card, "data-id"))?;
    let id = raw.strip_prefix("battle_").unwrap_or(raw).trim();
    (!id.is_empty()).then(|| s!(id))
}

fn raw_timestamp(card: ElementRef<'_>) -> String {
    let node = first_of(card, &[
        selector!(".battle-timestamp-popup"),
        selector!(r#"[data-content*="UTC"]"#),
        selector!(".i18n_duration_short"),
    ]);
    match node {
        Some(n) => attr(n, "data-content").map(|s| s!(s)).unwrap_or_else(|| text_of(Some(n))),
        None => s!(),
    }
}

/* ---------------- participants ---------------- */

fn is_segmented(card: ElementRef<'_>) -> bool {
    first(card, selector!(".team-segment")).is_some()
}

/// Team segments when the layout has them, otherwise the first two player blocks.
fn participant_scopes(card: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let segs: Vec<_> = card.select(selector!(".team-segment")).collect();
    if !segs.is_empty() {
        return segs;
    }
    card.select(selector!(".battle_player, .player")).take(2).collect()
}

pub fn read_participant(scope: ElementRef<'_>, segmented: bool) -> Participant {
    let name = if segmented {
        text_of(first_of(scope, &[
            selector!(".player_name_header"),
            selector!(".ui.header.link.player_name_header"),
            selector!(".player_name"),
        ]))
    } else {
        text_of(first_of(scope, &[selector!(".player_name_header"), selector!(".player_name"), selector!("a")]))
    };
    let clan = if segmented {
        text_of(first(scope, selector!(".battle_player_clan")))
    } else {
        text_of(first(scope, selector!(".battle_player_clan, .clan")))
    };
    let trophies = if segmented {
        text_of(first_of(scope, &[
            selector!(".trophy_container > .ui.label"),
            selector!(".trophy_container .ui.label"),
        ]))
    } else {
        text_of(first(scope, selector!(".trophy_container > .ui.label, .trophy")))
    };
    let change_raw = text_of(first(scope, selector!(".trophy_container .ui.basic.label")));
    let trophy_change = signed_int_token(&change_raw).unwrap_or(change_raw);

    let deck = if segmented {
        match first(scope, selector!(r#".ui.padded.grid[id^="deck_"], .ui.padded.grid"#)) {
            Some(grid) => read_deck(grid),
            None => Vec::new(),
        }
    } else {
        read_deck(scope)
    };

    let container = first_of(scope, &[selector!(".stats.item"), selector!(".stats")]).unwrap_or(scope);
    let stats = SideStats {
        avg_elixir: stat_value(container, "icon-average-elixir", &["avg elixir", "average elixir"]),
        shortest_cycle: stat_value(container, "icon-shortest-cycle", &["4-card cycle", "4 card cycle", "shortest cycle"]),
        elixir_leaked: stat_value(container, "icon-elixir-leaked", &["elixir leaked"]),
        hp: side_hp(scope, container, segmented),
        tower_level: tower_level(scope),
    };

    Participant { name, clan, trophies, trophy_change, deck, stats }
}

/// Card names with their level in parentheses, in page order.
fn read_deck(scope: ElementRef<'_>) -> Vec<String> {
    scope
        .select(selector!("img.deck_card, .deck_card__four_wide img"))
        .filter_map(|img| {
            let name = attr(img, "alt").or_else(|| attr(img, "data-card-key"))?;
            let lvl = card_level(img);
            Some(if lvl.is_empty() { s!(name) } else { format!("{name} ({lvl})") })
        })
        .collect()
}

fn card_level(img: ElementRef<'_>) -> String {
    closest(img, selector!(".deck_card__four_wide"))
        .and_then(|cell| first(cell, selector!(".card-level, .ui.basic.center.card-level")))
        .map(|n| strip_level_prefix(&text_of(Some(n))))
        .unwrap_or_default()
}

/// Stat lookup: exact icon class → class fragment → label text.
pub fn stat_value(container: ElementRef<'_>, icon_class: &str, labels: &[&str]) -> String {
    let simple = icon_class.trim_start_matches("icon-");

    let chain = Chain::new()
        .then("exact-class", |c: ElementRef<'_>| {
            let sel = dyn_selector(&join!(".", icon_class))?;
            first(c, &sel).and_then(value_near)
        })
        .then("class-fragment", |c: ElementRef<'_>| {
            let sel = dyn_selector(&format!(r#"[class*="{simple}"]"#))?;
            first(c, &sel).and_then(value_near)
        })
        .then("label-text", |c: ElementRef<'_>| {
            let hit = c
                .select(selector!(".item, .stats, .value"))
                .find(|n| {
                    let text = text_of(Some(*n)).to_lowercase();
                    labels.iter().any(|l| text.contains(l))
                })?;
            let v = first_of(hit, &[selector!(".value"), selector!(".stat-value"), selector!(".number")]);
            let raw = if v.is_some() { text_of(v) } else { text_of(Some(hit)) };
            non_empty(clean_stat_raw(&raw))
        });

    match chain.resolve_named(container) {
        Some((step, v)) => {
            if step != "exact-class" {
                logd!("Extract: stat {} resolved by {}", icon_class, step);
            }
            v
        }
        None => s!(),
    }
}

/// Value cell next to a stat icon.
fn value_near(node: ElementRef<'_>) -> Option<String> {
    let item = closest(node, selector!(".item")).or_else(|| parent(node)).unwrap_or(node);
    let v = first_of(item, &[selector!(".value"), selector!(".stat-value"), selector!(".number")]);
    let raw = if v.is_some() { text_of(v) } else { text_of(Some(item)) };
    non_empty(clean_stat_raw(&raw))
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn side_hp(scope: ElementRef<'_>, container: ElementRef<'_>, segmented: bool) -> String {
    if let Some(popup) = first_of(container, &[selector!(".hp-popup"), selector!(".hp-both-popup")]) {
        let total = attr(popup, "data-total").or_else(|| attr(popup, "data-team-total"));
        if let Some(total) = total {
            return join!(total, " HP");
        }
        let mut parts: Vec<String> = Vec::new();
        if let Some(k) = attr(popup, "data-king") { parts.push(join!("King:", k)); }
        if let Some(p) = attr(popup, "data-princess0") { parts.push(join!("P0:", p)); }
        if let Some(p) = attr(popup, "data-princess1") { parts.push(join!("P1:", p)); }
        if !parts.is_empty() || !segmented {
            return parts.join(" / ");
        }
        return text_of(Some(popup));
    }
    match first(scope, selector!(".hp, .hp-popup, .hp-both-popup")) {
        Some(n) => attr(n, "data-total").map(|s| s!(s)).unwrap_or_else(|| text_of(Some(n))),
        None => s!(),
    }
}

/// King/princess tower level: explicit `.level` text, else the princess card's level.
fn tower_level(scope: ElementRef<'_>) -> String {
    if let Some(node) = first(scope, selector!(".level")) {
        let text = text_of(Some(node));
        return [&*LVL_TEXT, &*LEVEL_TEXT, &*TRAILING_NUM]
            .iter()
            .find_map(|re| re.captures(&text).map(|c| s!(&c[1])))
            .unwrap_or_default();
    }
    first(scope, selector!(r#"img[alt*="Princess"], img[alt*="princess"], [data-card-key*="princess"]"#))
        .map(card_level)
        .unwrap_or_default()
}

/* ---------------- who is who ---------------- */

/// Side index of the tracked player: profile link first, then tag-list attributes.
pub fn tracked_side(card: ElementRef<'_>, scopes: &[ElementRef<'_>], tag: &str) -> Option<usize> {
    if tag.is_empty() {
        return None;
    }
    let sides = scopes.len().min(2);
    let chain = Chain::new()
        .then("profile-link", |_: ElementRef<'_>| {
            (0..sides).find(|&i| {
                scopes[i]
                    .select(selector!(r#"a[href*="/player/"]"#))
                    .filter_map(|a| attr(a, "href"))
                    .filter_map(|h| PLAYER_HREF.captures(h).map(|m| m[1].to_ascii_uppercase()))
                    .any(|t| t == tag)
            })
        })
        .then("tag-attributes", |c: ElementRef<'_>| {
            let src = first(c, selector!("[data-team-tags], [data-player-tags], [data-opponent-tags]"))?;
            let team = attr(src, "data-team-tags").or_else(|| attr(src, "data-player-tags")).unwrap_or("");
            let oppo = attr(src, "data-opponent-tags").unwrap_or("");
            if sides > 0 && tag_list_has(team, tag) {
                Some(0)
            } else if sides > 1 && tag_list_has(oppo, tag) {
                Some(1)
            } else {
                None
            }
        });
    chain.resolve(card)
}

fn tag_list_has(list: &str, tag: &str) -> bool {
    list.split(',')
        .map(|t| t.trim().trim_start_matches('#').to_ascii_uppercase())
        .any(|t| !t.is_empty() && t == tag)
}

/// Winning side: per-side ribbon → winner marker → trophy deltas → result text.
pub fn winner_side(card: ElementRef<'_>, players: &[Participant], result_text: &str) -> Option<usize> {
    let segs: Vec<ElementRef<'_>> = card.select(selector!(".team-segment")).collect();

    let chain = Chain::new()
        .then("side-ribbon", |_: ElementRef<'_>| {
            if segs.len() < 2 {
                return None;
            }
            segs.iter().position(|seg| {
                let r = first(*seg, selector!(".ui.right.ribbon.label, .ui.ribbon.label, .winner, .won, .victory, .victory-label"));
                r.is_some() && text_of(r).to_lowercase().contains("win")
            })
        })
        .then("winner-marker", |c: ElementRef<'_>| {
            let marker = first(c, selector!(r#"[class*="team-winner"], .team-winner, .winner, .won, .victory"#))?;
            segs.iter().position(|seg| contains(*seg, marker))
        })
        .then("trophy-delta", |_: ElementRef<'_>| {
            let a = parse_delta(&players.first()?.trophy_change)?;
            let b = parse_delta(&players.get(1)?.trophy_change)?;
            match a.cmp(&b) {
                std::cmp::Ordering::Greater => Some(0),
                std::cmp::Ordering::Less => Some(1),
                std::cmp::Ordering::Equal => None,
            }
        })
        .then("result-text", |_: ElementRef<'_>| {
            if !WIN_WORDS.is_match(result_text) {
                return None;
            }
            let ribbon_wins = |i: usize| {
                segs.get(i)
                    .and_then(|s| first(*s, selector!(".ui.ribbon.label")))
                    .is_some_and(|r| WIN.is_match(&text_of(Some(r))))
            };
            match (ribbon_wins(0), ribbon_wins(1)) {
                (true, false) => Some(0),
                (false, true) => Some(1),
                _ => None,
            }
        });

    chain.resolve_named(card).map(|(step, side)| {
        logd!("Extract: winner side {} via {}", side, step);
        side
    })
}

/// Did the tracked player lose? Unknown tracked player → not a loss.
pub fn resolve_loss(me: Option<usize>, winner: Option<usize>, players: &[Participant], result_text: &str) -> bool {
    let Some(me) = me else { return false };
    if let Some(w) = winner {
        return w != me;
    }
    match players.get(me).and_then(|p| parse_delta(&p.trophy_change)) {
        Some(delta) => delta < 0,
        None => LOSS_WORDS.is_match(result_text),
    }
}

fn split_decks(players: &[Participant], me: Option<usize>) -> (Vec<String>, Vec<String>) {
    let clean = |p: Option<&Participant>| -> Vec<String> {
        p.map(|p| p.deck.iter().map(|c| strip_card_name(c)).filter(|c| !c.is_empty()).collect())
            .unwrap_or_default()
    };
    match me {
        Some(i) => (clean(players.get(i)), clean(players.get(1 - i.min(1)))),
        None => {
            let opp = if players.get(1).is_some() { clean(players.get(1)) } else { clean(players.first()) };
            (Vec::new(), opp)
        }
    }
}

fn split_stats(players: &[Participant], me: Option<usize>) -> (Option<SideStats>, Option<SideStats>) {
    let (a, b) = match me {
        Some(i) => (i, 1 - i.min(1)),
        None => (0, 1),
    };
    (players.get(a).map(|p| p.stats.clone()), players.get(b).map(|p| p.stats.clone()))
}

/* ---------------- rendering ---------------- */

fn render_text(
    card: ElementRef<'_>,
    when: &ResolvedTime,
    players: &[Participant],
    me: Option<usize>,
    result_text: &str,
    score_text: &str,
) -> String {
    let mut out = String::new();

    let mode = text_of(first(card, selector!(".game_mode_header")));
    let header: Vec<String> = [Some(mode), when.local_display()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if !header.is_empty() {
        out.push_str(&header.join(" — "));
        out.push('\n');
    }

    let duration = text_of(first(card, selector!(".i18n_duration_short, .battle-duration, .duration")));
    if !duration.is_empty() {
        out.push_str(&join!(&duration, " Ago\n"));
    }

    if !result_text.is_empty() || !score_text.is_empty() {
        let line = match (result_text.is_empty(), score_text.is_empty()) {
            (false, false) => format!("{result_text} ({score_text})"),
            (false, true) => s!(result_text),
            _ => s!(score_text),
        };
        out.push_str(&join!("Result: ", &line, "\n"));
    }

    for (idx, p) in players.iter().enumerate() {
        let label = if Some(idx) == me { "Self" } else { "Opponent" };
        out.push_str(&format!("Player {}: {}", idx + 1, label));
        if !p.trophies.is_empty() {
            out.push_str(&join!(" — ", &p.trophies));
        }
        if !p.trophy_change.is_empty() {
            out.push_str(&join!(" (", &signed(&p.trophy_change), ")"));
        }
        out.push('\n');
        if !p.deck.is_empty() {
            out.push_str(&join!("  Deck: ", &p.deck.join(", "), "\n"));
        }
        let stats = p.stats.summary();
        if !stats.is_empty() {
            out.push_str(&join!("  Stats: ", &stats, "\n"));
        }
        if !p.stats.tower_level.is_empty() {
            out.push_str(&join!("Tower Princess: LvL ", &p.stats.tower_level, "\n"));
        }
    }

    let hp = aggregate_hp(card);
    if !hp.is_empty() {
        out.push_str(&join!("HP: ", &hp, "\n"));
    }

    out.trim().to_string()
}

fn signed(delta: &str) -> String {
    if delta.starts_with('+') || delta.starts_with('-') {
        return s!(delta);
    }
    match delta.parse::<i64>() {
        Ok(n) if n > 0 => format!("+{n}"),
        _ => s!(delta),
    }
}

fn aggregate_hp(card: ElementRef<'_>) -> String {
    let Some(popup) = first_of(card, &[selector!(".hp-popup"), selector!(".hp-both-popup")]) else {
        return s!();
    };
    let team = attr(popup, "data-total").or_else(|| attr(popup, "data-team-total"));
    let oppo = attr(popup, "data-oppo-total");
    match (team, oppo) {
        (None, None) => text_of(Some(popup)),
        (t, o) => {
            let mut s = s!(t.unwrap_or(""));
            if let Some(o) = o {
                s.push_str(&join!(" vs ", o));
            }
            s
        }
    }
}
