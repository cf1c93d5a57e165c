// tests/extract_fixtures.rs
use ra_scrape::core::sanitize::strip_card_name;
use ra_scrape::core::time::{parse_numeric, resolve, TimeSource};
use ra_scrape::engine::analysis::{analyze, render_section};
use ra_scrape::specs::battle::{extract_batch, ExtractContext};
use ra_scrape::specs::history::next_history_url;

const NOW: i64 = 1_800_000_000_000;

fn ctx() -> ExtractContext<'static> {
    ExtractContext { tag: "ME", now_ms: NOW }
}

/// A mixed page: one segmented card, one player-block card, one unreadable shell.
const PAGE: &str = r##"
<html><body>
  <div class="battle battle_list_battle" id="battle_seg1">
    <div class="game_mode_header">Ladder</div>
    <span class="battle-timestamp-popup" data-content="1700000000"></span>
    <div class="team-segment">
      <a class="ui header link player_name_header" href="/player/OPP">Alice</a>
      <div class="trophy_container"><div class="ui label">6900</div><div class="ui basic label">+31</div></div>
      <div class="ui padded grid" id="deck_1">
        <img class="deck_card" alt="Goblin Barrel (Lvl 11)"><img class="deck_card" alt="Princess">
      </div>
    </div>
    <div class="team-segment">
      <a class="ui header link player_name_header" href="/player/me">Bob</a>
      <div class="trophy_container"><div class="ui label">6950</div><div class="ui basic label">-31</div></div>
      <div class="ui padded grid" id="deck_2"><img class="deck_card" alt="Giant"></div>
    </div>
  </div>

  <div class="battle_list_battle" id="battle_blk2">
    <span class="i18n_duration_short">1h 30m</span>
    <div class="ui ribbon label">Victory</div>
    <div class="battle_player"><a href="/player/ME">me</a><img class="deck_card" alt="Hog Rider"></div>
    <div class="battle_player"><a href="/player/X">x</a><img class="deck_card" alt="Goblin Barrel"></div>
  </div>

  <div class="battle_list_battle" id="battle_"></div>

  <a class="ui button" href="/player/ME/battles/history?before=1699990000000">Older</a>
</body></html>"##;

#[test]
fn mixed_layouts_extract_with_sides_resolved() {
    let recs = extract_batch(PAGE, &ctx());
    assert_eq!(recs.len(), 2, "the empty shell is skipped");

    let seg = recs.iter().find(|r| r.key == "seg1").unwrap();
    assert_eq!(seg.timestamp, 1_700_000_000_000);
    assert!(seg.self_lost, "tracked player is the second segment and lost trophies");
    assert_eq!(seg.self_deck, vec!["Giant"]);
    assert_eq!(seg.opponent_deck, vec!["Goblin Barrel", "Princess"]);
    assert!(seg.text.contains("Player 1: Opponent"));
    assert!(seg.text.contains("Player 2: Self"));
    assert!(!seg.text.contains("Alice") && !seg.text.contains("Bob"));

    let blk = recs.iter().find(|r| r.key == "blk2").unwrap();
    assert_eq!(blk.timestamp, NOW - 90 * 60_000);
    assert!(!blk.self_lost);
    assert_eq!(blk.opponent_deck, vec!["Goblin Barrel"]);
}

#[test]
fn page_analysis_counts_each_card_once_per_match() {
    let recs = extract_batch(PAGE, &ctx());
    let a = analyze(&recs, 30);
    assert_eq!(a.window, 2);
    assert_eq!(a.losses, 1);
    assert_eq!(a.entries[0].card_name, "Goblin Barrel");
    assert_eq!(a.entries[0].occurrence_count, 2);
    assert_eq!(a.entries[0].percent_of_window, 100);
    let text = render_section(&a);
    assert!(text.starts_with("Opponent card analysis (last 2 battles, 1 losses):"));
    assert!(text.contains("1) Goblin Barrel - 100% - 2 times"));
    assert!(!text.contains("2) "), "top is ceil(2/2) = 1 entry");
}

#[test]
fn continuation_link_resolves_against_the_page() {
    let next = next_history_url(PAGE, "https://royaleapi.com/player/ME/battles");
    assert_eq!(next.as_deref(), Some("https://royaleapi.com/player/ME/battles/history?before=1699990000000"));
    assert_eq!(next_history_url("<p>end</p>", "https://royaleapi.com/player/ME/battles"), None);
}

#[test]
fn documented_time_and_name_rules() {
    assert_eq!(parse_numeric("1700000000"), Some(1_700_000_000_000));
    assert_eq!(parse_numeric("1700000000000"), Some(1_700_000_000_000));
    assert_eq!(strip_card_name("Knight (Lvl 11)"), "Knight");

    let abs = resolve("2023-11-14 22:13:20 UTC", NOW);
    assert_eq!(abs.millis, 1_700_000_000_000);
    assert_eq!(abs.source, TimeSource::Absolute);

    let junk = resolve("whenever", NOW);
    assert_eq!(junk.millis, NOW);
    assert_eq!(junk.source, TimeSource::Fallback);
    assert!(junk.local_display().is_none());
}
