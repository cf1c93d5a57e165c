// tests/offline_snapshots.rs
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use ra_scrape::config::consts::{KEY_BATTLES_DATA, KEY_RESUME_META};
use ra_scrape::config::options::FlowOptions;
use ra_scrape::core::{net::DirSource, ManualClock};
use ra_scrape::engine::pagination::Phase;
use ra_scrape::report::{deliver, Delivery, FileSink};
use ra_scrape::runner::run_autoflow;
use ra_scrape::store::{self, FileStore, SessionStore, Stage};

static SERIAL: Mutex<()> = Mutex::new(());

fn write(root: &Path, rel: &str, html: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, html).unwrap();
}

/// Player-block layout, tag lists on the card, no profile links.
fn block(id: u32, lost: bool) -> String {
    let result = if lost { "Defeat" } else { "Victory" };
    format!(
        r##"<div class="battle_list_battle" id="battle_{id}">
             <div class="battle_meta" data-team-tags="#XY" data-opponent-tags="#OPP"></div>
             <span class="battle-timestamp-popup" data-content="2024-03-0{id} 12:00:00 UTC"></span>
             <div class="game_mode_header">Path of Legends</div>
             <div class="ui ribbon label">{result}</div>
             <div class="battle_player"><span class="player_name">me</span><img class="deck_card" alt="Miner"></div>
             <div class="battle_player"><span class="player_name">them</span><img class="deck_card" alt="Mega Knight"><img class="deck_card" alt="Zap"></div>
           </div>"##
    )
}

fn snapshot_tree(root: &Path) {
    write(root, "index.html", "<html></html>");
    write(
        root,
        "player/XY/cards/levels.html",
        r#"<a class="player_card_link" data-elixir="4"><img alt="Miner"><span class="card-level">Lvl 13</span></a>
           <a class="player_card_link" data-elixir="2"><img alt="Skeletons"><span class="card-level">Lvl 6</span></a>"#,
    );
    let page = format!("{}{}{}", block(3, true), block(2, false), block(1, true));
    write(root, "player/XY/battles.html", &page);
}

#[test]
fn snapshot_directory_runs_to_a_written_report() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let snaps = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    snapshot_tree(snaps.path());

    let o = FlowOptions { min_card_level: 10, ..FlowOptions::with_tag("xy") };
    let clock = ManualClock::at(1_800_000_000_000);
    let mut src = DirSource::new(snaps.path());
    let mut session = FileStore::new(state.path());

    let summary = run_autoflow(&o, &mut src, &mut session, &clock, &o.root_url(), None).unwrap();
    assert_eq!(summary.phase, Some(Phase::Exhausted));
    assert_eq!(summary.kept, 3);

    // Session files survive a reopen.
    let reopened = FileStore::new(state.path());
    assert_eq!(store::stage(&reopened), Some(Stage::Done));
    let kept = store::collection(&reopened);
    assert_eq!(kept.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(), ["3", "2", "1"]);
    assert!(kept[0].self_lost);
    assert!(!kept[1].self_lost);
    assert_eq!(kept[0].opponent_deck, vec!["Mega Knight", "Zap"]);

    let out = state.path().join("out").join("report.txt");
    let mut session = reopened;
    let mut shown = None;
    let got = deliver(&mut session, &mut FileSink(out.clone()), &mut |t: &str| shown = Some(t.to_string()));
    assert_eq!(got, Delivery::Sink);
    assert!(shown.is_none());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("Miner - Lvl 13 - Elixir: 4"));
    assert!(!text.contains("Skeletons"), "below the minimum level");
    assert!(text.contains("(last 3 battles, 2 losses)"));
    assert!(text.contains("1) Mega Knight - 100% - 3 times"));
    assert!(session.get(KEY_BATTLES_DATA).is_none());
    assert!(session.get(KEY_RESUME_META).is_none());
    assert!(store::final_text(&session).is_some(), "final text stays for another copy");
}

#[test]
fn missing_snapshot_is_reported_with_its_path() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let snaps = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    let o = FlowOptions::with_tag("XY");
    let clock = ManualClock::at(0);
    let mut src = DirSource::new(snaps.path());
    let mut session = FileStore::new(state.path());

    let err = run_autoflow(&o, &mut src, &mut session, &clock, &o.root_url(), None).unwrap_err();
    assert!(err.to_string().contains("index.html"));
}
