// benches/extract.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ra_scrape::engine::merge::merge_capped;
use ra_scrape::specs::battle::{extract_batch, ExtractContext};

/// One page of the infinite list: `n` segmented battle cards, newest first.
fn sample_page(n: i64) -> String {
    let mut html = String::from("<html><body>");
    for id in (0..n).rev() {
        html.push_str(&format!(
            r#"<div class="battle battle_list_battle" id="battle_{id}">
              <div class="game_mode_header">Ladder</div>
              <span class="battle-timestamp-popup" data-content="{ts}"></span>
              <div class="team-segment">
                <a class="ui header link player_name_header" href="/player/ME">Me</a>
                <div class="trophy_container"><div class="ui label">7000</div><div class="ui basic label">-30</div></div>
                <div class="ui padded grid"><img class="deck_card" alt="Miner"><img class="deck_card" alt="Poison"></div>
                <div class="stats item"><div class="item"><i class="icon-average-elixir"></i><span class="value">3.1</span></div></div>
              </div>
              <div class="team-segment">
                <a class="ui header link player_name_header" href="/player/OPP{id}">Them</a>
                <div class="trophy_container"><div class="ui label">7000</div><div class="ui basic label">+30</div></div>
                <div class="ui padded grid"><img class="deck_card" alt="Golem"><img class="deck_card" alt="Night Witch"></div>
              </div>
              <div class="hp-popup" data-total="2534" data-oppo-total="4008"></div>
            </div>"#,
            ts = 1_700_000_000 + id * 60
        ));
    }
    html.push_str("</body></html>");
    html
}

fn bench_extract(c: &mut Criterion) {
    let page = sample_page(40);
    let ctx = ExtractContext { tag: "ME", now_ms: 1_800_000_000_000 };

    c.bench_function("extract_batch_40", |b| {
        b.iter(|| {
            let recs = extract_batch(black_box(&page), &ctx);
            black_box(recs.len())
        })
    });

    let batch = extract_batch(&page, &ctx);
    let (older, newer) = batch.split_at(batch.len() / 2);
    c.bench_function("merge_capped_30", |b| {
        b.iter(|| {
            let merged = merge_capped(black_box(newer), black_box(older), 30);
            black_box(merged.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
