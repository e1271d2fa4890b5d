// End-to-end tests: config file -> player sheet -> full simulated auction.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ffauction_core::{
    load_players, AuctionEvent, AuctionResult, LoadStrictness, Position, SheetFormat,
};
use ffauction_sim::config::{self, load_config_from, Config, StrategyKind};
use ffauction_sim::{load_pool, simulate};

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

fn fixture_config() -> Config {
    load_config_from(&fixture("auction.toml")).expect("fixture config should load")
}

fn run(config: &Config) -> AuctionResult {
    let load = load_pool(config).expect("fixture players should load");
    simulate(config, load.players).expect("auction should complete")
}

#[test]
fn fixture_config_resolves_player_path() {
    let config = fixture_config();
    assert_eq!(config.owners.len(), 3);
    assert_eq!(config.players.path, fixture("players.csv"));
    assert_eq!(config.simulation.strategy, StrategyKind::Mixed);
}

#[test]
fn lenient_load_skips_unknown_position() {
    let load = load_pool(&fixture_config()).unwrap();
    assert_eq!(load.players.len(), 17);
    assert_eq!(load.skipped.len(), 1);
    assert_eq!(load.skipped[0].field, "position");
    assert_eq!(load.skipped[0].line, 19);
}

#[test]
fn strict_load_fails_on_bad_row() {
    let mut config = fixture_config();
    config.players.strictness = LoadStrictness::Strict;
    assert!(load_pool(&config).is_err());
}

#[test]
fn full_auction_respects_rules() {
    let config = fixture_config();
    let result = run(&config);

    assert!(matches!(result.events.last(), Some(AuctionEvent::Complete)));

    let mut seen = HashSet::new();
    for owner in &result.owners {
        assert_eq!(owner.spent + owner.budget_remaining, 50);
        // $1 kept back for every slot still open.
        assert!(owner.budget_remaining as usize >= owner.open_slot_count());
        for slot in &owner.roster {
            if let Some(p) = &slot.player {
                assert!(slot.slot.accepts(p.position), "{} in {}", p.name, slot.slot);
                assert!(seen.insert(p.id), "{} drafted twice", p.name);
            }
        }
    }

    // Every loaded player is on a roster, unsold, or still undrafted.
    let total = seen.len() + result.unsold.len() + result.undrafted.len();
    assert_eq!(total, 17);
}

#[test]
fn same_seed_same_auction() {
    let config = fixture_config();
    assert_eq!(run(&config), run(&config));
}

#[test]
fn every_strategy_completes() {
    for strategy in [StrategyKind::Value, StrategyKind::Random, StrategyKind::Mixed] {
        let mut config = fixture_config();
        config.simulation.strategy = strategy;
        let result = run(&config);
        assert!(
            result.owners.iter().all(|o| o.spent <= 50),
            "{strategy:?} overspent"
        );
    }
}

#[test]
fn result_serializes_to_json() {
    let result = run(&fixture_config());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["owners"].as_array().unwrap().len(), 3);
    assert_eq!(json["events"].as_array().unwrap().last().unwrap()["event"], "complete");

    let back: AuctionResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn cheatsheet_fixture_loads() {
    let load = load_players(
        &fixture("cheatsheet.csv"),
        SheetFormat::FantasyPros,
        LoadStrictness::Strict,
    )
    .unwrap();
    let names: Vec<_> = load.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Christian McCaffrey",
            "Tyreek Hill",
            "Josh Allen",
            "Travis Kelce",
            "San Francisco 49ers",
            "Justin Tucker"
        ]
    );
    assert_eq!(load.players[4].position, Position::Defense);
    assert_eq!(load.players[0].value, 62.0);
}

#[test]
fn first_run_writes_defaults_and_simulates() {
    let tmp = tempfile::tempdir().unwrap();
    let written = config::ensure_config_files(tmp.path()).unwrap();
    assert_eq!(written.len(), 2);

    let config = load_config_from(&tmp.path().join("config/auction.toml")).unwrap();
    let result = run(&config);
    assert_eq!(result.owners.len(), 4);
    assert!(result.owners.iter().all(|o| o.spent <= 200));
    assert!(result.total_spent() > 0);
}

#[test]
fn asymmetric_owners_from_config() {
    let tmp = tempfile::tempdir().unwrap();
    fs::copy(fixture("players.csv"), tmp.path().join("players.csv")).unwrap();
    let path = tmp.path().join("auction.toml");
    fs::write(
        &path,
        r#"
[auction]
roster = ["QB", "RB", "WR"]

[[auction.owner]]
name = "Big spender"
budget = 120

[[auction.owner]]
name = "Frugal"
budget = 3

[players]
path = "players.csv"

[simulation]
strategy = "value"
"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    let result = run(&config);
    let frugal = &result.owners[1];
    assert_eq!(frugal.name, "Frugal");
    assert_eq!(frugal.starting_budget, 3);
    // $3 for three slots: every purchase is at $1.
    assert!(frugal.roster.iter().all(|s| matches!(s.price, None | Some(1))));
}
