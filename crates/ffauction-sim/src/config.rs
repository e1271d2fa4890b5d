// Configuration loading and parsing (auction.toml).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use ffauction_core::{
    default_roster, AuctionRules, LoadStrictness, OwnerSpec, RosterSlot, SheetFormat,
    UnsoldPolicy,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shipped defaults, written to `config/` on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../defaults/auction.toml");
pub const DEFAULT_PLAYERS: &str = include_str!("../defaults/players.csv");

pub const CONFIG_FILE: &str = "auction.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("no auction.toml found; looked in {}", display_paths(.searched))]
    NotConfigured { searched: Vec<PathBuf> },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub owners: Vec<OwnerSpec>,
    pub rules: AuctionRules,
    pub players: PlayersConfig,
    pub simulation: SimulationConfig,
    /// File the config was read from.
    pub source: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayersConfig {
    /// Player sheet, resolved against the config file's directory.
    pub path: PathBuf,
    pub format: SheetFormat,
    pub strictness: LoadStrictness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Every owner bids by value.
    Value,
    /// Every owner bids randomly.
    Random,
    /// Even-indexed owners bid by value, odd-indexed owners randomly.
    #[default]
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub strategy: StrategyKind,
    pub seed: u64,
    /// Owners bid up to this fraction of a player's value.
    pub value_fraction: f64,
    /// Weight of starter value against bench value when scoring rosters.
    pub starter_weight: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            strategy: StrategyKind::Mixed,
            seed: 0,
            value_fraction: 1.0,
            starter_weight: 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// auction.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    auction: AuctionSection,
    players: PlayersSection,
    #[serde(default)]
    simulation: SimulationConfig,
}

#[derive(Debug, Deserialize)]
struct AuctionSection {
    #[serde(default)]
    owners: usize,
    #[serde(default)]
    budget: u32,
    /// Slot abbreviations; the standard roster when absent.
    roster: Option<Vec<String>>,
    /// Per-owner overrides. When present, `owners` and `budget` are ignored.
    #[serde(default, rename = "owner")]
    owner_list: Vec<OwnerSection>,
    #[serde(default = "one")]
    min_bid: u32,
    #[serde(default = "one")]
    min_increment: u32,
    #[serde(default)]
    unsold_policy: UnsoldPolicy,
    #[serde(default = "one")]
    max_requeues: u32,
}

#[derive(Debug, Deserialize)]
struct OwnerSection {
    name: String,
    budget: u32,
    roster: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PlayersSection {
    path: PathBuf,
    #[serde(default)]
    format: SheetFormat,
    #[serde(default)]
    strictness: LoadStrictness,
}

fn one() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate `auction.toml` text. Relative paths inside it resolve
/// against `base_dir`.
pub fn parse_config(text: &str, source: &Path, base_dir: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: source.to_path_buf(),
        source: e,
    })?;

    let auction = file.auction;
    let template = match &auction.roster {
        Some(slots) => parse_roster(slots, "auction.roster")?,
        None => default_roster(),
    };

    let owners = if auction.owner_list.is_empty() {
        if auction.owners == 0 {
            return Err(ConfigError::ValidationError {
                field: "auction.owners".into(),
                message: "must be greater than 0".into(),
            });
        }
        (0..auction.owners)
            .map(|i| OwnerSpec {
                name: format!("Owner {}", i + 1),
                budget: auction.budget,
                roster: template.clone(),
            })
            .collect()
    } else {
        let mut owners = Vec::with_capacity(auction.owner_list.len());
        for (i, o) in auction.owner_list.into_iter().enumerate() {
            let roster = match &o.roster {
                Some(slots) => parse_roster(slots, &format!("auction.owner[{i}].roster"))?,
                None => template.clone(),
            };
            owners.push(OwnerSpec {
                name: o.name,
                budget: o.budget,
                roster,
            });
        }
        owners
    };

    let players = PlayersConfig {
        path: base_dir.join(&file.players.path),
        format: file.players.format,
        strictness: file.players.strictness,
    };

    let config = Config {
        owners,
        rules: AuctionRules {
            min_bid: auction.min_bid,
            min_increment: auction.min_increment,
            unsold_policy: auction.unsold_policy,
            max_requeues: auction.max_requeues,
        },
        players,
        simulation: file.simulation,
        source: source.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Load and validate configuration from a file on disk.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_config(&text, path, base_dir)
}

/// Where to look for `auction.toml` when no path is given: `config/` under
/// `base_dir`, then the platform config directory.
pub fn search_paths(base_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![base_dir.join("config").join(CONFIG_FILE)];
    if let Some(dirs) = ProjectDirs::from("", "", "ffauction") {
        paths.push(dirs.config_dir().join(CONFIG_FILE));
    }
    paths
}

/// Resolve which config file to use. An explicit path must exist; otherwise
/// the first existing entry of `search_paths` wins.
pub fn find_config(explicit: Option<&Path>, base_dir: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let searched = search_paths(base_dir);
    match searched.iter().find(|p| p.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(ConfigError::NotConfigured { searched }),
    }
}

/// Write the shipped `auction.toml` and sample `players.csv` into
/// `base_dir/config/`, skipping files that already exist. Returns the files
/// written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut written = Vec::new();
    for (name, content) in [(CONFIG_FILE, DEFAULT_CONFIG), ("players.csv", DEFAULT_PLAYERS)] {
        let target = config_dir.join(name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                std::io::Write::write_all(&mut dest, content.as_bytes()).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                written.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }
    Ok(written)
}

/// Find and load the config, writing the defaults under `base_dir` when no
/// config exists anywhere and no path was given.
pub fn load_config(explicit: Option<&Path>, base_dir: &Path) -> Result<Config, ConfigError> {
    let path = match find_config(explicit, base_dir) {
        Ok(path) => path,
        Err(ConfigError::NotConfigured { .. }) => {
            let written = ensure_config_files(base_dir)?;
            for file in &written {
                info!("Wrote default {}", file.display());
            }
            base_dir.join("config").join(CONFIG_FILE)
        }
        Err(e) => return Err(e),
    };
    load_config_from(&path)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_roster(slots: &[String], field: &str) -> Result<Vec<RosterSlot>, ConfigError> {
    slots
        .iter()
        .enumerate()
        .map(|(i, s)| {
            RosterSlot::from_str_slot(s).ok_or_else(|| ConfigError::ValidationError {
                field: format!("{field}[{i}]"),
                message: format!("unknown roster slot \"{s}\""),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.rules.min_increment == 0 {
        return Err(ConfigError::ValidationError {
            field: "auction.min_increment".into(),
            message: "must be greater than 0".into(),
        });
    }

    for (i, owner) in config.owners.iter().enumerate() {
        if owner.roster.is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("auction.owner[{i}].roster"),
                message: "must list at least one slot".into(),
            });
        }
        let required = config.rules.min_bid as u64 * owner.roster.len() as u64;
        if (owner.budget as u64) < required {
            return Err(ConfigError::ValidationError {
                field: format!("auction.owner[{i}].budget"),
                message: format!(
                    "{} has ${} but needs ${required} to fill {} slots at the minimum bid",
                    owner.name,
                    owner.budget,
                    owner.roster.len()
                ),
            });
        }
    }

    let w = config.simulation.starter_weight;
    if !(0.0..=1.0).contains(&w) {
        return Err(ConfigError::ValidationError {
            field: "simulation.starter_weight".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {w}"),
        });
    }

    let f = config.simulation.value_fraction;
    if !f.is_finite() || f <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "simulation.value_fraction".into(),
            message: format!("must be > 0, got {f}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL: &str = r#"
[auction]
owners = 2
budget = 100
roster = ["QB", "RB", "flex", "BE"]

[players]
path = "sheet.csv"
"#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        parse_config(text, Path::new("auction.toml"), Path::new("/leagues/home"))
    }

    #[test]
    fn shipped_defaults_parse() {
        let config = parse(DEFAULT_CONFIG).expect("defaults should be valid");
        assert_eq!(config.owners.len(), 4);
        assert_eq!(config.owners[0].budget, 200);
        assert_eq!(config.rules, AuctionRules::default());
        assert_eq!(config.simulation.strategy, StrategyKind::Mixed);
        assert_eq!(config.players.path, Path::new("/leagues/home/players.csv"));
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.owners.len(), 2);
        assert_eq!(config.owners[1].name, "Owner 2");
        assert_eq!(
            config.owners[0].roster,
            vec![RosterSlot::Qb, RosterSlot::Rb, RosterSlot::Flex, RosterSlot::Bench]
        );
        assert_eq!(config.rules.min_bid, 1);
        assert_eq!(config.rules.unsold_policy, UnsoldPolicy::Discard);
        assert_eq!(config.players.format, SheetFormat::Simple);
        assert_eq!(config.players.strictness, LoadStrictness::Lenient);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn missing_roster_uses_standard() {
        let text = MINIMAL.replace("roster = [\"QB\", \"RB\", \"flex\", \"BE\"]\n", "");
        let config = parse(&text).unwrap();
        assert_eq!(config.owners[0].roster, default_roster());
    }

    #[test]
    fn per_owner_overrides() {
        let text = r#"
[auction]
roster = ["QB", "BN"]
unsold_policy = "requeue"

[[auction.owner]]
name = "Rich"
budget = 300

[[auction.owner]]
name = "Kicker fan"
budget = 5
roster = ["K"]

[players]
path = "/abs/cheatsheet.csv"
format = "fantasy_pros"
strictness = "strict"
"#;
        let config = parse(text).unwrap();
        assert_eq!(config.owners.len(), 2);
        assert_eq!(config.owners[0].roster, vec![RosterSlot::Qb, RosterSlot::Bench]);
        assert_eq!(config.owners[1].roster, vec![RosterSlot::K]);
        assert_eq!(config.rules.unsold_policy, UnsoldPolicy::Requeue);
        assert_eq!(config.players.path, Path::new("/abs/cheatsheet.csv"));
        assert_eq!(config.players.format, SheetFormat::FantasyPros);
        assert_eq!(config.players.strictness, LoadStrictness::Strict);
    }

    fn validation_field(text: &str) -> String {
        match parse(text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_zero_owners() {
        let text = MINIMAL.replace("owners = 2", "owners = 0");
        assert_eq!(validation_field(&text), "auction.owners");
    }

    #[test]
    fn rejects_unknown_slot() {
        let text = MINIMAL.replace("\"flex\"", "\"UTIL\"");
        assert_eq!(validation_field(&text), "auction.roster[2]");
    }

    #[test]
    fn rejects_budget_below_reserve() {
        let text = MINIMAL.replace("budget = 100", "budget = 3");
        assert_eq!(validation_field(&text), "auction.owner[0].budget");
    }

    #[test]
    fn rejects_zero_increment() {
        let text = MINIMAL.replace("budget = 100", "budget = 100\nmin_increment = 0");
        assert_eq!(validation_field(&text), "auction.min_increment");
    }

    #[test]
    fn rejects_starter_weight_out_of_range() {
        let text = format!("{MINIMAL}\n[simulation]\nstarter_weight = 1.5\n");
        assert_eq!(validation_field(&text), "simulation.starter_weight");
    }

    #[test]
    fn rejects_non_positive_value_fraction() {
        let text = format!("{MINIMAL}\n[simulation]\nvalue_fraction = 0.0\n");
        assert_eq!(validation_field(&text), "simulation.value_fraction");
    }

    #[test]
    fn parse_error_names_file() {
        let err = parse("[auction\nowners = 2").unwrap_err();
        match err {
            ConfigError::ParseError { path, .. } => assert_eq!(path, Path::new("auction.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    #[test]
    fn explicit_path_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        match find_config(Some(&missing), tmp.path()).unwrap_err() {
            ConfigError::FileNotFound { path } => assert_eq!(path, missing),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn finds_config_dir_under_base() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(tmp.path().join("config/auction.toml"), MINIMAL).unwrap();

        let found = find_config(None, tmp.path()).unwrap();
        assert_eq!(found, tmp.path().join("config/auction.toml"));

        let config = load_config_from(&found).unwrap();
        assert_eq!(config.players.path, tmp.path().join("config/sheet.csv"));
    }

    #[test]
    fn ensure_config_files_writes_once() {
        let tmp = tempfile::tempdir().unwrap();
        let written = ensure_config_files(tmp.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(tmp.path().join("config/auction.toml").exists());
        assert!(tmp.path().join("config/players.csv").exists());

        // Existing files are left alone.
        fs::write(tmp.path().join("config/auction.toml"), "# custom\n").unwrap();
        let written = ensure_config_files(tmp.path()).unwrap();
        assert!(written.is_empty());
        let content = fs::read_to_string(tmp.path().join("config/auction.toml")).unwrap();
        assert_eq!(content, "# custom\n");
    }

    #[test]
    fn load_config_with_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("league.toml");
        fs::write(&path, MINIMAL).unwrap();

        let config = load_config(Some(&path), tmp.path()).unwrap();
        assert_eq!(config.source, path);
        // Nothing written when a path is given.
        assert!(!tmp.path().join("config").exists());
    }
}
