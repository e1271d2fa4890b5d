// Draftable players and player-sheet loading.
//
// Two sheet layouts are understood: a plain headered CSV (name, position,
// value) and the FantasyPros auction cheatsheet export, whose first column
// packs "Name (POS - TEAM)" and whose third column holds "$NN".

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::position::Position;

/// Stable identifier of a player within one auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A draftable player. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Projected worth, used for valuation and reporting. Not a price.
    pub value: f64,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Position, value: f64) -> Self {
        Player {
            id: PlayerId(id),
            name: name.into(),
            position,
            value,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (${:.0})", self.position, self.name, self.value)
    }
}

// ---------------------------------------------------------------------------
// Load options and results
// ---------------------------------------------------------------------------

/// Layout of a player sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetFormat {
    /// Headered CSV with name, position and value columns.
    #[default]
    Simple,
    /// FantasyPros auction cheatsheet export.
    FantasyPros,
}

/// What to do with a row that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrictness {
    /// The first bad row fails the whole load.
    Strict,
    /// Bad rows are reported and skipped.
    #[default]
    Lenient,
}

/// A single row that could not be turned into a player.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}, field `{field}`: {message}")]
pub struct RowError {
    /// 1-based line number in the source file.
    pub line: u64,
    pub field: String,
    pub message: String,
}

/// Players loaded from a sheet along with any rows that were skipped.
#[derive(Debug, Clone)]
pub struct PlayerLoad {
    pub players: Vec<Player>,
    pub skipped: Vec<RowError>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlayerLoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid player row: {0}")]
    Row(RowError),

    #[error("player sheet contains no data rows")]
    Empty,

    #[error("no valid players: all {} rows failed to parse", .skipped.len())]
    NoValidRows { skipped: Vec<RowError> },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Plain sheet row. Every field is optional so a missing cell is reported
/// against its column rather than as an opaque deserialization failure.
/// Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(alias = "Name", alias = "Player", alias = "player", default)]
    name: Option<String>,
    #[serde(alias = "Position", alias = "Pos", alias = "POS", alias = "pos", default)]
    position: Option<String>,
    #[serde(alias = "Value", alias = "AAV", alias = "Price", alias = "$", default)]
    value: Option<String>,
}

// ---------------------------------------------------------------------------
// Field parsing helpers
// ---------------------------------------------------------------------------

fn row_error(line: u64, field: &str, message: impl Into<String>) -> RowError {
    RowError {
        line,
        field: field.to_string(),
        message: message.into(),
    }
}

fn required<'a>(cell: Option<&'a str>, line: u64, field: &str) -> Result<&'a str, RowError> {
    match cell.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(row_error(line, field, "missing value")),
    }
}

fn parse_position(raw: &str, line: u64) -> Result<Position, RowError> {
    Position::from_str_pos(raw)
        .ok_or_else(|| row_error(line, "position", format!("unrecognized position '{raw}'")))
}

/// Parse a dollar value such as "45", "$45" or "12.5".
fn parse_value(raw: &str, line: u64) -> Result<f64, RowError> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(row_error(line, "value", format!("not a number: '{raw}'"))),
    }
}

/// Split a cheatsheet cell like "Patrick Mahomes (KC - QB)" or
/// "Justin Jefferson (WR - MIN)" into name and position.
fn split_cheatsheet_name(cell: &str, line: u64) -> Result<(String, Position), RowError> {
    let open = cell
        .find('(')
        .ok_or_else(|| row_error(line, "name", format!("expected 'Name (POS - TEAM)', got '{cell}'")))?;
    let close = cell[open..].find(')').map(|i| open + i).unwrap_or(cell.len());

    let name = cell[..open].trim();
    if name.is_empty() {
        return Err(row_error(line, "name", "missing value"));
    }

    // The position is whichever token in the parenthesised part parses.
    let inner = &cell[open + 1..close];
    let position = inner
        .split('-')
        .find_map(Position::from_str_pos)
        .ok_or_else(|| row_error(line, "position", format!("unrecognized position in '{inner}'")))?;

    Ok((name.to_string(), position))
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

/// Collects rows and applies the strictness policy.
struct Collector {
    strictness: LoadStrictness,
    players: Vec<Player>,
    skipped: Vec<RowError>,
}

impl Collector {
    fn new(strictness: LoadStrictness) -> Self {
        Collector {
            strictness,
            players: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn push(&mut self, row: Result<(String, Position, f64), RowError>) -> Result<(), PlayerLoadError> {
        match row {
            Ok((name, position, value)) => {
                let id = self.players.len() as u32;
                self.players.push(Player::new(id, name, position, value));
                Ok(())
            }
            Err(e) if self.strictness == LoadStrictness::Strict => Err(PlayerLoadError::Row(e)),
            Err(e) => {
                warn!("skipping player row: {}", e);
                self.skipped.push(e);
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<PlayerLoad, PlayerLoadError> {
        if self.players.is_empty() {
            if self.skipped.is_empty() {
                return Err(PlayerLoadError::Empty);
            }
            return Err(PlayerLoadError::NoValidRows {
                skipped: self.skipped,
            });
        }
        Ok(PlayerLoad {
            players: self.players,
            skipped: self.skipped,
        })
    }
}

fn csv_line(pos: Option<&csv::Position>) -> u64 {
    pos.map(|p| p.line()).unwrap_or(0)
}

/// Load players from a plain headered sheet.
pub fn load_simple_from_reader<R: Read>(
    rdr: R,
    strictness: LoadStrictness,
) -> Result<PlayerLoad, PlayerLoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| PlayerLoadError::Csv {
            path: "<reader>".into(),
            source: e,
        })?
        .clone();
    let mut collector = Collector::new(strictness);

    for result in reader.records() {
        let row = match result {
            Ok(record) => {
                let line = csv_line(record.position());
                match record.deserialize::<RawPlayerRow>(Some(&headers)) {
                    Ok(raw) => parse_simple_row(&raw, line),
                    Err(e) => Err(row_error(line, "row", e.to_string())),
                }
            }
            Err(e) => Err(row_error(csv_line(e.position()), "row", e.to_string())),
        };
        collector.push(row)?;
    }

    collector.finish()
}

fn parse_simple_row(raw: &RawPlayerRow, line: u64) -> Result<(String, Position, f64), RowError> {
    let name = required(raw.name.as_deref(), line, "name")?;
    let position = parse_position(required(raw.position.as_deref(), line, "position")?, line)?;
    let value = parse_value(required(raw.value.as_deref(), line, "value")?, line)?;
    Ok((name.to_string(), position, value))
}

/// Number of preamble lines before the first player in a cheatsheet export.
const CHEATSHEET_PREAMBLE_LINES: usize = 2;

/// Load players from a FantasyPros auction cheatsheet export.
pub fn load_fantasypros_from_reader<R: Read>(
    rdr: R,
    strictness: LoadStrictness,
) -> Result<PlayerLoad, PlayerLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut collector = Collector::new(strictness);

    for result in reader.records().skip(CHEATSHEET_PREAMBLE_LINES) {
        let row = match result {
            Ok(record) => {
                let line = csv_line(record.position());
                if record.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                parse_cheatsheet_row(&record, line)
            }
            Err(e) => Err(row_error(csv_line(e.position()), "row", e.to_string())),
        };
        collector.push(row)?;
    }

    collector.finish()
}

fn parse_cheatsheet_row(
    record: &csv::StringRecord,
    line: u64,
) -> Result<(String, Position, f64), RowError> {
    let cell = required(record.get(0), line, "name")?;
    let (name, position) = split_cheatsheet_name(cell, line)?;
    let value = parse_value(required(record.get(2), line, "value")?, line)?;
    Ok((name, position, value))
}

/// Load players from any reader in the given layout.
pub fn load_players_from_reader<R: Read>(
    rdr: R,
    format: SheetFormat,
    strictness: LoadStrictness,
) -> Result<PlayerLoad, PlayerLoadError> {
    match format {
        SheetFormat::Simple => load_simple_from_reader(rdr, strictness),
        SheetFormat::FantasyPros => load_fantasypros_from_reader(rdr, strictness),
    }
}

/// Load players from a sheet on disk.
pub fn load_players(
    path: &Path,
    format: SheetFormat,
    strictness: LoadStrictness,
) -> Result<PlayerLoad, PlayerLoadError> {
    let file = std::fs::File::open(path).map_err(|e| PlayerLoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file, format, strictness).map_err(|e| match e {
        PlayerLoadError::Csv { source, .. } => PlayerLoadError::Csv {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
