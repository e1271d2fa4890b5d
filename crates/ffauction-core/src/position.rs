// Football positions and the roster slot kinds that hold them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions a draftable player can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "DST")]
    Defense,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "LB")]
    Linebacker,
    #[serde(rename = "DE")]
    DefensiveEnd,
    #[serde(rename = "DT")]
    DefensiveTackle,
    #[serde(rename = "CB")]
    Cornerback,
    #[serde(rename = "S")]
    Safety,
}

impl Position {
    pub const ALL: [Position; 11] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Defense,
        Position::Kicker,
        Position::Linebacker,
        Position::DefensiveEnd,
        Position::DefensiveTackle,
        Position::Cornerback,
        Position::Safety,
    ];

    /// Parse a position abbreviation.
    ///
    /// Case-insensitive. Accepts the common cheatsheet spellings:
    /// - "DST", "D/ST", "DEF" -> Defense
    /// - "K", "PK" -> Kicker
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            "K" | "PK" => Some(Position::Kicker),
            "LB" => Some(Position::Linebacker),
            "DE" => Some(Position::DefensiveEnd),
            "DT" => Some(Position::DefensiveTackle),
            "CB" => Some(Position::Cornerback),
            "S" => Some(Position::Safety),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Defense => "DST",
            Position::Kicker => "K",
            Position::Linebacker => "LB",
            Position::DefensiveEnd => "DE",
            Position::DefensiveTackle => "DT",
            Position::Cornerback => "CB",
            Position::Safety => "S",
        }
    }

    /// Whether this is an individual defensive player position.
    pub fn is_idp(&self) -> bool {
        matches!(
            self,
            Position::Linebacker
                | Position::DefensiveEnd
                | Position::DefensiveTackle
                | Position::Cornerback
                | Position::Safety
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Roster slots
// ---------------------------------------------------------------------------

use Position::*;

const QB_ONLY: &[Position] = &[Quarterback];
const RB_ONLY: &[Position] = &[RunningBack];
const WR_ONLY: &[Position] = &[WideReceiver];
const TE_ONLY: &[Position] = &[TightEnd];
const WR_RB: &[Position] = &[WideReceiver, RunningBack];
const WR_TE: &[Position] = &[WideReceiver, TightEnd];
const RB_TE: &[Position] = &[RunningBack, TightEnd];
const WR_RB_TE: &[Position] = &[WideReceiver, RunningBack, TightEnd];
const QB_WR_RB_TE: &[Position] = &[Quarterback, WideReceiver, RunningBack, TightEnd];
const DST_ONLY: &[Position] = &[Defense];
const K_ONLY: &[Position] = &[Kicker];
const DL: &[Position] = &[DefensiveTackle, DefensiveEnd];
const LB_ONLY: &[Position] = &[Linebacker];
const DB: &[Position] = &[Cornerback, Safety];
const IDP: &[Position] = &[Linebacker, DefensiveEnd, DefensiveTackle, Cornerback, Safety];
const DE_ONLY: &[Position] = &[DefensiveEnd];
const DT_ONLY: &[Position] = &[DefensiveTackle];
const CB_ONLY: &[Position] = &[Cornerback];
const S_ONLY: &[Position] = &[Safety];

/// A kind of opening on a roster.
///
/// Fixed slots accept exactly one position; flexible slots accept a set.
/// Eligibility is set membership against `accepted_positions()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterSlot {
    #[serde(rename = "QB")]
    Qb,
    #[serde(rename = "RB")]
    Rb,
    #[serde(rename = "WR")]
    Wr,
    #[serde(rename = "TE")]
    Te,
    #[serde(rename = "WR/RB")]
    WrRb,
    #[serde(rename = "WR/TE")]
    WrTe,
    #[serde(rename = "RB/TE")]
    RbTe,
    #[serde(rename = "WR/RB/TE", alias = "FLEX")]
    Flex,
    #[serde(rename = "QB/WR/RB/TE", alias = "SUPERFLEX")]
    SuperFlex,
    #[serde(rename = "DST", alias = "D/ST")]
    Dst,
    #[serde(rename = "K")]
    K,
    #[serde(rename = "BN", alias = "BE")]
    Bench,
    #[serde(rename = "DL")]
    Dl,
    #[serde(rename = "LB")]
    Lb,
    #[serde(rename = "DB")]
    Db,
    #[serde(rename = "IDP")]
    Idp,
    #[serde(rename = "DE")]
    De,
    #[serde(rename = "DT")]
    Dt,
    #[serde(rename = "CB")]
    Cb,
    #[serde(rename = "S")]
    S,
}

impl RosterSlot {
    pub const ALL: [RosterSlot; 20] = [
        RosterSlot::Qb,
        RosterSlot::Rb,
        RosterSlot::Wr,
        RosterSlot::Te,
        RosterSlot::WrRb,
        RosterSlot::WrTe,
        RosterSlot::RbTe,
        RosterSlot::Flex,
        RosterSlot::SuperFlex,
        RosterSlot::Dst,
        RosterSlot::K,
        RosterSlot::Bench,
        RosterSlot::Dl,
        RosterSlot::Lb,
        RosterSlot::Db,
        RosterSlot::Idp,
        RosterSlot::De,
        RosterSlot::Dt,
        RosterSlot::Cb,
        RosterSlot::S,
    ];

    /// The set of positions this slot can hold. Never empty.
    pub fn accepted_positions(&self) -> &'static [Position] {
        match self {
            RosterSlot::Qb => QB_ONLY,
            RosterSlot::Rb => RB_ONLY,
            RosterSlot::Wr => WR_ONLY,
            RosterSlot::Te => TE_ONLY,
            RosterSlot::WrRb => WR_RB,
            RosterSlot::WrTe => WR_TE,
            RosterSlot::RbTe => RB_TE,
            RosterSlot::Flex => WR_RB_TE,
            RosterSlot::SuperFlex => QB_WR_RB_TE,
            RosterSlot::Dst => DST_ONLY,
            RosterSlot::K => K_ONLY,
            RosterSlot::Bench => &Position::ALL,
            RosterSlot::Dl => DL,
            RosterSlot::Lb => LB_ONLY,
            RosterSlot::Db => DB,
            RosterSlot::Idp => IDP,
            RosterSlot::De => DE_ONLY,
            RosterSlot::Dt => DT_ONLY,
            RosterSlot::Cb => CB_ONLY,
            RosterSlot::S => S_ONLY,
        }
    }

    pub fn accepts(&self, position: Position) -> bool {
        self.accepted_positions().contains(&position)
    }

    /// Number of distinct positions this slot accepts. Lower is more specific.
    pub fn num_accepted(&self) -> usize {
        self.accepted_positions().len()
    }

    /// Whether this slot accepts exactly one position.
    pub fn is_fixed(&self) -> bool {
        self.num_accepted() == 1
    }

    pub fn is_bench(&self) -> bool {
        *self == RosterSlot::Bench
    }

    /// Every slot kind that can hold the given position, most specific first.
    pub fn slots_for(position: Position) -> Vec<RosterSlot> {
        let mut slots: Vec<RosterSlot> = Self::ALL
            .iter()
            .copied()
            .filter(|slot| slot.accepts(position))
            .collect();
        slots.sort_by_key(|slot| slot.num_accepted());
        slots
    }

    /// Parse a slot abbreviation such as "QB", "WR/RB/TE" or "BN".
    pub fn from_str_slot(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(RosterSlot::Qb),
            "RB" => Some(RosterSlot::Rb),
            "WR" => Some(RosterSlot::Wr),
            "TE" => Some(RosterSlot::Te),
            "WR/RB" | "RB/WR" => Some(RosterSlot::WrRb),
            "WR/TE" | "TE/WR" => Some(RosterSlot::WrTe),
            "RB/TE" | "TE/RB" => Some(RosterSlot::RbTe),
            "WR/RB/TE" | "FLEX" => Some(RosterSlot::Flex),
            "QB/WR/RB/TE" | "SUPERFLEX" | "OP" => Some(RosterSlot::SuperFlex),
            "DST" | "D/ST" | "DEF" => Some(RosterSlot::Dst),
            "K" | "PK" => Some(RosterSlot::K),
            "BN" | "BE" => Some(RosterSlot::Bench),
            "DL" => Some(RosterSlot::Dl),
            "LB" => Some(RosterSlot::Lb),
            "DB" => Some(RosterSlot::Db),
            "IDP" => Some(RosterSlot::Idp),
            "DE" => Some(RosterSlot::De),
            "DT" => Some(RosterSlot::Dt),
            "CB" => Some(RosterSlot::Cb),
            "S" => Some(RosterSlot::S),
            _ => None,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            RosterSlot::Qb => "QB",
            RosterSlot::Rb => "RB",
            RosterSlot::Wr => "WR",
            RosterSlot::Te => "TE",
            RosterSlot::WrRb => "WR/RB",
            RosterSlot::WrTe => "WR/TE",
            RosterSlot::RbTe => "RB/TE",
            RosterSlot::Flex => "WR/RB/TE",
            RosterSlot::SuperFlex => "QB/WR/RB/TE",
            RosterSlot::Dst => "DST",
            RosterSlot::K => "K",
            RosterSlot::Bench => "BN",
            RosterSlot::Dl => "DL",
            RosterSlot::Lb => "LB",
            RosterSlot::Db => "DB",
            RosterSlot::Idp => "IDP",
            RosterSlot::De => "DE",
            RosterSlot::Dt => "DT",
            RosterSlot::Cb => "CB",
            RosterSlot::S => "S",
        }
    }
}

impl fmt::Display for RosterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.abbreviation())
    }
}

/// A typical league roster:
/// QB, RB, RB, WR, WR, WR/RB/TE, TE, K, DST and six bench spots.
pub fn default_roster() -> Vec<RosterSlot> {
    let mut roster = vec![
        RosterSlot::Qb,
        RosterSlot::Rb,
        RosterSlot::Rb,
        RosterSlot::Wr,
        RosterSlot::Wr,
        RosterSlot::Flex,
        RosterSlot::Te,
        RosterSlot::K,
        RosterSlot::Dst,
    ];
    roster.extend(std::iter::repeat(RosterSlot::Bench).take(6));
    roster
}
