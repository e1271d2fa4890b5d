// Per-owner budget and roster state.
//
// Budget and roster are only ever changed through `Owner::assign`, which keeps
// the reserve rule checkable in one place: an owner must always hold at least
// `min_bid` for every slot still open.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerId};
use crate::position::{Position, RosterSlot};

/// Index of an owner within an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub usize);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner {}", self.0)
    }
}

/// A player won at auction and the price paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub player: Player,
    pub price: u32,
}

/// One slot on an owner's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSlot {
    pub slot: RosterSlot,
    /// The purchase filling this slot, if any. Never cleared once set.
    pub purchase: Option<Purchase>,
}

impl OwnerSlot {
    pub fn is_open(&self) -> bool {
        self.purchase.is_none()
    }
}

/// Why `Owner::assign` refused a purchase. Any of these means the caller
/// skipped its own legality checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IllegalAssignment {
    #[error("slot index {slot} is out of range for a roster of {len}")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("slot {slot} ({kind}) is already filled")]
    SlotOccupied { slot: usize, kind: RosterSlot },

    #[error("slot {slot} ({kind}) does not accept position {position}")]
    SlotRejectsPosition {
        slot: usize,
        kind: RosterSlot,
        position: Position,
    },

    #[error("no open slot accepts position {position}")]
    NoEligibleSlot { position: Position },

    #[error("player {player} is already on this roster")]
    AlreadyOwned { player: PlayerId },

    #[error("price ${price} exceeds remaining budget ${budget}")]
    ExceedsBudget { price: u32, budget: u32 },

    #[error("price ${price} exceeds max bid ${max_bid}; open slots could not be filled")]
    BreaksReserve { price: u32, max_bid: u32 },
}

/// A participant in the auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    starting_budget: u32,
    budget_remaining: u32,
    /// Amount reserved per open slot beyond the one being bid on.
    min_bid: u32,
    roster: Vec<OwnerSlot>,
    /// Players won, in purchase order.
    won: Vec<PlayerId>,
}

impl Owner {
    /// Create an owner with a full budget and every slot of `roster` empty.
    ///
    /// Slot order is kept as given; it decides tie-breaks between equally
    /// specific slots.
    pub fn new(
        id: OwnerId,
        name: impl Into<String>,
        budget: u32,
        roster: &[RosterSlot],
        min_bid: u32,
    ) -> Self {
        Owner {
            id,
            name: name.into(),
            starting_budget: budget,
            budget_remaining: budget,
            min_bid,
            roster: roster
                .iter()
                .map(|&slot| OwnerSlot {
                    slot,
                    purchase: None,
                })
                .collect(),
            won: Vec::new(),
        }
    }

    pub fn starting_budget(&self) -> u32 {
        self.starting_budget
    }

    pub fn budget_remaining(&self) -> u32 {
        self.budget_remaining
    }

    /// Total spent so far.
    pub fn spent(&self) -> u32 {
        self.starting_budget - self.budget_remaining
    }

    pub fn roster(&self) -> &[OwnerSlot] {
        &self.roster
    }

    pub fn won_players(&self) -> &[PlayerId] {
        &self.won
    }

    /// Slots not yet assigned a player, with their roster index.
    pub fn open_slots(&self) -> impl Iterator<Item = (usize, RosterSlot)> + '_ {
        self.roster
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_open())
            .map(|(i, s)| (i, s.slot))
    }

    pub fn open_slot_count(&self) -> usize {
        self.roster.iter().filter(|s| s.is_open()).count()
    }

    pub fn filled_count(&self) -> usize {
        self.won.len()
    }

    pub fn is_full(&self) -> bool {
        self.open_slot_count() == 0
    }

    /// Highest bid this owner can make on a single player.
    ///
    /// Reserves `min_bid` for each open slot other than the one being bid on.
    /// Zero when the roster is full.
    pub fn max_bid(&self) -> u32 {
        let open = self.open_slot_count();
        if open == 0 {
            return 0;
        }
        let reserved = self.min_bid.saturating_mul((open - 1) as u32);
        self.budget_remaining.saturating_sub(reserved)
    }

    /// Whether paying `bid` still leaves `min_bid` for every other open slot.
    pub fn can_afford(&self, bid: u32) -> bool {
        !self.is_full() && bid <= self.max_bid()
    }

    /// Indices of open slots that accept the player's position.
    pub fn eligible_slots_for(&self, player: &Player) -> Vec<usize> {
        self.open_slots()
            .filter(|(_, slot)| slot.accepts(player.position))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn owns(&self, player: PlayerId) -> bool {
        self.won.contains(&player)
    }

    /// Whether this owner may legally win `player` at `bid`: it has an open
    /// slot for the position, can afford the bid, and does not already own
    /// the player.
    pub fn can_buy(&self, player: &Player, bid: u32) -> bool {
        !self.owns(player.id)
            && self.can_afford(bid)
            && self
                .open_slots()
                .any(|(_, slot)| slot.accepts(player.position))
    }

    /// Pick the slot a newly won player goes into.
    ///
    /// Prefers the most specific open slot (fewest accepted positions) so
    /// flexible capacity stays free; ties go to the lowest index.
    pub fn choose_slot(&self, player: &Player) -> Option<usize> {
        self.eligible_slots_for(player)
            .into_iter()
            .min_by_key(|&i| (self.roster[i].slot.num_accepted(), i))
    }

    /// Record a won player in `slot`, paying `price`.
    pub fn assign(&mut self, player: &Player, price: u32, slot: usize) -> Result<(), IllegalAssignment> {
        let len = self.roster.len();
        let target = self
            .roster
            .get(slot)
            .ok_or(IllegalAssignment::SlotOutOfRange { slot, len })?;

        if !target.is_open() {
            return Err(IllegalAssignment::SlotOccupied {
                slot,
                kind: target.slot,
            });
        }
        if !target.slot.accepts(player.position) {
            return Err(IllegalAssignment::SlotRejectsPosition {
                slot,
                kind: target.slot,
                position: player.position,
            });
        }
        if self.owns(player.id) {
            return Err(IllegalAssignment::AlreadyOwned { player: player.id });
        }
        if price > self.budget_remaining {
            return Err(IllegalAssignment::ExceedsBudget {
                price,
                budget: self.budget_remaining,
            });
        }
        let max_bid = self.max_bid();
        if price > max_bid {
            return Err(IllegalAssignment::BreaksReserve { price, max_bid });
        }

        self.budget_remaining -= price;
        self.roster[slot].purchase = Some(Purchase {
            player: player.clone(),
            price,
        });
        self.won.push(player.id);
        Ok(())
    }

    /// Budget left minus the reserve for open slots. Never negative while the
    /// reserve rule holds.
    pub fn reserve_surplus(&self) -> i64 {
        self.budget_remaining as i64 - self.min_bid as i64 * self.open_slot_count() as i64
    }

    // -- Scoring --

    /// Total projected value of players in non-bench slots.
    pub fn starter_value(&self) -> f64 {
        self.roster
            .iter()
            .filter(|s| !s.slot.is_bench())
            .filter_map(|s| s.purchase.as_ref())
            .map(|p| p.player.value)
            .sum()
    }

    /// Total projected value of players on the bench.
    pub fn bench_value(&self) -> f64 {
        self.roster
            .iter()
            .filter(|s| s.slot.is_bench())
            .filter_map(|s| s.purchase.as_ref())
            .map(|p| p.player.value)
            .sum()
    }

    /// Weighted blend of starter and bench value.
    ///
    /// `starter_weight` of 1.0 ignores the bench entirely; 0.0 counts only
    /// the bench.
    pub fn score(&self, starter_weight: f64) -> f64 {
        self.starter_value() * starter_weight + self.bench_value() * (1.0 - starter_weight)
    }
}
