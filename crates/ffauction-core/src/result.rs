// Final auction output: rosters, budgets, leftover players and the event log.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auction::AuctionEvent;
use crate::owner::{Owner, OwnerId};
use crate::player::Player;
use crate::position::RosterSlot;

/// One roster slot as it stood when the auction ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotResult {
    pub slot: RosterSlot,
    pub player: Option<Player>,
    pub price: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerResult {
    pub id: OwnerId,
    pub name: String,
    pub starting_budget: u32,
    pub budget_remaining: u32,
    pub spent: u32,
    pub roster: Vec<SlotResult>,
    pub starter_value: f64,
    pub bench_value: f64,
}

impl OwnerResult {
    pub fn from_owner(owner: &Owner) -> Self {
        OwnerResult {
            id: owner.id,
            name: owner.name.clone(),
            starting_budget: owner.starting_budget(),
            budget_remaining: owner.budget_remaining(),
            spent: owner.spent(),
            roster: owner
                .roster()
                .iter()
                .map(|s| SlotResult {
                    slot: s.slot,
                    player: s.purchase.as_ref().map(|p| p.player.clone()),
                    price: s.purchase.as_ref().map(|p| p.price),
                })
                .collect(),
            starter_value: owner.starter_value(),
            bench_value: owner.bench_value(),
        }
    }

    pub fn filled_count(&self) -> usize {
        self.roster.iter().filter(|s| s.player.is_some()).count()
    }

    pub fn open_slot_count(&self) -> usize {
        self.roster.len() - self.filled_count()
    }

    pub fn score(&self, starter_weight: f64) -> f64 {
        self.starter_value * starter_weight + self.bench_value * (1.0 - starter_weight)
    }
}

/// Everything a finished auction produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionResult {
    pub owners: Vec<OwnerResult>,
    /// Nominated players that drew no bids and left the pool.
    pub unsold: Vec<Player>,
    /// Players never sold, in queue order.
    pub undrafted: Vec<Player>,
    pub events: Vec<AuctionEvent>,
}

impl AuctionResult {
    pub fn new(
        owners: &[Owner],
        unsold: Vec<Player>,
        undrafted: Vec<Player>,
        events: Vec<AuctionEvent>,
    ) -> Self {
        AuctionResult {
            owners: owners.iter().map(OwnerResult::from_owner).collect(),
            unsold,
            undrafted,
            events,
        }
    }

    /// Each owner's weighted roster score, in owner order.
    pub fn scores(&self, starter_weight: f64) -> Vec<(OwnerId, f64)> {
        self.owners
            .iter()
            .map(|o| (o.id, o.score(starter_weight)))
            .collect()
    }

    /// Owner with the highest score. Ties go to the lower owner index.
    pub fn leader(&self, starter_weight: f64) -> Option<OwnerId> {
        self.scores(starter_weight)
            .into_iter()
            .fold(None, |best: Option<(OwnerId, f64)>, (id, s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((id, s)),
            })
            .map(|(id, _)| id)
    }

    /// Roster slots left empty across every owner.
    pub fn open_slot_count(&self) -> usize {
        self.owners.iter().map(OwnerResult::open_slot_count).sum()
    }

    pub fn total_spent(&self) -> u32 {
        self.owners.iter().map(|o| o.spent).sum()
    }
}

impl fmt::Display for AuctionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for owner in &self.owners {
            writeln!(
                f,
                "{} ({}): spent ${} of ${}, ${} left",
                owner.name, owner.id, owner.spent, owner.starting_budget, owner.budget_remaining
            )?;
            for s in &owner.roster {
                match (&s.player, s.price) {
                    (Some(p), Some(price)) => {
                        writeln!(f, "  {:<9} {:<28} ${:>3}  (value {:.1})", s.slot, p.name, price, p.value)?
                    }
                    _ => writeln!(f, "  {:<9} -", s.slot)?,
                }
            }
            writeln!(
                f,
                "  starters {:.1}, bench {:.1}",
                owner.starter_value, owner.bench_value
            )?;
            writeln!(f)?;
        }
        write!(
            f,
            "{} sold for ${}, {} unsold, {} undrafted, {} slots unfilled",
            self.owners.iter().map(OwnerResult::filled_count).sum::<usize>(),
            self.total_spent(),
            self.unsold.len(),
            self.undrafted.len(),
            self.open_slot_count()
        )
    }
}
