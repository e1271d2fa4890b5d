// Auction engine: nomination rotation, bidding, and roster assignment.
//
// The engine is a synchronous state machine:
//
//   AwaitingNomination -> Bidding -> Resolving -> AwaitingNomination ...
//                                                 \-> Complete
//
// Each call to `Auction::step` performs one transition or one bid
// solicitation. Decisions come from a `NominationSource` and a `BidSource`;
// the engine only enforces legality. Illegal bids become passes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::owner::{IllegalAssignment, Owner, OwnerId};
use crate::player::{Player, PlayerId};
use crate::position::RosterSlot;
use crate::result::AuctionResult;
use crate::source::{
    BidContext, BidDecision, BidSource, HighestValueNominator, NominationContext, NominationSource,
};

// ---------------------------------------------------------------------------
// Rules and setup
// ---------------------------------------------------------------------------

/// What happens to a nominated player nobody bids on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsoldPolicy {
    /// Drop the player from the pool for good.
    #[default]
    Discard,
    /// Put the player at the back of the nomination queue, at most
    /// `max_requeues` times, then discard.
    Requeue,
}

/// Bidding rules shared by every owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionRules {
    /// Smallest legal opening bid, and the amount reserved per open slot.
    pub min_bid: u32,
    /// Smallest legal raise over the standing bid. Must be at least 1.
    pub min_increment: u32,
    pub unsold_policy: UnsoldPolicy,
    pub max_requeues: u32,
}

impl Default for AuctionRules {
    fn default() -> Self {
        AuctionRules {
            min_bid: 1,
            min_increment: 1,
            unsold_policy: UnsoldPolicy::Discard,
            max_requeues: 1,
        }
    }
}

/// Starting budget and roster template for one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSpec {
    pub name: String,
    pub budget: u32,
    pub roster: Vec<RosterSlot>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("an auction needs at least one owner")]
    NoOwners,

    #[error("{owner} has an empty roster")]
    EmptyRoster { owner: OwnerId },

    #[error("min_increment must be at least 1")]
    ZeroIncrement,

    #[error("player id {player} appears more than once")]
    DuplicatePlayer { player: PlayerId },

    #[error("{owner} budget ${budget} cannot cover ${required} in minimum bids")]
    BudgetBelowReserve {
        owner: OwnerId,
        budget: u32,
        required: u32,
    },

    #[error("engine tried to give player {player} to {owner}: {source}")]
    IllegalAssignment {
        owner: OwnerId,
        player: PlayerId,
        source: IllegalAssignment,
    },
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Why a bid was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IllegalBid {
    #[error("bid ${bid} is below the minimum of ${min}")]
    BelowMinimum { bid: u32, min: u32 },

    #[error("bid ${bid} is above the owner's max bid of ${max}")]
    AboveMaxBid { bid: u32, max: u32 },

    #[error("owner has no open slot for this player")]
    NoEligibleSlot,

    #[error("owner already has this player")]
    AlreadyOwned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassReason {
    /// The bid source chose to pass.
    Declined,
    /// The owner could not legally bid the next amount and was skipped.
    Ineligible,
    /// The bid source offered an illegal bid.
    Illegal { offered: u32, error: IllegalBid },
}

/// One entry in the auction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuctionEvent {
    /// The nomination source asked for a player that could not be put up.
    /// The engine substituted the default choice.
    NominationRejected {
        by: OwnerId,
        requested: PlayerId,
        opening_bid: u32,
    },
    Nominated {
        by: OwnerId,
        player: PlayerId,
        opening_bid: u32,
        opening_accepted: bool,
    },
    Bid {
        owner: OwnerId,
        amount: u32,
    },
    Passed {
        owner: OwnerId,
        reason: PassReason,
    },
    Sold {
        player: PlayerId,
        owner: OwnerId,
        price: u32,
        slot: usize,
    },
    Unsold {
        player: PlayerId,
        requeued: bool,
    },
    Complete,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionState {
    AwaitingNomination,
    Bidding,
    Resolving,
    Complete,
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuctionState::AwaitingNomination => "awaiting nomination",
            AuctionState::Bidding => "bidding",
            AuctionState::Resolving => "resolving",
            AuctionState::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// The standing high bid on a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingBid {
    pub owner: OwnerId,
    pub amount: u32,
}

/// A player currently up for bidding.
#[derive(Debug, Clone)]
struct Lot {
    /// Index into `Auction::players`.
    player_idx: usize,
    nominated_by: OwnerId,
    high: Option<StandingBid>,
    /// Owners still in the running for this player.
    active: Vec<bool>,
    /// Next owner index to solicit.
    cursor: usize,
}

impl Lot {
    fn min_next_bid(&self, rules: &AuctionRules) -> u32 {
        match self.high {
            Some(bid) => bid.amount.saturating_add(rules.min_increment),
            None => rules.min_bid,
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    AwaitingNomination,
    Bidding(Lot),
    Resolving(Lot),
    Complete,
}

/// Read-only view of the lot being bid on.
#[derive(Debug, Clone, Copy)]
pub struct LotView<'a> {
    pub player: &'a Player,
    pub nominated_by: OwnerId,
    pub high: Option<StandingBid>,
    pub min_next_bid: u32,
}

// ---------------------------------------------------------------------------
// Auction
// ---------------------------------------------------------------------------

/// A fantasy football auction draft.
///
/// Owns every `Owner` and the player pool; nothing outside the engine can
/// change a budget or roster.
#[derive(Debug)]
pub struct Auction {
    rules: AuctionRules,
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
    /// Undrafted player ids in nomination-queue order.
    undrafted: Vec<PlayerId>,
    owners: Vec<Owner>,
    phase: Phase,
    /// Index of the owner whose turn it is to nominate.
    turn: usize,
    unsold: Vec<PlayerId>,
    requeues: HashMap<PlayerId, u32>,
    events: Vec<AuctionEvent>,
}

impl Auction {
    /// Start an auction where every owner has the same budget and roster.
    pub fn new(
        players: Vec<Player>,
        num_owners: usize,
        budget: u32,
        roster: &[RosterSlot],
        rules: AuctionRules,
    ) -> Result<Self, AuctionError> {
        let specs = (0..num_owners)
            .map(|i| OwnerSpec {
                name: format!("Owner {i}"),
                budget,
                roster: roster.to_vec(),
            })
            .collect();
        Self::with_owners(players, specs, rules)
    }

    /// Start an auction with per-owner budgets and rosters.
    pub fn with_owners(
        players: Vec<Player>,
        specs: Vec<OwnerSpec>,
        rules: AuctionRules,
    ) -> Result<Self, AuctionError> {
        if specs.is_empty() {
            return Err(AuctionError::NoOwners);
        }
        if rules.min_increment == 0 {
            return Err(AuctionError::ZeroIncrement);
        }

        let mut owners = Vec::with_capacity(specs.len());
        for (i, spec) in specs.into_iter().enumerate() {
            let id = OwnerId(i);
            if spec.roster.is_empty() {
                return Err(AuctionError::EmptyRoster { owner: id });
            }
            let required = rules.min_bid.saturating_mul(spec.roster.len() as u32);
            if spec.budget < required {
                return Err(AuctionError::BudgetBelowReserve {
                    owner: id,
                    budget: spec.budget,
                    required,
                });
            }
            owners.push(Owner::new(id, spec.name, spec.budget, &spec.roster, rules.min_bid));
        }

        let mut index = HashMap::with_capacity(players.len());
        for (i, p) in players.iter().enumerate() {
            if index.insert(p.id, i).is_some() {
                return Err(AuctionError::DuplicatePlayer { player: p.id });
            }
        }

        // Queue order: highest value first, ties by id.
        let mut order: Vec<&Player> = players.iter().collect();
        order.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.id.cmp(&b.id)));
        let undrafted = order.into_iter().map(|p| p.id).collect();

        info!(
            "Auction created: {} owners, {} players, min bid ${}",
            owners.len(),
            players.len(),
            rules.min_bid
        );

        Ok(Auction {
            rules,
            players,
            index,
            undrafted,
            owners,
            phase: Phase::AwaitingNomination,
            turn: 0,
            unsold: Vec::new(),
            requeues: HashMap::new(),
            events: Vec::new(),
        })
    }

    // -- Accessors --

    pub fn state(&self) -> AuctionState {
        match self.phase {
            Phase::AwaitingNomination => AuctionState::AwaitingNomination,
            Phase::Bidding(_) => AuctionState::Bidding,
            Phase::Resolving(_) => AuctionState::Resolving,
            Phase::Complete => AuctionState::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    pub fn rules(&self) -> &AuctionRules {
        &self.rules
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn owner(&self, id: OwnerId) -> Option<&Owner> {
        self.owners.get(id.0)
    }

    /// Every player in the auction, drafted or not.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    /// Undrafted players in nomination-queue order.
    pub fn undrafted(&self) -> impl Iterator<Item = &Player> + '_ {
        self.undrafted
            .iter()
            .filter_map(|id| self.index.get(id).map(|&i| &self.players[i]))
    }

    /// Players nominated without a bid and dropped from the pool.
    pub fn unsold(&self) -> impl Iterator<Item = &Player> + '_ {
        self.unsold
            .iter()
            .filter_map(|id| self.index.get(id).map(|&i| &self.players[i]))
    }

    /// The owner whose turn it is to nominate.
    pub fn nominator(&self) -> OwnerId {
        OwnerId(self.turn)
    }

    pub fn events(&self) -> &[AuctionEvent] {
        &self.events
    }

    /// The lot being bid on, while bidding or resolving.
    pub fn current_lot(&self) -> Option<LotView<'_>> {
        let lot = match &self.phase {
            Phase::Bidding(lot) | Phase::Resolving(lot) => lot,
            _ => return None,
        };
        Some(LotView {
            player: &self.players[lot.player_idx],
            nominated_by: lot.nominated_by,
            high: lot.high,
            min_next_bid: lot.min_next_bid(&self.rules),
        })
    }

    /// Final rosters, budgets and leftover players.
    pub fn result(&self) -> AuctionResult {
        AuctionResult::new(
            &self.owners,
            self.unsold().cloned().collect(),
            self.undrafted().cloned().collect(),
            self.events.clone(),
        )
    }

    // -- Driving the state machine --

    /// Advance by one transition or one bid solicitation.
    ///
    /// An `Err` means the engine broke its own invariants; the auction is
    /// left in `Complete` and must not be used further.
    pub fn step(
        &mut self,
        nominations: &mut dyn NominationSource,
        bids: &mut dyn BidSource,
    ) -> Result<AuctionState, AuctionError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Complete);
        self.phase = match phase {
            Phase::AwaitingNomination => self.nominate(nominations),
            Phase::Bidding(lot) => self.solicit(lot, bids),
            Phase::Resolving(lot) => self.resolve(lot)?,
            Phase::Complete => Phase::Complete,
        };
        Ok(self.state())
    }

    /// Step until `Complete` and return the result.
    pub fn run(
        &mut self,
        nominations: &mut dyn NominationSource,
        bids: &mut dyn BidSource,
    ) -> Result<AuctionResult, AuctionError> {
        while !self.is_complete() {
            self.step(nominations, bids)?;
        }
        Ok(self.result())
    }

    // -- Phases --

    fn nominate(&mut self, source: &mut dyn NominationSource) -> Phase {
        if !self.has_legal_moves() || !self.settle_turn() {
            return self.complete();
        }
        let by = OwnerId(self.turn);

        let (request, fallback) = {
            let ctx = self.nomination_context();
            (source.nominate(&ctx), HighestValueNominator::pick(&ctx))
        };
        let Some(request) = request else {
            info!("Nomination source has no more nominations");
            return self.complete();
        };

        let nomination = if self.is_nominatable(request.player) {
            request
        } else {
            warn!(
                "{} nominated unavailable player {}; using default nomination",
                by, request.player
            );
            self.events.push(AuctionEvent::NominationRejected {
                by,
                requested: request.player,
                opening_bid: request.opening_bid,
            });
            match fallback {
                Some(n) => n,
                None => return self.complete(),
            }
        };

        let Some(&player_idx) = self.index.get(&nomination.player) else {
            return self.complete();
        };
        let player = &self.players[player_idx];
        let nominator = &self.owners[self.turn];

        let opening = nomination.opening_bid;
        let opening_check = check_bid(nominator, player, opening, self.rules.min_bid);
        if let Err(e) = &opening_check {
            warn!("{} opened {} at ${}: {}; treated as pass", by, player.name, opening, e);
        }
        let opening_accepted = opening_check.is_ok();

        let mut active = vec![true; self.owners.len()];
        let high = if opening_accepted {
            Some(StandingBid { owner: by, amount: opening })
        } else {
            active[self.turn] = false;
            None
        };

        info!("{} nominates {} (opening ${})", by, player, opening);
        self.events.push(AuctionEvent::Nominated {
            by,
            player: player.id,
            opening_bid: opening,
            opening_accepted,
        });

        Phase::Bidding(Lot {
            player_idx,
            nominated_by: by,
            high,
            active,
            cursor: (self.turn + 1) % self.owners.len(),
        })
    }

    fn solicit(&mut self, mut lot: Lot, source: &mut dyn BidSource) -> Phase {
        let n = self.owners.len();
        let high_owner = lot.high.map(|b| b.owner);
        let next = (0..n)
            .map(|k| (lot.cursor + k) % n)
            .find(|&i| lot.active[i] && high_owner != Some(OwnerId(i)));
        let Some(i) = next else {
            return Phase::Resolving(lot);
        };
        lot.cursor = (i + 1) % n;

        let player = &self.players[lot.player_idx];
        let owner = &self.owners[i];
        let min_next = lot.min_next_bid(&self.rules);

        // Recomputed every time: the bound moves with the standing bid.
        if !owner.can_buy(player, min_next) {
            lot.active[i] = false;
            debug!("{} cannot bid ${} on {}; skipped", owner.id, min_next, player.name);
            self.events.push(AuctionEvent::Passed {
                owner: owner.id,
                reason: PassReason::Ineligible,
            });
            return Phase::Bidding(lot);
        }

        let ctx = BidContext {
            owner,
            nominee: player,
            high_bid: lot.high.map(|b| b.amount),
            high_bidder: high_owner,
            min_next_bid: min_next,
            max_bid: owner.max_bid(),
            rules: &self.rules,
        };
        let event = match source.bid(&ctx) {
            BidDecision::Pass => {
                lot.active[i] = false;
                debug!("{} passes on {}", owner.id, player.name);
                AuctionEvent::Passed {
                    owner: owner.id,
                    reason: PassReason::Declined,
                }
            }
            BidDecision::Bid(amount) => match check_bid(owner, player, amount, min_next) {
                Ok(()) => {
                    lot.high = Some(StandingBid {
                        owner: owner.id,
                        amount,
                    });
                    debug!("{} bids ${} on {}", owner.id, amount, player.name);
                    AuctionEvent::Bid {
                        owner: owner.id,
                        amount,
                    }
                }
                Err(error) => {
                    lot.active[i] = false;
                    warn!("{} bid ${} on {}: {}; treated as pass", owner.id, amount, player.name, error);
                    AuctionEvent::Passed {
                        owner: owner.id,
                        reason: PassReason::Illegal {
                            offered: amount,
                            error,
                        },
                    }
                }
            },
        };
        self.events.push(event);
        Phase::Bidding(lot)
    }

    fn resolve(&mut self, lot: Lot) -> Result<Phase, AuctionError> {
        let player = self.players[lot.player_idx].clone();

        match lot.high {
            Some(StandingBid { owner: winner, amount: price }) => {
                let owner = &mut self.owners[winner.0];
                let illegal = |source| AuctionError::IllegalAssignment {
                    owner: winner,
                    player: player.id,
                    source,
                };
                let slot = owner.choose_slot(&player).ok_or_else(|| {
                    illegal(IllegalAssignment::NoEligibleSlot {
                        position: player.position,
                    })
                })?;
                owner.assign(&player, price, slot).map_err(illegal)?;

                info!(
                    "{} wins {} for ${} ({} slot, ${} left)",
                    winner,
                    player,
                    price,
                    owner.roster()[slot].slot,
                    owner.budget_remaining()
                );
                self.undrafted.retain(|&id| id != player.id);
                self.events.push(AuctionEvent::Sold {
                    player: player.id,
                    owner: winner,
                    price,
                    slot,
                });
            }
            None => self.handle_unsold(&player),
        }

        self.turn = (self.turn + 1) % self.owners.len();
        if self.has_legal_moves() && self.settle_turn() {
            Ok(Phase::AwaitingNomination)
        } else {
            Ok(self.complete())
        }
    }

    fn handle_unsold(&mut self, player: &Player) {
        self.undrafted.retain(|&id| id != player.id);

        let requeued = match self.rules.unsold_policy {
            UnsoldPolicy::Discard => false,
            UnsoldPolicy::Requeue => {
                let count = self.requeues.entry(player.id).or_insert(0);
                *count += 1;
                *count <= self.rules.max_requeues
            }
        };

        if requeued {
            info!("{} drew no bids; back of the queue", player);
            self.undrafted.push(player.id);
        } else {
            info!("{} drew no bids; removed from pool", player);
            self.unsold.push(player.id);
        }
        self.events.push(AuctionEvent::Unsold {
            player: player.id,
            requeued,
        });
    }

    fn complete(&mut self) -> Phase {
        let open: usize = self.owners.iter().map(Owner::open_slot_count).sum();
        info!(
            "Auction complete: {} players undrafted, {} unsold, {} roster slots unfilled",
            self.undrafted.len(),
            self.unsold.len(),
            open
        );
        self.events.push(AuctionEvent::Complete);
        Phase::Complete
    }

    // -- Helpers --

    /// Move `turn` to the first owner at or after it with an open slot.
    /// Returns false when every roster is full.
    fn settle_turn(&mut self) -> bool {
        let n = self.owners.len();
        match (0..n)
            .map(|k| (self.turn + k) % n)
            .find(|&i| !self.owners[i].is_full())
        {
            Some(i) => {
                self.turn = i;
                true
            }
            None => false,
        }
    }

    /// Whether any owner can legally buy any undrafted player.
    fn has_legal_moves(&self) -> bool {
        self.undrafted()
            .any(|p| self.owners.iter().any(|o| o.can_buy(p, self.rules.min_bid)))
    }

    fn is_nominatable(&self, id: PlayerId) -> bool {
        self.undrafted.contains(&id)
            && self
                .player(id)
                .is_some_and(|p| self.owners.iter().any(|o| o.can_buy(p, self.rules.min_bid)))
    }

    fn nomination_context(&self) -> NominationContext<'_> {
        NominationContext {
            nominator: &self.owners[self.turn],
            owners: &self.owners,
            available: self.undrafted().collect(),
            rules: &self.rules,
        }
    }
}

/// Legality of `owner` bidding `amount` on `player` when `min` is the
/// smallest acceptable bid.
fn check_bid(owner: &Owner, player: &Player, amount: u32, min: u32) -> Result<(), IllegalBid> {
    if owner.owns(player.id) {
        return Err(IllegalBid::AlreadyOwned);
    }
    if owner.eligible_slots_for(player).is_empty() {
        return Err(IllegalBid::NoEligibleSlot);
    }
    if amount < min {
        return Err(IllegalBid::BelowMinimum { bid: amount, min });
    }
    let max = owner.max_bid();
    if amount > max {
        return Err(IllegalBid::AboveMaxBid { bid: amount, max });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
