// Decision sources the engine consults: who gets nominated, and who bids.
//
// Both are plain traits with blanket impls for closures, so a strategy can be
// a struct or an inline `FnMut`.

use serde::{Deserialize, Serialize};

use crate::auction::AuctionRules;
use crate::owner::{Owner, OwnerId};
use crate::player::{Player, PlayerId};

// ---------------------------------------------------------------------------
// Bidding
// ---------------------------------------------------------------------------

/// What a bid source sees when asked for a decision.
#[derive(Debug, Clone, Copy)]
pub struct BidContext<'a> {
    /// The owner being asked.
    pub owner: &'a Owner,
    pub nominee: &'a Player,
    /// Current standing bid, if anyone holds one.
    pub high_bid: Option<u32>,
    pub high_bidder: Option<OwnerId>,
    /// Smallest bid the engine will accept right now.
    pub min_next_bid: u32,
    /// Largest bid the engine will accept from this owner.
    pub max_bid: u32,
    pub rules: &'a AuctionRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidDecision {
    Bid(u32),
    Pass,
}

/// Supplies bid-or-pass decisions during a lot.
pub trait BidSource {
    fn bid(&mut self, ctx: &BidContext<'_>) -> BidDecision;
}

impl<F> BidSource for F
where
    F: FnMut(&BidContext<'_>) -> BidDecision,
{
    fn bid(&mut self, ctx: &BidContext<'_>) -> BidDecision {
        self(ctx)
    }
}

// ---------------------------------------------------------------------------
// Nomination
// ---------------------------------------------------------------------------

/// What a nomination source sees when it is an owner's turn to nominate.
#[derive(Debug, Clone)]
pub struct NominationContext<'a> {
    /// The owner whose turn it is.
    pub nominator: &'a Owner,
    pub owners: &'a [Owner],
    /// Undrafted players in nomination-queue order.
    pub available: Vec<&'a Player>,
    pub rules: &'a AuctionRules,
}

impl NominationContext<'_> {
    /// Whether any owner could win `player` at the minimum bid.
    pub fn is_sellable(&self, player: &Player) -> bool {
        self.owners
            .iter()
            .any(|o| o.can_buy(player, self.rules.min_bid))
    }
}

/// A player put up for bidding and the nominator's opening bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nomination {
    pub player: PlayerId,
    pub opening_bid: u32,
}

/// Chooses the next player to put up. Returning `None` ends the auction.
pub trait NominationSource {
    fn nominate(&mut self, ctx: &NominationContext<'_>) -> Option<Nomination>;
}

impl<F> NominationSource for F
where
    F: FnMut(&NominationContext<'_>) -> Option<Nomination>,
{
    fn nominate(&mut self, ctx: &NominationContext<'_>) -> Option<Nomination> {
        self(ctx)
    }
}

/// Default nomination order: the first sellable player in queue order
/// (highest value first), opened at the minimum bid.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestValueNominator;

impl HighestValueNominator {
    pub(crate) fn pick(ctx: &NominationContext<'_>) -> Option<Nomination> {
        ctx.available
            .iter()
            .find(|p| ctx.is_sellable(p))
            .map(|p| Nomination {
                player: p.id,
                opening_bid: ctx.rules.min_bid,
            })
    }
}

impl NominationSource for HighestValueNominator {
    fn nominate(&mut self, ctx: &NominationContext<'_>) -> Option<Nomination> {
        Self::pick(ctx)
    }
}

/// A bid source that always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPass;

impl BidSource for AlwaysPass {
    fn bid(&mut self, _ctx: &BidContext<'_>) -> BidDecision {
        BidDecision::Pass
    }
}
