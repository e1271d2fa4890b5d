// Demonstration bidding strategies.
//
// None of these are part of the engine contract; they exist so a full auction
// can be simulated from the command line.

use ffauction_core::{BidContext, BidDecision, BidSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SimulationConfig, StrategyKind};

/// Highest price an owner would pay for the nominee at `fraction` of value,
/// capped by what the engine allows.
fn value_limit(ctx: &BidContext<'_>, fraction: f64) -> u32 {
    let by_value = (ctx.nominee.value * fraction).floor().max(0.0) as u32;
    by_value.min(ctx.max_bid)
}

/// Raises by the minimum while the price is under a fraction of the
/// player's value. Always takes a player at the minimum bid.
#[derive(Debug, Clone, Copy)]
pub struct ValueBidder {
    pub fraction: f64,
}

impl ValueBidder {
    pub fn new(fraction: f64) -> Self {
        ValueBidder { fraction }
    }
}

impl BidSource for ValueBidder {
    fn bid(&mut self, ctx: &BidContext<'_>) -> BidDecision {
        let limit = value_limit(ctx, self.fraction).max(ctx.rules.min_bid);
        if ctx.min_next_bid <= limit {
            BidDecision::Bid(ctx.min_next_bid)
        } else {
            BidDecision::Pass
        }
    }
}

/// Bids a random amount between the next legal bid and a value-based limit,
/// and sometimes passes outright. Seeded, so runs are reproducible.
#[derive(Debug, Clone)]
pub struct RandomBidder {
    rng: StdRng,
    fraction: f64,
    pass_chance: f64,
}

impl RandomBidder {
    pub fn new(seed: u64, fraction: f64) -> Self {
        RandomBidder {
            rng: StdRng::seed_from_u64(seed),
            fraction,
            pass_chance: 0.25,
        }
    }

    pub fn with_pass_chance(mut self, chance: f64) -> Self {
        self.pass_chance = chance.clamp(0.0, 1.0);
        self
    }
}

impl BidSource for RandomBidder {
    fn bid(&mut self, ctx: &BidContext<'_>) -> BidDecision {
        if self.rng.random_bool(self.pass_chance) {
            return BidDecision::Pass;
        }
        // Occasionally stretch past value to keep auctions lively.
        let stretch = self.rng.random_range(1.0..1.5);
        let limit = value_limit(ctx, self.fraction * stretch);
        if ctx.min_next_bid > limit {
            return BidDecision::Pass;
        }
        BidDecision::Bid(self.rng.random_range(ctx.min_next_bid..=limit))
    }
}

/// Routes each owner's bid requests to that owner's own strategy. Owners
/// without one pass.
#[derive(Default)]
pub struct PerOwner {
    sources: Vec<Box<dyn BidSource>>,
}

impl PerOwner {
    pub fn new(sources: Vec<Box<dyn BidSource>>) -> Self {
        PerOwner { sources }
    }

    pub fn push(&mut self, source: Box<dyn BidSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl BidSource for PerOwner {
    fn bid(&mut self, ctx: &BidContext<'_>) -> BidDecision {
        match self.sources.get_mut(ctx.owner.id.0) {
            Some(source) => source.bid(ctx),
            None => BidDecision::Pass,
        }
    }
}

/// Build one bid source per owner from the simulation settings. Random
/// bidders get distinct seeds derived from the configured one.
pub fn build_bidders(sim: &SimulationConfig, num_owners: usize) -> PerOwner {
    let mut bidders = PerOwner::default();
    for i in 0..num_owners {
        let random = match sim.strategy {
            StrategyKind::Value => false,
            StrategyKind::Random => true,
            StrategyKind::Mixed => i % 2 == 1,
        };
        let source: Box<dyn BidSource> = if random {
            Box::new(RandomBidder::new(sim.seed.wrapping_add(i as u64), sim.value_fraction))
        } else {
            Box::new(ValueBidder::new(sim.value_fraction))
        };
        bidders.push(source);
    }
    bidders
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffauction_core::{AuctionRules, Owner, OwnerId, Player, Position, RosterSlot};

    fn owner(id: usize, budget: u32) -> Owner {
        Owner::new(OwnerId(id), format!("O{id}"), budget, &[RosterSlot::Rb, RosterSlot::Bench], 1)
    }

    fn ctx<'a>(
        owner: &'a Owner,
        player: &'a Player,
        rules: &'a AuctionRules,
        high: Option<u32>,
    ) -> BidContext<'a> {
        BidContext {
            owner,
            nominee: player,
            high_bid: high,
            high_bidder: high.map(|_| OwnerId(99)),
            min_next_bid: high.map_or(rules.min_bid, |h| h + rules.min_increment),
            max_bid: owner.max_bid(),
            rules,
        }
    }

    #[test]
    fn value_bidder_stops_at_value() {
        let o = owner(0, 100);
        let p = Player::new(0, "Back", Position::RunningBack, 20.0);
        let rules = AuctionRules::default();
        let mut bidder = ValueBidder::new(1.0);

        assert_eq!(bidder.bid(&ctx(&o, &p, &rules, None)), BidDecision::Bid(1));
        assert_eq!(bidder.bid(&ctx(&o, &p, &rules, Some(19))), BidDecision::Bid(20));
        assert_eq!(bidder.bid(&ctx(&o, &p, &rules, Some(20))), BidDecision::Pass);
    }

    #[test]
    fn value_bidder_respects_max_bid() {
        let o = owner(0, 10);
        let p = Player::new(0, "Back", Position::RunningBack, 50.0);
        let rules = AuctionRules::default();
        let mut bidder = ValueBidder::new(1.0);

        // $10 with two open slots: max bid is $9.
        assert_eq!(bidder.bid(&ctx(&o, &p, &rules, Some(8))), BidDecision::Bid(9));
        assert_eq!(bidder.bid(&ctx(&o, &p, &rules, Some(9))), BidDecision::Pass);
    }

    #[test]
    fn value_bidder_takes_worthless_player_at_minimum() {
        let o = owner(0, 10);
        let p = Player::new(0, "Deep sleeper", Position::RunningBack, 0.0);
        let rules = AuctionRules::default();
        assert_eq!(ValueBidder::new(1.0).bid(&ctx(&o, &p, &rules, None)), BidDecision::Bid(1));
    }

    #[test]
    fn random_bidder_is_seeded_and_legal() {
        let o = owner(0, 60);
        let p = Player::new(0, "Back", Position::RunningBack, 40.0);
        let rules = AuctionRules::default();

        let mut a = RandomBidder::new(7, 1.0);
        let mut b = RandomBidder::new(7, 1.0);
        for high in [None, Some(3), Some(10), Some(30)] {
            let c = ctx(&o, &p, &rules, high);
            let decision = a.bid(&c);
            assert_eq!(decision, b.bid(&c));
            if let BidDecision::Bid(amount) = decision {
                assert!(amount >= c.min_next_bid);
                assert!(amount <= c.max_bid);
            }
        }
    }

    #[test]
    fn random_bidder_never_passes_with_zero_chance() {
        let o = owner(0, 60);
        let p = Player::new(0, "Back", Position::RunningBack, 40.0);
        let rules = AuctionRules::default();
        let mut bidder = RandomBidder::new(1, 1.0).with_pass_chance(0.0);
        for _ in 0..50 {
            assert!(matches!(bidder.bid(&ctx(&o, &p, &rules, None)), BidDecision::Bid(_)));
        }
    }

    #[test]
    fn per_owner_routes_by_id() {
        let p = Player::new(0, "Back", Position::RunningBack, 40.0);
        let rules = AuctionRules::default();
        let mut bidders = PerOwner::default();
        bidders.push(Box::new(ValueBidder::new(1.0)));
        bidders.push(Box::new(ffauction_core::AlwaysPass));

        let (o0, o1, o2) = (owner(0, 60), owner(1, 60), owner(2, 60));
        assert_eq!(bidders.bid(&ctx(&o0, &p, &rules, None)), BidDecision::Bid(1));
        assert_eq!(bidders.bid(&ctx(&o1, &p, &rules, None)), BidDecision::Pass);
        assert_eq!(bidders.bid(&ctx(&o2, &p, &rules, None)), BidDecision::Pass);
    }

    #[test]
    fn build_bidders_one_per_owner() {
        let sim = SimulationConfig::default();
        assert_eq!(build_bidders(&sim, 5).len(), 5);
        assert!(build_bidders(&sim, 0).is_empty());
    }
}
