// Scripted decision sources rebuilt from an event log.
//
// Feeding both into a fresh auction with the same players, owners and rules
// reproduces the logged auction decision for decision.

use std::collections::VecDeque;

use tracing::warn;

use crate::auction::{AuctionEvent, PassReason};
use crate::owner::OwnerId;
use crate::source::{BidContext, BidDecision, BidSource, Nomination, NominationContext, NominationSource};

/// Replays bid decisions in solicitation order.
///
/// Once the script runs out, or if the engine asks a different owner than the
/// script expects, the bidder passes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBidder {
    script: VecDeque<(OwnerId, BidDecision)>,
}

impl ScriptedBidder {
    pub fn new(script: impl IntoIterator<Item = (OwnerId, BidDecision)>) -> Self {
        ScriptedBidder {
            script: script.into_iter().collect(),
        }
    }

    /// Every decision a bid source made in `events`. Engine-forced passes
    /// (`PassReason::Ineligible`) are left out since the engine will force
    /// them again.
    pub fn from_events(events: &[AuctionEvent]) -> Self {
        let script = events.iter().filter_map(|e| match e {
            AuctionEvent::Bid { owner, amount } => Some((*owner, BidDecision::Bid(*amount))),
            AuctionEvent::Passed { owner, reason } => match reason {
                PassReason::Declined => Some((*owner, BidDecision::Pass)),
                PassReason::Illegal { offered, .. } => Some((*owner, BidDecision::Bid(*offered))),
                PassReason::Ineligible => None,
            },
            _ => None,
        });
        Self::new(script)
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl BidSource for ScriptedBidder {
    fn bid(&mut self, ctx: &BidContext<'_>) -> BidDecision {
        match self.script.front() {
            Some(&(owner, decision)) if owner == ctx.owner.id => {
                self.script.pop_front();
                decision
            }
            Some(&(owner, _)) => {
                warn!("Script expected {} to bid, engine asked {}; passing", owner, ctx.owner.id);
                BidDecision::Pass
            }
            None => BidDecision::Pass,
        }
    }
}

/// Replays nominations in order, then ends the auction.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNominator {
    script: VecDeque<Nomination>,
}

impl ScriptedNominator {
    pub fn new(script: impl IntoIterator<Item = Nomination>) -> Self {
        ScriptedNominator {
            script: script.into_iter().collect(),
        }
    }

    /// The nominations requested in `events`. A rejected request is replayed
    /// as-is and the engine's substitute is dropped, so the engine makes the
    /// same substitution again.
    pub fn from_events(events: &[AuctionEvent]) -> Self {
        let mut script = Vec::new();
        let mut substituted = false;
        for event in events {
            match *event {
                AuctionEvent::NominationRejected {
                    requested,
                    opening_bid,
                    ..
                } => {
                    script.push(Nomination {
                        player: requested,
                        opening_bid,
                    });
                    substituted = true;
                }
                AuctionEvent::Nominated {
                    player,
                    opening_bid,
                    ..
                } => {
                    if !substituted {
                        script.push(Nomination { player, opening_bid });
                    }
                    substituted = false;
                }
                _ => {}
            }
        }
        Self::new(script)
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl NominationSource for ScriptedNominator {
    fn nominate(&mut self, _ctx: &NominationContext<'_>) -> Option<Nomination> {
        self.script.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::{Auction, AuctionRules};
    use crate::player::{Player, PlayerId};
    use crate::position::{Position, RosterSlot};
    use crate::source::{AlwaysPass, HighestValueNominator};

    fn pool() -> Vec<Player> {
        vec![
            Player::new(0, "Alpha", Position::Quarterback, 40.0),
            Player::new(1, "Bravo", Position::RunningBack, 35.0),
            Player::new(2, "Charlie", Position::WideReceiver, 20.0),
            Player::new(3, "Delta", Position::Kicker, 2.0),
        ]
    }

    fn roster() -> Vec<RosterSlot> {
        vec![RosterSlot::Qb, RosterSlot::Flex, RosterSlot::Bench]
    }

    fn bidder<F: FnMut(&BidContext<'_>) -> BidDecision>(f: F) -> F {
        f
    }

    fn nominator<F: FnMut(&NominationContext<'_>) -> Option<Nomination>>(f: F) -> F {
        f
    }

    #[test]
    fn from_events_skips_forced_passes() {
        let events = vec![
            AuctionEvent::Nominated {
                by: OwnerId(0),
                player: PlayerId(3),
                opening_bid: 1,
                opening_accepted: true,
            },
            AuctionEvent::Bid {
                owner: OwnerId(1),
                amount: 2,
            },
            AuctionEvent::Passed {
                owner: OwnerId(2),
                reason: PassReason::Ineligible,
            },
            AuctionEvent::Passed {
                owner: OwnerId(0),
                reason: PassReason::Declined,
            },
        ];
        let bidder = ScriptedBidder::from_events(&events);
        assert_eq!(bidder.remaining(), 2);
        assert_eq!(ScriptedNominator::from_events(&events).remaining(), 1);
    }

    #[test]
    fn replay_reproduces_auction() {
        // Owners 0 and 1 outbid each other by a dollar until value / 2.
        let mut bids = bidder(|ctx: &BidContext<'_>| {
            let limit = (ctx.nominee.value / 2.0) as u32;
            if ctx.min_next_bid <= limit.min(ctx.max_bid) && ctx.owner.id.0 < 2 {
                BidDecision::Bid(ctx.min_next_bid)
            } else {
                BidDecision::Pass
            }
        });
        let mut first = Auction::new(pool(), 3, 30, &roster(), AuctionRules::default()).unwrap();
        let original = first
            .run(&mut HighestValueNominator, &mut bids)
            .unwrap();

        let mut replay = Auction::new(pool(), 3, 30, &roster(), AuctionRules::default()).unwrap();
        let mut noms = ScriptedNominator::from_events(&original.events);
        let mut scripted = ScriptedBidder::from_events(&original.events);
        let replayed = replay.run(&mut noms, &mut scripted).unwrap();

        assert_eq!(replayed, original);
        assert_eq!(noms.remaining(), 0);
        assert_eq!(scripted.remaining(), 0);
    }

    #[test]
    fn replay_repeats_rejected_nomination() {
        let mut noms_calls = 0;
        let mut noms = nominator(|ctx: &NominationContext<'_>| {
            noms_calls += 1;
            if noms_calls == 1 {
                Some(Nomination {
                    player: PlayerId(42),
                    opening_bid: 3,
                })
            } else {
                ctx.available.first().map(|p| Nomination {
                    player: p.id,
                    opening_bid: 1,
                })
            }
        });
        let mut first = Auction::new(pool(), 2, 30, &roster(), AuctionRules::default()).unwrap();
        let original = first
            .run(&mut noms, &mut AlwaysPass)
            .unwrap();

        let mut replay = Auction::new(pool(), 2, 30, &roster(), AuctionRules::default()).unwrap();
        let replayed = replay
            .run(
                &mut ScriptedNominator::from_events(&original.events),
                &mut ScriptedBidder::from_events(&original.events),
            )
            .unwrap();

        assert_eq!(replayed.events, original.events);
        assert!(matches!(
            replayed.events[0],
            AuctionEvent::NominationRejected {
                requested: PlayerId(42),
                ..
            }
        ));
    }
}
