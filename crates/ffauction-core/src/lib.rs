// Library root: the auction engine and the types it works over.

pub mod auction;
pub mod owner;
pub mod player;
pub mod position;
pub mod replay;
pub mod result;
pub mod source;

pub use auction::{
    Auction, AuctionError, AuctionEvent, AuctionRules, AuctionState, IllegalBid, LotView,
    OwnerSpec, PassReason, StandingBid, UnsoldPolicy,
};
pub use owner::{IllegalAssignment, Owner, OwnerId, OwnerSlot, Purchase};
pub use player::{
    load_players, load_players_from_reader, LoadStrictness, Player, PlayerId, PlayerLoad,
    PlayerLoadError, RowError, SheetFormat,
};
pub use position::{default_roster, Position, RosterSlot};
pub use replay::{ScriptedBidder, ScriptedNominator};
pub use result::{AuctionResult, OwnerResult, SlotResult};
pub use source::{
    AlwaysPass, BidContext, BidDecision, BidSource, HighestValueNominator, Nomination,
    NominationContext, NominationSource,
};
