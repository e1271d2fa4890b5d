// Library root for the auction simulator: configuration, demonstration
// strategies, and the glue that runs a configured auction end to end.

pub mod cli;
pub mod config;
pub mod strategy;

use ffauction_core::{
    load_players, Auction, AuctionError, AuctionResult, HighestValueNominator, Player, PlayerLoad,
    PlayerLoadError,
};
use tracing::{info, warn};

use crate::config::Config;

/// Load the configured player sheet, logging any skipped rows.
pub fn load_pool(config: &Config) -> Result<PlayerLoad, PlayerLoadError> {
    let players = &config.players;
    let load = load_players(&players.path, players.format, players.strictness)?;
    if !load.skipped.is_empty() {
        warn!(
            "Skipped {} bad rows in {}",
            load.skipped.len(),
            players.path.display()
        );
    }
    info!("Loaded {} players from {}", load.players.len(), players.path.display());
    Ok(load)
}

/// Run a full auction with the configured owners, rules and strategies.
/// Nominations follow the highest-value default.
pub fn simulate(config: &Config, players: Vec<Player>) -> Result<AuctionResult, AuctionError> {
    let mut auction = Auction::with_owners(players, config.owners.clone(), config.rules.clone())?;
    let mut bids = strategy::build_bidders(&config.simulation, config.owners.len());
    auction.run(&mut HighestValueNominator, &mut bids)
}
