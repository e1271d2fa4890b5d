// Auction simulator entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (stderr, so stdout stays clean for the report)
// 3. Load config, writing defaults on first run
// 4. Load the player sheet
// 5. Run the auction and print the result

use anyhow::Context;
use ffauction_sim::cli::{Args, USAGE};
use ffauction_sim::config;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let args = Args::parse(std::env::args().skip(1)).context("invalid arguments")?;
    if args.help {
        print!("{USAGE}");
        return Ok(());
    }

    // 2. Initialize tracing
    init_tracing()?;
    info!("Auction simulator starting up");

    // 3. Load config
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let mut config = config::load_config(args.config.as_deref(), &cwd)
        .context("failed to load configuration")?;
    if let Some(players) = args.players {
        config.players.path = players;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    info!(
        "Config loaded from {}: {} owners, {:?} strategy, seed {}",
        config.source.display(),
        config.owners.len(),
        config.simulation.strategy,
        config.simulation.seed
    );

    // 4. Load players
    let load = ffauction_sim::load_pool(&config).with_context(|| {
        format!("failed to load players from {}", config.players.path.display())
    })?;

    // 5. Run the auction
    let result =
        ffauction_sim::simulate(&config, load.players).context("auction aborted")?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        println!("{json}");
    } else {
        println!("{result}");
        println!();
        let weight = config.simulation.starter_weight;
        for (id, score) in result.scores(weight) {
            let name = result
                .owners
                .iter()
                .find(|o| o.id == id)
                .map_or("?", |o| o.name.as_str());
            println!("{name:<20} score {score:>7.1}");
        }
        if let Some(leader) = result.leader(weight) {
            info!("Top roster: {}", leader);
        }
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ffauction=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
