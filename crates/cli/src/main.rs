use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use leaderboard::{
    LeaderboardService, Player, RedisRankStore, ServiceOptions,
    repository::redis_store::DEFAULT_LEADERBOARD_KEY, services::score_codec,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lb")]
#[command(about = "Leaderboard operator tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Sorted set holding the leaderboard
    #[arg(long, env = "LEADERBOARD_KEY", default_value = DEFAULT_LEADERBOARD_KEY)]
    key: String,

    /// Deadline for each store call
    #[arg(long, env = "STORE_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a (possibly negative) delta to a player's score
    Submit {
        name: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Overwrite a player's score
    Set { name: String, score: i64 },
    /// Print a player's 1-based rank
    Rank { name: String },
    /// Print the players ranked around a player
    Around {
        name: String,

        #[arg(short, long, default_value_t = 10)]
        window: u32,
    },
    /// Print the top of the leaderboard
    Top {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// Split a raw composite key into score and timestamp
    Decode { key: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lb={},leaderboard={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Commands::Decode { key } = cli.command {
        let (score, timestamp) = score_codec::decode(key)?;
        println!("score={} timestamp={}", score, timestamp);
        return Ok(());
    }

    let service = connect(&cli).await?;

    match cli.command {
        Commands::Submit { name, delta } => {
            let score = service.update_score(delta, &name).await?;
            println!("{} -> {}", name, score);
        }
        Commands::Set { name, score } => {
            service.set_score(&name, score).await?;
            println!("{} -> {}", name, score);
        }
        Commands::Rank { name } => {
            let rank = service.get_user_rank(&name).await?;
            println!("{} is ranked #{}", name, rank);
        }
        Commands::Around { name, window } => {
            let players = service.get_user_rank_and_top_players(&name, window).await?;
            print_players(&players);
        }
        Commands::Top { limit } => {
            let players = service.top_players(limit).await?;
            let total = service.size().await?;
            print_players(&players);
            println!("({} ranked players)", total);
        }
        Commands::Decode { .. } => unreachable!("handled before connecting"),
    }

    Ok(())
}

async fn connect(cli: &Cli) -> Result<LeaderboardService, Box<dyn std::error::Error>> {
    let redis_url = cli
        .redis_url
        .as_deref()
        .ok_or("--redis-url or REDIS_URL is required")?;

    tracing::debug!("Connecting to Redis, leaderboard key {}", cli.key);
    let store = RedisRankStore::connect(redis_url, cli.key.clone()).await?;

    let options = ServiceOptions {
        call_timeout: cli.timeout_ms.map(Duration::from_millis),
        ..ServiceOptions::default()
    };

    Ok(LeaderboardService::new(Arc::new(store), options))
}

fn print_players(players: &[Player]) {
    println!("{:>6}  {:<24} {:>8}  {}", "RANK", "NAME", "SCORE", "UPDATED");
    for player in players {
        println!(
            "{:>6}  {:<24} {:>8}  {}",
            player.rank, player.name, player.score, player.updated_at
        );
    }
}
