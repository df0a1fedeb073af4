//! Fetch a player profile and show the remaining request budget.
//!
//! Run with: `cargo run --example basic -- <player-name>`

use serde::Deserialize;
use wynn_api::Client;

#[derive(Debug, Deserialize)]
struct Player {
    username: String,
    #[serde(default)]
    rank: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "trace")]
    tracing_subscriber::fmt::init();

    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Salted".to_string());

    let client = Client::new();

    match client.get::<Player>(&format!("/v3/player/{name}")).await {
        Ok(player) => {
            println!("{} ({})", player.username, player.rank.as_deref().unwrap_or("none"));
        }
        Err(e) if e.is_retryable() => {
            eprintln!("rate limited, retry after {:?}: {e}", e.reset_at());
        }
        Err(e) => {
            eprintln!("request failed (status {}): {e}", e.status());
        }
    }

    let budget = client.rate_limit();
    println!(
        "budget: {}/{} remaining, resets at {}",
        budget.remaining, budget.max, budget.reset_at
    );

    Ok(())
}
