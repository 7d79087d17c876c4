//! Blocking client example.
//!
//! Run with: cargo run --example blocking
//!
//! Requires .env file with:
//! - ROYALE_TOKEN
//! - ROYALE_API_URL (optional)

use std::env;

use royale_lib::BlockingClient;
use royale_lib::ClientConfig;
use royale_lib::api::OfficialApi;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    SimpleLogger::init(LevelFilter::Debug, Config::default())?;

    let token = env::var("ROYALE_TOKEN").expect("ROYALE_TOKEN not set");
    let mut config = ClientConfig::new(token);
    if let Ok(url) = env::var("ROYALE_API_URL") {
        config = config.with_base_url(url);
    }

    let client = BlockingClient::new(config)?;

    let player = client.get_player("#2P0LYQ")?;
    println!("{} ({})", player.name, player.tag);
    println!("Trophies: {:?}", player.trophies);
    if let Some(link) = player.deck_link() {
        println!("Deck: {}", link);
    }

    if let Some(tag) = player.clan_tag() {
        let clan = client.get_clan(tag.as_str())?;
        println!("\n{} has {} members", clan.name, clan.member_list.len());
        for member in clan.member_list.iter().take(5) {
            println!("  {} {:?}", member.name, member.trophies);
        }
    }

    let quota = client.rate_limit();
    println!("\nQuota: {:?}/{:?} remaining", quota.remaining, quota.limit);

    Ok(())
}
