//! Non-blocking client example with pagination.
//!
//! Run with: cargo run --example async_client
//!
//! Requires .env file with:
//! - ROYALE_TOKEN
//! - ROYALE_API_URL (optional)

use std::env;

use futures::StreamExt;
use royale_lib::Client;
use royale_lib::ClientConfig;
use royale_lib::Mode;
use royale_lib::api::LocationId;
use royale_lib::api::OfficialApi;
use royale_lib::api::Paging;
use royale_lib::api::official;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SimpleLogger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    let token = env::var("ROYALE_TOKEN").expect("ROYALE_TOKEN not set");
    let mut config = ClientConfig::new(token).with_mode(Mode::NonBlocking);
    if let Ok(url) = env::var("ROYALE_API_URL") {
        config = config.with_base_url(url);
    }

    let client = Client::new(config)?;
    let client = client.nonblocking()?;

    let (cards, top) = futures::join!(
        client.get_all_cards(),
        client.get_top_players(LocationId::Global, Paging::new().limit(10)),
    );
    println!("{} cards in the game", cards?.len());
    for player in top?.items() {
        println!("{:?} {} ({:?})", player.rank, player.name, player.trophies);
    }

    println!("\nClan members:");
    let members = client
        .paginate(official::clan_members("#8L9L9GL", &Paging::new().limit(10))?)
        .items();
    futures::pin_mut!(members);
    while let Some(member) = members.next().await {
        let member = member?;
        println!("  {} {:?}", member.name, member.role);
    }

    Ok(())
}
