//! Response caching example.
//!
//! Run with: cargo run --example cache
//!
//! Requires .env file with:
//! - ROYALE_TOKEN
//! - ROYALE_API_URL (optional)

use std::env;
use std::time::Duration;

use royale_lib::BlockingClient;
use royale_lib::ClientConfig;
use royale_lib::Execute;
use royale_lib::api::OfficialApi;
use royale_lib::cache::CacheConfig;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    SimpleLogger::init(LevelFilter::Debug, Config::default())?;

    let token = env::var("ROYALE_TOKEN").expect("ROYALE_TOKEN not set");
    let cache = CacheConfig::sqlite("royale-cache.db").with_ttl(Duration::from_secs(60));
    let mut config = ClientConfig::new(token).with_cache(cache);
    if let Ok(url) = env::var("ROYALE_API_URL") {
        config = config.with_base_url(url);
    }

    let client = BlockingClient::new(config)?;

    let first = client.get_clan("#8L9L9GL")?;
    println!("First call: {:?}", first.cache);

    let second = client.get_clan("#8L9L9GL")?;
    println!("Second call: {:?}", second.cache);

    let refreshed = client.refresh(&second)?;
    println!("Refreshed: {:?}", refreshed.cache);

    client.clear_cache()?;
    println!("Cache cleared");

    Ok(())
}
