use sdarot_core::{ChromeLauncher, Player, PlayerConfig, SiteConnector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut connector = SiteConnector::new()?;

    println!("🌐 Looking for a reachable mirror...\n");

    if !connector.connect().await? {
        println!("No mirror answered.");
        return Ok(());
    }
    let site = connector.base_url().unwrap_or_default().to_string();
    println!("Using {}", site);

    let name = std::env::args().nth(1).unwrap_or_else(|| "פאודה".to_string());

    // The browser calls block, keep them off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let mut player = Player::new(ChromeLauncher::default(), PlayerConfig::default());
        player.set_site(&site);

        let matches = player.search_series(&name)?;
        println!("\n🔍 {} matches for '{}':", matches.len(), name);
        for m in &matches {
            println!("  {}. {}", m.index + 1, m.title.replace('\n', " / "));
        }

        if !matches.is_empty() {
            player.select_match(0)?;
            println!("\n📺 First match has {} seasons", player.season_count()?);
        }
        Ok::<_, sdarot_core::SdarotError>(())
    })
    .await?;

    result?;
    Ok(())
}
