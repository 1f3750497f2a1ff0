use anyhow::{bail, Context, Result};
use log::info;
use sdarot_core::{ChromeLauncher, Launcher, Player, SdarotError, SiteConnector};
use tokio::runtime::Runtime;

use crate::cli::{Cli, Command};
use crate::menu;
use crate::prompt::Prompter;

pub fn run(cli: Cli) -> Result<()> {
    // HEAD probes are the only async work; everything else blocks on Chrome
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start the async runtime")?;

    let mut connector = SiteConnector::with_config(cli.settings.connector_config())
        .context("cannot create the HTTP client")?;
    let site = resolve_site(&runtime, &mut connector)?;

    let mut player = Player::new(
        ChromeLauncher::new(cli.settings.chrome_config()),
        cli.settings.player_config(),
    );
    player.set_site(&site);

    match cli.command {
        Some(Command::Check) => println!("{site}"),
        Some(Command::Search { name, json }) => run_search(&mut player, &name, json)?,
        Some(Command::Play { url, season, episode }) => {
            run_play(&mut player, &url, season, episode)?
        }
        Some(Command::Menu) | None => {
            let mut io = Prompter::stdio();
            menu::run(&mut player, || runtime.block_on(connector.connect()), &mut io)?
        }
    }

    Ok(())
}

fn resolve_site(runtime: &Runtime, connector: &mut SiteConnector) -> Result<String> {
    if !runtime.block_on(connector.connect())? {
        bail!(SdarotError::SiteUnreachable(format!(
            "none of {} mirrors answered, try later",
            connector.candidates().len()
        )));
    }
    let site = connector
        .base_url()
        .map(str::to_string)
        .ok_or(SdarotError::NotConnected)?;
    info!("Connected to {}", site);
    Ok(site)
}

fn run_search<L: Launcher>(player: &mut Player<L>, name: &str, json: bool) -> Result<()> {
    let matches = player
        .search_series(name)
        .with_context(|| format!("search for '{name}' failed"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("No series found for '{name}'");
    } else {
        for m in &matches {
            println!("{}. {}", m.index + 1, m.title.replace('\n', " / "));
        }
    }

    player.reset();
    Ok(())
}

fn run_play<L: Launcher>(
    player: &mut Player<L>,
    url: &str,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<()> {
    player
        .open_url(url)
        .with_context(|| format!("cannot open {url}"))?;

    if let Some(se) = season {
        if !player.check_valid_season(se)? {
            bail!(SdarotError::InvalidSeason(se));
        }
        if let Some(ep) = episode {
            if !player.check_valid_episode(ep, se)? {
                bail!(SdarotError::InvalidEpisode { season: se, episode: ep });
            }
        }
    }

    match player.play(season, episode) {
        Ok(()) => {
            println!("Playback finished");
            Ok(())
        }
        Err(SdarotError::SeriesEnded) => {
            println!("Series ended - nothing else to play here");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
