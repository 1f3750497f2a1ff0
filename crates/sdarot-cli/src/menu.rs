use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use log::debug;
use sdarot_core::parser::check_valid_url;
use sdarot_core::{Launcher, Player, SdarotError};

use crate::prompt::Prompter;

const MAIN_MENU: &str = "Please choose:\n\
    1. Search for series by name.\n\
    2. Search for series by URL.\n\
    3. Exit";

const PLAY_MENU: &str = "Choose play option:\n\
    1. Play all\n\
    2. Choose season\n\
    3. Choose season and episode";

/// Interactive main menu; returns when the user picks Exit.
///
/// `site_up` is asked before every round whether the mirror still answers.
pub fn run<L, R, W, C>(
    player: &mut Player<L>,
    mut site_up: C,
    io: &mut Prompter<R, W>,
) -> Result<()>
where
    L: Launcher,
    R: BufRead,
    W: Write,
    C: FnMut() -> sdarot_core::Result<bool>,
{
    loop {
        if !site_up()? {
            bail!(SdarotError::SiteUnreachable(
                "the website is down... again, try later".to_string()
            ));
        }

        io.say("\nWelcome to the sdarot automatic player!")?;
        let outcome = match io.read_int(MAIN_MENU, 1, Some(3))? {
            1 => search_by_name(player, io),
            2 => search_by_url(player, io),
            _ => return Ok(()),
        };

        if let Err(e) = outcome {
            // Site and player faults are reported; anything else (closed stdin) ends the run
            let Some(fault) = e.downcast_ref::<SdarotError>() else {
                return Err(e);
            };
            io.warn(&fault.to_string())?;
            player.reset();
        }
    }
}

fn search_by_name<L, R, W>(player: &mut Player<L>, io: &mut Prompter<R, W>) -> Result<()>
where
    L: Launcher,
    R: BufRead,
    W: Write,
{
    loop {
        let name = io.read_line("Enter series name:")?;
        let matches = match player.search_series(&name) {
            Ok(matches) => matches,
            Err(SdarotError::InvalidQuery(msg)) => {
                io.warn(&msg)?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if matches.is_empty() {
            io.warn(&format!("No series found for '{}'", name.trim()))?;
            player.reset();
            let again = io.read_line(
                "Type s to search for another series (anything else returns to the main menu):",
            )?;
            if again.trim().eq_ignore_ascii_case("s") {
                continue;
            }
            return Ok(());
        }

        io.say(&format!("Found {} matches:", matches.len()))?;
        for m in &matches {
            io.say(&format!("{}. {}", m.index + 1, m.title.replace('\n', " / ")))?;
        }
        let choice = io.read_int("Choose series (number):", 1, Some(matches.len() as u32))?;
        player.select_match(choice as usize - 1)?;
        return play_options(player, io);
    }
}

fn search_by_url<L, R, W>(player: &mut Player<L>, io: &mut Prompter<R, W>) -> Result<()>
where
    L: Launcher,
    R: BufRead,
    W: Write,
{
    let url = loop {
        let url = io.read_line("Please enter URL:")?;
        if check_valid_url(&url) {
            break url;
        }
        io.warn("Incorrect URL, expected https://sdarot.<mirror>/watch/<series>")?;
    };

    player.open_url(&url)?;
    play_options(player, io)
}

fn play_options<L, R, W>(player: &mut Player<L>, io: &mut Prompter<R, W>) -> Result<()>
where
    L: Launcher,
    R: BufRead,
    W: Write,
{
    let option = io.read_int(PLAY_MENU, 1, Some(3))?;

    let (season, episode) = if option == 1 {
        (None, None)
    } else {
        let season = loop {
            let se = io.read_int("Type season number:", 1, None)?;
            if player.check_valid_season(se)? {
                break se;
            }
            io.warn("This season is not available here (yet).")?;
        };

        let episode = if option == 3 {
            Some(loop {
                let ep = io.read_int("Type episode number:", 1, None)?;
                if player.check_valid_episode(ep, season)? {
                    break ep;
                }
                io.warn("This episode is not available here (yet).")?;
            })
        } else {
            None
        };
        (Some(season), episode)
    };

    debug!("Playing from season {:?} episode {:?}", season, episode);
    match player.play(season, episode) {
        Ok(()) => io.say("Playback finished - returning to main options menu"),
        Err(SdarotError::SeriesEnded) => io.say("Series ended - returning to main options menu"),
        Err(e) => Err(e.into()),
    }
}
