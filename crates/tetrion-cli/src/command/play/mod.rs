use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context as _;
use ratatui_runtime::{Runtime, ScreenStack};
use tetrion_engine::{Difficulty, GameOptions, GameSession, PieceSeed};

use self::screens::PlayScreen;
use crate::{model::save_file::SaveFile, util};

mod auto_repeat;
mod screens;

const DEFAULT_SAVE_FILE: &str = "./data/tetrion-save.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Number of bottom rows pre-filled at start (0-10, anything else means 0)
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    difficulty: i32,
    /// Draw every piece in a single color
    #[clap(long)]
    no_color: bool,
    /// Make pieces fall faster as play time goes on
    #[clap(long)]
    accelerate: bool,
    /// Seed for the piece sequence (32 hex characters)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// File used by the save and load keys
    #[clap(long, default_value = DEFAULT_SAVE_FILE)]
    save_file: PathBuf,
    /// Load the save file before starting
    #[clap(long)]
    resume: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            difficulty: 0,
            no_color: false,
            accelerate: false,
            seed: None,
            save_file: PathBuf::from(DEFAULT_SAVE_FILE),
            resume: false,
        }
    }
}

impl PlayArg {
    pub(crate) fn game_options(&self) -> GameOptions {
        GameOptions {
            difficulty: Difficulty::new(self.difficulty),
            colors_enabled: !self.no_color,
            accelerate: self.accelerate,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let options = arg.game_options();
    let PlayArg {
        seed,
        save_file,
        resume,
        ..
    } = arg;

    let mut session = match seed {
        Some(seed) => GameSession::with_seed(*seed, options),
        None => GameSession::with_options(options),
    };
    if *resume {
        eprintln!("Loading saved game from {}", save_file.display());
        let save: SaveFile = util::read_json_file("save", save_file)?;
        session
            .load(save.game)
            .with_context(|| format!("Invalid saved game: {}", save_file.display()))?;
        eprintln!("Resuming game saved at {}", save.saved_at);
    }

    let session = Rc::new(RefCell::new(session));
    let screen = PlayScreen::new(Rc::clone(&session), save_file.clone());
    let mut screens = ScreenStack::new(Box::new(screen));
    Runtime::new().run(&mut screens)?;

    let session = session.borrow();
    let stats = session.stats();
    eprintln!(
        "Score: {} ({} lines, {} pieces)",
        stats.score(),
        stats.total_cleared_lines(),
        stats.completed_pieces()
    );

    Ok(())
}
