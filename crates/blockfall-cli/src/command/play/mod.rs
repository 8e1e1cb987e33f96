use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameState, PieceSeed};

use crate::{command::play::app::PlayApp, tui::Runtime, util};

mod app;

const DEFAULT_LOG_FILE: &str = "blockfall.log";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Playfield width in columns [default: 10]
    #[clap(long)]
    width: Option<usize>,
    /// Playfield height in rows [default: 20]
    #[clap(long)]
    height: Option<usize>,
    /// Delay between automatic falls, in milliseconds [default: 500]
    #[clap(long)]
    fall_interval_ms: Option<u64>,
    /// Piece sequence seed as 32 hex digits [default: random]
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// JSON file with game settings; explicit flags take precedence
    #[clap(long)]
    config: Option<PathBuf>,
    /// File receiving log output [default: blockfall.log]
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl PlayArg {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let base = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => GameConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    fn apply_overrides(&self, mut config: GameConfig) -> GameConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(millis) = self.fall_interval_ms {
            config.fall_interval = Duration::from_millis(millis);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let log_file = arg
        .log_file
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_LOG_FILE));
    util::init_file_logging(log_file)?;

    let config = arg.game_config()?;
    let game = GameState::new(config, Instant::now()).context("Invalid game configuration")?;
    let mut app = PlayApp::new(game);

    Runtime::new().run(&mut app)?;

    let stats = app.game().stats();
    tracing::info!(
        score = stats.score(),
        pieces = stats.completed_pieces(),
        lines = stats.total_cleared_lines(),
        "session finished"
    );
    println!("{}", final_summary(app.game()));
    Ok(())
}

fn final_summary(game: &GameState) -> String {
    let stats = game.stats();
    let summary = format!(
        "Final score: {} ({} lines, {} pieces)",
        stats.score(),
        stats.total_cleared_lines(),
        stats.completed_pieces()
    );
    if game.is_game_over() {
        format!("Game Over! {summary}")
    } else {
        summary
    }
}
