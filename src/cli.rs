use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::core::engine::Engine;
use crate::games::tictactoe::config::{Config, Theme, THEME_NAMES};
use crate::games::tictactoe::TicTacToe;
use crate::logging;

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(about = "❌⭕ Animated tic-tac-toe for the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub play: PlayArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the built-in themes
    Themes,
}

#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Built-in theme (classic, modern, cyberpunk); overrides the config file's theme
    #[arg(short, long)]
    pub theme: Option<String>,

    /// JSON config file with theme, geometry, animation and key bindings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for particle effects
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write logs; the terminal itself is taken by the game
    #[arg(long, default_value = "tictactoe.log")]
    pub log_file: PathBuf,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Themes) => {
            println!("🎨 Available themes:");
            println!();
            for name in THEME_NAMES {
                if let Some(theme) = Theme::preset(name) {
                    println!("📦 {}", theme.name);
                    println!("   win burst: {}  glow layers: {}", theme.win_burst, theme.glow_layers);
                    println!();
                }
            }
            Ok(())
        }
        None => play(cli.play).await,
    }
}

/// Resolve the effective configuration from the command line
pub fn build_config(args: &PlayArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(name) = &args.theme {
        match Theme::preset(name) {
            Some(theme) => config.theme = theme,
            None => bail!("unknown theme '{}', expected one of: {}", name, THEME_NAMES.join(", ")),
        }
    }
    Ok(config)
}

async fn play(args: PlayArgs) -> Result<()> {
    logging::init(&args.log_file)?;
    let config = build_config(&args)?;
    info!(theme = %config.theme.name, seed = ?args.seed, "starting session");

    let game = match args.seed {
        Some(seed) => TicTacToe::with_seed(config, seed),
        None => TicTacToe::new(config),
    };

    let terminal = ratatui::init();
    let result = Engine::new(game).run(terminal).await;
    ratatui::restore();

    let game = result.context("game loop failed")?;
    let scores = game.controller().scoreboard();
    println!(
        "Thanks for playing! X: {}  O: {}  Draws: {}",
        scores.wins_x, scores.wins_o, scores.draws
    );
    Ok(())
}
