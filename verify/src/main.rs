// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fairplay_verify::commands::{check, draw, replay};

#[derive(Parser)]
#[command(name = "fairplay-verify")]
#[command(about = "Check a fair-play session from its reveal, without trusting the server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the revealed secret against the commitment published at start.
    Check {
        /// Reveal JSON returned by /session/end
        reveal: PathBuf,
    },
    /// Print the seed for a purpose.
    Seed {
        reveal: PathBuf,
        #[arg(long, short)]
        purpose: String,
    },
    /// Print the dealt card order.
    Deck {
        reveal: PathBuf,
        #[arg(long, short, default_value_t = 52)]
        n: usize,
    },
    /// Print the first `rolls` die values.
    Dice {
        reveal: PathBuf,
        #[arg(long, short)]
        rolls: u64,
    },
    /// Print the 2048 tile spawn after a move.
    Tile {
        reveal: PathBuf,
        #[arg(long)]
        move_index: u64,
        #[arg(long)]
        empty_cells: usize,
    },
    /// Validate a submission at LOGIC level.
    Replay {
        submission: PathBuf,
        /// Reveal to replay against, if the submission does not carry one
        #[arg(long)]
        reveal: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { reveal } => check::run(&reveal),
        Commands::Seed { reveal, purpose } => draw::run_seed(&reveal, &purpose),
        Commands::Deck { reveal, n } => draw::run_deck(&reveal, n),
        Commands::Dice { reveal, rolls } => draw::run_dice(&reveal, rolls),
        Commands::Tile {
            reveal,
            move_index,
            empty_cells,
        } => draw::run_tile(&reveal, move_index, empty_cells),
        Commands::Replay { submission, reveal } => replay::run(&submission, reveal.as_deref()),
    }
}
