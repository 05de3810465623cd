//! Inspect and verify the attack tables from the command line.
//!
//! Usage: cargo run --release --bin attacks -- show rook d4 --occupied d6,f4
//!        cargo run --release --bin attacks -- --mode split32 verify

use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result};
use itertools::Itertools;
use rayon::prelude::*;

use chess_attacks::bitboard::{popcount, square_bb, Bitboard};
use chess_attacks::rays::{sliding_attacks, Subsets};
use chess_attacks::{pretty, AttackTables, Color, IndexMode, PieceType, SliderKind, Square};

#[derive(Parser, Debug)]
#[command(name = "attacks")]
#[command(about = "Precomputed chess attack tables")]
struct Args {
    /// Slider index strategy. Defaults to $CHESS_ATTACKS_MODE, then to pext if the CPU has it
    #[arg(long, value_enum, global = true)]
    mode: Option<IndexMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the attacks of a piece as a board diagram
    Show {
        /// Piece name or letter, e.g. `rook` or `n`
        piece: PieceType,
        square: Square,
        /// Comma separated occupied squares
        #[arg(long, value_delimiter = ',')]
        occupied: Vec<Square>,
        /// Side to move for pawn attacks
        #[arg(long, default_value_t = 'w')]
        color: char,
    },
    /// Print the line through two squares
    Line { from: Square, to: Square },
    /// Print the segment from one square up to and including another
    Between { from: Square, to: Square },
    /// Print the king distance between two squares
    Distance { from: Square, to: Square },
    /// Check every index strategy against the raycaster on every occupancy
    Verify {
        /// Only check these strategies
        #[arg(long, value_enum, value_delimiter = ',')]
        modes: Vec<IndexMode>,
    },
    /// Print table sizes and build times for each strategy
    Stats,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let mode = args.mode.unwrap_or_else(IndexMode::from_env_or_detect);

    match args.command {
        Command::Show { piece, square, occupied, color } => {
            let tables = AttackTables::new(mode);
            let occupied: Bitboard = occupied.iter().fold(0, |acc, &s| acc | square_bb(s));
            let attacks = match piece {
                PieceType::Pawn => tables.pawn_attacks(Color::from_char(color)?, square),
                _ => tables.attacks(piece, square, occupied),
            };
            println!("{} on {} ({} squares)", piece.to_human(), square, popcount(attacks));
            print!("{}", pretty(attacks));
        }
        Command::Line { from, to } => {
            let tables = AttackTables::new(mode);
            let line = tables.line_bb(from, to);
            if line == 0 {
                println!("{from} and {to} are not on a common line");
            }
            print!("{}", pretty(line));
        }
        Command::Between { from, to } => {
            let tables = AttackTables::new(mode);
            print!("{}", pretty(tables.between_bb(from, to)));
        }
        Command::Distance { from, to } => {
            let tables = AttackTables::new(mode);
            println!(
                "distance {} (files {}, ranks {})",
                tables.distance(from, to),
                tables.file_distance(from, to),
                tables.rank_distance(from, to)
            );
        }
        Command::Verify { modes } => {
            let modes = if modes.is_empty() { IndexMode::ALL.to_vec() } else { modes };
            for mode in modes {
                verify(mode)?;
            }
        }
        Command::Stats => {
            for mode in IndexMode::ALL {
                let start = Instant::now();
                let tables = AttackTables::new(mode);
                let elapsed = start.elapsed();
                let len = tables.sliders().table_len();
                println!(
                    "{:<12} {:>7} entries {:>5} KiB  built in {:?}",
                    mode.name(),
                    len,
                    len * std::mem::size_of::<Bitboard>() / 1024,
                    elapsed
                );
            }
        }
    }

    Ok(())
}

/// Compare every table entry of `mode` with the raycaster.
fn verify(mode: IndexMode) -> Result<()> {
    let start = Instant::now();
    let tables = AttackTables::new(mode);
    let sliders = tables.sliders();

    let pairs = SliderKind::ALL.into_iter().cartesian_product(Square::all()).collect_vec();
    let checked: Vec<usize> = pairs
        .par_iter()
        .map(|&(kind, sq)| {
            let mask = sliders.mask(kind, sq);
            let mut count = 0;
            for occupied in Subsets::new(mask) {
                let expected = sliding_attacks(kind, sq, occupied);
                let got = tables.slider_attacks(kind, sq, occupied);
                if got != expected {
                    return Err(eyre!(
                        "{mode}: {kind:?} on {sq} with occupancy {occupied:#018x} gave \
                         {got:#018x}, expected {expected:#018x}"
                    ));
                }
                // Squares outside the mask must not change the lookup
                if tables.slider_attacks(kind, sq, occupied | !mask) != expected {
                    return Err(eyre!("{mode}: {kind:?} on {sq} depends on irrelevant squares"));
                }
                count += 1;
            }
            Ok(count)
        })
        .collect::<Result<_>>()?;

    let total: usize = checked.iter().sum();
    if total == 0 {
        bail!("{mode}: nothing was checked");
    }
    println!("{:<12} ok, {} occupancies in {:?}", mode.name(), total, start.elapsed());
    Ok(())
}
