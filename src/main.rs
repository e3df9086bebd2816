use anyhow::Result;
use clap::Parser;
use salmon_rules::console::{ConsoleHandler, ConsoleOptions};

/// Play chess from the terminal. Squares are written `row,col`, row 0 being
/// Black's back rank.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Draw pieces with chess glyphs instead of letters
    #[arg(short, long)]
    unicode: bool,

    /// Do not redraw the board after every move
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut console = ConsoleHandler::new(ConsoleOptions {
        unicode: args.unicode,
        show_board: !args.quiet,
    });
    console.run()
}
