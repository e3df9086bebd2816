use crate::board::Square;
use crate::error::Error;
use crate::game::{ClickOutcome, GameState, GameStatus};
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Console settings, taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOptions {
    pub unicode: bool,
    pub show_board: bool, // redraw after every move
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            unicode: false,
            show_board: true,
        }
    }
}

/// Line-oriented driver for a game: reads commands, feeds them to the
/// [`GameState`] and answers with text. Squares are written `row,col`.
pub struct ConsoleHandler {
    game: GameState,
    options: ConsoleOptions,
}

impl ConsoleHandler {
    pub fn new(options: ConsoleOptions) -> Self {
        ConsoleHandler {
            game: GameState::new(),
            options,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        print!("{}", self.render());
        stdout.flush()?;

        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();

            match command {
                "quit" | "exit" => break,
                "" => {}
                cmd => match self.handle_command(cmd) {
                    Ok(response) => print!("{}", response),
                    Err(err) => eprintln!("error: {}", err),
                },
            }

            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok("".to_string());
        }

        match parts[0] {
            "select" => self.handle_select(&parts[1..]),
            "move" => self.handle_move(&parts[1..]),
            "click" => self.handle_click(&parts[1..]),
            "deselect" => {
                self.game.deselect();
                Ok("".to_string())
            }
            "undo" => Ok(self.handle_undo()),
            "targets" => Ok(self.format_targets()),
            "board" => Ok(self.render()),
            "status" => Ok(self.format_status()),
            "new" => {
                self.game = GameState::new();
                Ok(self.render())
            }
            "quit" | "exit" => Ok("".to_string()),
            other => Err(Error::UnknownCommand(other.to_string()).into()),
        }
    }

    fn handle_select(&mut self, args: &[&str]) -> Result<String> {
        let square = parse_square(args)?;
        if self.game.select(square) {
            Ok(self.format_targets())
        } else {
            Ok(format!("cannot select {}\n", square))
        }
    }

    fn handle_move(&mut self, args: &[&str]) -> Result<String> {
        let square = parse_square(args)?;
        if self.game.commit(square) {
            Ok(self.after_move())
        } else {
            Ok(format!("no legal move to {}\n", square))
        }
    }

    fn handle_click(&mut self, args: &[&str]) -> Result<String> {
        let square = parse_square(args)?;
        Ok(match self.game.click(square) {
            ClickOutcome::Selected => self.format_targets(),
            ClickOutcome::Moved => self.after_move(),
            ClickOutcome::Ignored => "".to_string(),
        })
    }

    fn handle_undo(&mut self) -> String {
        if !self.game.undo() {
            return "nothing to undo\n".to_string();
        }
        let mut response = "undone\n".to_string();
        if self.options.show_board {
            response.push_str(&self.render());
        }
        response
    }

    fn after_move(&self) -> String {
        let mut response = String::new();
        if let Some(mv) = self.game.last_move() {
            response.push_str(&format!("moved {} {}\n", mv.from, mv.to));
        }
        if self.options.show_board {
            response.push_str(&self.render());
        }
        response.push_str(&self.format_status());
        response
    }

    fn format_targets(&self) -> String {
        let Some(selected) = self.game.selected() else {
            return "nothing selected\n".to_string();
        };
        let mut targets = self.game.legal_targets();
        targets.sort();
        let listed: Vec<String> = targets.iter().map(|square| square.to_string()).collect();
        format!("{} -> [{}]\n", selected, listed.join(" "))
    }

    fn format_status(&self) -> String {
        let to_move = self.game.color_to_move();
        match self.game.status() {
            GameStatus::Checkmate(winner) => format!("checkmate, {} wins\n", winner),
            GameStatus::Stalemate => "stalemate\n".to_string(),
            GameStatus::Ongoing if self.game.is_in_check(to_move) => {
                format!("{} to move, in check\n", to_move)
            }
            GameStatus::Ongoing => format!("{} to move\n", to_move),
        }
    }

    /// Draws the board with the selected piece in brackets and its targets
    /// marked `*` (or `x` when occupied).
    fn render(&self) -> String {
        let position = self.game.position();
        let selected = self.game.selected();
        let targets = self.game.legal_targets();

        let mut result = String::from("   0  1  2  3  4  5  6  7\n");
        for row in 0..8 {
            result.push_str(&row.to_string());
            for col in 0..8 {
                let square = Square::at(row, col);
                let symbol = match position.piece_at(square) {
                    Some(placed) if self.options.unicode => placed.piece.glyph(placed.color),
                    Some(placed) => placed.piece.symbol(placed.color),
                    None => '.',
                };
                let cell = if selected == Some(square) {
                    format!("[{}]", symbol)
                } else if targets.contains(&square) {
                    let mark = if position.is_empty(square) { '*' } else { 'x' };
                    format!(" {} ", mark)
                } else {
                    format!(" {} ", symbol)
                };
                result.push_str(&cell);
            }
            result.push('\n');
        }
        result
    }
}

fn parse_square(args: &[&str]) -> Result<Square> {
    let text = args.first().copied().unwrap_or("");
    Ok(text.parse::<Square>()?)
}
