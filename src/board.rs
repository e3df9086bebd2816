use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::movegen::{Move, MoveKind};
use crate::special::MoveLogEntry;

pub const BOARD_SIZE: usize = 8;

const BACK_RANK: [Piece; BOARD_SIZE] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Letter used by the text board: uppercase for White, lowercase for Black.
    pub fn symbol(&self, color: Color) -> char {
        let letter = match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }

    pub fn glyph(&self, color: Color) -> char {
        match (color, self) {
            (Color::White, Piece::Pawn) => '♙',
            (Color::White, Piece::Knight) => '♘',
            (Color::White, Piece::Bishop) => '♗',
            (Color::White, Piece::Rook) => '♖',
            (Color::White, Piece::Queen) => '♕',
            (Color::White, Piece::King) => '♔',
            (Color::Black, Piece::Pawn) => '♟',
            (Color::Black, Piece::Knight) => '♞',
            (Color::Black, Piece::Bishop) => '♝',
            (Color::Black, Piece::Rook) => '♜',
            (Color::Black, Piece::Queen) => '♛',
            (Color::Black, Piece::King) => '♚',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Row delta of a pawn push. White plays up the board towards row 0.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn promotion_row(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row holding this color's king and rooks at the start of the game.
    pub fn home_row(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// A (row, column) coordinate that is always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Option<Square> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Builds a square from coordinates known to be valid.
    ///
    /// Panics on out-of-range values: those can only come from a bug in the engine.
    pub const fn at(row: u8, col: u8) -> Square {
        assert!(row < 8 && col < 8, "square coordinates out of range");
        Square { row, col }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// The square `dr` rows and `dc` columns away, if it is still on the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Every square, row by row from row 0.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidSquare(s.to_string());
        let (row, col) = s.trim().split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse::<u8>().map_err(|_| invalid())?;
        let col = col.trim().parse::<u8>().map_err(|_| invalid())?;
        Square::new(row, col).ok_or_else(invalid)
    }
}

/// A piece standing on the board, together with the square it stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub color: Color,
    pub square: Square,
}

impl PlacedPiece {
    pub fn new(piece: Piece, color: Color, square: Square) -> Self {
        Self {
            piece,
            color,
            square,
        }
    }

    pub fn is(&self, piece: Piece, color: Color) -> bool {
        self.piece == piece && self.color == color
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Piece(PlacedPiece),
}

impl Occupant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn piece(&self) -> Option<PlacedPiece> {
        match self {
            Occupant::Empty => None,
            Occupant::Piece(placed) => Some(*placed),
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.piece().map(|placed| placed.color)
    }
}

/// The 8x8 board. Every square holds exactly one occupant, and each color has
/// exactly one king, whose square is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    squares: [[Occupant; BOARD_SIZE]; BOARD_SIZE],
    kings: [Square; 2],
}

impl Position {
    /// The standard starting arrangement.
    pub fn new() -> Self {
        let mut position = Self {
            squares: [[Occupant::Empty; BOARD_SIZE]; BOARD_SIZE],
            kings: [Square::at(7, 4), Square::at(0, 4)],
        };

        for color in Color::ALL {
            let home = color.home_row();
            let pawns = color.pawn_start_row();
            for (col, &piece) in BACK_RANK.iter().enumerate() {
                let col = col as u8;
                position.set(
                    Square::at(home, col),
                    Occupant::Piece(PlacedPiece::new(piece, color, Square::at(home, col))),
                );
                position.set(
                    Square::at(pawns, col),
                    Occupant::Piece(PlacedPiece::new(Piece::Pawn, color, Square::at(pawns, col))),
                );
            }
        }

        position
    }

    /// Validates a hand-made arrangement: one king per color and no pawn on
    /// its promotion row.
    pub(crate) fn from_occupants(
        squares: [[Occupant; BOARD_SIZE]; BOARD_SIZE],
    ) -> Result<Self, Error> {
        let mut kings: [Vec<Square>; 2] = [Vec::new(), Vec::new()];

        for square in Square::all() {
            let occupant = squares[square.row() as usize][square.col() as usize];
            let Some(placed) = occupant.piece() else {
                continue;
            };
            if placed.square != square {
                return Err(Error::InvalidPosition(format!(
                    "piece on {} believes it stands on {}",
                    square, placed.square
                )));
            }
            match placed.piece {
                Piece::King => kings[placed.color.index()].push(square),
                Piece::Pawn if square.row() == placed.color.promotion_row() => {
                    return Err(Error::InvalidPosition(format!(
                        "{} pawn on {} has already reached its last row",
                        placed.color, square
                    )));
                }
                _ => {}
            }
        }

        for color in Color::ALL {
            let count = kings[color.index()].len();
            if count != 1 {
                return Err(Error::InvalidPosition(format!(
                    "expected exactly one {} king, found {}",
                    color, count
                )));
            }
        }

        Ok(Self {
            squares,
            kings: [kings[0][0], kings[1][0]],
        })
    }

    pub fn at(&self, square: Square) -> Occupant {
        self.squares[square.row() as usize][square.col() as usize]
    }

    pub fn piece_at(&self, square: Square) -> Option<PlacedPiece> {
        self.at(square).piece()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.at(square).is_empty()
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = PlacedPiece> + '_ {
        self.squares
            .iter()
            .flatten()
            .filter_map(|occupant| occupant.piece())
            .filter(move |placed| placed.color == color)
    }

    /// Writes an occupant onto a square, keeping the king cache current.
    pub(crate) fn set(&mut self, square: Square, occupant: Occupant) {
        if let Occupant::Piece(placed) = occupant {
            assert_eq!(
                placed.square, square,
                "occupant snapshot does not match its square"
            );
            if placed.piece == Piece::King {
                self.kings[placed.color.index()] = square;
            }
        }
        self.squares[square.row() as usize][square.col() as usize] = occupant;
    }

    /// Empties a square, returning what stood there.
    pub(crate) fn take(&mut self, square: Square) -> Occupant {
        let previous = self.at(square);
        self.squares[square.row() as usize][square.col() as usize] = Occupant::Empty;
        previous
    }

    /// Moves the piece on `from` to `to`, returning the occupant it replaced.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Occupant {
        let mover = match self.take(from) {
            Occupant::Piece(placed) => placed,
            Occupant::Empty => panic!("no piece to move on {}", from),
        };
        let replaced = self.at(to);
        if let Some(victim) = replaced.piece() {
            assert!(victim.color != mover.color, "piece on {} captured its own side", to);
        }
        self.set(to, Occupant::Piece(PlacedPiece { square: to, ..mover }));
        replaced
    }

    /// Applies a move without any legality check and returns what is needed to
    /// take it back. Pawns reaching their last row become queens.
    pub(crate) fn make_move(&mut self, mv: &Move) -> MoveLogEntry {
        let mover = self
            .piece_at(mv.from)
            .unwrap_or_else(|| panic!("no piece to move on {}", mv.from));

        let entry = match mv.kind {
            MoveKind::Regular => {
                let replaced = self.relocate(mv.from, mv.to);
                MoveLogEntry::Regular {
                    mover,
                    to: mv.to,
                    replaced,
                }
            }
            MoveKind::EnPassant { captured } => {
                let captured_pawn = self
                    .take(captured)
                    .piece()
                    .unwrap_or_else(|| panic!("no pawn to capture en passant on {}", captured));
                self.relocate(mv.from, mv.to);
                MoveLogEntry::EnPassant {
                    mover,
                    captured: captured_pawn,
                    vacated: mv.to,
                }
            }
            MoveKind::Castle { rook_from, rook_to } => {
                let rook = self
                    .piece_at(rook_from)
                    .unwrap_or_else(|| panic!("no rook to castle with on {}", rook_from));
                self.relocate(mv.from, mv.to);
                self.relocate(rook_from, rook_to);
                MoveLogEntry::Castle {
                    king: mover,
                    rook,
                    king_to: mv.to,
                    rook_to,
                }
            }
        };

        self.promote(mv.to);
        entry
    }

    /// Restores the squares touched by a logged move.
    pub(crate) fn unmake_move(&mut self, entry: &MoveLogEntry) {
        match *entry {
            MoveLogEntry::Regular {
                mover,
                to,
                replaced,
            } => {
                self.set(to, replaced);
                self.set(mover.square, Occupant::Piece(mover));
            }
            MoveLogEntry::EnPassant {
                mover,
                captured,
                vacated,
            } => {
                self.set(vacated, Occupant::Empty);
                self.set(captured.square, Occupant::Piece(captured));
                self.set(mover.square, Occupant::Piece(mover));
            }
            MoveLogEntry::Castle {
                king,
                rook,
                king_to,
                rook_to,
            } => {
                self.set(king_to, Occupant::Empty);
                self.set(rook_to, Occupant::Empty);
                self.set(king.square, Occupant::Piece(king));
                self.set(rook.square, Occupant::Piece(rook));
            }
        }
    }

    fn promote(&mut self, square: Square) {
        if let Some(placed) = self.piece_at(square) {
            if placed.piece == Piece::Pawn && square.row() == placed.color.promotion_row() {
                self.set(
                    square,
                    Occupant::Piece(PlacedPiece::new(Piece::Queen, placed.color, square)),
                );
            }
        }
    }

    /// Renders the board one row per line, row 0 first. The alternate form
    /// (`{:#}`) uses chess glyphs instead of letters.
    fn render(&self, f: &mut fmt::Formatter, glyphs: bool) -> fmt::Result {
        let mut result = String::from("  0 1 2 3 4 5 6 7\n");
        for (row, occupants) in self.squares.iter().enumerate() {
            result.push_str(&row.to_string());
            for occupant in occupants {
                result.push(' ');
                result.push(match occupant.piece() {
                    Some(placed) if glyphs => placed.piece.glyph(placed.color),
                    Some(placed) => placed.piece.symbol(placed.color),
                    None => '.',
                });
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, f.alternate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let position = Position::new();

        assert_eq!(position.pieces(Color::White).count(), 16);
        assert_eq!(position.pieces(Color::Black).count(), 16);
        assert_eq!(position.king_square(Color::White), Square::at(7, 4));
        assert_eq!(position.king_square(Color::Black), Square::at(0, 4));

        let queen = position.piece_at(Square::at(7, 3)).unwrap();
        assert!(queen.is(Piece::Queen, Color::White));
        let pawn = position.piece_at(Square::at(1, 6)).unwrap();
        assert!(pawn.is(Piece::Pawn, Color::Black));

        for row in 2..6 {
            for col in 0..8 {
                assert!(position.is_empty(Square::at(row, col)));
            }
        }
    }

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());

        let corner = Square::at(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 2), Some(Square::at(1, 2)));
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_square_parsing() {
        assert_eq!("6,4".parse::<Square>(), Ok(Square::at(6, 4)));
        assert_eq!(" 0 , 7 ".parse::<Square>(), Ok(Square::at(0, 7)));
        assert!(matches!("8,0".parse::<Square>(), Err(Error::InvalidSquare(_))));
        assert!(matches!("e4".parse::<Square>(), Err(Error::InvalidSquare(_))));
        assert!(matches!("3,-1".parse::<Square>(), Err(Error::InvalidSquare(_))));
    }

    #[test]
    fn test_relocate_updates_coordinates_and_king_cache() {
        let mut position = Position::new();

        // Clear e2 so the king can step forward
        position.take(Square::at(6, 4));
        let replaced = position.relocate(Square::at(7, 4), Square::at(6, 4));

        assert!(replaced.is_empty());
        assert!(position.is_empty(Square::at(7, 4)));
        let king = position.piece_at(Square::at(6, 4)).unwrap();
        assert_eq!(king.square, Square::at(6, 4));
        assert_eq!(position.king_square(Color::White), Square::at(6, 4));
    }

    #[test]
    fn test_make_and_unmake_regular_move() {
        let mut position = Position::new();
        let before = position.clone();

        let entry = position.make_move(&Move::new(Square::at(6, 4), Square::at(4, 4)));
        assert!(position.is_empty(Square::at(6, 4)));
        assert!(position.piece_at(Square::at(4, 4)).unwrap().is(Piece::Pawn, Color::White));

        position.unmake_move(&entry);
        assert_eq!(position, before);
    }

    #[test]
    fn test_display() {
        let rendered = Position::new().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "0 r n b q k b n r");
        assert_eq!(lines[4], "3 . . . . . . . .");
        assert_eq!(lines[8], "7 R N B Q K B N R");
        assert!(format!("{:#}", Position::new()).contains('♔'));
    }
}
