use std::convert::TryFrom;

use crate::board::{Color, Occupant, Piece, PlacedPiece, Position, Square, BOARD_SIZE};
use crate::error::Error;

/// An arrangement of pieces that has *not* been checked yet.
///
/// Useful for setting up test and debug positions by hand; `build` checks
/// that each side has exactly one king and no pawn stands on its last row.
///
/// ```
/// use salmon_rules::{Color, Piece, PositionBuilder, Square};
///
/// let position = PositionBuilder::new()
///     .piece(Square::at(7, 4), Piece::King, Color::White)
///     .piece(Square::at(0, 4), Piece::King, Color::Black)
///     .build()
///     .unwrap();
/// assert_eq!(position.king_square(Color::Black), Square::at(0, 4));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionBuilder {
    squares: [[Occupant; BOARD_SIZE]; BOARD_SIZE],
}

impl PositionBuilder {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a piece, replacing whatever was on the square.
    pub fn piece(&mut self, square: Square, piece: Piece, color: Color) -> &mut Self {
        self.squares[square.row() as usize][square.col() as usize] =
            Occupant::Piece(PlacedPiece::new(piece, color, square));
        self
    }

    pub fn clear(&mut self, square: Square) -> &mut Self {
        self.squares[square.row() as usize][square.col() as usize] = Occupant::Empty;
        self
    }

    pub fn build(&self) -> Result<Position, Error> {
        Position::from_occupants(self.squares)
    }
}

impl From<&Position> for PositionBuilder {
    fn from(position: &Position) -> Self {
        let mut builder = PositionBuilder::new();
        for square in Square::all() {
            if let Some(placed) = position.piece_at(square) {
                builder.piece(square, placed.piece, placed.color);
            }
        }
        builder
    }
}

impl TryFrom<&PositionBuilder> for Position {
    type Error = Error;

    fn try_from(builder: &PositionBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_king_is_rejected() {
        let mut builder = PositionBuilder::new();
        builder.piece(Square::at(7, 4), Piece::King, Color::White);
        assert!(matches!(builder.build(), Err(Error::InvalidPosition(_))));
    }

    #[test]
    fn test_two_kings_of_one_color_are_rejected() {
        let mut builder = PositionBuilder::new();
        builder
            .piece(Square::at(7, 4), Piece::King, Color::White)
            .piece(Square::at(7, 0), Piece::King, Color::White)
            .piece(Square::at(0, 4), Piece::King, Color::Black);
        assert!(builder.build().is_err());

        builder.clear(Square::at(7, 0));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_pawn_on_last_row_is_rejected() {
        let mut builder = PositionBuilder::new();
        builder
            .piece(Square::at(7, 4), Piece::King, Color::White)
            .piece(Square::at(0, 4), Piece::King, Color::Black)
            .piece(Square::at(0, 0), Piece::Pawn, Color::White);
        assert!(builder.build().is_err());

        // A black pawn on row 0 is only on its own starting side
        builder.piece(Square::at(0, 0), Piece::Pawn, Color::Black);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_round_trip_from_position() {
        let position = Position::new();
        let rebuilt = Position::try_from(&PositionBuilder::from(&position)).unwrap();
        assert_eq!(rebuilt, position);
    }
}
