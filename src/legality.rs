use crate::board::{Color, Position, Square};
use crate::check::is_in_check;
use crate::movegen::{pseudo_legal_targets, Move};

/// Plays `mv` on a scratch copy and reports whether the mover's king survives.
///
/// The live position is never touched, so a move is never observable half-applied.
pub fn is_legal(position: &Position, mv: &Move) -> bool {
    let Some(mover) = position.piece_at(mv.from) else {
        return false;
    };
    leaves_king_safe(position, mv, mover.color)
}

/// The regular moves of the piece on `from` that do not leave its own king in check.
pub fn legal_moves(position: &Position, from: Square) -> Vec<Move> {
    pseudo_legal_targets(position, from)
        .into_iter()
        .map(|to| Move::new(from, to))
        .filter(|mv| is_legal(position, mv))
        .collect()
}

fn leaves_king_safe(position: &Position, mv: &Move, color: Color) -> bool {
    let mut scratch = position.clone();
    scratch.make_move(mv);
    !is_in_check(&scratch, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;
    use crate::board_builder::PositionBuilder;

    #[test]
    fn test_initial_legal_moves() {
        let position = Position::new();
        let total: usize = position
            .pieces(Color::White)
            .map(|placed| legal_moves(&position, placed.square).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_pinned_piece_stays_on_the_pin_line() {
        let mut builder = PositionBuilder::new();
        let position = builder
            .piece(Square::at(7, 4), Piece::King, Color::White)
            .piece(Square::at(5, 4), Piece::Rook, Color::White)
            .piece(Square::at(1, 4), Piece::Rook, Color::Black)
            .piece(Square::at(0, 0), Piece::King, Color::Black)
            .build()
            .unwrap();

        let moves = legal_moves(&position, Square::at(5, 4));
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.to.col() == 4));
        assert!(moves.contains(&Move::new(Square::at(5, 4), Square::at(1, 4))));
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let mut builder = PositionBuilder::new();
        let position = builder
            .piece(Square::at(7, 4), Piece::King, Color::White)
            .piece(Square::at(0, 3), Piece::Rook, Color::Black)
            .piece(Square::at(0, 7), Piece::King, Color::Black)
            .build()
            .unwrap();

        let moves = legal_moves(&position, Square::at(7, 4));
        assert!(moves.iter().all(|mv| mv.to.col() != 3));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_check_must_be_answered() {
        let mut builder = PositionBuilder::new();
        let position = builder
            .piece(Square::at(7, 4), Piece::King, Color::White)
            .piece(Square::at(7, 0), Piece::Rook, Color::White)
            .piece(Square::at(6, 2), Piece::Knight, Color::White)
            .piece(Square::at(2, 4), Piece::Rook, Color::Black)
            .piece(Square::at(0, 7), Piece::King, Color::Black)
            .build()
            .unwrap();

        // The knight can only interpose on the king's column
        let knight = legal_moves(&position, Square::at(6, 2));
        assert_eq!(knight, vec![Move::new(Square::at(6, 2), Square::at(5, 4))]);

        // Nothing the rook does blocks or captures the checker
        let rook = legal_moves(&position, Square::at(7, 0));
        assert!(rook.is_empty());
    }

    #[test]
    fn test_scratch_copy_leaves_position_untouched() {
        let position = Position::new();
        let before = position.clone();
        let _ = legal_moves(&position, Square::at(6, 4));
        assert_eq!(position, before);
    }
}
