use crate::board::{Color, Piece, Position, Square};
use crate::movegen::{BISHOP_DIRECTIONS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};

/// Is `square` attacked by the opponent of `defender`?
///
/// Walks the eight rays out of the square and only looks at the first
/// occupant on each, then probes the knight offsets.
pub fn is_square_attacked(position: &Position, square: Square, defender: Color) -> bool {
    let attacker = defender.opposite();

    for &(dr, dc) in &ROOK_DIRECTIONS {
        if ray_attacks(position, square, (dr, dc), attacker, false) {
            return true;
        }
    }

    for &(dr, dc) in &BISHOP_DIRECTIONS {
        if ray_attacks(position, square, (dr, dc), attacker, true) {
            return true;
        }
    }

    KNIGHT_OFFSETS.iter().any(|&(dr, dc)| {
        square
            .offset(dr, dc)
            .and_then(|from| position.piece_at(from))
            .map_or(false, |placed| placed.is(Piece::Knight, attacker))
    })
}

/// Is the king of `color` attacked?
pub fn is_in_check(position: &Position, color: Color) -> bool {
    is_square_attacked(position, position.king_square(color), color)
}

fn ray_attacks(
    position: &Position,
    square: Square,
    (dr, dc): (i8, i8),
    attacker: Color,
    diagonal: bool,
) -> bool {
    let mut current = square;
    let mut distance = 0;

    while let Some(next) = current.offset(dr, dc) {
        distance += 1;
        current = next;

        let Some(placed) = position.piece_at(current) else {
            continue;
        };
        // The nearest occupant blocks the ray whether or not it attacks
        if placed.color != attacker {
            return false;
        }
        return match placed.piece {
            Piece::Queen => true,
            Piece::Rook => !diagonal,
            Piece::Bishop => diagonal,
            Piece::King => distance == 1,
            // An attacking pawn sits one row behind the square in its own push direction
            Piece::Pawn => diagonal && distance == 1 && dr == -attacker.pawn_direction(),
            Piece::Knight => false,
        };
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_builder::PositionBuilder;

    fn with_kings(white_king: (u8, u8), black_king: (u8, u8)) -> PositionBuilder {
        let mut builder = PositionBuilder::new();
        builder
            .piece(Square::at(white_king.0, white_king.1), Piece::King, Color::White)
            .piece(Square::at(black_king.0, black_king.1), Piece::King, Color::Black);
        builder
    }

    #[test]
    fn test_initial_position_has_no_check() {
        let position = Position::new();
        assert!(!is_in_check(&position, Color::White));
        assert!(!is_in_check(&position, Color::Black));
    }

    #[test]
    fn test_rook_on_open_file() {
        let position = with_kings((7, 4), (0, 0))
            .piece(Square::at(2, 4), Piece::Rook, Color::Black)
            .build()
            .unwrap();
        assert!(is_in_check(&position, Color::White));

        // Any interposed piece, of either color, blocks the file
        for color in Color::ALL {
            let blocked = with_kings((7, 4), (0, 0))
                .piece(Square::at(2, 4), Piece::Rook, Color::Black)
                .piece(Square::at(5, 4), Piece::Knight, color)
                .build()
                .unwrap();
            assert!(!is_in_check(&blocked, Color::White));
        }
    }

    #[test]
    fn test_slider_orientation_matters() {
        let bishop_on_file = with_kings((7, 4), (0, 0))
            .piece(Square::at(3, 4), Piece::Bishop, Color::Black)
            .build()
            .unwrap();
        assert!(!is_in_check(&bishop_on_file, Color::White));

        let bishop_on_diagonal = with_kings((7, 4), (0, 0))
            .piece(Square::at(4, 1), Piece::Bishop, Color::Black)
            .build()
            .unwrap();
        assert!(is_in_check(&bishop_on_diagonal, Color::White));

        let queen_on_diagonal = with_kings((7, 4), (0, 0))
            .piece(Square::at(4, 7), Piece::Queen, Color::Black)
            .build()
            .unwrap();
        assert!(is_in_check(&queen_on_diagonal, Color::White));
    }

    #[test]
    fn test_pawn_attack_direction() {
        // A black pawn attacks downwards, so it checks a white king diagonally below it
        let black_pawn_above = with_kings((4, 4), (0, 0))
            .piece(Square::at(3, 3), Piece::Pawn, Color::Black)
            .build()
            .unwrap();
        assert!(is_in_check(&black_pawn_above, Color::White));

        let black_pawn_below = with_kings((4, 4), (0, 0))
            .piece(Square::at(5, 3), Piece::Pawn, Color::Black)
            .build()
            .unwrap();
        assert!(!is_in_check(&black_pawn_below, Color::White));

        let white_pawn_below = with_kings((7, 7), (3, 3))
            .piece(Square::at(4, 4), Piece::Pawn, Color::White)
            .build()
            .unwrap();
        assert!(is_in_check(&white_pawn_below, Color::Black));

        let distant_pawn = with_kings((4, 4), (0, 0))
            .piece(Square::at(2, 2), Piece::Pawn, Color::Black)
            .build()
            .unwrap();
        assert!(!is_in_check(&distant_pawn, Color::White));
    }

    #[test]
    fn test_knight_and_king_attacks() {
        let knight = with_kings((7, 4), (0, 0))
            .piece(Square::at(5, 3), Piece::Knight, Color::Black)
            .build()
            .unwrap();
        assert!(is_in_check(&knight, Color::White));

        let adjacent_kings = with_kings((4, 4), (3, 5)).build().unwrap();
        assert!(is_square_attacked(&adjacent_kings, Square::at(4, 4), Color::White));

        let distant_king = with_kings((4, 4), (2, 4)).build().unwrap();
        assert!(!is_in_check(&distant_king, Color::White));
        assert!(is_square_attacked(&distant_king, Square::at(3, 4), Color::White));
    }

    #[test]
    fn test_only_nearest_occupant_is_inspected() {
        // Black rook behind a black knight on the same file does not give check
        let position = with_kings((7, 4), (0, 0))
            .piece(Square::at(1, 4), Piece::Rook, Color::Black)
            .piece(Square::at(4, 4), Piece::Knight, Color::Black)
            .build()
            .unwrap();
        assert!(!is_in_check(&position, Color::White));
    }
}
