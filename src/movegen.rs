use crate::board::{Color, Piece, PlacedPiece, Position, Square};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Regular,
    /// The passed pawn is removed from `captured`, beside the mover.
    EnPassant { captured: Square },
    /// The king moves two squares and the rook jumps over it.
    Castle { rook_from: Square, rook_to: Square },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Regular,
        }
    }

    pub fn new_en_passant(from: Square, to: Square, captured: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::EnPassant { captured },
        }
    }

    pub fn new_castling(from: Square, to: Square, rook_from: Square, rook_to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Castle { rook_from, rook_to },
        }
    }

    pub fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }

    pub fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant { .. })
    }
}

/// Destinations the piece on `from` can reach by its movement pattern alone,
/// ignoring whether its own king would be left in check. Castling and en
/// passant are not included. An empty square has no targets.
pub fn pseudo_legal_targets(position: &Position, from: Square) -> Vec<Square> {
    let Some(mover) = position.piece_at(from) else {
        return Vec::new();
    };

    match mover.piece {
        Piece::Pawn => pawn_targets(position, mover),
        Piece::Knight => step_targets(position, mover, &KNIGHT_OFFSETS),
        Piece::Bishop => ray_targets(position, mover, &BISHOP_DIRECTIONS),
        Piece::Rook => ray_targets(position, mover, &ROOK_DIRECTIONS),
        Piece::Queen => {
            let mut targets = ray_targets(position, mover, &ROOK_DIRECTIONS);
            targets.extend(ray_targets(position, mover, &BISHOP_DIRECTIONS));
            targets
        }
        Piece::King => step_targets(position, mover, &KING_OFFSETS),
    }
}

/// All pseudo-legal regular moves for one side.
pub fn pseudo_legal_moves(position: &Position, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for placed in position.pieces(color) {
        for to in pseudo_legal_targets(position, placed.square) {
            moves.push(Move::new(placed.square, to));
        }
    }
    moves
}

fn pawn_targets(position: &Position, pawn: PlacedPiece) -> Vec<Square> {
    let mut targets = Vec::new();
    let direction = pawn.color.pawn_direction();

    // Single push, then double push from the starting row through two empty squares
    if let Some(one) = pawn.square.offset(direction, 0) {
        if position.is_empty(one) {
            targets.push(one);
            if pawn.square.row() == pawn.color.pawn_start_row() {
                if let Some(two) = one.offset(direction, 0) {
                    if position.is_empty(two) {
                        targets.push(two);
                    }
                }
            }
        }
    }

    // Diagonal captures only land on enemy pieces
    for side in [-1, 1] {
        if let Some(target) = pawn.square.offset(direction, side) {
            if position.at(target).color() == Some(pawn.color.opposite()) {
                targets.push(target);
            }
        }
    }

    targets
}

fn step_targets(position: &Position, mover: PlacedPiece, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| mover.square.offset(dr, dc))
        .filter(|&target| position.at(target).color() != Some(mover.color))
        .collect()
}

fn ray_targets(position: &Position, mover: PlacedPiece, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut targets = Vec::new();
    for &(dr, dc) in directions {
        let mut current = mover.square;
        while let Some(target) = current.offset(dr, dc) {
            match position.at(target).color() {
                None => targets.push(target),
                Some(color) if color != mover.color => {
                    targets.push(target);
                    break;
                }
                Some(_) => break,
            }
            current = target;
        }
    }
    targets
}
