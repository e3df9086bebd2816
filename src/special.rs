use crate::board::{Color, Occupant, Piece, PlacedPiece, Position, Square};
use crate::check::is_in_check;
use crate::legality::is_legal;
use crate::movegen::Move;

const KING_HOME_COL: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    fn rook_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    fn king_to_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    fn rook_to_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// Columns strictly between the king and the rook.
    fn between_cols(&self) -> &'static [u8] {
        match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        }
    }

    fn from_rook_col(col: u8) -> Option<CastleSide> {
        match col {
            7 => Some(CastleSide::Kingside),
            0 => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// Castling rights for one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub kingside: bool,
    pub queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        kingside: true,
        queenside: true,
    };
    pub const NONE: CastlingRights = CastlingRights {
        kingside: false,
        queenside: false,
    };

    pub fn has(&self, side: CastleSide) -> bool {
        match side {
            CastleSide::Kingside => self.kingside,
            CastleSide::Queenside => self.queenside,
        }
    }

    pub fn clear(&mut self, side: CastleSide) {
        match side {
            CastleSide::Kingside => self.kingside = false,
            CastleSide::Queenside => self.queenside = false,
        }
    }

    /// Rights a hand-made position can still claim: the king and the matching
    /// rook must stand on their starting squares.
    pub fn inferred(position: &Position, color: Color) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        if position.king_square(color) != Square::at(color.home_row(), KING_HOME_COL) {
            return rights;
        }
        for side in CastleSide::ALL {
            let corner = Square::at(color.home_row(), side.rook_col());
            if rook_on(position, corner, color) {
                match side {
                    CastleSide::Kingside => rights.kingside = true,
                    CastleSide::Queenside => rights.queenside = true,
                }
            }
        }
        rights
    }
}

/// Per-color en-passant target: the square a pawn of that color may capture
/// onto on this move. Valid for exactly one ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EnPassantState {
    targets: [Option<Square>; 2],
}

impl EnPassantState {
    pub fn target_for(&self, color: Color) -> Option<Square> {
        self.targets[color.index()]
    }

    /// Forgets stale targets and records the one created by `entry`, if any.
    pub fn update(&mut self, entry: &MoveLogEntry) {
        self.targets = [None, None];
        if let MoveLogEntry::Regular { mover, to, .. } = *entry {
            let rows = (to.row() as i8 - mover.square.row() as i8).abs();
            if mover.piece == Piece::Pawn && rows == 2 {
                let skipped = Square::at((to.row() + mover.square.row()) / 2, to.col());
                self.targets[mover.color.opposite().index()] = Some(skipped);
            }
        }
    }
}

/// Castling rights and en-passant state as they were before a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RightsSnapshot {
    pub castling: [CastlingRights; 2],
    pub en_passant: EnPassantState,
}

/// Everything needed to take back one committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveLogEntry {
    Regular {
        mover: PlacedPiece,
        to: Square,
        replaced: Occupant,
    },
    EnPassant {
        mover: PlacedPiece,
        captured: PlacedPiece,
        vacated: Square,
    },
    Castle {
        king: PlacedPiece,
        rook: PlacedPiece,
        king_to: Square,
        rook_to: Square,
    },
}

impl MoveLogEntry {
    pub fn mover(&self) -> PlacedPiece {
        match *self {
            MoveLogEntry::Regular { mover, .. } => mover,
            MoveLogEntry::EnPassant { mover, .. } => mover,
            MoveLogEntry::Castle { king, .. } => king,
        }
    }

    /// The move that produced this entry.
    pub fn as_move(&self) -> Move {
        match *self {
            MoveLogEntry::Regular { mover, to, .. } => Move::new(mover.square, to),
            MoveLogEntry::EnPassant {
                mover,
                captured,
                vacated,
            } => Move::new_en_passant(mover.square, vacated, captured.square),
            MoveLogEntry::Castle {
                king,
                rook,
                king_to,
                rook_to,
            } => Move::new_castling(king.square, king_to, rook.square, rook_to),
        }
    }

    pub fn captured(&self) -> Option<PlacedPiece> {
        match *self {
            MoveLogEntry::Regular { replaced, .. } => replaced.piece(),
            MoveLogEntry::EnPassant { captured, .. } => Some(captured),
            MoveLogEntry::Castle { .. } => None,
        }
    }
}

/// Clears the rights a committed move gives up: any king move clears both of
/// its color's rights, a rook leaving its corner clears that side, and a
/// capture on a corner clears the victim's side.
pub fn update_castling_rights(rights: &mut [CastlingRights; 2], entry: &MoveLogEntry) {
    let mover = entry.mover();
    match mover.piece {
        Piece::King => rights[mover.color.index()] = CastlingRights::NONE,
        Piece::Rook => clear_corner(rights, mover),
        _ => {}
    }
    if let Some(victim) = entry.captured() {
        if victim.piece == Piece::Rook {
            clear_corner(rights, victim);
        }
    }
}

fn clear_corner(rights: &mut [CastlingRights; 2], rook: PlacedPiece) {
    if rook.square.row() != rook.color.home_row() {
        return;
    }
    if let Some(side) = CastleSide::from_rook_col(rook.square.col()) {
        rights[rook.color.index()].clear(side);
    }
}

/// Castling moves open to `color`: the king is not in check, the right is
/// intact, king and rook are home with nothing between them, and the king
/// neither crosses nor lands on an attacked square.
pub fn castling_moves(position: &Position, color: Color, rights: CastlingRights) -> Vec<Move> {
    let home = color.home_row();
    let king_from = Square::at(home, KING_HOME_COL);
    if position.king_square(color) != king_from || is_in_check(position, color) {
        return Vec::new();
    }

    let mut moves = Vec::new();
    for side in CastleSide::ALL {
        if !rights.has(side) {
            continue;
        }
        let rook_from = Square::at(home, side.rook_col());
        if !rook_on(position, rook_from, color) {
            continue;
        }
        if !side
            .between_cols()
            .iter()
            .all(|&col| position.is_empty(Square::at(home, col)))
        {
            continue;
        }

        let transit = Square::at(home, side.rook_to_col());
        let king_to = Square::at(home, side.king_to_col());
        let safe = [transit, king_to]
            .iter()
            .all(|&square| is_legal(position, &Move::new(king_from, square)));
        if safe {
            moves.push(Move::new_castling(king_from, king_to, rook_from, transit));
        }
    }
    moves
}

/// The en-passant capture open to the pawn on `from`, if `target` names a
/// square diagonally ahead of it with the passed enemy pawn beside it.
pub fn en_passant_moves(position: &Position, from: Square, target: Option<Square>) -> Vec<Move> {
    let (Some(pawn), Some(target)) = (position.piece_at(from), target) else {
        return Vec::new();
    };
    if pawn.piece != Piece::Pawn {
        return Vec::new();
    }

    let forward = from.row() as i8 + pawn.color.pawn_direction();
    let sideways = (target.col() as i8 - from.col() as i8).abs();
    if target.row() as i8 != forward || sideways != 1 || !position.is_empty(target) {
        return Vec::new();
    }

    // The passed pawn stands one row behind the target, beside the mover
    let captured = Square::at(from.row(), target.col());
    let passed = position
        .piece_at(captured)
        .map_or(false, |placed| placed.is(Piece::Pawn, pawn.color.opposite()));
    if !passed {
        return Vec::new();
    }

    let mv = Move::new_en_passant(from, target, captured);
    if is_legal(position, &mv) {
        vec![mv]
    } else {
        Vec::new()
    }
}

fn rook_on(position: &Position, square: Square, color: Color) -> bool {
    position
        .piece_at(square)
        .map_or(false, |placed| placed.is(Piece::Rook, color))
}
