use crate::board::{Color, Piece, Position, Square};
use crate::check::is_in_check;
use crate::error::Error;
use crate::legality::legal_moves;
use crate::movegen::Move;
use crate::special::{
    castling_moves, en_passant_moves, update_castling_rights, CastlingRights, EnPassantState,
    MoveLogEntry, RightsSnapshot,
};

/// Where the select/commit cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected(Square),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected,
    Moved,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate(Color), // Color is the winner
    Stalemate,
}

/// One game in progress: the live position, whose turn it is, the move log
/// and the selection cursor of whoever is driving the game.
///
/// Every command is a silent no-op when it does not apply (an empty square,
/// an opponent piece, an illegal target, an empty log); the return value
/// tells the caller whether anything happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    color_to_move: Color,
    log: Vec<MoveLogEntry>,
    rights_log: Vec<RightsSnapshot>,
    castling: [CastlingRights; 2],
    en_passant: EnPassantState,
    check: [bool; 2],
    selected: Option<Square>,
    targets: Vec<Move>,
}

impl GameState {
    /// The standard starting position, White to move, all castling rights.
    pub fn new() -> Self {
        Self::with_rights(Position::new(), Color::White, [CastlingRights::ALL; 2])
    }

    /// Starts from a hand-made position. Castling rights are granted wherever
    /// king and rook still stand on their starting squares.
    pub fn from_position(position: Position, color_to_move: Color) -> Result<Self, Error> {
        let waiting = color_to_move.opposite();
        if is_in_check(&position, waiting) {
            return Err(Error::InvalidPosition(format!(
                "{} is in check although {} is to move",
                waiting, color_to_move
            )));
        }
        let castling = [
            CastlingRights::inferred(&position, Color::White),
            CastlingRights::inferred(&position, Color::Black),
        ];
        Ok(Self::with_rights(position, color_to_move, castling))
    }

    fn with_rights(position: Position, color_to_move: Color, castling: [CastlingRights; 2]) -> Self {
        let mut game = Self {
            position,
            color_to_move,
            log: Vec::new(),
            rights_log: Vec::new(),
            castling,
            en_passant: EnPassantState::default(),
            check: [false; 2],
            selected: None,
            targets: Vec::new(),
        };
        game.refresh_checks();
        game
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn color_to_move(&self) -> Color {
        self.color_to_move
    }

    pub fn phase(&self) -> Phase {
        match self.selected {
            Some(square) => Phase::PieceSelected(square),
            None => Phase::AwaitingSelection,
        }
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Legal moves of the selected piece, as computed when it was selected.
    pub fn legal_moves(&self) -> &[Move] {
        &self.targets
    }

    pub fn legal_targets(&self) -> Vec<Square> {
        self.targets.iter().map(|mv| mv.to).collect()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.check[color.index()]
    }

    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        self.castling[color.index()]
    }

    /// The square a pawn of `color` may capture onto en passant this move.
    pub fn en_passant_target(&self, color: Color) -> Option<Square> {
        self.en_passant.target_for(color)
    }

    pub fn history_len(&self) -> usize {
        self.log.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.log.last().map(MoveLogEntry::as_move)
    }

    /// Every legal move of the piece on `from`, special moves included.
    /// Empty unless that piece belongs to the side to move.
    pub fn moves_from(&self, from: Square) -> Vec<Move> {
        let Some(placed) = self.position.piece_at(from) else {
            return Vec::new();
        };
        if placed.color != self.color_to_move {
            return Vec::new();
        }

        let mut moves = legal_moves(&self.position, from);
        match placed.piece {
            Piece::Pawn => moves.extend(en_passant_moves(
                &self.position,
                from,
                self.en_passant.target_for(placed.color),
            )),
            Piece::King => moves.extend(castling_moves(
                &self.position,
                placed.color,
                self.castling[placed.color.index()],
            )),
            _ => {}
        }
        moves
    }

    pub fn all_legal_moves(&self) -> Vec<Move> {
        self.position
            .pieces(self.color_to_move)
            .flat_map(|placed| self.moves_from(placed.square))
            .collect()
    }

    pub fn status(&self) -> GameStatus {
        if !self.all_legal_moves().is_empty() {
            GameStatus::Ongoing
        } else if self.is_in_check(self.color_to_move) {
            GameStatus::Checkmate(self.color_to_move.opposite())
        } else {
            GameStatus::Stalemate
        }
    }

    /// Selects a piece of the side to move and caches its legal moves.
    pub fn select(&mut self, square: Square) -> bool {
        if self.position.at(square).color() != Some(self.color_to_move) {
            return false;
        }
        self.selected = Some(square);
        self.targets = self.moves_from(square);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    /// Moves the selected piece to `target` if that is one of its legal moves.
    pub fn commit(&mut self, target: Square) -> bool {
        let Some(mv) = self.targets.iter().copied().find(|mv| mv.to == target) else {
            return false;
        };

        // Rights are logged before they change so undo restores the exact pair
        self.rights_log.push(RightsSnapshot {
            castling: self.castling,
            en_passant: self.en_passant,
        });
        let entry = self.position.make_move(&mv);
        update_castling_rights(&mut self.castling, &entry);
        self.en_passant.update(&entry);
        self.log.push(entry);

        self.color_to_move = self.color_to_move.opposite();
        self.refresh_checks();
        self.deselect();
        true
    }

    /// Select-then-commit in one call.
    pub fn play(&mut self, from: Square, to: Square) -> bool {
        let previous = self.selected;
        if self.select(from) && self.commit(to) {
            return true;
        }
        match previous {
            Some(square) => {
                self.select(square);
            }
            None => self.deselect(),
        }
        false
    }

    /// Clicking an own piece selects it; clicking anywhere else tries to move
    /// the selected piece there.
    pub fn click(&mut self, square: Square) -> ClickOutcome {
        if self.select(square) {
            ClickOutcome::Selected
        } else if self.commit(square) {
            ClickOutcome::Moved
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Takes back the last committed move. Does nothing on an empty log.
    pub fn undo(&mut self) -> bool {
        let (Some(entry), Some(snapshot)) = (self.log.pop(), self.rights_log.pop()) else {
            return false;
        };

        self.position.unmake_move(&entry);
        self.castling = snapshot.castling;
        self.en_passant = snapshot.en_passant;

        self.color_to_move = self.color_to_move.opposite();
        self.refresh_checks();
        self.deselect();
        true
    }

    fn refresh_checks(&mut self) {
        for color in Color::ALL {
            self.check[color.index()] = is_in_check(&self.position, color);
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
