pub mod board;
pub mod board_builder;
pub mod check;
pub mod console;
pub mod error;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod special;

pub use board::{Color, Occupant, Piece, PlacedPiece, Position, Square};
pub use board_builder::PositionBuilder;
pub use error::Error;
pub use game::{ClickOutcome, GameState, GameStatus, Phase};
pub use movegen::{Move, MoveKind};
pub use special::{CastleSide, CastlingRights};
