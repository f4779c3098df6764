pub mod bitboard;
pub mod hand;
pub mod move_gen;
pub mod moves;
pub mod perft;
pub mod piece;
pub mod position;
pub mod square;

pub use bitboard::BitBoard;
pub use hand::Hand;
pub use move_gen::{GenerateMoves, MoveGen, MOVE_GEN};
pub use moves::{Move, MoveList};
pub use perft::{perft, perft_full, PerftCounts, PerftResult};
pub use piece::{Piece, PieceType, Side};
pub use position::{Position, PositionError, SfenParseError, START_SFEN};
pub use square::{File, Rank, Square};
