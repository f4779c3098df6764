use std::fmt;

use crate::bitboard::BitBoard;
use crate::hand::Hand;
use crate::move_gen::magic_bitboard::{bishop_attacks, lance_attacks, rook_attacks};
use crate::move_gen::step_attacks::{gold_attacks, knight_attacks, pawn_attacks, silver_attacks};
use crate::move_gen::{GenerateMoves, MOVE_GEN};
use crate::moves::{Move, MoveList};
use crate::piece::{Piece, PieceType, Side};
use crate::square::{File, Rank, Square};

use self::zobrist_hash::ZobristHash;

mod sfen;
mod zobrist_hash;

pub use self::sfen::SfenParseError;

/// Number of moves a game may hold before `make_move` refuses more.
pub const MAX_PLY: usize = 2000;

/// Room for the setup record, a generated move and a pawn drop reply on top of `MAX_PLY`.
const HISTORY_CAPACITY: usize = MAX_PLY + 3;

pub const START_SFEN: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// Accepted by `Position::from_sfen` in place of `START_SFEN`.
pub const STARTPOS: &str = "startpos";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PositionError {
    #[error("move {0} can't be played on a board")]
    SpecialMove(Move),

    #[error("no piece at {0}")]
    MoveNoPiece(Square),

    #[error("piece at {0} belongs to the side not to move")]
    MoveNotToMove(Square),

    #[error("move {0} captures a piece of the side to move")]
    CaptureOwnPiece(Move),

    #[error("move {0} promotes a piece that can't promote there")]
    CantPromote(Move),

    #[error("drop {0} targets an occupied square")]
    DropOccupied(Move),

    #[error("drop {0} needs a piece that isn't in hand")]
    DropNotInHand(Move),

    #[error("game has reached the limit of {0} moves")]
    PlyLimit(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MoveRecord {
    mve: Move,
    captured_piece: Piece,
    zobrist_hash: ZobristHash,
}

#[derive(Clone)]
pub struct Position {
    board: [Piece; Square::NUM],
    hands: [Hand; Side::NUM],
    side_to_move: Side,
    start_ply: u32,
    king_squares: [Square; Side::NUM],
    /// Indexed by `Piece`. The `Piece::Empty` entry holds the unoccupied squares.
    pieces: [BitBoard; Piece::NUM],
    sides: [BitBoard; Side::NUM],
    occupied: BitBoard,
    /// Pieces giving check to the side to move.
    checkers: BitBoard,
    zobrist_hash: ZobristHash,
    /// The first record stands for the position the game was set up from.
    history: Vec<MoveRecord>,
}

impl Position {
    pub fn start() -> Self {
        Position::from_sfen(START_SFEN).expect("start position SFEN is valid")
    }

    fn empty() -> Self {
        let mut pieces = [BitBoard::empty(); Piece::NUM];
        pieces[Piece::Empty as usize] = BitBoard::full();

        Self {
            board: [Piece::Empty; Square::NUM],
            hands: [Hand::empty(); Side::NUM],
            side_to_move: Side::Black,
            start_ply: 0,
            king_squares: [Square::SQ59, Square::SQ51],
            pieces,
            sides: [BitBoard::empty(); Side::NUM],
            occupied: BitBoard::empty(),
            checkers: BitBoard::empty(),
            zobrist_hash: ZobristHash::calculate(
                &[Piece::Empty; Square::NUM],
                &[Hand::empty(); Side::NUM],
                Side::Black,
            ),
            history: Vec::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Completes a position whose pieces and hands are already in place.
    fn finish_setup(&mut self, side_to_move: Side, start_ply: u32) {
        if side_to_move != self.side_to_move {
            self.flip_side_to_move();
        }
        self.start_ply = start_ply;
        self.update_checkers();
        self.history.push(MoveRecord {
            mve: Move::NONE,
            captured_piece: Piece::Empty,
            zobrist_hash: self.zobrist_hash,
        });
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Moves played since the game began, counting those before the setup position.
    pub fn ply(&self) -> u32 {
        self.start_ply + (self.history.len() as u32 - 1)
    }

    /// `Move::NONE` before any move has been played.
    pub fn last_move(&self) -> Move {
        self.history.last().map_or(Move::NONE, |record| record.mve)
    }

    /// `Piece::Empty` when the last move captured nothing.
    pub fn last_captured_piece(&self) -> Piece {
        self.history
            .last()
            .map_or(Piece::Empty, |record| record.captured_piece)
    }

    pub fn piece_at(&self, square: Square) -> Piece {
        self.board[square as usize]
    }

    pub fn piece_at_file_rank(&self, file: File, rank: Rank) -> Piece {
        self.piece_at(Square::new(file, rank))
    }

    pub fn hand(&self, side: Side) -> Hand {
        self.hands[side as usize]
    }

    pub fn num_in_hand(&self, side: Side, piece_type: PieceType) -> u32 {
        self.hands[side as usize].count(piece_type)
    }

    /// Where `side`'s king was last placed. Stale once the king is unset or overwritten, until
    /// a king is set again.
    pub fn king_square(&self, side: Side) -> Square {
        self.king_squares[side as usize]
    }

    fn has_king(&self, side: Side) -> bool {
        self.board[self.king_squares[side as usize] as usize] == Piece::new(side, PieceType::King)
    }

    pub fn piece_bitboard(&self, piece: Piece) -> BitBoard {
        self.pieces[piece as usize]
    }

    pub fn side_bitboard(&self, side: Side) -> BitBoard {
        self.sides[side as usize]
    }

    pub fn occupied(&self) -> BitBoard {
        self.occupied
    }

    pub fn unoccupied(&self) -> BitBoard {
        self.pieces[Piece::Empty as usize]
    }

    pub fn checkers(&self) -> BitBoard {
        self.checkers
    }

    /// Positive while Black is to move, negative while White is.
    pub fn zobrist_hash(&self) -> i64 {
        self.zobrist_hash.value()
    }

    /// Places `piece` on `square`, replacing whatever stood there. Placing `Piece::Empty`
    /// clears the square.
    pub fn set_piece(&mut self, square: Square, piece: Piece) {
        self.put_piece(square, piece);
        self.sync_after_edit();
    }

    /// Clears `square`. A side whose king is cleared counts as never in check until a king is
    /// set again.
    pub fn unset_piece(&mut self, square: Square) {
        self.remove_piece(square);
        self.sync_after_edit();
    }

    /// Panics if `side` already holds the most `piece_type` a hand can.
    pub fn add_piece_to_hand(&mut self, side: Side, piece_type: PieceType) {
        self.add_to_hand(side, piece_type);
        self.sync_after_edit();
    }

    /// Panics if `side` holds no `piece_type`.
    pub fn subtract_piece_from_hand(&mut self, side: Side, piece_type: PieceType) {
        self.subtract_from_hand(side, piece_type);
        self.sync_after_edit();
    }

    fn sync_after_edit(&mut self) {
        self.update_checkers();
        if let Some(record) = self.history.last_mut() {
            record.zobrist_hash = self.zobrist_hash;
        }
    }

    fn put_piece(&mut self, square: Square, piece: Piece) {
        self.remove_piece(square);
        let Some(side) = piece.side() else {
            return;
        };

        let square_bb = BitBoard::from_square(square);
        self.board[square as usize] = piece;
        self.pieces[Piece::Empty as usize] ^= square_bb;
        self.pieces[piece as usize] |= square_bb;
        self.sides[side as usize] |= square_bb;
        self.occupied |= square_bb;
        self.zobrist_hash.toggle_piece(piece, square);

        if piece.piece_type() == Some(PieceType::King) {
            self.king_squares[side as usize] = square;
        }
    }

    /// Clears `square` and returns what stood there.
    fn remove_piece(&mut self, square: Square) -> Piece {
        let piece = self.board[square as usize];
        let Some(side) = piece.side() else {
            return piece;
        };

        let square_bb = BitBoard::from_square(square);
        self.board[square as usize] = Piece::Empty;
        self.pieces[Piece::Empty as usize] |= square_bb;
        self.pieces[piece as usize] ^= square_bb;
        self.sides[side as usize] ^= square_bb;
        self.occupied ^= square_bb;
        self.zobrist_hash.toggle_piece(piece, square);

        piece
    }

    fn add_to_hand(&mut self, side: Side, piece_type: PieceType) {
        self.zobrist_hash.toggle_hands(&self.hands);
        self.hands[side as usize].add(piece_type);
        self.zobrist_hash.toggle_hands(&self.hands);
    }

    fn subtract_from_hand(&mut self, side: Side, piece_type: PieceType) {
        self.zobrist_hash.toggle_hands(&self.hands);
        self.hands[side as usize].subtract(piece_type);
        self.zobrist_hash.toggle_hands(&self.hands);
    }

    fn flip_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opposite_side();
        self.zobrist_hash.flip_side_to_move();
    }

    fn update_checkers(&mut self) {
        let side = self.side_to_move;
        self.checkers = if self.has_king(side) {
            self.attackers_to(side.opposite_side(), self.king_squares[side as usize])
        } else {
            BitBoard::empty()
        };
    }

    /// Plays `mve` without checking it. The move generator relies on this being cheap.
    ///
    /// Panics if the origin doesn't hold a piece of the side to move, if a drop targets an
    /// occupied square or a piece not in hand, if `mve` is `NONE`, `RESIGN` or `WIN`, or once
    /// the history is full.
    pub fn do_move(&mut self, mve: Move) {
        assert!(
            mve == Move::NULL || !mve.is_special(),
            "can't play {} on a board",
            mve
        );

        assert!(self.history.len() < HISTORY_CAPACITY, "move history is full");

        let side = self.side_to_move;
        let mut captured_piece = Piece::Empty;

        if mve == Move::NULL {
            // Only the side to move changes.
        } else if mve.is_drop() {
            let piece_type = mve.drop_piece_type();
            let dest = mve.dest();
            assert!(self.piece_at(dest).is_empty(), "drop onto occupied {}", dest);

            self.put_piece(dest, Piece::new(side, piece_type));
            self.subtract_from_hand(side, piece_type);
        } else {
            let (src, dest) = (mve.src(), mve.dest());
            let mut piece = self.remove_piece(src);
            assert_eq!(piece.side(), Some(side), "no piece of the side to move at {}", src);

            captured_piece = self.piece_at(dest);
            if let Some(captured_type) = captured_piece.piece_type() {
                self.add_to_hand(side, captured_type.raw_type());
            }

            if mve.is_promotion() {
                piece = piece.promoted();
            }
            self.put_piece(dest, piece);
        }

        self.flip_side_to_move();
        self.update_checkers();
        self.history.push(MoveRecord {
            mve,
            captured_piece,
            zobrist_hash: self.zobrist_hash,
        });
    }

    /// Takes back the last move and returns it. Returns `Move::NONE` and does nothing when no
    /// move has been played since setup.
    pub fn undo_move(&mut self) -> Move {
        if self.history.len() <= 1 {
            return Move::NONE;
        }
        let MoveRecord {
            mve,
            captured_piece,
            ..
        } = self.history[self.history.len() - 1];
        self.history.truncate(self.history.len() - 1);

        let mover = self.side_to_move.opposite_side();

        if mve == Move::NULL {
            // Only the side to move changes.
        } else if mve.is_drop() {
            self.remove_piece(mve.dest());
            self.add_to_hand(mover, mve.drop_piece_type());
        } else {
            let (src, dest) = (mve.src(), mve.dest());
            let mut piece = self.remove_piece(dest);
            if mve.is_promotion() {
                piece = piece.demoted();
            }
            self.put_piece(src, piece);

            if let Some(captured_type) = captured_piece.piece_type() {
                self.subtract_from_hand(mover, captured_type.raw_type());
                self.put_piece(dest, captured_piece);
            }
        }

        self.flip_side_to_move();
        self.update_checkers();
        mve
    }

    /// Checks that `mve` can be carried out on this board, then plays it. Checking whether the
    /// move is fully legal is left to `is_legal`.
    pub fn make_move(&mut self, mve: Move) -> Result<(), PositionError> {
        if self.history.len() > MAX_PLY {
            return Err(PositionError::PlyLimit(MAX_PLY));
        }

        let side = self.side_to_move;
        if mve == Move::NULL {
            // Always playable.
        } else if mve.is_special() {
            return Err(PositionError::SpecialMove(mve));
        } else if mve.is_drop() {
            if !self.piece_at(mve.dest()).is_empty() {
                return Err(PositionError::DropOccupied(mve));
            }
            if !self.hand(side).exists(mve.drop_piece_type()) {
                return Err(PositionError::DropNotInHand(mve));
            }
        } else {
            let (src, dest) = (mve.src(), mve.dest());
            let piece_type = match (self.piece_at(src).side(), self.piece_at(src).piece_type()) {
                (Some(piece_side), Some(piece_type)) if piece_side == side => piece_type,
                (Some(_), _) => return Err(PositionError::MoveNotToMove(src)),
                _ => return Err(PositionError::MoveNoPiece(src)),
            };
            if self.piece_at(dest).side() == Some(side) {
                return Err(PositionError::CaptureOwnPiece(mve));
            }
            if mve.is_promotion()
                && !(piece_type.can_promote()
                    && (src.in_promotion_zone(side) || dest.in_promotion_zone(side)))
            {
                return Err(PositionError::CantPromote(mve));
            }
        }

        self.do_move(mve);
        Ok(())
    }

    /// Pieces of `attacker` that attack `square`. Each step pattern is looked up from
    /// `square` as if the defender stood there, which gives the same squares the attacker's
    /// pieces would need to stand on.
    pub fn attackers_to(&self, attacker: Side, square: Square) -> BitBoard {
        let attacked = attacker.opposite_side();
        let pieces = |piece_type| self.pieces[Piece::new(attacker, piece_type) as usize];

        let golds = pieces(PieceType::Gold)
            | pieces(PieceType::ProPawn)
            | pieces(PieceType::ProLance)
            | pieces(PieceType::ProKnight)
            | pieces(PieceType::ProSilver);
        // Horse, dragon and king all step one square in every direction.
        let hdk = pieces(PieceType::Horse) | pieces(PieceType::Dragon) | pieces(PieceType::King);

        (pawn_attacks(attacked, square) & pieces(PieceType::Pawn))
            | (knight_attacks(attacked, square) & pieces(PieceType::Knight))
            | (silver_attacks(attacked, square) & (pieces(PieceType::Silver) | hdk))
            | (gold_attacks(attacked, square) & (golds | hdk))
            | (bishop_attacks(square, self.occupied)
                & (pieces(PieceType::Bishop) | pieces(PieceType::Horse)))
            | (rook_attacks(square, self.occupied)
                & (pieces(PieceType::Rook) | pieces(PieceType::Dragon)))
            | (lance_attacks(attacked, square, self.occupied) & pieces(PieceType::Lance))
    }

    /// Whether the side to move is in check.
    pub fn is_king_attacked(&self) -> bool {
        !self.checkers.is_empty()
    }

    pub fn is_side_in_check(&self, side: Side) -> bool {
        self.has_king(side)
            && !self
                .attackers_to(side.opposite_side(), self.king_squares[side as usize])
                .is_empty()
    }

    /// Whether the current position has now occurred four times. Positions are compared by
    /// hash alone.
    pub fn is_repetition(&self) -> bool {
        let len = self.history.len();
        if len < 3 {
            return false;
        }

        let repeats = self.history[..len - 2]
            .iter()
            .filter(|record| record.zobrist_hash == self.zobrist_hash)
            .count();
        repeats >= 3
    }

    pub fn is_mated(&mut self) -> bool {
        !MOVE_GEN.has_legal_move(self)
    }

    pub fn legal_moves(&mut self) -> MoveList {
        MOVE_GEN.gen_moves(self)
    }

    pub fn pseudo_legal_moves(&self) -> MoveList {
        MOVE_GEN.gen_pseudo_legal_moves(self)
    }

    pub fn is_legal(&mut self, mve: Move) -> bool {
        self.legal_moves().contains(&mve)
    }
}

/// Positions are equal when board, hands and side to move match. How they were reached
/// doesn't matter.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.hands == other.hands
            && self.side_to_move == other.side_to_move
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side_to_move {
            Side::Black => "Black",
            Side::White => "White",
        };
        writeln!(f, "Side: {}", side)?;
        writeln!(
            f,
            "White hand: {}",
            self.hand(Side::White).to_string().to_lowercase()
        )?;

        for rank in 0..Rank::NUM as u8 {
            for file in (0..File::NUM as u8).rev() {
                let piece = self.piece_at_file_rank(File::from_u8(file), Rank::from_u8(rank));
                write!(f, "{:>3}", piece.to_string())?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Black hand: {}", self.hand(Side::Black))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
