use std::fmt::{self, Display};

use crate::hand::Hand;
use crate::piece::{Piece, Side};
use crate::square::Square;

const RNG_SEED: u64 = 123456789;

/// Applied only while White is to move, so the sign of a hash tells the side to move.
const SIDE_KEY: u64 = 1 << 63;

struct RandomU64Generator {
    curr: u64,
}

impl RandomU64Generator {
    const fn new(seed: u64) -> Self {
        Self { curr: seed }
    }

    /// Standard Xorshift
    const fn generate(&mut self) -> u64 {
        let mut x = self.curr;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.curr = x;
        x
    }
}

struct ZobristRandomHashes {
    pieces: [[u64; Square::NUM]; Piece::NUM],
}

impl ZobristRandomHashes {
    const fn init() -> Self {
        let mut rng = RandomU64Generator::new(RNG_SEED);

        let mut pieces = [[0; Square::NUM]; Piece::NUM];
        // Piece::Empty keeps all zero keys.
        let mut piece = 1;
        while piece < Piece::NUM {
            let mut square = 0;
            while square < Square::NUM {
                pieces[piece][square] = rng.generate() & !SIDE_KEY;
                square += 1;
            }
            piece += 1;
        }

        Self { pieces }
    }
}

const ZOBRIST_RANDOM_HASHES: ZobristRandomHashes = ZobristRandomHashes::init();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ZobristHash(u64);

impl Display for ZobristHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl ZobristHash {
    pub(crate) fn calculate(
        board: &[Piece; Square::NUM],
        hands: &[Hand; Side::NUM],
        side_to_move: Side,
    ) -> ZobristHash {
        let mut hash = ZobristHash(0);

        for (idx, &piece) in board.iter().enumerate() {
            hash.toggle_piece(piece, Square::from_u8(idx as u8));
        }
        hash.toggle_hands(hands);
        if side_to_move == Side::White {
            hash.flip_side_to_move();
        }

        hash
    }

    pub(crate) fn toggle_piece(&mut self, piece: Piece, square: Square) {
        self.0 ^= ZOBRIST_RANDOM_HASHES.pieces[piece as usize][square as usize];
    }

    /// Both hands fit in 31 bits each, so the combined key never touches the side bit.
    pub(crate) fn toggle_hands(&mut self, hands: &[Hand; Side::NUM]) {
        let black = hands[Side::Black as usize].value() as u64;
        let white = hands[Side::White as usize].value() as u64;
        self.0 ^= white << 32 | black;
    }

    pub(crate) fn flip_side_to_move(&mut self) {
        self.0 ^= SIDE_KEY;
    }

    /// Positive while Black is to move and negative while White is.
    pub(crate) const fn value(self) -> i64 {
        self.0 as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType;
    use crate::square::Square::*;

    fn empty_board() -> [Piece; Square::NUM] {
        [Piece::Empty; Square::NUM]
    }

    #[test]
    fn test_keys_leave_side_bit_clear() {
        for keys in ZOBRIST_RANDOM_HASHES.pieces.iter() {
            for &key in keys.iter() {
                assert_eq!(key & SIDE_KEY, 0);
            }
        }
        assert!(ZOBRIST_RANDOM_HASHES.pieces[Piece::Empty as usize].iter().all(|&k| k == 0));
    }

    #[test]
    fn test_keys_are_distinct() {
        let mut keys: Vec<u64> = ZOBRIST_RANDOM_HASHES.pieces[1..]
            .iter()
            .flat_map(|keys| keys.iter().copied())
            .collect();
        let len = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), len);
    }

    #[test]
    fn test_side_sign() {
        let board = empty_board();
        let hands = [Hand::empty(); Side::NUM];
        assert!(ZobristHash::calculate(&board, &hands, Side::Black).value() >= 0);
        assert!(ZobristHash::calculate(&board, &hands, Side::White).value() < 0);
    }

    #[test]
    fn test_toggle_matches_calculate() {
        let mut board = empty_board();
        let mut hands = [Hand::empty(); Side::NUM];
        let mut hash = ZobristHash::calculate(&board, &hands, Side::Black);

        board[SQ59 as usize] = Piece::BKing;
        hash.toggle_piece(Piece::BKing, SQ59);

        hash.toggle_hands(&hands);
        hands[Side::White as usize].add(PieceType::Pawn);
        hash.toggle_hands(&hands);

        hash.flip_side_to_move();

        assert_eq!(hash, ZobristHash::calculate(&board, &hands, Side::White));
    }

    #[test]
    fn test_hands_change_hash() {
        let board = empty_board();
        let mut black_pawn = [Hand::empty(); Side::NUM];
        black_pawn[Side::Black as usize].add(PieceType::Pawn);
        let mut white_pawn = [Hand::empty(); Side::NUM];
        white_pawn[Side::White as usize].add(PieceType::Pawn);

        assert_ne!(
            ZobristHash::calculate(&board, &black_pawn, Side::Black),
            ZobristHash::calculate(&board, &white_pawn, Side::Black)
        );
    }
}
