use crate::bitboard::BitBoard;
use crate::piece::{Piece, PieceType, Side};
use crate::square::{Direction, Square};

struct SquareToMoveDatabase([BitBoard; Square::NUM]);

impl SquareToMoveDatabase {
    const fn get_bitboard(&self, square: Square) -> BitBoard {
        self.0[square as usize]
    }
}

struct SidedSquareToMoveDatabase {
    black: SquareToMoveDatabase,
    white: SquareToMoveDatabase,
}

impl SidedSquareToMoveDatabase {
    const fn get_square_db(&self, side: Side) -> &SquareToMoveDatabase {
        match side {
            Side::Black => &self.black,
            Side::White => &self.white,
        }
    }
}

const fn calc_square_to_move_database(dirs: &[Direction]) -> SquareToMoveDatabase {
    let mut bbs = [BitBoard::empty(); Square::NUM];

    let mut bb_idx = 0;
    while bb_idx < bbs.len() {
        let sq = Square::from_u8(bb_idx as u8);

        let mut sq_bb = BitBoard::empty();
        let mut dir_idx = 0;
        while dir_idx < dirs.len() {
            if let Some(to) = sq.next(dirs[dir_idx]) {
                sq_bb = sq_bb.const_bit_or(BitBoard::from_square(to));
            }
            dir_idx += 1;
        }

        bbs[bb_idx] = sq_bb;
        bb_idx += 1;
    }

    SquareToMoveDatabase(bbs)
}

const fn calc_sided_square_to_move_database(piece_type: PieceType) -> SidedSquareToMoveDatabase {
    SidedSquareToMoveDatabase {
        black: calc_square_to_move_database(Piece::new(Side::Black, piece_type).step_directions()),
        white: calc_square_to_move_database(Piece::new(Side::White, piece_type).step_directions()),
    }
}

static PAWN_ATKS: SidedSquareToMoveDatabase = calc_sided_square_to_move_database(PieceType::Pawn);
static KNIGHT_ATKS: SidedSquareToMoveDatabase = calc_sided_square_to_move_database(PieceType::Knight);
static SILVER_ATKS: SidedSquareToMoveDatabase = calc_sided_square_to_move_database(PieceType::Silver);
static GOLD_ATKS: SidedSquareToMoveDatabase = calc_sided_square_to_move_database(PieceType::Gold);

static KING_ATKS: SquareToMoveDatabase = calc_square_to_move_database(Piece::BKing.step_directions());

// One step along each slide direction.
static BISHOP_STEP_ATKS: SquareToMoveDatabase =
    calc_square_to_move_database(Piece::BBishop.slide_directions());
static ROOK_STEP_ATKS: SquareToMoveDatabase =
    calc_square_to_move_database(Piece::BRook.slide_directions());

pub fn pawn_attacks(side: Side, square: Square) -> BitBoard {
    PAWN_ATKS.get_square_db(side).get_bitboard(square)
}

pub fn knight_attacks(side: Side, square: Square) -> BitBoard {
    KNIGHT_ATKS.get_square_db(side).get_bitboard(square)
}

pub fn silver_attacks(side: Side, square: Square) -> BitBoard {
    SILVER_ATKS.get_square_db(side).get_bitboard(square)
}

/// Also the pattern of promoted pawns, lances, knights and silvers.
pub fn gold_attacks(side: Side, square: Square) -> BitBoard {
    GOLD_ATKS.get_square_db(side).get_bitboard(square)
}

pub fn king_attacks(square: Square) -> BitBoard {
    KING_ATKS.get_bitboard(square)
}

pub fn bishop_step_attacks(square: Square) -> BitBoard {
    BISHOP_STEP_ATKS.get_bitboard(square)
}

pub fn rook_step_attacks(square: Square) -> BitBoard {
    ROOK_STEP_ATKS.get_bitboard(square)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square::*;
    use test_case::test_case;

    #[test_case(Side::Black, SQ77, BitBoard::from_square(SQ76) ; "black")]
    #[test_case(Side::White, SQ33, BitBoard::from_square(SQ34) ; "white")]
    #[test_case(Side::Black, SQ51, BitBoard::empty() ; "black last rank")]
    #[test_case(Side::White, SQ59, BitBoard::empty() ; "white last rank")]
    fn test_pawn_attacks(side: Side, square: Square, want: BitBoard) {
        assert_eq!(pawn_attacks(side, square), want);
    }

    #[test_case(Side::Black, SQ28, BitBoard::from_squares(&[SQ16, SQ36]) ; "black")]
    #[test_case(Side::Black, SQ13, BitBoard::from_squares(&[SQ21]) ; "black edge")]
    #[test_case(Side::Black, SQ82, BitBoard::empty() ; "black second rank")]
    #[test_case(Side::White, SQ22, BitBoard::from_squares(&[SQ14, SQ34]) ; "white")]
    fn test_knight_attacks(side: Side, square: Square, want: BitBoard) {
        assert_eq!(knight_attacks(side, square), want);
    }

    #[test_case(Side::Black, SQ55, BitBoard::from_squares(&[SQ54, SQ44, SQ64, SQ46, SQ66]) ; "black")]
    #[test_case(Side::White, SQ55, BitBoard::from_squares(&[SQ56, SQ44, SQ64, SQ46, SQ66]) ; "white")]
    #[test_case(Side::Black, SQ11, BitBoard::from_squares(&[SQ22]) ; "black corner")]
    fn test_silver_attacks(side: Side, square: Square, want: BitBoard) {
        assert_eq!(silver_attacks(side, square), want);
    }

    #[test_case(Side::Black, SQ55, BitBoard::from_squares(&[SQ54, SQ44, SQ64, SQ45, SQ65, SQ56]) ; "black")]
    #[test_case(Side::White, SQ55, BitBoard::from_squares(&[SQ56, SQ46, SQ66, SQ45, SQ65, SQ54]) ; "white")]
    #[test_case(Side::White, SQ99, BitBoard::from_squares(&[SQ98, SQ89]) ; "white corner")]
    fn test_gold_attacks(side: Side, square: Square, want: BitBoard) {
        assert_eq!(gold_attacks(side, square), want);
    }

    #[test_case(SQ55, BitBoard::from_squares(&[SQ44, SQ45, SQ46, SQ54, SQ56, SQ64, SQ65, SQ66]) ; "center")]
    #[test_case(SQ11, BitBoard::from_squares(&[SQ12, SQ21, SQ22]) ; "corner")]
    #[test_case(SQ91, BitBoard::from_squares(&[SQ81, SQ82, SQ92]) ; "far corner")]
    fn test_king_attacks(square: Square, want: BitBoard) {
        assert_eq!(king_attacks(square), want);
    }

    #[test]
    fn test_slider_steps() {
        assert_eq!(bishop_step_attacks(SQ55), BitBoard::from_squares(&[SQ44, SQ46, SQ64, SQ66]));
        assert_eq!(rook_step_attacks(SQ55), BitBoard::from_squares(&[SQ54, SQ56, SQ45, SQ65]));
        assert_eq!(rook_step_attacks(SQ19), BitBoard::from_squares(&[SQ18, SQ29]));
    }

    #[test]
    fn test_every_square_has_king_moves() {
        for idx in 0..Square::NUM as u8 {
            let count = king_attacks(Square::from_u8(idx)).num_squares_set();
            assert!((3..=8).contains(&count));
        }
    }
}
