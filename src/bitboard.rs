use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use serde::{Deserialize, Serialize};

use crate::square::{File, Rank, Square};

const LOWER_LEN: u8 = 63;
const LOWER_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;
const UPPER_MASK: u64 = 0x3FFFF;

const FILE_PATTERN: u64 = 0x1FF;
const RANK_PATTERN_LOWER: u64 = 0x0040_2010_0804_0201;
const RANK_PATTERN_UPPER: u64 = 0x201;

/// A set of squares. Files 1-7 (ordinals 0..63) live in `lower`, files 8-9 in `upper`.
#[derive(PartialEq, Eq, Clone, Copy, Default, Hash, Deserialize, Serialize)]
pub struct BitBoard {
    lower: u64,
    upper: u64,
}

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard { lower: 0, upper: 0 }
    }

    pub const fn full() -> Self {
        BitBoard {
            lower: LOWER_MASK,
            upper: UPPER_MASK,
        }
    }

    pub(crate) const fn new(lower: u64, upper: u64) -> Self {
        BitBoard { lower, upper }
    }

    pub const fn from_square(square: Square) -> Self {
        let idx = square as u8;
        if idx < LOWER_LEN {
            BitBoard::new(1 << idx, 0)
        } else {
            BitBoard::new(0, 1 << (idx - LOWER_LEN))
        }
    }

    pub const fn from_squares(squares: &[Square]) -> Self {
        let mut bb = BitBoard::empty();
        let mut i = 0;
        while i < squares.len() {
            bb = bb.const_bit_or(BitBoard::from_square(squares[i]));
            i += 1;
        }
        bb
    }

    pub const fn from_file(file: File) -> Self {
        let idx = file as u8;
        if idx < File::Eight as u8 {
            BitBoard::new(FILE_PATTERN << (9 * idx), 0)
        } else {
            BitBoard::new(0, FILE_PATTERN << (9 * (idx - File::Eight as u8)))
        }
    }

    pub const fn from_rank(rank: Rank) -> Self {
        let idx = rank as u8;
        BitBoard::new(RANK_PATTERN_LOWER << idx, RANK_PATTERN_UPPER << idx)
    }

    pub fn set_square(&mut self, square: Square) {
        *self |= BitBoard::from_square(square);
    }

    pub fn clear_square(&mut self, square: Square) {
        self.and_not_assign(BitBoard::from_square(square));
    }

    pub const fn is_square_set(self, square: Square) -> bool {
        !self.const_bit_and(BitBoard::from_square(square)).is_empty()
    }

    pub const fn is_empty(self) -> bool {
        self.lower == 0 && self.upper == 0
    }

    pub const fn num_squares_set(self) -> u32 {
        self.lower.count_ones() + self.upper.count_ones()
    }

    /// Folds both words into one, the key fed to the magic multiply.
    pub(crate) const fn merge(self) -> u64 {
        self.lower ^ self.upper
    }

    pub const fn and_not(self, other: BitBoard) -> BitBoard {
        BitBoard::new(self.lower & !other.lower, self.upper & !other.upper)
    }

    pub fn and_not_assign(&mut self, other: BitBoard) {
        *self = self.and_not(other);
    }

    /// Moves every square one rank towards rank one. Squares already on rank one drop off.
    pub const fn shift_north(self) -> BitBoard {
        let bb = self.and_not(BitBoard::from_rank(Rank::One));
        BitBoard::new(bb.lower >> 1, bb.upper >> 1)
    }

    /// Moves every square one rank towards rank nine. Squares already on rank nine drop off.
    pub const fn shift_south(self) -> BitBoard {
        let bb = self.and_not(BitBoard::from_rank(Rank::Nine));
        BitBoard::new((bb.lower << 1) & LOWER_MASK, (bb.upper << 1) & UPPER_MASK)
    }

    pub fn get_lsb(self) -> Square {
        debug_assert!(!self.is_empty(), "want non-empty bitboard");
        if self.lower != 0 {
            Square::from_u8(self.lower.trailing_zeros() as u8)
        } else {
            Square::from_u8(self.upper.trailing_zeros() as u8 + LOWER_LEN)
        }
    }

    pub fn pop_lsb(&mut self) -> Square {
        let lsb = self.get_lsb();
        if self.lower != 0 {
            self.lower &= self.lower - 1;
        } else {
            self.upper &= self.upper - 1;
        }
        lsb
    }

    pub(crate) const fn const_bit_or(self, other: BitBoard) -> BitBoard {
        BitBoard::new(self.lower | other.lower, self.upper | other.upper)
    }

    pub(crate) const fn const_bit_and(self, other: BitBoard) -> BitBoard {
        BitBoard::new(self.lower & other.lower, self.upper & other.upper)
    }
}

pub struct Squares(BitBoard);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.pop_lsb())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.num_squares_set() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Squares {}

impl IntoIterator for BitBoard {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Squares {
        Squares(self)
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        self.const_bit_or(other)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.lower |= rhs.lower;
        self.upper |= rhs.upper;
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        self.const_bit_and(other)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.lower &= rhs.lower;
        self.upper &= rhs.upper;
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;

    fn bitxor(self, other: BitBoard) -> BitBoard {
        BitBoard::new(self.lower ^ other.lower, self.upper ^ other.upper)
    }
}

impl BitXorAssign for BitBoard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.lower ^= rhs.lower;
        self.upper ^= rhs.upper;
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> Self::Output {
        BitBoard::full().and_not(self)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(Square::NUM + 8);

        for rank in 0..Rank::NUM as u8 {
            for file in (0..File::NUM as u8).rev() {
                let square = Square::new(File::from_u8(file), Rank::from_u8(rank));
                let ch = if self.is_square_set(square) { 'X' } else { '.' };
                board_str.push(ch);
            }
            if rank != Rank::Nine as u8 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}
