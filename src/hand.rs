use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::PieceType;

// Bit offset and width mask of each hand type, indexed by `PieceType as usize`.
// Pawns get five bits (18 max), bishop and rook two (2 max), the rest three (4 max).
const PIECE_BITS: [u32; 8] = [0, 0, 8, 12, 16, 20, 24, 28];
const PIECE_MASKS: [u32; 8] = [0, 0b11111, 0b111, 0b111, 0b111, 0b11, 0b11, 0b111];
const MAX_COUNTS: [u32; 8] = [0, 18, 4, 4, 4, 2, 2, 4];

/// The captured pieces one side holds, packed into a single word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Hand(u32);

impl Hand {
    pub const fn empty() -> Self {
        Hand(0)
    }

    /// How many pieces of `piece_type` a hand can ever hold.
    pub const fn max_count(piece_type: PieceType) -> u32 {
        match piece_type {
            PieceType::King => 0,
            _ => MAX_COUNTS[hand_index(piece_type)],
        }
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn count(self, piece_type: PieceType) -> u32 {
        match piece_type {
            PieceType::King => 0,
            _ => {
                let idx = hand_index(piece_type);
                (self.0 >> PIECE_BITS[idx]) & PIECE_MASKS[idx]
            }
        }
    }

    pub const fn exists(self, piece_type: PieceType) -> bool {
        self.count(piece_type) != 0
    }

    pub const fn exists_except_pawn(self) -> bool {
        self.0 & !PIECE_MASKS[PieceType::Pawn as usize] != 0
    }

    pub fn add(&mut self, piece_type: PieceType) {
        if piece_type == PieceType::King {
            return;
        }
        assert!(
            self.count(piece_type) < Hand::max_count(piece_type),
            "hand overflow for {}",
            piece_type
        );
        self.0 += 1 << PIECE_BITS[hand_index(piece_type)];
    }

    pub fn subtract(&mut self, piece_type: PieceType) {
        if piece_type == PieceType::King {
            return;
        }
        assert!(self.exists(piece_type), "no {} in hand", piece_type);
        self.0 -= 1 << PIECE_BITS[hand_index(piece_type)];
    }
}

const fn hand_index(piece_type: PieceType) -> usize {
    assert!(
        !piece_type.is_promoted(),
        "promoted pieces never enter a hand"
    );
    piece_type as usize
}

/// Renders in SFEN order with Black's uppercase letters, e.g. `RB2G17P`. Empty hands render as
/// nothing.
impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pt in PieceType::HAND_TYPES {
            match self.count(pt) {
                0 => {}
                1 => write!(f, "{}", pt)?,
                n => write!(f, "{}{}", n, pt)?,
            }
        }
        Ok(())
    }
}
