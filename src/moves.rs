use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::piece::PieceType;
use crate::square::Square;

/// Upper bound on pseudo-legal moves in any position, with room to spare.
pub const MAX_MOVES: usize = 1024;

pub type MoveList = ArrayVec<Move, MAX_MOVES>;

const DEST_MASK: u16 = 0x7F;
const SRC_SHIFT: u16 = 7;
const DROP_FLAG: u16 = 1 << 14;
const PROMOTION_FLAG: u16 = 1 << 15;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move: want <src><dest>[+] or <piece>*<dest>, got {0}")]
    Invalid(String),

    #[error("move: piece can't be dropped, got {0}")]
    DropPiece(String),
}

/// Bits 0-6 hold the destination, bits 7-13 the origin square or the dropped piece type,
/// bit 14 marks a drop and bit 15 a promotion.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Move(u16);

impl Move {
    pub const NONE: Move = Move(0);
    pub const NULL: Move = Move((1 << SRC_SHIFT) + 1);
    pub const RESIGN: Move = Move((2 << SRC_SHIFT) + 2);
    pub const WIN: Move = Move((3 << SRC_SHIFT) + 3);

    pub const fn new(src: Square, dest: Square) -> Move {
        Move((src as u16) << SRC_SHIFT | dest as u16)
    }

    pub const fn with_promotion(src: Square, dest: Square) -> Move {
        Move(Move::new(src, dest).0 | PROMOTION_FLAG)
    }

    pub const fn new_drop(piece_type: PieceType, dest: Square) -> Move {
        Move((piece_type as u16) << SRC_SHIFT | dest as u16 | DROP_FLAG)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub const fn is_drop(self) -> bool {
        self.0 & DROP_FLAG != 0
    }

    pub const fn is_promotion(self) -> bool {
        self.0 & PROMOTION_FLAG != 0
    }

    pub const fn is_special(self) -> bool {
        self.0 == Move::NONE.0
            || self.0 == Move::NULL.0
            || self.0 == Move::RESIGN.0
            || self.0 == Move::WIN.0
    }

    pub const fn dest(self) -> Square {
        Square::from_u8((self.0 & DEST_MASK) as u8)
    }

    pub const fn src(self) -> Square {
        assert!(!self.is_drop(), "drops have no source square");
        Square::from_u8(((self.0 >> SRC_SHIFT) & DEST_MASK) as u8)
    }

    pub const fn drop_piece_type(self) -> PieceType {
        assert!(self.is_drop(), "only drops carry a piece type");
        PieceType::from_u8(((self.0 >> SRC_SHIFT) & DEST_MASK) as u8)
    }

    const fn special_name(self) -> Option<&'static str> {
        match self {
            Move::NONE => Some("NONE"),
            Move::NULL => Some("NULL"),
            Move::RESIGN => Some("RESIGN"),
            Move::WIN => Some("WIN"),
            _ => None,
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.special_name() {
            write!(f, "{}", name)
        } else if self.is_drop() {
            write!(f, "{} * {}", self.drop_piece_type(), self.dest())
        } else {
            write!(f, "{} -> {}", self.src(), self.dest())?;
            if self.is_promotion() {
                write!(f, " (+)")?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.special_name() {
            write!(f, "{}", name)
        } else if self.is_drop() {
            write!(f, "{}*{}", self.drop_piece_type(), self.dest())
        } else if self.is_promotion() {
            write!(f, "{}{}+", self.src(), self.dest())
        } else {
            write!(f, "{}{}", self.src(), self.dest())
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MoveParseError::Invalid(s.to_string());

        match s {
            "NONE" => return Ok(Move::NONE),
            "NULL" => return Ok(Move::NULL),
            "RESIGN" => return Ok(Move::RESIGN),
            "WIN" => return Ok(Move::WIN),
            _ => {}
        }

        if let Some((piece, dest)) = s.split_once('*') {
            let piece_type = piece.parse::<PieceType>().map_err(|_| invalid())?;
            if piece_type.is_promoted() || piece_type == PieceType::King {
                return Err(MoveParseError::DropPiece(s.to_string()));
            }
            let dest = dest.parse::<Square>().map_err(|_| invalid())?;
            return Ok(Move::new_drop(piece_type, dest));
        }

        let src = s.get(0..2).ok_or_else(invalid)?.parse::<Square>().map_err(|_| invalid())?;
        let dest = s.get(2..4).ok_or_else(invalid)?.parse::<Square>().map_err(|_| invalid())?;
        if src == dest {
            return Err(invalid());
        }

        match s.get(4..) {
            Some("") => Ok(Move::new(src, dest)),
            Some("+") => Ok(Move::with_promotion(src, dest)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_encoding() {
        let mve = Move::with_promotion(SQ88, SQ22);
        assert_eq!(mve.value(), (SQ88 as u16) << 7 | SQ22 as u16 | 1 << 15);
        assert_eq!(mve.src(), SQ88);
        assert_eq!(mve.dest(), SQ22);
        assert!(mve.is_promotion());
        assert!(!mve.is_drop());

        let drop = Move::new_drop(PieceType::Bishop, SQ55);
        assert_eq!(drop.value(), 5 << 7 | SQ55 as u16 | 1 << 14);
        assert_eq!(drop.drop_piece_type(), PieceType::Bishop);
        assert_eq!(drop.dest(), SQ55);
        assert!(!drop.is_promotion());
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Move::NONE.value(), 0);
        assert_eq!(Move::NULL.value(), 129);
        assert_eq!(Move::RESIGN.value(), 258);
        assert_eq!(Move::WIN.value(), 387);
        for mve in [Move::NONE, Move::NULL, Move::RESIGN, Move::WIN] {
            assert!(mve.is_special());
        }
        assert!(!Move::new(SQ77, SQ76).is_special());
    }

    #[test]
    fn test_ordered_by_encoding() {
        let mut moves = vec![
            Move::new_drop(PieceType::Pawn, SQ11),
            Move::with_promotion(SQ11, SQ12),
            Move::new(SQ12, SQ11),
            Move::new(SQ11, SQ12),
        ];
        moves.sort();
        assert_eq!(
            moves,
            vec![
                Move::new(SQ11, SQ12),
                Move::new(SQ12, SQ11),
                Move::new_drop(PieceType::Pawn, SQ11),
                Move::with_promotion(SQ11, SQ12),
            ]
        );
    }

    #[test_case(Move::new(SQ77, SQ76), "7g7f" ; "board move")]
    #[test_case(Move::with_promotion(SQ88, SQ22), "8h2b+" ; "promotion")]
    #[test_case(Move::new_drop(PieceType::Pawn, SQ55), "P*5e" ; "drop")]
    #[test_case(Move::NONE, "NONE" ; "none")]
    #[test_case(Move::NULL, "NULL" ; "null")]
    #[test_case(Move::RESIGN, "RESIGN" ; "resign")]
    #[test_case(Move::WIN, "WIN" ; "win")]
    fn test_display_and_parse(mve: Move, want: &str) -> TestResult {
        assert_eq!(mve.to_string(), want);
        assert_eq!(want.parse::<Move>()?, mve);
        Ok(())
    }

    #[test_case(Move::new(SQ77, SQ76), "7g -> 7f" ; "board move")]
    #[test_case(Move::with_promotion(SQ88, SQ22), "8h -> 2b (+)" ; "promotion")]
    #[test_case(Move::new_drop(PieceType::Gold, SQ52), "G * 5b" ; "drop")]
    fn test_debug(mve: Move, want: &str) {
        assert_eq!(format!("{:?}", mve), want);
    }

    #[test_case("7g7" ; "short")]
    #[test_case("7g7f=" ; "bad suffix")]
    #[test_case("7g7g" ; "same square")]
    #[test_case("K*5e" ; "king drop")]
    #[test_case("+P*5e" ; "promoted drop")]
    #[test_case("P*5" ; "bad drop square")]
    #[test_case("x7g7f" ; "garbage")]
    fn test_parse_err(s: &str) {
        assert!(s.parse::<Move>().is_err());
    }

    #[test]
    #[should_panic]
    fn test_src_of_drop_panics() {
        Move::new_drop(PieceType::Pawn, SQ55).src();
    }

    #[test]
    #[should_panic]
    fn test_piece_type_of_board_move_panics() {
        Move::new(SQ77, SQ76).drop_piece_type();
    }
}
