use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

use crate::square::Direction::{self, *};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PieceParseError {
    #[error("piece: want one of P L N S B R G K, optionally prefixed by '+', got {0}")]
    Invalid(String),
}

#[repr(u8)]
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, Clone, Copy, Display, Deserialize, Serialize,
)]
pub enum Side {
    #[strum(serialize = "b")]
    Black,
    #[strum(serialize = "w")]
    White,
}

impl Side {
    pub const NUM: usize = 2;

    pub const fn opposite_side(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

const PROMOTION_OFFSET: u8 = 8;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, Deserialize, Serialize)]
pub enum PieceType {
    Pawn = 1,
    Lance,
    Knight,
    Silver,
    Bishop,
    Rook,
    Gold,
    King,
    ProPawn,
    ProLance,
    ProKnight,
    ProSilver,
    Horse,
    Dragon,
}

impl PieceType {
    pub const NUM: usize = 14;

    /// Types that can sit in a hand, in the order SFEN lists them.
    pub const HAND_TYPES: [PieceType; 7] = [
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Gold,
        PieceType::Silver,
        PieceType::Knight,
        PieceType::Lance,
        PieceType::Pawn,
    ];

    pub const fn from_u8(idx: u8) -> PieceType {
        match PieceType::from_repr(idx) {
            Some(pt) => pt,
            None => panic!("piece type out of bounds"),
        }
    }

    pub const fn can_promote(self) -> bool {
        self as u8 <= PieceType::Rook as u8
    }

    pub const fn is_promoted(self) -> bool {
        self as u8 > PieceType::King as u8
    }

    pub const fn promoted(self) -> PieceType {
        assert!(self.can_promote(), "piece type can't promote");
        PieceType::from_u8(self as u8 + PROMOTION_OFFSET)
    }

    pub const fn raw_type(self) -> PieceType {
        if self.is_promoted() {
            PieceType::from_u8(self as u8 - PROMOTION_OFFSET)
        } else {
            self
        }
    }

    const fn usi(self) -> &'static str {
        match self {
            PieceType::Pawn => "P",
            PieceType::Lance => "L",
            PieceType::Knight => "N",
            PieceType::Silver => "S",
            PieceType::Bishop => "B",
            PieceType::Rook => "R",
            PieceType::Gold => "G",
            PieceType::King => "K",
            PieceType::ProPawn => "+P",
            PieceType::ProLance => "+L",
            PieceType::ProKnight => "+N",
            PieceType::ProSilver => "+S",
            PieceType::Horse => "+B",
            PieceType::Dragon => "+R",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.usi())
    }
}

impl FromStr for PieceType {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (promoted, letter) = match s.strip_prefix('+') {
            Some(letter) => (true, letter),
            None => (false, s),
        };

        let raw = match letter {
            "P" => PieceType::Pawn,
            "L" => PieceType::Lance,
            "N" => PieceType::Knight,
            "S" => PieceType::Silver,
            "B" => PieceType::Bishop,
            "R" => PieceType::Rook,
            "G" => PieceType::Gold,
            "K" if !promoted => PieceType::King,
            // Some writers spell a promoted knight "+K".
            "K" => return Ok(PieceType::ProKnight),
            _ => return Err(PieceParseError::Invalid(s.to_string())),
        };

        match (promoted, raw.can_promote()) {
            (false, _) => Ok(raw),
            (true, true) => Ok(raw.promoted()),
            (true, false) => Err(PieceParseError::Invalid(s.to_string())),
        }
    }
}

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, Deserialize, Serialize)]
pub enum Piece {
    Empty,
    BPawn, BLance, BKnight, BSilver, BBishop, BRook, BGold, BKing,
    BProPawn, BProLance, BProKnight, BProSilver, BHorse, BDragon,
    WPawn, WLance, WKnight, WSilver, WBishop, WRook, WGold, WKing,
    WProPawn, WProLance, WProKnight, WProSilver, WHorse, WDragon,
}

const GOLD_STEPS: &[Direction] = &[N, NE, E, S, W, NW];
const W_GOLD_STEPS: &[Direction] = &[N, E, SE, S, SW, W];
const KING_STEPS: &[Direction] = &[N, NE, E, SE, S, SW, W, NW];
const DIAGONALS: &[Direction] = &[NE, SE, SW, NW];
const ORTHOGONALS: &[Direction] = &[N, E, S, W];

#[rustfmt::skip]
const STEP_DIRECTIONS: [&[Direction]; Piece::NUM] = [
    &[],
    // Black
    &[N], &[], &[NNE, NNW], &[N, NE, SE, SW, NW], &[], &[], GOLD_STEPS, KING_STEPS,
    GOLD_STEPS, GOLD_STEPS, GOLD_STEPS, GOLD_STEPS, ORTHOGONALS, DIAGONALS,
    // White
    &[S], &[], &[SSE, SSW], &[NE, SE, S, SW, NW], &[], &[], W_GOLD_STEPS, KING_STEPS,
    W_GOLD_STEPS, W_GOLD_STEPS, W_GOLD_STEPS, W_GOLD_STEPS, ORTHOGONALS, DIAGONALS,
];

#[rustfmt::skip]
const SLIDE_DIRECTIONS: [&[Direction]; Piece::NUM] = [
    &[],
    // Black
    &[], &[N], &[], &[], DIAGONALS, ORTHOGONALS, &[], &[],
    &[], &[], &[], &[], DIAGONALS, ORTHOGONALS,
    // White
    &[], &[S], &[], &[], DIAGONALS, ORTHOGONALS, &[], &[],
    &[], &[], &[], &[], DIAGONALS, ORTHOGONALS,
];

impl Piece {
    pub const NUM: usize = 1 + PieceType::NUM * Side::NUM;

    pub const fn new(side: Side, piece_type: PieceType) -> Piece {
        Piece::from_u8(piece_type as u8 + side as u8 * PieceType::NUM as u8)
    }

    pub const fn from_u8(idx: u8) -> Piece {
        match Piece::from_repr(idx) {
            Some(piece) => piece,
            None => panic!("piece out of bounds"),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Piece::Empty)
    }

    pub const fn side(self) -> Option<Side> {
        match self as u8 {
            0 => None,
            idx if idx <= PieceType::NUM as u8 => Some(Side::Black),
            _ => Some(Side::White),
        }
    }

    pub const fn piece_type(self) -> Option<PieceType> {
        match self {
            Piece::Empty => None,
            _ => Some(PieceType::from_u8((self as u8 - 1) % PieceType::NUM as u8 + 1)),
        }
    }

    pub const fn is_promoted(self) -> bool {
        match self.piece_type() {
            Some(pt) => pt.is_promoted(),
            None => false,
        }
    }

    pub const fn promoted(self) -> Piece {
        match self.piece_type() {
            Some(pt) if pt.can_promote() => Piece::from_u8(self as u8 + PROMOTION_OFFSET),
            _ => panic!("piece can't promote"),
        }
    }

    pub const fn demoted(self) -> Piece {
        assert!(self.is_promoted(), "piece isn't promoted");
        Piece::from_u8(self as u8 - PROMOTION_OFFSET)
    }

    pub const fn step_directions(self) -> &'static [Direction] {
        STEP_DIRECTIONS[self as usize]
    }

    pub const fn slide_directions(self) -> &'static [Direction] {
        SLIDE_DIRECTIONS[self as usize]
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.side(), self.piece_type()) {
            (Some(Side::Black), Some(pt)) => write!(f, "{}", pt),
            (Some(Side::White), Some(pt)) => write!(f, "{}", pt.usi().to_ascii_lowercase()),
            _ => write!(f, "."),
        }
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letter = s
            .chars()
            .last()
            .ok_or_else(|| PieceParseError::Invalid(s.to_string()))?;
        let side = if letter.is_ascii_uppercase() {
            Side::Black
        } else {
            Side::White
        };

        let piece_type = s
            .to_ascii_uppercase()
            .parse::<PieceType>()
            .map_err(|_| PieceParseError::Invalid(s.to_string()))?;

        Ok(Piece::new(side, piece_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_piece_layout() {
        assert_eq!(Piece::iter().count(), Piece::NUM);
        assert_eq!(Piece::new(Side::Black, PieceType::Pawn), Piece::BPawn);
        assert_eq!(Piece::new(Side::Black, PieceType::Dragon), Piece::BDragon);
        assert_eq!(Piece::new(Side::White, PieceType::Pawn), Piece::WPawn);
        assert_eq!(Piece::new(Side::White, PieceType::King), Piece::WKing);
        assert_eq!(Piece::new(Side::White, PieceType::Dragon), Piece::WDragon);
    }

    #[test]
    fn test_piece_round_trips_side_and_type() {
        for side in Side::iter() {
            for pt in PieceType::iter() {
                let piece = Piece::new(side, pt);
                assert_eq!(piece.side(), Some(side));
                assert_eq!(piece.piece_type(), Some(pt));
            }
        }
        assert_eq!(Piece::Empty.side(), None);
        assert_eq!(Piece::Empty.piece_type(), None);
    }

    #[test_case(Piece::BPawn, Piece::BProPawn)]
    #[test_case(Piece::BKnight, Piece::BProKnight)]
    #[test_case(Piece::BBishop, Piece::BHorse)]
    #[test_case(Piece::WRook, Piece::WDragon)]
    #[test_case(Piece::WSilver, Piece::WProSilver)]
    fn test_promote_demote(piece: Piece, want: Piece) {
        assert_eq!(piece.promoted(), want);
        assert_eq!(want.demoted(), piece);
        assert!(want.is_promoted());
        assert!(!piece.is_promoted());
    }

    #[test]
    #[should_panic]
    fn test_promote_gold_panics() {
        Piece::BGold.promoted();
    }

    #[test]
    fn test_raw_type() {
        assert_eq!(PieceType::Horse.raw_type(), PieceType::Bishop);
        assert_eq!(PieceType::ProLance.raw_type(), PieceType::Lance);
        assert_eq!(PieceType::Gold.raw_type(), PieceType::Gold);
        assert_eq!(PieceType::King.raw_type(), PieceType::King);
    }

    #[test_case(Piece::BPawn, "P")]
    #[test_case(Piece::WPawn, "p")]
    #[test_case(Piece::BHorse, "+B")]
    #[test_case(Piece::WProKnight, "+n")]
    #[test_case(Piece::WKing, "k")]
    fn test_display_and_parse(piece: Piece, want: &str) -> TestResult {
        assert_eq!(piece.to_string(), want);
        assert_eq!(want.parse::<Piece>()?, piece);
        Ok(())
    }

    #[test_case("+K", Piece::BProKnight)]
    #[test_case("+k", Piece::WProKnight)]
    fn test_parse_promoted_knight_alias(s: &str, want: Piece) -> TestResult {
        assert_eq!(s.parse::<Piece>()?, want);
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("X" ; "unknown letter")]
    #[test_case("+G" ; "promoted gold")]
    #[test_case("++P" ; "double plus")]
    #[test_case("PP" ; "two letters")]
    fn test_parse_err(s: &str) {
        assert!(s.parse::<Piece>().is_err());
    }

    #[test]
    fn test_white_directions_mirror_black() {
        for pt in PieceType::iter() {
            let black = Piece::new(Side::Black, pt);
            let white = Piece::new(Side::White, pt);
            let mirror = |dirs: &[Direction]| {
                let mut deltas: Vec<i8> = dirs.iter().map(|&d| -(d as i8)).collect();
                deltas.sort();
                deltas
            };
            let sorted = |dirs: &[Direction]| {
                let mut deltas: Vec<i8> = dirs.iter().map(|&d| d as i8).collect();
                deltas.sort();
                deltas
            };
            assert_eq!(mirror(black.step_directions()), sorted(white.step_directions()), "{:?}", pt);
            assert_eq!(mirror(black.slide_directions()), sorted(white.slide_directions()), "{:?}", pt);
        }
    }
}
