use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

use crate::piece::Side;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("square: want <file 1-9><rank a-i>, got {0}")]
    Invalid(String),
}

#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, FromRepr, Display, Deserialize, Serialize,
)]
pub enum File {
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "6")]
    Six,
    #[strum(serialize = "7")]
    Seven,
    #[strum(serialize = "8")]
    Eight,
    #[strum(serialize = "9")]
    Nine,
}

impl File {
    pub const NUM: usize = 9;

    pub const fn from_u8(idx: u8) -> File {
        match File::from_repr(idx) {
            Some(file) => file,
            None => panic!("file out of bounds"),
        }
    }
}

#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, FromRepr, Display, Deserialize, Serialize,
)]
pub enum Rank {
    #[strum(serialize = "a")]
    One,
    #[strum(serialize = "b")]
    Two,
    #[strum(serialize = "c")]
    Three,
    #[strum(serialize = "d")]
    Four,
    #[strum(serialize = "e")]
    Five,
    #[strum(serialize = "f")]
    Six,
    #[strum(serialize = "g")]
    Seven,
    #[strum(serialize = "h")]
    Eight,
    #[strum(serialize = "i")]
    Nine,
}

impl Rank {
    pub const NUM: usize = 9;

    pub const fn from_u8(idx: u8) -> Rank {
        match Rank::from_repr(idx) {
            Some(rank) => rank,
            None => panic!("rank out of bounds"),
        }
    }

    /// The rank as seen by `side`, so that `Rank::One` is always the far edge of the board.
    pub const fn relative_to(self, side: Side) -> Rank {
        match side {
            Side::Black => self,
            Side::White => Rank::from_u8(8 - self as u8),
        }
    }

    pub const fn in_promotion_zone(self, side: Side) -> bool {
        (self.relative_to(side) as u8) <= Rank::Three as u8
    }
}

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, Deserialize, Serialize)]
pub enum Square {
    SQ11, SQ12, SQ13, SQ14, SQ15, SQ16, SQ17, SQ18, SQ19,
    SQ21, SQ22, SQ23, SQ24, SQ25, SQ26, SQ27, SQ28, SQ29,
    SQ31, SQ32, SQ33, SQ34, SQ35, SQ36, SQ37, SQ38, SQ39,
    SQ41, SQ42, SQ43, SQ44, SQ45, SQ46, SQ47, SQ48, SQ49,
    SQ51, SQ52, SQ53, SQ54, SQ55, SQ56, SQ57, SQ58, SQ59,
    SQ61, SQ62, SQ63, SQ64, SQ65, SQ66, SQ67, SQ68, SQ69,
    SQ71, SQ72, SQ73, SQ74, SQ75, SQ76, SQ77, SQ78, SQ79,
    SQ81, SQ82, SQ83, SQ84, SQ85, SQ86, SQ87, SQ88, SQ89,
    SQ91, SQ92, SQ93, SQ94, SQ95, SQ96, SQ97, SQ98, SQ99,
}

impl Square {
    pub const NUM: usize = 81;

    pub const fn new(file: File, rank: Rank) -> Square {
        Square::from_u8(file as u8 * Rank::NUM as u8 + rank as u8)
    }

    pub const fn from_u8(idx: u8) -> Square {
        match Square::from_repr(idx) {
            Some(sq) => sq,
            None => panic!("square out of bounds"),
        }
    }

    pub const fn file(self) -> File {
        File::from_u8(self as u8 / Rank::NUM as u8)
    }

    pub const fn rank(self) -> Rank {
        Rank::from_u8(self as u8 % Rank::NUM as u8)
    }

    /// The square one step away in `dir`. A step that would wrap around a board edge returns
    /// `None`.
    pub const fn next(self, dir: Direction) -> Option<Square> {
        let to = self as i8 + dir as i8;
        if to < 0 || to >= Square::NUM as i8 {
            return None;
        }
        let to = Square::from_u8(to as u8);

        let file_dist = (self.file() as u8).abs_diff(to.file() as u8);
        let rank_dist = (self.rank() as u8).abs_diff(to.rank() as u8);
        if file_dist > 2 || rank_dist > 2 {
            None
        } else {
            Some(to)
        }
    }

    pub const fn in_promotion_zone(self, side: Side) -> bool {
        self.rank().in_promotion_zone(side)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::Invalid(s.to_string()));
        };

        let file = File::from_str(&file.to_string())
            .map_err(|_| SquareParseError::Invalid(s.to_string()))?;
        let rank = Rank::from_str(&rank.to_string())
            .map_err(|_| SquareParseError::Invalid(s.to_string()))?;

        Ok(Square::new(file, rank))
    }
}

/// One-step offsets in square ordinals, as seen from Black. North points at rank one.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    N = -1,
    E = -9,
    S = 1,
    W = 9,
    NE = -10,
    SE = -8,
    SW = 10,
    NW = 8,
    NNE = -11,
    SSE = -7,
    SSW = 11,
    NNW = 7,
}
