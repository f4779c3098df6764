use log::debug;
use strum::IntoEnumIterator;

use super::{Position, START_SFEN, STARTPOS};
use crate::hand::Hand;
use crate::move_gen;
use crate::piece::{Piece, PieceType, Side};
use crate::square::{File, Rank, Square};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SfenParseError {
    #[error("num fields: want 4 got {0}")]
    NumFields(usize),

    #[error("num ranks: want 9 got {0}")]
    NumRanks(usize),

    #[error("piece: got {0}")]
    InvalidPiece(String),

    #[error("num files: want 9 in rank {0}")]
    NumFiles(String),

    #[error("side to move: want 'b'|'w' got {0}")]
    SideToMove(String),

    #[error("hand: got {0}")]
    Hand(String),

    #[error("move number: want a positive integer got {0}")]
    MoveNumber(String),

    #[error("{0} king: want exactly one got none")]
    MissingKing(Side),

    #[error("{0} king: want exactly one got {1}")]
    ExtraKing(Side, u32),
}

impl Position {
    /// Parses `<board> <side> <hands> <move number>`, or the alias `startpos`.
    pub fn from_sfen(sfen: &str) -> Result<Self, SfenParseError> {
        move_gen::init();

        let sfen = if sfen == STARTPOS { START_SFEN } else { sfen };
        let fields = sfen.split(' ').collect::<Vec<&str>>();

        if fields.len() != 4 {
            Err(SfenParseError::NumFields(fields.len()))?
        }

        let mut position = Position::empty();

        place_pieces(&mut position, fields[0])?;

        let side_to_move = fields[1]
            .parse::<Side>()
            .map_err(|_| SfenParseError::SideToMove(fields[1].to_string()))?;

        fill_hands(&mut position, fields[2])?;

        let move_number = fields[3]
            .parse::<u32>()
            .map_err(|_| SfenParseError::MoveNumber(fields[3].to_string()))?;
        if move_number == 0 {
            Err(SfenParseError::MoveNumber(fields[3].to_string()))?
        }

        for side in Side::iter() {
            match position.piece_bitboard(Piece::new(side, PieceType::King)).num_squares_set() {
                0 => Err(SfenParseError::MissingKing(side))?,
                1 => {}
                n => Err(SfenParseError::ExtraKing(side, n))?,
            }
        }

        position.finish_setup(side_to_move, move_number - 1);
        debug!("parsed sfen {}", sfen);

        Ok(position)
    }

    pub fn to_sfen(&self) -> String {
        let mut ranks = Vec::with_capacity(Rank::NUM);

        for rank in Rank::iter() {
            let mut rank_str = String::new();
            let mut empty = 0;
            for file in File::iter().rev() {
                let piece = self.piece_at_file_rank(file, rank);
                if piece.is_empty() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    rank_str.push_str(&empty.to_string());
                    empty = 0;
                }
                rank_str.push_str(&piece.to_string());
            }
            if empty > 0 {
                rank_str.push_str(&empty.to_string());
            }
            ranks.push(rank_str);
        }

        let black_hand = self.hand(Side::Black);
        let white_hand = self.hand(Side::White);
        let hands = if black_hand.is_empty() && white_hand.is_empty() {
            String::from("-")
        } else {
            format!("{}{}", black_hand, white_hand.to_string().to_lowercase())
        };

        format!(
            "{} {} {} {}",
            ranks.join("/"),
            self.side_to_move,
            hands,
            self.ply() + 1
        )
    }
}

/// Ranks run from a to i, each listing files 9 to 1. Every digit stands for that many empty
/// squares on its own.
fn place_pieces(position: &mut Position, board: &str) -> Result<(), SfenParseError> {
    let ranks = board.split('/').collect::<Vec<&str>>();
    if ranks.len() != Rank::NUM {
        Err(SfenParseError::NumRanks(ranks.len()))?
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = Rank::from_u8(rank_idx as u8);
        let num_files_err = || SfenParseError::NumFiles(rank_str.to_string());

        let mut files_seen = 0;
        let mut chars = rank_str.chars();
        while let Some(ch) = chars.next() {
            if let Some(num_empty) = ch.to_digit(10) {
                if num_empty == 0 {
                    Err(SfenParseError::InvalidPiece(ch.to_string()))?
                }
                files_seen += num_empty as usize;
                continue;
            }

            let token = if ch == '+' {
                match chars.next() {
                    Some(letter) => format!("+{}", letter),
                    None => Err(SfenParseError::InvalidPiece(ch.to_string()))?,
                }
            } else {
                ch.to_string()
            };
            let piece = token
                .parse::<Piece>()
                .map_err(|_| SfenParseError::InvalidPiece(token.clone()))?;

            if files_seen >= File::NUM {
                Err(num_files_err())?
            }
            let file = File::from_u8((File::NUM - 1 - files_seen) as u8);
            position.put_piece(Square::new(file, rank), piece);
            files_seen += 1;
        }

        if files_seen != File::NUM {
            Err(num_files_err())?
        }
    }

    Ok(())
}

/// `-`, or counts and letters such as `RB2G17Pp`. Uppercase letters go to Black.
fn fill_hands(position: &mut Position, hands: &str) -> Result<(), SfenParseError> {
    if hands == "-" {
        return Ok(());
    }
    let hand_err = || SfenParseError::Hand(hands.to_string());
    if hands.is_empty() {
        Err(hand_err())?
    }

    let mut count: Option<u32> = None;
    for ch in hands.chars() {
        if let Some(digit) = ch.to_digit(10) {
            count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            continue;
        }

        let num = count.take().unwrap_or(1);
        let piece = ch.to_string().parse::<Piece>().map_err(|_| hand_err())?;
        let (Some(side), Some(piece_type)) = (piece.side(), piece.piece_type()) else {
            return Err(hand_err());
        };

        if piece_type == PieceType::King
            || piece_type.is_promoted()
            || num == 0
            || position.num_in_hand(side, piece_type).saturating_add(num) > Hand::max_count(piece_type)
        {
            Err(hand_err())?
        }

        for _ in 0..num {
            position.add_to_hand(side, piece_type);
        }
    }

    // A count with no letter after it.
    if count.is_some() {
        Err(hand_err())?
    }

    Ok(())
}
