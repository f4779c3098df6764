use crate::bitboard::BitBoard;
use crate::piece::Side;
use crate::square::{File, Rank};

pub(crate) const FILE_MASKS: [BitBoard; File::NUM] = calc_file_masks();
pub(crate) const RANK_MASKS: [BitBoard; Rank::NUM] = calc_rank_masks();

/// `FORWARD_RANKS[side][rank]` holds every rank strictly ahead of `rank` in the direction
/// `side` moves.
pub(crate) const FORWARD_RANKS: [[BitBoard; Rank::NUM]; Side::NUM] = calc_forward_ranks();

const fn calc_file_masks() -> [BitBoard; File::NUM] {
    let mut masks = [BitBoard::empty(); File::NUM];
    let mut idx = 0;
    while idx < File::NUM {
        masks[idx] = BitBoard::from_file(File::from_u8(idx as u8));
        idx += 1;
    }
    masks
}

const fn calc_rank_masks() -> [BitBoard; Rank::NUM] {
    let mut masks = [BitBoard::empty(); Rank::NUM];
    let mut idx = 0;
    while idx < Rank::NUM {
        masks[idx] = BitBoard::from_rank(Rank::from_u8(idx as u8));
        idx += 1;
    }
    masks
}

const fn calc_forward_ranks() -> [[BitBoard; Rank::NUM]; Side::NUM] {
    let mut forward = [[BitBoard::empty(); Rank::NUM]; Side::NUM];

    let mut rank = 1;
    while rank < Rank::NUM {
        forward[Side::Black as usize][rank] =
            forward[Side::Black as usize][rank - 1].const_bit_or(BitBoard::from_rank(Rank::from_u8(rank as u8 - 1)));
        rank += 1;
    }

    let mut rank = Rank::NUM - 1;
    while rank > 0 {
        forward[Side::White as usize][rank - 1] =
            forward[Side::White as usize][rank].const_bit_or(BitBoard::from_rank(Rank::from_u8(rank as u8)));
        rank -= 1;
    }

    forward
}

pub(crate) const fn forward_ranks(side: Side, rank: Rank) -> BitBoard {
    FORWARD_RANKS[side as usize][rank as usize]
}
