use std::sync::LazyLock;

use log::debug;
use strum::IntoEnumIterator;

use crate::bitboard::BitBoard;
use crate::piece::{Piece, Side};
use crate::square::{File, Rank, Square};

use super::masks::{forward_ranks, FILE_MASKS, RANK_MASKS};
use super::step_attacks::{bishop_step_attacks, rook_step_attacks};

const BISHOP_TABLE_LEN: usize = 20_224;
const ROOK_TABLE_LEN: usize = 512_000;

#[rustfmt::skip]
const BISHOP_SHIFTS: [u32; Square::NUM] = [
    57, 58, 58, 58, 58, 58, 58, 58, 57,
    58, 58, 58, 58, 58, 58, 58, 58, 58,
    58, 58, 56, 56, 56, 56, 56, 58, 58,
    58, 58, 56, 54, 54, 54, 56, 58, 58,
    58, 58, 56, 54, 52, 54, 56, 58, 58,
    58, 58, 56, 54, 54, 54, 56, 58, 58,
    58, 58, 56, 56, 56, 56, 56, 58, 58,
    58, 58, 58, 58, 58, 58, 58, 58, 58,
    57, 58, 58, 58, 58, 58, 58, 58, 57,
];

#[rustfmt::skip]
const ROOK_SHIFTS: [u32; Square::NUM] = [
    50, 51, 51, 51, 51, 51, 51, 51, 50,
    51, 52, 52, 52, 52, 52, 52, 52, 50,
    51, 52, 52, 52, 52, 52, 52, 52, 51,
    51, 52, 52, 52, 52, 52, 52, 52, 51,
    51, 52, 52, 52, 52, 52, 52, 52, 51,
    51, 52, 52, 52, 52, 52, 52, 52, 50,
    51, 52, 52, 52, 52, 52, 52, 52, 51,
    51, 52, 52, 52, 52, 52, 52, 52, 51,
    50, 51, 51, 51, 51, 51, 51, 51, 50,
];

#[rustfmt::skip]
const BISHOP_MAGICS: [u64; Square::NUM] = [
    0x20101042c8200428, 0x0000840240380102, 0x800800c018108251,
    0x0082428010301000, 0x0481008201000040, 0x8081020420880800,
    0x0000804222110000, 0x0000e28301400850, 0x2010221420800810,
    0x2600010028801824, 0x0008048102102002, 0x4000248100240402,
    0x49200200428a2108, 0x0000460904020844, 0x2001401020830200,
    0x0000001009008120, 0x4804064008208004, 0x4406000240300ca0,
    0x0222001400803220, 0x0226068400182094, 0x95208402010d0104,
    0x4000807500108102, 0xc000200080500500, 0x5211000304038020,
    0x1108100180400820, 0x10001280a8a21040, 0x100004809408a210,
    0x0202300002041112, 0x04040a8000460408, 0x0204020021040201,
    0x0008120013180404, 0xa28400800d020104, 0x200c201000604080,
    0x1082004000109408, 0x100021c00c410408, 0x880820905004c801,
    0x1054064080004120, 0x030c0a0224001030, 0x0300060100040821,
    0x051200801020c006, 0x2100040042802801, 0x0481000820401002,
    0x40408a0450000801, 0x00810104200000a2, 0x0281102102108408,
    0x0804020040280021, 0x2420401200220040, 0x080010144080c402,
    0x0080104400800002, 0x1009048080400081, 0x100082000201008c,
    0x0010001008080009, 0x02a5006b80080004, 0xc6288018200c2884,
    0x108100104200a000, 0x0141002030814048, 0x0200204080010808,
    0x0200004013922002, 0x2200000020050815, 0x2011010400040800,
    0x1020040004220200, 0x0944020104840081, 0x6080a080801c044a,
    0x2088400811008020, 0x000c40aa04208070, 0x4100800440900220,
    0x0000000048112050, 0x818200d062012a10, 0x0402008404508302,
    0x0000100020101002, 0x0020040420504912, 0x0002004008118814,
    0x1000810650084024, 0x1002a03002408804, 0x2104294801181420,
    0x0841080240500812, 0x4406009000004884, 0x0080082004012412,
    0x0080090880808183, 0x0300120020400410, 0x021a090100822002,
];

#[rustfmt::skip]
const ROOK_MAGICS: [u64; Square::NUM] = [
    0x0140000400809300, 0x1320000902000240, 0x008001910c008180,
    0x0040020004401040, 0x0040010000d01120, 0x0080048020084050,
    0x0040004000080228, 0x00400440000a2a0a, 0x0040003101010102,
    0x80c4200012108100, 0x4010c00204000c01, 0x0220400103250002,
    0x0002600200004001, 0x0040200052400020, 0x0c00100020020008,
    0x9080201000200004, 0x2200201000080004, 0x80804c0020200191,
    0x0045383000009100, 0x0030002800020040, 0x0040104000988084,
    0x0108001000800415, 0x0014005000400009, 0x0d21001001c00045,
    0x00c0003000200024, 0x0040003000280004, 0x0040021000091102,
    0x2008a20408000d00, 0x2000100084010040, 0x0144080008008001,
    0x50102400100026a2, 0x1040020008001010, 0x1200200028005010,
    0x4280030030020898, 0x0480081410011004, 0x034000040800110a,
    0x00101000010c0021, 0x0009210800080082, 0x06100002000400a7,
    0xa2240800900800c0, 0x9220082001000801, 0x1040008001140030,
    0x0040002220040008, 0x028000124008010c, 0x0040008404940002,
    0x0040040800010200, 0x0090000809002100, 0x2800080001000201,
    0x1400020001000201, 0x0180081014018004, 0x1100008000400201,
    0x0080004000200201, 0x0420800010000201, 0x2841c00080200209,
    0x0120002401040001, 0x014510000101000b, 0x0040080000808001,
    0x0834000188048001, 0x4001210000800205, 0x04889a8007400201,
    0x2080044080200062, 0x0080004002861002, 0x0000c00842049024,
    0x8040000202020011, 0x00400404002c0100, 0x2080028202000102,
    0x8100040800590224, 0x2040009004800010, 0x0040045000400408,
    0x2200240020802008, 0x4080042002200204, 0x004000b0000a00a2,
    0x000a600000810100, 0x001410000d001180, 0x0002200101001080,
    0x100020014104e120, 0x2407200100004810, 0x80144000a0845050,
    0x1000200060030c18, 0x4004200020010102, 0x0140600021010302,
];

/// Magic-indexed slide attacks for one slider. Each square owns a contiguous slice of `attacks`
/// starting at its offset.
struct MagicTable {
    masks: [BitBoard; Square::NUM],
    offsets: [usize; Square::NUM],
    magics: &'static [u64; Square::NUM],
    shifts: &'static [u32; Square::NUM],
    attacks: Vec<BitBoard>,
}

impl MagicTable {
    fn new(
        slider: Piece,
        relevance_mask: fn(Square) -> BitBoard,
        magics: &'static [u64; Square::NUM],
        shifts: &'static [u32; Square::NUM],
        len: usize,
    ) -> Self {
        let mut masks = [BitBoard::empty(); Square::NUM];
        let mut offsets = [0; Square::NUM];
        let mut attacks = vec![BitBoard::empty(); len];

        let mut offset = 0;
        for sq in Square::iter() {
            let idx = sq as usize;
            let mask = relevance_mask(sq);
            masks[idx] = mask;
            offsets[idx] = offset;

            let mask_squares: Vec<Square> = mask.into_iter().collect();
            for subset in 0..1_usize << mask_squares.len() {
                let occupancy = occupancy_from_subset(&mask_squares, subset);
                let attack_idx = offset + magic_index(occupancy, magics[idx], shifts[idx]);
                attacks[attack_idx] = sliding_attacks(slider, sq, occupancy);
            }

            offset += 1 << (64 - shifts[idx]);
        }
        debug_assert_eq!(offset, len, "magic table size mismatch");

        MagicTable {
            masks,
            offsets,
            magics,
            shifts,
            attacks,
        }
    }

    fn get(&self, square: Square, occupied: BitBoard) -> BitBoard {
        let idx = square as usize;
        let occupancy = occupied & self.masks[idx];
        self.attacks[self.offsets[idx] + magic_index(occupancy, self.magics[idx], self.shifts[idx])]
    }
}

struct SlidingAttacks {
    bishop: MagicTable,
    rook: MagicTable,
}

impl SlidingAttacks {
    fn new() -> Self {
        let bishop = MagicTable::new(
            Piece::BBishop,
            bishop_relevance_mask,
            &BISHOP_MAGICS,
            &BISHOP_SHIFTS,
            BISHOP_TABLE_LEN,
        );
        let rook = MagicTable::new(
            Piece::BRook,
            rook_relevance_mask,
            &ROOK_MAGICS,
            &ROOK_SHIFTS,
            ROOK_TABLE_LEN,
        );
        debug!(
            "built slide attack tables: {} bishop entries, {} rook entries",
            bishop.attacks.len(),
            rook.attacks.len()
        );

        SlidingAttacks { bishop, rook }
    }
}

static SLIDING_ATTACKS: LazyLock<SlidingAttacks> = LazyLock::new(SlidingAttacks::new);

/// Builds the slide attack tables if they haven't been built yet. Later calls are no-ops.
pub fn init() {
    LazyLock::force(&SLIDING_ATTACKS);
}

pub fn bishop_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    SLIDING_ATTACKS.bishop.get(square, occupied)
}

pub fn rook_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    SLIDING_ATTACKS.rook.get(square, occupied)
}

/// A lance slides like a rook but only towards the far edge.
pub fn lance_attacks(side: Side, square: Square, occupied: BitBoard) -> BitBoard {
    rook_attacks(square, occupied) & forward_ranks(side, square.rank())
}

pub fn horse_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    bishop_attacks(square, occupied) | rook_step_attacks(square)
}

pub fn dragon_attacks(square: Square, occupied: BitBoard) -> BitBoard {
    rook_attacks(square, occupied) | bishop_step_attacks(square)
}

fn magic_index(occupancy: BitBoard, magic: u64, shift: u32) -> usize {
    (occupancy.merge().wrapping_mul(magic) >> shift) as usize
}

/// Bit `i` of `subset` selects the `i`th lowest square of the mask.
fn occupancy_from_subset(mask_squares: &[Square], subset: usize) -> BitBoard {
    mask_squares
        .iter()
        .enumerate()
        .filter(|(bit, _)| subset & (1 << bit) != 0)
        .fold(BitBoard::empty(), |occ, (_, &sq)| occ | BitBoard::from_square(sq))
}

fn sliding_attacks(slider: Piece, square: Square, occupied: BitBoard) -> BitBoard {
    let mut attacks = BitBoard::empty();

    for &dir in slider.slide_directions() {
        let mut curr = square;
        while let Some(next) = curr.next(dir) {
            attacks.set_square(next);
            if occupied.is_square_set(next) {
                break;
            }
            curr = next;
        }
    }

    attacks
}

const EDGES: [(File, Rank); 2] = [(File::One, Rank::One), (File::Nine, Rank::Nine)];

fn bishop_relevance_mask(square: Square) -> BitBoard {
    let (file, rank) = (square.file() as u8, square.rank() as u8);

    let mut mask = Square::iter()
        .filter(|sq| (sq.file() as u8).abs_diff(file) == (sq.rank() as u8).abs_diff(rank))
        .fold(BitBoard::empty(), |mask, sq| mask | BitBoard::from_square(sq));

    for (edge_file, edge_rank) in EDGES {
        mask.and_not_assign(FILE_MASKS[edge_file as usize] | RANK_MASKS[edge_rank as usize]);
    }
    mask.and_not(BitBoard::from_square(square))
}

fn rook_relevance_mask(square: Square) -> BitBoard {
    let (file, rank) = (square.file(), square.rank());

    let mut mask = FILE_MASKS[file as usize] | RANK_MASKS[rank as usize];
    for (edge_file, edge_rank) in EDGES {
        if file != edge_file {
            mask.and_not_assign(FILE_MASKS[edge_file as usize]);
        }
        if rank != edge_rank {
            mask.and_not_assign(RANK_MASKS[edge_rank as usize]);
        }
    }
    mask.and_not(BitBoard::from_square(square))
}
