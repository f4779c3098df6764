use arrayvec::ArrayVec;

use super::magic_bitboard::{bishop_attacks, dragon_attacks, horse_attacks, lance_attacks, rook_attacks};
use super::masks::{forward_ranks, FILE_MASKS, RANK_MASKS};
use super::step_attacks::{gold_attacks, king_attacks, knight_attacks, silver_attacks};
use crate::bitboard::BitBoard;
use crate::moves::{Move, MoveList};
use crate::piece::{Piece, PieceType, Side};
use crate::position::Position;
use crate::square::{Rank, Square};

const GOLD_GROUP: [PieceType; 5] = [
    PieceType::Gold,
    PieceType::ProPawn,
    PieceType::ProLance,
    PieceType::ProKnight,
    PieceType::ProSilver,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Promotion {
    /// Pawns and lances must promote on the last rank.
    ForcedOnLastRank,
    /// Knights must promote on the last two ranks and may only promote by landing in the zone.
    ForcedOnLastTwoRanks,
    Optional,
    Never,
}

pub(crate) fn gen_pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let side = position.side_to_move();
    let targets = !position.side_bitboard(side);

    gen_pawn_moves(position, side, targets, &mut moves);
    gen_stepper_moves(position, side, PieceType::Knight, targets, &mut moves);
    gen_stepper_moves(position, side, PieceType::Silver, targets, &mut moves);
    for piece_type in GOLD_GROUP {
        gen_stepper_moves(position, side, piece_type, targets, &mut moves);
    }
    gen_stepper_moves(position, side, PieceType::King, targets, &mut moves);
    for piece_type in [
        PieceType::Lance,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Horse,
        PieceType::Dragon,
    ] {
        gen_slider_moves(position, side, piece_type, targets, &mut moves);
    }

    gen_drop_moves(position, side, &mut moves);

    moves
}

fn gen_pawn_moves(position: &Position, side: Side, targets: BitBoard, moves: &mut MoveList) {
    let pawns = position.piece_bitboard(Piece::new(side, PieceType::Pawn));
    let dests = match side {
        Side::Black => pawns.shift_north(),
        Side::White => pawns.shift_south(),
    } & targets;

    for dest in dests {
        // A pawn sits one ordinal behind its destination.
        let src = match side {
            Side::Black => Square::from_u8(dest as u8 + 1),
            Side::White => Square::from_u8(dest as u8 - 1),
        };
        add_board_move(moves, side, src, dest, Promotion::ForcedOnLastRank);
    }
}

fn gen_stepper_moves(
    position: &Position,
    side: Side,
    piece_type: PieceType,
    targets: BitBoard,
    moves: &mut MoveList,
) {
    let mut pieces = position.piece_bitboard(Piece::new(side, piece_type));

    while !pieces.is_empty() {
        let src = pieces.pop_lsb();

        let (attacks, promotion) = match piece_type {
            PieceType::Knight => (knight_attacks(side, src), Promotion::ForcedOnLastTwoRanks),
            PieceType::Silver => (silver_attacks(side, src), Promotion::Optional),
            PieceType::King => (king_attacks(src), Promotion::Never),
            _ => (gold_attacks(side, src), Promotion::Never),
        };

        for dest in attacks & targets {
            add_board_move(moves, side, src, dest, promotion);
        }
    }
}

fn gen_slider_moves(
    position: &Position,
    side: Side,
    piece_type: PieceType,
    targets: BitBoard,
    moves: &mut MoveList,
) {
    let occupied = position.occupied();
    let mut pieces = position.piece_bitboard(Piece::new(side, piece_type));

    while !pieces.is_empty() {
        let src = pieces.pop_lsb();

        let (attacks, promotion) = match piece_type {
            PieceType::Lance => (lance_attacks(side, src, occupied), Promotion::ForcedOnLastRank),
            PieceType::Bishop => (bishop_attacks(src, occupied), Promotion::Optional),
            PieceType::Rook => (rook_attacks(src, occupied), Promotion::Optional),
            PieceType::Horse => (horse_attacks(src, occupied), Promotion::Never),
            _ => (dragon_attacks(src, occupied), Promotion::Never),
        };

        for dest in attacks & targets {
            add_board_move(moves, side, src, dest, promotion);
        }
    }
}

fn add_board_move(moves: &mut MoveList, side: Side, src: Square, dest: Square, promotion: Promotion) {
    let dest_rank = dest.rank().relative_to(side);
    let either_in_zone = src.in_promotion_zone(side) || dest.in_promotion_zone(side);

    let (forced, optional) = match promotion {
        Promotion::ForcedOnLastRank => (dest_rank == Rank::One, either_in_zone),
        Promotion::ForcedOnLastTwoRanks => (dest_rank <= Rank::Two, dest.in_promotion_zone(side)),
        Promotion::Optional => (false, either_in_zone),
        Promotion::Never => (false, false),
    };

    if forced {
        moves.push(Move::with_promotion(src, dest));
    } else {
        moves.push(Move::new(src, dest));
        if optional {
            moves.push(Move::with_promotion(src, dest));
        }
    }
}

fn gen_drop_moves(position: &Position, side: Side, moves: &mut MoveList) {
    let hand = position.hand(side);
    if hand.is_empty() {
        return;
    }

    let opp_side = side.opposite_side();
    let unoccupied = position.unoccupied();
    let last_rank = Rank::One.relative_to(side);
    let second_rank = Rank::Two.relative_to(side);

    if hand.exists(PieceType::Pawn) {
        let mut dests = unoccupied & forward_ranks(opp_side, last_rank);
        for pawn in position.piece_bitboard(Piece::new(side, PieceType::Pawn)) {
            dests.and_not_assign(FILE_MASKS[pawn.file() as usize]);
        }
        for dest in dests {
            moves.push(Move::new_drop(PieceType::Pawn, dest));
        }
    }

    if !hand.exists_except_pawn() {
        return;
    }

    // Lances and knights go last so the rank restrictions can cut them off the end.
    let mut droppable = ArrayVec::<PieceType, 6>::new();
    let mut num_knight = 0;
    let mut num_lance_knight = 0;
    for piece_type in [PieceType::Rook, PieceType::Bishop, PieceType::Gold, PieceType::Silver] {
        if hand.exists(piece_type) {
            droppable.push(piece_type);
        }
    }
    if hand.exists(PieceType::Lance) {
        droppable.push(PieceType::Lance);
        num_lance_knight += 1;
    }
    if hand.exists(PieceType::Knight) {
        droppable.push(PieceType::Knight);
        num_lance_knight += 1;
        num_knight += 1;
    }

    let rank_groups = [
        (unoccupied & RANK_MASKS[last_rank as usize], droppable.len() - num_lance_knight),
        (unoccupied & RANK_MASKS[second_rank as usize], droppable.len() - num_knight),
        (unoccupied & forward_ranks(opp_side, second_rank), droppable.len()),
    ];
    for (dests, num_droppable) in rank_groups {
        for dest in dests {
            for &piece_type in &droppable[..num_droppable] {
                moves.push(Move::new_drop(piece_type, dest));
            }
        }
    }
}
