pub mod all_pieces;
pub mod magic_bitboard;
mod masks;
pub mod step_attacks;
mod traits;

use crate::moves::{Move, MoveList};
use crate::piece::PieceType;
use crate::position::Position;

pub use self::magic_bitboard::init;
pub use self::traits::GenerateMoves;

#[derive(Clone, Copy, Debug, Default)]
pub struct MoveGen;

impl MoveGen {
    /// Plays `mve` and reports whether it survives the legality filter, then takes it back.
    fn keeps_legal(&self, position: &mut Position, mve: Move) -> bool {
        let mover = position.side_to_move();
        position.do_move(mve);

        let legal = if position.is_side_in_check(mover) {
            false
        } else if mve.is_drop()
            && mve.drop_piece_type() == PieceType::Pawn
            && position.is_king_attacked()
        {
            // A pawn drop may give check but not mate.
            self.has_legal_move(position)
        } else {
            // Perpetual check by the mover loses, so the repetition is off limits.
            !(position.is_repetition() && position.is_king_attacked())
        };

        position.undo_move();
        legal
    }
}

impl GenerateMoves for MoveGen {
    fn gen_moves(&self, position: &mut Position) -> MoveList {
        let mut moves = all_pieces::gen_pseudo_legal_moves(position);
        moves.retain(|mve| self.keeps_legal(position, *mve));
        moves
    }

    fn gen_pseudo_legal_moves(&self, position: &Position) -> MoveList {
        all_pieces::gen_pseudo_legal_moves(position)
    }

    fn has_legal_move(&self, position: &mut Position) -> bool {
        all_pieces::gen_pseudo_legal_moves(position)
            .into_iter()
            .any(|mve| self.keeps_legal(position, mve))
    }
}

pub static MOVE_GEN: MoveGen = MoveGen;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_legal_moves_leave_position_unchanged() -> TestResult {
        let mut position = Position::from_sfen("R8/2K1S1SSk/4B4/9/9/9/9/9/1L1L1L3 b RBGSNLP3g3n17p 1")?;
        let before = position.clone();
        let hash = position.zobrist_hash();

        MOVE_GEN.gen_moves(&mut position);

        assert_eq!(position, before);
        assert_eq!(position.zobrist_hash(), hash);
        assert_eq!(position.ply(), 0);
        Ok(())
    }

    #[test]
    fn test_pinned_piece_cant_move() -> TestResult {
        // The gold on 5h shields its king from the rook on 5a.
        let mut position = Position::from_sfen("k3r4/9/9/9/9/9/9/4G4/4K4 b - 1")?;
        let moves = MOVE_GEN.gen_moves(&mut position);
        assert!(moves.iter().all(|mve| mve.is_drop() || mve.src() != SQ58 || mve.dest().file() == SQ58.file()));
        assert!(moves.contains(&Move::new(SQ58, SQ57)));
        assert!(!moves.contains(&Move::new(SQ58, SQ68)));
        Ok(())
    }

    #[test]
    fn test_king_cant_step_into_check() -> TestResult {
        // The rook covers file 6.
        let mut position = Position::from_sfen("k2r5/9/9/9/9/9/9/9/4K4 b - 1")?;
        let moves = MOVE_GEN.gen_moves(&mut position);
        assert_eq!(moves.len(), 3);
        assert!(!moves.contains(&Move::new(SQ59, SQ68)));
        Ok(())
    }

    #[test_case("7lk/7p1/9/7N1/9/9/9/9/K8 b P 1", Move::new_drop(PieceType::Pawn, SQ12), false ; "drop pawn mate")]
    #[test_case("7lk/7p1/9/9/9/9/9/9/K8 b P 1", Move::new_drop(PieceType::Pawn, SQ12), true ; "drop pawn check with escape")]
    #[test_case("8k/9/8P/9/9/9/9/9/K8 b P 1", Move::new_drop(PieceType::Pawn, SQ12), false ; "double pawn")]
    fn test_pawn_drop_rules(sfen: &str, mve: Move, want: bool) -> TestResult {
        let mut position = Position::from_sfen(sfen)?;
        assert_eq!(MOVE_GEN.gen_moves(&mut position).contains(&mve), want);
        Ok(())
    }

    #[test]
    fn test_has_legal_move_agrees_with_gen_moves() -> TestResult {
        let mut stalemated = Position::from_sfen(
            "+K+K1+L+S+R3/+P6+P1/+P1PK5/6S1+B/9/4Gn2p/1ppp2+Rp+p/p+k+l+pppp+p+b/gg+s+s+l+p+l+pk w G 1",
        )?;
        assert!(!MOVE_GEN.has_legal_move(&mut stalemated));
        assert!(MOVE_GEN.gen_moves(&mut stalemated).is_empty());

        let mut start = Position::start();
        assert!(MOVE_GEN.has_legal_move(&mut start));
        Ok(())
    }
}
