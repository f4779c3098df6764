use crate::moves::MoveList;
use crate::position::Position;

pub trait GenerateMoves {
    /// Fully legal moves. The position is mutated while candidates are tried but is restored
    /// before returning.
    fn gen_moves(&self, position: &mut Position) -> MoveList;

    /// Moves that follow piece movement and drop rules but may leave the mover's king attacked.
    fn gen_pseudo_legal_moves(&self, position: &Position) -> MoveList;

    fn has_legal_move(&self, position: &mut Position) -> bool {
        !self.gen_moves(position).is_empty()
    }
}
