use std::{
    collections::HashMap,
    fmt::Display,
    time::{Duration, Instant},
};

use log::info;
use tabled::{Table, Tabled};

use crate::move_gen::GenerateMoves;
use crate::moves::Move;
use crate::position::Position;

/// Counters taken over the positions reached at the final depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    pub fn new(nodes: u64, captures: u64, promotions: u64, checks: u64, checkmates: u64) -> Self {
        PerftCounts {
            nodes,
            captures,
            promotions,
            checks,
            checkmates,
        }
    }
}

pub struct PerftResult {
    pub depth: usize,
    pub counts: PerftCounts,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "depth: {}", self.depth)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new([self.counts]))?;
        Ok(())
    }
}

/// Leaf count below each legal root move, and their sum.
pub fn perft(
    position: &mut Position,
    depth: usize,
    move_gen: &impl GenerateMoves,
) -> (HashMap<Move, u64>, u64) {
    let mut move_counts = HashMap::new();

    if depth == 0 {
        return (move_counts, 1);
    }

    let mut tot = 0;
    for mve in move_gen.gen_moves(position) {
        position.do_move(mve);
        let nodes = perft_helper(position, depth - 1, move_gen);
        position.undo_move();

        move_counts.insert(mve, nodes);
        tot += nodes;
    }

    (move_counts, tot)
}

fn perft_helper(position: &mut Position, depth: usize, move_gen: &impl GenerateMoves) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = move_gen.gen_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut tot = 0;
    for mve in moves {
        position.do_move(mve);
        tot += perft_helper(position, depth - 1, move_gen);
        position.undo_move();
    }
    tot
}

pub fn perft_full(position: &mut Position, depth: usize, move_gen: &impl GenerateMoves) -> PerftResult {
    let mut counts = PerftCounts::default();

    let start = Instant::now();

    perft_full_helper(&mut counts, position, depth, move_gen);

    let time_elapsed = start.elapsed();
    let nodes_per_second = counts.nodes as f64 / time_elapsed.as_secs_f64();

    info!(
        "perft depth {}: {} nodes in {:.3}s ({:.0} nodes/s)",
        depth,
        counts.nodes,
        time_elapsed.as_secs_f64(),
        nodes_per_second
    );

    PerftResult {
        depth,
        counts,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_full_helper(
    counts: &mut PerftCounts,
    position: &mut Position,
    depth: usize,
    move_gen: &impl GenerateMoves,
) {
    if depth == 0 {
        counts.nodes += 1;
        if !position.last_captured_piece().is_empty() {
            counts.captures += 1;
        }
        if position.last_move().is_promotion() {
            counts.promotions += 1;
        }
        if position.is_king_attacked() {
            counts.checks += 1;
            if !move_gen.has_legal_move(position) {
                counts.checkmates += 1;
            }
        }
        return;
    }

    for mve in move_gen.gen_moves(position) {
        position.do_move(mve);
        perft_full_helper(counts, position, depth - 1, move_gen);
        position.undo_move();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_gen::MOVE_GEN;
    use crate::piece::PieceType;
    use crate::square::Square::*;
    use testresult::TestResult;

    #[test]
    fn test_depth_zero_counts_root() {
        let mut position = Position::start();
        let (move_counts, tot) = perft(&mut position, 0, &MOVE_GEN);
        assert!(move_counts.is_empty());
        assert_eq!(tot, 1);

        let res = perft_full(&mut position, 0, &MOVE_GEN);
        assert_eq!(res.counts, PerftCounts::new(1, 0, 0, 0, 0));
    }

    #[test]
    fn test_divide() -> TestResult {
        let mut position = Position::start();
        let (move_counts, tot) = perft(&mut position, 2, &MOVE_GEN);

        assert_eq!(move_counts.len(), 30);
        assert_eq!(tot, 900);
        assert!(move_counts.values().all(|&nodes| nodes == 30));
        assert_eq!(move_counts.get(&"7g7f".parse()?), Some(&30));
        assert_eq!(position, Position::start());
        Ok(())
    }

    #[test]
    fn test_counts_checks_and_mates() -> TestResult {
        // G*1b is guarded by the pawn and mates.
        let mut position = Position::from_sfen("8k/9/8P/9/9/9/9/9/K8 b G 1")?;
        let res = perft_full(&mut position, 1, &MOVE_GEN);

        let mut check_count = 0;
        let mut mate_count = 0;
        for mve in position.legal_moves() {
            position.do_move(mve);
            if position.is_king_attacked() {
                check_count += 1;
                if position.is_mated() {
                    mate_count += 1;
                }
            }
            position.undo_move();
        }

        assert_eq!(res.counts.checks, check_count);
        assert_eq!(res.counts.checkmates, mate_count);
        assert!(mate_count >= 1);
        assert!(position.legal_moves().contains(&Move::new_drop(PieceType::Gold, SQ12)));
        Ok(())
    }

    #[test]
    fn test_display() {
        let mut position = Position::start();
        let res = perft_full(&mut position, 1, &MOVE_GEN);
        let out = res.to_string();
        assert!(out.starts_with("depth: 1\n"));
        assert!(out.contains("nodes"));
        assert!(out.contains("30"));
    }
}
