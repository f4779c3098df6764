use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion};
use shogi::{perft, Position, MOVE_GEN};

const PERFT_BENCHMARK_SFENS_AND_DEPTHS: &[(&str, usize, &str)] = &[
    (
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1",
        4,
        "starting position",
    ),
    (
        "lnsgkg1nl/1r5s1/pppppp1pp/6p2/4B4/2P6/PP1PPPPPP/7R1/LNSGKGSNL w b 6",
        3,
        "bishop in hand",
    ),
    (
        "R8/2K1S1SSk/4B4/9/9/9/9/9/1L1L1L3 b RBGSNLP3g3n17p 1",
        2,
        "max moves",
    ),
];

pub fn benchmark_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);

    for (sfen, depth, position_name) in PERFT_BENCHMARK_SFENS_AND_DEPTHS.iter() {
        let pos = Position::from_sfen(sfen).unwrap();
        let bench_name = format!("perft {}", position_name);

        group.bench_function(&bench_name, |b| {
            b.iter_custom(|iters| {
                let mut pos = pos.clone();
                let start = Instant::now();
                let mut total_nodes = 0;

                for _ in 0..iters {
                    let (_, nodes) = perft(&mut pos, *depth, &MOVE_GEN);
                    total_nodes += nodes;
                }

                let elapsed = start.elapsed();
                let nps = total_nodes as f64 / elapsed.as_secs_f64();
                println!("{} (depth {}): {:.0} nodes/second", &bench_name, depth, nps);

                elapsed
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_perft);
criterion_main!(benches);
