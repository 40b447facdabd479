use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raychess::{
    movegen, perft, AlphaBeta, Color, Material, Position, SearchConfig, Square,
};

const POSITIONS: [(&str, &str); 9] = [
    (
        "initial",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    (
        "middlegame",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    ),
    (
        "sicilian",
        "r1b1k2r/2qnbppp/p2ppn2/1p4B1/3NPPP1/2N2Q2/PPP4P/2KR1B1R w kq - 0 11",
    ),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    ("queens", "6K1/8/8/1k3q2/3Q4/8/8/8 w - - 0 1"),
    (
        "promote",
        "8/PPPPPPPP/8/2k1K3/8/8/pppppppp/8 w - - 0 1",
    ),
    (
        "knights",
        "5K2/1N1N1N2/8/1N1N1N2/1n1n1n2/8/1n1n1n2/5k2 w - - 0 1",
    ),
    (
        "max",
        "3Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/NR4Q1/kN1BB1K1 w - - 0 1",
    ),
];

fn positions() -> impl Iterator<Item = (&'static str, Position)> {
    POSITIONS
        .iter()
        .map(|&(name, fen)| (name, Position::from_fen(fen).unwrap()))
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");
    for (name, pos) in positions() {
        group.bench_function(name, |b| {
            b.iter(|| black_box(movegen::legal_moves(&pos).len()))
        });
    }
}

fn bench_make_unmake(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_unmake");
    for (name, mut pos) in positions() {
        let moves = pos.legal_moves();
        group.bench_function(name, |b| {
            b.iter(|| {
                for mv in &moves {
                    let u = pos.make_move_raw(*mv);
                    black_box(pos.zobrist_hash());
                    pos.unmake_move(*mv, u);
                }
            })
        });
    }
}

fn bench_make_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_snapshot");
    for (name, pos) in positions() {
        let moves = pos.legal_moves();
        group.bench_function(name, |b| {
            b.iter(|| {
                for mv in &moves {
                    black_box(pos.make_move(*mv).zobrist_hash());
                }
            })
        });
    }
}

fn bench_is_attacked(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_attacked");
    for (name, pos) in positions() {
        group.bench_function(name, |b| {
            b.iter(|| {
                for color in [Color::White, Color::Black] {
                    for sq in Square::iter() {
                        black_box(pos.is_square_attacked(sq, color));
                    }
                }
            })
        });
    }
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);
    for (name, mut pos) in positions() {
        group.bench_function(name, |b| {
            b.iter(|| black_box(perft::perft(&mut pos, 3)))
        });
    }
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for (name, pos) in positions().take(4) {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut search = AlphaBeta::new(Material, SearchConfig { depth: 3 });
                black_box(search.search(&pos).score)
            })
        });
    }
}

criterion_group!(
    benches,
    bench_legal_moves,
    bench_make_unmake,
    bench_make_snapshot,
    bench_is_attacked,
    bench_perft,
    bench_search,
);
criterion_main!(benches);
