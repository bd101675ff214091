use chess_rules::{Board, Color, Engine};
use criterion::{criterion_group, criterion_main, Criterion};

fn perft_bench(c: &mut Criterion) {
    let mut engine = Engine::new();
    c.bench_function("perft initial 3", |b| b.iter(|| engine.perft(3)));

    // Castling on both sides for both colors, no pawns in the way
    let board = Board::from_pieces(&[
        ("e1", 'K'), ("a1", 'R'), ("h1", 'R'),
        ("e8", 'k'), ("a8", 'r'), ("h8", 'r'),
    ]);
    let mut engine = Engine::from_board(board, Color::White);
    c.bench_function("perft rooks and kings 3", |b| b.iter(|| engine.perft(3)));
}

criterion_group!(benches, perft_bench);
criterion_main!(benches);
