use blockfall::core::collision::{can_place, hard_drop_row};
use blockfall::core::{Board, GameState, Piece};
use blockfall::types::{Color, PieceKind};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_update(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("gravity_update", |b| {
        b.iter(|| {
            state.update();
            if state.final_score().is_some() {
                state.start_game();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 18..22 {
                for x in 0..10 {
                    board.set_cell(x, y, Color::CYAN);
                }
            }
            black_box(board.clear_complete_lines());
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            state.hard_drop();
            if state.final_score().is_some() {
                state.start_game();
            }
        })
    });
}

fn bench_can_place(c: &mut Criterion) {
    let board = Board::new();
    let piece = Piece::spawn(PieceKind::T);

    c.bench_function("can_place", |b| {
        b.iter(|| can_place(black_box(&piece.shape), black_box(4), black_box(10), &board))
    });
}

fn bench_hard_drop_row(c: &mut Criterion) {
    let board = Board::new();
    let piece = Piece::spawn(PieceKind::I);

    c.bench_function("hard_drop_row", |b| {
        b.iter(|| hard_drop_row(black_box(&piece), &board))
    });
}

fn bench_rotate(c: &mut Criterion) {
    let piece = Piece::spawn(PieceKind::L);

    c.bench_function("rotate_clockwise", |b| {
        b.iter(|| black_box(piece).rotated_clockwise())
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start_game();

    c.bench_function("snapshot", |b| b.iter(|| black_box(state.snapshot())));
}

criterion_group!(
    benches,
    bench_update,
    bench_line_clear,
    bench_hard_drop,
    bench_can_place,
    bench_hard_drop_row,
    bench_rotate,
    bench_snapshot
);
criterion_main!(benches);
