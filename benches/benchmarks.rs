use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chess_attacks::bitboard::Bitboard;
use chess_attacks::{AttackTables, IndexMode, PieceType, SliderKind, Square};

/// Middlegame-like occupancies: roughly a quarter of the board filled.
fn random_occupancies(n: usize) -> Vec<(Square, Bitboard)> {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    (0..n)
        .map(|_| {
            let sq = Square::from_index(rng.gen_range(0..64));
            let occupied = rng.gen::<u64>() & rng.gen::<u64>();
            (sq, occupied)
        })
        .collect()
}

pub fn bench_slider_lookups(c: &mut Criterion) {
    let positions = random_occupancies(1024);
    let mut group = c.benchmark_group("slider lookups");

    for mode in IndexMode::ALL {
        let tables = AttackTables::new(mode);
        for kind in SliderKind::ALL {
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), mode),
                &positions,
                |b, positions| {
                    b.iter(|| {
                        positions.iter().fold(0, |acc, &(sq, occupied)| {
                            acc ^ tables.slider_attacks(kind, black_box(sq), black_box(occupied))
                        })
                    })
                },
            );
        }
    }
    group.finish();
}

pub fn bench_queen_attacks(c: &mut Criterion) {
    let positions = random_occupancies(1024);
    let tables = AttackTables::new(IndexMode::detect());
    c.bench_function("queen attacks", |b| {
        b.iter(|| {
            positions.iter().fold(0, |acc, &(sq, occupied)| {
                acc ^ tables.attacks(PieceType::Queen, black_box(sq), black_box(occupied))
            })
        })
    });
}

pub fn bench_between(c: &mut Criterion) {
    let tables = AttackTables::new(IndexMode::detect());
    c.bench_function("between all pairs", |b| {
        b.iter(|| {
            let mut acc = 0;
            for s1 in Square::all() {
                for s2 in Square::all() {
                    acc ^= tables.between_bb(black_box(s1), black_box(s2));
                }
            }
            acc
        })
    });
}

pub fn bench_build_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("build tables");
    group.sample_size(10);

    for mode in IndexMode::ALL {
        group.bench_function(mode.name(), |b| b.iter(|| AttackTables::new(black_box(mode))));
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_slider_lookups,
    bench_queen_attacks,
    bench_between,
    bench_build_tables,
);
criterion_main!(benches);
