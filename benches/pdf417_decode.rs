use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_pdf417::decode;

#[path = "../tests/common/mod.rs"]
#[allow(dead_code)]
mod common;

fn bench_decode_clean(c: &mut Criterion) {
    let fixture = common::build_symbol(9, 3, 2, &[17, 900, 42, 0, 345], 3, 4);
    let width = fixture.codeword_width();
    c.bench_function("decode_9x3_ec2_clean", |b| {
        b.iter(|| decode(black_box(&fixture.image), &fixture.seeds, width, width))
    });
}

fn bench_decode_damaged(c: &mut Criterion) {
    let mut fixture = common::build_symbol(9, 3, 2, &[17, 900, 42, 0, 345], 3, 4);
    let width = fixture.codeword_width();
    for &(row, data_column) in &[(2u32, 1u32), (5, 0)] {
        let index = (row * fixture.cols + data_column) as usize;
        let wrong = (fixture.codewords[index] + 7) % 929;
        fixture.repaint_symbol(row, data_column + 1, wrong);
    }
    c.bench_function("decode_9x3_ec2_two_errors", |b| {
        b.iter(|| decode(black_box(&fixture.image), &fixture.seeds, width, width))
    });
}

fn bench_decode_large(c: &mut Criterion) {
    let fixture = common::build_symbol(30, 8, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 4);
    let width = fixture.codeword_width();
    c.bench_function("decode_30x8_ec3", |b| {
        b.iter(|| decode(black_box(&fixture.image), &fixture.seeds, width, width))
    });
}

criterion_group!(
    benches,
    bench_decode_clean,
    bench_decode_damaged,
    bench_decode_large
);
criterion_main!(benches);
