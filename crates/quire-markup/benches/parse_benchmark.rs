//! Markup parser benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quire_markup::parse_line;

const SIMPLE_LINE: &str = "^(b)Hello^(b) world";

const STYLED_LINE: &str = "The ^(b)quick^(b) ^(c,#7f4f24)brown^(c) fox ^(i)jumps^(i) over \
    the ^(u)lazy^(u) dog ^(f,DejaVu-Serif)^(s,14)again and again^(r) until the line ends";

fn parse_simple(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| b.iter(|| parse_line(black_box(SIMPLE_LINE))));
}

fn parse_styled(c: &mut Criterion) {
    c.bench_function("parse_styled", |b| b.iter(|| parse_line(black_box(STYLED_LINE))));
}

criterion_group!(benches, parse_simple, parse_styled);
criterion_main!(benches);
