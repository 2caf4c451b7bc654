//! Evaluator benchmarks: recursive calls, arithmetic loops, and closure
//! churn.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ember_eval::Interpreter;
use ember_lex::Lexer;
use ember_par::{Parser, Stmt};

fn parse(source: &str) -> Vec<Stmt> {
    let tokens = Lexer::new(source).tokenize().unwrap();
    Parser::new(tokens).parse().unwrap()
}

fn run(program: &[Stmt]) {
    let mut interp = Interpreter::with_output(Box::new(std::io::sink()));
    interp.run(black_box(program)).unwrap();
}

fn bench_interp(c: &mut Criterion) {
    let fib = parse(
        "\
def fib(n) {
    if n < 2 { return n; }
    return fib(n - 1) + fib(n - 2);
}
var result = fib(15);
",
    );
    c.bench_function("fib_15", |b| b.iter(|| run(&fib)));

    let arithmetic = parse(
        "\
var total = 0;
for var i = 0; i < 1000; i = i + 1 {
    total = total + (i * 109153 + 257) / 253 - 751;
}
",
    );
    c.bench_function("arithmetic_loop_1000", |b| b.iter(|| run(&arithmetic)));

    let closures = parse(
        "\
def make_adder(n) {
    def adds_n(a) { return a + n; }
    return adds_n;
}
var total = 0;
for var i = 0; i < 500; i = i + 1 {
    var add = make_adder(i);
    total = total + add(i);
}
",
    );
    c.bench_function("closure_churn_500", |b| b.iter(|| run(&closures)));

    let classes = parse(
        "\
class Foo {
    var value;
    def $init(v) { self.value = v * 257 + 123; }
    def change(arg) { self.value = self.value * arg; }
    def get() { return self.value; }
}
var total = 0;
for var i = 0; i < 500; i = i + 1 {
    var foo = Foo(123);
    foo.change(3);
    total = total + foo.get();
}
",
    );
    c.bench_function("class_churn_500", |b| b.iter(|| run(&classes)));
}

criterion_group!(benches, bench_interp);
criterion_main!(benches);
