use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jackc_compiler::{compile_unit, Program};
use jackc_options::CompilerOptions;

const SQUARE_SOURCE: &str = r#"
/** A graphical square that can move and resize. */
class Square {
    field int x, y;
    field int size;

    constructor Square new(int ax, int ay, int asize) {
        let x = ax;
        let y = ay;
        let size = asize;
        do draw();
        return this;
    }

    method void dispose() {
        do Memory.deAlloc(this);
        return;
    }

    method void draw() {
        do Screen.setColor(true);
        do Screen.drawRectangle(x, y, x + size, y + size);
        return;
    }

    method void erase() {
        do Screen.setColor(false);
        do Screen.drawRectangle(x, y, x + size, y + size);
        return;
    }

    method void incSize() {
        if (((y + size) < 254) & ((x + size) < 510)) {
            do erase();
            let size = size + 2;
            do draw();
        }
        return;
    }

    method void decSize() {
        if (size > 2) {
            do erase();
            let size = size - 2;
            do draw();
        }
        return;
    }

    method void moveUp() {
        if (y > 1) {
            do Screen.setColor(false);
            do Screen.drawRectangle(x, (y + size) - 1, x + size, y + size);
            let y = y - 2;
            do Screen.setColor(true);
            do Screen.drawRectangle(x, y, x + size, y + 1);
        }
        return;
    }

    method void moveDown() {
        if ((y + size) < 254) {
            do Screen.setColor(false);
            do Screen.drawRectangle(x, y, x + size, y + 1);
            let y = y + 2;
            do Screen.setColor(true);
            do Screen.drawRectangle(x, (y + size) - 1, x + size, y + size);
        }
        return;
    }
}
"#;

/// Generate a class with `count` functions, each with a loop and a branch.
fn generate_class(name: &str, count: usize) -> String {
    let mut src = format!("class {name} {{\n    static int total;\n");
    for i in 0..count {
        src.push_str(&format!(
            "    function int f{i}(int n) {{\n        var int i, acc;\n        let i = 0;\n        while (i < n) {{\n            if (i = {i}) {{ let acc = acc + i; }} else {{ let acc = acc - 1; }}\n            let i = i + 1;\n        }}\n        let total = total + acc;\n        return acc;\n    }}\n"
        ));
    }
    src.push_str("}\n");
    src
}

fn bench_compile_unit(c: &mut Criterion) {
    let options = CompilerOptions::default();
    c.bench_function("compile_unit_square", |b| {
        b.iter(|| {
            let unit = compile_unit("Square.jack", black_box(SQUARE_SOURCE), &options).unwrap();
            black_box(unit);
        });
    });
}

fn bench_program_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("program");

    for units in [1, 8, 32] {
        let mut program = Program::default();
        for i in 0..units {
            program.add_source(format!("Gen{i}.jack"), generate_class(&format!("Gen{i}"), 20));
        }
        group.bench_with_input(BenchmarkId::new("units", units), &program, |b, program| {
            b.iter(|| {
                let results = program.compile();
                black_box(results);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile_unit, bench_program_compile);
criterion_main!(benches);
