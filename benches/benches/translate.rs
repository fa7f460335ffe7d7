//! Guard generation benchmarks.
//!
//! Measures parsing and whole-file generation over synthetic declaration sets.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use guardgen_core::{Generator, SourceIndex, parse_typescript_declarations};

const TREE: &str = r#"
export interface TreeNode {
    value: number;
    label: string | null;
    children: TreeNode[];
    parent?: TreeNode;
}
"#;

/// `n` interfaces, each referencing the previous one.
fn generate_chain(n: usize) -> String {
    let mut source = String::from("export enum Kind { A = 'a', B = 'b' }\n");
    for i in 0..n {
        source.push_str(&format!("export interface Node{i} {{\n"));
        source.push_str("    id: number;\n    kind: Kind;\n    tags?: string[];\n");
        source.push_str("    status: 'open' | 'closed' | 'pending';\n");
        if i > 0 {
            source.push_str(&format!("    prev: Node{} | null;\n", i - 1));
        }
        source.push_str("}\n");
    }
    source
}

fn index(source: &str) -> SourceIndex {
    let mut index = SourceIndex::new();
    index.add_source("src/types.ts", source).unwrap();
    index
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [10, 100] {
        let source = generate_chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, source| {
            b.iter(|| black_box(parse_typescript_declarations(source).unwrap()))
        });
    }
    group.finish();
}

fn bench_generate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all");
    for n in [10, 100] {
        let index = index(&generate_chain(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &index, |b, index| {
            b.iter(|| black_box(Generator::new(index).generate_all_files(None)))
        });
    }
    group.finish();
}

fn bench_recursive(c: &mut Criterion) {
    let index = index(TREE);
    c.bench_function("generate/recursive", |b| {
        b.iter(|| black_box(Generator::new(&index).generate_file_for("TreeNode", None).unwrap()))
    });
}

criterion_group!(benches, bench_parse, bench_generate_all, bench_recursive);
criterion_main!(benches);
