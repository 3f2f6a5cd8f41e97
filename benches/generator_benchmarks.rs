//! Benchmarks for the binding generator.
//!
//! Each benchmark builds a synthetic symbol table once and measures a full
//! `generate` run over it: classification, synthesis and emission.
//!
//! ```bash
//! cargo bench --bench generator_benchmarks
//! ```

use angelscript_generator::{GeneratorOptions, generate};
use angelscript_symbols::{Parameter, Symbol, SymbolFlags, SymbolTable, SymbolTableBuilder};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// `count` value types and `count` reference types, each with a handful of
/// constructors, operators, properties and methods referencing each other.
fn synthetic_table(count: usize) -> (SymbolTable, Vec<String>) {
    let mut builder = SymbolTableBuilder::new();
    let mut names = Vec::with_capacity(count * 2);

    for i in 0..count {
        let name = format!("Value{i}");
        let qualified = format!("game::{name}");
        let by_ref = format!("const {name} &");
        let id = builder.add_root(Symbol::aggregate(&name).with_qualified_name(&qualified));
        builder.add_child(id, Symbol::constructor(&name));
        builder.add_child(
            id,
            Symbol::constructor(&name)
                .with_param(Parameter::new("float"))
                .with_param(Parameter::new("float")),
        );
        builder.add_child(id, Symbol::constructor(&name).with_param(Parameter::new(&by_ref)));
        builder.add_child(id, Symbol::destructor(&name));
        builder.add_child(id, Symbol::variable("x", "float"));
        builder.add_child(id, Symbol::variable("y", "float"));
        for op in ["operator+", "operator-", "operator==", "operator!=", "operator<"] {
            builder.add_child(
                id,
                Symbol::function(op, name.clone())
                    .with_param(Parameter::new(&by_ref))
                    .with_flags(SymbolFlags::CONST),
            );
        }
        let length = Symbol::function("length", "float").with_flags(SymbolFlags::CONST);
        builder.add_child(id, length);
        let scale = Symbol::function("scale", "void").with_param(Parameter::new("double"));
        builder.add_child(id, scale);
        names.push(qualified);
    }

    for i in 0..count {
        let name = format!("Entity{i}");
        let qualified = format!("game::{name}");
        let id = builder.add_root(Symbol::aggregate(&name).with_qualified_name(&qualified));
        let ctor = Symbol::constructor(&name).with_param(Parameter::new("const std::string &"));
        builder.add_child(id, ctor);
        let update = Symbol::function("update", "void").with_flags(SymbolFlags::PURE_VIRTUAL);
        builder.add_child(id, update);
        builder.add_child(id, Symbol::function("parent", format!("{name} *")));
        builder.add_child(
            id,
            Symbol::function("position", format!("Value{i}")).with_flags(SymbolFlags::CONST),
        );
        builder.add_child(
            id,
            Symbol::function("bounds", "void")
                .with_param(Parameter::new("float &").with_doc("[out] width"))
                .with_param(Parameter::new("float &").with_doc("[out] height")),
        );
        let swap = Symbol::function("swap", "void").with_param(Parameter::new(format!("{name} &")));
        builder.add_child(id, swap);
        names.push(qualified);
    }

    (builder.build(), names)
}

fn pipeline_benchmarks(c: &mut Criterion) {
    let options = GeneratorOptions::default();
    let mut group = c.benchmark_group("generator/pipeline");

    for count in [10, 100, 1000] {
        let (table, names) = synthetic_table(count);
        group.throughput(Throughput::Elements(names.len() as u64));
        group.bench_function(format!("types_{}", names.len()), |b| {
            b.iter(|| {
                let generated = generate(black_box(&table), black_box(&names), &options);
                black_box(generated.program.render())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, pipeline_benchmarks);
criterion_main!(benches);
