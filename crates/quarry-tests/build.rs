use std::fs;
use std::path::PathBuf;

use quarry_compiler::{Compiler, Config, emit_all};
use quarry_core::SAFE_IDENTIFIER_TYPE;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let mappers_dir = PathBuf::from(&manifest_dir).join("mappers");

    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed={}", mappers_dir.display());

    let mut paths: Vec<PathBuf> = fs::read_dir(&mappers_dir)
        .expect("mappers directory is readable")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "xml"))
        .collect();
    paths.sort();

    let compiler = Compiler::new(
        Config::new().statement_param_type("sorted", "sort_column", SAFE_IDENTIFIER_TYPE),
    );

    let mut compiled = Vec::with_capacity(paths.len());
    for path in &paths {
        println!("cargo::rerun-if-changed={}", path.display());
        let source = fs::read_to_string(path).expect("mapper file is readable");
        let mapper = compiler
            .compile(&source)
            .unwrap_or_else(|err| panic!("{}: {err}", path.display()));
        let report = mapper
            .diagnostics()
            .render(&path.display().to_string(), &source);
        for line in report.lines().filter(|line| !line.trim().is_empty()) {
            println!("cargo::warning={line}");
        }
        compiled.push(mapper);
    }

    let code = emit_all(compiled.iter().map(|c| c.mapper()), compiler.config());
    let target = PathBuf::from(out_dir).join("mappers.rs");
    fs::write(&target, code).expect("generated mappers are writable");
}
