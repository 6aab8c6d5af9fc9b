use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=gen/grammar.json");

    let grammar_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("gen/grammar.json");
    let grammar_json = fs::read_to_string(&grammar_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", grammar_path.display()));

    let generated = actson_gen_table::generate(&grammar_json)
        .unwrap_or_else(|e| panic!("failed to generate state table from grammar.json: {e}"));

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let out_path = Path::new(&out_dir).join("state_table.rs");
    fs::write(&out_path, generated)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", out_path.display()));
}
