// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use action_schema_engine::Document;

#[allow(dead_code)]
pub fn generate_document(actions: usize, examples_per_action: usize) -> Document {
    let mut doc = Document::new();

    for a in 0..actions {
        let name = format!("action_{a}");
        doc.add_action(name.as_str()).unwrap();
        for e in 0..examples_per_action {
            doc.add_example(name.as_str()).unwrap();
            doc.add_action_to_example(name.as_str(), e, name.as_str())
                .unwrap();
            doc.update_example_action_field(name.as_str(), e, name.as_str(), "slot", "value")
                .unwrap();
        }
    }

    doc
}
