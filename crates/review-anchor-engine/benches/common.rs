// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use relative_path::RelativePathBuf;
use review_anchor_engine::{Annotation, AnnotationId, AnnotationStatus, RangeInfo};

#[allow(dead_code)]
pub fn generate_source(functions: usize) -> String {
    let base = "fn example() {\n    let value = compute();\n    if value > 10 {\n        println!(\"big\");\n    }\n}\n\n";
    base.repeat(functions)
}

#[allow(dead_code)]
pub fn generate_annotations(count: usize, span: usize) -> Vec<Annotation> {
    (0..count)
        .map(|i| Annotation {
            id: Some(AnnotationId::new()),
            file: RelativePathBuf::from("src/example.rs"),
            status: AnnotationStatus::ALL[i % AnnotationStatus::ALL.len()],
            author: "bench".to_string(),
            content: format!("comment {i}"),
            timestamp: i as i64,
            code: String::new(),
            range: RangeInfo::lines(i + 1, i + span),
        })
        .collect()
}
