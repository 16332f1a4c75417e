use criterion::{Criterion, criterion_group, criterion_main};
use review_anchor_engine::{EditorState, apply_indent, detect_indent_style};
mod common;

fn bench_indent(c: &mut Criterion) {
    let mut group = c.benchmark_group("indent");
    group.sample_size(20);

    let content = common::generate_source(200);

    group.bench_function("detect_style", |b| {
        b.iter(|| std::hint::black_box(detect_indent_style(std::hint::black_box(&content))));
    });

    group.bench_function("indent_whole_buffer", |b| {
        b.iter(|| {
            let edit = apply_indent(std::hint::black_box(&content), 0, content.len(), false);
            std::hint::black_box(edit);
        });
    });

    group.bench_function("tab_shift_tab_cycle", |b| {
        let mut state = EditorState::new(&content);
        state.set_selection(0..content.len() / 2);
        b.iter(|| {
            std::hint::black_box(state.indent());
            std::hint::black_box(state.outdent());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_indent);
criterion_main!(benches);
