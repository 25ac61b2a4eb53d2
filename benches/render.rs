#[macro_use]
extern crate criterion;

use criterion::Criterion;
use mandelterm::{EscapeParams, EscapeTime, Scheduler, Viewport};

fn render_preview(c: &mut Criterion) {
    let viewport = Viewport::fit(162, 48).unwrap();
    c.bench_function("preview 160x48", move |b| {
        let scheduler = Scheduler::default();
        b.iter(|| {
            scheduler
                .render(&viewport, 48, 160, EscapeParams::PREVIEW, &EscapeTime)
                .unwrap()
        })
    });
}

fn render_export(c: &mut Criterion) {
    let frame = Viewport::fit(162, 48).unwrap().export_frame(400).unwrap();
    c.bench_function("export 400x400 parallel", move |b| {
        let scheduler = Scheduler::default();
        b.iter(|| frame.render(&scheduler, EscapeParams::EXPORT, &EscapeTime).unwrap())
    });
    c.bench_function("export 400x400 serial", move |b| {
        let scheduler = Scheduler::new(1);
        b.iter(|| {
            scheduler
                .render_serial(
                    &frame.viewport,
                    frame.rows,
                    frame.columns,
                    EscapeParams::EXPORT,
                    &EscapeTime,
                )
                .unwrap()
        })
    });
}

criterion_group!(benches, render_preview, render_export);
criterion_main!(benches);
