//! Benchmarks for the per-frame engine paths.
//!
//! Run with: cargo bench -p panelgrid-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use panelgrid_layout::{
    DragCoordinator, DragKind, GridConfig, GridOverlay, GridPosition, GridSettings, Point,
    ScrollMetrics, VirtualizationConfig, Widget, compute_window, first_free_position, is_valid,
    reconcile,
};
use std::hint::black_box;

/// Pack `n` widgets of mixed spans into a 4-column grid.
fn make_widgets(n: usize) -> Vec<Widget> {
    let mut occupied: Vec<GridPosition> = Vec::with_capacity(n);
    let mut widgets = Vec::with_capacity(n);
    for i in 0..n {
        let width = (i % 3) as i32 + 1;
        let height = (i % 2) as i32 + 1;
        let position = first_free_position(width, height, &occupied, 4);
        occupied.push(position);
        widgets.push(Widget::new(format!("w{i}"), "notes", position));
    }
    widgets
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/is_valid");
    for n in [10, 50, 200] {
        let widgets = make_widgets(n);
        let candidate = GridPosition {
            row: 2,
            col: 1,
            width: 2,
            height: 1,
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &widgets, |b, widgets| {
            b.iter(|| black_box(is_valid(&candidate, widgets, Some("w0"), 4)))
        });
    }
    group.finish();
}

fn bench_drag_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag/pointer_move");
    let grid = GridConfig::from_width(1200.0, &GridSettings::default());
    for n in [10, 50, 200] {
        let widgets = make_widgets(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &widgets, |b, widgets| {
            let mut drag = DragCoordinator::default();
            drag.begin("w0", DragKind::Move, Point::new(20.0, 20.0), 1, widgets, &grid);
            let mut x = 0.0;
            b.iter(|| {
                x = (x + 37.0) % 1200.0;
                black_box(drag.pointer_move(Point::new(x, 400.0), 1, widgets, &grid))
            })
        });
    }
    group.finish();
}

fn bench_window(c: &mut Criterion) {
    let config = VirtualizationConfig::default();
    c.bench_function("virtualization/compute_window", |b| {
        let mut scroll = 0.0;
        b.iter(|| {
            scroll = (scroll + 113.0) % 200_000.0;
            black_box(compute_window(
                ScrollMetrics::new(scroll, 900.0),
                296.0,
                4,
                5_000,
                &config,
            ))
        })
    });
}

fn bench_overlay(c: &mut Criterion) {
    let grid = GridConfig::from_width(1200.0, &GridSettings::default());
    let widgets = make_widgets(60);
    let hover = Some((
        GridPosition {
            row: 5,
            col: 1,
            width: 2,
            height: 2,
        },
        false,
    ));
    c.bench_function("overlay/compute_60", |b| {
        b.iter(|| black_box(GridOverlay::compute(&grid, &widgets, hover, Some("w3"))))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let widgets = make_widgets(100);
    c.bench_function("reconcile/shrink_4_to_2", |b| {
        b.iter(|| black_box(reconcile(&widgets, 2)))
    });
}

criterion_group!(
    benches,
    bench_validate,
    bench_drag_move,
    bench_window,
    bench_overlay,
    bench_reconcile,
);

criterion_main!(benches);
