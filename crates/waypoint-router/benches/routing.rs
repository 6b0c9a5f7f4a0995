//! Routing benchmarks.
//!
//! Run with: `cargo bench -p waypoint-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use waypoint_router::{CompiledTable, Method, RouteTable, TypeHints};

fn build_table(num_routes: usize) -> CompiledTable<String> {
    let mut table = RouteTable::new();

    for i in 0..num_routes / 3 {
        table.get(format!("/api/v1/resource{i}"), format!("getResource{i}"), TypeHints::new());
    }

    for i in 0..num_routes / 3 {
        table.get(
            format!("/api/v1/resource{i}/{{id}}"),
            format!("getResourceById{i}"),
            [("id", "number")],
        );
    }

    for i in 0..num_routes / 3 {
        table.get(
            format!("/api/v1/org/{{org}}/resource{i}/{{id}}"),
            format!("getOrgResource{i}"),
            [("org", "url_title"), ("id", "number")],
        );
    }

    table.freeze().expect("benchmark patterns compile")
}

fn bench_static_match(c: &mut Criterion) {
    let table = build_table(100);

    c.bench_function("static_match", |b| {
        b.iter(|| black_box(table.find(Method::Get, "/api/v1/resource20")));
    });
}

fn bench_param_match(c: &mut Criterion) {
    let table = build_table(100);

    c.bench_function("param_match", |b| {
        b.iter(|| black_box(table.find(Method::Get, "/api/v1/resource25/12345")));
    });
}

fn bench_nested_param_match(c: &mut Criterion) {
    let table = build_table(100);

    c.bench_function("nested_param_match", |b| {
        b.iter(|| black_box(table.find(Method::Get, "/api/v1/org/acme-corp/resource10/12345")));
    });
}

fn bench_miss(c: &mut Criterion) {
    let table = build_table(100);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(table.find(Method::Get, "/api/v1/nonexistent/path")));
    });
}

fn bench_resource(c: &mut Criterion) {
    let mut table = RouteTable::new();
    for name in ["users", "posts", "comments", "tags"] {
        table.resource(name, |action| action.as_str());
    }
    let table = table.freeze().expect("resource patterns compile");

    c.bench_function("resource_update", |b| {
        b.iter(|| {
            black_box(table.find(Method::Patch, "/tags/123e4567-e89b-12d3-a456-426614174000"))
        });
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for num_routes in [10, 50, 100, 500, 1000] {
        let table = build_table(num_routes);

        group.bench_with_input(BenchmarkId::new("static_match", num_routes), &num_routes, |b, &n| {
            let path = format!("/api/v1/resource{}", n / 6);
            b.iter(|| black_box(table.find(Method::Get, &path)));
        });

        group.bench_with_input(BenchmarkId::new("param_match", num_routes), &num_routes, |b, &n| {
            let path = format!("/api/v1/resource{}/12345", n / 6);
            b.iter(|| black_box(table.find(Method::Get, &path)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_static_match,
    bench_param_match,
    bench_nested_param_match,
    bench_miss,
    bench_resource,
    bench_scaling
);
criterion_main!(benches);
