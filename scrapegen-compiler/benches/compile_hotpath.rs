use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scrapegen_compiler::{fingerprint, load_manifests, render_yaml, scrape_configs};
use scrapegen_test_utils::fixtures;

const MANIFESTS: &str = r#"
kind: PodMonitoring
metadata:
  name: frontend
  namespace: prod
spec:
  selector:
    matchLabels:
      app.kubernetes.io/name: frontend
    matchExpressions:
    - key: env
      operator: In
      values: [prod, staging]
  endpoints:
  - port: metrics
    interval: 30s
  - port: 9090
    interval: 1m
    timeout: 10s
  targetLabels:
    fromPod:
    - from: team
---
kind: PodMonitoring
metadata:
  name: backend
  namespace: prod
spec:
  endpoints:
  - port: http-metrics
    interval: 15s
"#;

fn bench_compile(c: &mut Criterion) {
    let target = fixtures::full_target();
    c.bench_function("compile/full_target", |b| {
        b.iter(|| {
            let jobs = scrape_configs(black_box(&target)).expect("compile target");
            black_box(jobs.len());
        });
    });
}

fn bench_load_compile_render(c: &mut Criterion) {
    c.bench_function("pipeline/load_compile_render", |b| {
        b.iter(|| {
            let targets = load_manifests(black_box(MANIFESTS)).expect("load manifests");
            let mut jobs = Vec::new();
            for target in &targets {
                jobs.extend(scrape_configs(target).expect("compile target"));
            }
            let rendered = render_yaml(&jobs).expect("render");
            black_box(fingerprint(&rendered));
        });
    });
}

criterion_group!(benches, bench_compile, bench_load_compile_render);
criterion_main!(benches);
