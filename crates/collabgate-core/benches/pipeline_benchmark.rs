use collabgate_core::mock::MockCollaboratorApi;
use collabgate_core::{
    extract_mention, resolve, AccessConfig, AccessPipeline, ProbeResult, TriggerEvent,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn generate_title(len: usize) -> String {
    let filler = "please grant me access to the maintainers repository ";
    let mut title = String::with_capacity(len + 16);
    while title.len() < len {
        title.push_str(filler);
    }
    title.truncate(len);
    title.push_str(" @alice-dev");
    title
}

fn bench_extract_mention(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_mention");

    for len in [16usize, 256, 4096] {
        let title = generate_title(len);
        group.throughput(Throughput::Bytes(title.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &title, |b, title| {
            b.iter(|| extract_mention(black_box(title)))
        });
    }

    // Many bare '@' before the real mention
    let noisy = format!("{}@bob", "@ ".repeat(500));
    group.bench_function("skip_bare_at", |b| {
        b.iter(|| extract_mention(black_box(&noisy)))
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let probes = [
        ("not_collaborator", ProbeResult::NotCollaborator),
        ("already_collaborator", ProbeResult::AlreadyCollaborator),
        ("lookup_failed", ProbeResult::LookupFailed("HTTP 502".into())),
    ];
    for (name, probe) in probes {
        group.bench_with_input(BenchmarkId::from_parameter(name), &probe, |b, probe| {
            b.iter(|| resolve(black_box("alice-dev"), black_box("community"), probe.clone()))
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let config = AccessConfig::default();
    let event = TriggerEvent::new("Please add @alice-dev to the org", 42);

    c.bench_function("pipeline_grant_mock", |b| {
        b.iter(|| {
            let api = MockCollaboratorApi::not_found();
            rt.block_on(AccessPipeline::new(&api, &config).run(black_box(&event)))
        })
    });
}

criterion_group!(benches, bench_extract_mention, bench_resolve, bench_pipeline);
criterion_main!(benches);
