//! Criterion benchmarks for batch scanning with and without view tags.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecpdksap_core::{ScanCandidate, ViewTagConfig};
use ecpdksap_crypto::CurveContext;
use ecpdksap_scanner::{Scanner, ScannerConfig};
use ecpdksap_stealth::{send, ProtocolVariant, RecipientKeys, V0, V1, V2};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const BATCH: usize = 200;

/// One payment to the scanner's keys among payments to a stranger.
fn batch<V: ProtocolVariant>(
    ctx: &CurveContext,
    keys: &RecipientKeys<V>,
    tag: Option<&ViewTagConfig>,
    rng: &mut ChaCha20Rng,
) -> Vec<ScanCandidate> {
    let stranger = RecipientKeys::<V>::generate(ctx, rng);
    let mut out: Vec<_> = (0..BATCH - 1)
        .map(|_| send(ctx, stranger.public_keys(), tag, rng).unwrap().to_record().to_candidate())
        .collect();
    let ours = send(ctx, keys.public_keys(), tag, rng).unwrap();
    out.push(ours.to_record().to_candidate());
    out
}

fn bench_variant<V: ProtocolVariant>(c: &mut Criterion, seed: u64) {
    let ctx = CurveContext::new();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut g = c.benchmark_group(format!("scan_{}", V::ID));
    g.throughput(Throughput::Elements(BATCH as u64));
    g.sample_size(10);

    for selector in ["none", "v0-1byte", "v0-2bytes", "v1-1byte", "v1-2bytes"] {
        let tag = ViewTagConfig::from_selector(selector).unwrap();
        let keys = RecipientKeys::<V>::generate(&ctx, &mut rng);
        let candidates = batch(&ctx, &keys, tag.as_ref(), &mut rng);
        let scanner = Scanner::new(ctx, keys, ScannerConfig::new().maybe_view_tag(tag)).unwrap();

        g.bench_with_input(BenchmarkId::from_parameter(selector), &candidates, |b, candidates| {
            b.iter(|| black_box(scanner.scan(candidates).unwrap()));
        });
    }
    g.finish();
}

fn bench_scan(c: &mut Criterion) {
    bench_variant::<V0>(c, 1);
    bench_variant::<V1>(c, 2);
    bench_variant::<V2>(c, 3);
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
