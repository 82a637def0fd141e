//! # AIONET Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | aio-02 Entropy | fingerprint one interaction | < 100µs |
//! | aio-04 Trust | full trust score | < 1ms |
//! | aio-05 Ledger | seal at difficulty 2 | < 10ms |
//! | shared-crypto | Merkle root over N hashes | linear in N |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use aio_01_identity::DeviceIdentity;
use aio_02_entropy::EntropyAnalyzer;
use aio_03_clone_detection::{CloneDetectionConfig, CloneDetector};
use aio_04_trust_engine::{TrustConfig, TrustEngine};
use aio_05_transaction_ledger::{TransactionLedger, TRANSACTION_DIFFICULTY};
use aionet_tests::fixtures::human_interaction;
use shared_crypto::{merkle_root, sha256_hex, ProofOfWork};
use shared_types::{SystemTimeSource, TimeSource};

// ============================================================================
// AIO-02 / AIO-04: Scoring
// ============================================================================

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("aio-scoring");
    let data = human_interaction();

    let analyzer = EntropyAnalyzer::default();
    group.bench_function("entropy_fingerprint", |b| {
        b.iter(|| black_box(analyzer.fingerprint(Some(&data))))
    });

    let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
    let detector = Arc::new(CloneDetector::new(
        CloneDetectionConfig::default(),
        Arc::clone(&time),
    ));
    let engine = TrustEngine::new(TrustConfig::default(), detector, time);
    group.bench_function("trust_score", |b| {
        b.iter(|| black_box(engine.trust_score("device-bench", Some(&data))))
    });

    group.finish();
}

// ============================================================================
// AIO-05: Sealing
// ============================================================================

fn bench_transaction_sealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("aio-05-transaction-ledger");
    group.measurement_time(Duration::from_secs(10));

    let ledger = TransactionLedger::new(
        Arc::new(DeviceIdentity::create()),
        ProofOfWork::new(TRANSACTION_DIFFICULTY, 10_000_000),
        Arc::new(SystemTimeSource),
    );
    group.bench_function("create_secure_transaction", |b| {
        b.iter(|| {
            black_box(
                ledger
                    .create_secure_transaction(4.5, "Espresso", None, None)
                    .ok(),
            )
        })
    });

    group.finish();
}

// ============================================================================
// SHARED-CRYPTO: Merkle root
// ============================================================================

fn bench_merkle_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-crypto-merkle");

    for size in [2usize, 16, 128, 1024] {
        let leaves: Vec<String> = (0..size).map(|i| sha256_hex(i.to_le_bytes())).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("merkle_root", size), &leaves, |b, leaves| {
            b.iter(|| black_box(merkle_root(leaves)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scoring,
    bench_transaction_sealing,
    bench_merkle_root
);
criterion_main!(benches);
