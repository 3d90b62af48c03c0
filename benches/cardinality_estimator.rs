#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::hash::{BuildHasher, BuildHasherDefault};

use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use hyperloglog_estimators::{EstimatorKind, HyperLogLog};
use hyperloglogplus::HyperLogLog as HyperLogLogTrait;
use pprof::criterion::{Output, PProfProfiler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabled::settings::{Settings, Style};
use tabled::{Table, Tabled};
use wyhash::WyHash;

/// Insert and estimate operations are benchmarked against cardinalities ranging from 0 to
/// `DEFAULT_MAX_CARDINALITY` or environment variable `N` (if defined) with cardinality doubled
/// with every iteration as [0, 1, 2, ..., N].
const DEFAULT_MAX_CARDINALITY: usize = 65_536;

/// Precision shared by all benchmarked sketches.
const PRECISION: u8 = 12;

const KINDS: [EstimatorKind; 3] = [
    EstimatorKind::Classic,
    EstimatorKind::Improved,
    EstimatorKind::MaximumLikelihood,
];

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Protobuf));
    targets = benchmark
}
criterion_main!(benches);

fn benchmark(c: &mut Criterion) {
    let bench_results_path =
        std::env::var("BENCH_RESULTS_PATH").unwrap_or_else(|_| "target".to_string());
    let max_cardinality = std::env::var("N")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CARDINALITY);

    let cardinalities: Vec<usize> = std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= max_cardinality)
        .collect();

    let mut group = c.benchmark_group("insert");
    for &cardinality in &cardinalities {
        group.throughput(Throughput::Elements(cardinality.max(1) as u64));
        // insert path is shared by all estimators
        bench_insert::<Sketch<1>>(&mut group, cardinality);
        bench_insert::<HyperLogLogPlus>(&mut group, cardinality);
    }
    group.finish();

    let mut group = c.benchmark_group("estimate");
    group.throughput(Throughput::Elements(1));
    for &cardinality in &cardinalities {
        bench_estimate::<Sketch<0>>(&mut group, cardinality);
        bench_estimate::<Sketch<1>>(&mut group, cardinality);
        bench_estimate::<Sketch<2>>(&mut group, cardinality);
        bench_estimate::<HyperLogLogPlus>(&mut group, cardinality);
    }
    group.finish();

    let results: Vec<StatRecord> = cardinalities
        .iter()
        .map(|&cardinality| StatRecord {
            cardinality,
            classic: measure_allocations::<Sketch<0>>(cardinality),
            improved: measure_allocations::<Sketch<1>>(cardinality),
            maximum_likelihood: measure_allocations::<Sketch<2>>(cardinality),
            hyperloglogplus: measure_allocations::<HyperLogLogPlus>(cardinality),
        })
        .collect();

    let table_config = Settings::default().with(Style::markdown());
    write_table(
        format!("{}/memory_usage.md", bench_results_path),
        Table::new(results).with(table_config).to_string(),
    );

    let results: Vec<StatRecord> = cardinalities
        .iter()
        .map(|&cardinality| StatRecord {
            cardinality,
            classic: measure_error::<Sketch<0>>(cardinality),
            improved: measure_error::<Sketch<1>>(cardinality),
            maximum_likelihood: measure_error::<Sketch<2>>(cardinality),
            hyperloglogplus: measure_error::<HyperLogLogPlus>(cardinality),
        })
        .collect();

    let table_config = Settings::default().with(Style::markdown());
    write_table(
        format!("{}/relative_error.md", bench_results_path),
        Table::new(results).with(table_config).to_string(),
    );
}

fn write_table(path: String, table: String) {
    if let Err(err) = std::fs::write(&path, &table) {
        eprintln!("failed to write {path}: {err}");
        println!("{table}");
    }
}

/// Cardinality estimator trait representing common estimator operations.
trait CardinalityEstimatorTrait {
    fn new() -> Self;
    fn insert(&mut self, item: &usize);
    fn estimate(&mut self) -> usize;
    fn name() -> String;
}

fn bench_insert<E: CardinalityEstimatorTrait>(
    group: &mut BenchmarkGroup<WallTime>,
    cardinality: usize,
) {
    group.bench_with_input(
        BenchmarkId::new(E::name(), cardinality),
        &cardinality,
        |b, &cardinality| {
            b.iter(|| {
                let mut estimator = E::new();
                for i in 0..black_box(cardinality) {
                    estimator.insert(black_box(&i));
                }
            });
        },
    );
}

fn bench_estimate<E: CardinalityEstimatorTrait>(
    group: &mut BenchmarkGroup<WallTime>,
    cardinality: usize,
) {
    group.bench_with_input(
        BenchmarkId::new(E::name(), cardinality),
        &cardinality,
        |b, &cardinality| {
            let mut estimator = E::new();
            for i in 0..black_box(cardinality) {
                estimator.insert(black_box(&i));
            }
            b.iter(|| estimator.estimate());
        },
    );
}

fn measure_allocations<E: CardinalityEstimatorTrait>(cardinality: usize) -> String {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut estimator = E::new();
    for i in 0..cardinality {
        estimator.insert(&i);
    }
    let stats = dhat::HeapStats::get();
    format!(
        "{} / {} / {}",
        std::mem::size_of::<E>(),
        stats.total_bytes,
        stats.total_blocks,
    )
}

fn measure_error<E: CardinalityEstimatorTrait>(cardinality: usize) -> String {
    let n = 100;
    let mut total_relative_error: f64 = 0.0;
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..n {
        let mut estimator = E::new();
        for _ in 0..cardinality {
            estimator.insert(&rng.gen());
        }
        let relative_error = if cardinality == 0 {
            0.0
        } else {
            (estimator.estimate() as f64 - cardinality as f64).abs() / cardinality as f64
        };
        total_relative_error += relative_error;
    }
    let avg_relative_error = total_relative_error / (n as f64);

    if avg_relative_error < 1.0 {
        format!("{:.4}", avg_relative_error)
    } else {
        format!("{:.2e}", avg_relative_error)
    }
}

#[derive(Tabled)]
struct StatRecord {
    cardinality: usize,
    classic: String,
    improved: String,
    maximum_likelihood: String,
    hyperloglogplus: String,
}

/// HyperLogLog sketch estimating with `KINDS[K]`.
struct Sketch<const K: usize>(HyperLogLog<u64>);

impl<const K: usize> CardinalityEstimatorTrait for Sketch<K> {
    fn new() -> Self {
        Self(HyperLogLog::new(PRECISION, KINDS[K]).unwrap())
    }

    fn insert(&mut self, item: &usize) {
        self.0
            .insert_hash(BuildHasherDefault::<WyHash>::default().hash_one(item));
    }

    fn estimate(&mut self) -> usize {
        self.0.estimate() as usize
    }

    fn name() -> String {
        format!("hll-{}", KINDS[K])
    }
}

struct HyperLogLogPlus(hyperloglogplus::HyperLogLogPlus<usize, BuildHasherDefault<WyHash>>);

impl CardinalityEstimatorTrait for HyperLogLogPlus {
    fn new() -> Self {
        Self(
            hyperloglogplus::HyperLogLogPlus::new(
                PRECISION,
                BuildHasherDefault::<WyHash>::default(),
            )
            .unwrap(),
        )
    }

    fn insert(&mut self, item: &usize) {
        self.0.insert(item);
    }

    fn estimate(&mut self) -> usize {
        self.0.count() as usize
    }

    fn name() -> String {
        "hyperloglogplus".to_string()
    }
}
