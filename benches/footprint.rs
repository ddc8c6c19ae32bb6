use std::time::Duration;

use carbon_sim::catalog::default_scenarios;
use carbon_sim::simulator::ModalKind;
use carbon_sim::{Amount, Category, Scenario, SequenceId, Simulator, SimulatorConfig};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Generates a long day of scenarios cycling through every category.
///
/// Amounts step by 7.37 so most of them carry a round-off.
pub struct ScenarioGenerator {
    next_id: SequenceId,
    count: SequenceId,
}

impl ScenarioGenerator {
    pub fn new(count: SequenceId) -> Self {
        Self { next_id: 1, count }
    }
}

impl Iterator for ScenarioGenerator {
    type Item = Scenario;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_id > self.count {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let category = Category::ALL[id as usize % Category::ALL.len()];
        let amount = Amount::from_minor(1_000 + (id as i64 * 737) % 50_000);
        Some(Scenario::new(id, format!("scenario {id}"), amount, category.key(), "noon"))
    }
}

fn bench_compute_footprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_footprint");

    for category in Category::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(category.key()),
            &category,
            |b, category| {
                b.iter(|| {
                    carbon_sim::compute_footprint(
                        black_box(Amount::from_float(249.25)),
                        black_box(category.key()),
                    )
                });
            },
        );
    }

    group.bench_function("unknown_category", |b| {
        b.iter(|| {
            carbon_sim::compute_footprint(
                black_box(Amount::from_whole(150)),
                black_box("bookstore"),
            )
        });
    });

    group.finish();
}

/// Play every scenario: commit what fits, cancel the rest.
async fn play(mut simulator: Simulator) -> Simulator {
    simulator.open();
    while let Some(id) = simulator.current_scenario().map(|s| s.sequence_id) {
        let _ = simulator.submit(id);
        match simulator.session().and_then(|s| s.modal.kind()) {
            Some(ModalKind::BudgetExceeded) => {
                let _ = simulator.cancel_exceeded_transaction();
            }
            _ => simulator.settle().await,
        }
    }
    simulator
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    let config = SimulatorConfig::default().with_commit_delay(Duration::ZERO);

    group.bench_function("default_day", |b| {
        b.iter(|| {
            let simulator = Simulator::new(config.clone(), default_scenarios());
            black_box(runtime.block_on(play(simulator)))
        });
    });

    for count in [100u32, 1_000] {
        let scenarios: Vec<_> = ScenarioGenerator::new(count).collect();
        let config = config
            .clone()
            .with_daily_budget(Amount::from_whole(count as i64 * 200));

        group.bench_with_input(BenchmarkId::from_parameter(count), &scenarios, |b, scenarios| {
            b.iter(|| {
                let simulator = Simulator::new(config.clone(), scenarios.clone());
                black_box(runtime.block_on(play(simulator)))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_footprint, bench_session);
criterion_main!(benches);
