use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use placement_genetics::geometry::{Point, Polygon};
use placement_genetics::{
    solution_fitness, GeneticSolver, InputBuilding, SelectionKind, Solution, SolverParams,
};

fn square_site(side: f32) -> Polygon {
    Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(side, 0.0),
        Point::new(side, side),
        Point::new(0.0, side),
    ])
}

fn scenario(count: usize) -> (Vec<InputBuilding>, Vec<Vec<f32>>, Solution) {
    let buildings = vec![InputBuilding::new(8.0, 6.0); count];
    let flows = vec![vec![1.0; count]; count];
    let mut sol = Solution::new(count);
    for i in 0..count {
        // A diagonal staircase keeps every pair disjoint.
        sol.set_x(i, 10.0 + 12.0 * i as f32);
        sol.set_y(i, 10.0 + 12.0 * i as f32);
        sol.set_rotation(i, (i as f32 * 15.0) % 360.0);
    }
    (buildings, flows, sol)
}

fn bench_evaluator(c: &mut Criterion) {
    let mut group = c.benchmark_group("solution_fitness");
    let hazards = vec![square_site(40.0)];

    for count in [4usize, 8, 16] {
        let (buildings, flows, sol) = scenario(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                black_box(solution_fitness(
                    black_box(&sol),
                    &buildings,
                    &flows,
                    &hazards,
                    &[],
                    1000.0,
                    500.0,
                    1.0,
                ))
            })
        });
    }
    group.finish();
}

fn bench_small_run(c: &mut Criterion) {
    let buildings = vec![
        InputBuilding::new(10.0, 10.0),
        InputBuilding::new(8.0, 6.0),
        InputBuilding::new(6.0, 6.0),
    ];
    let site = square_site(120.0);
    let flows = vec![
        vec![0.0, 2.0, 1.0],
        vec![2.0, 0.0, 3.0],
        vec![1.0, 3.0, 0.0],
    ];
    let params = SolverParams {
        mutation_rate: 0.25,
        population_size: 10,
        num_generations: 5,
        tournament_size: 3,
        keep_prev: 5,
        flood_penalty: 0.0,
        landslide_penalty: 0.0,
        distance_weight: 1.0,
        local_search: false,
        selection: SelectionKind::Tournament,
    };

    c.bench_function("generate_solutions/3x10x5", |b| {
        b.iter(|| {
            let mut solver = GeneticSolver::with_seed(42);
            black_box(
                solver
                    .generate_solutions(&buildings, &site, &flows, &[], &[], &params)
                    .expect("run"),
            )
        })
    });
}

criterion_group!(benches, bench_evaluator, bench_small_run);
criterion_main!(benches);
