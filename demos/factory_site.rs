use placement_genetics::geometry::{Point, Polygon};
use placement_genetics::{GeneticSolver, InputBuilding, SelectionKind, SolverParams};

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    // An L-shaped site with a flood-prone strip along the west edge.
    let site = Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(200.0, 0.0),
        Point::new(200.0, 120.0),
        Point::new(100.0, 120.0),
        Point::new(100.0, 200.0),
        Point::new(0.0, 200.0),
    ]);
    let flood = vec![Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(30.0, 200.0),
        Point::new(0.0, 200.0),
    ])];

    let buildings = vec![
        InputBuilding::new(30.0, 20.0), // assembly hall
        InputBuilding::new(20.0, 20.0), // warehouse
        InputBuilding::new(15.0, 10.0), // office block
        InputBuilding::new(10.0, 10.0), // utilities
    ];
    let flows = vec![
        vec![0.0, 8.0, 2.0, 1.0],
        vec![8.0, 0.0, 1.0, 2.0],
        vec![2.0, 1.0, 0.0, 0.5],
        vec![1.0, 2.0, 0.5, 0.0],
    ];

    let params = SolverParams {
        mutation_rate: 0.25,
        population_size: 30,
        num_generations: 50,
        tournament_size: 4,
        keep_prev: 10,
        flood_penalty: 5000.0,
        landslide_penalty: 0.0,
        distance_weight: 1.0,
        local_search: false,
        selection: SelectionKind::Tournament,
    };

    let mut solver = GeneticSolver::with_seed(2024);
    let snapshots = solver
        .generate_solutions(&buildings, &site, &flows, &flood, &[], &params)
        .expect("placement run failed");

    let best_curve = solver.recent_run_best_fitnesses();
    println!("\nBest fitness by generation:");
    for (g, best) in best_curve.iter().enumerate().step_by(10) {
        println!("  gen {:>3}: {:>10.2}", g, best);
    }

    let final_best = &snapshots.last().expect("snapshots")[0];
    println!("\nFinal layout (fitness {:.2}):", final_best.fitness().expect("fitness"));
    println!(
        "{:<12} | {:>8} | {:>8} | {:>8}",
        "building", "x", "y", "rot"
    );
    println!("-------------------------------------------------");
    for (i, name) in ["assembly", "warehouse", "office", "utilities"]
        .iter()
        .enumerate()
    {
        println!(
            "{:<12} | {:>8.1} | {:>8.1} | {:>8.1}",
            name,
            final_best.x(i),
            final_best.y(i),
            final_best.rotation(i)
        );
    }
}
