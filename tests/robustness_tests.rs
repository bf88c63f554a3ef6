use placement_genetics::constraints::is_feasible;
use placement_genetics::geometry::{Point, Polygon};
use placement_genetics::{Error, GeneticSolver, InputBuilding, SelectionKind, SolverParams};

fn square_site(side: f32) -> Polygon {
    Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(side, 0.0),
        Point::new(side, side),
        Point::new(0.0, side),
    ])
}

fn small_params() -> SolverParams {
    SolverParams {
        mutation_rate: 0.2,
        population_size: 6,
        num_generations: 3,
        tournament_size: 3,
        keep_prev: 3,
        flood_penalty: 0.0,
        landslide_penalty: 0.0,
        distance_weight: 1.0,
        local_search: false,
        selection: SelectionKind::Tournament,
    }
}

fn two_buildings() -> (Vec<InputBuilding>, Vec<Vec<f32>>) {
    (
        vec![InputBuilding::new(10.0, 10.0), InputBuilding::new(10.0, 10.0)],
        vec![vec![0.0, 1.0], vec![1.0, 0.0]],
    )
}

fn infeasible_reason(err: Error) -> String {
    match err {
        Error::InfeasibleInput { reason } => reason,
        other => panic!("expected InfeasibleInput, got {:?}", other),
    }
}

// ============================================================================
// Degenerate inputs rejected at entry
// ============================================================================

#[test]
fn test_empty_building_list_is_rejected() {
    let mut solver = GeneticSolver::with_seed(1);
    let err = solver
        .generate_solutions(&[], &square_site(100.0), &[], &[], &[], &small_params())
        .unwrap_err();
    assert!(infeasible_reason(err).contains("no buildings"));
}

#[test]
fn test_degenerate_site_polygon_is_rejected() {
    let (buildings, flows) = two_buildings();
    let site = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    let mut solver = GeneticSolver::with_seed(1);
    let err = solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &small_params())
        .unwrap_err();
    assert!(infeasible_reason(err).contains("3 vertices"));
}

#[test]
fn test_zero_area_site_is_rejected() {
    let (buildings, flows) = two_buildings();
    let site = Polygon::new(vec![
        Point::new(5.0, 0.0),
        Point::new(5.0, 10.0),
        Point::new(5.0, 20.0),
    ]);
    let mut solver = GeneticSolver::with_seed(1);
    let err = solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &small_params())
        .unwrap_err();
    assert!(infeasible_reason(err).contains("zero area"));
}

#[test]
fn test_zero_population_is_rejected() {
    let (buildings, flows) = two_buildings();
    let mut params = small_params();
    params.population_size = 0;
    params.keep_prev = 0;
    let mut solver = GeneticSolver::with_seed(1);
    let err = solver
        .generate_solutions(&buildings, &square_site(100.0), &flows, &[], &[], &params)
        .unwrap_err();
    assert!(infeasible_reason(err).contains("population"));
}

#[test]
fn test_keep_prev_larger_than_population_is_rejected() {
    let (buildings, flows) = two_buildings();
    let mut params = small_params();
    params.keep_prev = params.population_size + 1;
    let mut solver = GeneticSolver::with_seed(1);
    let err = solver
        .generate_solutions(&buildings, &square_site(100.0), &flows, &[], &[], &params)
        .unwrap_err();
    assert!(infeasible_reason(err).contains("keep_prev"));
}

// ============================================================================
// The retry budget turns hopeless sampling into an error
// ============================================================================

#[test]
fn test_building_that_cannot_fit_surfaces_as_infeasible() {
    let buildings = vec![InputBuilding::new(50.0, 50.0)];
    let flows = vec![vec![0.0]];
    let mut solver = GeneticSolver::with_seed(1);
    let err = solver
        .generate_solutions(&buildings, &square_site(10.0), &flows, &[], &[], &small_params())
        .unwrap_err();
    assert!(matches!(err, Error::InfeasibleInput { .. }));
}

// ============================================================================
// Parameter extremes
// ============================================================================

#[test]
fn test_zero_mutation_rate_runs_clean() {
    let (buildings, flows) = two_buildings();
    let site = square_site(100.0);
    let mut params = small_params();
    params.mutation_rate = 0.0;
    let mut solver = GeneticSolver::with_seed(11);
    let snapshots = solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &params)
        .expect("run should succeed");
    for snapshot in &snapshots {
        for sol in snapshot {
            assert!(is_feasible(sol, &site, &buildings));
        }
    }
}

#[test]
fn test_full_mutation_rate_runs_clean() {
    let (buildings, flows) = two_buildings();
    let site = square_site(100.0);
    let mut params = small_params();
    params.mutation_rate = 1.0;
    let mut solver = GeneticSolver::with_seed(12);
    let snapshots = solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &params)
        .expect("run should succeed");
    for snapshot in &snapshots {
        for sol in snapshot {
            assert!(is_feasible(sol, &site, &buildings));
        }
    }
}

#[test]
fn test_keeping_the_whole_population_freezes_the_best() {
    let (buildings, flows) = two_buildings();
    let site = square_site(100.0);
    let mut params = small_params();
    params.keep_prev = params.population_size;
    let mut solver = GeneticSolver::with_seed(13);
    let snapshots = solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &params)
        .expect("run should succeed");
    assert_eq!(snapshots.len(), params.num_generations + 1);

    // With no offspring slots the population never changes, so the best
    // statistic is flat across every generation.
    let best = solver.recent_run_best_fitnesses();
    for window in best.windows(2) {
        assert!(
            (window[0] - window[1]).abs() < 1e-3,
            "best fitness moved without offspring: {:?}",
            best
        );
    }
}

#[test]
fn test_statistics_reset_between_runs() {
    let (buildings, flows) = two_buildings();
    let site = square_site(100.0);
    let params = small_params();
    let mut solver = GeneticSolver::with_seed(21);

    solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &params)
        .expect("first run");
    let first_len = solver.recent_run_best_fitnesses().len();

    let mut second_params = params.clone();
    second_params.num_generations = 1;
    solver
        .generate_solutions(&buildings, &site, &flows, &[], &[], &second_params)
        .expect("second run");

    assert_eq!(first_len, 4);
    assert_eq!(
        solver.recent_run_best_fitnesses().len(),
        2,
        "statistics from the previous run must be cleared"
    );
}
