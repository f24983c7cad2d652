use std::cell::Cell;
use std::time::Duration;

use rand::Rng;

use genetic_ik::real_vector::{euclidean, BallGoal, RealVectorSpace};
use genetic_ik::{
    Gaik, GaikConfig, GoalRegion, LocalSearch, Phase, StateSpace, ValidityPolicy,
};

fn square(half_width: f64) -> RealVectorSpace {
    RealVectorSpace::new(vec![(-half_width, half_width), (-half_width, half_width)]).unwrap()
}

fn small_config(seed: u64) -> GaikConfig {
    GaikConfig {
        pool_size: 10,
        pool_expansion: 5,
        seed: Some(seed),
        ..GaikConfig::default()
    }
}

#[test]
fn test_finds_valid_state_near_target_from_single_hint() {
    let target = vec![0.0, 0.0];
    let center = target.clone();
    let space = square(3.0).with_validity(move |s: &Vec<f64>| euclidean(s, &center) <= 1.0);
    let goal = BallGoal::new(target, 0.0, 0.1);
    let hint = vec![0.5, 0.0];
    assert!((goal.distance_goal(&hint).unwrap() - 0.5).abs() < 1e-12);

    let solver = Gaik::with_config(space, small_config(42)).unwrap();
    let report = solver
        .solve_with_report(Duration::from_secs(5), &goal, &[hint])
        .unwrap();

    assert!(report.solved, "no solution after {} generations", report.generations);
    assert_eq!(report.phase, Phase::Converged);
    let best = report.best.as_ref().unwrap();
    assert!(best.is_valid());
    assert!(best.distance() < 0.1);
    assert!(solver.space().is_valid(best.state()).unwrap());
}

#[test]
fn test_infeasible_region_fails_after_budget() {
    let space = square(1.0).with_validity(|_| false);
    let goal = BallGoal::new(vec![10.0, 10.0], 0.0, 0.1);
    let config = GaikConfig {
        max_stagnant_generations: usize::MAX,
        ..small_config(1)
    };
    let solver = Gaik::with_config(space, config).unwrap();
    let budget = Duration::from_millis(100);

    let report = solver
        .solve_with_report(budget, &goal, &[vec![0.0, 0.0]])
        .unwrap();

    assert!(!report.solved);
    assert_eq!(report.phase, Phase::TimedOut);
    assert!(report.elapsed >= budget);
    let best = report.best.as_ref().unwrap();
    assert!(!best.is_valid());
    assert!(report.into_solution().is_none());

    let solution = solver.solve(budget, &goal, &[vec![0.0, 0.0]]).unwrap();
    assert!(solution.is_none());
}

#[test]
fn test_budget_overrun_is_bounded() {
    let goal = BallGoal::new(vec![10.0, 10.0], 0.0, 0.1);
    let budget = Duration::from_millis(50);

    for (pool_size, pool_expansion) in [(1, 1), (10, 5), (80, 100), (200, 400)] {
        let config = GaikConfig {
            pool_size,
            pool_expansion,
            max_stagnant_generations: usize::MAX,
            seed: Some(3),
            ..GaikConfig::default()
        };
        let solver = Gaik::with_config(square(1.0), config).unwrap();

        let report = solver.solve_with_report(budget, &goal, &[]).unwrap();

        assert_eq!(report.phase, Phase::TimedOut);
        assert!(
            report.elapsed < budget + Duration::from_secs(2),
            "pool {}/{} took {:?}",
            pool_size,
            pool_expansion,
            report.elapsed
        );
    }
}

#[test]
fn test_ignored_validity_optimizes_distance_only() {
    let space = square(2.0).with_validity(|_| false);
    let goal = BallGoal::new(vec![1.0, -1.0], 0.0, 0.05);
    let config = GaikConfig {
        validity: ValidityPolicy::Ignored,
        ..small_config(5)
    };
    let solver = Gaik::with_config(space, config).unwrap();

    let report = solver
        .solve_with_report(Duration::from_secs(5), &goal, &[vec![-1.0, 1.0]])
        .unwrap();

    assert!(report.solved);
    assert!(report.history.iter().all(|g| g.best_valid && g.valid_count == g.pool_size));
    for pair in report.history.windows(2) {
        assert!(pair[1].best_distance <= pair[0].best_distance);
    }
}

#[test]
fn test_checked_validity_settles_for_closest_valid_state() {
    // The whole goal ball lies inside an obstacle.
    let space = square(2.0).with_validity(|s: &Vec<f64>| euclidean(s, &[1.0, 1.0]) > 0.5);
    let goal = BallGoal::new(vec![1.0, 1.0], 0.0, 0.1);
    let config = GaikConfig {
        max_stagnant_generations: 30,
        ..small_config(8)
    };
    let solver = Gaik::with_config(space, config).unwrap();

    let report = solver
        .solve_with_report(Duration::from_millis(300), &goal, &[vec![1.0, 1.0]])
        .unwrap();

    assert!(report.solved);
    assert_ne!(report.phase, Phase::Converged);
    let best = report.best.as_ref().unwrap();
    assert!(best.is_valid());
    assert!(best.distance() > 0.1);
    assert!(solver.space().is_valid(best.state()).unwrap());

    let solution = report.into_solution().unwrap();
    assert!(euclidean(&solution, &[1.0, 1.0]) > 0.5);
}

#[test]
fn test_ignored_validity_accepts_unreachable_goal() {
    let space = square(1.0).with_validity(|_| false);
    let goal = BallGoal::new(vec![5.0, 0.0], 0.0, 0.1);
    let config = GaikConfig {
        validity: ValidityPolicy::Ignored,
        max_stagnant_generations: 20,
        ..small_config(4)
    };
    let solver = Gaik::with_config(space, config).unwrap();

    let report = solver
        .solve_with_report(Duration::from_millis(200), &goal, &[vec![0.0, 0.0]])
        .unwrap();

    assert!(report.solved);
    let best = report.best.as_ref().unwrap();
    assert!(best.is_valid());
    assert!(best.distance() > 0.1);
    assert!(solver.solve(Duration::from_millis(50), &goal, &[vec![0.0, 0.0]]).unwrap().is_some());
}

#[test]
fn test_valid_unreachable_goal_is_best_effort_success() {
    let goal = BallGoal::new(vec![5.0, 0.0], 0.0, 0.1);
    let config = GaikConfig {
        max_stagnant_generations: 20,
        ..small_config(6)
    };
    let solver = Gaik::with_config(square(1.0), config).unwrap();

    let report = solver
        .solve_with_report(Duration::from_millis(200), &goal, &[vec![0.0, 0.0]])
        .unwrap();

    assert!(report.solved);
    let best = report.best.as_ref().unwrap();
    assert!(best.is_valid());
    assert!(best.distance() < 5.0);
}

/// Local search that never moves but counts how often it was asked.
struct CountingSearch {
    calls: Cell<usize>,
}

impl<Sp: StateSpace> LocalSearch<Sp> for CountingSearch {
    fn improve<G, R>(
        &self,
        _space: &Sp,
        _goal: &G,
        _state: &mut Sp::State,
        _near_distance: f64,
        _max_steps: u32,
        _validity: ValidityPolicy,
        _rng: &mut R,
    ) -> anyhow::Result<bool>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        self.calls.set(self.calls.get() + 1);
        Ok(false)
    }
}

#[test]
fn test_custom_local_search_is_used_each_generation() {
    let goal = BallGoal::new(vec![10.0, 10.0], 0.0, 0.1);
    let config = GaikConfig {
        refine_count: 2,
        polish_count: 4,
        max_stagnant_generations: 3,
        ..small_config(2)
    };
    let search = CountingSearch { calls: Cell::new(0) };
    let solver = Gaik::with_local_search(square(1.0), search, config).unwrap();

    let report = solver
        .solve_with_report(Duration::from_secs(5), &goal, &[vec![0.0, 0.0]])
        .unwrap();

    assert_eq!(report.phase, Phase::Stagnated);
    assert!(report.generations >= 3);
    assert_eq!(
        solver.local_search().calls.get(),
        2 * report.generations + 4
    );
}
