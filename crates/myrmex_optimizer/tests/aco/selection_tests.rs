use myrmex_optimizer::{problem::location::LocationIdx, solver::construction::ant::select_candidate};

use crate::mock_rng::MockRng;

fn candidates(scores: &[(usize, f64)]) -> Vec<(LocationIdx, f64)> {
    scores
        .iter()
        .map(|&(customer, score)| (LocationIdx::new(customer), score))
        .collect()
}

#[test]
fn test_roulette_low_draw_skips_zero_weight() {
    let candidates = candidates(&[(1, 0.0), (2, 3.0), (3, 1.0)]);
    let mut rng = MockRng::new(vec![0]);

    assert_eq!(
        select_candidate(&candidates, 0.0, &mut rng),
        LocationIdx::new(2)
    );
}

#[test]
fn test_roulette_high_draw_takes_last() {
    let candidates = candidates(&[(1, 0.0), (2, 3.0), (3, 1.0)]);
    let mut rng = MockRng::new(vec![u64::MAX]);

    assert_eq!(
        select_candidate(&candidates, 0.0, &mut rng),
        LocationIdx::new(3)
    );
}

#[test]
fn test_exploitation_takes_best_score() {
    let candidates = candidates(&[(1, 1.0), (2, 5.0)]);
    // 0 is below q0, the best candidate is taken
    let mut rng = MockRng::new(vec![0]);

    assert_eq!(
        select_candidate(&candidates, 0.5, &mut rng),
        LocationIdx::new(2)
    );
}

#[test]
fn test_exploration_falls_back_to_roulette() {
    let candidates = candidates(&[(1, 1.0), (2, 5.0)]);
    // First draw is above q0, the second one spins the wheel at its start
    let mut rng = MockRng::new(vec![u64::MAX, 0]);

    assert_eq!(
        select_candidate(&candidates, 0.5, &mut rng),
        LocationIdx::new(1)
    );
}

#[test]
fn test_nan_scores_never_win_the_wheel() {
    let candidates = candidates(&[(1, f64::NAN), (2, 2.0)]);
    let mut rng = MockRng::new(vec![0]);

    assert_eq!(
        select_candidate(&candidates, 0.0, &mut rng),
        LocationIdx::new(2)
    );
}

#[test]
fn test_infinite_score_is_drawn_by_roulette() {
    let candidates = candidates(&[(1, 1.0), (2, f64::INFINITY)]);

    for draw in [0, u64::MAX / 2, u64::MAX] {
        let mut rng = MockRng::new(vec![draw]);
        assert_eq!(
            select_candidate(&candidates, 0.0, &mut rng),
            LocationIdx::new(2)
        );
    }
}

#[test]
fn test_infinite_score_wins_exploitation() {
    let candidates = candidates(&[(1, f64::INFINITY), (2, 1.0)]);
    let mut rng = MockRng::new(vec![0]);

    assert_eq!(
        select_candidate(&candidates, 1.0, &mut rng),
        LocationIdx::new(1)
    );
}

#[test]
fn test_scores_summing_past_f64_max() {
    let candidates = candidates(&[(1, 1e308), (2, 1e308)]);
    let mut low = MockRng::new(vec![0]);
    let mut high = MockRng::new(vec![u64::MAX]);

    assert_eq!(
        select_candidate(&candidates, 0.0, &mut low),
        LocationIdx::new(1)
    );
    assert_eq!(
        select_candidate(&candidates, 0.0, &mut high),
        LocationIdx::new(2)
    );
}

#[test]
fn test_all_zero_scores_fall_back_to_uniform() {
    let candidates = candidates(&[(1, 0.0), (2, f64::NAN)]);
    let mut rng = MockRng::new(vec![0]);

    let chosen = select_candidate(&candidates, 0.0, &mut rng);
    assert!(chosen == LocationIdx::new(1) || chosen == LocationIdx::new(2));
}
