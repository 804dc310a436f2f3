use kira_initsens::analysis::Array4;
use kira_initsens::analysis::coefficients::{compute_coefficients, sensitivity};

const RATE: f64 = 1.01;

#[test]
fn one_percent_response_gives_unit_coefficient() {
    let c = sensitivity(Some(2.0), Some(2.02), RATE).unwrap();
    assert!((c - 1.0).abs() < 1e-9);
}

#[test]
fn coefficient_matches_log_ratio() {
    let c = sensitivity(Some(4.0), Some(3.0), RATE).unwrap();
    let expected = (3.0f64 / 4.0).ln() / RATE.ln();
    assert!((c - expected).abs() < 1e-12);
}

#[test]
fn undefined_operands_give_sentinel() {
    assert_eq!(sensitivity(None, Some(1.0), RATE), None);
    assert_eq!(sensitivity(Some(1.0), None, RATE), None);
    assert_eq!(sensitivity(Some(0.0), Some(1.0), RATE), None);
    assert_eq!(sensitivity(Some(0.0), Some(0.0), RATE), None);
}

#[test]
fn collapsed_perturbed_metric_gives_sentinel() {
    assert_eq!(sensitivity(Some(1.0), Some(0.0), RATE), None);
    assert_eq!(sensitivity(Some(1.0), Some(-1.0), RATE), None);
}

#[test]
fn perturbation_axis_drops_baseline_slot() {
    // 3 parameter sets, 2 perturbed species + baseline, 2 observables, 2 conditions
    let mut metrics = Array4::new([3, 3, 2, 2]);
    for i in 0..3 {
        for k in 0..2 {
            for l in 0..2 {
                metrics.set(i, 2, k, l, Some(10.0));
                metrics.set(i, 0, k, l, Some(10.1));
                metrics.set(i, 1, k, l, Some(10.0));
            }
        }
    }
    let sc = compute_coefficients(&metrics, &[0, 4], RATE, 2).unwrap();
    assert_eq!(sc.shape(), [3, 2, 2, 2]);
    assert_eq!(sc.missing(), 0);
    for i in 0..3 {
        assert!((sc.get(i, 0, 1, 1).unwrap() - 1.0).abs() < 1e-9);
        assert!(sc.get(i, 1, 0, 0).unwrap().abs() < 1e-12);
    }
}

#[test]
fn missing_cells_propagate() {
    let mut metrics = Array4::new([1, 3, 1, 2]);
    metrics.set(0, 2, 0, 0, Some(1.0));
    metrics.set(0, 0, 0, 0, Some(1.01));
    // slot 1 never simulated; condition 1 has no baseline
    metrics.set(0, 0, 0, 1, Some(1.0));
    metrics.set(0, 1, 0, 1, Some(1.0));
    let sc = compute_coefficients(&metrics, &[0, 1], RATE, 2).unwrap();
    assert!(sc.get(0, 0, 0, 0).is_some());
    assert_eq!(sc.get(0, 1, 0, 0), None);
    assert_eq!(sc.get(0, 0, 0, 1), None);
    assert_eq!(sc.get(0, 1, 0, 1), None);
}

#[test]
fn baseline_slot_need_not_be_last() {
    let mut metrics = Array4::new([1, 2, 1, 1]);
    metrics.set(0, 0, 0, 0, Some(5.0));
    metrics.set(0, 1, 0, 0, Some(5.05));
    let sc = compute_coefficients(&metrics, &[3], RATE, 0).unwrap();
    assert_eq!(sc.shape(), [1, 1, 1, 1]);
    assert!((sc.get(0, 0, 0, 0).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn shape_and_rate_are_validated() {
    let metrics = Array4::new([1, 3, 1, 1]);
    assert!(compute_coefficients(&metrics, &[0], RATE, 2).is_err());
    assert!(compute_coefficients(&metrics, &[0, 1], RATE, 3).is_err());
    assert!(compute_coefficients(&metrics, &[0, 1], 1.0, 2).is_err());
    assert!(compute_coefficients(&metrics, &[0, 1], -1.01, 2).is_err());
}
