use std::fs;
use std::path::Path;

use kira_initsens::model::{ModelDefinition, load_model};
use kira_initsens::sim::Simulator;
use tempfile::TempDir;

fn write_model(dir: &Path, json: &str) {
    fs::write(dir.join("model.json"), json).unwrap();
}

fn decay_model() -> &'static str {
    r#"{
        "name": "decay",
        "species": [
            {"name": "A", "initial": 1.0},
            {"name": "B"}
        ],
        "parameters": [
            {"name": "k", "value": 1.0}
        ],
        "reactions": [
            {"name": "loss", "reactants": {"A": 1}, "rate": "k"}
        ],
        "observables": [
            {"name": "A_total", "species": ["A"]},
            {"name": "AB", "species": ["A", "B"]}
        ],
        "conditions": [
            {"name": "slow"},
            {"name": "fast", "parameters": {"k": 2.0}}
        ],
        "time": {"end": 1.0, "samples": 11}
    }"#
}

#[test]
fn loads_model_definition() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), decay_model());
    let model = load_model(tmp.path()).unwrap();

    assert_eq!(model.name, "decay");
    assert_eq!(model.species(), ["A".to_string(), "B".to_string()]);
    assert_eq!(model.initial_values(), vec![1.0, 0.0]);
    assert_eq!(model.observables().len(), 2);
    assert_eq!(model.conditions(), ["slow".to_string(), "fast".to_string()]);
    assert_eq!(model.time.len(), 11);
    assert!((model.time[10] - 1.0).abs() < 1e-12);
    assert_eq!(model.substeps, 10);
}

#[test]
fn exponential_decay_matches_closed_form() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), decay_model());
    let model = load_model(tmp.path()).unwrap();

    let traj = model.simulate(&[1.0], &[1.0, 0.0]).unwrap();
    assert_eq!(traj.n_observables(), 2);
    assert_eq!(traj.n_conditions(), 2);
    assert_eq!(traj.time().len(), 11);

    let a_end = traj.get(0, 10, 0);
    assert!((a_end - (-1.0f64).exp()).abs() < 1e-6);
    // the "fast" condition overrides k
    let a_fast = traj.get(0, 10, 1);
    assert!((a_fast - (-2.0f64).exp()).abs() < 1e-6);
    // B is never produced, so the summed observable equals A
    assert!((traj.get(1, 5, 0) - traj.get(0, 5, 0)).abs() < 1e-15);
}

#[test]
fn scales_with_initial_value() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), decay_model());
    let model = load_model(tmp.path()).unwrap();

    let base = model.simulate(&[1.0], &[1.0, 0.0]).unwrap();
    let pert = model.simulate(&[1.0], &[1.01, 0.0]).unwrap();
    let ratio = pert.get(0, 7, 0) / base.get(0, 7, 0);
    assert!((ratio - 1.01).abs() < 1e-9);
}

#[test]
fn runaway_growth_reports_failure() {
    let tmp = TempDir::new().unwrap();
    write_model(
        tmp.path(),
        r#"{
            "name": "blowup",
            "species": [{"name": "A", "initial": 1.0}],
            "parameters": [{"name": "k", "value": 10.0}],
            "reactions": [{"reactants": {"A": 2}, "products": {"A": 3}, "rate": "k"}],
            "observables": [{"name": "A", "species": ["A"]}],
            "time": {"end": 2.0, "samples": 5}
        }"#,
    );
    let model = load_model(tmp.path()).unwrap();
    assert_eq!(model.conditions(), ["control".to_string()]);

    let err = model.simulate(&[10.0], &[1.0]).unwrap_err();
    assert!(format!("{:#}", err).contains("diverged"));
}

#[test]
fn parameter_vector_length_is_checked() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), decay_model());
    let model = load_model(tmp.path()).unwrap();
    assert!(model.simulate(&[1.0, 2.0], &[1.0, 0.0]).is_err());
}

#[test]
fn unknown_species_reference_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write_model(
        tmp.path(),
        r#"{
            "name": "broken",
            "species": [{"name": "A", "initial": 1.0}],
            "parameters": [{"name": "k", "value": 1.0}],
            "reactions": [{"name": "bind", "reactants": {"A": 1, "Z": 1}, "rate": "k"}],
            "observables": [{"name": "A", "species": ["A"]}],
            "time": {"end": 1.0, "samples": 3}
        }"#,
    );
    let err = load_model(tmp.path()).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("'bind' references unknown species 'Z'"), "{}", msg);
}

#[test]
fn duplicate_species_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write_model(
        tmp.path(),
        r#"{
            "name": "dup",
            "species": [{"name": "A"}, {"name": "A"}],
            "observables": [{"name": "A", "species": ["A"]}],
            "time": {"end": 1.0, "samples": 3}
        }"#,
    );
    let msg = format!("{:#}", load_model(tmp.path()).unwrap_err());
    assert!(msg.contains("duplicate species 'A'"));
}

#[test]
fn time_grid_is_validated() {
    let tmp = TempDir::new().unwrap();
    write_model(
        tmp.path(),
        r#"{
            "name": "short",
            "species": [{"name": "A", "initial": 1.0}],
            "observables": [{"name": "A", "species": ["A"]}],
            "time": {"end": 1.0, "samples": 1}
        }"#,
    );
    let msg = format!("{:#}", load_model(tmp.path()).unwrap_err());
    assert!(msg.contains("samples"));
}

#[test]
fn missing_model_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let msg = format!("{:#}", load_model(tmp.path()).unwrap_err());
    assert!(msg.contains("model.json"));
}

#[test]
fn style_block_is_read() {
    let tmp = TempDir::new().unwrap();
    write_model(
        tmp.path(),
        r#"{
            "name": "styled",
            "species": [{"name": "A_p", "initial": 1.0}],
            "observables": [{"name": "A", "species": ["A_p"]}],
            "time": {"end": 1.0, "samples": 3},
            "sensitivity_style": {
                "width": 800,
                "species_labels": {"A_p": "pA"}
            }
        }"#,
    );
    let model = load_model(tmp.path()).unwrap();
    assert_eq!(model.style.width, 800);
    assert_eq!(model.species_label(0), "pA");
}

#[test]
fn trajectories_index_by_observable_time_condition() {
    use kira_initsens::sim::Trajectories;

    let traj = Trajectories::from_series(
        vec![0.0, 1.0],
        vec![
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0, 6.0], vec![7.0, 8.0]],
        ],
    )
    .unwrap();
    assert_eq!(traj.n_observables(), 2);
    assert_eq!(traj.n_conditions(), 2);
    assert_eq!(traj.get(1, 0, 1), 7.0);
    assert_eq!(traj.series(0, 1), &[3.0, 4.0]);

    let ragged = Trajectories::from_series(vec![0.0, 1.0], vec![vec![vec![1.0]]]);
    assert!(ragged.is_err());
}
