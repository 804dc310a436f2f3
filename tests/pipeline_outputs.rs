use std::fs;
use std::path::Path;

use assert_cmd::Command;
use kira_initsens::pipeline::analyze;
use serde_json::Value;
use tempfile::TempDir;

fn write_model(dir: &Path, c_initial: f64) {
    let model = format!(
        r#"{{
            "name": "toy_cascade",
            "species": [
                {{"name": "A", "initial": 1.0}},
                {{"name": "B", "initial": 0.0}},
                {{"name": "C", "initial": {}}}
            ],
            "parameters": [
                {{"name": "k_on", "value": 1.0}},
                {{"name": "k_off", "value": 0.5}}
            ],
            "reactions": [
                {{"name": "activation", "reactants": {{"A": 1}}, "products": {{"B": 1}}, "rate": "k_on"}},
                {{"name": "decay", "reactants": {{"B": 1}}, "rate": "k_off"}},
                {{"name": "feed", "reactants": {{"C": 1}}, "products": {{"A": 1}}, "rate": "k_off"}}
            ],
            "observables": [
                {{"name": "B_active", "species": ["B"]}},
                {{"name": "A_total", "species": ["A"]}}
            ],
            "conditions": [
                {{"name": "EGF"}},
                {{"name": "HRG", "parameters": {{"k_on": 2.0}}}}
            ],
            "time": {{"end": 10.0, "samples": 41, "substeps": 5}}
        }}"#,
        c_initial
    );
    fs::write(dir.join("model.json"), model).unwrap();

    let out = dir.join("out");
    for (n, k_on) in [(1, 1.0), (2, 1.5)] {
        let set_dir = out.join(n.to_string());
        fs::create_dir_all(&set_dir).unwrap();
        fs::write(
            set_dir.join("params.json"),
            format!(r#"{{"parameters": {{"k_on": {}}}}}"#, k_on),
        )
        .unwrap();
    }
}

fn coeff_dir(model: &Path, metric: &str) -> std::path::PathBuf {
    model
        .join("sensitivity_coefficients")
        .join("nonzero_init")
        .join(metric)
}

fn figure_dir(model: &Path, metric: &str) -> std::path::PathBuf {
    model
        .join("figure")
        .join("sensitivity")
        .join("nonzero_init")
        .join(metric)
}

fn run_analyze(model: &Path, metric: &str, style: &str) -> String {
    let output = Command::cargo_bin("kira-initsens")
        .unwrap()
        .args([
            "analyze",
            "--model",
            model.to_str().unwrap(),
            "--metric",
            metric,
            "--style",
            style,
            "--json",
            "--tsv",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn barplot_run_writes_cache_figures_and_tables() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path();
    write_model(model, 0.5);

    let stdout = run_analyze(model, "integral", "barplot");
    assert!(stdout.contains("Coefficients: computed"));
    assert!(stdout.contains("Metric: integral, rate=1.01, style=barplot"));

    let coeff = coeff_dir(model, "integral");
    assert!(coeff.join("sc.bin").is_file());
    let figures = figure_dir(model, "integral");
    assert!(figures.join("B_active.svg").is_file());
    assert!(figures.join("A_total.svg").is_file());
    let svg = fs::read_to_string(figures.join("B_active.svg")).unwrap();
    assert!(svg.contains("<svg"));

    let report: Value =
        serde_json::from_str(&fs::read_to_string(coeff.join("report.json")).unwrap()).unwrap();
    assert_eq!(report["tool"]["name"], "kira-initsens");
    assert_eq!(report["model"]["name"], "toy_cascade");
    assert_eq!(report["analysis"]["metric"], "integral");
    assert_eq!(report["analysis"]["cache_hit"], false);
    assert_eq!(report["analysis"]["parameter_sets"], serde_json::json!([1, 2]));
    assert_eq!(report["analysis"]["nonzero_species"], serde_json::json!(["A", "C"]));
    assert_eq!(report["analysis"]["simulation_failures"], 0);
    assert_eq!(report["analysis"]["undefined_coefficients"], 0);
    // 2 species x 2 observables x 2 conditions
    assert_eq!(report["coefficients"].as_array().unwrap().len(), 8);

    let tsv = fs::read_to_string(coeff.join("sc.tsv")).unwrap();
    let mut lines = tsv.lines();
    assert_eq!(
        lines.next(),
        Some("paramset\tspecies\tobservable\tcondition\tcoefficient")
    );
    // 2 sets x 2 species x 2 observables x 2 conditions
    assert_eq!(lines.count(), 16);
    assert!(!tsv.contains("NA"));
}

#[test]
fn second_run_reuses_cached_coefficients() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path();
    write_model(model, 0.5);

    run_analyze(model, "amplitude", "barplot");
    let first = fs::read(coeff_dir(model, "amplitude").join("sc.bin")).unwrap();

    let stdout = run_analyze(model, "amplitude", "heatmap");
    assert!(stdout.contains("Coefficients: cached"));
    let second = fs::read(coeff_dir(model, "amplitude").join("sc.bin")).unwrap();
    assert_eq!(first, second);

    let report: Value = serde_json::from_str(
        &fs::read_to_string(coeff_dir(model, "amplitude").join("report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["analysis"]["cache_hit"], true);
    assert!(report["analysis"]["simulation_failures"].is_null());
}

#[test]
fn heatmap_run_writes_one_figure_per_condition_and_observable() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path();
    write_model(model, 0.5);

    let ctx = analyze(model, "duration", "heatmap").unwrap();
    assert!(!ctx.cache_hit);
    assert_eq!(ctx.figures.len(), 4);

    let heatmaps = figure_dir(model, "duration").join("heatmap");
    for name in [
        "EGF_B_active.svg",
        "EGF_A_total.svg",
        "HRG_B_active.svg",
        "HRG_A_total.svg",
    ] {
        assert!(heatmaps.join(name).is_file(), "missing {}", name);
    }
    let report = ctx.report.unwrap();
    assert_eq!(report.analysis.nonzero_species, vec!["A", "C"]);
}

#[test]
fn heatmap_with_single_nonzero_species_draws_nothing() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path();
    write_model(model, 0.0);

    let ctx = analyze(model, "amplitude", "heatmap").unwrap();
    assert!(ctx.figures.is_empty());
    assert_eq!(ctx.nonzero_idx, vec![0]);
    assert!(!ctx.warnings.is_empty());
    assert!(coeff_dir(model, "amplitude").join("sc.bin").is_file());

    let heatmaps = figure_dir(model, "amplitude").join("heatmap");
    assert_eq!(fs::read_dir(heatmaps).unwrap().count(), 0);
}

#[test]
fn invalid_style_fails_before_any_work() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path();
    write_model(model, 0.5);

    let err = analyze(model, "amplitude", "pie").unwrap_err();
    assert!(err.to_string().contains("unknown style 'pie'"));
    assert!(!coeff_dir(model, "amplitude").join("sc.bin").exists());

    let err = analyze(model, "peak_time", "barplot").unwrap_err();
    assert!(err.to_string().contains("unknown metric 'peak_time'"));
}

#[test]
fn species_command_lists_nonzero_flags() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), 0.5);

    let output = Command::cargo_bin("kira-initsens")
        .unwrap()
        .args(["species", "--model", tmp.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("0\tA\t1\tnonzero"));
    assert!(stdout.contains("1\tB\t0\tzero"));
    assert!(stdout.contains("nonzero initial conditions: 2"));
}

#[test]
fn validate_command_reports_counts() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), 0.5);

    let output = Command::cargo_bin("kira-initsens")
        .unwrap()
        .args(["validate", "--model", tmp.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("kira-initsens validate ok"));
    assert!(stdout.contains("parameter sets: 2"));
}

#[test]
fn missing_parameter_sets_fail_analysis() {
    let tmp = TempDir::new().unwrap();
    write_model(tmp.path(), 0.5);
    fs::remove_dir_all(tmp.path().join("out")).unwrap();

    let output = Command::cargo_bin("kira-initsens")
        .unwrap()
        .args([
            "analyze",
            "--model",
            tmp.path().to_str().unwrap(),
            "--metric",
            "amplitude",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn missing_model_dir_is_left_untouched() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path().join("no_such_model");

    let err = analyze(&model, "amplitude", "barplot").unwrap_err();
    assert!(err.to_string().contains("no model.json found"));
    assert!(!model.exists());
}

#[test]
fn all_zero_initial_conditions_fail_before_any_output() {
    let tmp = TempDir::new().unwrap();
    let model = tmp.path();
    fs::write(
        model.join("model.json"),
        r#"{
            "name": "empty_start",
            "species": [{"name": "A"}, {"name": "B", "initial": 0.0}],
            "parameters": [{"name": "k", "value": 1.0}],
            "reactions": [{"reactants": {"A": 1}, "products": {"B": 1}, "rate": "k"}],
            "observables": [{"name": "B", "species": ["B"]}],
            "time": {"end": 1.0, "samples": 3}
        }"#,
    )
    .unwrap();
    let set_dir = model.join("out").join("1");
    fs::create_dir_all(&set_dir).unwrap();
    fs::write(set_dir.join("params.json"), "{}").unwrap();

    let err = analyze(model, "integral", "heatmap").unwrap_err();
    assert!(err.to_string().contains("no nonzero initial conditions"));
    assert!(!coeff_dir(model, "integral").join("sc.bin").exists());
    assert!(!model.join("sensitivity_coefficients").exists());
    assert!(!model.join("figure").exists());
}
