use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tariffstat"))
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("tariffstat_run_{}_{}_{}", std::process::id(), nanos, name))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn run_writes_every_configured_output() {
    let config = fixture_path("analysis.yaml");
    let out_dir = tmp_dir("full");

    let out = run(&[
        "run",
        "--config",
        config.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "run should succeed, stderr={}", String::from_utf8_lossy(&out.stderr));

    for f in ["results.json", "trends.json", "employment_trends.svg", "summary.csv", "panel.csv"] {
        assert!(out_dir.join(f).exists(), "missing output {f}");
    }

    let results: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out_dir.join("results.json")).unwrap()).unwrap();
    assert_eq!(results["schema_version"], "tariffstat_results_v0");
    assert_eq!(results["alpha"], 0.05);
    assert_eq!(results["specification"]["include_interaction"], true);
    assert_eq!(results["load_report"]["skipped"].as_array().unwrap().len(), 0);

    let models = results["models"].as_array().unwrap();
    let outcomes: Vec<&str> = models.iter().map(|m| m["outcome"].as_str().unwrap()).collect();
    assert_eq!(outcomes, ["log_avg_monthly_employment", "log_avg_wkly_wage", "avg_wkly_wage"]);
    assert!(models[0]["effects"]["biden_interaction_pct"].as_f64().unwrap() < 0.0);
    assert!(models[2]["effects"].is_null());

    // 3 industries x 2 eras.
    assert_eq!(results["summary"]["rows"].as_array().unwrap().len(), 6);

    let trends: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out_dir.join("trends.json")).unwrap()).unwrap();
    assert_eq!(trends["schema_version"], "tariffstat_trends_v0");
    assert_eq!(trends["series"].as_array().unwrap().len(), 3);

    let svg = std::fs::read_to_string(out_dir.join("employment_trends.svg")).unwrap();
    assert!(svg.contains("Steel Tariffs Implemented"));

    // Header plus one line per quarterly row; annual rows are dropped.
    let panel_csv = std::fs::read_to_string(out_dir.join("panel.csv")).unwrap();
    assert_eq!(panel_csv.lines().count(), 1 + 288);

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn run_rejects_invalid_config() {
    let dir = tmp_dir("bad_config");
    std::fs::create_dir_all(&dir).unwrap();
    let config = dir.join("analysis.yaml");
    std::fs::write(&config, "schema_version: tariffstat_analysis_v9\ndata_dir: qcew\n").unwrap();

    let out = run(&["run", "--config", config.to_string_lossy().as_ref(), "--out-dir", dir.to_string_lossy().as_ref()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("schema_version"), "stderr={stderr}");
    assert!(!dir.join("results.json").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn run_applies_plot_viz_config() {
    let dir = tmp_dir("styled");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("viz.yaml"), "figure: { width: 720, height: 360 }\n").unwrap();
    let config = dir.join("analysis.yaml");
    std::fs::write(
        &config,
        format!(
            "schema_version: tariffstat_analysis_v0\ndata_dir: {}\nplot: {{ path: styled.svg, viz_config: viz.yaml }}\n",
            fixture_path("qcew").display()
        ),
    )
    .unwrap();

    let out_dir = dir.join("out");
    let out = run(&["run", "--config", config.to_string_lossy().as_ref(), "--out-dir", out_dir.to_string_lossy().as_ref()]);
    assert!(out.status.success(), "run should succeed, stderr={}", String::from_utf8_lossy(&out.stderr));

    let svg = std::fs::read_to_string(out_dir.join("styled.svg")).unwrap();
    assert!(svg.contains(r#"viewBox="0 0 720 360""#));

    let _ = std::fs::remove_dir_all(&dir);
}
