//! Integration tests for the pipeline driver.

use courtside::{Pipeline, PipelineConfig, PipelineOutcome, PipelineStage};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn combined_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../crates/courtside-processing/tests/fixtures/combined_totals.csv")
}

fn config_in(dir: &Path, data_file: PathBuf) -> PipelineConfig {
    PipelineConfig::builder()
        .data_file(data_file)
        .plots_dir(dir.join("plots"))
        .report_path(dir.join("nba_pipeline_report.pdf"))
        .output_dir(dir)
        .log_file(None)
        .build()
        .unwrap()
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn test_run_without_input_aborts_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), dir.path().join("nba_combined_totals_cleaned.csv"));

    let outcome = Pipeline::builder().config(config).build().unwrap().run().unwrap();

    assert!(!outcome.is_completed());
    assert!(!dir.path().join("plots").exists());
    assert!(!dir.path().join("nba_pipeline_report.pdf").exists());
    assert!(!dir.path().join("model_comparison_summary.csv").exists());
}

#[test]
fn test_config_file_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pipeline.json");
    let missing = dir.path().join("elsewhere.csv");
    fs::write(
        &config_path,
        serde_json::json!({
            "data_file": missing,
            "output_dir": dir.path(),
            "log_file": null,
        })
        .to_string(),
    )
    .unwrap();

    let config = PipelineConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.data_file, missing);
    assert_eq!(config.log_file, None);

    let PipelineOutcome::Aborted { reason } = Pipeline::builder().config(config).build().unwrap().run().unwrap()
    else {
        panic!("expected an aborted run");
    };
    assert!(reason.contains("elsewhere.csv"));
}

#[test]
fn test_full_run_on_combined_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), combined_fixture());
    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stages);

    let outcome = Pipeline::builder()
        .config(config)
        .on_progress(move |u| {
            let mut seen = sink.lock().unwrap();
            if seen.last() != Some(&u.stage) {
                seen.push(u.stage);
            }
        })
        .build()
        .unwrap()
        .run()
        .unwrap();

    let PipelineOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.rows_loaded, 60);
    assert_eq!(summary.rows_prepared, 54);
    assert_eq!(summary.rows_charted, summary.rows_prepared);
    assert_eq!(summary.test_rows, 11);
    assert_eq!(summary.charts.len(), 4);
    assert_eq!(summary.report.page_count(), 4);
    assert_eq!(summary.comparison[0].name, "RandomForest");

    assert_eq!(
        *stages.lock().unwrap(),
        vec![
            PipelineStage::CheckInput,
            PipelineStage::Prepare,
            PipelineStage::Train,
            PipelineStage::Visualize,
            PipelineStage::Report,
            PipelineStage::Done,
        ]
    );

    for name in [
        "pipeline_summary.json",
        "model_comparison_summary.csv",
        "randomforest_model.json",
        "linearregression_model.json",
        "nba_pipeline_report.pdf",
    ] {
        assert!(dir.path().join(name).exists(), "{name} written");
    }
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("pipeline_summary.json")).unwrap()).unwrap();
    assert_eq!(written["rows_prepared"], 54);
}

#[test]
fn test_charts_exclude_rows_dropped_before_training() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("combined.csv");
    // Best shooter in the table, but with no three-point percentage.
    let mut csv = fs::read_to_string(combined_fixture()).unwrap();
    csv.push_str("99,Player 99,DEN,70,2000,450,500,.900,0,0,,100,150,.667,700,100,40,120,1000,2024\n");
    fs::write(&data_file, csv).unwrap();

    let outcome = Pipeline::builder()
        .config(config_in(dir.path(), data_file))
        .build()
        .unwrap()
        .run()
        .unwrap();

    let PipelineOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.rows_loaded, 61);
    assert_eq!(summary.rows_prepared, 54);
    assert_eq!(summary.rows_charted, 54);

    let fg = summary
        .charts
        .iter()
        .find(|chart| chart.title == "Top 10 Field Goal Percentage")
        .expect("field goal chart drawn");
    assert_eq!(fg.entries.len(), 10);
    assert!(fg.entries[0].value < 0.9);
    for chart in &summary.charts {
        assert!(
            chart.entries.iter().all(|entry| entry.player != "Player 99"),
            "{} charts a row the models never saw",
            chart.title
        );
    }
}
