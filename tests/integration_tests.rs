use std::io::Write;
use std::process::{Command, Stdio};

use nestedbars::config::{ChartConfig, PlotsPerRow};
use nestedbars::table::{StdMode, Table};

const SAMPLE_CSV: &str = "\
cell_line,task,model,score
HelaS3,enhancers,cnn,0.82
HelaS3,enhancers,cnn,0.84
HelaS3,enhancers,mlp,0.71
HelaS3,enhancers,mlp,0.73
HelaS3,promoters,cnn,0.91
HelaS3,promoters,cnn,0.93
HelaS3,promoters,mlp,0.66
HelaS3,promoters,mlp,0.64
GM12878,enhancers,cnn,0.79
GM12878,enhancers,cnn,0.77
GM12878,enhancers,mlp,0.69
GM12878,enhancers,mlp,0.67
GM12878,promoters,cnn,0.88
GM12878,promoters,cnn,0.86
GM12878,promoters,mlp,0.61
GM12878,promoters,mlp,0.63
";

/// Helper to run the binary with CSV piped on stdin.
fn run_nestedbars(extra_args: &[&str], csv_content: &str) -> Result<(), String> {
    let mut child = Command::new("cargo")
        .args(["run", "--bin", "nestedbars", "--"])
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn sample_table(index_columns: &[&str]) -> Table {
    let mut lines = SAMPLE_CSV.lines();
    let headers: Vec<String> = lines
        .next()
        .unwrap()
        .split(',')
        .map(str::to_string)
        .collect();
    let records: Vec<Vec<String>> = lines
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect();
    let index_columns: Vec<String> = index_columns.iter().map(|s| s.to_string()).collect();
    Table::from_records(&headers, &records, &index_columns, "score", StdMode::Auto).unwrap()
}

#[test]
fn test_library_end_to_end_vertical() {
    let table = sample_table(&["cell_line", "task", "model"]);
    assert_eq!(table.depth(), 3);
    assert_eq!(table.len(), 8);

    let config = ChartConfig {
        data_label: Some("score".to_string()),
        ..Default::default()
    };
    let png_bytes = nestedbars::render_chart(&table, &config).unwrap();
    assert!(is_valid_png(&png_bytes));
}

#[test]
fn test_library_end_to_end_subplots_horizontal() {
    let table = sample_table(&["cell_line", "task", "model"]);
    let config = ChartConfig {
        subplots: true,
        orientation: "horizontal".to_string(),
        title: Some("Accuracy by cell line".to_string()),
        ..Default::default()
    };
    let png_bytes = nestedbars::render_chart(&table, &config).unwrap();
    assert!(is_valid_png(&png_bytes));
}

#[test]
fn test_library_save_to_nested_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plots/scores.png");
    let table = sample_table(&["task", "model"]);
    nestedbars::save_chart(&table, &ChartConfig::default(), &path).unwrap();
    let written = std::fs::read(&path).unwrap();
    assert!(is_valid_png(&written));
}

#[test]
fn test_aggregation_computes_mean_and_std() {
    let table = sample_table(&["task", "model"]);
    // Lexicographic key order: (enhancers, cnn) first.
    let first = &table.rows()[0];
    assert_eq!(first.key, vec!["enhancers", "cnn"]);
    // cnn enhancers samples: 0.82, 0.84, 0.79, 0.77
    assert!((first.measurement.value - 0.805).abs() < 1e-9);
    assert!(first.measurement.uncertainty > 0.0);
}

#[test]
fn test_config_errors_surface() {
    let table = sample_table(&["task", "model"]);

    let config = ChartConfig {
        orientation: "diagonal".to_string(),
        ..Default::default()
    };
    assert!(nestedbars::render_chart(&table, &config).is_err());

    let config = ChartConfig {
        plots_per_row: PlotsPerRow::Keyword("some".to_string()),
        ..Default::default()
    };
    assert!(nestedbars::render_chart(&table, &config).is_err());

    let single = sample_table(&["model"]);
    let config = ChartConfig {
        subplots: true,
        ..Default::default()
    };
    assert!(nestedbars::render_chart(&single, &config).is_err());
}

#[test]
fn test_end_to_end_cli_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("chart.png");
    let output_arg = output.to_str().unwrap();

    let result = run_nestedbars(
        &[
            "--group-by",
            "cell_line,task,model",
            "--value",
            "score",
            "--output",
            output_arg,
            "--subplots",
            "--title",
            "Benchmark",
        ],
        SAMPLE_CSV,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png_bytes = std::fs::read(&output).unwrap();
    assert!(is_valid_png(&png_bytes));
}

#[test]
fn test_end_to_end_cli_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("chart.png");

    let result = run_nestedbars(
        &[
            "--group-by",
            "nonexistent",
            "--value",
            "score",
            "--output",
            output.to_str().unwrap(),
        ],
        SAMPLE_CSV,
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("not found"));
}
