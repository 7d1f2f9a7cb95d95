use crate::config::RunConfig;
use crate::data::{self, Candle};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ExportPaths {
    pub csv: PathBuf,
    pub summary: PathBuf,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    exported_at: String,
    symbol: &'static str,
    config: &'a RunConfig,
    metrics: data::ModelMetrics,
    rows: usize,
}

/// Writes the mock actual-vs-predicted series as CSV plus a JSON summary of
/// the active configuration. The one genuinely fallible operation in the
/// dashboard.
pub fn export_dashboard(
    config: &RunConfig,
    history: &[Candle],
    dir: &Path,
) -> Result<ExportPaths> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating export directory {}", dir.display()))?;

    let csv_path = dir.join("tsla_predictions.csv");
    let summary_path = dir.join("tsla_run_summary.json");

    write_predictions_csv(&csv_path, history)?;
    write_summary_json(&summary_path, config, history.len())?;

    info!(
        csv = %csv_path.display(),
        summary = %summary_path.display(),
        "exported dashboard artifacts"
    );

    Ok(ExportPaths { csv: csv_path, summary: summary_path })
}

fn write_predictions_csv(path: &Path, history: &[Candle]) -> Result<()> {
    let closes: Vec<f64> = history.iter().map(|c| c.close).collect();
    let predicted = data::predicted_closes(&closes);

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut w = std::io::BufWriter::new(file);

    writeln!(w, "date,actual_close,predicted_close")?;
    for (candle, predicted) in history.iter().zip(predicted.iter()) {
        writeln!(w, "{},{:.2},{:.2}", candle.date, candle.close, predicted)?;
    }
    w.flush()?;
    Ok(())
}

fn write_summary_json(path: &Path, config: &RunConfig, rows: usize) -> Result<()> {
    let summary = RunSummary {
        exported_at: chrono::Utc::now().to_rfc3339(),
        symbol: crate::config::SYMBOL,
        config,
        metrics: data::MODEL_METRICS,
        rows,
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelKind;

    fn temp_export_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stockcast-export-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_export_writes_csv_and_summary() {
        let dir = temp_export_dir("basic");
        let mut config = RunConfig::default();
        config.set_model(ModelKind::Forest);
        let history = data::mock_history(30);

        let paths = export_dashboard(&config, &history, &dir).unwrap();

        let csv = std::fs::read_to_string(&paths.csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,actual_close,predicted_close"));
        assert_eq!(lines.count(), history.len());

        let summary = std::fs::read_to_string(&paths.summary).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed["symbol"], "TSLA");
        assert_eq!(parsed["rows"], history.len());
        assert_eq!(parsed["config"]["model"], "forest");
        assert_eq!(parsed["config"]["n_estimators"], "100");
        assert_eq!(parsed["metrics"]["r2"], 0.9234);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = temp_export_dir("nested").join("deeper");
        let config = RunConfig::default();
        let history = data::mock_history(5);

        let paths = export_dashboard(&config, &history, &dir).unwrap();
        assert!(paths.csv.exists());
        assert!(paths.summary.exists());

        std::fs::remove_dir_all(dir.parent().unwrap()).ok();
    }
}
