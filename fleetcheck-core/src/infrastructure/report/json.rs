// fleetcheck-core/src/infrastructure/report/json.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::application::report::RunReport;
use crate::error::FleetError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, report_path};

/// Writes `<output_dir>/fleetcheck-<timestamp>.json` and returns its path.
pub fn write_json(report: &RunReport, output_dir: &Path) -> Result<PathBuf, FleetError> {
    fs::create_dir_all(output_dir)?;
    let path = report_path(output_dir, &format!("fleetcheck-{}.json", report.timestamp()))?;

    let content = serde_json::to_string_pretty(report).map_err(InfrastructureError::JsonError)?;
    atomic_write(&path, content)?;

    info!(path = ?path, "📝 JSON report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::engine::{InstanceOutcome, InstanceState, RunOutcome};
    use anyhow::Result;
    use chrono::Utc;

    #[test]
    fn test_json_document_shape() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let report = RunReport::new(RunOutcome {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            instances: vec![InstanceOutcome {
                instance: "DOWN".into(),
                state: InstanceState::Failed {
                    reason: "refused".into(),
                },
                results: Vec::new(),
            }],
        });

        let path = write_json(&report, &dir.path().join("reports"))?;
        let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;

        assert_eq!(doc["instances"][0]["state"], "failed");
        assert_eq!(doc["instances"][0]["reason"], "refused");
        assert_eq!(doc["summary"]["instances"][0]["health"], "UNREACHABLE");
        Ok(())
    }
}
