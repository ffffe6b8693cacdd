// fleetcheck-core/src/application/summary.rs

use serde::Serialize;
use std::fmt;

use crate::application::engine::{InstanceOutcome, InstanceState, RunOutcome};
use crate::domain::check::CheckResult;

/// Coarse per-instance health label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unreachable,
}

impl HealthStatus {
    /// All passed: healthy. Strictly more than half passed: degraded.
    /// An instance with nothing evaluated (0/0) is healthy: nothing failed.
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if passed == total {
            HealthStatus::Healthy
        } else if passed * 2 > total {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Degraded => "DEGRADED",
            HealthStatus::Unhealthy => "UNHEALTHY",
            HealthStatus::Unreachable => "UNREACHABLE",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceSummary {
    pub instance: String,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    /// Floor of passed / total, 0 when nothing ran.
    pub percentage: usize,
    pub health: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InstanceSummary {
    pub fn from_results(instance: &str, results: &[CheckResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let percentage = if total == 0 { 0 } else { passed * 100 / total };
        Self {
            instance: instance.to_string(),
            passed,
            failed: total - passed,
            total,
            percentage,
            health: HealthStatus::from_counts(passed, total),
            reason: None,
        }
    }

    pub fn unreachable(instance: &str, reason: &str) -> Self {
        Self {
            instance: instance.to_string(),
            passed: 0,
            failed: 0,
            total: 0,
            percentage: 0,
            health: HealthStatus::Unreachable,
            reason: Some(reason.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub instances: Vec<InstanceSummary>,
}

impl RunSummary {
    /// Any failing check or unreachable instance.
    pub fn has_failures(&self) -> bool {
        self.instances
            .iter()
            .any(|s| s.failed > 0 || s.health == HealthStatus::Unreachable)
    }

    pub fn total_checks(&self) -> usize {
        self.instances.iter().map(|s| s.total).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.instances.iter().map(|s| s.failed).sum()
    }
}

/// Accumulates instance outcomes in run order.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    summaries: Vec<InstanceSummary>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &InstanceOutcome) {
        let summary = match &outcome.state {
            InstanceState::Failed { reason } => InstanceSummary::unreachable(&outcome.instance, reason),
            _ => InstanceSummary::from_results(&outcome.instance, &outcome.results),
        };
        self.summaries.push(summary);
    }

    pub fn finish(self) -> RunSummary {
        RunSummary {
            instances: self.summaries,
        }
    }

    pub fn summarize(outcome: &RunOutcome) -> RunSummary {
        let mut aggregator = Self::new();
        for instance in &outcome.instances {
            aggregator.record(instance);
        }
        aggregator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::check::{Category, CheckMeta};

    fn results(passed: usize, failed: usize) -> Vec<CheckResult> {
        let meta = CheckMeta::new("sessions_min", "SESSIONS_MIN", Category::Performance, "");
        (0..passed + failed)
            .map(|i| CheckResult::new(&meta, "PROD", i < passed, 1, ">= 1", ""))
            .collect()
    }

    #[test]
    fn test_empty_instance_is_healthy_at_zero_percent() {
        let summary = InstanceSummary::from_results("DEV", &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage, 0);
        assert_eq!(summary.health, HealthStatus::Healthy);
        let run = RunSummary {
            instances: vec![summary],
        };
        assert!(!run.has_failures());
    }

    #[test]
    fn test_health_thresholds() {
        assert_eq!(InstanceSummary::from_results("A", &results(4, 0)).health, HealthStatus::Healthy);
        assert_eq!(InstanceSummary::from_results("A", &results(3, 1)).health, HealthStatus::Degraded);
        // exactement la moitié n'est pas "plus de la moitié"
        assert_eq!(InstanceSummary::from_results("A", &results(2, 2)).health, HealthStatus::Unhealthy);
        assert_eq!(InstanceSummary::from_results("A", &results(0, 0)).health, HealthStatus::Healthy);
    }

    #[test]
    fn test_percentage_is_floored() {
        let summary = InstanceSummary::from_results("PROD", &results(2, 1));
        assert_eq!(summary.percentage, 66);
        assert_eq!((summary.passed, summary.failed, summary.total), (2, 1, 3));
        assert_eq!(InstanceSummary::from_results("PROD", &[]).percentage, 0);
    }

    #[test]
    fn test_unreachable_counts_as_failure() {
        let mut aggregator = ResultAggregator::new();
        aggregator.record(&InstanceOutcome {
            instance: "PROD".into(),
            state: InstanceState::Completed,
            results: results(1, 0),
        });
        aggregator.record(&InstanceOutcome {
            instance: "DOWN".into(),
            state: InstanceState::Failed {
                reason: "TNS:no listener".into(),
            },
            results: Vec::new(),
        });
        let summary = aggregator.finish();

        assert!(summary.has_failures());
        assert_eq!(summary.instances[1].health.label(), "UNREACHABLE");
        assert_eq!(summary.total_failed(), 0);
        assert_eq!(summary.total_checks(), 1);
    }
}
