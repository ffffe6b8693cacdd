// fleetcheck-core/src/application/engine.rs

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::check::threshold::bytes_to_gib;
use crate::domain::check::{CheckParams, CheckResult, ValueTransform};
use crate::domain::inventory::DatabaseTarget;
use crate::domain::registry::CheckRegistry;
use crate::domain::rules::RuleResolver;
use crate::ports::data_source::DataSource;
use crate::ports::provider::SourceProvider;

/// Rule written in GiB while the instance reports bytes.
pub const SGA_TARGET_RULE: &str = "sga_target_min_gb";

/// Lifecycle of one instance within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InstanceState {
    NotStarted,
    Connected,
    Executing,
    Completed,
    /// Some checks faulted (panic or ERROR result); the others still reported.
    PartiallyCompleted { faults: usize },
    /// Connection fault: no check ran.
    Failed { reason: String },
}

impl InstanceState {
    pub fn is_reachable(&self) -> bool {
        !matches!(self, InstanceState::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceOutcome {
    pub instance: String,
    #[serde(flatten)]
    pub state: InstanceState,
    pub results: Vec<CheckResult>,
}

impl InstanceOutcome {
    fn new(instance: &str) -> Self {
        Self {
            instance: instance.to_string(),
            state: InstanceState::NotStarted,
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub instances: Vec<InstanceOutcome>,
}

impl RunOutcome {
    /// Every result of the run, instance by instance.
    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.instances.iter().flat_map(|i| i.results.iter())
    }

    pub fn unreachable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.instances.iter().filter_map(|i| match &i.state {
            InstanceState::Failed { reason } => Some((i.instance.as_str(), reason.as_str())),
            _ => None,
        })
    }
}

/// Drives one run: instances one after the other, rules one after the other.
pub struct ValidationEngine {
    registry: Arc<CheckRegistry>,
    resolver: Arc<RuleResolver>,
    transforms: BTreeMap<String, ValueTransform>,
}

impl ValidationEngine {
    pub fn new(registry: Arc<CheckRegistry>, resolver: Arc<RuleResolver>) -> Self {
        let mut transforms: BTreeMap<String, ValueTransform> = BTreeMap::new();
        transforms.insert(SGA_TARGET_RULE.to_string(), bytes_to_gib);
        Self {
            registry,
            resolver,
            transforms,
        }
    }

    /// Registers (or replaces) the unit conversion applied to one rule's fetched value.
    pub fn with_transform(mut self, rule_name: &str, transform: ValueTransform) -> Self {
        self.transforms.insert(rule_name.to_string(), transform);
        self
    }

    /// Never fails. Faults end up in the outcome as data.
    #[instrument(skip_all, fields(instances = targets.len()))]
    pub async fn run(&self, provider: &dyn SourceProvider, targets: &[DatabaseTarget]) -> RunOutcome {
        let started_at = Utc::now();
        let start = Instant::now();
        info!("🚀 Starting validation run");

        let mut instances = Vec::with_capacity(targets.len());
        for target in targets {
            instances.push(self.run_instance(provider, target).await);
        }

        info!("🏁 Run finished in {:.2?}", start.elapsed());
        RunOutcome {
            started_at,
            finished_at: Utc::now(),
            instances,
        }
    }

    #[instrument(skip(self, provider, target), fields(instance = %target.name))]
    async fn run_instance(&self, provider: &dyn SourceProvider, target: &DatabaseTarget) -> InstanceOutcome {
        let mut outcome = InstanceOutcome::new(&target.name);

        let handle = match provider.acquire(target).await {
            Ok(handle) => handle,
            Err(e) => {
                if e.is_connection_fault() {
                    error!(error = %e, "❌ Instance unreachable, skipping");
                } else {
                    error!(error = %e, "❌ Could not acquire a handle, skipping");
                }
                outcome.state = InstanceState::Failed {
                    reason: e.to_string(),
                };
                return outcome;
            }
        };
        outcome.state = InstanceState::Connected;
        info!(endpoint = %target.endpoint(), "🔌 Connected");

        outcome.state = InstanceState::Executing;
        let faults = self
            .execute_rules(handle.as_ref(), &target.name, &mut outcome.results)
            .await;

        // rendu du handle quoi qu'il arrive: execute_rules ne propage rien
        provider.release(target, handle).await;

        outcome.state = match faults {
            0 => InstanceState::Completed,
            faults => InstanceState::PartiallyCompleted { faults },
        };
        info!(checks = outcome.results.len(), faults, "✅ Instance done");
        outcome
    }

    /// Returns the number of per-check faults.
    async fn execute_rules(
        &self,
        source: &dyn DataSource,
        instance: &str,
        results: &mut Vec<CheckResult>,
    ) -> usize {
        let rules = self.resolver.resolve(instance);
        let overridden = self.resolver.overridden_keys(instance);
        let mut faults = 0;

        for (rule_name, value) in &rules {
            let check = match self.registry.get(rule_name) {
                Ok(check) => check,
                Err(e) => {
                    debug!(rule = %rule_name, error = %e, "No check for rule, skipping");
                    continue;
                }
            };
            if value.is_none() && !check.reports_when_unset() {
                debug!(rule = %rule_name, "Rule unset, skipping");
                continue;
            }

            let params = CheckParams {
                rule: value.as_ref(),
                transform: self.transforms.get(rule_name).copied(),
            };
            let execution = AssertUnwindSafe(check.execute(source, instance, &params))
                .catch_unwind()
                .await;

            match execution {
                Ok(result) => {
                    if result.is_error() {
                        faults += 1;
                        warn!(check = %rule_name, message = %result.message, "⚠️ Check reported an error");
                    }
                    results.push(result.with_override(overridden.contains(rule_name)));
                }
                Err(payload) => {
                    faults += 1;
                    warn!(check = %rule_name, reason = %panic_message(payload.as_ref()), "💥 Check panicked, no result recorded");
                }
            }
        }
        faults
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
