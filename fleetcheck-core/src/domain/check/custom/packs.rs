// fleetcheck-core/src/domain/check/custom/packs.rs

use async_trait::async_trait;

use super::{cell, expect_switch};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::DataSource;

const QUERY: &str = "SELECT parameter FROM v$option \
     WHERE parameter IN ('Diagnostics Pack', 'Tuning Pack') AND value = 'TRUE' ORDER BY parameter";
const REQUIRED_PACKS: [&str; 2] = ["Diagnostics Pack", "Tuning Pack"];

pub struct ManagementPackCheck {
    meta: CheckMeta,
}

impl ManagementPackCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "management_pack",
                "MANAGEMENT_PACK",
                Category::Licensing,
                "Checks that the Diagnostics and Tuning management packs are enabled",
            ),
        }
    }
}

impl Default for ManagementPackCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for ManagementPackCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn validate_rule(&self, rule: &RuleValue) -> Result<(), DomainError> {
        expect_switch(&self.meta, rule)
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult {
        if is_switched_off(params.rule) {
            return CheckResult::not_required(&self.meta, instance);
        }

        let expected = REQUIRED_PACKS.join(", ");
        let rows = match source.fetch_all(QUERY).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking management packs: {e}"),
                );
            }
        };

        let enabled: Vec<String> = rows.iter().filter_map(|r| cell(r, 0)).collect();
        if enabled.is_empty() {
            return CheckResult::new(&self.meta, instance, false, "Neither pack enabled", expected, "");
        }

        let missing: Vec<&str> = REQUIRED_PACKS
            .iter()
            .copied()
            .filter(|pack| !enabled.iter().any(|e| e.eq_ignore_ascii_case(pack)))
            .collect();
        if missing.is_empty() {
            let actual = format!("All required packs enabled: {}", enabled.join(", "));
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }
        let actual = format!("Missing pack(s): {}", missing.join(", "));
        CheckResult::new(&self.meta, instance, false, actual, expected, "")
    }
}
