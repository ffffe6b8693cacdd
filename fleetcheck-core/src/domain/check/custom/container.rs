// fleetcheck-core/src/domain/check/custom/container.rs

use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;

use super::{LIST_PREVIEW, cell, expect_switch, preview};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::DataSource;

const CDB_PROBE: &str = "SELECT db_unique_name FROM v$database WHERE cdb = 'YES'";
const OPEN_PDBS_QUERY: &str = "SELECT name FROM v$pdbs \
     WHERE open_mode IN ('READ WRITE', 'READ ONLY') AND name <> 'PDB$SEED' ORDER BY name";
const SAVED_STATES_QUERY: &str = "SELECT con_name FROM dba_pdb_saved_states ORDER BY con_name";

/// Only meaningful on a container database; anything else is "not applicable".
pub struct PdbSaveStateCheck {
    meta: CheckMeta,
}

impl PdbSaveStateCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "pdb_save_state",
                "PDB_SAVE_STATE",
                Category::HighAvailability,
                "Checks that every open PDB has a saved state so it reopens after a restart",
            ),
        }
    }

    async fn names(&self, source: &dyn DataSource, query: &str) -> Result<Vec<String>, String> {
        let rows = source.fetch_all(query).await.map_err(|e| e.to_string())?;
        Ok(rows.iter().filter_map(|r| cell(r, 0)).collect())
    }
}

impl Default for PdbSaveStateCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for PdbSaveStateCheck {
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

        // 1. Capability probe. A fault here means "no such feature", not an error.
        match source.fetch_one(CDB_PROBE).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return CheckResult::new(
                    &self.meta,
                    instance,
                    true,
                    "N/A - Non-CDB",
                    "N/A",
                    "Non-CDB database - PDB save state not applicable",
                );
            }
            Err(e) => {
                debug!(instance, error = %e, "CDB probe failed, treating as not applicable");
                return CheckResult::new(
                    &self.meta,
                    instance,
                    true,
                    "Skipped",
                    "N/A",
                    "Not applicable for this database",
                );
            }
        }

        // 2. Feature-specific rule
        let expected = "Saved state for every open PDB";
        let open = match self.names(source, OPEN_PDBS_QUERY).await {
            Ok(open) => open,
            Err(e) => {
                return CheckResult::fault(&self.meta, instance, expected, format!("Error checking PDB save state: {e}"));
            }
        };
        if open.is_empty() {
            return CheckResult::new(&self.meta, instance, true, "0 open PDBs", expected, "No open PDBs");
        }

        let saved: BTreeSet<String> = match self.names(source, SAVED_STATES_QUERY).await {
            Ok(saved) => saved.into_iter().map(|n| n.to_uppercase()).collect(),
            Err(e) => {
                return CheckResult::fault(&self.meta, instance, expected, format!("Error checking PDB save state: {e}"));
            }
        };
        let missing: Vec<String> = open
            .iter()
            .filter(|pdb| !saved.contains(&pdb.to_uppercase()))
            .cloned()
            .collect();

        let actual = format!(
            "{}/{} open PDB(s) with saved state",
            open.len() - missing.len(),
            open.len()
        );
        if missing.is_empty() {
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }
        let message = format!(
            "Found {} open PDB(s) without saved state: {}",
            missing.len(),
            preview(&missing, LIST_PREVIEW)
        );
        CheckResult::new(&self.meta, instance, false, actual, expected, message)
    }
}
