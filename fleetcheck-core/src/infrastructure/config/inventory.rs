// fleetcheck-core/src/infrastructure/config/inventory.rs

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, instrument};

use crate::domain::inventory::{AuthMode, DEFAULT_PORT, DatabaseTarget, EngineKind, Inventory, Secret};
use crate::infrastructure::error::InfrastructureError;

fn re_env_ref() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$\{([A-Za-z_][A-Za-z0-9_]*)\}$").unwrap_or_else(|_| {
            // Hardcoded pattern: this branch never runs.
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Deserialize)]
struct RawTarget {
    #[serde(default)]
    hostname: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    service_name: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    auth_mode: AuthMode,
    #[serde(default)]
    engine: EngineKind,
    #[serde(default)]
    path: Option<PathBuf>,
}

#[instrument]
pub fn load_inventory(path: &Path) -> Result<Inventory, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let inventory = parse_inventory(&content, path.parent(), |var| std::env::var(var).ok())?;
    info!(path = ?path, instances = inventory.len(), "🗂️  Inventory loaded");
    Ok(inventory)
}

/// `base_dir` anchors relative snapshot paths; `env` resolves `${VAR}` passwords.
pub fn parse_inventory(
    content: &str,
    base_dir: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Inventory, InfrastructureError> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;
    let databases = document
        .get("databases")
        .ok_or_else(|| InfrastructureError::ConfigError("missing top-level 'databases' section".into()))?;
    if !databases.is_mapping() {
        return Err(InfrastructureError::ConfigError(
            "'databases' must map instance names to connection settings".into(),
        ));
    }

    let raw: BTreeMap<String, RawTarget> = serde_yaml::from_value(databases.clone())?;
    if raw.is_empty() {
        return Err(InfrastructureError::ConfigError("no databases defined in inventory".into()));
    }

    let targets = raw
        .into_iter()
        .map(|(name, entry)| build_target(name, entry, base_dir, &env))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Inventory::new(targets))
}

fn build_target(
    name: String,
    raw: RawTarget,
    base_dir: Option<&Path>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<DatabaseTarget, InfrastructureError> {
    match raw.engine {
        EngineKind::Oracle => {
            for (field, value) in [
                ("hostname", &raw.hostname),
                ("service_name", &raw.service_name),
                ("username", &raw.username),
            ] {
                if value.trim().is_empty() {
                    return Err(InfrastructureError::ConfigError(format!(
                        "database '{name}' is missing '{field}'"
                    )));
                }
            }
        }
        EngineKind::DuckDb if raw.path.is_none() => {
            return Err(InfrastructureError::ConfigError(format!(
                "database '{name}' uses the duckdb engine but has no 'path'"
            )));
        }
        EngineKind::DuckDb => {}
    }

    let env_var = re_env_ref()
        .captures(&raw.password)
        .map(|caps| caps[1].to_string());
    let password = match env_var {
        Some(var) => {
            match env(&var).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => {
                    return Err(InfrastructureError::MissingEnvVar {
                        var,
                        instance: name,
                    });
                }
            }
        }
        None => raw.password,
    };

    let path = raw.path.map(|p| match base_dir {
        Some(base) if p.is_relative() => base.join(p),
        _ => p,
    });

    Ok(DatabaseTarget {
        name,
        hostname: raw.hostname,
        port: raw.port,
        service_name: raw.service_name,
        username: raw.username,
        password: Secret::new(password),
        auth_mode: raw.auth_mode,
        engine: raw.engine,
        path,
    })
}
