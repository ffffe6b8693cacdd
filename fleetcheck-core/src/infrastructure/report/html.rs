// fleetcheck-core/src/infrastructure/report/html.rs

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::application::engine::InstanceOutcome;
use crate::application::report::{CategorySection, RunReport, group_by_category};
use crate::application::summary::InstanceSummary;
use crate::error::FleetError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, report_path};

const REPORT_TEMPLATE: &str = include_str!("../../../templates/report.html");

#[derive(Serialize)]
struct InstancePage<'a> {
    instance: &'a str,
    generated_at: String,
    summary: &'a InstanceSummary,
    sections: Vec<CategorySection<'a>>,
}

/// One self-contained HTML page per instance.
pub struct HtmlRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // render_str ne déduit pas l'échappement du nom: on force le HTML
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        env.add_filter("status_class", |passed: bool| -> String {
            let class = if passed { "text-green-700" } else { "text-red-700" };
            class.to_string()
        });
        env.add_filter("health_class", |health: String| -> String {
            let class = match health.as_str() {
                "HEALTHY" => "text-green-700",
                "DEGRADED" => "text-yellow-600",
                _ => "text-red-700",
            };
            class.to_string()
        });

        Self { env }
    }

    pub fn render_instance(
        &self,
        report: &RunReport,
        outcome: &InstanceOutcome,
        summary: &InstanceSummary,
    ) -> Result<String, InfrastructureError> {
        let page = InstancePage {
            instance: &outcome.instance,
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            summary,
            sections: group_by_category(&outcome.results),
        };
        self.env
            .render_str(REPORT_TEMPLATE, &page)
            .map_err(InfrastructureError::TemplateError)
    }

    /// Writes `<output_dir>/<instance>-<timestamp>.html` for every instance.
    pub fn write_all(&self, report: &RunReport, output_dir: &Path) -> Result<Vec<PathBuf>, FleetError> {
        fs::create_dir_all(output_dir)?;
        let stamp = report.timestamp();

        let mut written = Vec::new();
        for (outcome, summary) in report.outcome.instances.iter().zip(&report.summary.instances) {
            let html = self.render_instance(report, outcome, summary)?;
            let path = report_path(output_dir, &format!("{}-{stamp}.html", outcome.instance))?;
            atomic_write(&path, html)?;
            written.push(path);
        }
        info!(pages = written.len(), dir = ?output_dir, "📝 HTML reports written");
        Ok(written)
    }
}

impl<'a> Default for HtmlRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}
