// fleetcheck-core/src/infrastructure/report/console.rs

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::fmt::Write;

use crate::application::report::{RunReport, display_expected, group_by_category};
use crate::application::summary::HealthStatus;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn health_color(health: HealthStatus) -> Color {
    match health {
        HealthStatus::Healthy => Color::Green,
        HealthStatus::Degraded => Color::Yellow,
        HealthStatus::Unhealthy | HealthStatus::Unreachable => Color::Red,
    }
}

/// Full console report: one table per category, then the run summary.
pub fn render_console(report: &RunReport) -> String {
    let mut out = String::new();

    for section in group_by_category(report.outcome.results()) {
        let mut table = new_table(&["Database", "Check", "Status", "Actual", "Expected"]);
        for result in &section.results {
            let status_color = if result.passed { Color::Green } else { Color::Red };
            table.add_row(vec![
                Cell::new(&result.database),
                Cell::new(&result.check_name),
                Cell::new(result.status_label()).fg(status_color),
                Cell::new(&result.actual_value),
                Cell::new(display_expected(result)),
            ]);
        }
        let _ = writeln!(out, "\n📋 {}\n{table}", section.label);
    }

    let mut summary = new_table(&["Database", "Passed", "Total", "%", "Health"]);
    for instance in &report.summary.instances {
        summary.add_row(vec![
            Cell::new(&instance.instance),
            Cell::new(instance.passed),
            Cell::new(instance.total),
            Cell::new(format!("{}%", instance.percentage)),
            Cell::new(instance.health.label()).fg(health_color(instance.health)),
        ]);
    }
    let _ = writeln!(out, "\n📊 Summary\n{summary}");

    let unreachable: Vec<_> = report.outcome.unreachable().collect();
    if !unreachable.is_empty() {
        let _ = writeln!(out, "\n🔌 Unreachable instances");
        for (instance, reason) in unreachable {
            let _ = writeln!(out, "   - {instance}: {reason}");
        }
    }
    out
}
