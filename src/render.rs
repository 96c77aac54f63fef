//! Plain-text rendering of catalog views for the terminal.

use crate::dashboard::DashboardReport;
use crate::models::{StepCategory, StepDefinition};
use crate::store::ScenarioRow;

const HEALTHY: char = '●';
const BROKEN: char = '✗';

fn status_symbol(is_broken: bool) -> char {
    if is_broken {
        BROKEN
    } else {
        HEALTHY
    }
}

/// Push `title` followed by one branch line per item.
fn render_section<I>(output: &mut String, title: &str, items: I)
where
    I: ExactSizeIterator<Item = String>,
{
    output.push_str(title);
    output.push('\n');

    let len = items.len();
    for (i, item) in items.enumerate() {
        let branch = if i == len - 1 { "└── " } else { "├── " };
        output.push_str(branch);
        output.push_str(&item);
        output.push('\n');
    }
}

/// Render the dashboard as a summary followed by its breakdowns.
///
/// Example output:
/// ```text
/// 2 features, 4 scenarios (1 broken), 3 organizations, 2 teams, 2 owners
///
/// Teams
/// ├── core: 3 scenarios, 1 broken
/// └── Unassigned: 1 scenarios, 0 broken
/// ```
pub fn render_dashboard(report: &DashboardReport) -> String {
    let stats = &report.stats;
    let mut output = format!(
        "{} features, {} scenarios ({} broken), {} organizations, {} teams, {} owners\n",
        stats.feature_count,
        stats.scenario_count,
        stats.broken_count,
        stats.organization_count,
        stats.team_count,
        stats.owner_count,
    );

    output.push('\n');
    render_section(
        &mut output,
        "Teams",
        report.team_breakdown.iter().map(|g| {
            format!(
                "{}: {} scenarios, {} broken",
                g.team, g.scenario_count, g.broken_count
            )
        }),
    );

    output.push('\n');
    render_section(
        &mut output,
        "Owners",
        report.owner_breakdown.iter().map(|g| {
            format!(
                "{}: {} scenarios, {} broken",
                g.owner, g.scenario_count, g.broken_count
            )
        }),
    );

    if !report.broken_scenarios.is_empty() {
        output.push('\n');
        render_section(
            &mut output,
            "Broken scenarios",
            report
                .broken_scenarios
                .iter()
                .map(|row| format!("{} {} ({})", BROKEN, row.scenario, row.feature)),
        );
    }

    if !report.orgs_without_tests.is_empty() {
        output.push('\n');
        render_section(
            &mut output,
            "Organizations without tests",
            report
                .orgs_without_tests
                .iter()
                .map(|org| format!("{} ({})", org.name, org.slug)),
        );
    }

    output
}

/// Render scenario rows grouped under their feature, features in order of
/// first appearance.
///
/// Example output:
/// ```text
/// Login
/// ├── ● Sign in [Acme]
/// └── ✗ Sign out [Acme]
/// ```
pub fn render_scenarios(rows: &[ScenarioRow]) -> String {
    let mut groups: Vec<(&str, Vec<&ScenarioRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(id, _)| *id == row.feature_id) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.feature_id.as_str(), vec![row])),
        }
    }

    let mut output = String::new();
    for (_, members) in groups {
        let title = match members[0].feature.as_str() {
            "" => "(no feature)",
            name => name,
        };
        render_section(
            &mut output,
            title,
            members.into_iter().map(|row| {
                let organization = match row.organization.as_str() {
                    "" => "no organization",
                    name => name,
                };
                format!(
                    "{} {} [{}]",
                    status_symbol(row.is_broken),
                    row.scenario,
                    organization
                )
            }),
        );
    }
    output
}

/// Render step definitions grouped by category, problematic ones marked with
/// their reason. Empty categories are skipped.
pub fn render_steps(steps: &[StepDefinition]) -> String {
    let mut output = String::new();
    for category in StepCategory::ALL {
        let members: Vec<_> = steps.iter().filter(|s| s.category == category).collect();
        if members.is_empty() {
            continue;
        }

        render_section(
            &mut output,
            category.as_str(),
            members.into_iter().map(|step| {
                let line = format!(
                    "{} {} {} ({}:{})",
                    status_symbol(step.is_problematic),
                    step.keyword.as_str(),
                    step.pattern,
                    step.file_path,
                    step.line_number
                );
                match &step.problem_reason {
                    Some(reason) => format!("{line}: {reason}"),
                    None => line,
                }
            }),
        );
    }
    output
}
