//! Line-oriented reader for Gherkin `.feature` files.
//!
//! Only what the catalog needs is extracted: names, descriptions, tags, step
//! and example counts, the organization a scenario runs against and the
//! screens it visits.

use std::collections::BTreeSet;
use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use super::{FeatureRecord, ScenarioRecord};
use crate::models::Target;

const STEP_KEYWORDS: [&str; 6] = ["Given ", "When ", "Then ", "And ", "But ", "* "];

// Given current organization is "Some Org LLC"
static ORGANIZATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"current organization is "([^"]+)""#).expect("valid regex"));
// {user} is on a "budgets" screen [on date "..."] [and flag(s) "..." is/are enabled]
static SCREEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"on a "([^"]+)" screen"#).expect("valid regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"on date "([^"]+)""#).expect("valid regex"));
static FLAGS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"and flags? "([^"]+)" (?:is|are) enabled"#).expect("valid regex")
});

/// App route of a known screen name. Unknown screens map to an empty route.
pub fn screen_endpoint(screen: &str) -> &'static str {
    match screen {
        "budgets" => "/financials/budgets",
        "companies" => "/contacts/companies",
        "company expenses" => "/financials/expenses",
        "company time" => "/time/company",
        "contacts" => "/contacts/people",
        "dashboards" => "/dashboards",
        "deals" => "/sales/deals",
        "docs" => "/docs",
        "expense approvals" => "/approvals/expenses",
        "inbound emails" => "/emails",
        "insights" => "/insights",
        "invoices" => "/financials/invoices",
        "jobs" => "/jobs/deals",
        "my expenses" => "/expenses/me",
        "my time" => "/time/me",
        "payments" => "/financials/payments",
        "projects" => "/projects",
        "reports" => "/reports",
        "request time off" => "/time-off-requests",
        "scheduling" => "/scheduling/bookings",
        "settings" => "/settings",
        "tasks" => "/tasks",
        "template center" => "/templates",
        "time approvals" => "/approvals/time-entries",
        "time off approvals" => "/approvals/time-off-requests",
        _ => "",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Feature,
    Scenario,
    Steps,
    ExamplesHeader,
    ExamplesBody,
}

/// A scenario being read, with its targets kept sorted and unique.
struct OpenScenario {
    record: ScenarioRecord,
    targets: BTreeSet<String>,
}

impl OpenScenario {
    fn close(mut self, examples: Option<u32>) -> ScenarioRecord {
        if let Some(examples) = examples {
            self.record.examples = examples;
        }
        self.record.targets = self.targets.into_iter().collect();
        self.record
    }
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn append_description(description: &mut String, line: &str) {
    if !description.is_empty() && !line.is_empty() {
        description.push(' ');
    }
    description.push_str(line);
}

/// Read one feature file. `file_path` is recorded on the feature as given.
pub fn read_feature<R: BufRead>(
    reader: R,
    file_path: &str,
) -> std::io::Result<(FeatureRecord, Vec<ScenarioRecord>)> {
    let mut feature = FeatureRecord {
        id: Uuid::new_v4().to_string(),
        file_path: file_path.to_string(),
        ..Default::default()
    };

    let mut scenarios = Vec::new();
    let mut current: Option<OpenScenario> = None;
    let mut pending_tags: Vec<String> = Vec::new();
    let mut example_rows: u32 = 0;
    let mut section = Section::None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.starts_with('@') {
            section = Section::None;
            pending_tags.extend(line.split_whitespace().map(String::from));
        } else if let Some(name) = line.strip_prefix("Feature:") {
            section = Section::Feature;
            feature.name = name.trim().to_string();
            feature.tags = std::mem::take(&mut pending_tags);
        } else if line.starts_with("Scenario:") || line.starts_with("Scenario Outline:") {
            if section == Section::None
                && feature.name.is_empty()
                && feature.description.is_empty()
                && feature.tags.is_empty()
            {
                tracing::warn!(file_path, "Feature is malformed, skipping");
                return Ok((feature, scenarios));
            }

            if let Some(open) = current.take() {
                let examples = (section == Section::ExamplesBody).then_some(example_rows);
                example_rows = 0;
                scenarios.push(open.close(examples));
            }

            section = Section::Scenario;
            let name = line
                .split_once(':')
                .map(|(_, name)| name.trim())
                .unwrap_or_default();

            current = Some(OpenScenario {
                record: ScenarioRecord {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    tags: std::mem::take(&mut pending_tags),
                    feature_id: feature.id.clone(),
                    ..Default::default()
                },
                targets: BTreeSet::new(),
            });
        } else if line.starts_with("Examples:") {
            if !pending_tags.is_empty() {
                let tags = std::mem::take(&mut pending_tags);
                if let Some(open) = current.as_mut() {
                    open.record.tags.extend(tags);
                }
            }
            section = Section::ExamplesHeader;
        } else if line.starts_with('|') {
            match section {
                Section::ExamplesBody => example_rows += 1,
                Section::ExamplesHeader => section = Section::ExamplesBody,
                _ => {}
            }
        } else if STEP_KEYWORDS.iter().any(|k| line.starts_with(k)) {
            section = Section::Steps;

            if let Some(open) = current.as_mut() {
                open.record.steps += 1;

                if let Some(organization) = capture(&ORGANIZATION_RE, line) {
                    open.record.organization_name = organization.trim().to_string();
                } else if let Some(screen) = capture(&SCREEN_RE, line) {
                    let screen = screen.to_lowercase();
                    open.targets.insert(Target::encode(
                        &screen,
                        screen_endpoint(&screen),
                        capture(&FLAGS_RE, line),
                        capture(&DATE_RE, line),
                    ));
                }
            }
        } else {
            match section {
                Section::Feature => append_description(&mut feature.description, line),
                Section::Scenario => {
                    if let Some(open) = current.as_mut() {
                        append_description(&mut open.record.description, line);
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(open) = current {
        let examples = (section == Section::ExamplesBody).then_some(example_rows);
        scenarios.push(open.close(examples));
    }

    Ok((feature, scenarios))
}
