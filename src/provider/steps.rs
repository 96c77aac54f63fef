//! Reader for the step definitions registered in a test repository's
//! TypeScript/JavaScript sources.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use super::ProviderError;
use crate::models::{StepCategory, StepDefinition, StepKeyword};

/// Waits above this many milliseconds are reported.
const LONG_WAIT_MS: u32 = 5000;
/// Patterns with more regex metacharacters than this are reported.
const MAX_SPECIAL_CHARS: usize = 10;

// Given('a {string} page', ...), When<Ctx>(/^I wait (\d+)ms$/, ...)
static STEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(Given|When|Then|And|But)(?:<[^>]*>)?\s*\(\s*(?:/(.+?)/|['"](.+?)['"])"#)
        .expect("valid regex")
});
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid regex"));

/// Read every `.ts`/`.js` file under `dir`, in path order. Files that cannot
/// be read are skipped.
pub fn read_step_definitions(dir: &Path) -> Result<Vec<StepDefinition>, ProviderError> {
    if !dir.exists() {
        return Err(ProviderError::new(format!(
            "step_definitions folder not found at: {}",
            dir.display()
        )));
    }

    let files = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            matches!(
                e.path().extension().and_then(|ext| ext.to_str()),
                Some("ts" | "js")
            )
        });

    let mut steps = Vec::new();
    for entry in files {
        let Ok(contents) = std::fs::read_to_string(entry.path()) else {
            tracing::debug!(path = %entry.path().display(), "Skipping unreadable step file");
            continue;
        };
        steps.extend(parse_step_definitions(
            &contents,
            &entry.path().to_string_lossy(),
        ));
    }

    tracing::debug!(steps = steps.len(), "Read step definitions");
    Ok(steps)
}

/// Step definitions registered in one source file, one per matching line.
pub fn parse_step_definitions(contents: &str, file_path: &str) -> Vec<StepDefinition> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let captures = STEP_RE.captures(line)?;
            let keyword = StepKeyword::parse(captures.get(1)?.as_str())?;
            let pattern = captures.get(2).or_else(|| captures.get(3))?.as_str();
            if pattern.is_empty() {
                return None;
            }

            let line_number = i + 1;
            let (is_problematic, problem_reason) = match problem(pattern) {
                Some(reason) => (true, Some(reason)),
                None => (false, None),
            };

            Some(StepDefinition {
                id: format!("{file_path}:{line_number}"),
                keyword,
                pattern: pattern.to_string(),
                file_path: file_path.to_string(),
                line_number,
                category: categorize(pattern, keyword),
                is_problematic,
                problem_reason,
            })
        })
        .collect()
}

/// First matching category wins, checked in declaration order.
pub fn categorize(pattern: &str, keyword: StepKeyword) -> StepCategory {
    let pattern = pattern.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| pattern.contains(w));

    if mentions(&["navigate", "visit", "go to", "open", "click"]) {
        StepCategory::Navigation
    } else if mentions(&["wait", "delay", "sleep"]) {
        StepCategory::Waits
    } else if keyword == StepKeyword::Then
        || mentions(&["should", "verify", "expect", "assert", "see", "visible"])
    {
        StepCategory::Assertions
    } else if mentions(&["create", "set", "add", "insert", "generate", "prepare"]) {
        StepCategory::DataSetup
    } else if mentions(&["flag", "feature", "toggle"]) {
        StepCategory::Flags
    } else if keyword == StepKeyword::When
        || mentions(&["type", "enter", "select", "submit", "fill"])
    {
        StepCategory::Actions
    } else {
        StepCategory::Other
    }
}

/// Why a step pattern is likely to make tests slow or brittle, if it is.
pub fn problem(pattern: &str) -> Option<String> {
    let lower = pattern.to_lowercase();

    if lower.contains("wait") {
        let millis = NUMBER_RE
            .captures(pattern)
            .and_then(|c| c[1].parse::<u32>().ok());
        if let Some(ms) = millis.filter(|ms| *ms > LONG_WAIT_MS) {
            return Some(format!("Long explicit wait: {ms}ms"));
        }
        if lower.contains("sec") {
            return Some("Uses explicit wait with seconds".to_string());
        }
    }

    if lower.contains("deprecated") {
        return Some("Deprecated step pattern".to_string());
    }

    let special_chars = pattern
        .chars()
        .filter(|c| matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '|' | '?' | '*' | '+'))
        .count();
    if special_chars > MAX_SPECIAL_CHARS {
        return Some("Overly complex regex pattern".to_string());
    }

    None
}
