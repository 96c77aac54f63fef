//! Numbered source listings of feature files.

use std::path::Path;

use super::ProviderError;

/// Read `path` and number its lines, optionally keeping only one scenario's
/// block (see [`excerpt`]).
pub fn read_source(path: &Path, scenario: Option<&str>) -> Result<String, ProviderError> {
    if !path.is_file() {
        return Err(ProviderError::new("Invalid file path"));
    }

    let contents =
        std::fs::read_to_string(path).map_err(|_| ProviderError::new("Failed to read file"))?;
    excerpt(&contents, scenario)
}

/// Number the lines of `contents` as `"<n>: <line>\n"`, dropping trailing
/// blank lines.
///
/// With a scenario name, the listing starts at the first line mentioning it
/// and stops before the next `Scenario` header that does not.
pub fn excerpt(contents: &str, scenario: Option<&str>) -> Result<String, ProviderError> {
    let numbered = contents.lines().enumerate().map(|(i, line)| (i + 1, line));

    let mut lines: Vec<(usize, &str)> = match scenario {
        None => numbered.collect(),
        Some(name) => {
            let block: Vec<_> = numbered
                .skip_while(|(_, line)| !line.contains(name))
                .enumerate()
                .take_while(|(i, (_, line))| {
                    *i == 0 || line.contains(name) || !line.trim().starts_with("Scenario")
                })
                .map(|(_, numbered)| numbered)
                .collect();

            if block.is_empty() {
                return Err(ProviderError::new("Failed to find scenario"));
            }
            block
        }
    };

    while lines.last().is_some_and(|(_, line)| line.trim().is_empty()) {
        lines.pop();
    }

    Ok(lines
        .into_iter()
        .map(|(n, line)| format!("{n}: {line}\n"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const FEATURE: &str = "Feature: Invoices

  Scenario: Create invoice
    Given current organization is \"Acme\"
    When I create an invoice


  Scenario: Pay invoice
    Then the invoice is paid
";

    #[test]
    fn test_excerpt_whole_file() {
        let listing = excerpt("Line 1\nLine 2\nLine 3\n\n\n", None).unwrap();
        assert_eq!(listing, "1: Line 1\n2: Line 2\n3: Line 3\n");
    }

    #[test]
    fn test_excerpt_one_scenario() {
        let listing = excerpt(FEATURE, Some("Create invoice")).unwrap();
        assert_eq!(
            listing,
            "3:   Scenario: Create invoice\n\
             4:     Given current organization is \"Acme\"\n\
             5:     When I create an invoice\n"
        );

        let listing = excerpt(FEATURE, Some("Pay invoice")).unwrap();
        assert_eq!(listing, "8:   Scenario: Pay invoice\n9:     Then the invoice is paid\n");
    }

    #[test]
    fn test_excerpt_missing_scenario() {
        let err = excerpt(FEATURE, Some("Refund invoice")).unwrap_err();
        assert_eq!(err.message, "Failed to find scenario");
    }

    #[test]
    fn test_read_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invoices.feature");
        fs::write(&path, FEATURE).unwrap();

        let listing = read_source(&path, None).unwrap();
        assert!(listing.starts_with("1: Feature: Invoices\n"));
        assert!(listing.ends_with("9:     Then the invoice is paid\n"));

        let err = read_source(&dir.path().join("missing.feature"), None).unwrap_err();
        assert_eq!(err.message, "Invalid file path");
    }
}
