use serde::{Deserialize, Serialize};

/// Separator between the four positional fields of an encoded target.
pub const FIELD_SEPARATOR: char = ';';

/// Separator between the values of the `flag` and `date` sub-lists.
pub const VALUE_SEPARATOR: char = ',';

/// A decoded target descriptor attached to a scenario.
///
/// Targets travel as `"name;url;flag;date"` strings. Missing trailing fields
/// decode to empty strings and anything past the fourth field is ignored.
/// `flag` and `date` may each hold a comma-separated list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    pub flag: String,
    pub date: String,
}

impl Target {
    pub fn parse(raw: &str) -> Self {
        let mut fields = raw.split(FIELD_SEPARATOR);
        let mut next = || fields.next().unwrap_or_default().to_string();

        Self {
            name: next(),
            url: next(),
            flag: next(),
            date: next(),
        }
    }

    /// Encode the four fields back into their wire form.
    pub fn encode(name: &str, url: &str, flag: Option<&str>, date: Option<&str>) -> String {
        format!(
            "{name}{sep}{url}{sep}{flag}{sep}{date}",
            sep = FIELD_SEPARATOR,
            flag = flag.unwrap_or_default(),
            date = date.unwrap_or_default(),
        )
    }

    /// Non-empty values of the flag sub-list, in written order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        sub_values(&self.flag)
    }

    /// Non-empty values of the date sub-list, in written order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        sub_values(&self.date)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Self::encode(
            &self.name,
            &self.url,
            Some(self.flag.as_str()),
            Some(self.date.as_str()),
        ))
    }
}

fn sub_values(field: &str) -> impl Iterator<Item = &str> {
    field.split(VALUE_SEPARATOR).filter(|v| !v.is_empty())
}

/// Collect values into a vector, keeping only the first occurrence of each.
pub fn dedup_first_seen<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
