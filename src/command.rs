//! Width sizing for the shell command preview of a scenario.

use crate::models::Target;

pub const SLUG_PADDING: usize = 5;
pub const SCREEN_PADDING: usize = 18;
pub const USER_PADDING: usize = 16;
pub const FLAG_PADDING: usize = 10;
pub const DATE_PADDING: usize = 14;

/// Minimum fixed width able to render every command line of a scenario
/// preview: the organization slug line, one line per user and one per target.
///
/// Lengths are counted in characters.
pub fn command_max_len<'u, U>(organization_slug: &str, users: U, targets: &[Target]) -> usize
where
    U: IntoIterator<Item = &'u str>,
{
    let slug_len = len(organization_slug) + SLUG_PADDING;

    let users_max = users.into_iter().map(|user| len(user) + USER_PADDING);

    let targets_max = targets.iter().map(|target| {
        (len(&target.name) + SCREEN_PADDING)
            .max(len(&target.flag) + FLAG_PADDING)
            .max(len(&target.date) + DATE_PADDING)
    });

    users_max.chain(targets_max).fold(slug_len, usize::max)
}

fn len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_screen_dominates() {
        let targets = vec![Target::parse("abc;url;ff;d")];
        assert_eq!(command_max_len("0123456789", [], &targets), 21);
    }

    #[test]
    fn test_slug_only() {
        assert_eq!(command_max_len("42-acme", [], &[]), 7 + SLUG_PADDING);
    }

    #[test]
    fn test_long_user_name_wins() {
        let users = ["a-really-long-user-name"];
        assert_eq!(command_max_len("1-x", users, &[]), 23 + USER_PADDING);
    }

    #[test]
    fn test_flag_and_date_lists_count_in_full() {
        let targets = vec![Target::parse("home;;login,signup,checkout;2024-01-01,2024-02-01")];
        assert_eq!(command_max_len("1-x", [], &targets), 21 + DATE_PADDING);
    }

    #[test]
    fn test_target_without_trailing_fields() {
        let targets = vec![Target::parse("settings")];
        assert_eq!(command_max_len("", [], &targets), 8 + SCREEN_PADDING);
    }
}
