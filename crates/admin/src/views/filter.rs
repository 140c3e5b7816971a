//! Client-side search.

use ptt_admin_core::Entity;

/// Whether `label` contains `query`, ignoring case.
///
/// Only the empty query matches everything; whitespace is matched literally.
#[must_use]
pub fn matches(label: &str, query: &str) -> bool {
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}

/// The records whose label contains `query`, ignoring case, in their
/// original order.
#[must_use]
pub fn filter<'a, T: Entity>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches(&item.label(), query))
        .collect()
}

#[cfg(test)]
mod tests {
    use ptt_admin_core::{User, UserId, UserRole};

    use super::*;

    fn user(id: i64, username: &str) -> User {
        User {
            id: UserId::new(id),
            username: username.to_owned(),
            active: true,
            role: UserRole::Regular,
            channels: Vec::new(),
        }
    }

    fn names(users: &[&User]) -> Vec<String> {
        users.iter().map(|u| u.username.clone()).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let users = vec![user(1, "alice"), user(2, "bob")];
        assert_eq!(filter(&users, "").len(), 2);
    }

    #[test]
    fn test_whitespace_is_part_of_the_query() {
        let users = vec![user(1, "alice"), user(2, "bob")];
        assert!(filter(&users, " ").is_empty());
        assert!(filter(&users, " bob").is_empty());

        let users = vec![user(1, "alice"), user(2, "bob smith")];
        assert_eq!(names(&filter(&users, "b s")), vec!["bob smith"]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let users = vec![user(1, "Alice"), user(2, "bob"), user(3, "MALICE")];
        assert_eq!(names(&filter(&users, "lic")), vec!["Alice", "MALICE"]);
        assert_eq!(names(&filter(&users, "BO")), vec!["bob"]);
        assert!(filter(&users, "zed").is_empty());
    }

    #[test]
    fn test_non_ascii_labels() {
        let users = vec![user(1, "Ädmin"), user(2, "کاربر")];
        assert_eq!(names(&filter(&users, "äd")), vec!["Ädmin"]);
        assert_eq!(names(&filter(&users, "کار")), vec!["کاربر"]);
    }

    #[test]
    fn test_source_is_untouched() {
        let users = vec![user(2, "bob"), user(1, "alice")];
        let _ = filter(&users, "a");
        assert_eq!(names(&users.iter().collect::<Vec<_>>()), vec!["bob", "alice"]);
    }
}
