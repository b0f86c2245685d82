//! Storage key layout.
//!
//! | key                          | value                         |
//! |------------------------------|-------------------------------|
//! | `users`                      | JSON array of users           |
//! | `currentUser`                | raw username, no JSON quoting |
//! | `groups_<username>`          | JSON array of groups          |
//! | `tasks_<username>`           | JSON array of ungrouped tasks |
//! | `tasks_<username>_<groupId>` | JSON array of grouped tasks   |

use crate::model::id::GroupId;
use crate::model::task::TaskScope;

pub const USERS_KEY: &str = "users";
pub const CURRENT_USER_KEY: &str = "currentUser";

pub fn groups_key(username: &str) -> String {
    format!("groups_{username}")
}

pub fn tasks_key(username: &str, group_id: Option<&GroupId>) -> String {
    match group_id {
        Some(group_id) => format!("tasks_{username}_{group_id}"),
        None => format!("tasks_{username}"),
    }
}

pub fn scope_key(scope: &TaskScope) -> String {
    tasks_key(&scope.username, scope.group_id.as_ref())
}

#[cfg(test)]
mod tests {
    use super::{groups_key, scope_key, tasks_key};
    use crate::model::id::GroupId;
    use crate::model::task::TaskScope;

    #[test]
    fn keys_follow_legacy_layout() {
        assert_eq!(groups_key("alice"), "groups_alice");
        assert_eq!(tasks_key("alice", None), "tasks_alice");
        assert_eq!(
            tasks_key("alice", Some(&GroupId::from("1712345600000"))),
            "tasks_alice_1712345600000"
        );
    }

    #[test]
    fn scope_key_matches_tasks_key() {
        let scope = TaskScope::grouped("bob", GroupId::from("g1"));
        assert_eq!(scope_key(&scope), "tasks_bob_g1");
        assert_eq!(scope_key(&TaskScope::ungrouped("bob")), "tasks_bob");
    }
}
