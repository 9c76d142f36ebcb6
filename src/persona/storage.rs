//! Storage key for a user's last explicit persona choice.

/// Prefix shared by every per-user persona key.
pub const STORAGE_KEY_PREFIX: &str = "verso_active_persona";

/// Key under which to persist `user_id`'s last active persona id.
///
/// Always `"verso_active_persona:<user_id>"`. The id is appended verbatim;
/// because the prefix is fixed, distinct ids give distinct keys.
pub fn per_user_persona_storage_key(user_id: &str) -> String {
    format!("{}:{}", STORAGE_KEY_PREFIX, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_format() {
        assert_eq!(
            per_user_persona_storage_key("user-123"),
            "verso_active_persona:user-123"
        );
    }

    #[test]
    fn test_user_id_is_not_sanitized() {
        assert_eq!(
            per_user_persona_storage_key("a:b c"),
            "verso_active_persona:a:b c"
        );
    }

    #[test]
    fn test_distinct_users_distinct_keys() {
        let ids = ["u1", "u2", "u-1", "U1", "u1 ", "", ":", "a:b", "a", "b"];
        let keys: std::collections::HashSet<String> =
            ids.iter().map(|id| per_user_persona_storage_key(id)).collect();
        assert_eq!(keys.len(), ids.len());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            per_user_persona_storage_key("user-123"),
            per_user_persona_storage_key("user-123")
        );
    }
}
