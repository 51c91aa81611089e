//! Configuration loading and representation.

use serde::{Deserialize, Serialize};

/// Runtime settings for the allocation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// How many times an allocation is retried against a fresh snapshot after losing a
    /// concurrent write, before the conflict is surfaced.
    pub max_conflict_retries: u32,
    /// Who receives out-of-stock notifications.
    pub notification_recipient: String,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
            notification_recipient: "stock@example.com".to_string(),
        }
    }
}

impl AllocationConfig {
    pub const MAX_CONFLICT_RETRIES_VAR: &'static str = "STOCKROOM_MAX_CONFLICT_RETRIES";
    pub const NOTIFICATION_RECIPIENT_VAR: &'static str = "STOCKROOM_NOTIFICATION_RECIPIENT";

    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup` (a key → value source), falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::MAX_CONFLICT_RETRIES_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(retries) => config.max_conflict_retries = retries,
                Err(err) => tracing::warn!(
                    "{} is not a valid retry count ({raw:?}: {err}); using {}",
                    Self::MAX_CONFLICT_RETRIES_VAR,
                    config.max_conflict_retries
                ),
            }
        }

        if let Some(recipient) = lookup(Self::NOTIFICATION_RECIPIENT_VAR) {
            let recipient = recipient.trim();
            if recipient.is_empty() {
                tracing::warn!(
                    "{} is empty; using {}",
                    Self::NOTIFICATION_RECIPIENT_VAR,
                    config.notification_recipient
                );
            } else {
                config.notification_recipient = recipient.to_string();
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AllocationConfig::from_lookup(|_| None), AllocationConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AllocationConfig::from_lookup(lookup_from(&[
            (AllocationConfig::MAX_CONFLICT_RETRIES_VAR, "7"),
            (AllocationConfig::NOTIFICATION_RECIPIENT_VAR, "buyers@example.com"),
        ]));

        assert_eq!(config.max_conflict_retries, 7);
        assert_eq!(config.notification_recipient, "buyers@example.com");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AllocationConfig::from_lookup(lookup_from(&[
            (AllocationConfig::MAX_CONFLICT_RETRIES_VAR, "lots"),
            (AllocationConfig::NOTIFICATION_RECIPIENT_VAR, "   "),
        ]));

        assert_eq!(config, AllocationConfig::default());
    }

    #[test]
    fn from_env_reads_process_environment() {
        // SAFETY: no other thread of this test binary reads or writes these variables.
        unsafe {
            std::env::set_var(AllocationConfig::MAX_CONFLICT_RETRIES_VAR, "5");
            std::env::set_var(AllocationConfig::NOTIFICATION_RECIPIENT_VAR, " ops@example.com ");
        }

        let config = AllocationConfig::from_env();

        unsafe {
            std::env::remove_var(AllocationConfig::MAX_CONFLICT_RETRIES_VAR);
            std::env::remove_var(AllocationConfig::NOTIFICATION_RECIPIENT_VAR);
        }

        assert_eq!(config.max_conflict_retries, 5);
        assert_eq!(config.notification_recipient, "ops@example.com");
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: AllocationConfig =
            serde_json::from_str(r#"{ "max_conflict_retries": 0 }"#).unwrap();

        assert_eq!(config.max_conflict_retries, 0);
        assert_eq!(config.notification_recipient, "stock@example.com");
    }
}
