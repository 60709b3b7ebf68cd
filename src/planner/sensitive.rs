//! Sensitive-action classification.
//!
//! Categories are configuration, not hard-coded logic: each category maps
//! to a keyword list matched case-insensitively against instruction text.
//! A hit means the instruction needs explicit human confirmation before
//! the Execution Gateway ever sees it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configured sensitive-action categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivePolicy {
    /// category name -> keywords that place an instruction in it
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Default for SensitivePolicy {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            "message".to_string(),
            vec![
                "send message".to_string(),
                "send sms".to_string(),
                "reply".to_string(),
            ],
        );
        categories.insert(
            "payment".to_string(),
            vec![
                "pay".to_string(),
                "transfer".to_string(),
                "purchase".to_string(),
            ],
        );
        categories.insert(
            "deletion".to_string(),
            vec![
                "delete".to_string(),
                "remove".to_string(),
                "uninstall".to_string(),
                "format".to_string(),
            ],
        );
        Self { categories }
    }
}

impl SensitivePolicy {
    /// Build a policy from explicit categories.
    pub fn from_categories(categories: BTreeMap<String, Vec<String>>) -> Self {
        Self { categories }
    }

    /// Return the first category the instruction matches, if any.
    pub fn classify(&self, instruction: &str) -> Option<&str> {
        let lowered = instruction.to_lowercase();
        for (category, keywords) in &self.categories {
            if keywords.iter().any(|k| lowered.contains(&k.to_lowercase())) {
                return Some(category);
            }
        }
        None
    }

    /// True when the instruction falls into any configured category.
    pub fn is_sensitive(&self, instruction: &str) -> bool {
        self.classify(instruction).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_flags_messaging() {
        let policy = SensitivePolicy::default();
        assert_eq!(policy.classify("send message to Bob"), Some("message"));
        assert!(policy.is_sensitive("Send Message to Bob"));
    }

    #[test]
    fn test_default_policy_flags_payment() {
        let policy = SensitivePolicy::default();
        assert_eq!(policy.classify("pay the electricity bill"), Some("payment"));
        assert_eq!(policy.classify("transfer 100 to savings"), Some("payment"));
    }

    #[test]
    fn test_default_policy_flags_deletion() {
        let policy = SensitivePolicy::default();
        assert_eq!(policy.classify("delete the photo"), Some("deletion"));
        assert_eq!(policy.classify("uninstall the app"), Some("deletion"));
    }

    #[test]
    fn test_benign_instruction_not_flagged() {
        let policy = SensitivePolicy::default();
        assert!(policy.classify("tap the Settings icon").is_none());
        assert!(!policy.is_sensitive("scroll down"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let policy = SensitivePolicy::default();
        assert!(policy.is_sensitive("DELETE all photos"));
    }

    #[test]
    fn test_custom_categories_replace_defaults() {
        let mut categories = BTreeMap::new();
        categories.insert("power".to_string(), vec!["factory reset".to_string()]);
        let policy = SensitivePolicy::from_categories(categories);

        assert_eq!(policy.classify("perform factory reset"), Some("power"));
        // Defaults are gone
        assert!(policy.classify("send message").is_none());
    }

    #[test]
    fn test_empty_policy_flags_nothing() {
        let policy = SensitivePolicy::from_categories(BTreeMap::new());
        assert!(!policy.is_sensitive("delete everything"));
    }

    #[test]
    fn test_policy_deserializes_from_config_yaml() {
        let yaml = r#"
categories:
  message: ["send message"]
  payment: ["pay"]
"#;
        let policy: SensitivePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.categories.len(), 2);
        assert!(policy.is_sensitive("pay rent"));
    }
}
