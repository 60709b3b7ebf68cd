//! ScreenSnapshot: a structured, immutable capture of on-device state.
//!
//! Produced fresh by the Observer each round. Superseded, never mutated,
//! by the next snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One interactive element visible on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiElement {
    /// Element kind as reported by the device (button, input, list item, ...)
    pub kind: String,

    /// Visible label or content text
    pub text: String,

    /// Screen bounds in whatever notation the device bridge emits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<String>,
}

/// Structured capture of on-device visible state at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    /// System or app alerts currently displayed
    #[serde(default)]
    pub alerts: Vec<String>,

    /// Interactive elements in display order
    #[serde(default)]
    pub elements: Vec<UiElement>,

    /// Visible top-level text in display order
    #[serde(default)]
    pub texts_top: Vec<String>,

    /// When the Observer captured this snapshot
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
}

impl ScreenSnapshot {
    /// Create an empty snapshot captured now.
    pub fn empty() -> Self {
        Self {
            alerts: vec![],
            elements: vec![],
            texts_top: vec![],
            captured_at: Utc::now(),
        }
    }

    /// True if the keyword appears as a substring anywhere in the
    /// snapshot's visible text: alerts, element labels, or top-level text.
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.texts_top.iter().any(|t| t.contains(keyword))
            || self.alerts.iter().any(|a| a.contains(keyword))
            || self.elements.iter().any(|e| e.text.contains(keyword))
    }

    /// True if any of the given keywords is present.
    pub fn contains_any(&self, keywords: &[String]) -> bool {
        keywords.iter().any(|k| self.contains_keyword(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_text(texts: &[&str]) -> ScreenSnapshot {
        ScreenSnapshot {
            alerts: vec![],
            elements: vec![],
            texts_top: texts.iter().map(|s| s.to_string()).collect(),
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_snapshot_has_no_content() {
        let snap = ScreenSnapshot::empty();
        assert!(snap.alerts.is_empty());
        assert!(snap.elements.is_empty());
        assert!(snap.texts_top.is_empty());
    }

    #[test]
    fn test_contains_keyword_in_texts_top() {
        let snap = snapshot_with_text(&["Home", "Settings", "Camera"]);
        assert!(snap.contains_keyword("Settings"));
        assert!(!snap.contains_keyword("Payments"));
    }

    #[test]
    fn test_contains_keyword_substring_match() {
        let snap = snapshot_with_text(&["Open Settings now"]);
        assert!(snap.contains_keyword("Settings"));
    }

    #[test]
    fn test_contains_keyword_in_alerts() {
        let mut snap = ScreenSnapshot::empty();
        snap.alerts.push("Low battery".to_string());
        assert!(snap.contains_keyword("battery"));
    }

    #[test]
    fn test_contains_keyword_in_element_text() {
        let mut snap = ScreenSnapshot::empty();
        snap.elements.push(UiElement {
            kind: "button".to_string(),
            text: "Send message".to_string(),
            bounds: None,
        });
        assert!(snap.contains_keyword("Send"));
        assert!(!snap.contains_keyword("button"));
    }

    #[test]
    fn test_contains_keyword_is_case_sensitive() {
        let snap = snapshot_with_text(&["Settings"]);
        assert!(!snap.contains_keyword("settings"));
    }

    #[test]
    fn test_contains_any() {
        let snap = snapshot_with_text(&["Settings"]);
        let keywords = vec!["Payments".to_string(), "Settings".to_string()];
        assert!(snap.contains_any(&keywords));
        assert!(!snap.contains_any(&["Camera".to_string()]));
        assert!(!snap.contains_any(&[]));
    }

    #[test]
    fn test_snapshot_deserializes_from_observer_output() {
        let json = r#"{
            "alerts": ["Update available"],
            "elements": [{"kind": "button", "text": "OK", "bounds": "[0,0][100,40]"}],
            "texts_top": ["Home screen"]
        }"#;
        let snap: ScreenSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.alerts, vec!["Update available"]);
        assert_eq!(snap.elements.len(), 1);
        assert_eq!(snap.elements[0].bounds.as_deref(), Some("[0,0][100,40]"));
        assert_eq!(snap.texts_top, vec!["Home screen"]);
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let snap = snapshot_with_text(&["Home"]);
        let json = serde_json::to_string(&snap).expect("serialize");
        let parsed: ScreenSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.texts_top, snap.texts_top);
    }
}
