//! User-facing rendering of a failed operation.

use serde::{Deserialize, Serialize};

/// How loudly a notice is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Interrupts the flow (an alert the user must dismiss).
    Blocking,
    /// Shown next to the thing that failed.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// A short, human-readable summary.
    pub title: String,

    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    pub severity: Severity,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: None,
            severity,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // Common constructors
    pub fn blocking(title: impl Into<String>) -> Self {
        Self::new(Severity::Blocking, title)
    }

    pub fn inline(title: impl Into<String>) -> Self {
        Self::new(Severity::Inline, title)
    }

    pub fn read_only(detail: impl Into<String>) -> Self {
        Self::blocking("Read-only demo").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::inline("Not found").with_detail(detail)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.title, detail),
            None => f.write_str(&self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_json() {
        let notice = Notice::read_only("Writing a review is disabled");
        assert_eq!(notice.to_string(), "Read-only demo: Writing a review is disabled");

        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["severity"], "blocking");

        let bare = serde_json::to_value(Notice::inline("Oops")).unwrap();
        assert!(bare.get("detail").is_none());
    }
}
