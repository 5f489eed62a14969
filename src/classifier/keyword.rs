use async_trait::async_trait;

use super::{ClassificationResult, Classifier};
use crate::core::shared::enums::{Department, Severity};

const DEPARTMENT_KEYWORDS: &[(Department, &[&str])] = &[
    (
        Department::Security,
        &["unauthorized", "forbidden", "auth", "login", "password", "token", "breach", "xss", "csrf"],
    ),
    (
        Department::Database,
        &["sql", "database", "query", "deadlock", "migration", "postgres", "mysql", "sqlite"],
    ),
    (
        Department::DevOps,
        &["deploy", "docker", "kubernetes", "pipeline", "ci/cd", "container", "disk", "certificate"],
    ),
    (
        Department::Api,
        &["endpoint", "status code", "api", "rate limit", "webhook", "payload"],
    ),
    (
        Department::Integration,
        &["third-party", "integration", "stripe", "slack", "salesforce", "sync"],
    ),
    (
        Department::Frontend,
        &["css", "button", "javascript", "render", "layout", "browser", "ui", "page"],
    ),
    (
        Department::Backend,
        &["server", "exception", "null pointer", "stack trace", "500", "timeout", "crash"],
    ),
];

const SEVERITY_KEYWORDS: &[(Severity, &[&str])] = &[
    (
        Severity::Critical,
        &["outage", "down", "data loss", "breach", "all users", "production"],
    ),
    (
        Severity::High,
        &["crash", "cannot", "can't", "broken", "fails", "500", "many users"],
    ),
    (Severity::Low, &["typo", "cosmetic", "minor", "alignment", "color"]),
];

/// Offline classifier for the mock endpoints. Matches keywords in the
/// description and error message; never calls out.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub const CONFIDENCE: f64 = 0.6;

    pub fn classify_text(
        &self,
        description: &str,
        error_message: Option<&str>,
        context: Option<&str>,
    ) -> ClassificationResult {
        let text = [Some(description), error_message, context]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let department_hit = DEPARTMENT_KEYWORDS.iter().find_map(|(department, words)| {
            words
                .iter()
                .find(|w| contains_word(&text, w))
                .map(|w| (*department, *w))
        });

        let severity = SEVERITY_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| contains_word(&text, w)))
            .map(|(severity, _)| *severity)
            .unwrap_or(Severity::Medium);

        let (department, reasoning) = match department_hit {
            Some((department, keyword)) => (
                department,
                format!("Keyword match on \"{keyword}\" routed to {department}"),
            ),
            None => (
                Department::General,
                "No routing keywords matched; sent to general triage".to_string(),
            ),
        };

        ClassificationResult {
            department,
            severity,
            confidence: Self::CONFIDENCE,
            reasoning,
            suggested_actions: suggested_actions(department, severity),
        }
    }
}

/// Whole-word match so "ui" does not fire on "build" and "api" not on "rapid".
fn contains_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(start, _)| {
        let end = start + keyword.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

fn suggested_actions(department: Department, severity: Severity) -> Vec<String> {
    let mut actions = vec![match department {
        Department::Backend => "Check application server logs",
        Department::Frontend => "Reproduce in the browser and capture console output",
        Department::Database => "Inspect slow query log and connection pool",
        Department::DevOps => "Review the latest deployment and infrastructure health",
        Department::Security => "Audit authentication logs for the affected accounts",
        Department::Api => "Verify request payloads and endpoint responses",
        Department::Integration => "Check third-party service status and credentials",
        Department::General => "Manual review required",
    }
    .to_string()];

    if matches!(severity, Severity::Critical | Severity::High) {
        actions.push("Escalate to the on-call engineer".to_string());
    }
    actions
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(
        &self,
        description: &str,
        error_message: Option<&str>,
        context: Option<&str>,
    ) -> ClassificationResult {
        self.classify_text(description, error_message, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_keyword() {
        let result = KeywordClassifier.classify_text(
            "Reports page shows nothing",
            Some("SQL error: deadlock detected"),
            None,
        );
        assert_eq!(result.department, Department::Database);
        assert_eq!(result.confidence, 0.6);
        assert!(result.reasoning.contains("sql"));
    }

    #[test]
    fn test_critical_severity() {
        let result =
            KeywordClassifier.classify_text("Total outage after deploy, data loss reported", None, None);
        assert_eq!(result.department, Department::DevOps);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.suggested_actions.len(), 2);
    }

    #[test]
    fn test_frontend_and_low() {
        let result = KeywordClassifier.classify_text("Button has a minor alignment issue", None, None);
        assert_eq!(result.department, Department::Frontend);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_no_match_is_general_medium() {
        let result = KeywordClassifier.classify_text("Something odd happened", None, None);
        assert_eq!(result.department, Department::General);
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.suggested_actions, vec!["Manual review required".to_string()]);
    }

    #[test]
    fn test_whole_words_only() {
        assert!(!contains_word("rebuild the rapid cache", "ui"));
        assert!(!contains_word("rebuild the rapid cache", "api"));
        assert!(contains_word("the ui froze", "ui"));
        assert!(contains_word("see ci/cd logs", "ci/cd"));
    }

    #[test]
    fn test_deterministic() {
        let a = KeywordClassifier.classify_text("Login token expired", None, None);
        let b = KeywordClassifier.classify_text("Login token expired", None, None);
        assert_eq!(a, b);
        assert_eq!(a.department, Department::Security);
    }
}
