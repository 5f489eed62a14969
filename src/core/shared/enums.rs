//! Routing enums shared by tickets, classifications and the dashboard.
//!
//! Both are stored as lowercase text columns; `FromStr` is the single place
//! where stored or model-produced strings are turned back into variants.

use serde::{Deserialize, Serialize};

/// Team a ticket is routed to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Backend,
    Frontend,
    Database,
    DevOps,
    Security,
    Api,
    Integration,
    #[default]
    General,
}

impl Department {
    pub const ALL: [Department; 8] = [
        Self::Backend,
        Self::Frontend,
        Self::Database,
        Self::DevOps,
        Self::Security,
        Self::Api,
        Self::Integration,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Database => "database",
            Self::DevOps => "devops",
            Self::Security => "security",
            Self::Api => "api",
            Self::Integration => "integration",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backend" => Ok(Self::Backend),
            "frontend" => Ok(Self::Frontend),
            "database" => Ok(Self::Database),
            "devops" => Ok(Self::DevOps),
            "security" => Ok(Self::Security),
            "api" => Ok(Self::Api),
            "integration" => Ok(Self::Integration),
            "general" => Ok(Self::General),
            _ => Err(format!("Unknown department: {s}")),
        }
    }
}

/// How badly the reported error hurts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("Unknown severity: {s}")),
        }
    }
}

pub const STATUS_OPEN: &str = "open";
pub const STATUS_RESOLVED: &str = "resolved";
pub const STATUS_CLOSED: &str = "closed";

/// Statuses that count a ticket as done and stamp `resolved_at`.
pub const TERMINAL_STATUSES: [&str; 2] = [STATUS_RESOLVED, STATUS_CLOSED];

pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_round_trips_through_text() {
        for department in Department::ALL {
            assert_eq!(department.to_string().parse::<Department>(), Ok(department));
        }
        assert!("Backend".parse::<Department>().is_err());
        assert!("marketing".parse::<Department>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Department::default(), Department::General);
        assert_eq!(Severity::default(), Severity::Medium);
    }

    #[test]
    fn test_severity_serde_is_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let parsed: Severity = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Severity::Low);
        assert_eq!(
            serde_json::to_string(&Department::DevOps).unwrap(),
            "\"devops\""
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(is_terminal_status("resolved"));
        assert!(is_terminal_status("closed"));
        assert!(!is_terminal_status("open"));
        assert!(!is_terminal_status("in_progress"));
    }
}
