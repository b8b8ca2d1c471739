//! Shared request types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much hidden reasoning the model may spend before answering.
///
/// Bounded to three levels so every backend can map it to a finite budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    #[default]
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    /// Extended-thinking token budget (Claude).
    pub fn thinking_budget(&self) -> u32 {
        match self {
            ReasoningEffort::Low => 1024,
            ReasoningEffort::Medium => 4096,
            ReasoningEffort::High => 8192,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            other => Err(format!(
                "unknown reasoning effort '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HIGH".parse::<ReasoningEffort>(), Ok(ReasoningEffort::High));
        assert_eq!(" medium ".parse::<ReasoningEffort>(), Ok(ReasoningEffort::Medium));
        assert!("max".parse::<ReasoningEffort>().is_err());
    }

    #[test]
    fn budgets_grow_with_effort() {
        assert!(ReasoningEffort::Low.thinking_budget() < ReasoningEffort::Medium.thinking_budget());
        assert!(ReasoningEffort::Medium.thinking_budget() < ReasoningEffort::High.thinking_budget());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ReasoningEffort::Medium).unwrap(), "\"medium\"");
    }
}
