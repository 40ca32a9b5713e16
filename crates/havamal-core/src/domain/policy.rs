//! What happens to dependent records when their owner is deleted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-relationship delete behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Delete the dependents first, then the owner.
    Cascade,
    /// Refuse to delete an owner that still has dependents.
    Restrict,
    /// Issue no writes for dependents; the store's own constraints decide.
    Orphan,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Cascade => "cascade",
            DeletePolicy::Restrict => "restrict",
            DeletePolicy::Orphan => "orphan",
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(DeletePolicy::Cascade),
            "restrict" => Ok(DeletePolicy::Restrict),
            "orphan" => Ok(DeletePolicy::Orphan),
            other => Err(format!("unknown delete policy: {other}")),
        }
    }
}

/// Delete behaviour for every owner/dependent relationship in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadePolicy {
    /// Post -> its category associations.
    pub post_categories: DeletePolicy,
    /// Post -> its versions.
    pub post_versions: DeletePolicy,
    /// Navigation item -> its child items.
    pub navigation_children: DeletePolicy,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        Self {
            post_categories: DeletePolicy::Cascade,
            post_versions: DeletePolicy::Cascade,
            navigation_children: DeletePolicy::Orphan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Cascade".parse::<DeletePolicy>(), Ok(DeletePolicy::Cascade));
        assert_eq!(" orphan ".parse::<DeletePolicy>(), Ok(DeletePolicy::Orphan));
        assert!("drop".parse::<DeletePolicy>().is_err());
    }

    #[test]
    fn default_orphans_navigation_children() {
        let policy = CascadePolicy::default();
        assert_eq!(policy.navigation_children, DeletePolicy::Orphan);
        assert_eq!(policy.post_categories, DeletePolicy::Cascade);
    }
}
