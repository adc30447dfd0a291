//! Policy selection
//!
//! Maps configuration names to [`MergePolicy`] implementations.

use crate::last_write_wins::LastWriteWins;
use crate::policy::MergePolicy;
use crate::reject_stale::RejectStale;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Available merge policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// [`LastWriteWins`]
    #[default]
    LastWriteWins,
    /// [`RejectStale`]
    RejectStale,
}

impl PolicyKind {
    /// All selectable policies
    pub const ALL: [PolicyKind; 2] = [Self::LastWriteWins, Self::RejectStale];

    /// Configuration name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastWriteWins => "last-write-wins",
            Self::RejectStale => "reject-stale",
        }
    }

    /// Instantiate the policy
    #[must_use]
    pub fn build(self) -> Arc<dyn MergePolicy> {
        match self {
            Self::LastWriteWins => Arc::new(LastWriteWins::new()),
            Self::RejectStale => Arc::new(RejectStale::new()),
        }
    }
}

impl Display for PolicyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that matches no [`PolicyKind`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown merge policy '{0}' (expected one of: last-write-wins, reject-stale)")]
pub struct UnknownPolicy(pub String);

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_last_write_wins() {
        assert_eq!(PolicyKind::default(), PolicyKind::LastWriteWins);
    }

    #[test]
    fn parses_config_names() {
        assert_eq!("reject-stale".parse::<PolicyKind>().unwrap(), PolicyKind::RejectStale);
        assert!("newest".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn built_policy_reports_its_kind() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&PolicyKind::RejectStale).unwrap();
        assert_eq!(json, "\"reject-stale\"");
    }
}
