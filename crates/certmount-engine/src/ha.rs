//! Cluster roles and the write-forwarding policy
//!
//! In a highly-available deployment only the active node may durably
//! mutate shared storage. Every mutating endpoint (`config/ca`,
//! `config/issuers` write, `root/replace`, `config/keys` write) must be
//! forwarded to the active node when it arrives at a standby or
//! performance secondary; the read endpoints are served locally.
//!
//! This module only decides the policy. The transport that actually
//! forwards a request belongs to the replication layer, which reacts to
//! the structured forward-to-active error the API returns.

use std::str::FromStr;

/// Role of this node within its cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterRole {
    /// May durably mutate shared storage
    Active,
    /// Hot standby; serves reads, forwards writes
    Standby,
    /// Performance secondary; serves reads, forwards writes
    PerformanceSecondary,
}

impl ClusterRole {
    /// Whether write-path handlers may run locally on this node
    pub fn can_write(self) -> bool {
        matches!(self, ClusterRole::Active)
    }
}

impl FromStr for ClusterRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClusterRole::Active),
            "standby" => Ok(ClusterRole::Standby),
            "performance-secondary" => Ok(ClusterRole::PerformanceSecondary),
            other => Err(format!("unknown cluster role {:?}", other)),
        }
    }
}

impl std::fmt::Display for ClusterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterRole::Active => write!(f, "active"),
            ClusterRole::Standby => write!(f, "standby"),
            ClusterRole::PerformanceSecondary => write!(f, "performance-secondary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_writes() {
        assert!(ClusterRole::Active.can_write());
        assert!(!ClusterRole::Standby.can_write());
        assert!(!ClusterRole::PerformanceSecondary.can_write());
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [
            ClusterRole::Active,
            ClusterRole::Standby,
            ClusterRole::PerformanceSecondary,
        ] {
            assert_eq!(role.to_string().parse::<ClusterRole>().unwrap(), role);
        }
        assert!("primary".parse::<ClusterRole>().is_err());
    }
}
