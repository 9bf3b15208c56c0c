use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which ledger operation a run drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Workload {
    /// Always submits a fresh registration.
    Register,
    /// Reads the target first, registering it when the read fails, then
    /// submits an ownership update.
    Update,
    /// Reads a single record, registering it and retrying when the first
    /// read fails.
    Read,
    /// Reads the full collection. No per-record fallback.
    ReadAll,
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Workload::Register => "register",
            Workload::Update => "update",
            Workload::Read => "read",
            Workload::ReadAll => "read-all",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown workload `{0}`, expected one of: register, update, read, read-all")]
pub struct ParseWorkloadError(String);

impl FromStr for Workload {
    type Err = ParseWorkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(Workload::Register),
            "update" => Ok(Workload::Update),
            "read" => Ok(Workload::Read),
            "read-all" => Ok(Workload::ReadAll),
            other => Err(ParseWorkloadError(other.to_string())),
        }
    }
}
