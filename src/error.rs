//! Error taxonomy. Variant order mirrors `errorstrings[]` in the source's
//! `error.c` exactly, since `exit_code` is part of the external contract:
//! scripts driving this simulator key off the process exit status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid number of blocks: {0}")]
    BadBlockCount(String),
    #[error("invalid cache size: {0}")]
    BadCacheSize(String),
    #[error("invalid block index: {0}")]
    BadBlockIndex(String),
    #[error("cache id is not the next free number: {0}")]
    BadCacheId(String),
    #[error("associativity must be a power of two: {0}")]
    BadAssociativity(String),
    #[error("chosen victim way was not valid: {0}")]
    AssociativityError(String),
    #[error("improperly formatted cache configuration: {0}")]
    ConfigError(String),
    #[error("unable to find or open cache configuration file: {0}")]
    ConfigFileError(String),
    #[error("unable to open workload file: {0}")]
    WorkloadError(String),
    #[error("invalid number of levels setting up stats: {0}")]
    StatsLevelError(String),
}

impl SimError {
    /// Matches the ordinal position of each error in the source's
    /// `enum ErrorCodes`, not the order declared above.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::BadBlockCount(_) => 0,
            SimError::BadCacheSize(_) => 1,
            SimError::BadBlockIndex(_) => 2,
            SimError::BadCacheId(_) => 3,
            SimError::BadAssociativity(_) => 4,
            SimError::AssociativityError(_) => 5,
            SimError::ConfigError(_) => 6,
            SimError::ConfigFileError(_) => 7,
            SimError::WorkloadError(_) => 8,
            SimError::StatsLevelError(_) => 9,
        }
    }

    /// Errors tied to a single workload entry rather than the whole run;
    /// with `--continue-on-error` these are logged and the next workload
    /// entry is tried instead of aborting.
    pub fn is_soft(&self) -> bool {
        matches!(self, SimError::ConfigError(_) | SimError::WorkloadError(_))
    }
}
