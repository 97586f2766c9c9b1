use std::path::PathBuf;

use thiserror::Error;

use crate::model::PlanId;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("plan {0} no longer exists")]
    PlanMissing(PlanId),
    #[error("plan {plan} changed since the draft was opened (draft r{draft}, store r{store})")]
    StaleRevision { plan: PlanId, draft: u64, store: u64 },
    #[error("success criterion {index} is empty")]
    EmptyCriterion { index: usize },
    #[error("only one phase can be active at a time ({count} are)")]
    MultipleActivePhases { count: usize },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("plan {0} not found")]
    PlanMissing(PlanId),
    #[error("failed to render plan as yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
