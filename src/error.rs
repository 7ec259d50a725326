use thiserror::Error;

use crate::catalog::Tier;

/// Passage catalog misconfiguration, reported when the catalog is built
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no passages configured for tier {0}")]
    EmptyTier(Tier),

    #[error("tier {0} contains an empty passage")]
    EmptyPassage(Tier),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
