use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Armor not found: {0}")]
    ArmorNotFound(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Slot count {selected} outside armor range {base}..={total}")]
    SlotsOutOfRange { selected: i64, base: i64, total: i64 },

    #[error("Lead container count {selected} outside armor range {base}..={total}")]
    ContainersOutOfRange { selected: i64, base: i64, total: i64 },

    #[error("Invalid catalog: {0}")]
    CatalogError(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Catalog fetch error: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
