//! Error types for Allot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Allocation not found: {0}")]
    AllocationNotFound(String),

    #[error("Essential category cannot be deleted: {0}")]
    ProtectedCategory(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
