//! Registry load and validation errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read block table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse block table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate block identifier `{0}`")]
    DuplicateIdentifier(String),

    #[error("first block must be air (not solid, transparent), found `{0}`")]
    InvalidAir(String),

    #[error("block table is empty")]
    Empty,

    #[error("too many block types ({0}), ids are u16")]
    TooManyBlocks(usize),

    #[error("unknown block identifier `{0}`")]
    UnknownIdentifier(String),
}
