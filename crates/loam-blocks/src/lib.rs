//! Block types, face directions, and the block registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use error::RegistryError;
pub use registry::{BlockRegistry, BlockType};
pub use types::{AIR, BlockId, Face, FaceTextures};
