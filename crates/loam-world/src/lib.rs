//! World sizing, noise sampling, terrain classification, and structures.
#![forbid(unsafe_code)]

pub mod chunk_coord;
pub mod curve;
pub mod edit;
pub mod generation;
pub mod noise;
pub mod structure;
pub mod world;
pub mod worldgen;

pub use chunk_coord::ChunkCoord;
pub use curve::ResponseCurve;
pub use edit::{DiscardEdits, EditSink, VoxelEdit};
pub use generation::ColumnSample;
pub use noise::NoiseField;
pub use structure::TreeShape;
pub use world::{TerrainBlocks, World};
pub use worldgen::{ConfigError, WorldGenConfig, WorldGenParams};
