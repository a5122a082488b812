//! CPU chunk mesher: face culling, atlas UVs, opaque/transparent index lists.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod build;
pub mod face;
pub mod mesh_build;
pub mod neighbors;

pub use atlas::TextureAtlas;
pub use build::build_chunk_mesh;
pub use mesh_build::ChunkMesh;
pub use neighbors::{NeighborLookup, TerrainNeighbors, edge_transparency};
